//! Location gating for plant care actions

use crate::algorithms::distance_m;
use crate::core::Coordinates;
use crate::gate::GateState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Care actions understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantAction {
    Water = 1,
}

impl Serialize for PlantAction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Whether the user may act on a plant from where they stand.
///
/// Only drives what the UI enables; the backend re-checks every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WaterEligibility {
    Eligible { distance_m: f64 },
    /// No fix yet, or the sensor reported an error since the last one
    LocationUnavailable,
    InaccurateFix { accuracy_m: Option<f64> },
    OutOfRange { distance_m: f64, radius_m: f64 },
}

impl WaterEligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, WaterEligibility::Eligible { .. })
    }
}

impl fmt::Display for WaterEligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterEligibility::Eligible { distance_m } => write!(f, "within reach ({:.1} m away)", distance_m),
            WaterEligibility::LocationUnavailable => write!(f, "current location is unknown"),
            WaterEligibility::InaccurateFix { accuracy_m: Some(a) } => {
                write!(f, "location accuracy of {:.0} m is too low", a)
            }
            WaterEligibility::InaccurateFix { accuracy_m: None } => write!(f, "location accuracy is unknown"),
            WaterEligibility::OutOfRange { distance_m, radius_m } => {
                write!(f, "plant is {:.1} m away, get within {:.0} m", distance_m, radius_m)
            }
        }
    }
}

pub fn water_eligibility(state: &GateState, plant_location: &Coordinates, radius_m: f64) -> WaterEligibility {
    let here = match state.coordinates() {
        Some(here) if state.has_current_fix() => here,
        _ => return WaterEligibility::LocationUnavailable,
    };

    if !state.within_allowance {
        return WaterEligibility::InaccurateFix {
            accuracy_m: state.accuracy(),
        };
    }

    let distance = distance_m(&here, plant_location);
    if distance <= radius_m {
        WaterEligibility::Eligible { distance_m: distance }
    } else {
        WaterEligibility::OutOfRange {
            distance_m: distance,
            radius_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PositionFix;
    use crate::sensor::{SensorError, SensorEvent};

    fn state_at(lat: f64, lon: f64, accuracy: f64) -> GateState {
        let mut state = GateState::new(20.0);
        state.apply(&SensorEvent::Position(PositionFix::new(lat, lon, accuracy)));
        state
    }

    #[test]
    fn test_loading_is_unavailable() {
        let state = GateState::new(20.0);
        let plant = Coordinates::new(0.0, 0.0);
        assert_eq!(water_eligibility(&state, &plant, 10.0), WaterEligibility::LocationUnavailable);
    }

    #[test]
    fn test_error_without_fix_is_unavailable() {
        let mut state = GateState::new(20.0);
        state.apply(&SensorEvent::Error(SensorError::timeout()));
        let plant = Coordinates::new(0.0, 0.0);
        assert_eq!(water_eligibility(&state, &plant, 10.0), WaterEligibility::LocationUnavailable);
    }

    #[test]
    fn test_signal_loss_pauses_care_until_next_fix() {
        let mut state = state_at(51.5, -0.12, 5.0);
        let plant = Coordinates::new(51.5, -0.12);
        assert!(water_eligibility(&state, &plant, 10.0).is_eligible());

        state.apply(&SensorEvent::Error(SensorError::position_unavailable()));
        // The last fix is still held and still within tolerance
        assert!(state.within_allowance);
        assert_eq!(water_eligibility(&state, &plant, 10.0), WaterEligibility::LocationUnavailable);

        state.apply(&SensorEvent::Error(SensorError::timeout()));
        assert_eq!(water_eligibility(&state, &plant, 10.0), WaterEligibility::LocationUnavailable);

        state.apply(&SensorEvent::Position(PositionFix::new(51.5, -0.12, 6.0)));
        assert!(water_eligibility(&state, &plant, 10.0).is_eligible());
    }

    #[test]
    fn test_inaccurate_fix_blocks() {
        let state = state_at(0.0, 0.0, 35.0);
        let plant = Coordinates::new(0.0, 0.0);
        assert_eq!(
            water_eligibility(&state, &plant, 10.0),
            WaterEligibility::InaccurateFix { accuracy_m: Some(35.0) }
        );
    }

    #[test]
    fn test_range_check() {
        let state = state_at(51.5, -0.12, 5.0);

        // ~5.6 m north
        let near = Coordinates::new(51.50005, -0.12);
        let result = water_eligibility(&state, &near, 10.0);
        assert!(result.is_eligible());

        // ~111 m north
        let far = Coordinates::new(51.501, -0.12);
        match water_eligibility(&state, &far, 10.0) {
            WaterEligibility::OutOfRange { distance_m, radius_m } => {
                assert!(distance_m > 100.0);
                assert_eq!(radius_m, 10.0);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_display_is_readable() {
        let reason = WaterEligibility::OutOfRange {
            distance_m: 42.34,
            radius_m: 10.0,
        };
        assert_eq!(reason.to_string(), "plant is 42.3 m away, get within 10 m");
    }
}
