//! Gate state and its transitions

use crate::core::{Coordinates, GeolocationReading};
use crate::sensor::{SensorErrorCode, SensorEvent};
use serde::{Deserialize, Serialize};

/// Whether an accuracy radius is usable under the given tolerance
pub fn is_within_allowance(accuracy: Option<f64>, tolerance_m: f64) -> bool {
    matches!(accuracy, Some(a) if a <= tolerance_m)
}

/// Snapshot published to consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateState {
    pub reading: GeolocationReading,
    /// True only when the latest accuracy is within `tolerance_m` and the
    /// sensor is no longer loading
    pub within_allowance: bool,
    pub tolerance_m: f64,
}

/// What changed when an event was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub allowance_changed: bool,
    pub error: Option<SensorErrorCode>,
}

impl GateState {
    pub fn new(tolerance_m: f64) -> Self {
        Self {
            reading: GeolocationReading::initial(),
            within_allowance: false,
            tolerance_m,
        }
    }

    /// Apply one sensor event. Most recent event wins; there is no smoothing
    /// or hysteresis.
    pub fn apply(&mut self, event: &SensorEvent) -> Transition {
        let before = self.within_allowance;

        let error = match event {
            SensorEvent::Position(fix) => {
                self.reading.apply_fix(fix);
                None
            }
            SensorEvent::Error(err) => {
                self.reading.apply_error(err.clone());
                Some(err.code)
            }
        };

        self.within_allowance =
            !self.reading.loading && is_within_allowance(self.reading.accuracy, self.tolerance_m);

        Transition {
            allowance_changed: before != self.within_allowance,
            error,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.reading.coordinates()
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.reading.accuracy
    }

    pub fn error_code(&self) -> Option<SensorErrorCode> {
        self.reading.error.as_ref().map(|e| e.code)
    }

    /// True when the most recent sensor event was a fix. Any error after it
    /// makes the retained coordinates stale until the next fix arrives.
    pub fn has_current_fix(&self) -> bool {
        !self.reading.loading && self.reading.error.is_none() && self.coordinates().is_some()
    }

    pub fn accuracy_status(&self) -> AccuracyStatus {
        AccuracyStatus::from_accuracy(self.reading.accuracy)
    }
}

/// Human-facing accuracy grade shown on the low-accuracy screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccuracyStatus {
    Unknown,
    Excellent,
    Good,
    Poor,
    VeryPoor,
}

impl AccuracyStatus {
    pub fn from_accuracy(accuracy: Option<f64>) -> Self {
        match accuracy {
            Some(a) if !a.is_finite() || a <= 0.0 => AccuracyStatus::Unknown,
            Some(a) if a <= 5.0 => AccuracyStatus::Excellent,
            Some(a) if a <= 10.0 => AccuracyStatus::Good,
            Some(a) if a <= 50.0 => AccuracyStatus::Poor,
            Some(_) => AccuracyStatus::VeryPoor,
            None => AccuracyStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccuracyStatus::Unknown => "Unknown",
            AccuracyStatus::Excellent => "Excellent",
            AccuracyStatus::Good => "Good",
            AccuracyStatus::Poor => "Poor",
            AccuracyStatus::VeryPoor => "Very Poor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PositionFix;
    use crate::sensor::SensorError;

    fn fix(accuracy: f64) -> SensorEvent {
        SensorEvent::Position(PositionFix::new(52.0, 4.0, accuracy))
    }

    #[test]
    fn test_initial_state_is_not_within_allowance() {
        let state = GateState::new(20.0);
        assert!(state.reading.loading);
        assert!(state.accuracy().is_none());
        assert!(!state.within_allowance);
    }

    #[test]
    fn test_allowance_matches_predicate_for_all_accuracies() {
        let tolerance = 20.0;
        for accuracy in [0.5, 5.0, 15.0, 19.999, 20.0, 20.001, 25.0, 100.0, f64::NAN] {
            let mut state = GateState::new(tolerance);
            state.apply(&fix(accuracy));
            assert_eq!(
                state.within_allowance,
                is_within_allowance(Some(accuracy), tolerance),
                "accuracy {}",
                accuracy
            );
        }
        assert!(!is_within_allowance(None, tolerance));
    }

    #[test]
    fn test_fifteen_meters_is_within_production_tolerance() {
        let mut state = GateState::new(20.0);
        let transition = state.apply(&fix(15.0));
        assert!(state.within_allowance);
        assert!(transition.allowance_changed);
    }

    #[test]
    fn test_twenty_five_meters_is_outside_production_tolerance() {
        let mut state = GateState::new(20.0);
        let transition = state.apply(&fix(25.0));
        assert!(!state.within_allowance);
        assert!(!transition.allowance_changed);
    }

    #[test]
    fn test_single_bad_fix_flips_flag_back() {
        let mut state = GateState::new(20.0);
        state.apply(&fix(10.0));
        assert!(state.within_allowance);

        let transition = state.apply(&fix(40.0));
        assert!(!state.within_allowance);
        assert!(transition.allowance_changed);

        state.apply(&fix(12.0));
        assert!(state.within_allowance);
    }

    #[test]
    fn test_error_before_any_fix_stays_outside_allowance() {
        let mut state = GateState::new(20.0);
        let transition = state.apply(&SensorEvent::Error(SensorError::permission_denied()));
        assert_eq!(transition.error, Some(SensorErrorCode::PermissionDenied));
        assert!(!state.reading.loading);
        assert!(!state.within_allowance);
        assert!(state.coordinates().is_none());
    }

    #[test]
    fn test_error_after_fix_keeps_last_reading() {
        let mut state = GateState::new(20.0);
        state.apply(&fix(8.0));
        state.apply(&SensorEvent::Error(SensorError::position_unavailable()));

        assert_eq!(state.error_code(), Some(SensorErrorCode::PositionUnavailable));
        assert_eq!(state.accuracy(), Some(8.0));
        assert!(state.within_allowance);
        assert!(!state.has_current_fix());

        state.apply(&fix(9.0));
        assert!(state.has_current_fix());
    }

    #[test]
    fn test_accuracy_status_bands() {
        assert_eq!(AccuracyStatus::from_accuracy(None), AccuracyStatus::Unknown);
        assert_eq!(AccuracyStatus::from_accuracy(Some(0.0)), AccuracyStatus::Unknown);
        assert_eq!(AccuracyStatus::from_accuracy(Some(5.0)), AccuracyStatus::Excellent);
        assert_eq!(AccuracyStatus::from_accuracy(Some(7.5)), AccuracyStatus::Good);
        assert_eq!(AccuracyStatus::from_accuracy(Some(50.0)), AccuracyStatus::Poor);
        assert_eq!(AccuracyStatus::from_accuracy(Some(51.0)), AccuracyStatus::VeryPoor);
        assert_eq!(AccuracyStatus::VeryPoor.label(), "Very Poor");
    }
}
