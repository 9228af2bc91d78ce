//! Accuracy indicator for views that need a precise fix

use crate::gate::state::{AccuracyStatus, GateState};
use crate::sensor::{LocationSensor, SensorEvent, WatchOptions};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a location-dependent view should do with the current gate state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorDecision {
    /// No reading yet; render nothing and wait
    Pending,
    Render,
    Redirect(String),
}

/// A view renders only on a fresh fix within tolerance. A sensor error since
/// the last fix sends the user to the low-accuracy screen to re-check.
pub fn indicator_decision(state: &GateState, low_accuracy_route: &str) -> IndicatorDecision {
    if state.reading.loading {
        IndicatorDecision::Pending
    } else if state.within_allowance && state.has_current_fix() {
        IndicatorDecision::Render
    } else {
        IndicatorDecision::Redirect(low_accuracy_route.to_string())
    }
}

/// Result of a one-shot accuracy check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyCheck {
    pub accuracy_m: Option<f64>,
    pub status: AccuracyStatus,
}

impl AccuracyCheck {
    fn unknown() -> Self {
        Self {
            accuracy_m: None,
            status: AccuracyStatus::Unknown,
        }
    }

    /// e.g. "12m - Poor"
    pub fn summary(&self) -> String {
        match self.accuracy_m {
            Some(a) => format!("{}m - {}", a.round(), self.status.label()),
            None => self.status.label().to_string(),
        }
    }
}

/// Sample the sensor once and grade the accuracy.
///
/// Waits for the first event up to `options.timeout_ms`. Errors, timeouts
/// and sensors that cannot be opened all give `Unknown`.
pub async fn recheck_accuracy<S>(sensor: &mut S, options: &WatchOptions) -> AccuracyCheck
where
    S: LocationSensor + ?Sized,
{
    let mut watch = match sensor.watch_position(options) {
        Ok(watch) => watch,
        Err(err) => {
            debug!("accuracy re-check could not open {}: {}", sensor.name(), err);
            return AccuracyCheck::unknown();
        }
    };

    match tokio::time::timeout(Duration::from_millis(options.timeout_ms), watch.next()).await {
        Ok(Some(SensorEvent::Position(fix))) => AccuracyCheck {
            accuracy_m: Some(fix.accuracy),
            status: AccuracyStatus::from_accuracy(Some(fix.accuracy)),
        },
        Ok(Some(SensorEvent::Error(err))) => {
            debug!("accuracy re-check failed: {}", err);
            AccuracyCheck::unknown()
        }
        Ok(None) | Err(_) => AccuracyCheck::unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PositionFix;
    use crate::sensor::{MockSensor, SensorError};

    #[test]
    fn test_decision_follows_state() {
        let route = "/low-geolocation-accuracy";
        let mut state = GateState::new(20.0);
        assert_eq!(indicator_decision(&state, route), IndicatorDecision::Pending);

        state.apply(&SensorEvent::Position(PositionFix::new(0.0, 0.0, 30.0)));
        assert_eq!(indicator_decision(&state, route), IndicatorDecision::Redirect(route.to_string()));

        state.apply(&SensorEvent::Position(PositionFix::new(0.0, 0.0, 4.0)));
        assert_eq!(indicator_decision(&state, route), IndicatorDecision::Render);

        state.apply(&SensorEvent::Error(SensorError::position_unavailable()));
        assert!(state.within_allowance);
        assert_eq!(indicator_decision(&state, route), IndicatorDecision::Redirect(route.to_string()));

        state.apply(&SensorEvent::Position(PositionFix::new(0.0, 0.0, 4.0)));
        assert_eq!(indicator_decision(&state, route), IndicatorDecision::Render);

        let mut denied = GateState::new(20.0);
        denied.apply(&SensorEvent::Error(SensorError::permission_denied()));
        assert_eq!(indicator_decision(&denied, route), IndicatorDecision::Redirect(route.to_string()));
    }

    #[tokio::test]
    async fn test_recheck_grades_first_fix() {
        let mut sensor = MockSensor::new();
        sensor.push_fix(10.0, 10.0, 7.6);
        sensor.push_fix(10.0, 10.0, 100.0);

        let check = recheck_accuracy(&mut sensor, &WatchOptions::recheck()).await;
        assert_eq!(check.accuracy_m, Some(7.6));
        assert_eq!(check.status, AccuracyStatus::Good);
        assert_eq!(check.summary(), "8m - Good");
    }

    #[tokio::test]
    async fn test_recheck_error_is_unknown() {
        let mut sensor = MockSensor::new();
        sensor.deny_permission();
        let check = recheck_accuracy(&mut sensor, &WatchOptions::recheck()).await;
        assert_eq!(check.status, AccuracyStatus::Unknown);

        let mut unsupported = MockSensor::unsupported();
        let check = recheck_accuracy(&mut unsupported, &WatchOptions::recheck()).await;
        assert_eq!(check.summary(), "Unknown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_recheck_times_out() {
        let mut sensor = MockSensor::new();
        let check = recheck_accuracy(&mut sensor, &WatchOptions::recheck()).await;
        assert_eq!(check.accuracy_m, None);
        assert_eq!(check.status, AccuracyStatus::Unknown);
    }
}
