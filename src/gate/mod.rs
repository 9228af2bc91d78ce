//! Geolocation accuracy gate
//!
//! Classifies the latest sensor reading as usable or not, publishes it to
//! read-only handles, and reacts to sensor errors with redirects or notices.

pub mod indicator;
pub mod provider;
pub mod routing;
pub mod state;

pub use indicator::{indicator_decision, recheck_accuracy, AccuracyCheck, IndicatorDecision};
pub use provider::{GateHandle, GeolocationGate, GeolocationProvider};
pub use routing::{LogNavigator, LogNotifier, Navigator, Notice, NoticeLevel, Notifier, Reaction, RouteGuard};
pub use state::{is_within_allowance, AccuracyStatus, GateState, Transition};
