//! Geolocation-gated garden client
//!
//! Location access, accuracy gating and route protection for a
//! location-based plant care game, plus a typed client for its backend.

pub mod core;
pub mod algorithms;
pub mod sensor;
pub mod gate;
pub mod api;
pub mod validation;
pub mod utils;

// Re-export commonly used types
pub use core::{Coordinates, GeolocationReading, PositionFix, EARTH_RADIUS_M};
pub use algorithms::{distance_m, within_radius};
pub use sensor::{LocationSensor, MockSensor, PositionWatch, SensorError, SensorErrorCode, SensorEvent, WatchOptions};
pub use gate::{
    indicator_decision, recheck_accuracy, AccuracyCheck, AccuracyStatus, GateHandle, GateState,
    GeolocationGate, GeolocationProvider, IndicatorDecision, Navigator, Notice, Notifier, RouteGuard,
};
pub use api::{water_eligibility, ApiClient, ApiError, ApiResult, PlantAction, WaterEligibility};
pub use validation::{FormErrors, RegisterForm};
pub use utils::{ClientConfig, ConfigError, Environment};
