//! Location sensor error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure codes reported by a location sensor.
///
/// Numeric values follow the platform geolocation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorErrorCode {
    /// The user refused location access
    PermissionDenied = 1,
    /// No position could be determined (signal lost, hardware off)
    PositionUnavailable = 2,
    /// No fix arrived within the watch timeout
    Timeout = 3,
}

impl SensorErrorCode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(SensorErrorCode::PermissionDenied),
            2 => Some(SensorErrorCode::PositionUnavailable),
            3 => Some(SensorErrorCode::Timeout),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    fn default_message(&self) -> &'static str {
        match self {
            SensorErrorCode::PermissionDenied => "User denied Geolocation",
            SensorErrorCode::PositionUnavailable => "Position unavailable",
            SensorErrorCode::Timeout => "Timeout expired",
        }
    }
}

/// Error delivered on a position watch
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("location sensor error {code:?}: {message}")]
pub struct SensorError {
    pub code: SensorErrorCode,
    pub message: String,
}

impl SensorError {
    pub fn new(code: SensorErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }

    pub fn with_message(code: SensorErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn permission_denied() -> Self {
        Self::new(SensorErrorCode::PermissionDenied)
    }

    pub fn position_unavailable() -> Self {
        Self::new(SensorErrorCode::PositionUnavailable)
    }

    pub fn timeout() -> Self {
        Self::new(SensorErrorCode::Timeout)
    }

    /// Recommended reaction to this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self.code {
            SensorErrorCode::PermissionDenied => RecoveryStrategy::RequireUserAction,
            SensorErrorCode::PositionUnavailable => RecoveryStrategy::WaitForSignal,
            SensorErrorCode::Timeout => RecoveryStrategy::WaitForSignal,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        !matches!(self.recovery_strategy(), RecoveryStrategy::RequireUserAction)
    }
}

/// How consumers should expect an error to clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// The sensor keeps sampling; a later fix clears the error
    WaitForSignal,
    /// Only a settings change by the user can clear it
    RequireUserAction,
}

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;
