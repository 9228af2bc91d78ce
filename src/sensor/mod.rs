//! Location sensor abstraction
//!
//! Sensors push fixes and errors into a `PositionWatch` stream. The stream
//! stays open for as long as the subscriber holds it; dropping the watch is
//! the only way to stop listening.

pub mod error;
pub mod mock;

pub use error::{RecoveryStrategy, SensorError, SensorErrorCode, SensorResult};
pub use mock::MockSensor;

use crate::core::PositionFix;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Event delivered on a position watch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SensorEvent {
    Position(PositionFix),
    Error(SensorError),
}

/// Options passed to the sensor when a watch is opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchOptions {
    /// Request the most precise source available (GPS over network)
    pub enable_high_accuracy: bool,
    /// Maximum age of a cached fix the sensor may return (milliseconds)
    pub maximum_age_ms: u64,
    /// Time allowed for each fix before a timeout error (milliseconds)
    pub timeout_ms: u64,
}

impl WatchOptions {
    pub const MIN_TIMEOUT_MS: u64 = 1_000;
    pub const MAX_TIMEOUT_MS: u64 = 10_000;

    /// Options for the long-lived watch held by the gate
    pub fn continuous() -> Self {
        Self {
            enable_high_accuracy: true,
            maximum_age_ms: 0,
            timeout_ms: Self::MIN_TIMEOUT_MS,
        }
    }

    /// Options for a user-triggered accuracy re-check
    pub fn recheck() -> Self {
        Self {
            enable_high_accuracy: true,
            maximum_age_ms: 0,
            timeout_ms: Self::MAX_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout_in_range(&self) -> bool {
        (Self::MIN_TIMEOUT_MS..=Self::MAX_TIMEOUT_MS).contains(&self.timeout_ms)
    }
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self::continuous()
    }
}

/// Sending half of a position watch, held by sensor implementations
pub type WatchSender = mpsc::UnboundedSender<SensorEvent>;

/// Push-based stream of sensor events
#[derive(Debug)]
pub struct PositionWatch {
    receiver: mpsc::UnboundedReceiver<SensorEvent>,
}

impl PositionWatch {
    /// Create a connected sender/watch pair
    pub fn channel() -> (WatchSender, PositionWatch) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, PositionWatch { receiver })
    }

    /// Wait for the next event. Returns `None` once the sensor has gone away.
    pub async fn next(&mut self) -> Option<SensorEvent> {
        self.receiver.recv().await
    }

    /// Take an already queued event without waiting
    pub fn try_next(&mut self) -> Option<SensorEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Source of position fixes
pub trait LocationSensor: Send {
    /// Open a continuous watch. Fails only when the sensor cannot be used at
    /// all; runtime failures arrive as `SensorEvent::Error` on the watch.
    fn watch_position(&mut self, options: &WatchOptions) -> SensorResult<PositionWatch>;

    /// Human readable sensor name for logs
    fn name(&self) -> &str {
        "location-sensor"
    }
}

impl<S: LocationSensor + ?Sized> LocationSensor for Box<S> {
    fn watch_position(&mut self, options: &WatchOptions) -> SensorResult<PositionWatch> {
        (**self).watch_position(options)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
