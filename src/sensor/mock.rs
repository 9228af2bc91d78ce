//! Mock location sensor for tests and demos

use crate::core::PositionFix;
use crate::sensor::{
    LocationSensor, PositionWatch, SensorError, SensorErrorCode, SensorEvent, SensorResult,
    WatchOptions, WatchSender,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MockState {
    pending: VecDeque<SensorEvent>,
    watchers: Vec<WatchSender>,
    last_options: Option<WatchOptions>,
    watch_count: u32,
    unsupported: bool,
}

/// Scriptable sensor.
///
/// Events pushed before anyone subscribes are queued and replayed to the
/// next watch. Events pushed afterwards are broadcast to every open watch.
/// Clones share the same state, so a test can keep one clone to drive the
/// sensor after handing another to the gate.
#[derive(Debug, Clone, Default)]
pub struct MockSensor {
    state: Arc<Mutex<MockState>>,
}

impl MockSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sensor that refuses every watch, as on a device without location support
    pub fn unsupported() -> Self {
        let sensor = Self::new();
        sensor.lock().unsupported = true;
        sensor
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test thread must not wedge the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Push an arbitrary event
    pub fn push_event(&self, event: SensorEvent) {
        let mut state = self.lock();
        state.watchers.retain(|w| !w.is_closed());
        if state.watchers.is_empty() {
            state.pending.push_back(event);
            return;
        }
        state.watchers.retain(|w| w.send(event.clone()).is_ok());
    }

    /// Push a fix at the given position and accuracy
    pub fn push_fix(&self, latitude: f64, longitude: f64, accuracy: f64) {
        self.push_event(SensorEvent::Position(PositionFix::new(latitude, longitude, accuracy)));
    }

    pub fn push_error(&self, code: SensorErrorCode) {
        self.push_event(SensorEvent::Error(SensorError::new(code)));
    }

    pub fn deny_permission(&self) {
        self.push_error(SensorErrorCode::PermissionDenied);
    }

    pub fn lose_signal(&self) {
        self.push_error(SensorErrorCode::PositionUnavailable);
    }

    /// Close every open watch, as if the sensor had shut down
    pub fn disconnect(&self) {
        self.lock().watchers.clear();
    }

    pub fn active_watch_count(&self) -> usize {
        let mut state = self.lock();
        state.watchers.retain(|w| !w.is_closed());
        state.watchers.len()
    }

    /// Total number of watches ever opened
    pub fn watch_count(&self) -> u32 {
        self.lock().watch_count
    }

    pub fn last_options(&self) -> Option<WatchOptions> {
        self.lock().last_options.clone()
    }

    pub fn queued_event_count(&self) -> usize {
        self.lock().pending.len()
    }
}

impl LocationSensor for MockSensor {
    fn watch_position(&mut self, options: &WatchOptions) -> SensorResult<PositionWatch> {
        let mut state = self.lock();
        if state.unsupported {
            return Err(SensorError::with_message(
                SensorErrorCode::PositionUnavailable,
                "Geolocation is not supported",
            ));
        }

        let (sender, watch) = PositionWatch::channel();
        while let Some(event) = state.pending.pop_front() {
            // The receiver is alive, it was created above
            let _ = sender.send(event);
        }

        state.watchers.push(sender);
        state.last_options = Some(options.clone());
        state.watch_count += 1;
        Ok(watch)
    }

    fn name(&self) -> &str {
        "mock-sensor"
    }
}
