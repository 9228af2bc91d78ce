//! Route guarding and user notices driven by sensor errors

use crate::sensor::{SensorError, SensorErrorCode};
use crate::utils::ClientConfig;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Client-side router
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Transient, non-blocking user notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A toast-style message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notice {
    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            description: Some(description.into()),
        }
    }

    pub fn signal_lost() -> Self {
        Self::warning(
            "Location signal lost",
            "Planting and watering are paused until your position is available again",
        )
    }
}

/// Side effect requested by the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    Stay,
    Redirect(String),
    Notify(Notice),
}

/// Decides how the app reacts to sensor errors on a given route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    location_independent_routes: Vec<String>,
    disallowed_route: String,
}

impl RouteGuard {
    pub fn new(location_independent_routes: Vec<String>, disallowed_route: impl Into<String>) -> Self {
        Self {
            location_independent_routes,
            disallowed_route: disallowed_route.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.location_independent_routes.clone(),
            config.disallowed_route.clone(),
        )
    }

    pub fn disallowed_route(&self) -> &str {
        &self.disallowed_route
    }

    /// Exact path match against the allow-list
    pub fn is_location_independent(&self, route: &str) -> bool {
        route == self.disallowed_route || self.location_independent_routes.iter().any(|r| r == route)
    }

    /// Reaction to the current error while `route` is displayed
    pub fn react(&self, error: Option<&SensorError>, route: &str) -> Reaction {
        match error.map(|e| e.code) {
            Some(SensorErrorCode::PermissionDenied) if !self.is_location_independent(route) => {
                Reaction::Redirect(self.disallowed_route.clone())
            }
            _ => Reaction::Stay,
        }
    }

    /// Reaction to an error as it arrives. Unlike `react`, this also covers
    /// one-off notices that must not repeat on every route change.
    pub fn react_to_new_error(&self, error: &SensorError, route: &str) -> Reaction {
        match error.code {
            SensorErrorCode::PermissionDenied => self.react(Some(error), route),
            SensorErrorCode::PositionUnavailable => Reaction::Notify(Notice::signal_lost()),
            SensorErrorCode::Timeout => Reaction::Stay,
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// Navigator that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        info!("navigate -> {}", route);
    }
}

/// Notifier that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match &notice.description {
            Some(description) => warn!("[{:?}] {}: {}", notice.level, notice.title, description),
            None => warn!("[{:?}] {}", notice.level, notice.title),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default, Clone)]
    pub struct RecordingNavigator {
        pub routes: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNavigator {
        pub fn taken(&self) -> Vec<String> {
            self.routes.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: &str) {
            self.routes.lock().unwrap().push(route.to_string());
        }
    }

    #[derive(Debug, Default, Clone)]
    pub struct RecordingNotifier {
        pub notices: Arc<Mutex<Vec<Notice>>>,
    }

    impl RecordingNotifier {
        pub fn received(&self) -> Vec<Notice> {
            self.notices.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }
}
