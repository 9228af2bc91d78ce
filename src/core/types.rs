//! Core data types for location readings

use crate::sensor::SensorError;
use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "Lat", alias = "lat", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "Lon", alias = "Lng", alias = "lon", alias = "longitude")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude.to_radians()
    }
}

/// A single fix delivered by a location sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Horizontal accuracy radius (meters)
    pub accuracy: f64,
    /// Altitude above the reference ellipsoid (meters)
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Altitude accuracy (meters)
    #[serde(default)]
    pub altitude_accuracy: Option<f64>,
    /// Direction of travel in degrees clockwise from true north
    #[serde(default)]
    pub heading: Option<f64>,
    /// Ground speed (m/s)
    #[serde(default)]
    pub speed: Option<f64>,
    /// Acquisition time (milliseconds since epoch)
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl PositionFix {
    /// Create a fix with only the horizontal fields populated
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            altitude: None,
            altitude_accuracy: None,
            heading: None,
            speed: None,
            timestamp_ms: chrono::Utc::now().timestamp_millis().max(0) as u64,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Latest known location state as seen by consumers.
///
/// Every numeric field is empty until the first fix arrives. Errors keep the
/// previous fix fields in place; a new fix clears the error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeolocationReading {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub altitude_accuracy: Option<f64>,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
    pub timestamp_ms: Option<u64>,
    pub error: Option<SensorError>,
    pub loading: bool,
}

impl GeolocationReading {
    /// Reading held before the sensor has reported anything
    pub fn initial() -> Self {
        Self {
            latitude: None,
            longitude: None,
            accuracy: None,
            altitude: None,
            altitude_accuracy: None,
            heading: None,
            speed: None,
            timestamp_ms: None,
            error: None,
            loading: true,
        }
    }

    /// Overwrite the reading with a new fix
    pub fn apply_fix(&mut self, fix: &PositionFix) {
        self.latitude = Some(fix.latitude);
        self.longitude = Some(fix.longitude);
        self.accuracy = Some(fix.accuracy);
        self.altitude = fix.altitude;
        self.altitude_accuracy = fix.altitude_accuracy;
        self.heading = fix.heading;
        self.speed = fix.speed;
        self.timestamp_ms = Some(fix.timestamp_ms);
        self.error = None;
        self.loading = false;
    }

    /// Record a sensor failure
    pub fn apply_error(&mut self, error: SensorError) {
        self.error = Some(error);
        self.loading = false;
    }

    /// Current position, if both components are known
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}

impl Default for GeolocationReading {
    fn default() -> Self {
        Self::initial()
    }
}
