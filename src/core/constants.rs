//! Physical constants and gameplay parameters

/// Earth radius used for haversine distances (m)
pub const EARTH_RADIUS_M: f64 = 6.378e6;

/// Accuracy tolerance for production builds (m)
pub const PRODUCTION_TOLERANCE_M: f64 = 20.0;

/// Accuracy tolerance for development builds (m)
pub const DEVELOPMENT_TOLERANCE_M: f64 = 50.0;

/// Distance from a plant within which care actions are allowed (m)
pub const PLANT_INTERACTION_RADIUS_M: f64 = 10.0;

/// Number of plants shown in the "nearby" list
pub const NEARBY_PLANTS_LIMIT: usize = 4;
