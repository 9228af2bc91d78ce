//! Backend-facing API surface
//!
//! Typed HTTP client, care-action gating, response types and display
//! formatting for plant data.

pub mod care;
pub mod client;
pub mod formatting;
pub mod types;

pub use care::{water_eligibility, PlantAction, WaterEligibility};
pub use client::ApiClient;
pub use formatting::{
    dicebear_glass_url, dicebear_thumbs_url, format_coordinates, format_distance, format_hp,
    format_plant_date, format_relative_time, sentence_case,
};
pub use types::{
    ApiError, ApiResult, Plant, PlantWithDistance, Seed, SeedAvailability, SeedGroup, Soil,
    SoilType, Tempers, User, UserProfile,
};
