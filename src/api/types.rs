//! Backend data transfer types and API errors

use crate::api::care::{PlantAction, WaterEligibility};
use crate::core::Coordinates;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or body decoding failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Endpoint URL could not be built
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    /// Backend answered with a non-success status
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
    /// Refused locally before contacting the backend
    #[error("action not allowed here: {0}")]
    NotEligible(WaterEligibility),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message suitable for a toast
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { status: 404, .. } => "Requested resource could not be found".to_string(),
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Status { .. } | ApiError::Transport(_) | ApiError::Url(_) => {
                "Error occured on the server".to_string()
            }
            ApiError::NotEligible(reason) => reason.to_string(),
        }
    }
}

/// Error body returned by the backend
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

/// Body of `POST /plants/:id/action`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantActionRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub action: PlantAction,
}

/// Mood values shown on a plant's profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tempers {
    #[serde(default)]
    pub woe: f64,
    #[serde(default)]
    pub frolic: f64,
    #[serde(default)]
    pub malice: f64,
    #[serde(default)]
    pub dread: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Loam,
    Sandy,
    Silt,
    Clay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Soil {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", alias = "soilType")]
    pub soil_type: SoilType,
    #[serde(default)]
    pub water_retention: f64,
    #[serde(default)]
    pub nutrient_richness: f64,
    #[serde(default, alias = "c")]
    pub centre: Option<Coordinates>,
    #[serde(default)]
    pub radius_m: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub botanical_name: String,
    #[serde(default, alias = "Hp", alias = "health")]
    pub hp: f64,
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub activated: bool,
    #[serde(default, rename = "ownerID")]
    pub owner_id: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub tempers: Tempers,
    /// Planting location; zeroed by the backend for non-owners
    #[serde(default, alias = "c")]
    pub centre: Option<Coordinates>,
    #[serde(default)]
    pub radius_m: Option<f64>,
    #[serde(default)]
    pub soil: Option<Soil>,
    #[serde(default)]
    pub time_planted: Option<String>,
    #[serde(default)]
    pub time_of_death: Option<String>,
    #[serde(default)]
    pub last_watered_time: Option<String>,
    #[serde(default)]
    pub last_action_time: Option<String>,
}

impl Plant {
    pub fn location(&self) -> Option<Coordinates> {
        self.centre
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// Plant annotated with its server-computed distance from the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantWithDistance {
    #[serde(flatten)]
    pub plant: Plant,
    #[serde(rename = "distanceM", default)]
    pub distance_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub id: String,
    #[serde(default)]
    pub hp: f64,
    #[serde(default)]
    pub planted: bool,
    #[serde(default, rename = "ownerID")]
    pub owner_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub botanical_name: String,
    #[serde(default)]
    pub optimal_soil: Option<SoilType>,
}

/// Seeds of one species owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedGroup {
    pub botanical_name: String,
    pub count: u32,
    #[serde(default)]
    pub seeds: Vec<Seed>,
}

/// When the user may next request seeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedAvailability {
    pub available_now: bool,
    #[serde(default)]
    pub time_available: Option<String>,
}

/// Signed-in account as returned by `/whoami` and the auth endpoints.
///
/// Accepts both the camelCase keys the web client expects and the
/// PascalCase keys of untagged backend structs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "ID")]
    pub id: String,
    #[serde(alias = "Username")]
    pub username: String,
    #[serde(default, alias = "Title")]
    pub title: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "XP")]
    pub xp: u64,
    #[serde(default, alias = "Level")]
    pub level: u32,
    #[serde(default, alias = "CreatedAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "UpdatedAt")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantCount {
    #[serde(default)]
    pub alive: u32,
    #[serde(default)]
    pub deceased: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedCount {
    #[serde(default, rename = "Planted", alias = "planted")]
    pub planted: u32,
    #[serde(default)]
    pub unused: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub plant_count: PlantCount,
    #[serde(default)]
    pub seed_count: SeedCount,
    #[serde(default, rename = "top3AlivePlants")]
    pub top_alive_plants: Vec<Plant>,
    #[serde(default)]
    pub deceased_plants: Vec<Plant>,
}

// Response envelopes

#[derive(Debug, Deserialize)]
pub(crate) struct PlantsEnvelope {
    pub plants: Vec<PlantWithDistance>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlantEnvelope {
    pub plant: Plant,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeedsEnvelope {
    pub seeds: Vec<SeedGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserProfileEnvelope {
    pub user_profile: UserProfile,
}

/// `user` is null when no session cookie is present
#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsernameEnvelope {
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_request_body() {
        let body = PlantActionRequest {
            latitude: 51.5,
            longitude: -0.1,
            action: PlantAction::Water,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"latitude": 51.5, "longitude": -0.1, "action": 1}));
    }

    #[test]
    fn test_plant_with_distance_from_backend_json() {
        let json = r#"{
            "id": "p1",
            "nickname": "Fern",
            "botanicalName": "Pteridium aquilinum",
            "hp": 72.4,
            "dead": false,
            "activated": true,
            "ownerID": "u1",
            "tempers": {"woe": 1, "frolic": 2, "malice": 0, "dread": 3},
            "centre": {"Lat": 51.5, "Lng": -0.12},
            "soil": {"id": "s1", "type": "loam", "waterRetention": 0.4, "nutrientRichness": 0.7},
            "timePlanted": "2025-04-01T10:00:00Z",
            "distanceM": 12.5
        }"#;

        let entry: PlantWithDistance = serde_json::from_str(json).unwrap();
        assert_eq!(entry.distance_m, 12.5);
        assert_eq!(entry.plant.location(), Some(Coordinates::new(51.5, -0.12)));
        assert_eq!(entry.plant.soil.as_ref().map(|s| s.soil_type), Some(SoilType::Loam));
        assert_eq!(entry.plant.tempers.dread, 3.0);
        assert!(entry.plant.is_owned_by("u1"));
    }

    #[test]
    fn test_user_profile_from_backend_json() {
        let json = r#"{
            "username": "gardener",
            "title": "Seedling",
            "level": 3,
            "plantCount": {"alive": 2, "deceased": 1},
            "seedCount": {"Planted": 3, "unused": 4},
            "top3AlivePlants": [{"id": "a"}, {"id": "b"}],
            "deceasedPlants": [{"id": "c", "dead": true}]
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.seed_count.planted, 3);
        assert_eq!(profile.top_alive_plants.len(), 2);
        assert!(profile.deceased_plants[0].dead);
    }

    #[test]
    fn test_user_accepts_both_key_styles() {
        let web: User = serde_json::from_str(
            r#"{"id": "u1", "username": "gardener", "email": "g@example.com", "xp": 120, "level": 2}"#,
        )
        .unwrap();
        let go: User = serde_json::from_str(
            r#"{"ID": "u1", "Username": "gardener", "Email": "g@example.com", "XP": 120, "Level": 2}"#,
        )
        .unwrap();
        assert_eq!(web, go);

        let anonymous: UserEnvelope = serde_json::from_str(r#"{"user": null}"#).unwrap();
        assert!(anonymous.user.is_none());
    }

    #[test]
    fn test_user_messages() {
        let not_found = ApiError::Status {
            status: 404,
            message: "plant not found".to_string(),
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.user_message(), "Requested resource could not be found");

        let cooldown = ApiError::Status {
            status: 400,
            message: "plant in cooldown".to_string(),
        };
        assert_eq!(cooldown.user_message(), "plant in cooldown");
    }
}
