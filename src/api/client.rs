//! HTTP client for the garden backend

use crate::api::care::{water_eligibility, PlantAction};
use crate::api::types::*;
use crate::core::{Coordinates, NEARBY_PLANTS_LIMIT};
use crate::gate::GateState;
use crate::utils::ClientConfig;
use crate::validation::{LoginCredentials, Registration};
use log::{debug, warn};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Typed wrapper over the backend REST endpoints.
///
/// One instance per session; the cookie store carries the auth session
/// between calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    interaction_radius_m: f64,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let base_url = Url::parse(&config.api_base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let http = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url,
            interaction_radius_m: config.interaction_radius_m,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one
    pub(crate) fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn user_plants_url(&self, user_id: &str, position: &Coordinates) -> ApiResult<Url> {
        let mut url = self.endpoint(&["plants", "u", user_id])?;
        url.query_pairs_mut()
            .append_pair("lat", &position.latitude.to_string())
            .append_pair("lon", &position.longitude.to_string());
        Ok(url)
    }

    // Session

    /// Account behind the session cookie, `None` when signed out
    pub async fn whoami(&self) -> ApiResult<Option<User>> {
        let url = self.endpoint(&["whoami"])?;
        debug!("GET {}", url);
        let envelope: UserEnvelope = decode(self.http.get(url).send().await?).await?;
        Ok(envelope.user)
    }

    /// Create an account. The backend answers with the new user and starts
    /// a session.
    pub async fn register(&self, registration: &Registration) -> ApiResult<Option<User>> {
        let url = self.endpoint(&["auth", "register"])?;
        debug!("POST {}", url);
        let envelope: UserEnvelope = decode(self.http.post(url).json(registration).send().await?).await?;
        Ok(envelope.user)
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<Option<User>> {
        let url = self.endpoint(&["auth", "login"])?;
        debug!("POST {}", url);
        let envelope: UserEnvelope = decode(self.http.post(url).json(credentials).send().await?).await?;
        Ok(envelope.user)
    }

    pub async fn logout(&self) -> ApiResult<()> {
        let url = self.endpoint(&["auth", "logout"])?;
        debug!("POST {}", url);
        check(self.http.post(url).send().await?).await?;
        Ok(())
    }

    // Plants

    /// Every plant the user owns, nearest first, with server-side distances
    pub async fn all_user_plants(&self, user_id: &str, position: &Coordinates) -> ApiResult<Vec<PlantWithDistance>> {
        let url = self.user_plants_url(user_id, position)?;
        debug!("GET {}", url);
        let envelope: PlantsEnvelope = decode(self.http.get(url).send().await?).await?;
        Ok(envelope.plants)
    }

    pub async fn nearby_plants(&self, user_id: &str, position: &Coordinates) -> ApiResult<Vec<PlantWithDistance>> {
        let mut plants = self.all_user_plants(user_id, position).await?;
        plants.truncate(NEARBY_PLANTS_LIMIT);
        Ok(plants)
    }

    pub async fn plant(&self, plant_id: &str) -> ApiResult<Plant> {
        let url = self.endpoint(&["plants", plant_id])?;
        debug!("GET {}", url);
        let envelope: PlantEnvelope = decode(self.http.get(url).send().await?).await?;
        Ok(envelope.plant)
    }

    /// Water a plant from `position`. The backend enforces range and cooldown.
    pub async fn water_plant(&self, plant_id: &str, position: &Coordinates) -> ApiResult<()> {
        let url = self.endpoint(&["plants", plant_id, "action"])?;
        let body = PlantActionRequest {
            latitude: position.latitude,
            longitude: position.longitude,
            action: PlantAction::Water,
        };
        debug!("POST {}", url);
        check(self.http.post(url).json(&body).send().await?).await?;
        Ok(())
    }

    /// Water only if the current gate state puts the user within reach
    pub async fn water_plant_checked(&self, plant_id: &str, state: &GateState, plant_location: &Coordinates) -> ApiResult<()> {
        let eligibility = water_eligibility(state, plant_location, self.interaction_radius_m);
        let here = match (eligibility.is_eligible(), state.coordinates()) {
            (true, Some(here)) => here,
            _ => {
                warn!("not watering {}: {}", plant_id, eligibility);
                return Err(ApiError::NotEligible(eligibility));
            }
        };
        self.water_plant(plant_id, &here).await
    }

    pub async fn kill_plant(&self, plant_id: &str) -> ApiResult<()> {
        let url = self.endpoint(&["plants", plant_id, "kill"])?;
        debug!("POST {}", url);
        check(self.http.post(url).send().await?).await?;
        Ok(())
    }

    pub async fn change_plant_nickname(&self, plant_id: &str, new_nickname: &str) -> ApiResult<()> {
        let url = self.endpoint(&["plants", plant_id])?;
        debug!("PATCH {}", url);
        let body = json!({ "newNickname": new_nickname });
        check(self.http.patch(url).json(&body).send().await?).await?;
        Ok(())
    }

    // Seeds

    pub async fn user_seeds(&self, user_id: &str) -> ApiResult<Vec<SeedGroup>> {
        let url = self.endpoint(&["seeds", "u", user_id])?;
        debug!("GET {}", url);
        let envelope: SeedsEnvelope = decode(self.http.get(url).send().await?).await?;
        Ok(envelope.seeds)
    }

    pub async fn plant_seed(&self, seed_id: &str, position: &Coordinates) -> ApiResult<()> {
        let url = self.endpoint(&["seeds", seed_id])?;
        debug!("POST {}", url);
        let body = json!({ "latitude": position.latitude, "longitude": position.longitude });
        check(self.http.post(url).json(&body).send().await?).await?;
        Ok(())
    }

    pub async fn request_seeds(&self, user_id: &str) -> ApiResult<()> {
        let url = self.endpoint(&["seeds", "u", user_id, "request"])?;
        debug!("POST {}", url);
        check(self.http.post(url).send().await?).await?;
        Ok(())
    }

    pub async fn seed_availability(&self, user_id: &str) -> ApiResult<SeedAvailability> {
        let url = self.endpoint(&["seeds", "u", user_id, "request"])?;
        debug!("GET {}", url);
        decode(self.http.get(url).send().await?).await
    }

    // Users

    pub async fn user_profile(&self, username: &str) -> ApiResult<UserProfile> {
        let url = self.endpoint(&["users", username, "profile"])?;
        debug!("GET {}", url);
        let envelope: UserProfileEnvelope = decode(self.http.get(url).send().await?).await?;
        Ok(envelope.user_profile)
    }

    pub async fn username(&self, user_id: &str) -> ApiResult<String> {
        let url = self.endpoint(&["users", "u", user_id, "username"])?;
        debug!("GET {}", url);
        let envelope: UsernameEnvelope = decode(self.http.get(url).send().await?).await?;
        Ok(envelope.username)
    }

    pub async fn change_username(&self, user_id: &str, new_username: &str) -> ApiResult<()> {
        self.patch_auth(user_id, "change-username", json!({ "newUsername": new_username }))
            .await
    }

    pub async fn change_email(&self, user_id: &str, new_email: &str) -> ApiResult<()> {
        self.patch_auth(user_id, "change-email", json!({ "newEmail": new_email }))
            .await
    }

    pub async fn change_password(&self, user_id: &str, old_password: &str, new_password: &str) -> ApiResult<()> {
        let body = json!({ "oldPassword": old_password, "newPassword": new_password });
        self.patch_auth(user_id, "change-password", body).await
    }

    async fn patch_auth(&self, user_id: &str, action: &str, body: serde_json::Value) -> ApiResult<()> {
        let url = self.endpoint(&["auth", "u", user_id, action])?;
        // never log the body, it may carry passwords
        debug!("PATCH {}", url);
        check(self.http.patch(url).json(&body).send().await?).await?;
        Ok(())
    }
}

/// Turn any status >= 300 into `ApiError::Status`
async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status().as_u16();
    if status < 300 {
        return Ok(response);
    }

    let message = match response.text().await {
        Ok(body) => error_message(&body),
        Err(_) => String::new(),
    };
    debug!("backend error {}: {}", status, message);
    Err(ApiError::Status { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let response = check(response).await?;
    Ok(response.json::<T>().await?)
}

/// Server message from an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| body.trim().to_string())
}
