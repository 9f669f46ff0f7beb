use gloo_net::http::Request;
use shared::models::{MatchOutcome, MatchRequest};

const API_BASE: &str = "/api";

/// Post a character description and decode whichever shape the backend
/// answered with (success or error payload).
pub async fn match_actor(character_description: String) -> Result<MatchOutcome, gloo_net::Error> {
    Request::post(&format!("{}/match-actor", API_BASE))
        .json(&MatchRequest {
            character_description,
        })?
        .send()
        .await?
        .json()
        .await
}
