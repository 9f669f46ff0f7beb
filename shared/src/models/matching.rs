use super::actor::ActorMatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub character_description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    /// Echoed back exactly as submitted, untrimmed.
    pub character_description: String,
    pub recommendations: Vec<ActorMatch>,
    pub timestamp: DateTime<Utc>,
}

/// 4xx payload: a plain user-correctable message.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiError {
    pub error: String,
}

/// 5xx payload: a generic error plus the underlying message text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What the form receives from `/api/match-actor`, decoded at the boundary
/// instead of carried around as loose JSON.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MatchOutcome {
    Success(MatchResponse),
    Failure(ApiFailure),
}
