use crate::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::Value;
use shared::models::{ActorMatch, ApiError, ApiFailure, MatchResponse};

const FALLBACK_NAME: &str = "Unable to parse response";
const FALLBACK_REASONING_LIMIT: usize = 500;

const SYSTEM_INSTRUCTION: &str = r#"You are an expert casting director with deep knowledge of actors, their performances, and their suitability for different roles.
Your task is to recommend 3 actors who would be perfect for a given character description.

For each actor, provide:
1. Their full name
2. A detailed explanation of why they'd be perfect for this role (consider their acting style, previous roles, range, and characteristics)
3. 2-3 notable roles that demonstrate their suitability

Return your response as a JSON array with this exact structure:
[
  {
    "name": "Actor Name",
    "reasoning": "Detailed explanation of why they fit...",
    "notableRoles": ["Role 1 in Movie/Show", "Role 2 in Movie/Show"]
  }
]

Be specific, insightful, and consider both obvious and surprising choices that would truly fit the character."#;

fn build_user_prompt(character_description: &str) -> String {
    format!(
        "Based on this character description, recommend 3 actors who would be perfect for the role:\n\n{character_description}\n\nReturn ONLY the JSON array, no additional text."
    )
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Best-effort extraction of the recommendation array from the model's
/// free-text reply: everything from the first `[` to the last `]` is
/// treated as the candidate JSON. Anything unparseable degrades to a
/// single fallback entry instead of failing the request.
fn parse_recommendations(reply: &str) -> Vec<ActorMatch> {
    if let (Some(start), Some(end)) = (reply.find('['), reply.rfind(']'))
        && start < end
        && let Ok(actors) = serde_json::from_str::<Vec<ActorMatch>>(&reply[start..=end])
    {
        return actors;
    }

    tracing::error!("Failed to parse AI response, raw reply: {reply}");
    vec![ActorMatch::new(
        FALLBACK_NAME,
        truncate_chars(reply, FALLBACK_REASONING_LIMIT),
    )]
}

/// `POST /api/match-actor`: validate, prompt, parse, respond. No state
/// survives the request.
///
/// The body is decoded by hand rather than through the `Json` extractor so
/// that a malformed body gets the same `{ error }` shape as a missing or
/// blank description.
pub async fn match_actor(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let description = match payload
        .get("characterDescription")
        .and_then(Value::as_str)
        .filter(|d| !d.trim().is_empty())
    {
        Some(d) => d.to_string(),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: "Missing or invalid characterDescription in request body.".to_string(),
                }),
            )
                .into_response();
        }
    };

    tracing::info!("Analyzing character: {}...", truncate_chars(&description, 100));

    let reply = match state
        .ai
        .generate_content(&build_user_prompt(&description), Some(SYSTEM_INSTRUCTION))
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("Error in match-actor handler: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiFailure {
                    error: "An error occurred while processing your request.".to_string(),
                    message: Some(e.to_string()),
                }),
            )
                .into_response();
        }
    };

    let recommendations = parse_recommendations(&reply);

    Json(MatchResponse {
        character_description: description,
        recommendations,
        timestamp: Utc::now(),
    })
    .into_response()
}

/// Route-level fallback so non-POST methods get the documented JSON body.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiError {
            error: "Method not allowed. Please use POST.".to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, ClientResult, CompletionClient};
    use async_trait::async_trait;
    use axum::{Router, body::Body, http::Request};
    use http_body_util::BodyExt;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use tower::ServiceExt;

    enum StubReply {
        Text(String),
        Upstream(String),
    }

    struct StubClient {
        reply: StubReply,
        calls: AtomicUsize,
    }

    impl StubClient {
        fn returning(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: StubReply::Text(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: StubReply::Upstream(body.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn respond(&self) -> ClientResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                StubReply::Text(text) => Ok(text.clone()),
                StubReply::Upstream(body) => Err(ClientError::Api {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    body: body.clone(),
                }),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for StubClient {
        async fn generate_content(
            &self,
            _user_prompt: &str,
            _system_instruction: Option<&str>,
        ) -> ClientResult<String> {
            self.respond()
        }

        async fn generate_content_with_model(
            &self,
            _user_prompt: &str,
            _model: &str,
            _system_instruction: Option<&str>,
        ) -> ClientResult<String> {
            self.respond()
        }
    }

    fn app(stub: Arc<StubClient>) -> Router {
        crate::routes(Router::new(), AppState { ai: stub })
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/match-actor")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn non_post_is_405_without_outbound_call() {
        let stub = StubClient::returning("[]");
        let request = Request::builder()
            .method("GET")
            .uri("/api/match-actor")
            .body(Body::empty())
            .unwrap();

        let response = app(stub.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("POST"));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_description_is_400_without_outbound_call() {
        let stub = StubClient::returning("[]");
        let response = app(stub.clone()).oneshot(post_json("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("characterDescription")
        );
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn non_string_description_is_400() {
        let stub = StubClient::returning("[]");
        let response = app(stub.clone())
            .oneshot(post_json(r#"{"characterDescription": 42}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_description_is_400() {
        let stub = StubClient::returning("[]");
        let response = app(stub.clone())
            .oneshot(post_json(r#"{"characterDescription": "   \n  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_400_with_json_error() {
        let stub = StubClient::returning("[]");
        let response = app(stub.clone())
            .oneshot(post_json("this is not json{{"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("characterDescription")
        );
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn content_type_header_is_not_required() {
        let stub = StubClient::returning("[]");
        let request = Request::builder()
            .method("POST")
            .uri("/api/match-actor")
            .body(Body::from(r#"{"characterDescription": "a weary detective"}"#))
            .unwrap();

        let response = app(stub.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn well_formed_reply_parses_into_recommendations() {
        let stub = StubClient::returning(
            r#"Sure! Here are the matches:
[
  {"name": "A. Actor", "reasoning": "fits the part", "notableRoles": ["Lead in X"]},
  {"name": "B. Actor", "reasoning": "great range", "notableRoles": []}
]
Hope that helps."#,
        );
        let response = app(stub.clone())
            .oneshot(post_json(r#"{"characterDescription": "a weary detective"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["characterDescription"], "a weary detective");
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0]["name"], "A. Actor");
        assert_eq!(recs[0]["notableRoles"][0], "Lead in X");
        assert!(body["timestamp"].is_string());
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn unparseable_reply_degrades_to_fallback() {
        let raw = "I'm sorry, I cannot produce structured output today. ".repeat(20);
        let stub = StubClient::returning(&raw);
        let response = app(stub)
            .oneshot(post_json(r#"{"characterDescription": "a weary detective"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0]["name"], FALLBACK_NAME);
        let reasoning = recs[0]["reasoning"].as_str().unwrap();
        assert!(reasoning.chars().count() <= FALLBACK_REASONING_LIMIT);
        assert!(raw.starts_with(reasoning));
        assert!(recs[0]["notableRoles"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn client_failure_is_500_with_message() {
        let stub = StubClient::failing("connection reset by upstream");
        let response = app(stub)
            .oneshot(post_json(r#"{"characterDescription": "a weary detective"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "An error occurred while processing your request."
        );
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("502"));
        assert!(message.contains("connection reset by upstream"));
    }

    #[tokio::test]
    async fn echoed_description_is_untrimmed() {
        let stub = StubClient::returning("[]");
        let response = app(stub)
            .oneshot(post_json(r#"{"characterDescription": "  padded input  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["characterDescription"], "  padded input  ");
    }

    #[test]
    fn parse_extracts_array_embedded_in_prose() {
        let reply = r#"Certainly: [{"name": "A", "reasoning": "fits"}] enjoy."#;
        let actors = parse_recommendations(reply);
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "A");
    }

    #[test]
    fn parse_falls_back_when_brackets_are_absent() {
        let actors = parse_recommendations("no structure here");
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, FALLBACK_NAME);
        assert_eq!(actors[0].reasoning, "no structure here");
    }

    #[test]
    fn parse_falls_back_on_invalid_json_between_brackets() {
        let actors = parse_recommendations("[this is not json]");
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, FALLBACK_NAME);
    }

    #[test]
    fn fallback_reasoning_respects_multibyte_boundaries() {
        let reply = "é".repeat(600);
        let actors = parse_recommendations(&reply);
        assert_eq!(actors[0].reasoning.chars().count(), 500);
    }
}
