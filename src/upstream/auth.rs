use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::upstream::UpstreamError;

/// What the auth service said about a credential. `Invalid` is a clean answer
/// from a healthy dependency and must never be fed to a breaker as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Valid {
        user_id: i64,
        username: Option<String>,
    },
    Invalid,
}

#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify_session(&self, token: &str) -> Result<SessionCheck, UpstreamError>;
}

/// Auth verifier backed by the auth service's `POST /validate` endpoint.
pub struct HttpAuthVerifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthVerifier {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    valid: bool,
    user_id: Option<i64>,
    username: Option<String>,
}

#[async_trait]
impl AuthVerifier for HttpAuthVerifier {
    async fn verify_session(&self, token: &str) -> Result<SessionCheck, UpstreamError> {
        let response = self
            .client
            .post(format!("{}/validate", self.base_url))
            .json(&json!({ "token": token }))
            .send()
            .await?;

        let status = response.status();
        // 401 means the verifier answered: the credential is bad.
        if status == StatusCode::UNAUTHORIZED {
            return Ok(SessionCheck::Invalid);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|_| UpstreamError::MalformedResponse)?;

        if !body.valid {
            return Ok(SessionCheck::Invalid);
        }
        let user_id = body.user_id.ok_or(UpstreamError::MalformedResponse)?;

        Ok(SessionCheck::Valid {
            user_id,
            username: body.username,
        })
    }
}
