//! Directory-service client.
//!
//! [`DirectoryService`] is the capability surface the orchestrator
//! drives: authenticate once, then apply or delete exactly one policy.
//! [`RestClient`] is the production implementation against the
//! controller's REST API; tests substitute an in-memory fake.

use crate::credentials::Credentials;
use crate::policy::{Policy, PolicyKey};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Request timeout applied to every call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Capability surface of the directory service.
#[async_trait]
pub trait DirectoryService {
    /// Establish an authenticated session.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ServiceError>;

    /// Create or replace a policy on the service.
    async fn apply(&self, session: &Session, policy: &Policy) -> Result<(), ServiceError>;

    /// Remove the policy addressed by `key` from the service.
    ///
    /// A policy the service does not have is reported as
    /// [`ServiceError::NotFound`]; the caller decides whether that
    /// counts as success.
    async fn delete(&self, session: &Session, key: &PolicyKey) -> Result<(), ServiceError>;
}

/// Authenticated connection to the directory service.
///
/// Only ever produced by a successful `authenticate` call, and used for
/// exactly one operation before being dropped.
#[derive(Clone)]
pub struct Session {
    endpoint: String,
    token: String,
}

impl Session {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    #[error("policy not found")]
    NotFound,

    #[error("{0}")]
    Rejected(String),

    #[error("unexpected response: {0}")]
    Protocol(String),
}

/// Production client for the controller's REST API.
///
/// Sessions are opened with `POST /api/v1/sessions`; policies live at
/// `/api/v1/enterprises/{enterprise}/domains/{domain}/policies/{id}`.
/// Apply is a PUT on that resource, so repeating it replaces rather
/// than duplicates.
pub struct RestClient {
    http: reqwest::Client,
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    token: String,
}

impl RestClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    fn policy_url(session: &Session, key: &PolicyKey) -> String {
        format!(
            "{}/api/v1/enterprises/{}/domains/{}/policies/{}",
            session.endpoint(),
            key.enterprise,
            key.domain,
            key.id
        )
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryService for RestClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ServiceError> {
        let endpoint = Url::parse(&credentials.host)?;
        let endpoint = endpoint.as_str().trim_end_matches('/').to_string();

        let response = self
            .http
            .post(format!("{endpoint}/api/v1/sessions"))
            .json(&SessionRequest {
                username: &credentials.username,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ServiceError::AuthRejected(failure_reason(response).await));
        }
        if !status.is_success() {
            return Err(ServiceError::Protocol(format!(
                "session request returned {status}"
            )));
        }

        let body: SessionResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Protocol(e.to_string()))?;

        Ok(Session::new(endpoint, body.token))
    }

    async fn apply(&self, session: &Session, policy: &Policy) -> Result<(), ServiceError> {
        let response = self
            .http
            .put(Self::policy_url(session, &policy.key()))
            .bearer_auth(&session.token)
            .json(policy)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }
        Err(ServiceError::Rejected(failure_reason(response).await))
    }

    async fn delete(&self, session: &Session, key: &PolicyKey) -> Result<(), ServiceError> {
        let response = self
            .http
            .delete(Self::policy_url(session, key))
            .bearer_auth(&session.token)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound);
        }
        if status.is_success() {
            return Ok(());
        }
        Err(ServiceError::Rejected(failure_reason(response).await))
    }
}

/// Pull the most useful reason out of an error response.
async fn failure_reason(response: reqwest::Response) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        error: Option<String>,
    }

    let status = response.status();
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => {
            if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
                if let Some(message) = parsed.message.or(parsed.error) {
                    return message;
                }
            }
            body
        }
        _ => format!("server returned {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_url_addresses_the_scoped_resource() {
        let session = Session::new("https://d.example.com", "tok");
        let key = PolicyKey::new("web", "acme", "production");
        assert_eq!(
            RestClient::policy_url(&session, &key),
            "https://d.example.com/api/v1/enterprises/acme/domains/production/policies/web"
        );
    }

    #[test]
    fn session_debug_redacts_the_token() {
        let session = Session::new("https://d.example.com", "tok-secret");
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("tok-secret"));
    }
}
