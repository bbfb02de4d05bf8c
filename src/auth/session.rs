// Session issuing boundary.
// The gate only ever talks to a SessionProvider; what sits behind it is opaque.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_UNIVERSITY: &str = "Ohio State University";

/// What the gate hands to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub email: String,
    pub password: String,
    pub redirect: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub is_verified: bool,
    pub university: Option<String>,
}

/// Result of a provider call that completed normally.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Issued(Session),
    /// The provider answered with an error marker
    Rejected(String),
}

/// The provider itself failed to answer
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session provider unavailable: {0}")]
    Unavailable(String),

    #[error("Session provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn issue(&self, request: &SessionRequest) -> Result<SessionOutcome, SessionError>;
}

/// Demo provider: accepts any credentials that reach it.
#[derive(Debug, Default, Clone)]
pub struct DemoSessionProvider;

impl DemoSessionProvider {
    pub fn new() -> Self {
        DemoSessionProvider
    }
}

#[async_trait]
impl SessionProvider for DemoSessionProvider {
    async fn issue(&self, request: &SessionRequest) -> Result<SessionOutcome, SessionError> {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            email: request.email.clone(),
            issued_at: Utc::now(),
            is_verified: true,
            university: Some(DEFAULT_UNIVERSITY.to_string()),
        };
        info!("Demo session issued for {}", request.email);
        Ok(SessionOutcome::Issued(session))
    }
}
