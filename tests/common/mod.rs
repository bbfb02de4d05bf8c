// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{info, LevelFilter};

use friendbridge::auth::{Session, SessionError, SessionOutcome, SessionProvider, SessionRequest};

// Initialize logging once
static INIT_LOGGER: Once = Once::new();

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

/// Fixed "today" so age checks do not drift with the calendar
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    Issue,
    Reject,
    Fail,
}

/// Session provider that records every request it receives.
#[derive(Clone)]
pub struct CountingProvider {
    behaviour: Behaviour,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<SessionRequest>>>,
}

impl CountingProvider {
    pub fn new(behaviour: Behaviour) -> Self {
        CountingProvider {
            behaviour,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SessionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SessionProvider for CountingProvider {
    async fn issue(&self, request: &SessionRequest) -> Result<SessionOutcome, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        info!("Test provider called for {} ({:?})", request.email, self.behaviour);

        match self.behaviour {
            Behaviour::Issue => Ok(SessionOutcome::Issued(Session {
                token: format!("test-token-{}", self.calls()),
                email: request.email.clone(),
                issued_at: Utc::now(),
                is_verified: true,
                university: None,
            })),
            Behaviour::Reject => Ok(SessionOutcome::Rejected("CredentialsSignin".to_string())),
            Behaviour::Fail => Err(SessionError::Unavailable("provider offline".to_string())),
        }
    }
}
