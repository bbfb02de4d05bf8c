// src/auth/mod.rs
//! Credential gate
//!
//! Sign-in and sign-up checks that run before a session provider is
//! contacted. Only university addresses get through, and sign-up also
//! requires an age between 16 and 50. Passwords are never checked here:
//! whatever the provider accepts is accepted.

use chrono::NaiveDate;
use log::{debug, error, info, warn};
use thiserror::Error;

pub mod age;
pub mod session;

pub use age::{age_on, parse_birth_date, validate_age, MAX_AGE, MIN_AGE};
pub use session::{
    DemoSessionProvider, Session, SessionError, SessionOutcome, SessionProvider, SessionRequest,
};

/// Email suffixes accepted at sign-in and sign-up
pub const UNIVERSITY_DOMAINS: [&str; 2] = ["@buckeyemail.osu.edu", "@osu.edu"];

/// Password sent to the provider on sign-up, the form has no password field
pub const SIGN_UP_PASSWORD: &str = "demo123";

/// User-visible authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email does not end in a university domain
    #[error("Please use your OSU BuckeyeMail address")]
    DomainMismatch,

    #[error("Please enter your {0}")]
    MissingField(&'static str),

    #[error("Please enter a valid date of birth (YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("You must be between 16 and 50 years old to join")]
    AgeOutOfRange { age: i32 },

    /// Provider rejected a sign-in
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Provider rejected a sign-up
    #[error("Failed to create account")]
    AccountCreationFailed,

    #[error("Something went wrong. Please try again.")]
    Unexpected(#[from] SessionError),
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
}

pub fn is_university_email(email: &str) -> bool {
    UNIVERSITY_DOMAINS.iter().any(|domain| email.ends_with(domain))
}

fn check_domain(email: &str) -> Result<(), AuthError> {
    if !is_university_email(email) {
        warn!("Rejected non-university email: {}", email);
        return Err(AuthError::DomainMismatch);
    }
    Ok(())
}

/// Sign in with an existing account.
pub async fn sign_in<P>(provider: &P, email: &str, password: &str) -> Result<Session, AuthError>
where
    P: SessionProvider + ?Sized,
{
    check_domain(email)?;

    let request = SessionRequest {
        email: email.to_string(),
        password: password.to_string(),
        redirect: false,
    };
    match provider.issue(&request).await {
        Ok(SessionOutcome::Issued(session)) => {
            info!("Signed in as {}", session.email);
            Ok(session)
        }
        Ok(SessionOutcome::Rejected(marker)) => {
            warn!("Sign-in rejected for {}: {}", email, marker);
            Err(AuthError::InvalidCredentials)
        }
        Err(e) => {
            error!("Session provider failed during sign-in: {}", e);
            Err(AuthError::Unexpected(e))
        }
    }
}

/// Create an account and sign straight into it.
///
/// Checks run in order: email domain, presence of a birth date, age range.
/// The provider is only called once all of them pass.
pub async fn sign_up<P>(provider: &P, form: &SignUpForm, today: NaiveDate) -> Result<Session, AuthError>
where
    P: SessionProvider + ?Sized,
{
    check_domain(&form.email)?;
    let age = validate_age(form.date_of_birth, today)?;
    debug!("Sign-up for {} passed validation (age {})", form.email, age);

    let request = SessionRequest {
        email: form.email.clone(),
        password: SIGN_UP_PASSWORD.to_string(),
        redirect: false,
    };
    match provider.issue(&request).await {
        Ok(SessionOutcome::Issued(session)) => {
            info!("Account created for {} ({})", form.name, session.email);
            Ok(session)
        }
        Ok(SessionOutcome::Rejected(marker)) => {
            warn!("Sign-up rejected for {}: {}", form.email, marker);
            Err(AuthError::AccountCreationFailed)
        }
        Err(e) => {
            error!("Session provider failed during sign-up: {}", e);
            Err(AuthError::Unexpected(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_university_domains() {
        assert!(is_university_email("buckeye.1@osu.edu"));
        assert!(is_university_email("buckeye.1@buckeyemail.osu.edu"));
        assert!(!is_university_email("buckeye@gmail.com"));
        assert!(!is_university_email("buckeye@osu.edu.evil.com"));
        assert!(!is_university_email("osu.edu"));
        // Suffix match is exact, no case folding
        assert!(!is_university_email("buckeye.1@OSU.EDU"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AuthError::DomainMismatch.to_string(), "Please use your OSU BuckeyeMail address");
        assert_eq!(AuthError::MissingField("date of birth").to_string(), "Please enter your date of birth");
        assert_eq!(
            AuthError::AgeOutOfRange { age: 12 }.to_string(),
            "You must be between 16 and 50 years old to join"
        );
        assert_eq!(
            AuthError::Unexpected(SessionError::Unavailable("down".into())).to_string(),
            "Something went wrong. Please try again."
        );
    }
}
