//! Sign-in and sign-up flow
//!
//! Wires the security utilities around the auth backend: credentials are
//! sanitized, attempts are rate limited per email, and every step is
//! recorded in the security event log.

pub mod registration;

pub use registration::{Registration, RegistrationError};

use std::sync::Arc;

use thiserror::Error;

use crate::backend::{AuthProvider, BackendError};
use crate::models::{AuthSession, NewSecurityEvent, SecurityEventType};
use crate::security::{sanitize_email, sanitize_password, validate_password_strength, RateLimiter, SecurityLogger};

const PROVIDER: &str = "email";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Too many attempts. Please wait before trying again.")]
    RateLimited,

    #[error("Password does not meet requirements: {}", .0.join("; "))]
    WeakPassword(Vec<String>),

    #[error(transparent)]
    Provider(#[from] BackendError),
}

/// Authentication flow shared by the login and registration pages
pub struct AuthFlow<P> {
    provider: P,
    logger: Arc<SecurityLogger>,
    limiter: Arc<RateLimiter>,
}

impl<P: AuthProvider> AuthFlow<P> {
    pub fn new(provider: P, logger: Arc<SecurityLogger>, limiter: Arc<RateLimiter>) -> Self {
        AuthFlow {
            provider,
            logger,
            limiter,
        }
    }

    pub fn logger(&self) -> &SecurityLogger {
        &self.logger
    }

    /// Sign in with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = sanitize_email(email);
        let password = sanitize_password(password);

        self.guard(&format!("login:{}", email), &email)?;
        self.record(NewSecurityEvent::new(SecurityEventType::AuthAttempt).email(&email));

        let result = self.provider.sign_in(&email, &password).await;
        self.finish(&email, result)
    }

    /// Create an account; the password must pass the strength rules first
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = sanitize_email(email);
        let password = sanitize_password(password);

        let strength = validate_password_strength(&password);
        if !strength.is_valid {
            self.record(
                NewSecurityEvent::new(SecurityEventType::AuthFailure)
                    .email(&email)
                    .error_message(strength.errors.join("; ")),
            );
            return Err(AuthError::WeakPassword(strength.errors));
        }

        self.guard(&format!("signup:{}", email), &email)?;
        self.record(NewSecurityEvent::new(SecurityEventType::AuthAttempt).email(&email));

        let result = self.provider.sign_up(&email, &password).await;
        self.finish(&email, result)
    }

    fn guard(&self, action: &str, email: &str) -> Result<(), AuthError> {
        if self.limiter.check(action) {
            return Ok(());
        }

        log::warn!("Rate limit exceeded for {}", action);
        self.record(
            NewSecurityEvent::new(SecurityEventType::SuspiciousActivity)
                .email(email)
                .error_message("Rate limit exceeded"),
        );
        Err(AuthError::RateLimited)
    }

    fn finish(
        &self,
        email: &str,
        result: Result<AuthSession, BackendError>,
    ) -> Result<AuthSession, AuthError> {
        match result {
            Ok(session) => {
                self.record(
                    NewSecurityEvent::new(SecurityEventType::AuthSuccess)
                        .email(email)
                        .user_id(&session.user.id),
                );
                Ok(session)
            }
            Err(e) => {
                self.record(
                    NewSecurityEvent::new(SecurityEventType::AuthFailure)
                        .email(email)
                        .error_message(e.to_string()),
                );
                Err(e.into())
            }
        }
    }

    fn record(&self, event: NewSecurityEvent) {
        self.logger.log_event(event.provider(PROVIDER));
    }
}
