//! Operator profile registration
//!
//! After signing in, an operator registers a profile (name and email)
//! against their auth user id.

use thiserror::Error;

use crate::backend::{BackendError, UserDirectory};
use crate::models::UserProfile;
use crate::security::sanitize_email;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("This email is already registered.")]
    EmailAlreadyRegistered,

    #[error("Failed to save user information. Please try again.")]
    SaveFailed(#[source] BackendError),
}

pub struct Registration<D> {
    directory: D,
}

impl<D: UserDirectory> Registration<D> {
    pub fn new(directory: D) -> Self {
        Registration { directory }
    }

    /// The profile registered for `user_id`, if any
    ///
    /// Lookup failures are logged and reported as "not registered".
    pub async fn check_registration(&self, user_id: &str) -> Option<UserProfile> {
        match self.directory.find_user_profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                log::error!("Error checking user registration for {}: {}", user_id, e);
                None
            }
        }
    }

    /// Store a profile for `user_id`
    pub async fn register(&self, user_id: &str, profile: UserProfile) -> Result<UserProfile, RegistrationError> {
        let profile = UserProfile {
            first_name: profile.first_name.trim().to_string(),
            last_name: profile.last_name.trim().to_string(),
            email: sanitize_email(&profile.email),
        };

        match self.directory.insert_user_profile(user_id, &profile).await {
            Ok(()) => {
                log::info!("Registered profile for user {}", user_id);
                Ok(profile)
            }
            Err(BackendError::AlreadyExists) => Err(RegistrationError::EmailAlreadyRegistered),
            Err(e) => {
                log::error!("Error registering user {}: {}", user_id, e);
                Err(RegistrationError::SaveFailed(e))
            }
        }
    }
}
