//! Backend-as-a-service collaborator
//!
//! The dashboard authenticates operators and reads report data from a
//! Supabase-compatible service. These traits describe the small part of
//! its contract the core relies on, so flows can be tested against fakes.

pub mod client;

pub use client::BackendClient;

use std::future::Future;

use thiserror::Error;

use crate::models::{AuthSession, EnergyReportRow, UserProfile};

/// Errors that can occur while talking to the backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Record already exists")]
    AlreadyExists,
}

/// Email/password authentication
pub trait AuthProvider {
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthSession, BackendError>> + Send;

    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthSession, BackendError>> + Send;
}

/// Operator profiles keyed by auth user id
pub trait UserDirectory {
    fn find_user_profile(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserProfile>, BackendError>> + Send;

    fn insert_user_profile(
        &self,
        user_id: &str,
        profile: &UserProfile,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Daily energy figures per street light
pub trait EnergyReportSource {
    fn fetch_energy_reports(
        &self,
    ) -> impl Future<Output = Result<Vec<EnergyReportRow>, BackendError>> + Send;
}
