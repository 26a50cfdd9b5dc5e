use serde::{Deserialize, Serialize};

/// Authenticated user as returned by the auth backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session issued after a successful sign-in or sign-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Absent when sign-up requires email confirmation first
    #[serde(default)]
    pub access_token: Option<String>,
    pub user: AuthUser,
}

/// Operator profile stored in the `users` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
