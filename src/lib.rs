pub mod auth;
pub mod backend;
pub mod config;
pub mod models;
pub mod output;
pub mod persistence;
pub mod reports;
pub mod security;

// Re-export commonly used types
pub use models::{EnergyReportRow, NewSecurityEvent, SecurityEvent, SecurityEventType};
pub use security::{RateLimiter, SecurityLogger};
pub use persistence::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use reports::{download_csv, generate_energy_saved_csv, generate_energy_used_csv};
pub use auth::{AuthError, AuthFlow, Registration};
pub use backend::BackendClient;
