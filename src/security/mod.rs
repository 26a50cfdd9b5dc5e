//! Client-side security utilities
//!
//! Event logging, credential sanitizing and rate limiting used by the
//! authentication flow.

pub mod logger;
pub mod rate_limiter;
pub mod sanitize;

pub use logger::SecurityLogger;
pub use rate_limiter::{Clock, ManualClock, RateLimiter, SystemClock};
pub use sanitize::{sanitize_email, sanitize_password, validate_password_strength, PasswordStrength};
