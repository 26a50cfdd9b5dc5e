pub mod event;
pub mod report;
pub mod user;

pub use event::{NewSecurityEvent, SecurityEvent, SecurityEventType};
pub use report::EnergyReportRow;
pub use user::{AuthSession, AuthUser, UserProfile};
