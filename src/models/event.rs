use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityEventType {
    AuthSuccess,
    AuthFailure,
    AuthAttempt,
    SuspiciousActivity,
}

impl SecurityEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityEventType::AuthSuccess => "AUTH_SUCCESS",
            SecurityEventType::AuthFailure => "AUTH_FAILURE",
            SecurityEventType::AuthAttempt => "AUTH_ATTEMPT",
            SecurityEventType::SuspiciousActivity => "SUSPICIOUS_ACTIVITY",
        }
    }
}

/// Event as submitted by callers; the logger stamps the rest
#[derive(Debug, Clone, PartialEq)]
pub struct NewSecurityEvent {
    pub event_type: SecurityEventType,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub provider: Option<String>,
    pub error_message: Option<String>,
    pub ip_address: Option<String>,
}

impl NewSecurityEvent {
    pub fn new(event_type: SecurityEventType) -> Self {
        NewSecurityEvent {
            event_type,
            user_id: None,
            email: None,
            provider: None,
            error_message: None,
            ip_address: None,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }
}

/// Authentication-related audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    #[serde(rename = "type")]
    pub event_type: SecurityEventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// ISO-8601, UTC
    pub timestamp: String,
    pub user_agent: String,
}

impl SecurityEvent {
    pub(crate) fn stamp(event: NewSecurityEvent, timestamp: String, user_agent: &str) -> Self {
        SecurityEvent {
            event_type: event.event_type,
            user_id: event.user_id,
            email: event.email,
            provider: event.provider,
            error_message: event.error_message,
            ip_address: event.ip_address,
            timestamp,
            user_agent: user_agent.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = SecurityEvent::stamp(
            NewSecurityEvent::new(SecurityEventType::AuthFailure)
                .email("ops@arc-lite.com")
                .error_message("Invalid login credentials"),
            "2024-01-15T10:00:00.000Z".to_string(),
            "arclite-test",
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "AUTH_FAILURE");
        assert_eq!(json["email"], "ops@arc-lite.com");
        assert_eq!(json["errorMessage"], "Invalid login credentials");
        assert_eq!(json["userAgent"], "arclite-test");
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn test_type_names_match_serde() {
        for t in [
            SecurityEventType::AuthSuccess,
            SecurityEventType::AuthFailure,
            SecurityEventType::AuthAttempt,
            SecurityEventType::SuspiciousActivity,
        ] {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }
}
