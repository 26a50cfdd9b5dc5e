//! In-memory security event log
//!
//! Keeps a capped, append-only trail of authentication-related events for
//! diagnostics. The log is never persisted.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};

use crate::models::{NewSecurityEvent, SecurityEvent};

pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Capped audit trail of security events
///
/// Construct one per application and share it by reference (or `Arc`).
pub struct SecurityLogger {
    events: Mutex<VecDeque<SecurityEvent>>,
    capacity: usize,
    user_agent: String,
    development: bool,
}

impl SecurityLogger {
    /// Create a logger with the default capacity
    pub fn new() -> Self {
        Self::with_config(DEFAULT_EVENT_CAPACITY, false)
    }

    /// Create a logger with a custom capacity and development tracing
    pub fn with_config(capacity: usize, development: bool) -> Self {
        SecurityLogger {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            user_agent: default_user_agent(),
            development,
        }
    }

    /// Override the host identity recorded as `userAgent`
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Stamp and append an event, evicting the oldest beyond capacity
    pub fn log_event(&self, event: NewSecurityEvent) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let event = SecurityEvent::stamp(event, timestamp, &self.user_agent);

        if let Some(line) = self.trace_line(&event) {
            log::info!("{}", line);
        }

        let mut events = match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push_back(event);
        while events.len() > self.capacity {
            events.pop_front();
        }
    }

    /// Diagnostic line emitted for `event` in development mode
    fn trace_line(&self, event: &SecurityEvent) -> Option<String> {
        if self.development {
            Some(format!("[Security Event] {:?}", event))
        } else {
            None
        }
    }

    /// Snapshot of the current log, oldest first
    pub fn events(&self) -> Vec<SecurityEvent> {
        match self.events.lock() {
            Ok(guard) => guard.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn clear_events(&self) {
        match self.events.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    pub fn len(&self) -> usize {
        match self.events.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

fn default_user_agent() -> String {
    format!(
        "arclite/{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
