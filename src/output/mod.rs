use crate::models::SecurityEvent;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Output handler for security event snapshots
pub struct OutputHandler {
    format: OutputFormat,
    writer: Option<Box<dyn Write + Send>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputFormat {
    Json,
    Jsonl,
    Console,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "jsonl" => OutputFormat::Jsonl,
            "console" => OutputFormat::Console,
            _ => OutputFormat::Console, // Default
        }
    }
}

impl OutputHandler {
    /// Create a new output handler; without a file path output goes to stdout
    pub fn new(format: OutputFormat, file_path: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let writer: Option<Box<dyn Write + Send>> = match file_path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Some(Box::new(BufWriter::new(file)))
            }
            None => None,
        };

        Ok(OutputHandler { format, writer })
    }

    /// Write a single security event
    pub fn write_event(&mut self, event: &SecurityEvent) -> Result<(), Box<dyn std::error::Error>> {
        let output = Self::render(&self.format, event)?;
        self.write_output(&output)
    }

    /// Write every event of a snapshot, oldest first
    pub fn write_events(&mut self, events: &[SecurityEvent]) -> Result<(), Box<dyn std::error::Error>> {
        for event in events {
            self.write_event(event)?;
        }
        Ok(())
    }

    fn render(format: &OutputFormat, event: &SecurityEvent) -> Result<String, serde_json::Error> {
        Ok(match format {
            OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(event)?),
            OutputFormat::Jsonl => format!("{}\n", serde_json::to_string(event)?),
            OutputFormat::Console => format!(
                "[{}] {} email={} user={}{}\n",
                event.timestamp,
                event.event_type.as_str(),
                event.email.as_deref().unwrap_or("-"),
                event.user_id.as_deref().unwrap_or("-"),
                event
                    .error_message
                    .as_deref()
                    .map(|m| format!(" error=\"{}\"", m))
                    .unwrap_or_default()
            ),
        })
    }

    fn write_output(&mut self, data: &str) -> Result<(), Box<dyn std::error::Error>> {
        match &mut self.writer {
            Some(writer) => {
                writer.write_all(data.as_bytes())?;
                writer.flush()?;
            }
            None => {
                print!("{}", data);
                std::io::stdout().flush()?;
            }
        }
        Ok(())
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewSecurityEvent, SecurityEventType};
    use crate::security::SecurityLogger;
    use tempfile::tempdir;

    fn sample_events() -> Vec<SecurityEvent> {
        let logger = SecurityLogger::new().with_user_agent("test-agent");
        logger.log_event(NewSecurityEvent::new(SecurityEventType::AuthAttempt).email("ops@arc-lite.com"));
        logger.log_event(
            NewSecurityEvent::new(SecurityEventType::AuthFailure)
                .email("ops@arc-lite.com")
                .error_message("Invalid login credentials"),
        );
        logger.events()
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("jsonl"), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::from_str("anything"), OutputFormat::Console);
    }

    #[test]
    fn test_jsonl_file_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let mut handler = OutputHandler::new(OutputFormat::Jsonl, Some(path.clone())).unwrap();
        handler.write_events(&sample_events()).unwrap();
        handler.flush().unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: SecurityEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.event_type, SecurityEventType::AuthFailure);
        assert_eq!(second.user_agent, "test-agent");
    }

    #[test]
    fn test_console_line() {
        let events = sample_events();
        let line = OutputHandler::render(&OutputFormat::Console, &events[1]).unwrap();

        assert!(line.contains("AUTH_FAILURE email=ops@arc-lite.com user=- error=\"Invalid login credentials\""));
        assert!(line.ends_with('\n'));
    }
}
