use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ARC-LITE core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Authentication safeguards
    pub security: SecurityConfig,
    /// Durable key-value storage
    pub storage: StorageConfig,
    /// Auth/database backend (absent means offline)
    pub backend: Option<BackendConfig>,
    /// CSV report output
    pub reports: ReportConfig,
}

/// Security utility configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Maximum attempts per action within the window
    pub max_attempts: usize,
    /// Sliding window width in milliseconds
    pub window_ms: i64,
    /// Number of security events kept in memory
    pub event_log_capacity: usize,
    /// Emit a diagnostic trace for every security event
    pub development: bool,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file; an in-memory store is used when unset
    pub db_path: Option<PathBuf>,
}

/// Backend-as-a-service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://project.supabase.co`
    pub url: String,
    /// Public anonymous API key
    pub anon_key: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory that downloaded CSV files are saved into
    pub output_dir: PathBuf,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        SecurityConfig {
            max_attempts: 5,
            window_ms: 300_000,
            event_log_capacity: 100,
            development: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            security: SecurityConfig::default(),
            storage: StorageConfig {
                db_path: Some(PathBuf::from("arclite.db")),
            },
            backend: None,
            reports: ReportConfig {
                output_dir: PathBuf::from("reports"),
            },
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_security_limits() {
        let config = Config::default();
        assert_eq!(config.security.max_attempts, 5);
        assert_eq!(config.security.window_ms, 300_000);
        assert_eq!(config.security.event_log_capacity, 100);
        assert!(!config.security.development);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.security.development = true;
        config.backend = Some(BackendConfig {
            url: "https://example.supabase.co".to_string(),
            anon_key: "anon".to_string(),
            timeout_seconds: 10,
        });
        config.to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert!(loaded.security.development);
        assert_eq!(loaded.backend.unwrap().anon_key, "anon");
        assert_eq!(loaded.reports.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(&PathBuf::from("/nonexistent/arclite.toml"));
        assert!(result.is_err());
    }
}
