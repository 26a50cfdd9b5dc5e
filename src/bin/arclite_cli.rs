use std::path::PathBuf;
use std::sync::Arc;

use structopt::StructOpt;

use arclite::auth::AuthFlow;
use arclite::backend::BackendClient;
use arclite::config::Config;
use arclite::output::{OutputFormat, OutputHandler};
use arclite::persistence::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
use arclite::reports::{self, DirectoryFileSaver, ReportKind};
use arclite::security::{validate_password_strength, RateLimiter, SecurityLogger};

/// ARC-LITE dashboard core command line interface
#[derive(StructOpt, Debug)]
#[structopt(name = "arclite_cli", about = "ARC-LITE security and reporting utilities")]
pub enum Cli {
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "arclite.toml")]
        output: PathBuf,
    },
    /// Check a password against the strength rules
    CheckPassword {
        password: String,
    },
    /// Export an energy report as CSV
    Report {
        /// Path to configuration file
        #[structopt(short, long, default_value = "arclite.toml")]
        config: PathBuf,
        /// Report kind: "used" or "saved"
        #[structopt(short, long, default_value = "used")]
        kind: String,
        /// File name inside the configured output directory
        #[structopt(short, long)]
        output: Option<String>,
        /// Skip the backend and export the fallback rows
        #[structopt(long)]
        offline: bool,
    },
    /// Sign in against the configured backend
    SignIn {
        #[structopt(flatten)]
        auth: AuthArgs,
    },
    /// Create an account on the configured backend
    SignUp {
        #[structopt(flatten)]
        auth: AuthArgs,
    },
}

#[derive(StructOpt, Debug)]
pub struct AuthArgs {
    /// Path to configuration file
    #[structopt(short, long, default_value = "arclite.toml")]
    config: PathBuf,
    #[structopt(short, long)]
    email: String,
    #[structopt(short, long)]
    password: String,
    /// Security event output: "console", "json" or "jsonl"
    #[structopt(short, long, default_value = "console")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match Cli::from_args() {
        Cli::Config { output } => {
            let config = Config::default();
            config.to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
        }
        Cli::CheckPassword { password } => {
            let strength = validate_password_strength(&password);
            if strength.is_valid {
                println!("Password meets all requirements");
            } else {
                for error in &strength.errors {
                    println!("  - {}", error);
                }
                std::process::exit(1);
            }
        }
        Cli::Report {
            config,
            kind,
            output,
            offline,
        } => {
            let config = load_config(&config)?;
            let kind = match kind.to_lowercase().as_str() {
                "used" => ReportKind::EnergyUsed,
                "saved" => ReportKind::EnergySaved,
                other => {
                    eprintln!("Unknown report kind: {} (expected \"used\" or \"saved\")", other);
                    std::process::exit(1);
                }
            };

            let rows = match (&config.backend, offline) {
                (Some(backend), false) => reports::load_rows(&BackendClient::new(backend)?).await,
                _ => reports::fallback_rows(),
            };

            let content = reports::generate_csv(kind, &rows);
            let filename = output.unwrap_or_else(|| kind.default_filename().to_string());
            let saver = DirectoryFileSaver::new(&config.reports.output_dir);
            reports::download_csv(&saver, &content, &filename)?;
            println!(
                "Wrote {} row(s) to {:?}",
                rows.len(),
                saver.target_path(&filename)?
            );
        }
        Cli::SignIn { auth } => run_auth(auth, false).await?,
        Cli::SignUp { auth } => run_auth(auth, true).await?,
    }

    Ok(())
}

fn load_config(path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        Config::from_file(path)
    } else {
        log::warn!("Config file {:?} not found, using defaults", path);
        Ok(Config::default())
    }
}

async fn run_auth(args: AuthArgs, sign_up: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let backend = match config.backend {
        Some(ref backend) => BackendClient::new(backend)?,
        None => {
            eprintln!("No [backend] section in configuration");
            std::process::exit(1);
        }
    };

    let store: Arc<dyn KeyValueStore> = match config.storage.db_path {
        Some(ref path) => Arc::new(SqliteKeyValueStore::new(path)?),
        None => Arc::new(MemoryKeyValueStore::new()),
    };
    let limiter = RateLimiter::with_config(
        store,
        config.security.max_attempts,
        config.security.window_ms,
    );
    let logger = SecurityLogger::with_config(
        config.security.event_log_capacity,
        config.security.development,
    );

    let flow = AuthFlow::new(backend, Arc::new(logger), Arc::new(limiter));
    let result = if sign_up {
        flow.sign_up(&args.email, &args.password).await
    } else {
        flow.sign_in(&args.email, &args.password).await
    };

    let mut output = OutputHandler::new(OutputFormat::from_str(&args.format), None)?;
    output.write_events(&flow.logger().events())?;
    output.flush()?;

    match result {
        Ok(session) => {
            println!("Authenticated as {}", session.user.id);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
