//! Tracing setup for the server
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to the
//! quicknotes crates and tower-http's request traces.

use std::fs::OpenOptions;
use std::sync::Mutex;

use quicknotes_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// Logs go to `config.log_file` when set, stderr otherwise. A log file that
/// cannot be opened falls back to stderr with a warning.
pub fn init(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    if let Some(log_path) = &config.log_file {
        match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(file) => {
                // Ignore error if already initialized
                let _ = builder
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                info!("Logging to {:?}", log_path);
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            }
        }
    }

    let _ = builder.with_writer(std::io::stderr).try_init();
}

/// The binary's own events are targeted at `quicknotes::*`
fn default_directives(level: &str) -> String {
    format!(
        "quicknotes_core={level},quicknotes={level},tower_http={level}",
        level = level
    )
}
