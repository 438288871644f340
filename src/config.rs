//! Command line configuration
//!
//! Provides CLI argument parsing and validation for both roles. The role is
//! chosen by the presence of the positional host argument.

use crate::protocol::DEFAULT_PORT;
use clap::Parser;
use std::time::Duration;
use tracing::debug;

/// Number of rounds an initiator runs by default
pub const DEFAULT_EXCHANGES: usize = 10;

/// Per-round receive timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

#[derive(Parser, Debug, Clone)]
#[command(name = "asymmetry")]
#[command(about = "Clock offset asymmetry probe over UDP")]
pub struct Config {
    /// Responder host to probe; runs as the responder when omitted
    pub host: Option<String>,

    /// UDP port to probe (initiator) or to bind (responder)
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Responder bind address
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Number of probe exchanges to run
    #[arg(long, default_value_t = DEFAULT_EXCHANGES)]
    pub exchanges: usize,

    /// Per-exchange receive timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,
}

/// Role selected by the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Responder,
    Initiator(String),
}

impl Config {
    pub fn mode(&self) -> Mode {
        match &self.host {
            Some(host) => Mode::Initiator(host.clone()),
            None => Mode::Responder,
        }
    }

    /// Returns the configured timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Address the responder binds to (bind:port)
    pub fn responder_address(&self) -> String {
        join_host_port(&self.bind, self.port)
    }

    /// Address the initiator probes (host:port)
    pub fn initiator_address(&self, host: &str) -> String {
        join_host_port(host, self.port)
    }

    /// Validates the configuration values
    pub fn validate(&self) -> Result<(), String> {
        debug!("Validating configuration");

        if self.port == 0 {
            return Err("port must be > 0".into());
        }

        if self.exchanges == 0 {
            return Err("exchanges must be > 0".into());
        }

        if self.timeout_ms == 0 {
            return Err("timeout must be > 0".into());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            ));
        }

        debug!("Configuration validated successfully");
        Ok(())
    }

    /// Returns true if JSON format logging is enabled
    pub fn is_json_format(&self) -> bool {
        self.log_format.to_lowercase() == "json"
    }
}

// Bare IPv6 literals need brackets before a port can be appended.
fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}
