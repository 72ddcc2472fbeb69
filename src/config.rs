//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Interface to bind the HTTP server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port. Hosting platforms inject `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Emol Feeds ===
    /// Candidate roster CSV feed.
    #[serde(default = "default_csv_url")]
    pub emol_csv_url: String,

    /// Zone database JSON feed (seat counts and region names).
    #[serde(default = "default_db_url")]
    pub emol_db_url: String,

    /// External poll (encuestas) API.
    #[serde(default = "default_encuestas_url")]
    pub encuestas_url: String,

    /// Outbound HTTP timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Electoral Parameters ===
    /// Path to the pact registry JSON file.
    #[serde(default = "default_pactos_path")]
    pub pactos_path: String,

    /// Minimum similarity for a poll entry to match a candidate (0-1).
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,

    /// Seat count used when a district is missing from the zone database.
    #[serde(default = "default_seats")]
    pub default_seats: u32,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_csv_url() -> String {
    "https://www.emol.com/especiales/2025/nacional/elecciones/data/dip.csv".to_string()
}

fn default_db_url() -> String {
    "https://www.emol.com/especiales/2025/nacional/elecciones/data/db.json".to_string()
}

fn default_encuestas_url() -> String {
    "https://dhondt.azurewebsites.net/api/encuestas".to_string()
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_pactos_path() -> String {
    "data/pactos.json".to_string()
}

fn default_match_threshold() -> f64 {
    0.8
}

fn default_seats() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if !(self.match_threshold > 0.0 && self.match_threshold <= 1.0) {
            return Err("MATCH_THRESHOLD must be in (0, 1]".to_string());
        }

        if self.default_seats == 0 {
            return Err("DEFAULT_SEATS must be at least 1".to_string());
        }

        for (name, value) in [
            ("EMOL_CSV_URL", &self.emol_csv_url),
            ("EMOL_DB_URL", &self.emol_db_url),
            ("ENCUESTAS_URL", &self.encuestas_url),
        ] {
            Url::parse(value).map_err(|e| format!("{} is not a valid URL: {}", name, e))?;
        }

        Ok(())
    }
}
