//! Client for the Emol election feeds and the external poll API.

use std::collections::HashMap;
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::FeedError;

use super::types::{zone_code, PollEntry, RosterRow, ZoneDb};

/// Client for Emol's roster CSV, zone database and the encuestas API.
#[derive(Debug)]
pub struct EmolClient {
    /// HTTP client for feed requests.
    http: reqwest::Client,
    /// Candidate roster CSV URL.
    csv_url: String,
    /// Zone database JSON URL.
    db_url: String,
    /// External poll API URL.
    encuestas_url: String,
    /// Fallback seat count when a zone is missing from db.json.
    default_seats: u32,
    /// Zone database, fetched once per process.
    zone_db: RwLock<Option<Arc<ZoneDb>>>,
}

impl EmolClient {
    /// Create a new feed client from config.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(500))
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            csv_url: config.emol_csv_url.clone(),
            db_url: config.emol_db_url.clone(),
            encuestas_url: config.encuestas_url.clone(),
            default_seats: config.default_seats,
            zone_db: RwLock::new(None),
        }
    }

    /// Fetch the roster CSV and keep only the rows for one district.
    ///
    /// The feed occasionally carries broken lines; malformed rows are
    /// dropped instead of failing the whole fetch.
    #[instrument(skip(self))]
    pub async fn fetch_roster(&self, numero: u8) -> Result<Vec<RosterRow>, FeedError> {
        let response = self.http.get(&self.csv_url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::FetchFailed {
                url: self.csv_url.clone(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body = response.text().await?;
        let zone = zone_code(numero);

        let mut rows = Vec::new();
        let mut reader = csv::Reader::from_reader(body.as_bytes());
        for record in reader.deserialize::<RosterRow>() {
            let row = match record {
                Ok(row) => row,
                Err(e) => {
                    debug!(error = %e, "dropping malformed roster row");
                    continue;
                }
            };
            if row.zona == zone {
                rows.push(row);
            }
        }

        debug!(distrito = numero, rows = rows.len(), "roster filtered by zone");
        Ok(rows)
    }

    /// The zone database, fetched on first use and cached for the process
    /// lifetime.
    pub async fn zone_db(&self) -> Result<Arc<ZoneDb>, FeedError> {
        if let Some(db) = self.zone_db.read().await.clone() {
            return Ok(db);
        }

        let mut guard = self.zone_db.write().await;
        // Another task may have fetched while we waited for the write lock.
        if let Some(db) = guard.clone() {
            return Ok(db);
        }

        let response = self.http.get(&self.db_url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::FetchFailed {
                url: self.db_url.clone(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let db: ZoneDb = response
            .json()
            .await
            .map_err(|e| FeedError::ParseError(format!("failed to parse zone database: {}", e)))?;

        let db = Arc::new(db);
        *guard = Some(db.clone());
        info!(
            zonas = db.dbzonas.len(),
            fetched_at = %OffsetDateTime::now_utc(),
            "zone database loaded"
        );
        Ok(db)
    }

    /// Seat count for a district, falling back to the configured default
    /// when the zone database is unavailable or incomplete.
    #[instrument(skip(self))]
    pub async fn seats_for(&self, numero: u8) -> u32 {
        let code = zone_code(numero).to_string();

        match self.zone_db().await {
            Ok(db) => match db.dbzonas.get(&code).and_then(|zone| zone.q) {
                Some(seats) => seats,
                None => {
                    warn!(
                        distrito = numero,
                        default = self.default_seats,
                        "zone has no seat count, using default"
                    );
                    self.default_seats
                }
            },
            Err(e) => {
                warn!(
                    distrito = numero,
                    error = %e,
                    default = self.default_seats,
                    "zone database unavailable, using default seats"
                );
                self.default_seats
            }
        }
    }

    /// Fetch the full poll set, keyed "D1".."D28".
    #[instrument(skip(self))]
    pub async fn fetch_polls(&self) -> Result<HashMap<String, Vec<PollEntry>>, FeedError> {
        let response = self.http.get(&self.encuestas_url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::FetchFailed {
                url: self.encuestas_url.clone(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::ParseError(format!("failed to parse encuestas: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 5000,
            emol_csv_url: "https://www.emol.com/especiales/2025/nacional/elecciones/data/dip.csv"
                .to_string(),
            emol_db_url: "https://www.emol.com/especiales/2025/nacional/elecciones/data/db.json"
                .to_string(),
            encuestas_url: "https://dhondt.azurewebsites.net/api/encuestas".to_string(),
            http_timeout_ms: 10_000,
            pactos_path: "data/pactos.json".to_string(),
            match_threshold: 0.8,
            default_seats: 5,
            rust_log: "info".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn client_creation_works() {
        let client = EmolClient::new(&test_config());
        assert!(client.csv_url.ends_with("dip.csv"));
        assert_eq!(client.default_seats, 5);
    }

    #[tokio::test]
    async fn zone_db_starts_empty() {
        let client = EmolClient::new(&test_config());
        assert!(client.zone_db.read().await.is_none());
    }
}
