//! Registry of electoral pacts: full names and display colors.
//!
//! The Emol feeds only carry pact ids; the registry file maps them to the
//! names and colors the frontend shows. A missing or broken file degrades
//! to an empty registry (ids are shown as-is).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

/// Color used for pacts missing from the registry.
pub const DEFAULT_COLOR: &str = "#CCCCCC";

/// One pact in the registry file.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PactInfo {
    /// Pact id as it appears in the feeds.
    pub id: String,
    /// Full display name.
    pub nombre: String,
    /// Display color.
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

#[derive(Debug, Deserialize)]
struct PactFile {
    #[serde(default)]
    pactos: Vec<PactInfo>,
}

/// Registry of electoral pacts loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct PactRegistry {
    pacts: Vec<PactInfo>,
}

impl PactRegistry {
    /// Load the registry from a JSON file, degrading to empty on failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let registry = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                serde_json::from_str::<PactFile>(&raw).map_err(|e| e.to_string())
            });

        match registry {
            Ok(file) => {
                info!(path = %path.display(), pactos = file.pactos.len(), "pact registry loaded");
                Self { pacts: file.pactos }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "pact registry unavailable, using empty registry");
                Self::default()
            }
        }
    }

    /// Build a registry from already-parsed entries.
    pub fn from_pacts(pacts: Vec<PactInfo>) -> Self {
        Self { pacts }
    }

    /// Full name for a pact id; unknown ids are returned unchanged.
    pub fn name_for(&self, id: &str) -> String {
        self.pacts
            .iter()
            .find(|pact| pact.id == id)
            .map(|pact| pact.nombre.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Display color for a pact id.
    pub fn color_for(&self, id: &str) -> String {
        self.pacts
            .iter()
            .find(|pact| pact.id == id)
            .map(|pact| pact.color.clone())
            .unwrap_or_else(|| DEFAULT_COLOR.to_string())
    }

    /// All registered pacts.
    pub fn all(&self) -> &[PactInfo] {
        &self.pacts
    }
}
