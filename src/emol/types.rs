//! Wire types for the Emol election feeds.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Zone code for a district in the Emol feeds ("60" + zero-padded number).
pub fn zone_code(numero: u8) -> u32 {
    6000 + u32::from(numero)
}

/// One row of the Emol candidate CSV (`dip.csv`).
///
/// The feed carries many more columns; only the ones the allocation needs
/// are deserialized.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterRow {
    /// Zone code (6001-6028 for districts).
    pub zona: u32,
    /// Candidate name.
    pub nombre: String,
    /// Party slot the candidate runs under.
    #[serde(default)]
    pub cupo: Option<String>,
    /// Pact the candidate's party belongs to.
    #[serde(default)]
    pub pacto: Option<String>,
    /// Photo id, used as the candidate id.
    #[serde(default)]
    pub id_foto: Option<String>,
}

/// Zone database payload (`db.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneDb {
    /// Electoral zones keyed by zone code ("6001".."6028" for districts).
    #[serde(default)]
    pub dbzonas: HashMap<String, ZoneEntry>,
    /// Regions keyed by region code.
    #[serde(default)]
    pub dbregiones: HashMap<String, RegionEntry>,
}

/// One zone in the zone database.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneEntry {
    /// Zone display name.
    #[serde(default)]
    pub n: Option<String>,
    /// Region code.
    #[serde(default)]
    pub r: Option<String>,
    /// Seat count. The feed has carried this both as a number and a string.
    #[serde(default, deserialize_with = "u32_from_number_or_string")]
    pub q: Option<u32>,
}

/// One region in the zone database.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionEntry {
    /// Region display name.
    #[serde(default)]
    pub n: Option<String>,
}

/// One poll figure for a candidate, as served by the encuestas API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PollEntry {
    /// Candidate name as written in the poll.
    pub nombre: String,
    /// Estimated votes.
    #[serde(default)]
    pub votos: f64,
}

fn u32_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}
