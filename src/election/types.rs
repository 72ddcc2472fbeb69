//! Domain types and response shapes for the electoral computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Level at which seats are first allocated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AllocationLevel {
    /// Seats go to pacts first, then to parties within each pact.
    #[strum(serialize = "pact")]
    #[default]
    Pact,
    /// Seats go directly to parties.
    #[strum(serialize = "party")]
    Party,
}

/// Electoral district.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct District {
    /// District number (1-28).
    pub numero: u8,
    /// Display name, e.g. "Distrito 10 - Región Metropolitana".
    pub nombre: String,
}

impl District {
    /// Number of electoral districts.
    pub const COUNT: u8 = 28;
}

/// Candidate on a district roster, with the poll votes assigned to them.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Candidate {
    /// Candidate id (the feed's photo id, or the row index).
    pub id: String,
    /// Candidate name.
    pub name: String,
    /// Votes assigned from the polls.
    pub votes: Decimal,
    /// Party slot the candidate runs under.
    pub party_id: String,
    /// Poll entry the votes came from, if any.
    pub matched_from: Option<String>,
    /// Similarity of the matched poll entry (0-1, 3 decimals).
    pub match_quality: f64,
}

/// Party with its vote total.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Party {
    /// Party id (the feed's `cupo` value).
    pub id: String,
    /// Party name (the feed only carries the id).
    pub name: String,
    /// Sum of its candidates' votes.
    pub votes: Decimal,
    /// Pact the party belongs to.
    pub pact_id: Option<String>,
}

/// Pact with its vote total.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pact {
    /// Pact id (the feed's `pacto` value).
    pub id: String,
    /// Pact name (the feed only carries the id).
    pub name: String,
    /// Sum of its parties' votes.
    pub votes: Decimal,
}

/// Roster response for `GET /api/emol/{distrito}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DistrictRoster {
    /// District number.
    pub distrito: String,
    /// Seats in play.
    pub seats: u32,
    /// Electoral threshold (none applies).
    pub threshold: Decimal,
    /// First allocation level.
    pub level: AllocationLevel,
    /// Pacts present on the roster.
    pub pacts: Vec<Pact>,
    /// Parties present on the roster.
    pub parties: Vec<Party>,
    /// Candidates with poll votes assigned.
    pub candidates: Vec<Candidate>,
}

/// Full D'Hondt computation for one district.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DhondtResult {
    /// District number.
    pub distrito: String,
    /// Seats distributed.
    pub total_escanos: u32,
    /// Vote total across all pacts.
    pub total_votos: Decimal,
    /// The pact registry (ids, names, colors).
    pub pactos: Vec<crate::election::pactos::PactInfo>,
    /// Per-pact results, seats descending, zero-seat pacts included.
    pub resultado_por_pacto: Vec<PactResult>,
    /// Every candidate on the roster, votes descending.
    pub candidatos_cargados: CandidateRoster,
    /// Elected candidates, votes descending.
    pub elected_candidates: Vec<ElectedCandidate>,
}

/// One pact's share of a district result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PactResult {
    /// Full pact name.
    pub pacto: String,
    /// Pact id.
    pub pacto_id: String,
    /// Elected candidates of this pact, votes descending.
    pub candidatos_electos: Vec<CandidateSummary>,
    /// Pact vote total.
    pub votos: Decimal,
    /// Share of the district vote, 1 decimal.
    pub porcentaje: Decimal,
    /// Seats won.
    pub escanos: u32,
}

/// Compact candidate line used in tables.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CandidateSummary {
    /// Candidate name.
    pub nombre: String,
    /// Party id.
    pub partido: String,
    /// Assigned votes.
    pub votos: Decimal,
}

/// The full candidate roster of a district result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CandidateRoster {
    /// Number of candidates.
    pub total: usize,
    /// Candidates, votes descending.
    pub candidatos: Vec<RosterCandidate>,
}

/// One roster line of a district result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RosterCandidate {
    /// Candidate name.
    pub nombre: String,
    /// Party id.
    pub partido: String,
    /// Pact id, empty when the party has no pact.
    pub pacto: String,
    /// Assigned votes.
    pub votos: Decimal,
}

/// An elected candidate with full party/pact context.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ElectedCandidate {
    /// Candidate id.
    pub id: String,
    /// Candidate name.
    pub name: String,
    /// Party id.
    pub party_id: String,
    /// Party name (same as the id in the feed).
    pub party_name: String,
    /// Pact id.
    pub pact_id: Option<String>,
    /// Full pact name.
    pub pact_name: String,
    /// Assigned votes.
    pub votes: Decimal,
}

/// National aggregation across all districts.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NationalSummary {
    /// Nationwide vote total.
    pub total_votos: Decimal,
    /// Per-pact totals, seats descending.
    pub pactos: Vec<PactTotals>,
    /// Per-party totals, seats descending.
    pub partidos: Vec<PartyTotals>,
}

/// One pact's national totals.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PactTotals {
    /// Pact id.
    pub id: String,
    /// Seats won nationwide.
    #[serde(rename = "escaños")]
    pub escanos: u32,
    /// Votes nationwide.
    pub votos: Decimal,
    /// Share of the national vote, 2 decimals.
    pub porcentaje: Decimal,
}

/// One party's national totals.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PartyTotals {
    /// Party id.
    pub id: String,
    /// Seats won nationwide.
    #[serde(rename = "escaños")]
    pub escanos: u32,
    /// Votes nationwide.
    pub votos: Decimal,
    /// Pact the party belongs to.
    pub pacto: Option<String>,
}

/// Per-pact results table for `GET /api/resultado/{distrito}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PactTable {
    /// District number.
    pub distrito: String,
    /// Seats distributed.
    #[serde(rename = "total_escaños")]
    pub total_escanos: u32,
    /// Vote total across all pacts.
    pub total_votos: Decimal,
    /// One row per pact with elected candidates, seats descending.
    pub pactos: Vec<PactTableRow>,
}

/// One row of the per-pact results table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PactTableRow {
    /// Pact id.
    pub pact_id: String,
    /// Full pact name.
    pub pact_name: String,
    /// Elected candidates, votes descending.
    pub candidatos: Vec<CandidateSummary>,
    /// Pact vote total.
    pub votos: Decimal,
    /// Seats won.
    #[serde(rename = "escaños")]
    pub escanos: u32,
    /// Share of the district vote, 1 decimal.
    pub porcentaje: Decimal,
}

/// Nationwide candidate listing row for `GET /api/candidatos`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NationalCandidate {
    /// Candidate name.
    pub nombre: String,
    /// Party id.
    pub partido: String,
    /// Pact id.
    pub pacto: String,
    /// District number.
    pub distrito: u8,
    /// Assigned votes.
    pub votos: Decimal,
    /// Pact display color.
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn allocation_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AllocationLevel::Pact).unwrap(),
            r#""pact""#
        );
    }

    #[test]
    fn allocation_level_from_string_works() {
        assert_eq!(
            AllocationLevel::from_str("pact").unwrap(),
            AllocationLevel::Pact
        );
        assert_eq!(
            AllocationLevel::from_str("party").unwrap(),
            AllocationLevel::Party
        );
    }

    #[test]
    fn national_totals_serialize_with_enye() {
        let totals = PactTotals {
            id: "A".to_string(),
            escanos: 3,
            votos: Decimal::from(100),
            porcentaje: Decimal::from(50),
        };
        let json = serde_json::to_string(&totals).unwrap();
        assert!(json.contains(r#""escaños":3"#));
    }
}
