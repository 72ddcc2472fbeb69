//! Electoral service: fetch, match, group and allocate.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::emol::{EmolClient, PollEntry, RosterRow};
use crate::error::{ElectionError, Result};

use super::dhondt::dhondt_alloc;
use super::matching::{assign_poll_votes, normalize_district};
use super::pactos::PactRegistry;
use super::types::{
    AllocationLevel, Candidate, CandidateRoster, CandidateSummary, DhondtResult, District,
    DistrictRoster, ElectedCandidate, NationalCandidate, NationalSummary, Pact, PactResult,
    PactTable, PactTableRow, PactTotals, Party, PartyTotals, RosterCandidate,
};

/// How many districts are fetched concurrently for national views.
const DISTRICT_CONCURRENCY: usize = 8;

/// Electoral service holding the feed client, the poll snapshot taken at
/// startup, and the pact registry.
#[derive(Debug)]
pub struct ElectoralService {
    client: EmolClient,
    /// Poll entries keyed "D1".."D28", as served by the encuestas API.
    polls: HashMap<String, Vec<PollEntry>>,
    pactos: PactRegistry,
    threshold: f64,
}

impl ElectoralService {
    /// Build the service: load the pact registry and take a poll snapshot.
    ///
    /// A failing poll API degrades to an empty poll set so rosters keep
    /// being served, just without votes.
    pub async fn load(config: &Config) -> Self {
        let client = EmolClient::new(config);
        let pactos = PactRegistry::load(&config.pactos_path);

        let polls = match client.fetch_polls().await {
            Ok(polls) => {
                info!(districts = polls.len(), "poll snapshot loaded");
                polls
            }
            Err(e) => {
                warn!(error = %e, "poll API unavailable, starting with an empty poll set");
                HashMap::new()
            }
        };

        Self::with_parts(client, polls, pactos, config.match_threshold)
    }

    /// Build the service from already-loaded parts. Used by tests and by
    /// `load`.
    pub fn with_parts(
        client: EmolClient,
        polls: HashMap<String, Vec<PollEntry>>,
        pactos: PactRegistry,
        threshold: f64,
    ) -> Self {
        Self {
            client,
            polls,
            pactos,
            threshold,
        }
    }

    /// The poll snapshot, keyed "D1".."D28".
    pub fn polls(&self) -> &HashMap<String, Vec<PollEntry>> {
        &self.polls
    }

    fn poll_for(&self, numero: u8) -> &[PollEntry] {
        self.polls
            .get(&format!("D{numero}"))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Fetch a district roster and assign poll votes to its candidates.
    async fn roster(&self, numero: u8) -> Result<(Vec<Candidate>, Vec<RosterRow>)> {
        let rows = self.client.fetch_roster(numero).await?;

        if rows.is_empty() {
            return Err(ElectionError::DistrictNotFound {
                distrito: numero.to_string(),
            }
            .into());
        }

        let mut candidates: Vec<Candidate> = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| Candidate {
                id: row.id_foto.clone().unwrap_or_else(|| idx.to_string()),
                name: row.nombre.clone(),
                votes: Decimal::ZERO,
                party_id: row.cupo.clone().unwrap_or_default(),
                matched_from: None,
                match_quality: 0.0,
            })
            .collect();

        assign_poll_votes(&mut candidates, self.poll_for(numero), self.threshold)?;

        Ok((candidates, rows))
    }

    async fn fetch_outcome(&self, numero: u8) -> Result<DistrictOutcome> {
        let (candidates, rows) = self.roster(numero).await?;
        let seats = self.client.seats_for(numero).await;
        Ok(allocate(numero, seats, candidates, &rows))
    }

    /// Roster view for `GET /api/emol/{distrito}`.
    #[instrument(skip(self))]
    pub async fn district_roster(&self, distrito: &str) -> Result<DistrictRoster> {
        let numero = normalize_district(distrito)?;
        let outcome = self.fetch_outcome(numero).await?;

        Ok(DistrictRoster {
            distrito: numero.to_string(),
            seats: outcome.seats,
            threshold: Decimal::ZERO,
            level: AllocationLevel::Pact,
            pacts: outcome.pacts,
            parties: outcome.parties,
            candidates: outcome.candidates,
        })
    }

    /// Full D'Hondt computation for `GET /api/dhondt/{distrito}`.
    #[instrument(skip(self))]
    pub async fn compute_dhondt(&self, distrito: &str) -> Result<DhondtResult> {
        let numero = normalize_district(distrito)?;
        let outcome = self.fetch_outcome(numero).await?;
        Ok(self.shape_dhondt(outcome))
    }

    /// Per-pact table for `GET /api/resultado/{distrito}`.
    #[instrument(skip(self))]
    pub async fn pact_table(&self, distrito: &str) -> Result<PactTable> {
        let numero = normalize_district(distrito)?;
        let outcome = self.fetch_outcome(numero).await?;
        Ok(self.shape_table(&outcome))
    }

    /// National aggregation across all districts.
    ///
    /// Districts without poll data, or whose feeds fail, are skipped with a
    /// warning rather than failing the whole summary.
    #[instrument(skip(self))]
    pub async fn national_summary(&self) -> Result<NationalSummary> {
        let districts: Vec<u8> = (1..=District::COUNT)
            .filter(|numero| {
                let has_polls = !self.poll_for(*numero).is_empty();
                if !has_polls {
                    warn!(distrito = numero, "no poll data, skipping in national summary");
                }
                has_polls
            })
            .collect();

        let outcomes: Vec<(u8, Result<DistrictOutcome>)> = stream::iter(
            districts
                .into_iter()
                .map(|numero| async move { (numero, self.fetch_outcome(numero).await) }),
        )
        .buffer_unordered(DISTRICT_CONCURRENCY)
        .collect()
        .await;

        let mut pact_totals: HashMap<String, (u32, Decimal)> = HashMap::new();
        let mut party_totals: HashMap<String, (u32, Decimal, Option<String>)> = HashMap::new();

        for (numero, result) in outcomes {
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(distrito = numero, error = %e, "skipping district in national summary");
                    continue;
                }
            };

            for pact in &outcome.pacts {
                let seats = outcome.pact_alloc.get(&pact.id).copied().unwrap_or(0);
                let entry = pact_totals
                    .entry(pact.id.clone())
                    .or_insert((0, Decimal::ZERO));
                entry.0 += seats;
                entry.1 += pact.votes;
            }

            for party in &outcome.parties {
                let seats = outcome.party_alloc.get(&party.id).copied().unwrap_or(0);
                let entry = party_totals
                    .entry(party.id.clone())
                    .or_insert((0, Decimal::ZERO, party.pact_id.clone()));
                entry.0 += seats;
                entry.1 += party.votes;
            }
        }

        let total_votos: Decimal = pact_totals.values().map(|(_, votos)| *votos).sum();

        let mut pactos: Vec<PactTotals> = pact_totals
            .into_iter()
            .map(|(id, (escanos, votos))| PactTotals {
                id,
                escanos,
                votos,
                porcentaje: percentage(votos, total_votos, 2),
            })
            .collect();
        pactos.sort_by(|a, b| b.escanos.cmp(&a.escanos).then_with(|| a.id.cmp(&b.id)));

        let mut partidos: Vec<PartyTotals> = party_totals
            .into_iter()
            .map(|(id, (escanos, votos, pacto))| PartyTotals {
                id,
                escanos,
                votos,
                pacto,
            })
            .collect();
        partidos.sort_by(|a, b| b.escanos.cmp(&a.escanos).then_with(|| a.id.cmp(&b.id)));

        Ok(NationalSummary {
            total_votos,
            pactos,
            partidos,
        })
    }

    /// Every candidate nationwide that carries poll votes, for
    /// `GET /api/candidatos`.
    #[instrument(skip(self))]
    pub async fn national_candidates(&self) -> Result<Vec<NationalCandidate>> {
        let rosters: Vec<(u8, Result<(Vec<Candidate>, Vec<RosterRow>)>)> = stream::iter(
            (1..=District::COUNT).map(|numero| async move { (numero, self.roster(numero).await) }),
        )
        .buffer_unordered(DISTRICT_CONCURRENCY)
        .collect()
        .await;

        let mut todos = Vec::new();

        for (numero, result) in rosters {
            let (candidates, rows) = match result {
                Ok(roster) => roster,
                Err(e) => {
                    warn!(distrito = numero, error = %e, "skipping district in candidate listing");
                    continue;
                }
            };

            for (candidate, row) in candidates.iter().zip(rows.iter()) {
                if candidate.votes <= Decimal::ZERO {
                    continue;
                }
                let pacto = row.pacto.clone().unwrap_or_default();
                todos.push(NationalCandidate {
                    nombre: candidate.name.clone(),
                    partido: candidate.party_id.clone(),
                    color: self.pactos.color_for(&pacto),
                    pacto,
                    distrito: numero,
                    votos: candidate.votes,
                });
            }
        }

        todos.sort_by(|a, b| b.votos.cmp(&a.votos).then_with(|| a.nombre.cmp(&b.nombre)));
        Ok(todos)
    }

    /// District list with region names, for `GET /api/distritos`.
    ///
    /// When the zone database is unavailable the names fall back to
    /// "Distrito N".
    #[instrument(skip(self))]
    pub async fn districts(&self) -> Vec<District> {
        let db = match self.client.zone_db().await {
            Ok(db) => db,
            Err(e) => {
                warn!(error = %e, "zone database unavailable, using fallback district names");
                return fallback_districts();
            }
        };

        let mut districts: Vec<District> = db
            .dbzonas
            .iter()
            .filter_map(|(code, entry)| {
                if code.len() != 4 {
                    return None;
                }
                let numero: u8 = code.strip_prefix("60")?.parse().ok()?;
                if !(1..=District::COUNT).contains(&numero) {
                    return None;
                }

                let region = entry
                    .r
                    .as_deref()
                    .and_then(|region| db.dbregiones.get(region))
                    .and_then(|region| region.n.clone());

                let nombre = match region {
                    Some(region) => format!("Distrito {numero} - {region}"),
                    None => format!("Distrito {numero}"),
                };

                Some(District { numero, nombre })
            })
            .collect();

        districts.sort_by_key(|district| district.numero);

        if districts.is_empty() {
            warn!("zone database carried no districts, using fallback names");
            fallback_districts()
        } else {
            districts
        }
    }

    fn shape_dhondt(&self, outcome: DistrictOutcome) -> DhondtResult {
        let pact_of = pact_of_party(&outcome.parties);
        let ordered = ordered_allocation(&outcome.pact_alloc);

        let resultado_por_pacto: Vec<PactResult> = ordered
            .iter()
            .map(|(pact_id, escanos)| {
                let votos = pact_votes(&outcome.pacts, pact_id);
                PactResult {
                    pacto: self.pactos.name_for(pact_id),
                    pacto_id: pact_id.clone(),
                    candidatos_electos: elected_of_pact(&outcome.winners, &pact_of, pact_id),
                    votos,
                    porcentaje: percentage(votos, outcome.total_votes, 1),
                    escanos: *escanos,
                }
            })
            .collect();

        let mut roster: Vec<RosterCandidate> = outcome
            .candidates
            .iter()
            .map(|candidate| RosterCandidate {
                nombre: candidate.name.clone(),
                partido: candidate.party_id.clone(),
                pacto: pact_of
                    .get(&candidate.party_id)
                    .and_then(|pacto| pacto.clone())
                    .unwrap_or_default(),
                votos: candidate.votes,
            })
            .collect();
        roster.sort_by(|a, b| b.votos.cmp(&a.votos).then_with(|| a.nombre.cmp(&b.nombre)));

        let elected_candidates: Vec<ElectedCandidate> = outcome
            .winners
            .iter()
            .map(|candidate| {
                let pact_id = pact_of
                    .get(&candidate.party_id)
                    .and_then(|pacto| pacto.clone());
                ElectedCandidate {
                    id: candidate.id.clone(),
                    name: candidate.name.clone(),
                    party_id: candidate.party_id.clone(),
                    party_name: candidate.party_id.clone(),
                    pact_name: self.pactos.name_for(pact_id.as_deref().unwrap_or_default()),
                    pact_id,
                    votes: candidate.votes,
                }
            })
            .collect();

        DhondtResult {
            distrito: outcome.numero.to_string(),
            total_escanos: outcome.seats,
            total_votos: outcome.total_votes,
            pactos: self.pactos.all().to_vec(),
            resultado_por_pacto,
            candidatos_cargados: CandidateRoster {
                total: roster.len(),
                candidatos: roster,
            },
            elected_candidates,
        }
    }

    fn shape_table(&self, outcome: &DistrictOutcome) -> PactTable {
        let pact_of = pact_of_party(&outcome.parties);

        let pactos: Vec<PactTableRow> = ordered_allocation(&outcome.pact_alloc)
            .into_iter()
            .filter(|(_, escanos)| *escanos > 0)
            .map(|(pact_id, escanos)| {
                let votos = pact_votes(&outcome.pacts, &pact_id);
                PactTableRow {
                    pact_name: self.pactos.name_for(&pact_id),
                    candidatos: elected_of_pact(&outcome.winners, &pact_of, &pact_id),
                    pact_id,
                    votos,
                    escanos,
                    porcentaje: percentage(votos, outcome.total_votes, 1),
                }
            })
            .collect();

        PactTable {
            distrito: outcome.numero.to_string(),
            total_escanos: outcome.seats,
            total_votos: outcome.total_votes,
            pactos,
        }
    }
}

/// Intermediate result of a single-district allocation.
#[derive(Debug)]
struct DistrictOutcome {
    numero: u8,
    seats: u32,
    candidates: Vec<Candidate>,
    parties: Vec<Party>,
    pacts: Vec<Pact>,
    pact_alloc: HashMap<String, u32>,
    party_alloc: HashMap<String, u32>,
    winners: Vec<Candidate>,
    total_votes: Decimal,
}

/// Run the two-level allocation for one district: seats to pacts, each
/// pact's seats to its parties, each party's seats to its top-voted
/// candidates.
fn allocate(numero: u8, seats: u32, candidates: Vec<Candidate>, rows: &[RosterRow]) -> DistrictOutcome {
    let parties = group_parties(rows, &candidates);
    let pacts = group_pacts(rows, &parties);

    let votes_by_pact: HashMap<String, Decimal> = pacts
        .iter()
        .map(|pact| (pact.id.clone(), pact.votes))
        .collect();
    let pact_alloc = dhondt_alloc(&votes_by_pact, seats);

    let mut party_alloc: HashMap<String, u32> = HashMap::new();
    let mut winners: Vec<Candidate> = Vec::new();

    for (pact_id, &pact_seats) in &pact_alloc {
        let sub_votes: HashMap<String, Decimal> = parties
            .iter()
            .filter(|party| {
                party.pact_id.as_deref() == Some(pact_id.as_str()) && party.votes > Decimal::ZERO
            })
            .map(|party| (party.id.clone(), party.votes))
            .collect();

        if sub_votes.is_empty() {
            continue;
        }

        let sub_alloc = dhondt_alloc(&sub_votes, pact_seats);
        for (party_id, &n) in &sub_alloc {
            party_alloc.insert(party_id.clone(), n);

            let mut members: Vec<&Candidate> = candidates
                .iter()
                .filter(|candidate| candidate.party_id == *party_id)
                .collect();
            members.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)));
            winners.extend(members.into_iter().take(n as usize).cloned());
        }
    }

    winners.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)));
    let total_votes = votes_by_pact.values().copied().sum();

    DistrictOutcome {
        numero,
        seats,
        candidates,
        parties,
        pacts,
        pact_alloc,
        party_alloc,
        winners,
        total_votes,
    }
}

/// Group candidate votes into parties, preserving roster order.
fn group_parties(rows: &[RosterRow], candidates: &[Candidate]) -> Vec<Party> {
    let mut parties = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for row in rows {
        let Some(cupo) = row.cupo.as_deref().filter(|cupo| !cupo.is_empty()) else {
            continue;
        };
        if !seen.insert(cupo) {
            continue;
        }

        let votes = candidates
            .iter()
            .filter(|candidate| candidate.party_id == cupo)
            .map(|candidate| candidate.votes)
            .sum();

        parties.push(Party {
            id: cupo.to_string(),
            name: cupo.to_string(),
            votes,
            pact_id: row.pacto.clone().filter(|pacto| !pacto.is_empty()),
        });
    }

    parties
}

/// Group party votes into pacts, preserving roster order.
fn group_pacts(rows: &[RosterRow], parties: &[Party]) -> Vec<Pact> {
    let mut pacts = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for row in rows {
        let Some(pacto) = row.pacto.as_deref().filter(|pacto| !pacto.is_empty()) else {
            continue;
        };
        if !seen.insert(pacto) {
            continue;
        }

        let votes = parties
            .iter()
            .filter(|party| party.pact_id.as_deref() == Some(pacto))
            .map(|party| party.votes)
            .sum();

        pacts.push(Pact {
            id: pacto.to_string(),
            name: pacto.to_string(),
            votes,
        });
    }

    pacts
}

fn pact_of_party(parties: &[Party]) -> HashMap<String, Option<String>> {
    parties
        .iter()
        .map(|party| (party.id.clone(), party.pact_id.clone()))
        .collect()
}

fn pact_votes(pacts: &[Pact], pact_id: &str) -> Decimal {
    pacts
        .iter()
        .find(|pact| pact.id == pact_id)
        .map(|pact| pact.votes)
        .unwrap_or_default()
}

fn ordered_allocation(pact_alloc: &HashMap<String, u32>) -> Vec<(String, u32)> {
    let mut ordered: Vec<(String, u32)> = pact_alloc
        .iter()
        .map(|(pact_id, seats)| (pact_id.clone(), *seats))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ordered
}

fn elected_of_pact(
    winners: &[Candidate],
    pact_of: &HashMap<String, Option<String>>,
    pact_id: &str,
) -> Vec<CandidateSummary> {
    winners
        .iter()
        .filter(|candidate| {
            pact_of
                .get(&candidate.party_id)
                .and_then(|pacto| pacto.as_deref())
                == Some(pact_id)
        })
        .map(|candidate| CandidateSummary {
            nombre: candidate.name.clone(),
            partido: candidate.party_id.clone(),
            votos: candidate.votes,
        })
        .collect()
}

fn percentage(part: Decimal, total: Decimal, dp: u32) -> Decimal {
    if total.is_zero() {
        Decimal::ZERO
    } else {
        (part * Decimal::ONE_HUNDRED / total).round_dp(dp)
    }
}

fn fallback_districts() -> Vec<District> {
    (1..=District::COUNT)
        .map(|numero| District {
            numero,
            nombre: format!("Distrito {numero}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::election::pactos::PactInfo;
    use rust_decimal_macros::dec;

    fn row(nombre: &str, cupo: &str, pacto: &str) -> RosterRow {
        RosterRow {
            zona: 6010,
            nombre: nombre.to_string(),
            cupo: Some(cupo.to_string()),
            pacto: Some(pacto.to_string()),
            id_foto: None,
        }
    }

    fn candidate(name: &str, party: &str, votes: Decimal) -> Candidate {
        Candidate {
            id: name.to_string(),
            name: name.to_string(),
            votes,
            party_id: party.to_string(),
            matched_from: None,
            match_quality: 0.0,
        }
    }

    fn test_district() -> (Vec<Candidate>, Vec<RosterRow>) {
        let rows = vec![
            row("Ana Rojas", "FA", "UPC"),
            row("Beto Díaz", "FA", "UPC"),
            row("Carla Soto", "PS", "UPC"),
            row("David Vera", "RN", "CGU"),
            row("Elena Mora", "UDI", "CGU"),
            row("Fran Pinto", "PDG", "PDG"),
        ];
        let candidates = vec![
            candidate("Ana Rojas", "FA", dec!(100)),
            candidate("Beto Díaz", "FA", dec!(50)),
            candidate("Carla Soto", "PS", dec!(80)),
            candidate("David Vera", "RN", dec!(90)),
            candidate("Elena Mora", "UDI", dec!(10)),
            candidate("Fran Pinto", "PDG", dec!(0)),
        ];
        (candidates, rows)
    }

    fn test_service() -> ElectoralService {
        let config = crate::config::Config {
            host: "127.0.0.1".to_string(),
            port: 5000,
            emol_csv_url: "https://example.com/dip.csv".to_string(),
            emol_db_url: "https://example.com/db.json".to_string(),
            encuestas_url: "https://example.com/encuestas".to_string(),
            http_timeout_ms: 1000,
            pactos_path: "data/pactos.json".to_string(),
            match_threshold: 0.8,
            default_seats: 5,
            rust_log: "info".to_string(),
            verbose: false,
        };
        ElectoralService::with_parts(
            EmolClient::new(&config),
            HashMap::new(),
            PactRegistry::from_pacts(vec![PactInfo {
                id: "UPC".to_string(),
                nombre: "Unidad por Chile".to_string(),
                color: "#FF1493".to_string(),
            }]),
            0.8,
        )
    }

    #[test]
    fn grouping_sums_votes_up_the_hierarchy() {
        let (candidates, rows) = test_district();

        let parties = group_parties(&rows, &candidates);
        assert_eq!(parties.len(), 5);
        let fa = parties.iter().find(|p| p.id == "FA").unwrap();
        assert_eq!(fa.votes, dec!(150));
        assert_eq!(fa.pact_id.as_deref(), Some("UPC"));

        let pacts = group_pacts(&rows, &parties);
        assert_eq!(pacts.len(), 3);
        let upc = pacts.iter().find(|p| p.id == "UPC").unwrap();
        assert_eq!(upc.votes, dec!(230));
    }

    #[test]
    fn two_level_allocation_elects_top_candidates() {
        let (candidates, rows) = test_district();

        let outcome = allocate(10, 3, candidates, &rows);

        // Pacts: UPC 230, CGU 100, PDG 0 over 3 seats -> 2/1/0.
        assert_eq!(outcome.pact_alloc["UPC"], 2);
        assert_eq!(outcome.pact_alloc["CGU"], 1);
        assert_eq!(outcome.pact_alloc["PDG"], 0);

        // Within UPC (FA 150, PS 80, 2 seats) each gets one; within CGU the
        // single seat goes to RN.
        assert_eq!(outcome.party_alloc["FA"], 1);
        assert_eq!(outcome.party_alloc["PS"], 1);
        assert_eq!(outcome.party_alloc["RN"], 1);
        assert_eq!(outcome.party_alloc["UDI"], 0);

        let elected: Vec<&str> = outcome.winners.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(elected, vec!["Ana Rojas", "David Vera", "Carla Soto"]);
        assert_eq!(outcome.total_votes, dec!(330));
    }

    #[test]
    fn shape_dhondt_orders_pacts_by_seats() {
        let (candidates, rows) = test_district();
        let service = test_service();

        let result = service.shape_dhondt(allocate(10, 3, candidates, &rows));

        assert_eq!(result.distrito, "10");
        assert_eq!(result.total_escanos, 3);
        assert_eq!(result.total_votos, dec!(330));

        let por_pacto = &result.resultado_por_pacto;
        assert_eq!(por_pacto.len(), 3);
        assert_eq!(por_pacto[0].pacto_id, "UPC");
        assert_eq!(por_pacto[0].pacto, "Unidad por Chile");
        assert_eq!(por_pacto[0].escanos, 2);
        assert_eq!(por_pacto[0].porcentaje, dec!(69.7));
        assert_eq!(por_pacto[0].candidatos_electos.len(), 2);
        // Zero-seat pacts stay in the listing.
        assert_eq!(por_pacto[2].escanos, 0);

        assert_eq!(result.candidatos_cargados.total, 6);
        assert_eq!(result.elected_candidates.len(), 3);
        assert_eq!(result.elected_candidates[0].name, "Ana Rojas");
        assert_eq!(
            result.elected_candidates[0].pact_name,
            "Unidad por Chile"
        );
    }

    #[test]
    fn shape_table_keeps_only_seat_winning_pacts() {
        let (candidates, rows) = test_district();
        let service = test_service();

        let table = service.shape_table(&allocate(10, 3, candidates, &rows));

        assert_eq!(table.total_escanos, 3);
        assert_eq!(table.pactos.len(), 2);
        assert_eq!(table.pactos[0].pact_id, "UPC");
        assert_eq!(table.pactos[0].escanos, 2);
        assert_eq!(table.pactos[1].pact_id, "CGU");
        assert_eq!(table.pactos[1].votos, dec!(100));
    }

    #[test]
    fn percentage_rounds_and_handles_zero_total() {
        assert_eq!(percentage(dec!(230), dec!(330), 1), dec!(69.7));
        assert_eq!(percentage(dec!(1), dec!(3), 2), dec!(33.33));
        assert_eq!(percentage(dec!(5), Decimal::ZERO, 1), Decimal::ZERO);
    }

    #[test]
    fn fallback_districts_cover_all_28() {
        let districts = fallback_districts();
        assert_eq!(districts.len(), 28);
        assert_eq!(districts[0].nombre, "Distrito 1");
        assert_eq!(districts[27].numero, 28);
    }
}
