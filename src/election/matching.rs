//! Text normalization and poll-to-candidate fuzzy matching.
//!
//! Poll entries and roster rows spell candidate names differently (accents,
//! casing, middle names). Votes are assigned by normalizing both sides and
//! comparing with a Ratcliff/Obershelp similarity ratio.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::warn;

use crate::emol::PollEntry;
use crate::error::ElectionError;

use super::types::{Candidate, District};

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Normalize a name for comparison: trim, lowercase, fold Spanish
/// diacritics (á→a, ñ→n, ...).
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase().chars().map(fold_diacritic).collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        _ => c,
    }
}

/// Resolve free-form district input ("10", "D10", "d10") to 1..=28.
pub fn normalize_district(input: &str) -> Result<u8, ElectionError> {
    let invalid = || ElectionError::InvalidDistrict(input.to_string());

    let digits = DIGITS_RE.find(input).ok_or_else(invalid)?;
    let numero: u8 = digits.as_str().parse().map_err(|_| invalid())?;

    if (1..=District::COUNT).contains(&numero) {
        Ok(numero)
    } else {
        Err(invalid())
    }
}

/// Ratcliff/Obershelp similarity ratio in [0, 1]: twice the total length of
/// the recursively-found matching blocks, divided by the combined length.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();

    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }

    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Earliest longest common substring of `a` and `b`, as
/// (start in a, start in b, length).
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        let mut current = vec![0usize; b.len() + 1];
        for j in 0..b.len() {
            if a[i] == b[j] {
                let len = prev[j] + 1;
                current[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = current;
    }

    best
}

/// Assign poll votes to roster candidates.
///
/// Each poll entry goes to its most similar candidate; matches below the
/// threshold are dropped with a warning. A candidate claimed by two poll
/// entries is a data error. Candidates nobody matched keep zero votes.
pub fn assign_poll_votes(
    candidates: &mut [Candidate],
    polls: &[PollEntry],
    threshold: f64,
) -> Result<(), ElectionError> {
    if polls.is_empty() {
        return Ok(());
    }

    let names: Vec<String> = candidates
        .iter()
        .map(|candidate| normalize(&candidate.name))
        .collect();

    let mut matched: HashSet<usize> = HashSet::new();
    let mut unmatched_polls: Vec<&str> = Vec::new();

    for poll in polls {
        let poll_name = normalize(&poll.nombre);

        let mut best_idx = None;
        let mut best_ratio = 0.0_f64;
        for (idx, name) in names.iter().enumerate() {
            let ratio = similarity(&poll_name, name);
            if ratio > best_ratio {
                best_ratio = ratio;
                best_idx = Some(idx);
            }
        }

        let Some(idx) = best_idx.filter(|_| best_ratio >= threshold) else {
            unmatched_polls.push(&poll.nombre);
            continue;
        };

        if !matched.insert(idx) {
            return Err(ElectionError::DuplicateMatch {
                candidate: candidates[idx].name.clone(),
            });
        }

        let candidate = &mut candidates[idx];
        candidate.votes = Decimal::from_f64_retain(poll.votos).unwrap_or_default();
        candidate.matched_from = Some(poll.nombre.clone());
        candidate.match_quality = (best_ratio * 1000.0).round() / 1000.0;
    }

    if !unmatched_polls.is_empty() {
        warn!(
            count = unmatched_polls.len(),
            sample = ?&unmatched_polls[..unmatched_polls.len().min(3)],
            "poll entries without a roster match"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, name: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: name.to_string(),
            votes: Decimal::ZERO,
            party_id: "FA".to_string(),
            matched_from: None,
            match_quality: 0.0,
        }
    }

    fn poll(nombre: &str, votos: f64) -> PollEntry {
        PollEntry {
            nombre: nombre.to_string(),
            votos,
        }
    }

    #[test]
    fn normalize_folds_accents_and_case() {
        assert_eq!(normalize("  José ÑUÑEZ  "), "jose nunez");
        assert_eq!(normalize("María Pérez"), "maria perez");
    }

    #[test]
    fn normalize_district_accepts_prefixed_forms() {
        assert_eq!(normalize_district("10").unwrap(), 10);
        assert_eq!(normalize_district("D10").unwrap(), 10);
        assert_eq!(normalize_district("d7").unwrap(), 7);
    }

    #[test]
    fn normalize_district_rejects_out_of_range() {
        assert!(normalize_district("0").is_err());
        assert!(normalize_district("29").is_err());
        assert!(normalize_district("abc").is_err());
        assert!(normalize_district("99999999999").is_err());
    }

    #[test]
    fn similarity_of_identical_strings_is_one() {
        assert_eq!(similarity("gonzalo winter", "gonzalo winter"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn similarity_of_disjoint_strings_is_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn similarity_matches_reference_ratio() {
        // difflib: SequenceMatcher(None, "maria perez", "maria peres")
        // matches 10 of 22 chars twice over -> 20/22.
        let ratio = similarity("maria perez", "maria peres");
        assert!((ratio - 20.0 / 22.0).abs() < 1e-9);
    }

    #[test]
    fn assigns_votes_to_best_match_above_threshold() {
        let mut candidates = vec![
            candidate("1", "Gonzalo Winter"),
            candidate("2", "Ana María Soto"),
        ];
        let polls = vec![poll("Gonzalo Wínter", 45000.0)];

        assign_poll_votes(&mut candidates, &polls, 0.8).unwrap();

        assert_eq!(candidates[0].votes, Decimal::from(45000));
        assert_eq!(candidates[0].matched_from.as_deref(), Some("Gonzalo Wínter"));
        assert!(candidates[0].match_quality >= 0.9);
        assert_eq!(candidates[1].votes, Decimal::ZERO);
        assert_eq!(candidates[1].matched_from, None);
    }

    #[test]
    fn drops_matches_below_threshold() {
        let mut candidates = vec![candidate("1", "Gonzalo Winter")];
        let polls = vec![poll("Persona Distinta", 999.0)];

        assign_poll_votes(&mut candidates, &polls, 0.8).unwrap();

        assert_eq!(candidates[0].votes, Decimal::ZERO);
        assert_eq!(candidates[0].match_quality, 0.0);
    }

    #[test]
    fn duplicate_candidate_match_is_an_error() {
        let mut candidates = vec![candidate("1", "Gonzalo Winter")];
        let polls = vec![
            poll("Gonzalo Winter", 100.0),
            poll("Gonzalo Wínter", 200.0),
        ];

        let err = assign_poll_votes(&mut candidates, &polls, 0.8).unwrap_err();
        assert!(matches!(err, ElectionError::DuplicateMatch { .. }));
    }

    #[test]
    fn empty_polls_leave_candidates_untouched() {
        let mut candidates = vec![candidate("1", "Gonzalo Winter")];

        assign_poll_votes(&mut candidates, &[], 0.8).unwrap();

        assert_eq!(candidates[0].votes, Decimal::ZERO);
    }
}
