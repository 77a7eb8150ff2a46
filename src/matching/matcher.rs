use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::normalizer::{normalize_team_name, team_similarity};
use crate::models::UnifiedEvent;
use crate::timeutil::{parse_kickoff, within_time_window};

/// Score penalty added to fuzzy (non-exact) candidates. Larger than any
/// time delta inside the tolerance window, so an exact name match always
/// outranks a fuzzy one.
pub const FUZZY_TIME_PENALTY_SECS: f64 = 1000.0;

/// Greedily pair events from two providers, left-priority, one-to-one.
///
/// A right-side candidate qualifies when it is in the same league, its
/// normalized team names match exactly or the average home/away similarity
/// reaches `min_similarity`, and its kickoff lies within
/// `time_tolerance_minutes` of the left event's. Among qualifying
/// candidates the lowest score wins: absolute kickoff delta in seconds,
/// plus [`FUZZY_TIME_PENALTY_SECS`] for fuzzy candidates.
///
/// Left events with an unparseable kickoff are skipped with a warning;
/// unparseable right-side candidates are simply ignored. Unmatched events
/// on either side are dropped.
pub fn match_events<'a>(
    left: &'a [UnifiedEvent],
    right: &'a [UnifiedEvent],
    time_tolerance_minutes: i64,
    min_similarity: f64,
) -> Vec<(&'a UnifiedEvent, &'a UnifiedEvent)> {
    let mut matches = Vec::new();
    let mut used_indices: HashSet<usize> = HashSet::new();

    for left_event in left {
        let left_kickoff = match parse_kickoff(&left_event.kickoff_utc) {
            Ok(dt) => dt,
            Err(e) => {
                warn!(
                    "Skipping event {} vs {}: {}",
                    left_event.home, left_event.away, e
                );
                continue;
            }
        };
        let left_home = normalize_team_name(&left_event.home);
        let left_away = normalize_team_name(&left_event.away);

        // (index, score, exact, avg similarity) of the best candidate so far
        let mut best: Option<(usize, f64, bool, f64)> = None;

        for (idx, right_event) in right.iter().enumerate() {
            if used_indices.contains(&idx) || right_event.league != left_event.league {
                continue;
            }

            let right_home = normalize_team_name(&right_event.home);
            let right_away = normalize_team_name(&right_event.away);

            let exact = left_home == right_home && left_away == right_away;
            let avg_similarity = (team_similarity(&left_home, &right_home)
                + team_similarity(&left_away, &right_away))
                / 2.0;
            if !exact && avg_similarity < min_similarity {
                continue;
            }

            let right_kickoff = match parse_kickoff(&right_event.kickoff_utc) {
                Ok(dt) => dt,
                Err(_) => continue,
            };
            if !within_time_window(left_kickoff, right_kickoff, time_tolerance_minutes) {
                continue;
            }

            let time_diff = (right_kickoff - left_kickoff).num_seconds().abs() as f64;
            let score = if exact {
                time_diff
            } else {
                time_diff + FUZZY_TIME_PENALTY_SECS
            };

            let improves = best.map_or(true, |(_, best_score, _, _)| score < best_score);
            if improves {
                best = Some((idx, score, exact, avg_similarity));
            }
        }

        if let Some((idx, _, exact, similarity)) = best {
            used_indices.insert(idx);
            matches.push((left_event, &right[idx]));
            if !exact {
                debug!(
                    "Fuzzy match: {} vs {} <-> {} vs {} (similarity: {:.2})",
                    left_event.home, left_event.away, right[idx].home, right[idx].away, similarity
                );
            }
        }
    }

    info!("Matched {} events between providers", matches.len());
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn event(provider: &str, league: &str, home: &str, away: &str, kickoff: &str) -> UnifiedEvent {
        UnifiedEvent {
            provider: provider.to_string(),
            provider_event_id: format!("{home}-{away}"),
            league: league.to_string(),
            country: "Netherlands".to_string(),
            kickoff_utc: kickoff.to_string(),
            home: home.to_string(),
            away: away.to_string(),
            markets: BTreeMap::new(),
            scraped_at: "2025-03-01T00:00:00Z".to_string(),
            is_live: false,
        }
    }

    #[test]
    fn exact_names_within_window_match() {
        let left = vec![event("toto", "eredivisie", "Ajax", "PSV", "2025-03-01T19:00:00Z")];
        let right = vec![event(
            "pinnacle",
            "eredivisie",
            "AFC Ajax",
            "PSV Eindhoven",
            "2025-03-01T19:05:00Z",
        )];
        let matches = match_events(&left, &right, 12, 0.85);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].1.home, "AFC Ajax");
    }

    #[test]
    fn kickoff_outside_tolerance_rejects() {
        let left = vec![event("toto", "eredivisie", "Ajax", "PSV", "2025-03-01T19:00:00Z")];
        let right = vec![event(
            "pinnacle",
            "eredivisie",
            "Ajax",
            "PSV",
            "2025-03-01T19:13:00Z",
        )];
        assert!(match_events(&left, &right, 12, 0.85).is_empty());
    }

    #[test]
    fn different_league_never_matches() {
        let left = vec![event("toto", "eredivisie", "Ajax", "PSV", "2025-03-01T19:00:00Z")];
        let right = vec![event(
            "pinnacle",
            "premier_league",
            "Ajax",
            "PSV",
            "2025-03-01T19:00:00Z",
        )];
        assert!(match_events(&left, &right, 12, 0.85).is_empty());
    }

    #[test]
    fn fuzzy_candidate_qualifies_above_threshold() {
        // One-letter typo; well above 0.85 average similarity.
        let left = vec![event(
            "toto",
            "eredivisie",
            "Feyenoord",
            "FC Groningen",
            "2025-03-01T19:00:00Z",
        )];
        let right = vec![event(
            "pinnacle",
            "eredivisie",
            "Feyenord",
            "FC Groningen",
            "2025-03-01T19:00:00Z",
        )];
        assert_eq!(match_events(&left, &right, 12, 0.85).len(), 1);
    }

    #[test]
    fn exact_match_beats_closer_fuzzy_candidate() {
        let left = vec![event("toto", "eredivisie", "Ajax", "PSV", "2025-03-01T19:00:00Z")];
        // Fuzzy candidate at zero delta, exact candidate five minutes off.
        let fuzzy = event("pinnacle", "eredivisie", "Ajaw", "PSV", "2025-03-01T19:00:00Z");
        let exact = event("pinnacle", "eredivisie", "Ajax", "PSV", "2025-03-01T19:05:00Z");
        let right = vec![fuzzy, exact];
        let matches = match_events(&left, &right, 12, 0.85);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].1.kickoff_utc, "2025-03-01T19:05:00Z");
    }

    #[test]
    fn pairing_is_one_to_one() {
        let left = vec![
            event("toto", "eredivisie", "Ajax", "PSV", "2025-03-01T19:00:00Z"),
            event("toto", "eredivisie", "Ajax", "PSV", "2025-03-01T19:02:00Z"),
        ];
        let right = vec![event(
            "pinnacle",
            "eredivisie",
            "Ajax",
            "PSV",
            "2025-03-01T19:00:00Z",
        )];
        // Second left event finds the only candidate already used.
        assert_eq!(match_events(&left, &right, 12, 0.85).len(), 1);
    }

    #[test]
    fn unparseable_left_kickoff_skips_event() {
        let left = vec![
            event("toto", "eredivisie", "Ajax", "PSV", "soon"),
            event("toto", "eredivisie", "AZ", "FC Twente", "2025-03-01T19:00:00Z"),
        ];
        let right = vec![
            event("pinnacle", "eredivisie", "Ajax", "PSV", "2025-03-01T19:00:00Z"),
            event("pinnacle", "eredivisie", "AZ", "FC Twente", "2025-03-01T19:00:00Z"),
        ];
        let matches = match_events(&left, &right, 12, 0.85);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0.home, "AZ");
    }

    #[test]
    fn unparseable_right_kickoff_ignores_candidate() {
        let left = vec![event("toto", "eredivisie", "Ajax", "PSV", "2025-03-01T19:00:00Z")];
        let right = vec![
            event("pinnacle", "eredivisie", "Ajax", "PSV", "tbd"),
            event("pinnacle", "eredivisie", "Ajax", "PSV", "2025-03-01T19:01:00Z"),
        ];
        let matches = match_events(&left, &right, 12, 0.85);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].1.kickoff_utc, "2025-03-01T19:01:00Z");
    }
}
