use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Market key -> outcome key -> decimal odds.
///
/// Alongside the genuine outcome keys a market may carry two auxiliary
/// entries written by the scrapers: `margin` (bookmaker overround, percent)
/// and `line` (handicap/total line, e.g. 2.5). The analysis layer strips
/// both before de-vigging.
pub type MarketMap = BTreeMap<String, BTreeMap<String, f64>>;

/// Standardized event structure across all providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedEvent {
    pub provider: String,
    pub provider_event_id: String,
    pub league: String,
    pub country: String,
    /// Kickoff in canonical ISO-8601 UTC form with a `Z` suffix.
    pub kickoff_utc: String,
    pub home: String,
    pub away: String,
    pub markets: MarketMap,
    pub scraped_at: String,
    pub is_live: bool,
}

impl UnifiedEvent {
    pub fn scraped_now() -> String {
        Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
    }
}

/// A single value betting opportunity: a soft-book price whose implied
/// probability sits below the anchor's de-vigged estimate.
#[derive(Debug, Clone)]
pub struct ValueBet {
    pub league: String,
    pub kickoff: String,
    pub home: String,
    pub away: String,
    pub bookmaker: String,
    pub market: String,
    pub outcome: String,
    pub soft_odds: f64,
    pub anchor_odds: f64,
    pub soft_prob: f64,
    pub anchor_prob: f64,
    /// Edge in percent (edge fraction * 100).
    pub edge_percentage: f64,
    pub recommended_stake: f64,
    pub expected_value: f64,
}

/// Display form of a [`ValueBet`] with probabilities rounded to 4 decimals
/// and money/percentage figures to 2, matching the report files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueBetRecord {
    pub league: String,
    pub kickoff: String,
    pub home: String,
    pub away: String,
    pub bookmaker: String,
    pub market: String,
    pub outcome: String,
    pub soft_odds: f64,
    pub anchor_odds: f64,
    pub soft_prob: f64,
    pub anchor_prob: f64,
    pub edge_pct: f64,
    pub recommended_stake: f64,
    pub expected_value: f64,
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

impl From<&ValueBet> for ValueBetRecord {
    fn from(bet: &ValueBet) -> Self {
        ValueBetRecord {
            league: bet.league.clone(),
            kickoff: bet.kickoff.clone(),
            home: bet.home.clone(),
            away: bet.away.clone(),
            bookmaker: bet.bookmaker.clone(),
            market: bet.market.clone(),
            outcome: bet.outcome.clone(),
            soft_odds: bet.soft_odds,
            anchor_odds: bet.anchor_odds,
            soft_prob: round_to(bet.soft_prob, 4),
            anchor_prob: round_to(bet.anchor_prob, 4),
            edge_pct: round_to(bet.edge_percentage, 2),
            recommended_stake: round_to(bet.recommended_stake, 2),
            expected_value: round_to(bet.expected_value, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bet() -> ValueBet {
        ValueBet {
            league: "eredivisie".to_string(),
            kickoff: "2025-03-01T19:00:00Z".to_string(),
            home: "ajax".to_string(),
            away: "psv".to_string(),
            bookmaker: "toto".to_string(),
            market: "1x2".to_string(),
            outcome: "home".to_string(),
            soft_odds: 2.10,
            anchor_odds: 1.95,
            soft_prob: 0.451_234_9,
            anchor_prob: 0.512_345_6,
            edge_percentage: 7.592_577,
            recommended_stake: 18.348_21,
            expected_value: 1.393_105,
        }
    }

    #[test]
    fn record_rounds_probabilities_to_four_decimals() {
        let record = ValueBetRecord::from(&sample_bet());
        assert_eq!(record.soft_prob, 0.4512);
        assert_eq!(record.anchor_prob, 0.5123);
    }

    #[test]
    fn record_rounds_money_fields_to_two_decimals() {
        let record = ValueBetRecord::from(&sample_bet());
        assert_eq!(record.edge_pct, 7.59);
        assert_eq!(record.recommended_stake, 18.35);
        assert_eq!(record.expected_value, 1.39);
    }

    #[test]
    fn record_serializes_with_edge_pct_key() {
        let record = ValueBetRecord::from(&sample_bet());
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("edge_pct").is_some());
        assert!(json.get("edge_percentage").is_none());
    }
}
