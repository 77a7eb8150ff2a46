use std::collections::BTreeMap;

use tracing::{debug, info};

use super::devig::{remove_vig_multiplicative, resolve_orientation};
use super::kelly::{edge, kelly_stake};
use crate::matching::match_events;
use crate::models::{UnifiedEvent, ValueBet};

pub const SUPPORTED_MARKETS: [&str; 3] = ["1x2", "ou_2_5", "btts"];

/// Tunables for the value pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub time_tolerance_minutes: i64,
    pub min_similarity: f64,
    pub min_edge: f64,
    pub kelly_fraction: f64,
    pub max_stake_fraction: f64,
    pub bankroll: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            time_tolerance_minutes: 12,
            min_similarity: 0.85,
            min_edge: 0.025,
            kelly_fraction: 0.25,
            max_stake_fraction: 0.05,
            bankroll: 1000.0,
        }
    }
}

/// Compare every soft book against the anchor and emit all prices whose
/// edge clears the threshold, sorted by edge descending.
///
/// Per soft book the events are matched with the soft side taking the
/// left (priority) role. Per matched pair and supported market the soft
/// probabilities come from [`resolve_orientation`] for `1x2` and plain
/// de-vig otherwise; the anchor is always de-vigged directly. A market
/// that fails de-vig on either side is skipped. Edges are evaluated per
/// anchor outcome against the soft book's raw offered price.
pub fn generate_value_bets(
    anchor_events: &[UnifiedEvent],
    soft_books: &BTreeMap<String, Vec<UnifiedEvent>>,
    settings: &AnalysisSettings,
) -> Vec<ValueBet> {
    let mut value_bets = Vec::new();

    for (book_name, book_events) in soft_books {
        let matches = match_events(
            book_events,
            anchor_events,
            settings.time_tolerance_minutes,
            settings.min_similarity,
        );
        info!("Found {} matches for {}", matches.len(), book_name);

        for (soft_event, anchor_event) in matches {
            for market_type in SUPPORTED_MARKETS {
                let (Some(soft_market), Some(anchor_market)) = (
                    soft_event.markets.get(market_type),
                    anchor_event.markets.get(market_type),
                ) else {
                    continue;
                };

                let soft_probs = if market_type == "1x2" {
                    resolve_orientation(soft_market, anchor_market)
                } else {
                    remove_vig_multiplicative(soft_market).unwrap_or_default()
                };
                let Some(anchor_probs) = remove_vig_multiplicative(anchor_market) else {
                    continue;
                };
                if soft_probs.is_empty() {
                    continue;
                }

                for (outcome, &true_prob) in &anchor_probs {
                    let Some(&soft_odds) = soft_market.get(outcome) else {
                        continue;
                    };
                    let Some(&anchor_odds) = anchor_market.get(outcome) else {
                        continue;
                    };
                    let Some(&soft_prob) = soft_probs.get(outcome) else {
                        continue;
                    };

                    let edge_value = edge(true_prob, soft_odds);
                    if edge_value < settings.min_edge {
                        continue;
                    }

                    debug!(
                        "Edge {:.2}% on {} vs {} [{} {} @ {}]: soft {:.3} vs anchor {:.3}",
                        edge_value * 100.0,
                        soft_event.home,
                        soft_event.away,
                        market_type,
                        outcome,
                        book_name,
                        soft_odds,
                        anchor_odds
                    );
                    let stake = kelly_stake(
                        edge_value,
                        soft_odds,
                        settings.bankroll,
                        settings.kelly_fraction,
                        settings.max_stake_fraction,
                    );
                    value_bets.push(ValueBet {
                        league: soft_event.league.clone(),
                        kickoff: soft_event.kickoff_utc.clone(),
                        home: soft_event.home.clone(),
                        away: soft_event.away.clone(),
                        bookmaker: book_name.clone(),
                        market: market_type.to_string(),
                        outcome: outcome.clone(),
                        soft_odds,
                        anchor_odds,
                        soft_prob,
                        anchor_prob: true_prob,
                        edge_percentage: edge_value * 100.0,
                        recommended_stake: stake,
                        expected_value: stake * edge_value,
                    });
                }
            }
        }
    }

    value_bets.sort_by(|a, b| b.edge_percentage.total_cmp(&a.edge_percentage));

    info!(
        "Found {} value bets above {:.1}% edge threshold",
        value_bets.len(),
        settings.min_edge * 100.0
    );
    value_bets
}
