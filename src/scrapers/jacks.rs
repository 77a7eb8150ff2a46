use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use super::http::HttpClient;
use super::market_margin;
use super::provider::OddsProvider;
use crate::leagues;
use crate::models::{MarketMap, UnifiedEvent};
use crate::timeutil::normalize_iso_datetime;

const BASE_URL: &str = "https://eu1.offering-api.kambicdn.com/offering/v2018/jvh";

/// Jack's Casino scraper. The book runs on the Kambi platform, which
/// exposes a per-competition `listView` feed with every bet offer inlined.
pub struct JacksScraper {
    http: Arc<HttpClient>,
}

/// Kambi encodes prices as integer milli-odds (2150 means 2.15). Values
/// below 1000 would imply odds under 1.0 and are rejected.
pub fn kambi_to_decimal(raw: &Value) -> Option<f64> {
    let value = raw
        .as_i64()
        .or_else(|| raw.as_str().and_then(|s| s.parse::<i64>().ok()))?;
    if value < 1000 {
        return None;
    }
    Some(value as f64 / 1000.0)
}

/// Goal line of a two-way offer. Kambi formats lines either as plain
/// numbers or as strings like "2,5" or "2.5/3"; only the first component
/// counts.
fn extract_line(offer: &Value) -> Option<f64> {
    let line = &offer["line"];
    if let Some(n) = line.as_f64() {
        return Some(n);
    }
    let text = line.as_str()?;
    let head = text.replace(',', ".");
    let head = head.split('/').next()?;
    head.trim().parse::<f64>().ok()
}

fn open_outcomes(offer: &Value) -> Vec<&Value> {
    match offer["outcomes"].as_array() {
        Some(outcomes) => outcomes
            .iter()
            .filter(|o| {
                let status = o["status"].as_str().unwrap_or("");
                status.is_empty() || status.eq_ignore_ascii_case("open")
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Classify one Kambi bet offer into a supported market. Three open
/// outcomes labelled 1/X/2 form the match-odds market; two-way offers are
/// either the 2.5 goal line or, when the offer type mentions both teams
/// scoring, the BTTS market.
pub fn parse_bet_offer(offer: &Value) -> Option<(&'static str, BTreeMap<String, f64>)> {
    let outcomes = open_outcomes(offer);
    if outcomes.is_empty() {
        return None;
    }

    if outcomes.len() == 3 {
        let mut odds = BTreeMap::new();
        for outcome in &outcomes {
            let label = outcome["label"].as_str().unwrap_or("").trim();
            let Some(decimal) = kambi_to_decimal(&outcome["odds"]) else {
                continue;
            };
            match label {
                "1" => {
                    odds.insert("home".to_string(), decimal);
                }
                "X" => {
                    odds.insert("draw".to_string(), decimal);
                }
                "2" => {
                    odds.insert("away".to_string(), decimal);
                }
                _ => {}
            }
        }
        if odds.len() == 3 {
            odds.insert("margin".to_string(), market_margin(&odds));
            return Some(("1x2", odds));
        }
        return None;
    }

    if outcomes.len() == 2 {
        if let Some(line) = extract_line(offer) {
            if (line - 2.5).abs() < 0.01 {
                let mut odds = BTreeMap::new();
                for outcome in &outcomes {
                    let label = outcome["label"].as_str().unwrap_or("").to_lowercase();
                    let Some(decimal) = kambi_to_decimal(&outcome["odds"]) else {
                        continue;
                    };
                    if label.contains("over") {
                        odds.insert("over".to_string(), decimal);
                    } else if label.contains("under") {
                        odds.insert("under".to_string(), decimal);
                    }
                }
                if odds.len() == 2 {
                    odds.insert("margin".to_string(), market_margin(&odds));
                    odds.insert("line".to_string(), 2.5);
                    return Some(("ou_2_5", odds));
                }
            }
        }

        let bet_type = offer["betOfferType"]["name"]
            .as_str()
            .unwrap_or("")
            .to_lowercase();
        if bet_type.contains("both") || bet_type.contains("scoren") {
            let mut odds = BTreeMap::new();
            for outcome in &outcomes {
                let label = outcome["label"].as_str().unwrap_or("").to_lowercase();
                let Some(decimal) = kambi_to_decimal(&outcome["odds"]) else {
                    continue;
                };
                match label.as_str() {
                    "yes" | "ja" => {
                        odds.insert("yes".to_string(), decimal);
                    }
                    "no" | "nee" => {
                        odds.insert("no".to_string(), decimal);
                    }
                    _ => {}
                }
            }
            if odds.len() == 2 {
                odds.insert("margin".to_string(), market_margin(&odds));
                return Some(("btts", odds));
            }
        }
    }

    None
}

impl JacksScraper {
    pub fn new(http: Arc<HttpClient>) -> Self {
        JacksScraper { http }
    }
}

#[async_trait]
impl OddsProvider for JacksScraper {
    fn name(&self) -> &str {
        "Jacks"
    }

    async fn fetch_league_events(&self, league_key: &str) -> Result<Vec<UnifiedEvent>> {
        let Some(league) = leagues::get_league(league_key) else {
            warn!("[Jacks] No league config for '{}'", league_key);
            return Ok(Vec::new());
        };

        let url = format!("{BASE_URL}/listView/{}.json", league.jacks_path);
        let data = self
            .http
            .get_json(&url, &[("lang", "nl_NL"), ("market", "NL")], &[])
            .await?;
        let Some(data) = data else {
            return Ok(Vec::new());
        };

        let empty = Vec::new();
        let items = data["events"].as_array().unwrap_or(&empty);

        let mut events = Vec::new();
        for item in items {
            let event_data = &item["event"];
            let Some(event_id) = event_data["id"].as_i64() else {
                continue;
            };

            let home = event_data["homeName"].as_str().unwrap_or("");
            let away = event_data["awayName"].as_str().unwrap_or("");
            let kickoff = normalize_iso_datetime(event_data["start"].as_str().unwrap_or(""));
            if home.is_empty() || away.is_empty() || kickoff.is_empty() {
                continue;
            }

            let mut markets = MarketMap::new();
            for offer in item["betOffers"].as_array().unwrap_or(&empty) {
                if let Some((market_type, market_data)) = parse_bet_offer(offer) {
                    markets.insert(market_type.to_string(), market_data);
                }
            }
            if markets.is_empty() {
                continue;
            }

            events.push(UnifiedEvent {
                provider: "jacks".to_string(),
                provider_event_id: event_id.to_string(),
                league: league_key.to_string(),
                country: league.country.to_string(),
                kickoff_utc: kickoff,
                home: home.to_string(),
                away: away.to_string(),
                markets,
                scraped_at: UnifiedEvent::scraped_now(),
                is_live: !event_data["liveBetting"].is_null()
                    && event_data["liveBetting"] != false,
            });
        }

        info!("[Jacks] Fetched {} events for {}", events.len(), league_key);
        Ok(events)
    }
}
