use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::http::HttpClient;
use super::market_margin;
use super::provider::OddsProvider;
use crate::leagues;
use crate::models::{MarketMap, UnifiedEvent};
use crate::timeutil::normalize_iso_datetime;

const EVENT_LIST_URL: &str = "https://sport-api.toto.nl/event/request";
const EVENT_DETAIL_URL: &str = "https://sport-api.toto.nl/cms/content";

const HEADERS: &[(&str, &str)] = &[
    ("Referer", "https://sport.toto.nl/"),
    ("Origin", "https://sport.toto.nl"),
];

/// TOTO scraper. The event list comes from one POST per competition; the
/// markets live behind a per-event CMS detail endpoint, so each fixture
/// costs an extra request and fetches are paced with a small delay.
pub struct TotoScraper {
    http: Arc<HttpClient>,
    rate_limit: Duration,
}

/// First decimal price of an outcome. Prices below 1.01 are placeholders
/// on suspended selections and are rejected.
pub fn extract_odds(outcome: &Value) -> Option<f64> {
    let decimal = &outcome["prices"][0]["decimal"];
    let value = decimal
        .as_f64()
        .or_else(|| decimal.as_str().and_then(|s| s.parse::<f64>().ok()))?;
    if value < 1.01 {
        return None;
    }
    Some((value * 1000.0).round() / 1000.0)
}

/// First number embedded in an outcome label such as "Over 2,5" or
/// "Meer dan 2.5 goals".
pub fn extract_line_from_label(label: &str) -> Option<f64> {
    let mut number = String::new();
    let mut chars = label.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            break;
        }
        chars.next();
    }
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            number.push(c);
            chars.next();
        } else if (c == '.' || c == ',') && !number.contains('.') {
            chars.next();
            if chars.peek().map_or(false, |d| d.is_ascii_digit()) {
                number.push('.');
            } else {
                break;
            }
        } else {
            break;
        }
    }
    if number.is_empty() {
        return None;
    }
    number.parse::<f64>().ok()
}

fn event_id_of(event: &Value) -> Option<String> {
    for key in ["id", "eventId"] {
        let raw = &event[key];
        if let Some(n) = raw.as_i64() {
            return Some(n.to_string());
        }
        if let Some(s) = raw.as_str() {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

fn outcome_label(outcome: &Value) -> String {
    outcome["name"]
        .as_str()
        .or_else(|| outcome["label"].as_str())
        .unwrap_or("")
        .to_lowercase()
}

fn matches_any(group_code: &str, template_name: &str, keys: &[&str]) -> bool {
    keys.iter()
        .any(|k| group_code.contains(k) || template_name.contains(k))
}

/// Map TOTO's market list onto the supported markets. Market types are
/// recognised by group code or template name; the first complete instance
/// of each type wins.
pub fn parse_markets(markets: &[Value]) -> MarketMap {
    let mut result = MarketMap::new();
    let empty = Vec::new();

    for market in markets {
        let active: Vec<&Value> = market["outcomes"]
            .as_array()
            .unwrap_or(&empty)
            .iter()
            .filter(|o| o["active"].as_bool().unwrap_or(false))
            .collect();
        if active.is_empty() {
            continue;
        }

        let group_code = market["groupCode"].as_str().unwrap_or("").to_lowercase();
        let template_name = market["templateName"].as_str().unwrap_or("").to_lowercase();

        if matches_any(&group_code, &template_name, &["match odds", "1x2", "match result"]) {
            if active.len() == 3 && !result.contains_key("1x2") {
                let mut odds = BTreeMap::new();
                for outcome in &active {
                    let label = outcome_label(outcome);
                    let Some(decimal) = extract_odds(outcome) else {
                        continue;
                    };
                    match label.as_str() {
                        "home" | "thuis" | "1" => {
                            odds.insert("home".to_string(), decimal);
                        }
                        "draw" | "gelijkspel" | "x" => {
                            odds.insert("draw".to_string(), decimal);
                        }
                        "away" | "uit" | "2" => {
                            odds.insert("away".to_string(), decimal);
                        }
                        _ => {}
                    }
                }
                if odds.len() == 3 {
                    odds.insert("margin".to_string(), market_margin(&odds));
                    result.insert("1x2".to_string(), odds);
                }
            }
        } else if group_code.contains("total goals") || group_code.contains("over/under") {
            if active.len() == 2 && !result.contains_key("ou_2_5") {
                let line = market["line"].as_f64().or_else(|| {
                    active
                        .iter()
                        .find_map(|o| extract_line_from_label(&outcome_label(o)))
                });
                let Some(line) = line else { continue };
                if (line - 2.5).abs() >= 0.01 {
                    continue;
                }
                let mut odds = BTreeMap::new();
                for outcome in &active {
                    let label = outcome_label(outcome);
                    let Some(decimal) = extract_odds(outcome) else {
                        continue;
                    };
                    if label.contains("over") || label.contains("meer") {
                        odds.insert("over".to_string(), decimal);
                    } else if label.contains("under") || label.contains("minder") {
                        odds.insert("under".to_string(), decimal);
                    }
                }
                if odds.len() == 2 {
                    odds.insert("margin".to_string(), market_margin(&odds));
                    odds.insert("line".to_string(), 2.5);
                    result.insert("ou_2_5".to_string(), odds);
                }
            }
        } else if group_code.contains("both_teams_to_score") || group_code.contains("btts") {
            if active.len() == 2 && !result.contains_key("btts") {
                let mut odds = BTreeMap::new();
                for outcome in &active {
                    let label = outcome_label(outcome);
                    let Some(decimal) = extract_odds(outcome) else {
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
                    result.insert("btts".to_string(), odds);
                }
            }
        }
    }

    result
}

impl TotoScraper {
    pub fn new(http: Arc<HttpClient>, rate_limit: Duration) -> Self {
        TotoScraper { http, rate_limit }
    }

    async fn fetch_event_list(&self, toto_id: &str) -> Result<Vec<Value>> {
        let payload = json!({
            "includedIds": [{"selectionId": toto_id}],
            "isLive": true,
            "isPreMatch": true,
            "order": "START_TIME",
            "addOutRights": false,
            "grouping": "TIME",
            "eventListType": "STANDARD",
            "sortCode": "MTCH",
        });

        let data = self.http.post_json(EVENT_LIST_URL, &payload, HEADERS).await?;
        let Some(data) = data else {
            return Ok(Vec::new());
        };

        let empty = Vec::new();
        let mut events = Vec::new();
        for group in data["eventGroups"].as_array().unwrap_or(&empty) {
            if let Some(group_events) = group["events"].as_array() {
                events.extend(group_events.iter().cloned());
            }
        }
        Ok(events)
    }

    async fn fetch_event_details(&self, event_id: &str, event_name: &str) -> Option<Value> {
        let freetext = event_name.to_lowercase().replace(' ', "-");
        let params = [
            ("eventId", event_id),
            ("freetext", freetext.as_str()),
            ("route", "Event"),
            ("formFactor", "mobile"),
        ];
        match self.http.get_json(EVENT_DETAIL_URL, &params, HEADERS).await {
            Ok(details) => details,
            Err(e) => {
                warn!("[TOTO] Detail fetch failed for event {}: {}", event_id, e);
                None
            }
        }
    }
}

#[async_trait]
impl OddsProvider for TotoScraper {
    fn name(&self) -> &str {
        "TOTO"
    }

    async fn fetch_league_events(&self, league_key: &str) -> Result<Vec<UnifiedEvent>> {
        let Some(league) = leagues::get_league(league_key) else {
            warn!("[TOTO] No league config for '{}'", league_key);
            return Ok(Vec::new());
        };

        let event_list = self.fetch_event_list(league.toto_id).await?;
        if event_list.is_empty() {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        for event in &event_list {
            let Some(event_id) = event_id_of(event) else {
                continue;
            };
            let event_name = event["name"].as_str().unwrap_or("");

            let Some(details) = self.fetch_event_details(&event_id, event_name).await else {
                continue;
            };

            let markets_data = details["items"][0]["data"]["event"]["markets"]
                .as_array()
                .cloned()
                .unwrap_or_default();
            let markets = parse_markets(&markets_data);
            if markets.is_empty() {
                continue;
            }

            let mut home = None;
            let mut away = None;
            let empty = Vec::new();
            for team in event["teams"].as_array().unwrap_or(&empty) {
                let side = team["side"].as_str().unwrap_or("").to_lowercase();
                let name = team["name"].as_str();
                match side.as_str() {
                    "home" => home = name,
                    "away" => away = name,
                    _ => {}
                }
            }
            let kickoff = normalize_iso_datetime(event["startTime"].as_str().unwrap_or(""));

            if let (Some(home), Some(away)) = (home, away) {
                if !kickoff.is_empty() {
                    results.push(UnifiedEvent {
                        provider: "toto".to_string(),
                        provider_event_id: event_id,
                        league: league_key.to_string(),
                        country: league.country.to_string(),
                        kickoff_utc: kickoff,
                        home: home.to_string(),
                        away: away.to_string(),
                        markets,
                        scraped_at: UnifiedEvent::scraped_now(),
                        is_live: event["liveNow"].as_bool().unwrap_or(false),
                    });
                }
            }

            tokio::time::sleep(self.rate_limit).await;
        }

        info!("[TOTO] Fetched {} events for {}", results.len(), league_key);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn price_extraction_rejects_placeholders() {
        let outcome = json!({"prices": [{"decimal": 2.15}]});
        assert_relative_eq!(extract_odds(&outcome).unwrap(), 2.15);

        let as_string = json!({"prices": [{"decimal": "1.85"}]});
        assert_relative_eq!(extract_odds(&as_string).unwrap(), 1.85);

        let suspended = json!({"prices": [{"decimal": 1.0}]});
        assert_eq!(extract_odds(&suspended), None);

        let missing = json!({"prices": []});
        assert_eq!(extract_odds(&missing), None);
    }

    #[test]
    fn line_is_read_from_labels() {
        assert_relative_eq!(extract_line_from_label("over 2.5").unwrap(), 2.5);
        assert_relative_eq!(extract_line_from_label("meer dan 2,5 goals").unwrap(), 2.5);
        assert_relative_eq!(extract_line_from_label("over 3").unwrap(), 3.0);
        assert_eq!(extract_line_from_label("over"), None);
    }

    #[test]
    fn match_result_market_is_parsed() {
        let markets = vec![json!({
            "groupCode": "MATCH RESULT",
            "outcomes": [
                {"name": "Thuis", "active": true, "prices": [{"decimal": 1.85}]},
                {"name": "Gelijkspel", "active": true, "prices": [{"decimal": 3.6}]},
                {"name": "Uit", "active": true, "prices": [{"decimal": 4.5}]},
            ]
        })];
        let parsed = parse_markets(&markets);
        let odds = &parsed["1x2"];
        assert_relative_eq!(odds["home"], 1.85);
        assert_relative_eq!(odds["draw"], 3.6);
        assert_relative_eq!(odds["away"], 4.5);
        assert!(odds.contains_key("margin"));
    }

    #[test]
    fn total_goals_requires_the_2_5_line() {
        let markets = vec![
            json!({
                "groupCode": "TOTAL GOALS",
                "outcomes": [
                    {"name": "Meer dan 3,5", "active": true, "prices": [{"decimal": 2.6}]},
                    {"name": "Minder dan 3,5", "active": true, "prices": [{"decimal": 1.5}]},
                ]
            }),
            json!({
                "groupCode": "TOTAL GOALS",
                "outcomes": [
                    {"name": "Meer dan 2,5", "active": true, "prices": [{"decimal": 1.95}]},
                    {"name": "Minder dan 2,5", "active": true, "prices": [{"decimal": 1.85}]},
                ]
            }),
        ];
        let parsed = parse_markets(&markets);
        assert_eq!(parsed.len(), 1);
        let odds = &parsed["ou_2_5"];
        assert_relative_eq!(odds["over"], 1.95);
        assert_relative_eq!(odds["under"], 1.85);
        assert_relative_eq!(odds["line"], 2.5);
    }

    #[test]
    fn inactive_outcomes_do_not_form_markets() {
        let markets = vec![json!({
            "groupCode": "BTTS",
            "outcomes": [
                {"name": "Ja", "active": false, "prices": [{"decimal": 1.8}]},
                {"name": "Nee", "active": true, "prices": [{"decimal": 1.95}]},
            ]
        })];
        assert!(parse_markets(&markets).is_empty());
    }

    #[test]
    fn first_complete_market_of_a_type_wins() {
        let markets = vec![
            json!({
                "groupCode": "1X2",
                "outcomes": [
                    {"name": "1", "active": true, "prices": [{"decimal": 2.0}]},
                    {"name": "X", "active": true, "prices": [{"decimal": 3.4}]},
                    {"name": "2", "active": true, "prices": [{"decimal": 3.8}]},
                ]
            }),
            json!({
                "groupCode": "MATCH ODDS",
                "outcomes": [
                    {"name": "1", "active": true, "prices": [{"decimal": 2.1}]},
                    {"name": "X", "active": true, "prices": [{"decimal": 3.3}]},
                    {"name": "2", "active": true, "prices": [{"decimal": 3.7}]},
                ]
            }),
        ];
        let parsed = parse_markets(&markets);
        assert_relative_eq!(parsed["1x2"]["home"], 2.0);
    }
}
