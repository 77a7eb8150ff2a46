use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::http::HttpClient;
use super::market_margin;
use super::provider::OddsProvider;
use crate::leagues;
use crate::models::{MarketMap, UnifiedEvent};
use crate::timeutil::normalize_iso_datetime;

const ARCADIA: &str = "https://guest.api.arcadia.pinnacle.com/0.1";
const BRAND_ID: &str = "0";
/// Soccer sport id on the Arcadia guest API.
const SPORT_ID: u32 = 29;

const HEADERS: &[(&str, &str)] = &[
    ("X-API-Key", "CmX2KcMrXuFmNg6YFbmTxE0y9CIrOi0R"),
    ("Accept", "application/json"),
    (
        "User-Agent",
        "Mozilla/5.0 (Linux; Android) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36",
    ),
    ("Referer", "https://www.pinnacle.com/"),
    ("X-Device-UUID", "1a0d9901-387642a9-a10b0cb6-71185001"),
];

/// League-name fragments that flag derivative or junior competitions the
/// exact-pattern matcher must reject.
const EXCLUSIONS: &[&str] = &[
    "corner", "booking", "card", "penalty", "throw", "goal kick", "offsides", "women", "youth",
    "u19", "u21", "u23", "reserve",
];

/// Sharp anchor book scraper on the Arcadia guest API with dynamic league
/// discovery.
pub struct PinnacleScraper {
    http: Arc<HttpClient>,
    league_cache: Mutex<HashMap<String, Option<i64>>>,
    all_leagues_cache: Mutex<Option<Vec<Value>>>,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Convert an American price to decimal odds; tolerant of numeric or
/// string payloads.
pub fn american_to_decimal(price: &Value) -> Option<f64> {
    let p = if let Some(i) = price.as_i64() {
        i
    } else if let Some(f) = price.as_f64() {
        f as i64
    } else if let Some(s) = price.as_str() {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(i) => i,
            Err(_) => s.parse::<f64>().ok()? as i64,
        }
    } else {
        return None;
    };

    if p > 0 {
        Some(round3(1.0 + p as f64 / 100.0))
    } else if p < 0 {
        Some(round3(1.0 + 100.0 / p.unsigned_abs() as f64))
    } else {
        None
    }
}

/// Exact-pattern league matching. A containment hit still counts, but not
/// when the API name carries an exclusion marker.
fn match_league_name(api_name: &str, patterns: &[&str]) -> bool {
    let api_lower = api_name.to_lowercase();
    let api_lower = api_lower.trim();

    for pattern in patterns {
        let pattern_lower = pattern.to_lowercase();
        let pattern_lower = pattern_lower.trim();

        if api_lower == pattern_lower {
            return true;
        }
        if api_lower.contains(pattern_lower) {
            if EXCLUSIONS.iter().any(|excl| api_lower.contains(excl)) {
                return false;
            }
            return true;
        }
    }
    false
}

fn extract_home_away(ev: &Value) -> (Option<String>, Option<String>) {
    let mut home = None;
    let mut away = None;
    if let Some(parts) = ev["parent"]["participants"].as_array() {
        for p in parts {
            match p["alignment"].as_str().map(str::to_lowercase).as_deref() {
                Some("home") => home = p["name"].as_str().map(str::to_string),
                Some("away") => away = p["name"].as_str().map(str::to_string),
                _ => {}
            }
        }
    }
    let fallback = |keys: [&str; 3]| {
        keys.iter()
            .find_map(|k| ev[*k].as_str())
            .map(str::to_string)
    };
    let home = home.or_else(|| fallback(["home", "homeTeam", "team1"]));
    let away = away.or_else(|| fallback(["away", "awayTeam", "team2"]));
    (home, away)
}

/// Parse Arcadia market payloads into the standardized market keys.
pub fn parse_markets(raw_markets: &[Value]) -> MarketMap {
    let mut out = MarketMap::new();

    for m in raw_markets {
        let mtype = m["type"]
            .as_str()
            .or_else(|| m["marketType"].as_str())
            .unwrap_or("")
            .to_lowercase();
        let empty = Vec::new();
        let prices = m["prices"]
            .as_array()
            .or_else(|| m["outcomes"].as_array())
            .unwrap_or(&empty);

        match mtype.as_str() {
            // 1X2 / three-way moneyline
            "moneyline" | "three_way_moneyline" | "match_result" | "result" | "1x2" => {
                let mut three = BTreeMap::new();
                for pr in prices {
                    let designation = pr["designation"]
                        .as_str()
                        .or_else(|| pr["type"].as_str())
                        .unwrap_or("")
                        .to_lowercase();
                    let Some(dec) = american_to_decimal(&pr["price"])
                        .or_else(|| american_to_decimal(&pr["decimal"]))
                    else {
                        continue;
                    };
                    match designation.as_str() {
                        "home" | "1" | "h" | "team1" => {
                            three.insert("home".to_string(), dec);
                        }
                        "draw" | "x" | "tie" => {
                            three.insert("draw".to_string(), dec);
                        }
                        "away" | "2" | "a" | "team2" => {
                            three.insert("away".to_string(), dec);
                        }
                        _ => {}
                    }
                }
                if three.len() == 3 {
                    three.insert("margin".to_string(), market_margin(&three));
                    out.insert("1x2".to_string(), three);
                }
            }
            // Over/Under, 2.5 goals line only
            "totals" | "goal_total" | "match_total" | "total_goals" => {
                let find = |side: &str| {
                    prices.iter().find(|pr| {
                        pr["designation"]
                            .as_str()
                            .map(|d| d.eq_ignore_ascii_case(side))
                            .unwrap_or(false)
                    })
                };
                let over = find("over");
                let under = find("under");
                let points = over
                    .and_then(|o| o["points"].as_f64())
                    .or_else(|| under.and_then(|u| u["points"].as_f64()));
                let Some(points) = points else { continue };
                if (points - 2.5).abs() >= 1e-6 {
                    continue;
                }
                let mut two = BTreeMap::new();
                if let Some(dec) = over.and_then(|o| american_to_decimal(&o["price"])) {
                    two.insert("over".to_string(), dec);
                }
                if let Some(dec) = under.and_then(|u| american_to_decimal(&u["price"])) {
                    two.insert("under".to_string(), dec);
                }
                if two.len() == 2 {
                    two.insert("margin".to_string(), market_margin(&two));
                    two.insert("line".to_string(), 2.5);
                    out.insert("ou_2_5".to_string(), two);
                }
            }
            // Both teams to score
            "both_teams_to_score"
            | "both_teams_to_score_regular_time"
            | "btts"
            | "btts_regular_time" => {
                let mut two = BTreeMap::new();
                for pr in prices {
                    let designation = pr["designation"].as_str().unwrap_or("").to_lowercase();
                    let Some(dec) = american_to_decimal(&pr["price"]) else {
                        continue;
                    };
                    match designation.as_str() {
                        "yes" | "y" => {
                            two.insert("yes".to_string(), dec);
                        }
                        "no" | "n" => {
                            two.insert("no".to_string(), dec);
                        }
                        _ => {}
                    }
                }
                if two.len() == 2 {
                    two.insert("margin".to_string(), market_margin(&two));
                    out.insert("btts".to_string(), two);
                }
            }
            _ => {}
        }
    }

    out
}

impl PinnacleScraper {
    pub fn new(http: Arc<HttpClient>) -> Self {
        PinnacleScraper {
            http,
            league_cache: Mutex::new(HashMap::new()),
            all_leagues_cache: Mutex::new(None),
        }
    }

    async fn fetch_all_leagues(&self) -> Result<Vec<Value>> {
        {
            let cache = self.all_leagues_cache.lock().await;
            if let Some(leagues) = cache.as_ref() {
                return Ok(leagues.clone());
            }
        }

        let url = format!("{ARCADIA}/sports/{SPORT_ID}/leagues");
        let data = self
            .http
            .get_json(&url, &[("all", "true"), ("brandId", BRAND_ID)], HEADERS)
            .await?;

        let leagues = match data {
            Some(Value::Array(items)) => items,
            Some(obj) => obj["leagues"]
                .as_array()
                .or_else(|| obj["items"].as_array())
                .cloned()
                .unwrap_or_default(),
            None => Vec::new(),
        };
        info!("[Pinnacle] Found {} total leagues", leagues.len());

        *self.all_leagues_cache.lock().await = Some(leagues.clone());
        Ok(leagues)
    }

    async fn resolve_league_id(&self, league_key: &str) -> Result<Option<i64>> {
        {
            let cache = self.league_cache.lock().await;
            if let Some(&cached) = cache.get(league_key) {
                return Ok(cached);
            }
        }

        let leagues = self.fetch_all_leagues().await?;
        let patterns: Vec<&str> = leagues::get_league(league_key)
            .map(|l| l.pinnacle_patterns.to_vec())
            .unwrap_or_else(|| vec![league_key]);

        let mut resolved = None;
        for league in &leagues {
            let name = league["name"].as_str().unwrap_or("");
            let id = league["id"].as_i64().or_else(|| league["leagueId"].as_i64());
            if let Some(id) = id {
                if match_league_name(name, &patterns) {
                    info!("[Pinnacle] Matched '{}' to '{}' (id={})", league_key, name, id);
                    resolved = Some(id);
                    break;
                }
            }
        }
        if resolved.is_none() {
            warn!("[Pinnacle] Could not find league id for '{}'", league_key);
        }

        self.league_cache
            .lock()
            .await
            .insert(league_key.to_string(), resolved);
        Ok(resolved)
    }

    async fn fetch_league_matchups(&self, league_id: i64) -> Vec<Value> {
        let url = format!("{ARCADIA}/leagues/{league_id}/matchups");
        match self.http.get_json(&url, &[("brandId", BRAND_ID)], HEADERS).await {
            Ok(Some(Value::Array(items))) => items,
            Ok(Some(obj)) => obj["matchups"]
                .as_array()
                .or_else(|| obj["events"].as_array())
                .cloned()
                .unwrap_or_default(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("[Pinnacle] Failed to fetch matchups for league {}: {}", league_id, e);
                Vec::new()
            }
        }
    }

    async fn fetch_parent_markets(&self, parent_id: i64) -> Vec<Value> {
        let params = [("brandId", BRAND_ID)];
        for url in [
            format!("{ARCADIA}/matchups/{parent_id}/markets/related/straight"),
            format!("{ARCADIA}/matchups/{parent_id}/markets/straight"),
        ] {
            match self.http.get_json(&url, &params, HEADERS).await {
                Ok(Some(Value::Array(items))) if !items.is_empty() => return items,
                Ok(Some(obj)) => {
                    if let Some(markets) = obj["markets"].as_array() {
                        if !markets.is_empty() {
                            return markets.clone();
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug!("[Pinnacle] Market fetch failed for {} via {}: {}", parent_id, url, e);
                }
            }
        }
        Vec::new()
    }
}

#[async_trait]
impl OddsProvider for PinnacleScraper {
    fn name(&self) -> &str {
        "Pinnacle"
    }

    async fn fetch_league_events(&self, league_key: &str) -> Result<Vec<UnifiedEvent>> {
        let Some(league_id) = self.resolve_league_id(league_key).await? else {
            warn!("[Pinnacle] No Arcadia id found for '{}'", league_key);
            return Ok(Vec::new());
        };

        info!("[Pinnacle] Fetching league '{}' (id={})", league_key, league_id);
        let matchups = self.fetch_league_matchups(league_id).await;
        if matchups.is_empty() {
            info!("[Pinnacle] No matchups for league '{}' (id={})", league_key, league_id);
            return Ok(Vec::new());
        }

        let country = leagues::get_league(league_key)
            .map(|l| l.country)
            .unwrap_or("Unknown");

        // Dedupe on the parent id; child matchups (derivative markets)
        // share it with the main fixture.
        let mut seen_parents = HashSet::new();
        let mut catalog = Vec::new();
        for ev in matchups.iter() {
            let Some(parent_id) = ev["parentId"].as_i64().or_else(|| ev["id"].as_i64()) else {
                continue;
            };
            if seen_parents.insert(parent_id) {
                catalog.push((ev, parent_id));
            }
        }

        info!(
            "[Pinnacle] League '{}': requesting markets for {} parents",
            league_key,
            catalog.len()
        );
        let market_sets = futures_util::future::join_all(
            catalog.iter().map(|&(_, pid)| self.fetch_parent_markets(pid)),
        )
        .await;

        let mut events = Vec::new();
        for (&(ev, parent_id), raw_markets) in catalog.iter().zip(market_sets) {
            if raw_markets.is_empty() {
                continue;
            }
            let markets = parse_markets(&raw_markets);
            if markets.is_empty() {
                continue;
            }

            let start = ev["parent"]["startTime"]
                .as_str()
                .or_else(|| ev["startTime"].as_str())
                .or_else(|| ev["start"].as_str())
                .or_else(|| ev["kickoff"].as_str())
                .unwrap_or("");
            let kickoff = normalize_iso_datetime(start);
            let (home, away) = extract_home_away(ev);
            let (Some(home), Some(away)) = (home, away) else {
                continue;
            };
            if kickoff.is_empty() {
                continue;
            }

            events.push(UnifiedEvent {
                provider: "pinnacle".to_string(),
                provider_event_id: parent_id.to_string(),
                league: league_key.to_string(),
                country: country.to_string(),
                kickoff_utc: kickoff,
                home,
                away,
                markets,
                scraped_at: UnifiedEvent::scraped_now(),
                is_live: ev["isLive"].as_bool().unwrap_or(false),
            });
        }

        info!(
            "[Pinnacle] League '{}': matchups={}, emitted={}",
            league_key,
            matchups.len(),
            events.len()
        );
        Ok(events)
    }
}
