use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod analysis;
mod config;
mod leagues;
mod matching;
mod models;
mod output;
mod scrapers;
mod timeutil;

use analysis::generate_value_bets;
use config::Config;
use models::UnifiedEvent;
use output::OutputManager;
use scrapers::{HttpClient, JacksScraper, OddsProvider, PinnacleScraper, TotoScraper};

/// Scrape every requested league for one provider, flattening the results.
/// A league that fails is logged and skipped so one bad feed cannot sink
/// the whole run.
async fn scrape_provider(scraper: &dyn OddsProvider, league_keys: &[&str]) -> Vec<UnifiedEvent> {
    let start = Instant::now();
    let mut all_events = Vec::new();

    for league_key in league_keys {
        match scraper.fetch_league_events(league_key).await {
            Ok(events) => all_events.extend(events),
            Err(e) => error!("{} - {}: {:#}", scraper.name(), league_key, e),
        }
    }

    info!(
        "{}: {} events in {:.1}s",
        scraper.name(),
        all_events.len(),
        start.elapsed().as_secs_f64()
    );
    all_events
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let output_manager = OutputManager::new(&config.output_dir)?;

    let league_keys: Vec<&str> = leagues::leagues_by_priority(1, config.max_priority)
        .iter()
        .map(|l| l.key)
        .collect();

    info!("Scraping {} leagues: {}", league_keys.len(), league_keys.join(", "));
    info!("Minimum edge threshold: {:.1}%", config.min_edge * 100.0);
    info!("Bankroll: \u{20ac}{:.2}", config.bankroll);

    let start = Instant::now();

    let http = Arc::new(HttpClient::new(config.http_timeout_secs, config.http_retries)?);
    let pinnacle = PinnacleScraper::new(http.clone());
    let jacks = JacksScraper::new(http.clone());
    let toto = TotoScraper::new(
        http.clone(),
        Duration::from_millis(config.toto_rate_limit_ms),
    );

    let (pinnacle_events, jacks_events, toto_events) = tokio::join!(
        scrape_provider(&pinnacle, &league_keys),
        scrape_provider(&jacks, &league_keys),
        scrape_provider(&toto, &league_keys),
    );

    info!(
        "Scrape finished: pinnacle={}, jacks={}, toto={} ({:.1}s)",
        pinnacle_events.len(),
        jacks_events.len(),
        toto_events.len(),
        start.elapsed().as_secs_f64()
    );

    output_manager.save_events("pinnacle", &pinnacle_events)?;
    output_manager.save_events("jacks", &jacks_events)?;
    output_manager.save_events("toto", &toto_events)?;

    if pinnacle_events.is_empty() {
        anyhow::bail!("No anchor events available - cannot calculate value bets");
    }

    info!("Analyzing value opportunities...");
    let soft_books = BTreeMap::from([
        ("jacks".to_string(), jacks_events),
        ("toto".to_string(), toto_events),
    ]);
    let value_bets =
        generate_value_bets(&pinnacle_events, &soft_books, &config.analysis_settings());

    output_manager.save_value_bets_json(&value_bets)?;
    output_manager.save_value_bets_csv(&value_bets)?;

    if !value_bets.is_empty() {
        output_manager.print_summary(&value_bets, config.top_n);

        let total_ev: f64 = value_bets.iter().map(|b| b.expected_value).sum();
        let total_stake: f64 = value_bets.iter().map(|b| b.recommended_stake).sum();
        let avg_edge: f64 = value_bets.iter().map(|b| b.edge_percentage).sum::<f64>()
            / value_bets.len() as f64;

        info!("Total opportunities: {}", value_bets.len());
        info!("Average edge: {:.2}%", avg_edge);
        info!("Total recommended stake: \u{20ac}{:.2}", total_stake);
        info!("Total expected value: \u{20ac}{:.2}", total_ev);
        if total_stake > 0.0 {
            info!("Expected ROI: {:.2}%", total_ev / total_stake * 100.0);
        }
    }

    info!(
        "Results written to {}/ (value_bets.json, value_bets.csv, per-provider snapshots)",
        config.output_dir
    );
    info!("Total runtime: {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}
