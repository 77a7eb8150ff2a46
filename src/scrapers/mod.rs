pub mod http;
pub mod jacks;
pub mod pinnacle;
pub mod provider;
pub mod toto;

pub use http::HttpClient;
pub use jacks::JacksScraper;
pub use pinnacle::PinnacleScraper;
pub use provider::OddsProvider;
pub use toto::TotoScraper;

use std::collections::BTreeMap;

/// Bookmaker overround as a percentage, from the implied probabilities of
/// the offered prices. Odds at or below 1.0 are ignored; an empty or fully
/// degenerate map yields 0.0.
pub(crate) fn market_margin(odds: &BTreeMap<String, f64>) -> f64 {
    let implied: f64 = odds.values().filter(|&&v| v > 1.0).map(|v| 1.0 / v).sum();
    if implied == 0.0 {
        return 0.0;
    }
    ((implied - 1.0) * 100.0 * 1000.0).round() / 1000.0
}
