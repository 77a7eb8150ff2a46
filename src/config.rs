use clap::Parser;

use crate::analysis::AnalysisSettings;

/// Value betting scanner: sharp-anchor odds comparison for Dutch books
#[derive(Parser, Debug, Clone)]
#[command(name = "valuebet-bot", version, about)]
pub struct Config {
    /// Minimum edge required to report a bet (e.g. 0.025 = 2.5%)
    #[arg(long, env = "MIN_EDGE", default_value = "0.025")]
    pub min_edge: f64,

    /// Bankroll for stake calculations (EUR)
    #[arg(long, env = "BANKROLL", default_value = "1000.0")]
    pub bankroll: f64,

    /// Kelly multiplier applied to the full-Kelly stake (0.0-1.0)
    #[arg(long, env = "KELLY_FRACTION", default_value = "0.25")]
    pub kelly_fraction: f64,

    /// Hard cap per bet as a fraction of bankroll (e.g. 0.05 = 5%)
    #[arg(long, env = "MAX_STAKE_FRACTION", default_value = "0.05")]
    pub max_stake_fraction: f64,

    /// Maximum league priority to scrape (1 = top leagues only, 2 = include secondary)
    #[arg(long, env = "MAX_PRIORITY", default_value = "2")]
    pub max_priority: u8,

    /// Number of top bets to display in the console report
    #[arg(long, env = "TOP_N", default_value = "10")]
    pub top_n: usize,

    /// Directory for JSON/CSV result files
    #[arg(long, env = "OUTPUT_DIR", default_value = "output")]
    pub output_dir: String,

    /// Kickoff tolerance when matching events across providers (minutes)
    #[arg(long, env = "MATCH_TIME_TOLERANCE_MINUTES", default_value = "12")]
    pub time_tolerance_minutes: i64,

    /// Minimum average team-name similarity for a fuzzy event match (0.0-1.0)
    #[arg(long, env = "TEAM_SIMILARITY_THRESHOLD", default_value = "0.85")]
    pub min_similarity: f64,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "25")]
    pub http_timeout_secs: u64,

    /// Retries per request on transport errors
    #[arg(long, env = "HTTP_RETRIES", default_value = "2")]
    pub http_retries: u32,

    /// Delay between TOTO detail requests in milliseconds
    #[arg(long, env = "TOTO_RATE_LIMIT_MS", default_value = "200")]
    pub toto_rate_limit_ms: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..1.0).contains(&self.min_edge) {
            anyhow::bail!("min_edge must be in [0.0, 1.0)");
        }
        if !(0.0..=1.0).contains(&self.kelly_fraction) {
            anyhow::bail!("kelly_fraction must be between 0.0 and 1.0");
        }
        if !(0.0..=1.0).contains(&self.max_stake_fraction) {
            anyhow::bail!("max_stake_fraction must be between 0.0 and 1.0");
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            anyhow::bail!("min_similarity must be between 0.0 and 1.0");
        }
        if self.bankroll <= 0.0 {
            anyhow::bail!("bankroll must be positive");
        }
        if !(1..=2).contains(&self.max_priority) {
            anyhow::bail!("max_priority must be 1 or 2");
        }
        if self.time_tolerance_minutes < 0 {
            anyhow::bail!("time_tolerance_minutes must be non-negative");
        }
        Ok(())
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            time_tolerance_minutes: self.time_tolerance_minutes,
            min_similarity: self.min_similarity,
            min_edge: self.min_edge,
            kelly_fraction: self.kelly_fraction,
            max_stake_fraction: self.max_stake_fraction,
            bankroll: self.bankroll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config::parse_from(["valuebet-bot"])
    }

    #[test]
    fn defaults_are_valid() {
        let config = base();
        config.validate().unwrap();
        assert_eq!(config.min_edge, 0.025);
        assert_eq!(config.bankroll, 1000.0);
        assert_eq!(config.max_priority, 2);
        assert_eq!(config.http_timeout_secs, 25);
    }

    #[test]
    fn out_of_range_fractions_are_rejected() {
        let mut config = base();
        config.kelly_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = base();
        config.min_edge = 1.0;
        assert!(config.validate().is_err());

        let mut config = base();
        config.bankroll = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn analysis_settings_mirror_cli_values() {
        let config = Config::parse_from([
            "valuebet-bot",
            "--min-edge",
            "0.04",
            "--bankroll",
            "2500",
            "--kelly-fraction",
            "0.5",
        ]);
        let settings = config.analysis_settings();
        assert_eq!(settings.min_edge, 0.04);
        assert_eq!(settings.bankroll, 2500.0);
        assert_eq!(settings.kelly_fraction, 0.5);
        assert_eq!(settings.time_tolerance_minutes, 12);
    }
}
