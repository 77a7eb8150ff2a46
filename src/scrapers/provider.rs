use anyhow::Result;
use async_trait::async_trait;

use crate::models::UnifiedEvent;

/// Trait that every odds provider must implement.
#[async_trait]
pub trait OddsProvider: Send + Sync {
    /// Fetch all upcoming events with parsed markets for one league key.
    async fn fetch_league_events(&self, league_key: &str) -> Result<Vec<UnifiedEvent>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
