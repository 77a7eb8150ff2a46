pub mod matcher;
pub mod normalizer;

pub use matcher::match_events;
pub use normalizer::{normalize_team_name, team_similarity};
