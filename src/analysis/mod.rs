pub mod devig;
pub mod kelly;
pub mod value;

pub use devig::{remove_vig_multiplicative, resolve_orientation, SWAP_HYSTERESIS};
pub use kelly::{edge, kelly_stake};
pub use value::{generate_value_bets, AnalysisSettings};
