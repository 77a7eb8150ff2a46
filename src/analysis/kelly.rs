/// Betting edge of an offered price against an estimated true probability:
/// `true_prob * offered_odds - 1.0`. Positive means value.
pub fn edge(true_prob: f64, offered_odds: f64) -> f64 {
    true_prob * offered_odds - 1.0
}

/// Recommended stake using fractional Kelly.
///
/// The win probability is backed out of the edge, full Kelly is scaled by
/// `kelly_fraction`, floored at zero and capped at
/// `bankroll * max_stake_fraction`. Non-positive edge or odds at/below
/// even money return 0.0.
pub fn kelly_stake(
    edge: f64,
    odds: f64,
    bankroll: f64,
    kelly_fraction: f64,
    max_stake_fraction: f64,
) -> f64 {
    debug_assert!((0.0..=1.0).contains(&kelly_fraction), "kelly_fraction out of range");
    debug_assert!((0.0..=1.0).contains(&max_stake_fraction), "max_stake_fraction out of range");
    debug_assert!(bankroll >= 0.0, "bankroll must be non-negative");

    if edge <= 0.0 || odds <= 1.0 {
        return 0.0;
    }

    // Kelly criterion: f = (b*p - q) / b
    let p = (1.0 + edge) / odds;
    let q = 1.0 - p;
    let b = odds - 1.0;
    let kelly = (b * p - q) / b;

    let fractional = (kelly * kelly_fraction).max(0.0);
    (fractional * bankroll).min(bankroll * max_stake_fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn edge_of_fair_price_is_zero() {
        assert_relative_eq!(edge(0.5, 2.0), 0.0);
        assert_relative_eq!(edge(0.25, 4.0), 0.0);
    }

    #[test]
    fn edge_is_positive_when_price_beats_probability() {
        assert_relative_eq!(edge(0.55, 2.0), 0.1, epsilon = 1e-12);
        assert!(edge(0.45, 2.0) < 0.0);
    }

    #[test]
    fn no_stake_without_edge() {
        assert_eq!(kelly_stake(0.0, 2.0, 1000.0, 0.25, 0.05), 0.0);
        assert_eq!(kelly_stake(-0.05, 2.0, 1000.0, 0.25, 0.05), 0.0);
    }

    #[test]
    fn no_stake_at_or_below_even_money() {
        assert_eq!(kelly_stake(0.05, 1.0, 1000.0, 0.25, 0.05), 0.0);
        assert_eq!(kelly_stake(0.05, 0.8, 1000.0, 0.25, 0.05), 0.0);
    }

    #[test]
    fn quarter_kelly_on_small_edge() {
        // p = 1.05 / 2.0 = 0.525, full Kelly = 0.05, quarter = 0.0125
        let stake = kelly_stake(0.05, 2.0, 1000.0, 0.25, 0.05);
        assert_relative_eq!(stake, 12.5, epsilon = 1e-9);
    }

    #[test]
    fn stake_is_capped_at_max_fraction() {
        // Full Kelly = 0.5, quarter = 0.125 -> 125, capped at 5% of 1000
        let stake = kelly_stake(0.5, 2.0, 1000.0, 0.25, 0.05);
        assert_relative_eq!(stake, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn stake_scales_with_kelly_fraction() {
        let quarter = kelly_stake(0.04, 2.5, 1000.0, 0.25, 0.05);
        let half = kelly_stake(0.04, 2.5, 1000.0, 0.5, 0.05);
        assert_relative_eq!(half, quarter * 2.0, epsilon = 1e-9);
    }
}
