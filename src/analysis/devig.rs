use std::collections::BTreeMap;

use tracing::warn;

/// Minimum L1-divergence improvement the swapped orientation must show
/// before it is adopted.
pub const SWAP_HYSTERESIS: f64 = 0.05;

/// Auxiliary keys the scrapers attach to market maps; not outcomes.
const AUX_KEYS: [&str; 2] = ["margin", "line"];

/// Strip the bookmaker margin from a market using the multiplicative
/// (power) method and return true outcome probabilities summing to 1.0.
///
/// Returns `None` for an empty market or any non-positive odds. A
/// single-outcome market maps to probability 1.0.
pub fn remove_vig_multiplicative(odds: &BTreeMap<String, f64>) -> Option<BTreeMap<String, f64>> {
    let outcomes: Vec<(&String, f64)> = odds
        .iter()
        .filter(|(k, _)| !AUX_KEYS.contains(&k.as_str()))
        .map(|(k, &v)| (k, v))
        .collect();

    let n = outcomes.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(BTreeMap::from([(outcomes[0].0.clone(), 1.0)]));
    }
    if outcomes.iter().any(|&(_, v)| v <= 0.0) {
        return None;
    }

    let implied: Vec<(&String, f64)> = outcomes.iter().map(|&(k, v)| (k, 1.0 / v)).collect();
    let total: f64 = implied.iter().map(|&(_, p)| p).sum();

    let exponent = (n as f64 - 1.0) / n as f64;
    let adjusted: Vec<(&String, f64)> = implied
        .iter()
        .map(|&(k, p)| (k, p.powf(1.0 / exponent) / total.powf(1.0 / exponent)))
        .collect();

    let adjusted_total: f64 = adjusted.iter().map(|&(_, p)| p).sum();
    Some(
        adjusted
            .into_iter()
            .map(|(k, p)| (k.clone(), p / adjusted_total))
            .collect(),
    )
}

/// De-vig a soft-book market while checking whether its home/away sides
/// are flipped relative to the anchor.
///
/// Both maps are de-vigged; if either fails, whichever side survived is
/// returned (or an empty map). When the soft market carries both `home`
/// and `away`, the swapped hypothesis (draw untouched) is compared by L1
/// divergence over the anchor's outcome keys and adopted only when it
/// improves by more than [`SWAP_HYSTERESIS`].
pub fn resolve_orientation(
    soft: &BTreeMap<String, f64>,
    anchor: &BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    let normal = remove_vig_multiplicative(soft);
    let anchor_probs = remove_vig_multiplicative(anchor);

    let (normal, anchor_probs) = match (normal, anchor_probs) {
        (Some(n), Some(a)) => (n, a),
        (normal, _) => return normal.unwrap_or_default(),
    };

    let normal_div = divergence(&normal, &anchor_probs);

    if let (Some(&soft_home), Some(&soft_away)) = (soft.get("home"), soft.get("away")) {
        let mut swapped_odds = BTreeMap::from([
            ("home".to_string(), soft_away),
            ("away".to_string(), soft_home),
        ]);
        if let Some(&draw) = soft.get("draw") {
            swapped_odds.insert("draw".to_string(), draw);
        }

        if let Some(swapped) = remove_vig_multiplicative(&swapped_odds) {
            let swapped_div = divergence(&swapped, &anchor_probs);
            if swapped_div + SWAP_HYSTERESIS < normal_div {
                warn!("Detected home/away swap - using swapped probabilities");
                return swapped;
            }
        }
    }

    normal
}

fn divergence(probs: &BTreeMap<String, f64>, anchor: &BTreeMap<String, f64>) -> f64 {
    anchor
        .iter()
        .map(|(k, &a)| (probs.get(k).copied().unwrap_or(0.0) - a).abs())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn market(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn empty_market_yields_none() {
        assert!(remove_vig_multiplicative(&BTreeMap::new()).is_none());
        // Aux keys alone do not make a market.
        let aux_only = market(&[("margin", 4.5), ("line", 2.5)]);
        assert!(remove_vig_multiplicative(&aux_only).is_none());
    }

    #[test]
    fn single_outcome_is_certain() {
        let probs = remove_vig_multiplicative(&market(&[("home", 1.05)])).unwrap();
        assert_eq!(probs.len(), 1);
        assert_relative_eq!(probs["home"], 1.0);
    }

    #[test]
    fn non_positive_odds_yield_none() {
        assert!(remove_vig_multiplicative(&market(&[("over", 1.9), ("under", 0.0)])).is_none());
        assert!(remove_vig_multiplicative(&market(&[("over", 1.9), ("under", -2.0)])).is_none());
    }

    #[test]
    fn equal_odds_split_evenly() {
        let two = remove_vig_multiplicative(&market(&[("over", 1.9), ("under", 1.9)])).unwrap();
        assert_relative_eq!(two["over"], 0.5, epsilon = 1e-12);
        assert_relative_eq!(two["under"], 0.5, epsilon = 1e-12);

        let three =
            remove_vig_multiplicative(&market(&[("home", 2.9), ("draw", 2.9), ("away", 2.9)]))
                .unwrap();
        for p in three.values() {
            assert_relative_eq!(*p, 1.0 / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn probabilities_sum_to_one_and_keep_ordering() {
        let raw = market(&[("home", 1.8), ("draw", 3.6), ("away", 4.8), ("margin", 4.9)]);
        let probs = remove_vig_multiplicative(&raw).unwrap();
        assert_eq!(probs.len(), 3);
        assert!(!probs.contains_key("margin"));
        let total: f64 = probs.values().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        assert!(probs["home"] > probs["draw"]);
        assert!(probs["draw"] > probs["away"]);
    }

    #[test]
    fn aux_line_key_is_stripped() {
        let raw = market(&[("over", 1.85), ("under", 1.95), ("line", 2.5), ("margin", 5.3)]);
        let probs = remove_vig_multiplicative(&raw).unwrap();
        assert_eq!(probs.len(), 2);
        assert!(probs.contains_key("over"));
        assert!(probs.contains_key("under"));
    }

    #[test]
    fn aligned_orientation_is_kept() {
        let soft = market(&[("home", 1.9), ("draw", 3.5), ("away", 4.2)]);
        let anchor = market(&[("home", 1.85), ("draw", 3.6), ("away", 4.5)]);
        let probs = resolve_orientation(&soft, &anchor);
        assert!(probs["home"] > probs["away"]);
    }

    #[test]
    fn clear_swap_is_adopted() {
        // Soft book lists the favourite as away; the anchor has it home.
        let soft = market(&[("home", 4.2), ("draw", 3.5), ("away", 1.9)]);
        let anchor = market(&[("home", 1.85), ("draw", 3.6), ("away", 4.5)]);
        let probs = resolve_orientation(&soft, &anchor);
        assert!(probs["home"] > probs["away"]);
    }

    #[test]
    fn symmetric_market_never_swaps() {
        // Swapping changes nothing here, so the hysteresis bar keeps the
        // original orientation.
        let soft = market(&[("home", 2.6), ("draw", 3.2), ("away", 2.6)]);
        let anchor = market(&[("home", 2.0), ("draw", 3.4), ("away", 4.0)]);
        let probs = resolve_orientation(&soft, &anchor);
        assert_relative_eq!(probs["home"], probs["away"], epsilon = 1e-12);
    }

    // Two-outcome hysteresis geometry: soft probs are (P, 1-P) and the
    // swapped hypothesis mirrors them, so with anchor home-probability A
    // (where 1-P < A < 0.5 < P) the swap improvement is exactly 2 - 4A.
    // The 0.05 bar therefore sits at A = 0.4875.

    #[test]
    fn swap_improvement_above_hysteresis_is_adopted() {
        // Anchor (2.06, 1.96) de-vigs to A ~ 0.4751: improvement ~ 0.099.
        let soft = market(&[("home", 1.25), ("away", 5.0)]);
        let anchor = market(&[("home", 2.06), ("away", 1.96)]);
        let probs = resolve_orientation(&soft, &anchor);
        assert!(probs["home"] < 0.5);
    }

    #[test]
    fn swap_improvement_below_hysteresis_is_rejected() {
        // Anchor (2.02, 2.0) de-vigs to A ~ 0.4950: improvement ~ 0.020,
        // so the strictly better swapped orientation is still rejected.
        let soft = market(&[("home", 1.25), ("away", 5.0)]);
        let anchor = market(&[("home", 2.02), ("away", 2.0)]);
        let probs = resolve_orientation(&soft, &anchor);
        assert!(probs["home"] > 0.5);
    }

    #[test]
    fn failed_anchor_falls_back_to_soft_probs() {
        let soft = market(&[("home", 1.9), ("draw", 3.5), ("away", 4.2)]);
        let probs = resolve_orientation(&soft, &BTreeMap::new());
        let total: f64 = probs.values().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn failed_soft_yields_empty_map() {
        let soft = market(&[("home", 0.0), ("draw", 3.5), ("away", 4.2)]);
        let anchor = market(&[("home", 1.85), ("draw", 3.6), ("away", 4.5)]);
        assert!(resolve_orientation(&soft, &anchor).is_empty());
    }
}
