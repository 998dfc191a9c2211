// range_calculator.rs
// Default price bounds per strategy and deposit sidedness.
//
// Dual-sided ranges sit symmetrically around the active price. Single-sided
// ranges start exactly at the active price and extend only towards the side
// the deposited token can occupy (token A above, token B below).

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive_finite, RangeResult};
use crate::math::bin_ladder::{bin_id_to_price, percent_from, BinStep};
use crate::models::{PriceRange, Sidedness, Strategy};

/// Default width of a strategy, in bins.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StrategySpan {
    /// Bins on each side of the active bin for dual-sided deposits.
    pub dual_half_width: u32,
    /// Bins away from the active bin for single-sided deposits.
    pub single_width: u32,
}

impl Strategy {
    pub fn default_span(self) -> StrategySpan {
        match self {
            Strategy::Uniform => StrategySpan { dual_half_width: 5, single_width: 10 },
            Strategy::BellCurve => StrategySpan { dual_half_width: 15, single_width: 30 },
            Strategy::Bimodal => StrategySpan { dual_half_width: 10, single_width: 20 },
        }
    }
}

/// Lower/upper bin offsets from the active bin for the default range.
pub fn default_bin_offsets(strategy: Strategy, sidedness: Sidedness) -> (i32, i32) {
    let span = strategy.default_span();
    let dual = span.dual_half_width as i32;
    let single = span.single_width as i32;
    match sidedness {
        Sidedness::Dual => (-dual, dual),
        Sidedness::SingleTokenA => (0, single),
        Sidedness::SingleTokenB => (-single, 0),
    }
}

pub fn compute_default_range(
    active_price: f64,
    step: BinStep,
    strategy: Strategy,
    sidedness: Sidedness,
) -> RangeResult<PriceRange> {
    ensure_positive_finite("active price", active_price)?;
    let (lower, upper) = default_bin_offsets(strategy, sidedness);
    Ok(PriceRange::new(
        bin_id_to_price(lower, active_price, step)?,
        bin_id_to_price(upper, active_price, step)?,
    ))
}

/// `|new - old| / old > threshold`. Unusable prices never count as significant,
/// so a bad tick cannot trigger a re-derivation.
pub fn is_significant_price_change(old_price: f64, new_price: f64, threshold: f64) -> bool {
    if !new_price.is_finite() || new_price <= 0.0 {
        return false;
    }
    if !old_price.is_finite() || old_price <= 0.0 {
        return true;
    }
    (new_price - old_price).abs() / old_price > threshold
}

/// Bound distances from the active price, for display next to the inputs.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSummary {
    pub min_percent: f64,
    pub max_percent: f64,
}

impl RangeSummary {
    pub fn of(range: &PriceRange, active_price: f64) -> Self {
        Self {
            min_percent: percent_from(range.min_price, active_price),
            max_percent: percent_from(range.max_price, active_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn step(bps: f64) -> BinStep {
        BinStep::new(bps).unwrap()
    }

    #[test]
    fn strategy_widths_keep_ordering() {
        let uni = Strategy::Uniform.default_span();
        let bell = Strategy::BellCurve.default_span();
        let bimodal = Strategy::Bimodal.default_span();
        assert!(bell.dual_half_width >= uni.dual_half_width);
        assert!(bell.single_width >= uni.single_width);
        assert!(bimodal.dual_half_width >= uni.dual_half_width);
        for span in [uni, bell, bimodal] {
            assert_eq!(span.single_width, span.dual_half_width * 2);
        }
    }

    #[test]
    fn dual_default_is_symmetric() {
        let s = step(20.0);
        let range = compute_default_range(100.0, s, Strategy::Uniform, Sidedness::Dual).unwrap();
        assert_relative_eq!(range.min_price, 100.0 * 1.002f64.powi(-5), max_relative = 1e-12);
        assert_relative_eq!(range.max_price, 100.0 * 1.002f64.powi(5), max_relative = 1e-12);
        assert_relative_eq!(range.min_price * range.max_price, 100.0 * 100.0, max_relative = 1e-12);
    }

    #[test]
    fn single_sided_defaults_anchor_at_active_price() {
        let s = step(10.0);
        let a = compute_default_range(2.5, s, Strategy::BellCurve, Sidedness::SingleTokenA).unwrap();
        assert_eq!(a.min_price, 2.5);
        assert_relative_eq!(a.max_price, 2.5 * 1.001f64.powi(30), max_relative = 1e-12);

        let b = compute_default_range(2.5, s, Strategy::Bimodal, Sidedness::SingleTokenB).unwrap();
        assert_eq!(b.max_price, 2.5);
        assert_relative_eq!(b.min_price, 2.5 * 1.001f64.powi(-20), max_relative = 1e-12);
    }

    #[test]
    fn default_range_rejects_bad_price() {
        let s = step(20.0);
        assert!(compute_default_range(0.0, s, Strategy::Uniform, Sidedness::Dual).is_err());
        assert!(compute_default_range(f64::NAN, s, Strategy::Uniform, Sidedness::Dual).is_err());
    }

    #[test]
    fn significance_guard() {
        assert!(!is_significant_price_change(100.0, 100.5, 0.01));
        assert!(!is_significant_price_change(100.0, 101.0, 0.01));
        assert!(is_significant_price_change(100.0, 101.5, 0.01));
        assert!(is_significant_price_change(100.0, 98.0, 0.01));
        assert!(!is_significant_price_change(100.0, f64::NAN, 0.01));
        assert!(!is_significant_price_change(100.0, -3.0, 0.01));
        assert!(is_significant_price_change(0.0, 42.0, 0.01));
    }

    #[test]
    fn summary_percentages() {
        let summary = RangeSummary::of(&PriceRange::new(95.0, 110.0), 100.0);
        assert_relative_eq!(summary.min_percent, -5.0, max_relative = 1e-12);
        assert_relative_eq!(summary.max_percent, 10.0, max_relative = 1e-12);
    }
}
