// snapper.rs
// Commits free-form prices onto the bin ladder anchored at the active price.
// Used on input blur and drag release; live drag values stay unsnapped.

use crate::error::RangeResult;
use crate::math::bin_ladder::{bin_id_to_price, price_to_bin_id, BinStep};
use crate::models::{PriceRange, Sidedness};

/// Nearest bin boundary price to `price`.
pub fn snap(price: f64, active_price: f64, step: BinStep) -> RangeResult<f64> {
    let bin_id = price_to_bin_id(price, active_price, step)?;
    bin_id_to_price(bin_id, active_price, step)
}

/// Pull a boundary that landed on the disallowed side back to the active price.
#[inline]
pub fn clamp_to_side(price: f64, active_price: f64, sidedness: Sidedness) -> f64 {
    match sidedness {
        Sidedness::SingleTokenA if price < active_price => active_price,
        Sidedness::SingleTokenB if price > active_price => active_price,
        _ => price,
    }
}

/// Snap both boundaries, then re-apply the sidedness constraint.
/// The result may still be inverted; the validator reports that.
pub fn snap_range(
    range: &PriceRange,
    active_price: f64,
    step: BinStep,
    sidedness: Sidedness,
) -> RangeResult<PriceRange> {
    let min_price = snap(range.min_price, active_price, step)?;
    let max_price = snap(range.max_price, active_price, step)?;
    Ok(PriceRange::new(
        clamp_to_side(min_price, active_price, sidedness),
        clamp_to_side(max_price, active_price, sidedness),
    ))
}
