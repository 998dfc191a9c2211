// Bin ladder math for discretized-liquidity pools
// ------------------------------------------------
// Prices live on a geometric ladder: bin n sits at reference * (1 + step)^n,
// where step = bin_step_bps / 10_000 and n is counted from the reference bin.
//
// Notes:
// - All math is f64. Bin ids are i32 and derived by rounding the log ratio,
//   so any price maps onto its nearest bin.
// - Every public function rejects non-positive or non-finite inputs instead of
//   letting NaN/inf leak out to callers.
// - bin_id_to_price uses powi, so bin 0 returns the reference price bit-exact.

use crate::error::{ensure_positive_finite, RangeError, RangeResult};
use crate::models::PriceRange;

pub const BASIS_POINT_MAX: f64 = 10_000.0;

// ------------------------------- Data types ----------------------------------

/// Per-pool bin step in basis points (20 = 0.20% per bin).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BinStep {
    bps: f64,
    log_ratio: f64,
}

impl BinStep {
    pub fn new(bps: f64) -> RangeResult<Self> {
        if !bps.is_finite() || bps <= 0.0 {
            return Err(RangeError::InvalidBinStep(bps));
        }
        let log_ratio = (1.0 + bps / BASIS_POINT_MAX).ln();
        if !log_ratio.is_finite() || log_ratio <= 0.0 {
            return Err(RangeError::InvalidBinStep(bps));
        }
        Ok(Self { bps, log_ratio })
    }

    #[inline]
    pub fn bps(&self) -> f64 {
        self.bps
    }

    /// Price multiplier between neighbouring bins.
    #[inline]
    pub fn ratio(&self) -> f64 {
        1.0 + self.bps / BASIS_POINT_MAX
    }

    #[inline]
    pub fn log_ratio(&self) -> f64 {
        self.log_ratio
    }
}

// ------------------------------- Core math -----------------------------------

/// round(ln(price / reference) / ln(1 + step)).
pub fn price_to_bin_id(price: f64, reference_price: f64, step: BinStep) -> RangeResult<i32> {
    ensure_positive_finite("price", price)?;
    ensure_positive_finite("reference price", reference_price)?;

    let raw = ((price / reference_price).ln() / step.log_ratio()).round();
    if !raw.is_finite() {
        return Err(RangeError::BinIdOverflow(raw));
    }
    if raw < i32::MIN as f64 || raw > i32::MAX as f64 {
        return Err(RangeError::BinIdOverflow(raw));
    }
    Ok(raw as i32)
}

/// reference * (1 + step)^bin_id.
pub fn bin_id_to_price(bin_id: i32, reference_price: f64, step: BinStep) -> RangeResult<f64> {
    ensure_positive_finite("reference price", reference_price)?;
    let price = reference_price * step.ratio().powi(bin_id);
    ensure_positive_finite("bin price", price)
}

/// Number of bins covered by `range`, counting both boundary bins.
///
/// Computed as the difference of boundary bin ids plus one rather than
/// `ceil(log(max/min) / log(1+s))`, so an exact ±N-bin range counts 2N+1 bins
/// regardless of float noise in the ratio. Inverted ranges count zero.
pub fn bin_count(range: &PriceRange, step: BinStep) -> RangeResult<u32> {
    let span = price_to_bin_id(range.max_price, range.min_price, step)?;
    if span < 0 {
        return Ok(0);
    }
    // span <= i32::MAX, so span + 1 fits in u32
    Ok(span as u32 + 1)
}

/// Bin ids of both boundaries, relative to `reference_price`.
pub fn boundary_bin_ids(
    range: &PriceRange,
    reference_price: f64,
    step: BinStep,
) -> RangeResult<(i32, i32)> {
    let lower = price_to_bin_id(range.min_price, reference_price, step)?;
    let upper = price_to_bin_id(range.max_price, reference_price, step)?;
    Ok((lower, upper))
}

// --------------------------- Price & conversions -----------------------------

/// UI price (quote per base) -> price per smallest unit, as the protocol SDK expects.
#[inline]
pub fn price_per_lamport(ui_price: f64, base_decimals: u8, quote_decimals: u8) -> f64 {
    ui_price * 10f64.powi(quote_decimals as i32 - base_decimals as i32)
}

/// Inverse of `price_per_lamport`.
#[inline]
pub fn ui_price_from_lamport(lamport_price: f64, base_decimals: u8, quote_decimals: u8) -> f64 {
    lamport_price * 10f64.powi(base_decimals as i32 - quote_decimals as i32)
}

/// Signed distance of `price` from `reference_price`, in percent.
#[inline]
pub fn percent_from(price: f64, reference_price: f64) -> f64 {
    if reference_price <= 0.0 {
        return 0.0;
    }
    (price / reference_price - 1.0) * 100.0
}

// ---------------------------------- Tests ------------------------------------
