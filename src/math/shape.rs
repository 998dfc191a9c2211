// Liquidity shape preview
// -----------------------
// Turns a selected bin span + strategy into per-bin bar heights for the range
// chart. Output is presentation data only: nothing here feeds the range that is
// handed to the transaction builder.
//
// Heights are normalised to [min_visible_height, 1.0]. The window is padded on
// both sides so the chart shows context around the selection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{BinLiquidity, Strategy};

const SHAPE_BASE: f64 = 0.4;
const SHAPE_SWING: f64 = 0.6;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSettings {
    pub min_visible_height: f64,
    /// Fraction of the selected span added on each side of the chart window.
    pub display_padding: f64,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self { min_visible_height: 0.4, display_padding: 0.5 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeBar {
    pub bin_id: i32,
    pub height: f64,
    pub in_range: bool,
}

/// Widen `[lower, upper]` by `ceil(bins * padding)` on each side.
pub fn display_window(lower: i32, upper: i32, padding: f64) -> (i32, i32) {
    let (lo, hi) = if lower <= upper { (lower, upper) } else { (upper, lower) };
    let bins = (hi as i64 - lo as i64 + 1) as f64;
    let pad = if padding.is_finite() && padding > 0.0 {
        (bins * padding).ceil().min(i32::MAX as f64) as i32
    } else {
        0
    };
    (lo.saturating_sub(pad), hi.saturating_add(pad))
}

/// 0.0 at the centre of `[lower, upper]`, 1.0 at either edge.
pub fn center_distance_fraction(bin_id: i32, lower: i32, upper: i32) -> f64 {
    let center = (lower as f64 + upper as f64) / 2.0;
    let half = (upper as f64 - lower as f64) / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    ((bin_id as f64 - center).abs() / half).clamp(0.0, 1.0)
}

pub fn strategy_multiplier(strategy: Strategy, center_distance: f64) -> f64 {
    match strategy {
        Strategy::Uniform => 1.0,
        Strategy::BellCurve => SHAPE_BASE + (1.0 - center_distance) * SHAPE_SWING,
        Strategy::Bimodal => SHAPE_BASE + center_distance * SHAPE_SWING,
    }
}

/// Bars for every bin of the padded window around `[lower, upper]`.
///
/// With `live` liquidity the raw weight of each bin (relative to the heaviest
/// bin in the window) is shaped by the strategy; without it, or when every
/// live weight is zero, each bin in range starts from 1.0.
pub fn shape_profile(
    lower: i32,
    upper: i32,
    strategy: Strategy,
    live: Option<&[BinLiquidity]>,
    settings: &ShapeSettings,
) -> Vec<ShapeBar> {
    let (lo, hi) = if lower <= upper { (lower, upper) } else { (upper, lower) };
    let (win_lo, win_hi) = display_window(lo, hi, settings.display_padding);
    let floor = settings.min_visible_height.clamp(0.0, 1.0);

    let weights: HashMap<i32, f64> = live
        .unwrap_or(&[])
        .iter()
        .filter(|b| b.weight.is_finite() && b.weight > 0.0)
        .map(|b| (b.bin_id, b.weight))
        .collect();
    let max_weight = (win_lo..=win_hi)
        .filter_map(|id| weights.get(&id))
        .fold(0.0_f64, |acc, w| acc.max(*w));
    let has_live = max_weight > 0.0;

    (win_lo..=win_hi)
        .map(|bin_id| {
            let raw = if has_live {
                weights.get(&bin_id).copied().unwrap_or(0.0) / max_weight
            } else {
                1.0
            };
            let in_range = (lo..=hi).contains(&bin_id);
            let height = if !in_range {
                if has_live { raw } else { floor }
            } else if strategy == Strategy::Uniform {
                1.0
            } else {
                raw * strategy_multiplier(strategy, center_distance_fraction(bin_id, lo, hi))
            };
            ShapeBar { bin_id, height: height.clamp(floor, 1.0), in_range }
        })
        .collect()
}
