// validator.rs
// Gate that every candidate range passes before a transaction is built.
//
// All rules run on every call so the UI can show every problem at once.
// Error-severity violations block submission; warnings are informational.

use serde::{Deserialize, Serialize};

use crate::error::ensure_positive_finite;
use crate::math::bin_ladder::{bin_count, BinStep};
use crate::models::{
    PriceRange, SafetyLevel, Sidedness, ValidationReport, Violation, ViolationKind,
};

/// Protocol and policy limits the validator and controller run against.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeLimits {
    /// Protocol cap. Ranges above it are rejected on-chain.
    pub hard_max_bins: u32,
    /// Soft cap; above it the UI warns but lets the user submit.
    pub recommended_max_bins: u32,
    /// Relative tolerance around the active price for inclusion rules.
    pub inclusion_tolerance: f64,
    /// Relative active-price move that re-derives the default range.
    pub significant_price_change: f64,
}

impl Default for RangeLimits {
    fn default() -> Self {
        Self {
            hard_max_bins: 1400,
            recommended_max_bins: 50,
            inclusion_tolerance: 0.001,
            significant_price_change: 0.01,
        }
    }
}

/// Safety level from the bin count alone.
pub fn safety_level(bin_count: u32, limits: &RangeLimits) -> SafetyLevel {
    if bin_count > limits.hard_max_bins {
        SafetyLevel::Error
    } else if bin_count > limits.recommended_max_bins {
        SafetyLevel::Warning
    } else {
        SafetyLevel::Safe
    }
}

/// Sidedness inclusion rule, or `None` when the range is acceptable.
pub fn inclusion_violation(
    range: &PriceRange,
    active_price: f64,
    sidedness: Sidedness,
    tolerance: f64,
) -> Option<Violation> {
    let upper_edge = active_price * (1.0 + tolerance);
    let lower_edge = active_price * (1.0 - tolerance);
    let reaches_down = range.min_price <= upper_edge;
    let reaches_up = range.max_price >= lower_edge;

    let message = match sidedness {
        Sidedness::Dual if !(reaches_down && reaches_up) => {
            "dual-sided deposit excludes the active price; only one token would actually be deposited"
        }
        Sidedness::SingleTokenA if !reaches_down => {
            "single-sided token A range must start at or below the active price"
        }
        Sidedness::SingleTokenB if !reaches_up => {
            "single-sided token B range must end at or above the active price"
        }
        _ => return None,
    };
    Some(Violation::new(ViolationKind::ActivePriceExcluded, message))
}

pub fn validate(
    range: &PriceRange,
    active_price: f64,
    step: BinStep,
    sidedness: Sidedness,
    limits: &RangeLimits,
) -> ValidationReport {
    let mut violations = Vec::new();

    let inputs = ensure_positive_finite("min price", range.min_price)
        .and(ensure_positive_finite("max price", range.max_price))
        .and(ensure_positive_finite("active price", active_price));
    if let Err(err) = inputs {
        violations.push(Violation::from(&err));
        return ValidationReport { bin_count: 0, safety_level: SafetyLevel::Safe, violations };
    }

    if !range.is_ordered() {
        violations.push(Violation::new(
            ViolationKind::InvalidBounds,
            format!(
                "invalid range: min price {} must be below max price {}",
                range.min_price, range.max_price
            ),
        ));
    }

    let count = match bin_count(range, step) {
        Ok(count) => count,
        Err(err) => {
            violations.push(Violation::from(&err));
            0
        }
    };
    let level = safety_level(count, limits);
    match level {
        SafetyLevel::Error => violations.push(Violation::new(
            ViolationKind::RangeTooWide,
            format!(
                "range spans {} bins, above the protocol maximum of {}",
                count, limits.hard_max_bins
            ),
        )),
        SafetyLevel::Warning => violations.push(Violation::new(
            ViolationKind::RangeTooWideWarning,
            format!(
                "range spans {} bins, above the recommended {}; the position will need several accounts and more rent",
                count, limits.recommended_max_bins
            ),
        )),
        SafetyLevel::Safe => {}
    }

    if let Some(v) = inclusion_violation(range, active_price, sidedness, limits.inclusion_tolerance) {
        violations.push(v);
    }

    ValidationReport { bin_count: count, safety_level: level, violations }
}
