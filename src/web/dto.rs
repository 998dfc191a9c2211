use rocket::serde::{Deserialize, Serialize};

use crate::engine::range_calculator::RangeSummary;
use crate::error::RangeError;
use crate::math::shape::ShapeBar;
use crate::models::{PoolSnapshot, PriceRange, SafetyLevel, Sidedness, Strategy, Violation};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultRangeRequest {
    pub pool: PoolSnapshot,
    pub strategy: Strategy,
    pub sidedness: Sidedness,
}

/// Body shared by the validate and snap endpoints.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeRequest {
    pub pool: PoolSnapshot,
    pub sidedness: Sidedness,
    pub range: PriceRange,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub pool: PoolSnapshot,
    pub strategy: Strategy,
    pub range: PriceRange,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeResponse {
    pub timestamp_utc: String,
    pub min_price: f64,
    pub max_price: f64,
    pub bin_count: u32,
    pub lower_bin_id: Option<i32>,
    pub upper_bin_id: Option<i32>,
    pub safety_level: SafetyLevel,
    pub violations: Vec<Violation>,
    pub can_submit: bool,
    pub summary: Option<RangeSummary>,
}

impl RangeResponse {
    /// Response for input the engine could not compute on.
    pub fn rejected(range: Option<PriceRange>, err: &RangeError) -> Self {
        let range = range.unwrap_or(PriceRange::new(0.0, 0.0));
        Self {
            timestamp_utc: chrono::Utc::now().to_rfc3339(),
            min_price: range.min_price,
            max_price: range.max_price,
            bin_count: 0,
            lower_bin_id: None,
            upper_bin_id: None,
            safety_level: SafetyLevel::Safe,
            violations: vec![Violation::from(err)],
            can_submit: false,
            summary: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub timestamp_utc: String,
    pub window_lower_bin_id: i32,
    pub window_upper_bin_id: i32,
    pub bars: Vec<ShapeBar>,
    pub violations: Vec<Violation>,
}

impl PreviewResponse {
    pub fn empty(violations: Vec<Violation>) -> Self {
        Self {
            timestamp_utc: chrono::Utc::now().to_rfc3339(),
            window_lower_bin_id: 0,
            window_upper_bin_id: 0,
            bars: Vec::new(),
            violations,
        }
    }
}
