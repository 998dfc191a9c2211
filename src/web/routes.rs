use rocket::serde::json::Json;
use rocket::{get, post, State};

use crate::bootstrap::AppState;
use crate::engine::range_calculator::{compute_default_range, RangeSummary};
use crate::engine::snapper;
use crate::engine::validator::{validate, RangeLimits};
use crate::error::{ensure_positive_finite, RangeResult};
use crate::math::bin_ladder::{boundary_bin_ids, BinStep};
use crate::math::shape::{display_window, shape_profile};
use crate::models::{PoolSnapshot, PriceRange, Sidedness, Violation, ViolationKind};
use crate::web::dto::{DefaultRangeRequest, PreviewRequest, PreviewResponse, RangeRequest, RangeResponse};

fn pool_step(pool: &PoolSnapshot) -> RangeResult<BinStep> {
    ensure_positive_finite("active price", pool.active_price)?;
    BinStep::new(pool.bin_step_bps)
}

/// Validate `range` and attach bin ids (absolute when the pool knows its active bin).
fn describe_range(
    range: PriceRange,
    pool: &PoolSnapshot,
    step: BinStep,
    sidedness: Sidedness,
    limits: &RangeLimits,
) -> RangeResponse {
    let report = validate(&range, pool.active_price, step, sidedness, limits);
    let ids = boundary_bin_ids(&range, pool.active_price, step).ok();
    let absolute = |rel: i32| match pool.active_bin_id {
        Some(active) => active.checked_add(rel),
        None => Some(rel),
    };
    let can_submit = report.can_submit();

    RangeResponse {
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        min_price: range.min_price,
        max_price: range.max_price,
        bin_count: report.bin_count,
        lower_bin_id: ids.and_then(|(lower, _)| absolute(lower)),
        upper_bin_id: ids.and_then(|(_, upper)| absolute(upper)),
        safety_level: report.safety_level,
        violations: report.violations,
        can_submit,
        summary: ids.map(|_| RangeSummary::of(&range, pool.active_price)),
    }
}

#[post("/api/v1/range/default", format = "json", data = "<request>")]
pub fn default_range(
    request: Json<DefaultRangeRequest>,
    app_state: &State<AppState>,
) -> Json<RangeResponse> {
    let DefaultRangeRequest { pool, strategy, sidedness } = request.into_inner();

    let computed = pool_step(&pool).and_then(|step| {
        compute_default_range(pool.active_price, step, strategy, sidedness).map(|r| (r, step))
    });
    match computed {
        Ok((range, step)) => Json(describe_range(range, &pool, step, sidedness, &app_state.limits)),
        Err(e) => {
            log::error!("Failed to compute default range: {}", e);
            Json(RangeResponse::rejected(None, &e))
        }
    }
}

#[post("/api/v1/range/validate", format = "json", data = "<request>")]
pub fn validate_range(
    request: Json<RangeRequest>,
    app_state: &State<AppState>,
) -> Json<RangeResponse> {
    let RangeRequest { pool, sidedness, range } = request.into_inner();

    match pool_step(&pool) {
        Ok(step) => Json(describe_range(range, &pool, step, sidedness, &app_state.limits)),
        Err(e) => {
            log::error!("Failed to validate range: {}", e);
            Json(RangeResponse::rejected(Some(range), &e))
        }
    }
}

#[post("/api/v1/range/snap", format = "json", data = "<request>")]
pub fn snap_range(
    request: Json<RangeRequest>,
    app_state: &State<AppState>,
) -> Json<RangeResponse> {
    let RangeRequest { pool, sidedness, range } = request.into_inner();

    let snapped = pool_step(&pool).and_then(|step| {
        snapper::snap_range(&range, pool.active_price, step, sidedness).map(|r| (r, step))
    });
    match snapped {
        Ok((snapped, step)) => Json(describe_range(snapped, &pool, step, sidedness, &app_state.limits)),
        Err(e) => {
            log::error!("Failed to snap range: {}", e);
            Json(RangeResponse::rejected(Some(range), &e))
        }
    }
}

#[post("/api/v1/range/preview", format = "json", data = "<request>")]
pub fn preview_shape(
    request: Json<PreviewRequest>,
    app_state: &State<AppState>,
) -> Json<PreviewResponse> {
    let PreviewRequest { pool, strategy, range } = request.into_inner();

    if !range.is_ordered() {
        return Json(PreviewResponse::empty(vec![Violation::new(
            ViolationKind::InvalidBounds,
            format!(
                "minimum price {} must be below maximum price {}",
                range.min_price, range.max_price
            ),
        )]));
    }

    let bins = pool_step(&pool)
        .and_then(|step| boundary_bin_ids(&range, pool.active_price, step));
    let (lower, upper) = match bins {
        Ok(bins) => bins,
        Err(e) => {
            log::error!("Failed to build shape preview: {}", e);
            return Json(PreviewResponse::empty(vec![Violation::from(&e)]));
        }
    };

    // bounded chart size, measured on the bins actually rendered
    let span = i64::from(upper) - i64::from(lower) + 1;
    if span > i64::from(app_state.limits.hard_max_bins) {
        return Json(PreviewResponse::empty(vec![Violation::new(
            ViolationKind::RangeTooWide,
            format!(
                "range spans {} bins, above the protocol maximum of {}",
                span, app_state.limits.hard_max_bins
            ),
        )]));
    }

    let (window_lower, window_upper) = display_window(lower, upper, app_state.shape.display_padding);
    let bars = shape_profile(
        lower,
        upper,
        strategy,
        pool.live_bin_liquidity.as_deref(),
        &app_state.shape,
    );

    Json(PreviewResponse {
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        window_lower_bin_id: window_lower,
        window_upper_bin_id: window_upper,
        bars,
        violations: Vec::new(),
    })
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}
