// tests/bin_ladder_properties.rs
// ===============================
// Ladder-wide properties: round trips, monotone bin counts, snap idempotence,
// and default ranges honouring their sidedness rule.

use approx::assert_relative_eq;
use dlmm_range_engine::engine::range_calculator::compute_default_range;
use dlmm_range_engine::engine::snapper::snap;
use dlmm_range_engine::engine::validator::{inclusion_violation, RangeLimits};
use dlmm_range_engine::math::bin_ladder::{bin_count, bin_id_to_price, price_to_bin_id, BinStep};
use dlmm_range_engine::models::{PriceRange, Sidedness, Strategy};

const STEPS_BPS: [f64; 7] = [1.0, 2.0, 5.0, 10.0, 20.0, 80.0, 250.0];
const PRICES: [f64; 6] = [0.000_042, 0.37, 1.0, 100.0, 23_456.789, 9.5e7];

fn step(bps: f64) -> BinStep {
    BinStep::new(bps).expect("valid bin step")
}

#[test]
fn reference_price_round_trips_exactly() {
    for &bps in &STEPS_BPS {
        for &price in &PRICES {
            let id = price_to_bin_id(price, price, step(bps)).unwrap();
            assert_eq!(id, 0);
            assert_eq!(bin_id_to_price(id, price, step(bps)).unwrap(), price);
        }
    }
}

#[test]
fn integer_bin_ids_round_trip() {
    for &bps in &STEPS_BPS {
        for &reference in &PRICES {
            for n in (-2_000..=2_000).step_by(37) {
                let price = match bin_id_to_price(n, reference, step(bps)) {
                    Ok(p) => p,
                    Err(_) => continue, // extreme corner outside f64 range
                };
                assert_eq!(
                    price_to_bin_id(price, reference, step(bps)).unwrap(),
                    n,
                    "bps={} reference={} n={}",
                    bps,
                    reference,
                    n
                );
            }
        }
    }
}

#[test]
fn arbitrary_price_lands_within_one_bin() {
    let s = step(20.0);
    for &price in &[98.123, 100.0001, 101.99, 250.5, 3.3] {
        let snapped = bin_id_to_price(price_to_bin_id(price, 100.0, s).unwrap(), 100.0, s).unwrap();
        let ratio = (snapped / price).max(price / snapped);
        assert!(ratio <= s.ratio(), "price {} snapped to {}", price, snapped);
    }
}

#[test]
fn bin_count_is_monotone_in_price_ratio() {
    for &bps in &STEPS_BPS {
        let s = step(bps);
        let mut last = 0;
        let mut ratio = 1.0001;
        while ratio < 50.0 {
            let count = bin_count(&PriceRange::new(10.0, 10.0 * ratio), s).unwrap();
            assert!(count >= last, "bps={} ratio={} count={} last={}", bps, ratio, count, last);
            last = count;
            ratio *= 1.0007;
        }
    }
}

#[test]
fn snapping_is_idempotent() {
    for &bps in &STEPS_BPS {
        for &price in &PRICES {
            let once = snap(price * 1.2345, price, step(bps)).unwrap();
            assert_eq!(snap(once, price, step(bps)).unwrap(), once);
        }
    }
}

#[test]
fn default_ranges_satisfy_inclusion_rules() {
    let limits = RangeLimits::default();
    for &bps in &STEPS_BPS {
        for &price in &PRICES {
            for strategy in [Strategy::Uniform, Strategy::BellCurve, Strategy::Bimodal] {
                for sidedness in [Sidedness::Dual, Sidedness::SingleTokenA, Sidedness::SingleTokenB] {
                    let range = compute_default_range(price, step(bps), strategy, sidedness).unwrap();
                    assert!(range.is_ordered());
                    assert!(
                        inclusion_violation(&range, price, sidedness, limits.inclusion_tolerance).is_none(),
                        "{:?}/{:?} at {} ({}bps): {:?}",
                        strategy,
                        sidedness,
                        price,
                        bps,
                        range
                    );
                    // nothing on the disallowed side
                    match sidedness {
                        Sidedness::SingleTokenA => assert!(range.min_price >= price),
                        Sidedness::SingleTokenB => assert!(range.max_price <= price),
                        Sidedness::Dual => {
                            assert!(range.min_price <= price && price <= range.max_price)
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn wider_strategies_cover_more_bins() {
    let s = step(20.0);
    let count = |strategy| {
        let range = compute_default_range(100.0, s, strategy, Sidedness::Dual).unwrap();
        bin_count(&range, s).unwrap()
    };
    assert_eq!(count(Strategy::Uniform), 11);
    assert_eq!(count(Strategy::Bimodal), 21);
    assert_eq!(count(Strategy::BellCurve), 31);

    let range = compute_default_range(100.0, s, Strategy::BellCurve, Sidedness::Dual).unwrap();
    assert_relative_eq!(range.max_price / range.min_price, 1.002f64.powi(30), max_relative = 1e-12);
}
