// tests/price_feed_integration.rs
// ================================
// Feeds the controller from a push-style price stream, the way the dashboard
// receives pool updates, and checks that only significant moves re-derive the
// user's range.

use dlmm_range_engine::engine::controller::{ControllerState, Handle, PriceUpdate, RangeController};
use dlmm_range_engine::engine::validator::RangeLimits;
use dlmm_range_engine::models::{PoolSnapshot, Sidedness, Strategy};
use tokio::sync::mpsc;

fn spawn_feed(prices: Vec<f64>) -> mpsc::Receiver<f64> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        for price in prices {
            if tx.send(price).await.is_err() {
                break;
            }
        }
    });
    rx
}

#[tokio::test]
async fn test_small_ticks_keep_edited_range() {
    let mut controller = RangeController::new(
        &PoolSnapshot::new(100.0, 20.0),
        Strategy::Uniform,
        Sidedness::Dual,
        RangeLimits::default(),
    )
    .expect("controller");

    controller.focus_input(Handle::Min);
    controller.edit_input(97.0);
    controller.blur();
    let edited = controller.range();

    // drift stays within 1% of the price the range was built on
    let mut feed = spawn_feed(vec![100.1, 100.3, 99.8, 100.6, 100.9]);
    let mut updates = Vec::new();
    while let Some(price) = feed.recv().await {
        updates.push(controller.update_active_price(price));
    }

    assert!(updates.iter().all(|u| *u == PriceUpdate::Stored));
    assert_eq!(controller.range(), edited);
    assert_eq!(controller.state(), ControllerState::Validated);
    assert_eq!(controller.active_price(), 100.9);
    println!("✅ {} ticks absorbed without re-deriving", updates.len());
}

#[tokio::test]
async fn test_significant_move_rederives_once() {
    let mut controller = RangeController::new(
        &PoolSnapshot::new(100.0, 20.0),
        Strategy::Bimodal,
        Sidedness::SingleTokenB,
        RangeLimits::default(),
    )
    .expect("controller");

    let mut feed = spawn_feed(vec![100.4, f64::NAN, 98.5, 98.6, 98.4]);
    let mut updates = Vec::new();
    while let Some(price) = feed.recv().await {
        updates.push(controller.update_active_price(price));
    }

    assert_eq!(
        updates,
        vec![
            PriceUpdate::Stored,
            PriceUpdate::Ignored,
            PriceUpdate::Rederived,
            PriceUpdate::Stored,
            PriceUpdate::Stored,
        ]
    );
    // single-sided token B range now ends at the re-derivation price
    assert_eq!(controller.range().max_price, 98.5);
    assert_eq!(controller.state(), ControllerState::Idle);
}
