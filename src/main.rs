use rocket::launch;

use dlmm_range_engine::{bootstrap, config};

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Load configuration
    let config = config::Config::from_env()
        .expect("Failed to load configuration");

    log::info!(
        "range limits: hard={} recommended={} tolerance={}",
        config.hard_max_bins, config.recommended_max_bins, config.inclusion_tolerance
    );

    bootstrap::build_rocket(&config)
        .expect("Failed to initialize application state")
}
