use rocket::{routes, Build, Rocket};

use crate::config::Config;
use crate::engine::validator::RangeLimits;
use crate::math::shape::ShapeSettings;
use crate::web::routes::{default_range, health, preview_shape, snap_range, validate_range};

pub struct AppState {
    pub limits: RangeLimits,
    pub shape: ShapeSettings,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        config.check()?;
        Ok(AppState {
            limits: config.range_limits(),
            shape: config.shape_settings(),
        })
    }
}

/// Rocket instance with managed state and all routes mounted.
pub fn build_rocket(config: &Config) -> anyhow::Result<Rocket<Build>> {
    let app_state = AppState::new(config)?;

    let figment = rocket::Config::figment()
        .merge(("port", config.port))
        .merge(("address", "0.0.0.0"));

    Ok(rocket::custom(figment)
        .manage(app_state)
        .mount("/", routes![health, default_range, validate_range, snap_range, preview_shape]))
}
