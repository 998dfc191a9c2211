use std::env;
use std::str::FromStr;

use anyhow::ensure;

use crate::engine::validator::RangeLimits;
use crate::math::shape::ShapeSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,

    // Range limits
    pub hard_max_bins: u32,
    pub recommended_max_bins: u32,
    pub inclusion_tolerance: f64,
    pub significant_price_change: f64,

    // Chart preview
    pub min_visible_height: f64,
    pub display_padding: f64,
}

impl Default for Config {
    fn default() -> Self {
        let limits = RangeLimits::default();
        let shape = ShapeSettings::default();
        Config {
            port: 8000,
            hard_max_bins: limits.hard_max_bins,
            recommended_max_bins: limits.recommended_max_bins,
            inclusion_tolerance: limits.inclusion_tolerance,
            significant_price_change: limits.significant_price_change,
            min_visible_height: shape.min_visible_height,
            display_padding: shape.display_padding,
        }
    }
}

/// Parsed env var, or `default` when unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Deployment overrides first, then local config
        dotenv::from_filename("range.env").ok();
        dotenv::from_filename("config/range.env").ok();
        dotenv::dotenv().ok();

        let defaults = Config::default();
        let config = Config {
            port: env_or("PORT", defaults.port),
            hard_max_bins: env_or("RANGE_HARD_MAX_BINS", defaults.hard_max_bins),
            recommended_max_bins: env_or("RANGE_RECOMMENDED_MAX_BINS", defaults.recommended_max_bins),
            inclusion_tolerance: env_or("RANGE_INCLUSION_TOLERANCE", defaults.inclusion_tolerance),
            significant_price_change: env_or(
                "RANGE_SIGNIFICANT_PRICE_CHANGE",
                defaults.significant_price_change,
            ),
            min_visible_height: env_or("SHAPE_MIN_VISIBLE_HEIGHT", defaults.min_visible_height),
            display_padding: env_or("SHAPE_DISPLAY_PADDING", defaults.display_padding),
        };
        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> anyhow::Result<()> {
        ensure!(self.hard_max_bins > 0, "RANGE_HARD_MAX_BINS must be positive");
        ensure!(
            self.recommended_max_bins < self.hard_max_bins,
            "RANGE_RECOMMENDED_MAX_BINS ({}) must be below RANGE_HARD_MAX_BINS ({})",
            self.recommended_max_bins,
            self.hard_max_bins
        );
        ensure!(
            self.inclusion_tolerance.is_finite() && (0.0..1.0).contains(&self.inclusion_tolerance),
            "RANGE_INCLUSION_TOLERANCE must be in [0, 1)"
        );
        ensure!(
            self.significant_price_change.is_finite() && self.significant_price_change > 0.0,
            "RANGE_SIGNIFICANT_PRICE_CHANGE must be positive"
        );
        ensure!(
            self.min_visible_height > 0.0 && self.min_visible_height <= 1.0,
            "SHAPE_MIN_VISIBLE_HEIGHT must be in (0, 1]"
        );
        ensure!(
            self.display_padding.is_finite() && self.display_padding >= 0.0,
            "SHAPE_DISPLAY_PADDING must be non-negative"
        );
        Ok(())
    }

    pub fn range_limits(&self) -> RangeLimits {
        RangeLimits {
            hard_max_bins: self.hard_max_bins,
            recommended_max_bins: self.recommended_max_bins,
            inclusion_tolerance: self.inclusion_tolerance,
            significant_price_change: self.significant_price_change,
        }
    }

    pub fn shape_settings(&self) -> ShapeSettings {
        ShapeSettings {
            min_visible_height: self.min_visible_height,
            display_padding: self.display_padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_constants() {
        let config = Config::default();
        assert!(config.check().is_ok());
        assert_eq!(config.range_limits(), RangeLimits::default());
        assert_eq!(config.shape_settings(), ShapeSettings::default());
    }

    #[test]
    fn inconsistent_caps_rejected() {
        let config = Config { recommended_max_bins: 1400, ..Config::default() };
        assert!(config.check().is_err());
        let config = Config { min_visible_height: 0.0, ..Config::default() };
        assert!(config.check().is_err());
        let config = Config { significant_price_change: f64::NAN, ..Config::default() };
        assert!(config.check().is_err());
    }
}
