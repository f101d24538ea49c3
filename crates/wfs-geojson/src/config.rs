//! Process-wide encoder settings.
//!
//! Resolved once at startup and handed to every request explicitly.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::options::EncodingOptions;

/// Environment variable selecting legacy CRS output.
pub const LEGACY_CRS_ENV: &str = "GEOJSON_LEGACY_CRS";
/// Environment variable for the default feature bounding setting.
pub const FEATURE_BOUNDING_ENV: &str = "GEOJSON_FEATURE_BOUNDING";
/// Environment variable enabling JSONP output.
pub const JSONP_ENABLED_ENV: &str = "GEOJSON_JSONP_ENABLED";

/// Service-level GeoJSON output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Write `EPSG:<code>` CRS names and leave coordinates in storage order.
    pub legacy_crs: bool,
    /// Default for per-feature and collection bounding boxes.
    pub feature_bounding: bool,
    /// Allow callback-wrapped (JSONP) responses.
    pub jsonp_enabled: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            legacy_crs: false,
            feature_bounding: true,
            jsonp_enabled: false,
        }
    }
}

impl EncoderConfig {
    /// Load settings from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            legacy_crs: env_flag(LEGACY_CRS_ENV).unwrap_or(defaults.legacy_crs),
            feature_bounding: env_flag(FEATURE_BOUNDING_ENV).unwrap_or(defaults.feature_bounding),
            jsonp_enabled: env_flag(JSONP_ENABLED_ENV).unwrap_or(defaults.jsonp_enabled),
        }
    }

    /// Baseline options for a request before format options are applied.
    pub fn encoding_options(&self) -> EncodingOptions {
        EncodingOptions::default()
            .with_legacy_crs(self.legacy_crs)
            .with_feature_bounding(self.feature_bounding)
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|value| parse_flag(name, &value))
}

/// `true`/`false` or `1`/`0`, case-insensitive. Anything else is logged and
/// left to the default.
fn parse_flag(name: &str, value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Some(false)
    } else {
        warn!(variable = name, value, "Ignoring unrecognised boolean, using default");
        None
    }
}
