//! Export configuration loading.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wfs_geojson::EncoderConfig;

/// Settings for an export run, loaded from YAML or the environment.
///
/// ```yaml
/// encoder:
///   legacy_crs: false
///   feature_bounding: true
///   jsonp_enabled: true
/// default_crs: "EPSG:4326"
/// force_lon_lat: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Service-level encoder settings.
    pub encoder: EncoderConfig,

    /// CRS of records that do not name one.
    pub default_crs: Option<String>,

    /// Treat every input CRS as longitude-first.
    pub force_lon_lat: bool,
}

impl ExportConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: ExportConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;

        tracing::info!(
            legacy_crs = config.encoder.legacy_crs,
            feature_bounding = config.encoder.feature_bounding,
            jsonp_enabled = config.encoder.jsonp_enabled,
            "Loaded export config from {:?}",
            path
        );
        Ok(config)
    }

    /// Encoder settings from the environment, no default CRS.
    pub fn from_env() -> Self {
        Self {
            encoder: EncoderConfig::from_env(),
            ..Self::default()
        }
    }

    /// Load from `path` when given, otherwise from the environment.
    pub fn load_or_env(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::from_env()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "encoder:\n  legacy_crs: true\n  jsonp_enabled: true\ndefault_crs: \"EPSG:3857\""
        )
        .unwrap();

        let config = ExportConfig::load(file.path()).unwrap();
        assert!(config.encoder.legacy_crs);
        assert!(config.encoder.jsonp_enabled);
        assert!(config.encoder.feature_bounding);
        assert_eq!(config.default_crs.as_deref(), Some("EPSG:3857"));
        assert!(!config.force_lon_lat);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ExportConfig::load(Path::new("/nonexistent/export.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "encoder: [1, 2").unwrap();
        assert!(ExportConfig::load(file.path()).is_err());
    }
}
