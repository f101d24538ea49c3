//! Output format names handled by the GeoJSON encoder.

use std::collections::HashMap;
use std::fmt;

use wfs_common::{WfsError, WfsResult};

use crate::config::EncoderConfig;
use crate::format_options;
use crate::media_types;
use crate::options::EncodingOptions;

/// Callback used for `text/javascript` requests that do not name one.
pub const DEFAULT_CALLBACK: &str = "parseResponse";

/// A requested GeoJSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// `application/json`
    Json,
    /// `json`
    SimpleJson,
    /// `text/javascript`, always callback-wrapped
    JsonP,
}

impl OutputFormat {
    /// Parse an `outputFormat` request value.
    pub fn from_name(name: &str) -> WfsResult<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case(media_types::JSON) {
            Ok(OutputFormat::Json)
        } else if name.eq_ignore_ascii_case("json") {
            Ok(OutputFormat::SimpleJson)
        } else if name.eq_ignore_ascii_case(media_types::JAVASCRIPT) {
            Ok(OutputFormat::JsonP)
        } else {
            Err(WfsError::UnsupportedFormat(name.to_string()))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Json => media_types::JSON,
            OutputFormat::SimpleJson => "json",
            OutputFormat::JsonP => media_types::JAVASCRIPT,
        }
    }

    /// Media type of responses in this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json | OutputFormat::SimpleJson => media_types::JSON,
            OutputFormat::JsonP => media_types::JAVASCRIPT,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve the encoding options for one request.
///
/// Starts from the service configuration, applies the format options, then
/// enforces the JSONP rules of `format`.
pub fn request_options(
    format: OutputFormat,
    raw_options: &HashMap<String, String>,
    config: &EncoderConfig,
) -> WfsResult<EncodingOptions> {
    if format == OutputFormat::JsonP && !config.jsonp_enabled {
        return Err(WfsError::UnsupportedFormat(format!(
            "{} (JSONP is disabled)",
            format.name()
        )));
    }

    let mut options = format_options::parse_with_defaults(raw_options, config.encoding_options())?;

    if options.callback.is_some() && !config.jsonp_enabled {
        return Err(WfsError::invalid_option(
            format_options::CALLBACK,
            "JSONP is disabled",
        ));
    }
    if format == OutputFormat::JsonP && options.callback.is_none() {
        options.callback = Some(DEFAULT_CALLBACK.to_string());
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jsonp_config() -> EncoderConfig {
        EncoderConfig {
            jsonp_enabled: true,
            ..EncoderConfig::default()
        }
    }

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_name() {
        assert_eq!(OutputFormat::from_name("application/json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_name("JSON").unwrap(), OutputFormat::SimpleJson);
        assert_eq!(OutputFormat::from_name("Text/JavaScript").unwrap(), OutputFormat::JsonP);
        assert!(matches!(
            OutputFormat::from_name("application/gml+xml"),
            Err(WfsError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(OutputFormat::SimpleJson.mime_type(), "application/json");
        assert_eq!(OutputFormat::JsonP.mime_type(), "text/javascript");
        assert_eq!(OutputFormat::Json.to_string(), "application/json");
    }

    #[test]
    fn test_jsonp_disabled() {
        let config = EncoderConfig::default();
        assert!(matches!(
            request_options(OutputFormat::JsonP, &HashMap::new(), &config),
            Err(WfsError::UnsupportedFormat(_))
        ));
        match request_options(OutputFormat::Json, &options(&[("callback", "myFunc")]), &config) {
            Err(WfsError::InvalidOption { option, .. }) => assert_eq!(option, "callback"),
            other => panic!("expected InvalidOption, got {:?}", other),
        }
    }

    #[test]
    fn test_jsonp_default_callback() {
        let resolved = request_options(OutputFormat::JsonP, &HashMap::new(), &jsonp_config()).unwrap();
        assert_eq!(resolved.callback.as_deref(), Some(DEFAULT_CALLBACK));

        let resolved = request_options(
            OutputFormat::JsonP,
            &options(&[("callback", "myFunc")]),
            &jsonp_config(),
        )
        .unwrap();
        assert_eq!(resolved.callback.as_deref(), Some("myFunc"));
    }

    #[test]
    fn test_json_uses_config_baseline() {
        let config = EncoderConfig {
            legacy_crs: true,
            feature_bounding: false,
            jsonp_enabled: false,
        };
        let resolved = request_options(OutputFormat::Json, &HashMap::new(), &config).unwrap();
        assert!(resolved.legacy_crs);
        assert!(!resolved.feature_bounding);
        assert!(resolved.callback.is_none());
    }
}
