//! Parsing of the `format_options` request parameter.
//!
//! Recognized keys:
//! - `id_policy`: `true` (natural identifier), `false` (no `id`), or an
//!   attribute name whose value becomes the identifier
//! - `callback`: name of the JSONP wrapping function
//! - `feature_bounding`: `true`/`false`, overrides the service default
//!
//! Unknown keys are ignored.

use std::collections::HashMap;

use wfs_common::{WfsError, WfsResult};

use crate::options::{EncodingOptions, IdPolicy};

pub const ID_POLICY: &str = "id_policy";
pub const CALLBACK: &str = "callback";
pub const FEATURE_BOUNDING: &str = "feature_bounding";

/// Tokens that look boolean but are not `true`/`false`.
const AMBIGUOUS_BOOLEANS: &[&str] = &["yes", "no", "on", "off", "t", "f", "y", "n", "1", "0"];

/// Parse options on top of the built-in defaults.
pub fn parse(options: &HashMap<String, String>) -> WfsResult<EncodingOptions> {
    parse_with_defaults(options, EncodingOptions::default())
}

/// Parse options on top of a service-provided baseline.
pub fn parse_with_defaults(
    options: &HashMap<String, String>,
    mut base: EncodingOptions,
) -> WfsResult<EncodingOptions> {
    for (key, value) in options {
        match key.trim().to_ascii_lowercase().as_str() {
            ID_POLICY => base.id_policy = parse_id_policy(value)?,
            CALLBACK => {
                let value = value.trim();
                base.callback = (!value.is_empty()).then(|| value.to_string());
            }
            FEATURE_BOUNDING => base.feature_bounding = parse_bool(FEATURE_BOUNDING, value)?,
            other => tracing::debug!(key = other, "Ignoring unknown format option"),
        }
    }
    Ok(base)
}

/// Split a raw `format_options` value such as `id_policy:name;callback:cb`.
///
/// Pairs are separated by `;`, keys from values by the first `:`. Keys are
/// lowercased. A later duplicate key wins.
pub fn parse_kvp(raw: &str) -> WfsResult<HashMap<String, String>> {
    let mut options = HashMap::new();
    for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once(':')
            .ok_or_else(|| WfsError::invalid_option(pair, "expected key:value"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(WfsError::invalid_option(pair, "empty option name"));
        }
        options.insert(key.to_ascii_lowercase(), value.trim().to_string());
    }
    Ok(options)
}

fn parse_id_policy(value: &str) -> WfsResult<IdPolicy> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        return Ok(IdPolicy::Natural);
    }
    if value.eq_ignore_ascii_case("false") {
        return Ok(IdPolicy::Suppress);
    }
    if value.is_empty() {
        return Err(WfsError::invalid_option(ID_POLICY, "empty value"));
    }
    if AMBIGUOUS_BOOLEANS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
    {
        return Err(WfsError::invalid_option(
            ID_POLICY,
            format!("'{}' is not a boolean (use true or false)", value),
        ));
    }
    if !is_attribute_name(value) {
        return Err(WfsError::invalid_option(
            ID_POLICY,
            format!("'{}' is not a valid attribute name", value),
        ));
    }
    Ok(IdPolicy::ExposeAttribute(value.to_string()))
}

fn parse_bool(option: &str, value: &str) -> WfsResult<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(WfsError::invalid_option(
            option,
            format!("expected true or false, got '{}'", value),
        ))
    }
}

fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_id_policy_values() {
        let parsed = parse(&options(&[("id_policy", "true")])).unwrap();
        assert_eq!(parsed.id_policy, IdPolicy::Natural);

        let parsed = parse(&options(&[("id_policy", "FALSE")])).unwrap();
        assert_eq!(parsed.id_policy, IdPolicy::Suppress);

        let parsed = parse(&options(&[("ID_POLICY", "name")])).unwrap();
        assert_eq!(parsed.id_policy, IdPolicy::ExposeAttribute("name".into()));
    }

    #[test]
    fn test_malformed_id_policy() {
        for bad in ["", "yes", "0", "1abc", "name with space", "a;b"] {
            match parse(&options(&[("id_policy", bad)])) {
                Err(WfsError::InvalidOption { option, .. }) => assert_eq!(option, "id_policy"),
                other => panic!("{:?}: expected InvalidOption, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_callback() {
        let parsed = parse(&options(&[("callback", "myFunc")])).unwrap();
        assert_eq!(parsed.callback.as_deref(), Some("myFunc"));

        let parsed = parse(&options(&[("callback", "  ")])).unwrap();
        assert_eq!(parsed.callback, None);
    }

    #[test]
    fn test_feature_bounding_override() {
        let base = EncodingOptions::default().with_feature_bounding(true);
        let parsed =
            parse_with_defaults(&options(&[("feature_bounding", "false")]), base).unwrap();
        assert!(!parsed.feature_bounding);

        assert!(parse(&options(&[("feature_bounding", "maybe")])).is_err());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let parsed = parse(&options(&[("decimals", "4"), ("foo", "bar")])).unwrap();
        assert_eq!(parsed, EncodingOptions::default());
    }

    #[test]
    fn test_defaults_survive() {
        let base = EncodingOptions::default().with_legacy_crs(true);
        let parsed = parse_with_defaults(&options(&[("id_policy", "false")]), base).unwrap();
        assert!(parsed.legacy_crs);
        assert_eq!(parsed.id_policy, IdPolicy::Suppress);
    }

    #[test]
    fn test_parse_kvp() {
        let parsed = parse_kvp("id_policy:name; CALLBACK:myFunc;;").unwrap();
        assert_eq!(parsed.get("id_policy").map(String::as_str), Some("name"));
        assert_eq!(parsed.get("callback").map(String::as_str), Some("myFunc"));

        let parsed = parse_kvp("filename:a:b").unwrap();
        assert_eq!(parsed.get("filename").map(String::as_str), Some("a:b"));

        assert!(parse_kvp("").unwrap().is_empty());
        assert!(parse_kvp("id_policy").is_err());
        assert!(parse_kvp(":x").is_err());
    }
}
