//! Streaming export of a feature record stream.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use wfs_common::{CrsDescriptor, CrsResolver, WfsError};
use wfs_geojson::{request_options, EncoderConfig, FeatureCollectionWriter, OutputFormat};

use crate::record::FeatureRecord;

/// One export run.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub output_format: OutputFormat,
    /// Parsed `format_options`.
    pub format_options: HashMap<String, String>,
    /// Maximum number of features written. All valid records are still counted.
    pub max_features: Option<usize>,
    /// CRS of records without a `crs` member.
    pub default_crs: Option<String>,
    pub force_lon_lat: bool,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Json,
            format_options: HashMap::new(),
            max_features: None,
            default_crs: None,
            force_lon_lat: false,
        }
    }
}

/// Counters for a finished export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Non-blank input lines.
    pub read: usize,
    /// Features written.
    pub returned: usize,
    /// Records or features dropped with a warning for an unusable geometry or
    /// attribute.
    pub skipped: usize,
    /// Value written as `totalFeatures`.
    pub total_features: u64,
    pub content_type: &'static str,
}

/// Encode every record of `input` into one FeatureCollection on `output`.
///
/// Malformed lines and unknown CRS identifiers abort the export, leaving a
/// truncated document on `output`. Records with an unusable geometry or
/// attribute are skipped and not counted.
pub fn export<R, W>(
    input: R,
    output: W,
    request: &ExportRequest,
    config: &EncoderConfig,
) -> Result<(W, ExportSummary)>
where
    R: BufRead,
    W: Write,
{
    let options = request_options(request.output_format, &request.format_options, config)
        .context("Invalid request options")?;

    let resolver = CrsResolver::shared();
    let default_crs = request
        .default_crs
        .as_deref()
        .map(|code| resolver.resolve(code, request.force_lon_lat))
        .transpose()
        .context("Invalid default CRS")?;

    let mut writer = FeatureCollectionWriter::new(output, options, 0)
        .context("Failed to start feature collection")?;
    let content_type = writer.content_type();

    let mut read = 0;
    let mut skipped = 0;
    let mut total_features: u64 = 0;

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read input line {}", line_number))?;
        if line.trim().is_empty() {
            continue;
        }
        read += 1;

        let record: FeatureRecord = serde_json::from_str(&line)
            .with_context(|| format!("Malformed feature record on line {}", line_number))?;

        let feature = match layer_crs(resolver, &record, default_crs, request.force_lon_lat)
            .and_then(|crs| record.into_feature(crs))
        {
            Ok(feature) => feature,
            Err(e) if e.is_feature_local() => {
                warn!(line = line_number, error = %e, "Skipping feature record");
                skipped += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read record on line {}", line_number))
            }
        };
        total_features += 1;

        if request
            .max_features
            .is_some_and(|max| writer.returned() >= max)
        {
            continue;
        }

        match writer.push(&feature) {
            Ok(()) => {}
            Err(e) if e.is_feature_local() => {
                warn!(feature = feature.id(), error = %e, "Skipping feature");
                skipped += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to write feature {}", feature.id())),
        }
    }

    writer.set_total_features(total_features);
    let (output, collection) = writer
        .finish(default_crs)
        .context("Failed to finish feature collection")?;

    info!(
        read,
        returned = collection.returned,
        skipped,
        total_features,
        content_type,
        "Export complete"
    );

    Ok((
        output,
        ExportSummary {
            read,
            returned: collection.returned,
            skipped,
            total_features,
            content_type,
        },
    ))
}

fn layer_crs(
    resolver: &CrsResolver,
    record: &FeatureRecord,
    default_crs: Option<CrsDescriptor>,
    force_lon_lat: bool,
) -> Result<Option<CrsDescriptor>, WfsError> {
    match record.crs.as_deref() {
        Some(code) => resolver.resolve(code, force_lon_lat).map(Some),
        None => Ok(default_crs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn run(input: &str, request: &ExportRequest) -> (Value, ExportSummary) {
        let (buffer, summary) =
            export(input.as_bytes(), Vec::new(), request, &EncoderConfig::default()).unwrap();
        (serde_json::from_slice(&buffer).unwrap(), summary)
    }

    const INPUT: &str = r#"{"id":"p.1","crs":"urn:ogc:def:crs:EPSG::4326","geometry":{"type":"Point","coordinates":[10,20]}}

{"id":"p.2","crs":"EPSG:4326","geometry":{"type":"Hexagon","coordinates":[]}}
{"id":"p.3","crs":"urn:ogc:def:crs:EPSG::4326","geometry":{"type":"Point","coordinates":[30,40]}}
"#;

    #[test]
    fn test_bad_record_is_skipped() {
        let (value, summary) = run(INPUT, &ExportRequest::default());
        assert_eq!(summary.read, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.returned, 2);
        assert_eq!(value["totalFeatures"], 2);
        assert_eq!(value["features"][0]["geometry"]["coordinates"], serde_json::json!([20, 10]));
    }

    #[test]
    fn test_max_features_still_counts_total() {
        let request = ExportRequest {
            max_features: Some(1),
            ..ExportRequest::default()
        };
        let (value, summary) = run(INPUT, &request);
        assert_eq!(summary.returned, 1);
        assert_eq!(value["features"].as_array().unwrap().len(), 1);
        assert_eq!(value["totalFeatures"], 2);
    }

    #[test]
    fn test_unknown_crs_aborts() {
        let input = concat!(
            r#"{"id":"m.1","crs":"EPSG:3857","geometry":{"type":"Point","coordinates":[1,2]}}"#,
            "\n",
            r#"{"id":"m.2","crs":"EPSG:123456","geometry":{"type":"Point","coordinates":[3,4]}}"#,
            "\n"
        );
        let result = export(
            input.as_bytes(),
            Vec::new(),
            &ExportRequest::default(),
            &EncoderConfig::default(),
        );
        let err = result.err().unwrap();
        assert!(err.to_string().contains("line 2"));
        assert!(matches!(
            err.downcast_ref::<WfsError>(),
            Some(WfsError::UnknownAuthorityCode(_))
        ));
    }

    #[test]
    fn test_malformed_line_aborts() {
        let result = export(
            "{\"id\": \"p.1\"}\nnot json\n".as_bytes(),
            Vec::new(),
            &ExportRequest::default(),
            &EncoderConfig::default(),
        );
        let err = result.err().unwrap();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_invalid_default_crs_aborts() {
        let request = ExportRequest {
            default_crs: Some("EPSG:abc".to_string()),
            ..ExportRequest::default()
        };
        let result = export("".as_bytes(), Vec::new(), &request, &EncoderConfig::default());
        assert!(result.is_err());
    }
}
