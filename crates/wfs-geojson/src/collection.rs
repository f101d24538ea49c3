//! Streaming GeoJSON FeatureCollection output.
//!
//! The writer emits each feature as soon as it is pushed, so only one encoded
//! feature is held in memory at a time. Members whose values are only known
//! at the end (`totalFeatures`, `crs`, `bbox`) follow the `features` array.

use std::borrow::Borrow;
use std::io::Write;

use bytes::Bytes;
use serde_json::{json, Value};
use tracing::debug;

use wfs_common::{BoundingBox, CrsDescriptor, Feature, WfsResult};

use crate::feature::encode_feature;
use crate::geometry::bbox_value;
use crate::options::EncodingOptions;
use crate::wrapper::{ResponseWrapper, WrappedResponse};

/// What was written by a [`FeatureCollectionWriter`].
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    /// Number of features written.
    pub returned: usize,
    /// Upstream match count written as `totalFeatures`.
    pub total_features: u64,
    /// Aggregate extent, `None` when disabled or no feature had geometry.
    pub bbox: Option<BoundingBox>,
    /// CRS written in the `crs` member.
    pub crs: Option<CrsDescriptor>,
}

/// Incremental FeatureCollection writer.
///
/// A failed [`push`](Self::push) writes nothing, so the caller decides
/// whether to skip the offending feature or abandon the response.
pub struct FeatureCollectionWriter<W: Write> {
    out: W,
    options: EncodingOptions,
    wrapper: ResponseWrapper,
    total_features: u64,
    returned: usize,
    bbox: Option<BoundingBox>,
    saw_geometry: bool,
    crs: Option<CrsDescriptor>,
}

impl<W: Write> FeatureCollectionWriter<W> {
    /// Validate the callback and write the start of the document.
    ///
    /// Nothing is written if the callback name is rejected.
    pub fn new(mut out: W, options: EncodingOptions, total_features: u64) -> WfsResult<Self> {
        let wrapper = ResponseWrapper::new(options.callback.as_deref())?;

        wrapper.write_prefix(&mut out)?;
        out.write_all(br#"{"type":"FeatureCollection","features":["#)?;

        Ok(Self {
            out,
            options,
            wrapper,
            total_features,
            returned: 0,
            bbox: None,
            saw_geometry: false,
            crs: None,
        })
    }

    /// Media type of the document being written.
    pub fn content_type(&self) -> &'static str {
        self.wrapper.content_type()
    }

    /// Number of features written so far.
    pub fn returned(&self) -> usize {
        self.returned
    }

    /// Replace the match count. `totalFeatures` is written by
    /// [`finish`](Self::finish), so it may be supplied once the input is exhausted.
    pub fn set_total_features(&mut self, total_features: u64) {
        self.total_features = total_features;
    }

    /// Encode and write one feature, using the axis order of its own layer.
    pub fn push(&mut self, feature: &Feature) -> WfsResult<()> {
        let axis_order = self.options.output_axis_order(feature.crs());
        let encoded = encode_feature(feature, &self.options, axis_order)?;
        let bytes = serde_json::to_vec(&encoded.value)?;

        if self.returned > 0 {
            self.out.write_all(b",")?;
        }
        self.out.write_all(&bytes)?;
        self.returned += 1;

        if !self.saw_geometry && feature.geometry().is_some() {
            self.saw_geometry = true;
            self.crs = feature.crs();
        }
        if self.options.feature_bounding {
            self.bbox = BoundingBox::merge(self.bbox, encoded.bbox);
        }

        Ok(())
    }

    /// Write the closing members and return the sink.
    ///
    /// `collection_crs` is written when no geometry-bearing feature supplied a CRS.
    pub fn finish(mut self, collection_crs: Option<CrsDescriptor>) -> WfsResult<(W, CollectionSummary)> {
        let crs = self.crs.or(collection_crs);
        let bbox = if self.options.feature_bounding {
            self.bbox
        } else {
            None
        };

        self.out.write_all(br#"],"totalFeatures":"#)?;
        serde_json::to_writer(&mut self.out, &self.total_features)?;

        if let Some(crs) = &crs {
            self.out.write_all(br#","crs":"#)?;
            serde_json::to_writer(&mut self.out, &crs_value(crs, &self.options))?;
        }

        self.out.write_all(br#","bbox":"#)?;
        let bbox_member = bbox.as_ref().map_or(Value::Null, bbox_value);
        serde_json::to_writer(&mut self.out, &bbox_member)?;

        self.out.write_all(b"}")?;
        self.wrapper.write_suffix(&mut self.out)?;
        self.out.flush()?;

        debug!(
            returned = self.returned,
            total_features = self.total_features,
            crs = ?crs.map(|c| c.epsg_code()),
            "Finished GeoJSON feature collection"
        );

        let summary = CollectionSummary {
            returned: self.returned,
            total_features: self.total_features,
            bbox,
            crs,
        };
        Ok((self.out, summary))
    }
}

/// The `crs` member for a collection.
pub fn crs_value(crs: &CrsDescriptor, options: &EncodingOptions) -> Value {
    json!({
        "type": "name",
        "properties": {
            "name": options.crs_name(crs)
        }
    })
}

/// Write a whole collection, stopping at the first failing feature.
pub fn write_collection<W, I>(
    out: W,
    features: I,
    total_features: u64,
    options: &EncodingOptions,
    crs: Option<CrsDescriptor>,
) -> WfsResult<(W, CollectionSummary)>
where
    W: Write,
    I: IntoIterator,
    I::Item: Borrow<Feature>,
{
    let mut writer = FeatureCollectionWriter::new(out, options.clone(), total_features)?;
    for feature in features {
        writer.push(feature.borrow())?;
    }
    writer.finish(crs)
}

/// Encode a collection into a JSON value. Any callback in `options` is ignored.
pub fn encode_collection<I>(
    features: I,
    total_features: u64,
    options: &EncodingOptions,
    crs: Option<CrsDescriptor>,
) -> WfsResult<Value>
where
    I: IntoIterator,
    I::Item: Borrow<Feature>,
{
    let mut options = options.clone();
    options.callback = None;

    let (buffer, _) = write_collection(Vec::new(), features, total_features, &options, crs)?;
    Ok(serde_json::from_slice(&buffer)?)
}

/// Encode a collection into a complete response body, wrapped when
/// `options.callback` is set.
pub fn encode_response<I>(
    features: I,
    total_features: u64,
    options: &EncodingOptions,
    crs: Option<CrsDescriptor>,
) -> WfsResult<WrappedResponse>
where
    I: IntoIterator,
    I::Item: Borrow<Feature>,
{
    let mut writer = FeatureCollectionWriter::new(Vec::new(), options.clone(), total_features)?;
    let content_type = writer.content_type();
    for feature in features {
        writer.push(feature.borrow())?;
    }
    let (buffer, _) = writer.finish(crs)?;

    Ok(WrappedResponse {
        body: Bytes::from(buffer),
        content_type,
    })
}
