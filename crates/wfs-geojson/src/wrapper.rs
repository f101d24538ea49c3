//! Callback (JSONP) wrapping of response documents.

use std::io::Write;

use bytes::{Bytes, BytesMut};

use wfs_common::{WfsError, WfsResult};

use crate::media_types;

/// A response body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedResponse {
    pub body: Bytes,
    pub content_type: &'static str,
}

/// Validated callback wrapping for one response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseWrapper {
    callback: Option<String>,
}

impl ResponseWrapper {
    /// No wrapping.
    pub fn none() -> Self {
        Self::default()
    }

    /// Wrapping with `callback`. Empty names disable wrapping; anything that
    /// is not a plain identifier is rejected.
    pub fn new(callback: Option<&str>) -> WfsResult<Self> {
        match callback {
            Some(name) if !name.is_empty() => {
                validate_callback_name(name)?;
                Ok(Self {
                    callback: Some(name.to_string()),
                })
            }
            _ => Ok(Self::none()),
        }
    }

    pub fn callback(&self) -> Option<&str> {
        self.callback.as_deref()
    }

    pub fn is_wrapped(&self) -> bool {
        self.callback.is_some()
    }

    pub fn content_type(&self) -> &'static str {
        if self.is_wrapped() {
            media_types::JAVASCRIPT
        } else {
            media_types::JSON
        }
    }

    /// Write `callback(`, if wrapping.
    pub fn write_prefix<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if let Some(callback) = &self.callback {
            out.write_all(callback.as_bytes())?;
            out.write_all(b"(")?;
        }
        Ok(())
    }

    /// Write `)`, if wrapping.
    pub fn write_suffix<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if self.is_wrapped() {
            out.write_all(b")")?;
        }
        Ok(())
    }

    /// Wrap a complete body.
    pub fn wrap(&self, body: Bytes) -> WrappedResponse {
        let body = match &self.callback {
            Some(callback) => {
                let mut wrapped = BytesMut::with_capacity(callback.len() + body.len() + 2);
                wrapped.extend_from_slice(callback.as_bytes());
                wrapped.extend_from_slice(b"(");
                wrapped.extend_from_slice(&body);
                wrapped.extend_from_slice(b")");
                wrapped.freeze()
            }
            None => body,
        };
        WrappedResponse {
            body,
            content_type: self.content_type(),
        }
    }
}

/// Wrap `body` in `callback(...)` when a callback name is given.
pub fn wrap(body: impl Into<Bytes>, callback: Option<&str>) -> WfsResult<WrappedResponse> {
    Ok(ResponseWrapper::new(callback)?.wrap(body.into()))
}

/// Check that a callback name is a plain identifier: an ASCII letter or
/// underscore followed by letters, digits or underscores.
pub fn validate_callback_name(name: &str) -> WfsResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(WfsError::InvalidCallbackName(name.to_string()))
    }
}
