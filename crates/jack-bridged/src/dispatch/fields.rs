//! Minimal `"key": "value"` extraction from request bodies.
//!
//! Bodies are flat JSON objects with string values. The extractor looks for
//! a quoted key followed by a colon and a quoted value; it does not handle
//! nesting, escaped quotes, or non-string values.

use super::errors::DispatchError;

/// Returns the first non-empty string value stored under `key`.
pub(crate) fn extract_field<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("\"{key}\"");
    let mut rest = body;
    while let Some(index) = rest.find(&needle) {
        let after_key = rest.get(index + needle.len()..)?;
        if let Some(value) = quoted_value(after_key) {
            return Some(value);
        }
        rest = after_key;
    }
    None
}

fn quoted_value(after_key: &str) -> Option<&str> {
    let value = after_key
        .trim_start()
        .strip_prefix(':')?
        .trim_start()
        .strip_prefix('"')?;
    let end = value.find('"')?;
    value.get(..end).filter(|value| !value.is_empty())
}

/// Port names named by a connect or disconnect body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PortPair {
    pub(crate) source: String,
    pub(crate) destination: String,
}

impl PortPair {
    pub(crate) fn from_body(body: Option<&[u8]>) -> Result<Self, DispatchError> {
        let body = String::from_utf8_lossy(body.ok_or(DispatchError::MissingBody)?);
        match (
            extract_field(&body, "source"),
            extract_field(&body, "destination"),
        ) {
            (Some(source), Some(destination)) => Ok(Self {
                source: source.to_owned(),
                destination: destination.to_owned(),
            }),
            _ => Err(DispatchError::MissingField),
        }
    }
}
