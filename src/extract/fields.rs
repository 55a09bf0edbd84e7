//! Mapping response values to named outputs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ExtractError, FieldPath};
use crate::dispatch::DispatchResult;

/// Maps an output name to a path within a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    /// Key under which the extracted value is returned
    #[serde(alias = "output_name")]
    pub output_name: String,
    /// Dot/bracket path into the response body
    pub path: String,
}

impl FieldMapping {
    /// Creates a mapping.
    #[must_use]
    pub fn new(output_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            path: path.into(),
        }
    }

    fn compile(&self) -> Result<FieldPath, ExtractError> {
        if self.output_name.trim().is_empty() {
            return Err(ExtractError::EmptyOutputName {
                path: self.path.clone(),
            });
        }
        if self.path.trim().is_empty() {
            return Err(ExtractError::EmptyPath {
                output_name: self.output_name.clone(),
            });
        }
        FieldPath::parse(self.path.trim())
    }
}

/// Extracts mapped values from a response body.
///
/// Every mapping is validated before any value is read, so a malformed
/// mapping fails the whole call. Mappings whose path does not resolve
/// are omitted from the output. Extracted values are returned as-is,
/// including objects and arrays. When two mappings share an output name
/// the later one wins.
///
/// # Errors
///
/// Returns [`ExtractError`] if any mapping has an empty name, an empty
/// path, or a malformed path.
///
/// # Example
///
/// ```
/// use webhook_dispatch::extract::{extract, FieldMapping};
/// use serde_json::json;
///
/// let body = json!({ "user": { "tags": ["a", "b"] } });
/// let out = extract(&body, &[FieldMapping::new("first_tag", "user.tags[0]")]).unwrap();
///
/// assert_eq!(out.get("first_tag"), Some(&json!("a")));
/// ```
pub fn extract(body: &Value, mappings: &[FieldMapping]) -> Result<Map<String, Value>, ExtractError> {
    let compiled = compile_all(mappings)?;

    let mut out = Map::new();
    for (name, path) in compiled {
        match path.resolve(body) {
            Some(value) => {
                out.insert(name.to_string(), value.clone());
            }
            None => tracing::debug!("Path '{}' not found for output '{name}'", path.as_str()),
        }
    }
    Ok(out)
}

/// Extracts mapped values from a dispatch result's decoded response body.
///
/// A result without a response body yields an empty map (after the
/// mappings have been validated). Whether to extract from a failed
/// dispatch is the caller's decision.
///
/// # Errors
///
/// Returns [`ExtractError`] if any mapping is malformed.
pub fn extract_fields(
    result: &DispatchResult,
    mappings: &[FieldMapping],
) -> Result<Map<String, Value>, ExtractError> {
    match &result.response_body {
        Some(body) => extract(&body.decoded, mappings),
        None => validate_mappings(mappings).map(|()| Map::new()),
    }
}

/// Checks mapping shape without reading any body.
///
/// # Errors
///
/// Returns the first [`ExtractError`] found, in mapping order.
pub fn validate_mappings(mappings: &[FieldMapping]) -> Result<(), ExtractError> {
    compile_all(mappings).map(|_| ())
}

fn compile_all(mappings: &[FieldMapping]) -> Result<Vec<(&str, FieldPath)>, ExtractError> {
    mappings
        .iter()
        .map(|m| m.compile().map(|path| (m.output_name.as_str(), path)))
        .collect()
}
