//! Error types for field extraction.

use thiserror::Error;

/// A field mapping is malformed.
///
/// This is a configuration error, surfaced to the caller. A path that is
/// well-formed but does not resolve is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The mapping has an empty output name.
    #[error("Field mapping for path '{path}' has an empty output name")]
    EmptyOutputName {
        /// Path of the offending mapping
        path: String,
    },

    /// The mapping has an empty path.
    #[error("Field mapping '{output_name}' has an empty path")]
    EmptyPath {
        /// Output name of the offending mapping
        output_name: String,
    },

    /// A path segment could not be parsed.
    #[error("Malformed path '{path}': invalid segment '{segment}'")]
    MalformedPath {
        /// The full path
        path: String,
        /// The segment that failed to parse
        segment: String,
    },
}
