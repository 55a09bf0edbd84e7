//! Error type for template rendering.

use thiserror::Error;

/// A template could not be compiled or rendered.
///
/// Never surfaced by a dispatch: the renderer logs it and keeps the
/// literal template text instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Template render failed: {reason}")]
pub struct TemplateError {
    /// Message from the template engine
    pub reason: String,
}

impl From<handlebars::RenderError> for TemplateError {
    fn from(e: handlebars::RenderError) -> Self {
        Self {
            reason: e.to_string(),
        }
    }
}
