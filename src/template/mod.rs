//! Placeholder rendering against a runtime context.
//!
//! Templates use Handlebars syntax (`{{object.name}}`). Rendering is
//! lenient by construction:
//! - unresolved placeholders render as an empty string
//! - values are inserted verbatim (no HTML escaping)
//! - a malformed template falls back to the original text with a warning
//!
//! [`render_deep`] applies the same rules to every string leaf of a JSON
//! value, leaving numbers, booleans, nulls and object keys untouched.

mod error;
mod render;


pub use error::TemplateError;
pub use render::{Renderer, render, render_deep};
