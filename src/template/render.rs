//! Handlebars-backed renderer.

use handlebars::Handlebars;
use serde_json::Value;

use super::TemplateError;

/// Placeholder renderer.
///
/// Holds a Handlebars registry configured for HTTP payloads: escaping is
/// disabled and strict mode is off, so missing paths render as `""`.
/// A renderer carries no per-dispatch state and can be shared freely.
///
/// # Example
///
/// ```
/// use webhook_dispatch::template::Renderer;
/// use serde_json::json;
///
/// let renderer = Renderer::new();
/// let ctx = json!({ "object": { "name": "Acme" } });
///
/// assert_eq!(renderer.render("Hello {{object.name}}", &ctx), "Hello Acme");
/// assert_eq!(renderer.render("{{missing.path}}", &ctx), "");
/// ```
#[derive(Debug)]
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Creates a renderer with escaping disabled and strict mode off.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(false);
        Self { registry }
    }

    /// Renders a template, reporting engine failures.
    ///
    /// Strings without a `{{` opener are returned as-is without touching
    /// the engine.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the template is malformed or a helper fails.
    pub fn try_render(&self, template: &str, context: &Value) -> Result<String, TemplateError> {
        if !template.contains("{{") {
            return Ok(template.to_string());
        }

        Ok(self.registry.render_template(template, context)?)
    }

    /// Renders a template, falling back to the literal text on failure.
    #[must_use]
    pub fn render(&self, template: &str, context: &Value) -> String {
        self.try_render(template, context).unwrap_or_else(|e| {
            tracing::warn!("{e}; using template text as-is");
            template.to_string()
        })
    }

    /// Renders every string leaf of `value`, recursing into arrays and objects.
    #[must_use]
    pub fn render_deep(&self, value: &Value, context: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.render(s, context)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.render_deep(item, context))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.render_deep(v, context)))
                    .collect(),
            ),
            Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a single template string against `context`.
///
/// Convenience wrapper over [`Renderer::render`].
#[must_use]
pub fn render(template: &str, context: &Value) -> String {
    Renderer::new().render(template, context)
}

/// Renders every string leaf of `value` against `context`.
///
/// Convenience wrapper over [`Renderer::render_deep`].
#[must_use]
pub fn render_deep(value: &Value, context: &Value) -> Value {
    Renderer::new().render_deep(value, context)
}
