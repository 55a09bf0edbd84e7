//! Parsed extraction paths.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::ExtractError;

/// `name` followed by zero or more `[index]` suffixes.
static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\[\]]*)((?:\[\d+\])*)$").expect("segment pattern is valid")
});

static INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("index pattern is valid"));

/// One navigation step within a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Select a named field of an object (or a numeric index of an array).
    Field(String),
    /// Select an element of an array.
    Index(usize),
}

/// A validated, pre-parsed extraction path.
///
/// # Example
///
/// ```
/// use webhook_dispatch::extract::FieldPath;
/// use serde_json::json;
///
/// let path = FieldPath::parse("user.tags[0]").unwrap();
/// let body = json!({ "user": { "tags": ["a", "b"] } });
///
/// assert_eq!(path.resolve(&body), Some(&json!("a")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    steps: Vec<PathStep>,
}

impl FieldPath {
    /// Parses a dot/bracket path.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::MalformedPath`] for empty segments (`a..b`),
    /// unbalanced brackets, or non-numeric indices.
    pub fn parse(raw: &str) -> Result<Self, ExtractError> {
        let mut steps = Vec::new();

        for segment in raw.split('.') {
            let malformed = || ExtractError::MalformedPath {
                path: raw.to_string(),
                segment: segment.to_string(),
            };

            let captures = SEGMENT.captures(segment).ok_or_else(malformed)?;
            let name = &captures[1];
            let indices = &captures[2];

            if name.is_empty() && indices.is_empty() {
                return Err(malformed());
            }

            if !name.is_empty() {
                steps.push(PathStep::Field(name.to_string()));
            }

            for index in INDEX.captures_iter(indices) {
                // Digits too large for usize can never match an element.
                let index = index[1].parse::<usize>().unwrap_or(usize::MAX);
                steps.push(PathStep::Index(index));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            steps,
        })
    }

    /// Returns the path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed steps.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Walks `root` along the path. `None` when any step is missing.
    #[must_use]
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.steps
            .iter()
            .try_fold(root, |current, step| match (step, current) {
                (PathStep::Field(name), Value::Object(map)) => map.get(name),
                (PathStep::Field(name), Value::Array(items)) => {
                    name.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                (PathStep::Index(i), Value::Array(items)) => items.get(*i),
                _ => None,
            })
    }
}
