//! Records exchanged with the search backend

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Placeholder shown when an article has no title
pub const TITLE_PLACEHOLDER: &str = "Titre non disponible";
/// Placeholder shown when an article has no body text
pub const BODY_PLACEHOLDER: &str = "Texte non disponible";
/// Placeholder shown when an article has no source tag
pub const SOURCE_PLACEHOLDER: &str = "Source non disponible";
/// Placeholder shown when an article has no publication date
pub const PUBLISHED_PLACEHOLDER: &str = "Date de publication non disponible";
/// Placeholder shown when an article has no link
pub const LINK_PLACEHOLDER: &str = "Lien non disponible";

/// Index field names read from each hit's `_source`
pub mod fields {
    pub const TITLE: &str = "title";
    pub const MESSAGE: &str = "message";
    pub const TAGS: &str = "tags";
    pub const PUBLISHED: &str = "published";
    pub const LINK: &str = "link";
}

/// One article as returned by the search backend, in rank order.
///
/// Every field is optional: the index schema is not guaranteed to be complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub title: Option<String>,
    pub body: Option<String>,
    pub source_tag: Option<String>,
    pub published_at: Option<String>,
    pub link: Option<String>,
}

impl RetrievedDocument {
    /// Build from a hit's `_source` object
    #[must_use]
    pub fn from_source(source: &Map<String, Value>) -> Self {
        Self {
            title: field_text(source, fields::TITLE),
            body: field_text(source, fields::MESSAGE),
            source_tag: field_text(source, fields::TAGS),
            published_at: field_text(source, fields::PUBLISHED),
            link: field_text(source, fields::LINK),
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(TITLE_PLACEHOLDER)
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or(BODY_PLACEHOLDER)
    }

    pub fn source_tag(&self) -> &str {
        self.source_tag.as_deref().unwrap_or(SOURCE_PLACEHOLDER)
    }

    pub fn published_at(&self) -> &str {
        self.published_at.as_deref().unwrap_or(PUBLISHED_PLACEHOLDER)
    }

    pub fn link(&self) -> &str {
        self.link.as_deref().unwrap_or(LINK_PLACEHOLDER)
    }
}

/// Render a `_source` field as display text.
///
/// Strings are kept verbatim, arrays are joined with ", ", other scalars use
/// their JSON text. Absent and `null` fields yield `None`.
fn field_text(source: &Map<String, Value>, name: &str) -> Option<String> {
    match source.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}
