//! Context assembly from retrieved documents

use serde::Deserialize;
use serde::Serialize;

use crate::models::RetrievedDocument;

/// Marker closing every article block
pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// How each article block is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ContextLayout {
    /// `Titre: ...` lines separated by single newlines
    #[default]
    Plain,
    /// Bold labels separated by blank lines, for markdown display
    Markdown,
}

/// Assembler for creating the prompt context from search hits.
///
/// Pure and deterministic: blocks follow the rank order they are given in and
/// nothing is truncated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextFormatter {
    layout: ContextLayout,
    include_published_date: bool,
}

impl ContextFormatter {
    /// Create a new context formatter
    #[must_use]
    pub const fn new(layout: ContextLayout, include_published_date: bool) -> Self {
        Self {
            layout,
            include_published_date,
        }
    }

    /// Assemble context from search results; empty input gives an empty string
    #[must_use]
    pub fn format(&self, documents: &[RetrievedDocument]) -> String {
        documents.iter().map(|doc| self.format_document(doc)).collect()
    }

    /// Format a single article block, separator included
    #[must_use]
    pub fn format_document(&self, doc: &RetrievedDocument) -> String {
        let mut lines = vec![
            ("Titre", doc.title()),
            ("Texte", doc.body()),
            ("Source", doc.source_tag()),
        ];
        if self.include_published_date {
            lines.push(("Date de publication", doc.published_at()));
        }
        lines.push(("Lien", doc.link()));

        let (rendered, joiner) = match self.layout {
            ContextLayout::Plain => (
                lines
                    .iter()
                    .map(|(label, value)| format!("{label}: {value}"))
                    .collect::<Vec<_>>(),
                "\n",
            ),
            ContextLayout::Markdown => (
                lines
                    .iter()
                    .map(|(label, value)| format!("**{label}:** {value}"))
                    .collect::<Vec<_>>(),
                "\n\n",
            ),
        };

        format!("{}{BLOCK_SEPARATOR}", rendered.join(joiner))
    }

    /// Number of article blocks in a formatted context
    #[must_use]
    pub fn count_blocks(context: &str) -> usize {
        context.matches(BLOCK_SEPARATOR).count()
    }
}
