//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `finrag` CLI

use crate::models::RetrievedDocument;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Prevents panics when truncating strings with multi-byte UTF-8 characters
/// (accents, emojis).
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print info message
pub fn print_info(message: &str) {
    println!("ℹ️  {message}");
}

/// Print warning message
pub fn print_warning(message: &str) {
    eprintln!("⚠️  {message}");
}

/// Print a titled block
pub fn print_section(title: &str, body: &str) {
    println!("\n{title}");
    println!("{}", "━".repeat(60));
    println!("{body}");
    println!("{}", "━".repeat(60));
}

/// One line per retrieved article, in rank order
#[must_use]
pub fn format_sources(documents: &[RetrievedDocument]) -> String {
    documents
        .iter()
        .enumerate()
        .map(|(idx, doc)| {
            format!(
                "  {}. {} [{}] {}",
                idx + 1,
                truncate_str(doc.title(), 80),
                doc.source_tag(),
                doc.link()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
