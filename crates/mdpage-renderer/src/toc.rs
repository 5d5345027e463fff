//! Heading ids and table of contents.

use std::collections::HashMap;
use std::fmt::Write;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Allocates unique heading ids and collects table of contents entries.
#[derive(Debug, Default)]
pub(crate) struct HeadingIds {
    /// Counter for generating unique heading IDs.
    id_counts: HashMap<String, usize>,
    /// Table of contents entries.
    toc: Vec<TocEntry>,
}

impl HeadingIds {
    /// Reserve an explicit id (`# Heading {#id}`) so generated ids avoid it.
    pub(crate) fn reserve(&mut self, level: u8, text: &str, id: &str) {
        *self.id_counts.entry(id.to_owned()).or_default() += 1;
        self.push(level, text, id.to_owned());
    }

    /// Generate a unique id for a heading and record it.
    pub(crate) fn assign(&mut self, level: u8, text: &str) -> String {
        let mut base_id = slugify(text);
        if base_id.is_empty() {
            base_id = "section".to_owned();
        }
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        self.push(level, text, id.clone());
        id
    }

    fn push(&mut self, level: u8, text: &str, id: String) {
        self.toc.push(TocEntry {
            level,
            title: text.trim().to_owned(),
            id,
        });
    }

    /// Take the table of contents entries.
    pub(crate) fn into_toc(self) -> Vec<TocEntry> {
        self.toc
    }
}

/// Render entries as a nested list of links.
///
/// A deeper heading opens a nested list inside the previous item; a
/// shallower one closes lists until its level is reached.
pub(crate) fn render_toc(entries: &[TocEntry]) -> String {
    let mut html = String::from("<div class=\"toc\">\n");
    let mut levels: Vec<u8> = Vec::new();

    for entry in entries {
        if levels.last().is_none_or(|&level| entry.level > level) {
            html.push_str("<ul>\n");
            levels.push(entry.level);
        } else {
            html.push_str("</li>\n");
            while levels.len() > 1 && levels.last().is_some_and(|&level| entry.level < level) {
                levels.pop();
                html.push_str("</ul>\n</li>\n");
            }
        }
        let _ = write!(
            html,
            "<li><a href=\"#{}\">{}</a>",
            escape_html(&entry.id),
            escape_html(&entry.title)
        );
    }

    for _ in &levels {
        html.push_str("</li>\n</ul>\n");
    }
    html.push_str("</div>\n");
    html
}

/// Convert text to URL-safe slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single dashes,
/// and removes other non-alphanumeric characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
