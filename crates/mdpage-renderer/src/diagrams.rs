//! Fenced diagram block rewriting.
//!
//! Diagram blocks (by default ` ```mermaid ` ... ` ``` `) are rewritten into
//! container elements that a client-side script turns into diagrams:
//!
//! ```text
//! ```mermaid                 <div class="mermaid">
//! graph TD; A-->B     =>     graph TD; A-->B
//! ```                        </div>
//! ```
//!
//! Matching is non-greedy and spans lines. Nested fences are not supported:
//! the first closing fence ends the block.

use std::borrow::Cow;

use regex::{Captures, Regex};

use crate::error::RenderError;

/// Delimiters and container class for diagram blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramFence {
    /// Fence opening a block (matched literally, must be followed by whitespace).
    pub open: String,
    /// Fence closing a block (matched literally).
    pub close: String,
    /// Class of the container element a block is rewritten into.
    pub container_class: String,
}

impl Default for DiagramFence {
    fn default() -> Self {
        Self {
            open: "```mermaid".to_owned(),
            close: "```".to_owned(),
            container_class: "mermaid".to_owned(),
        }
    }
}

/// Rewrites fenced diagram blocks into container elements.
#[derive(Debug, Clone)]
pub struct DiagramRewriter {
    fence: DiagramFence,
    block_pattern: Regex,
    container_pattern: Regex,
}

impl DiagramRewriter {
    /// Compile the patterns for `fence`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Pattern`] if the patterns cannot be compiled.
    pub fn new(fence: DiagramFence) -> Result<Self, RenderError> {
        let block_pattern = Regex::new(&format!(
            r"(?s){}\s+(.*?){}",
            regex::escape(&fence.open),
            regex::escape(&fence.close)
        ))?;
        let container_pattern = Regex::new(&format!(
            r#"(?s)<div class="{}">\n(.*?)\n</div>"#,
            regex::escape(&fence.container_class)
        ))?;
        Ok(Self {
            fence,
            block_pattern,
            container_pattern,
        })
    }

    /// Number of diagram blocks in `text`.
    #[must_use]
    pub fn count(&self, text: &str) -> usize {
        self.block_pattern.find_iter(text).count()
    }

    /// Replace every diagram block with a container holding its trimmed body.
    ///
    /// The body is inserted unescaped. Text outside blocks is unchanged.
    #[must_use]
    pub fn rewrite(&self, text: &str) -> String {
        self.block_pattern
            .replace_all(text, |caps: &Captures| self.container(caps[1].trim()))
            .into_owned()
    }

    /// Payloads of the containers in `text`, in document order.
    #[must_use]
    pub fn container_payloads(&self, text: &str) -> Vec<String> {
        self.container_pattern
            .captures_iter(text)
            .map(|caps| caps[1].to_owned())
            .collect()
    }

    /// Move diagram blocks out of `text` so the markdown parser never sees
    /// them.
    ///
    /// Each block becomes a placeholder on its own paragraph and its trimmed
    /// body is recorded. [`DiagramStash::apply`] puts the containers back
    /// after rendering. Text outside blocks is unchanged, so markup that only
    /// looks like a container (inside a code sample, say) is never stashed.
    #[must_use]
    pub fn stash<'a>(&self, text: &'a str) -> (Cow<'a, str>, DiagramStash) {
        let mut stash = DiagramStash {
            container_class: self.fence.container_class.clone(),
            salt: unused_salt(text),
            payloads: Vec::new(),
        };
        let stashed = self.block_pattern.replace_all(text, |caps: &Captures| {
            let placeholder = stash.placeholder(stash.payloads.len());
            stash.payloads.push(caps[1].trim().to_owned());
            format!("\n\n{placeholder}\n\n")
        });
        (stashed, stash)
    }

    fn container(&self, payload: &str) -> String {
        format!(
            "<div class=\"{}\">\n{payload}\n</div>",
            self.fence.container_class
        )
    }
}

/// Diagram containers held back from markdown rendering.
#[derive(Debug, Clone, Default)]
pub struct DiagramStash {
    container_class: String,
    salt: usize,
    payloads: Vec<String>,
}

impl DiagramStash {
    /// Number of stashed containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Whether nothing was stashed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Replace placeholders in rendered `html` with their containers.
    ///
    /// The payload is entity-escaped so the container's text content equals
    /// the original diagram text. Only placeholders issued by this stash are
    /// touched.
    pub fn apply(&self, html: &mut String) {
        for (index, payload) in self.payloads.iter().enumerate() {
            let placeholder = self.placeholder(index);
            let container = format!(
                "<div class=\"{}\">\n{}\n</div>",
                self.container_class,
                escape_diagram_text(payload)
            );
            let paragraph = format!("<p>{placeholder}</p>");
            let target = if html.contains(&paragraph) {
                paragraph
            } else {
                placeholder
            };
            *html = html.replacen(&target, &container, 1);
        }
    }

    fn placeholder(&self, index: usize) -> String {
        format!("{{{{{}{index}}}}}", placeholder_prefix(self.salt))
    }
}

fn placeholder_prefix(salt: usize) -> String {
    format!("DIAGRAM_{salt}_")
}

/// Smallest salt whose placeholder prefix does not occur in `text`.
///
/// Placeholders can then never collide with anything the author wrote.
fn unused_salt(text: &str) -> usize {
    (0..)
        .find(|salt| !text.contains(&placeholder_prefix(*salt)))
        .unwrap_or_default()
}

/// Escape the characters that would otherwise start markup.
///
/// `>` is left alone so arrows like `-->` stay readable in the output.
fn escape_diagram_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<']) {
        return Cow::Borrowed(text);
    }
    let mut result = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
