//! Markdown to HTML fragment rendering.
//!
//! Parsing and HTML generation are delegated to pulldown-cmark. This module
//! only adjusts the event stream: heading ids, `[TOC]` markers, code block
//! language hints, and diagram containers held back from the parser.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::diagrams::{DiagramRewriter, DiagramStash};
use crate::toc::{HeadingIds, TocEntry, render_toc};

/// Paragraph text replaced by the table of contents.
const TOC_MARKER: &str = "[TOC]";

/// Markdown extensions enabled for rendering.
///
/// Fenced code blocks are part of CommonMark and always enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct MarkdownOptions {
    /// GFM table syntax.
    pub tables: bool,
    /// Heading ids and `[TOC]` marker replacement.
    pub toc: bool,
    /// Keep the fence language as a `language-*` class on code blocks.
    pub highlight: bool,
    /// `~~strikethrough~~` syntax.
    pub strikethrough: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            toc: true,
            highlight: true,
            strikethrough: true,
        }
    }
}

impl MarkdownOptions {
    /// Parser options for these extensions.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.tables {
            options |= Options::ENABLE_TABLES;
        }
        if self.strikethrough {
            options |= Options::ENABLE_STRIKETHROUGH;
        }
        if self.toc {
            options |= Options::ENABLE_HEADING_ATTRIBUTES;
        }
        options
    }
}

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Text of the first H1 heading.
    pub title: Option<String>,
    /// Table of contents entries (empty unless the toc extension is enabled).
    pub toc: Vec<TocEntry>,
    /// Number of diagram containers in the fragment.
    pub diagram_count: usize,
}

/// Renders markdown text to an HTML fragment.
pub struct MarkdownRenderer<'r> {
    options: MarkdownOptions,
    diagrams: Option<&'r DiagramRewriter>,
}

impl<'r> MarkdownRenderer<'r> {
    /// Create a renderer with the given extensions.
    #[must_use]
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
            diagrams: None,
        }
    }

    /// Rewrite diagram blocks with `rewriter`, keeping their containers out of
    /// markdown parsing.
    ///
    /// Without this, a container followed directly by text would swallow
    /// that text into a raw HTML block.
    #[must_use]
    pub fn with_diagrams(mut self, rewriter: &'r DiagramRewriter) -> Self {
        self.diagrams = Some(rewriter);
        self
    }

    /// Render `markdown` to an HTML fragment.
    #[must_use]
    pub fn render(&self, markdown: &str) -> RenderResult {
        let (text, stash) = match self.diagrams {
            Some(rewriter) => rewriter.stash(markdown),
            None => (markdown.into(), DiagramStash::default()),
        };

        let parser = Parser::new_ext(&text, self.options.parser_options());
        let mut events: Vec<Event<'_>> = parser.map(|event| self.adjust_code_block(event)).collect();

        let title = first_h1_text(&events);
        let mut toc = Vec::new();
        if self.options.toc {
            toc = assign_heading_ids(&mut events);
            events = replace_toc_markers(events, &toc);
        }

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        stash.apply(&mut html);

        tracing::debug!(
            headings = toc.len(),
            diagrams = stash.len(),
            "Rendered markdown"
        );

        RenderResult {
            html,
            title,
            toc,
            diagram_count: stash.len(),
        }
    }

    /// Drop the language hint from fenced code blocks when highlighting is off.
    fn adjust_code_block<'a>(&self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) if !self.options.highlight => {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(CowStr::Borrowed(""))))
            }
            other => other,
        }
    }
}

/// Convert a heading level to its number.
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Plain text of the heading starting at `start`, and the index of its end event.
fn heading_text(events: &[Event<'_>], start: usize) -> (String, usize) {
    let mut text = String::new();
    for (offset, event) in events[start + 1..].iter().enumerate() {
        match event {
            Event::End(TagEnd::Heading(_)) => return (text, start + 1 + offset),
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    (text, events.len())
}

/// Text of the first level-one heading.
fn first_h1_text(events: &[Event<'_>]) -> Option<String> {
    let start = events.iter().position(|event| {
        matches!(
            event,
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            })
        )
    })?;
    let (text, _) = heading_text(events, start);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

/// Give every heading a unique id and return the table of contents.
///
/// Explicit ids (`# Heading {#id}`) are kept.
fn assign_heading_ids(events: &mut [Event<'_>]) -> Vec<TocEntry> {
    let mut ids = HeadingIds::default();
    let mut index = 0;

    while index < events.len() {
        let Event::Start(Tag::Heading { level, id, .. }) = &events[index] else {
            index += 1;
            continue;
        };
        let level = heading_level_to_num(*level);
        let explicit = id.as_deref().map(str::to_owned);
        let (text, end) = heading_text(events, index);

        match explicit {
            Some(explicit) => ids.reserve(level, &text, &explicit),
            None => {
                let generated = ids.assign(level, &text);
                if let Event::Start(Tag::Heading { id, .. }) = &mut events[index] {
                    *id = Some(CowStr::from(generated));
                }
            }
        }
        index = end + 1;
    }

    ids.into_toc()
}

/// Index of the paragraph end if the paragraph starting at `start` is a `[TOC]` marker.
fn toc_marker_end(events: &[Event<'_>], start: usize) -> Option<usize> {
    if !matches!(events.get(start), Some(Event::Start(Tag::Paragraph))) {
        return None;
    }
    let mut text = String::new();
    for (offset, event) in events[start + 1..].iter().enumerate() {
        match event {
            Event::Text(t) => text.push_str(t),
            Event::End(TagEnd::Paragraph) => {
                return (text.trim() == TOC_MARKER).then_some(start + 1 + offset);
            }
            _ => return None,
        }
    }
    None
}

/// Replace `[TOC]` paragraphs with the rendered table of contents.
fn replace_toc_markers<'a>(events: Vec<Event<'a>>, toc: &[TocEntry]) -> Vec<Event<'a>> {
    let mut markers = Vec::new();
    let mut index = 0;
    while index < events.len() {
        if let Some(end) = toc_marker_end(&events, index) {
            markers.push((index, end));
            index = end + 1;
        } else {
            index += 1;
        }
    }
    if markers.is_empty() {
        return events;
    }

    let toc_html = render_toc(toc);
    let mut result = Vec::with_capacity(events.len());
    let mut markers = markers.into_iter().peekable();
    for (index, event) in events.into_iter().enumerate() {
        match markers.peek() {
            Some(&(start, end)) if index >= start => {
                if index == start {
                    result.push(Event::Html(CowStr::from(toc_html.clone())));
                }
                if index == end {
                    markers.next();
                }
            }
            _ => result.push(event),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagrams::DiagramFence;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str) -> RenderResult {
        MarkdownRenderer::new(MarkdownOptions::default()).render(markdown)
    }

    fn plain() -> MarkdownOptions {
        MarkdownOptions {
            tables: false,
            toc: false,
            highlight: false,
            strikethrough: false,
        }
    }

    #[test]
    fn test_render_paragraph() {
        let result = render("Hello **world**");
        assert_eq!(result.html, "<p>Hello <strong>world</strong></p>\n");
        assert!(result.title.is_none());
    }

    #[test]
    fn test_heading_ids() {
        let result = render("# Title\n\n## Getting Started\n\n## Getting Started");
        assert_eq!(
            result.html,
            "<h1 id=\"title\">Title</h1>\n\
             <h2 id=\"getting-started\">Getting Started</h2>\n\
             <h2 id=\"getting-started-1\">Getting Started</h2>\n"
        );
        assert_eq!(result.title.as_deref(), Some("Title"));
        assert_eq!(result.toc.len(), 3);
        assert_eq!(result.toc[2].id, "getting-started-1");
    }

    #[test]
    fn test_explicit_heading_id_kept() {
        let result = render("## Install {#setup}\n\n## Setup");
        assert_eq!(
            result.html,
            "<h2 id=\"setup\">Install</h2>\n<h2 id=\"setup-1\">Setup</h2>\n"
        );
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = render("## The `render` call");
        assert_eq!(result.toc[0].title, "The render call");
        assert_eq!(result.toc[0].id, "the-render-call");
    }

    #[test]
    fn test_toc_disabled_no_ids() {
        let result = MarkdownRenderer::new(plain()).render("# Title\n\n[TOC]");
        assert_eq!(result.html, "<h1>Title</h1>\n<p>[TOC]</p>\n");
        assert_eq!(result.title.as_deref(), Some("Title"));
        assert!(result.toc.is_empty());
    }

    #[test]
    fn test_toc_marker_replaced() {
        let result = render("[TOC]\n\n# One\n\n## Two");
        assert!(result.html.starts_with("<div class=\"toc\">\n<ul>\n"));
        assert!(result.html.contains("<a href=\"#one\">One</a>"));
        assert!(result.html.contains("<a href=\"#two\">Two</a>"));
        assert!(!result.html.contains("[TOC]"));
    }

    #[test]
    fn test_toc_marker_inside_text_not_replaced() {
        let result = render("See [TOC] below");
        assert_eq!(result.html, "<p>See [TOC] below</p>\n");
    }

    #[test]
    fn test_tables_enabled() {
        let result = render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(result.html.contains("<table>"));
        assert!(result.html.contains("<td>1</td>"));
    }

    #[test]
    fn test_tables_disabled() {
        let result = MarkdownRenderer::new(plain()).render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(!result.html.contains("<table>"));
    }

    #[test]
    fn test_code_block_language_hint() {
        let result = render("```rust\nfn main() {}\n```");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn test_code_block_without_highlight() {
        let result = MarkdownRenderer::new(plain()).render("```rust\nfn main() {}\n```");
        assert_eq!(result.html, "<pre><code>fn main() {}\n</code></pre>\n");
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(render("~~gone~~").html, "<p><del>gone</del></p>\n");
    }

    #[test]
    fn test_end_to_end_fragment() {
        let rewriter = DiagramRewriter::new(DiagramFence::default()).unwrap();
        let result = MarkdownRenderer::new(MarkdownOptions::default())
            .with_diagrams(&rewriter)
            .render("# Title\n```mermaid\ngraph TD; A-->B\n```\nDone.");

        assert_eq!(
            result.html,
            "<h1 id=\"title\">Title</h1>\n\
             <div class=\"mermaid\">\ngraph TD; A-->B\n</div>\n\
             <p>Done.</p>\n"
        );
        assert_eq!(result.title.as_deref(), Some("Title"));
        assert_eq!(result.diagram_count, 1);
    }

    #[test]
    fn test_diagram_text_not_parsed_as_markdown() {
        let rewriter = DiagramRewriter::new(DiagramFence::default()).unwrap();
        let result = MarkdownRenderer::new(MarkdownOptions::default())
            .with_diagrams(&rewriter)
            .render("```mermaid\ngraph TD\n\n  *A* --> _B_\n```");

        assert_eq!(
            result.html,
            "<div class=\"mermaid\">\ngraph TD\n\n  *A* --> _B_\n</div>\n"
        );
    }

    #[test]
    fn test_multiple_diagrams_keep_order() {
        let rewriter = DiagramRewriter::new(DiagramFence::default()).unwrap();
        let result = MarkdownRenderer::new(MarkdownOptions::default())
            .with_diagrams(&rewriter)
            .render("```mermaid\nfirst\n```\n\ntext\n\n```mermaid\nsecond\n```");

        let first = result.html.find("first").unwrap();
        let second = result.html.find("second").unwrap();
        assert!(first < second);
        assert_eq!(result.diagram_count, 2);
        assert_eq!(result.html.matches("<div class=\"mermaid\">").count(), 2);
    }

    #[test]
    fn test_container_markup_in_code_sample_stays_text() {
        let rewriter = DiagramRewriter::new(DiagramFence::default()).unwrap();
        let result = MarkdownRenderer::new(MarkdownOptions::default())
            .with_diagrams(&rewriter)
            .render("```html\n<div class=\"mermaid\">\nA-->B\n</div>\n```");

        assert_eq!(
            result.html,
            "<pre><code class=\"language-html\">&lt;div class=\"mermaid\"&gt;\n\
             A--&gt;B\n&lt;/div&gt;\n</code></pre>\n"
        );
        assert_eq!(result.diagram_count, 0);
    }
}
