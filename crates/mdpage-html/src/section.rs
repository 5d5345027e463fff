//! In-place replacement of one section of an HTML page.
//!
//! The page is scanned as a token stream to find the section's opening tag
//! and its matching closing tag. Only the bytes between them change.

use std::borrow::Cow;
use std::ops::Range;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::HtmlError;
use crate::raw_text::{find_close_tag, is_raw_text_element};

/// Element to locate: tag name plus `id` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSelector {
    /// Tag name, compared case-insensitively.
    pub tag: String,
    /// Exact `id` value.
    pub id: String,
}

impl SectionSelector {
    /// Create a selector for `<tag id="id">`.
    #[must_use]
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: id.into(),
        }
    }
}

impl Default for SectionSelector {
    fn default() -> Self {
        Self::new("section", "main_content")
    }
}

/// Result of [`replace_section_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum SectionSplice {
    /// The section was found; holds the rewritten page.
    Replaced(String),
    /// No element matched the selector.
    NotFound,
}

/// Location of the matched section within the page.
struct SectionSpan {
    /// Opening tag, including `<` and `>`.
    open: Range<usize>,
    /// Content between the opening and closing tags.
    content: Range<usize>,
    /// Written as `<tag ... />`.
    self_closing: bool,
}

/// Replace the content of the first element matching `selector`.
///
/// The new content is `"\n" + fragment.trim() + "\n"`. Nested elements with
/// the same tag are counted so the matching closing tag is found. A
/// self-closing match is expanded into an opening and closing tag pair.
/// Everything outside the section is returned byte-for-byte.
///
/// # Errors
///
/// Returns [`HtmlError::UnclosedSection`] if the matched element is never
/// closed, or a tokenizer error if the page cannot be scanned.
///
/// # Example
///
/// ```
/// use mdpage_html::{SectionSelector, SectionSplice, replace_section_content};
///
/// let page = r#"<body><section id="main_content">old</section></body>"#;
/// let splice = replace_section_content(page, &SectionSelector::default(), "<p>Hi</p>").unwrap();
/// assert_eq!(
///     splice,
///     SectionSplice::Replaced(
///         "<body><section id=\"main_content\">\n<p>Hi</p>\n</section></body>".to_owned()
///     )
/// );
/// ```
pub fn replace_section_content(
    html: &str,
    selector: &SectionSelector,
    fragment: &str,
) -> Result<SectionSplice, HtmlError> {
    let Some(span) = locate_section(html, selector)? else {
        tracing::debug!(tag = %selector.tag, id = %selector.id, "Section not found");
        return Ok(SectionSplice::NotFound);
    };

    let fragment = fragment.trim();
    let mut out = String::with_capacity(html.len() + fragment.len() + 2);
    if span.self_closing {
        let open = html[span.open.clone()].trim_end_matches('>');
        let open = open.trim_end_matches('/').trim_end();
        out.push_str(&html[..span.open.start]);
        out.push_str(open);
        out.push_str(">\n");
        out.push_str(fragment);
        out.push_str("\n</");
        out.push_str(&selector.tag);
        out.push('>');
    } else {
        out.push_str(&html[..span.content.start]);
        out.push('\n');
        out.push_str(fragment);
        out.push('\n');
    }
    out.push_str(&html[span.content.end..]);

    tracing::debug!(
        tag = %selector.tag,
        id = %selector.id,
        start = span.content.start,
        end = span.content.end,
        "Replaced section content"
    );
    Ok(SectionSplice::Replaced(out))
}

fn locate_section(html: &str, selector: &SectionSelector) -> Result<Option<SectionSpan>, HtmlError> {
    let mut base = 0;
    let mut reader = scanner(&html[base..]);
    // Opening tag span and same-tag nesting depth once the target is seen
    let mut open: Option<(Range<usize>, usize)> = None;

    loop {
        let start = base + position(&reader, html, base)?;
        let event = reader.read_event()?;
        let end = base + position(&reader, html, base)?;

        match event {
            Event::Start(e) => {
                let name = tag_name(&e);
                let is_target_tag = name.eq_ignore_ascii_case(&selector.tag);
                match open.as_mut() {
                    Some((_, depth)) if is_target_tag => *depth += 1,
                    Some(_) => {}
                    None if is_target_tag && has_id(&e, &selector.id) => {
                        open = Some((start..end, 0));
                        continue;
                    }
                    None => {}
                }
                if is_raw_text_element(&name) {
                    base = find_close_tag(html, end, &name).map_or(html.len(), |close| close.end);
                    reader = scanner(&html[base..]);
                }
            }
            Event::Empty(e) => {
                if open.is_none()
                    && tag_name(&e).eq_ignore_ascii_case(&selector.tag)
                    && has_id(&e, &selector.id)
                {
                    return Ok(Some(SectionSpan {
                        open: start..end,
                        content: end..end,
                        self_closing: true,
                    }));
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if let Some((open_tag, depth)) = open.as_mut()
                    && name.eq_ignore_ascii_case(&selector.tag)
                {
                    if *depth == 0 {
                        return Ok(Some(SectionSpan {
                            open: open_tag.clone(),
                            content: open_tag.end..start,
                            self_closing: false,
                        }));
                    }
                    *depth -= 1;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match open {
        Some(_) => Err(HtmlError::UnclosedSection {
            tag: selector.tag.clone(),
            id: selector.id.clone(),
        }),
        None => Ok(None),
    }
}

fn scanner(html: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;
    reader
}

/// Current reader offset as an index into `html`.
fn position(reader: &Reader<&[u8]>, html: &str, base: usize) -> Result<usize, HtmlError> {
    let offset = reader.buffer_position();
    usize::try_from(offset)
        .ok()
        .filter(|&offset| html.is_char_boundary(base + offset))
        .ok_or(HtmlError::Offset(offset))
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn has_id(e: &BytesStart, id: &str) -> bool {
    e.html_attributes().flatten().any(|attr| {
        attr.key.as_ref().eq_ignore_ascii_case(b"id")
            && attr
                .unescape_value()
                .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(&attr.value).into_owned()))
                == id
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn replace(html: &str, fragment: &str) -> SectionSplice {
        replace_section_content(html, &SectionSelector::default(), fragment).unwrap()
    }

    fn replaced(html: &str) -> SectionSplice {
        SectionSplice::Replaced(html.to_owned())
    }

    #[test]
    fn test_replace_empty_section() {
        assert_eq!(
            replace(r#"<section id="main_content"></section>"#, "<p>Hi</p>"),
            replaced("<section id=\"main_content\">\n<p>Hi</p>\n</section>")
        );
    }

    #[test]
    fn test_missing_section_not_found() {
        let html = "<html><body><section id=\"other\">x</section></body></html>";

        assert_eq!(replace(html, "<p>Hi</p>"), SectionSplice::NotFound);
    }

    #[test]
    fn test_fragment_is_trimmed() {
        assert_eq!(
            replace(r#"<section id="main_content">old</section>"#, "\n\n<p>Hi</p>\n"),
            replaced("<section id=\"main_content\">\n<p>Hi</p>\n</section>")
        );
    }

    #[test]
    fn test_preserves_surrounding_page() {
        let html = concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n<title>A < B & C</title>\n",
            "<script>if (a < b && c) { render('<section id=\"main_content\">'); }</script>\n",
            "<style>p > a { color: red; }</style>\n",
            "</head>\n<body>\n<nav>Menu &copy; R&D</nav>\n",
            "<section class=\"wide\" id=\"main_content\">\n<p>Old</p>\n</section>\n",
            "<footer><br></footer>\n</body>\n</html>\n"
        );
        let expected = concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n<title>A < B & C</title>\n",
            "<script>if (a < b && c) { render('<section id=\"main_content\">'); }</script>\n",
            "<style>p > a { color: red; }</style>\n",
            "</head>\n<body>\n<nav>Menu &copy; R&D</nav>\n",
            "<section class=\"wide\" id=\"main_content\">\n<h1>New</h1>\n</section>\n",
            "<footer><br></footer>\n</body>\n</html>\n"
        );

        assert_eq!(replace(html, "<h1>New</h1>"), replaced(expected));
    }

    #[test]
    fn test_nested_sections_counted() {
        let html = concat!(
            "<section id=\"main_content\">",
            "<section id=\"inner\"><section>deep</section></section>old",
            "</section><section id=\"after\">keep</section>"
        );

        assert_eq!(
            replace(html, "<p>New</p>"),
            replaced("<section id=\"main_content\">\n<p>New</p>\n</section><section id=\"after\">keep</section>")
        );
    }

    #[test]
    fn test_only_first_match_replaced() {
        let html = concat!(
            "<section id=\"main_content\">one</section>\n",
            "<section id=\"main_content\">two</section>"
        );

        assert_eq!(
            replace(html, "x"),
            replaced(concat!(
                "<section id=\"main_content\">\nx\n</section>\n",
                "<section id=\"main_content\">two</section>"
            ))
        );
    }

    #[test]
    fn test_self_closing_section_expanded() {
        assert_eq!(
            replace(r#"<body><section id="main_content" /></body>"#, "<p>Hi</p>"),
            replaced("<body><section id=\"main_content\">\n<p>Hi</p>\n</section></body>")
        );
    }

    #[test]
    fn test_commented_section_ignored() {
        let html = "<!-- <section id=\"main_content\"></section> -->\n<p>x</p>";

        assert_eq!(replace(html, "y"), SectionSplice::NotFound);
    }

    #[test]
    fn test_id_must_match_exactly() {
        let html = "<section id=\"main_content_2\">x</section>";

        assert_eq!(replace(html, "y"), SectionSplice::NotFound);
    }

    #[test]
    fn test_tag_matched_case_insensitively() {
        assert_eq!(
            replace("<SECTION id=\"main_content\">x</SECTION>", "y"),
            replaced("<SECTION id=\"main_content\">\ny\n</SECTION>")
        );
    }

    #[test]
    fn test_custom_selector() {
        let selector = SectionSelector::new("div", "docs");
        let splice =
            replace_section_content("<div id=\"docs\"><div>a</div></div>", &selector, "b").unwrap();

        assert_eq!(splice, replaced("<div id=\"docs\">\nb\n</div>"));
    }

    #[test]
    fn test_unclosed_section_is_error() {
        let err = replace_section_content(
            "<body><section id=\"main_content\"><p>x</p></body>",
            &SectionSelector::default(),
            "y",
        )
        .unwrap_err();

        assert!(matches!(err, HtmlError::UnclosedSection { .. }));
        assert_eq!(
            err.to_string(),
            "<section id=\"main_content\"> has no closing tag"
        );
    }
}
