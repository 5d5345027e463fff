//! Elements whose content is raw text.
//!
//! Browsers do not tokenize the content of these elements, so `<` and `&`
//! inside them are literal. Both the parser and the section scanner jump
//! straight to the closing tag instead of reading markup.

use std::ops::Range;

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Whether `tag` holds raw text.
pub(crate) fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|raw| raw.eq_ignore_ascii_case(tag))
}

/// Span of the closing tag of raw text element `name` whose content starts
/// at `from`.
///
/// Returns `None` if the element is never closed.
pub(crate) fn find_close_tag(html: &str, from: usize, name: &str) -> Option<Range<usize>> {
    let needle = format!("</{}", name.to_ascii_lowercase());
    let lower = html[from..].to_ascii_lowercase();
    let mut search = 0;

    while let Some(found) = lower[search..].find(&needle) {
        let close = search + found;
        let after_name = close + needle.len();
        let terminated = lower[after_name..]
            .chars()
            .next()
            .is_none_or(|c| c == '>' || c == '/' || c.is_ascii_whitespace());
        if terminated {
            let gt = html[from + after_name..].find('>')?;
            return Some(from + close..from + after_name + gt + 1);
        }
        search = after_name;
    }
    None
}
