//! Entity normalization ahead of tokenizing.
//!
//! quick-xml only knows the five XML entities, so common named HTML entities
//! are converted to their characters first, and any `&` that does not start
//! a reference is escaped. Content of raw text elements is left as written.

use std::sync::LazyLock;

use regex::Regex;

use crate::raw_text::find_close_tag;

/// Named HTML entity reference.
static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

/// Ampersand with an optional well-formed reference after it.
static AMPERSAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+;|#[xX][0-9a-fA-F]+;|[a-zA-Z][a-zA-Z0-9]*;)?")
        .expect("invalid ampersand regex")
});

/// Opening tag of a raw text element.
static RAW_TEXT_OPEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(script|style|textarea|title)(?:\s[^>]*)?>")
        .expect("invalid raw text regex")
});

/// Convert entities and escape bare ampersands outside raw text elements.
pub(crate) fn normalize_entities(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    let mut search = 0;

    while let Some(caps) = RAW_TEXT_OPEN_PATTERN.captures_at(html, search) {
        let open = caps.get(0).map_or(search..html.len(), |m| m.range());
        search = open.end;
        if caps[0].ends_with("/>") {
            continue;
        }
        let content_end =
            find_close_tag(html, open.end, &caps[1]).map_or(html.len(), |close| close.start);
        out.push_str(&normalize_markup(&html[pos..open.end]));
        out.push_str(&html[open.end..content_end]);
        pos = content_end;
        search = content_end;
    }

    out.push_str(&normalize_markup(&html[pos..]));
    out
}

fn normalize_markup(html: &str) -> String {
    escape_bare_ampersands(&convert_html_entities(html))
}

/// Replace known named HTML entities with their characters.
///
/// The XML entities (`amp`, `lt`, `gt`, `quot`, `apos`) and unknown names are
/// left as written.
pub(crate) fn convert_html_entities(html: &str) -> String {
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            entity_to_unicode(&caps[1]).map_or_else(|| caps[0].to_owned(), str::to_owned)
        })
        .into_owned()
}

/// Escape every `&` that does not begin a character or entity reference.
pub(crate) fn escape_bare_ampersands(html: &str) -> String {
    AMPERSAND_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            if caps.get(1).is_some() {
                caps[0].to_owned()
            } else {
                "&amp;".to_owned()
            }
        })
        .into_owned()
}

fn entity_to_unicode(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => "\u{00a0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "shy" => "\u{00ad}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "laquo" => "\u{00ab}",
        "raquo" => "\u{00bb}",
        "bull" => "\u{2022}",
        "middot" => "\u{00b7}",
        "hellip" => "\u{2026}",

        "rarr" => "\u{2192}",
        "larr" => "\u{2190}",
        "harr" => "\u{2194}",
        "uarr" => "\u{2191}",
        "darr" => "\u{2193}",
        "rArr" => "\u{21d2}",
        "lArr" => "\u{21d0}",
        "hArr" => "\u{21d4}",

        "le" => "\u{2264}",
        "ge" => "\u{2265}",
        "ne" => "\u{2260}",
        "asymp" => "\u{2248}",
        "plusmn" => "\u{00b1}",
        "times" => "\u{00d7}",
        "divide" => "\u{00f7}",
        "minus" => "\u{2212}",
        "infin" => "\u{221e}",

        "copy" => "\u{00a9}",
        "reg" => "\u{00ae}",
        "trade" => "\u{2122}",
        "euro" => "\u{20ac}",
        "pound" => "\u{00a3}",
        "yen" => "\u{00a5}",
        "cent" => "\u{00a2}",

        "deg" => "\u{00b0}",
        "para" => "\u{00b6}",
        "sect" => "\u{00a7}",
        "dagger" => "\u{2020}",
        "Dagger" => "\u{2021}",
        "check" => "\u{2713}",
        "cross" => "\u{2717}",
        "frac12" => "\u{00bd}",
        "frac14" => "\u{00bc}",
        "frac34" => "\u{00be}",

        _ => return None,
    })
}
