//! Lenient HTML fragment parser.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entities::normalize_entities;
use crate::error::HtmlError;
use crate::raw_text::find_close_tag;
use crate::tree::{TreeNode, is_void_element};

/// Tag of the synthetic element wrapping a parsed fragment.
pub(crate) const ROOT_TAG: &str = "root";

/// Parse HTML fragments into a [`TreeNode`] tree.
///
/// The parser accepts the XHTML-flavoured output of a Markdown renderer plus
/// whatever raw HTML the author embedded: void elements need no closing
/// tag, stray end tags are ignored and elements left open at the end of the
/// input are closed implicitly. The content of `script`, `style`, `textarea`
/// and `title` is kept verbatim as the element's text.
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML fragment.
    ///
    /// Returns a synthetic `root` node whose children are the fragment's
    /// top-level nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup cannot be tokenized.
    pub fn parse(&self, html: &str) -> Result<TreeNode, HtmlError> {
        let html = normalize_entities(html);
        let wrapped = format!("<{ROOT_TAG}>{html}</{ROOT_TAG}>");
        self.parse_events(&wrapped)
    }

    fn parse_events(&self, html: &str) -> Result<TreeNode, HtmlError> {
        // Raw text stops before the wrapper's closing tag
        let fragment = &html[..html.len() - ROOT_TAG.len() - 3];
        let mut reader = lenient_reader(html);
        let mut base = 0;
        let mut stack: Vec<TreeNode> = Vec::new();
        let mut root = None;

        loop {
            let event = reader.read_event()?;
            match event {
                Event::Start(e) => {
                    let node = self.element(&reader, &e);
                    if node.is_void() {
                        push_child(&mut stack, node);
                    } else if node.is_raw_text() {
                        let from = base + offset(&reader)?;
                        let close = find_close_tag(fragment, from, &node.tag)
                            .unwrap_or(fragment.len()..fragment.len());
                        push_child(&mut stack, node.with_text(&html[from..close.start]));
                        base = close.end;
                        reader = lenient_reader(&html[base..]);
                    } else {
                        stack.push(node);
                    }
                }
                Event::Empty(e) => {
                    let node = self.element(&reader, &e);
                    push_child(&mut stack, node);
                }
                Event::End(e) => {
                    let tag = decode_name(&reader, e.name().as_ref());
                    if is_void_element(&tag) {
                        // `<br></br>` style; the element was already closed
                    } else if let Some(open) = stack
                        .iter()
                        .rposition(|node| node.tag.eq_ignore_ascii_case(&tag))
                    {
                        while stack.len() > open {
                            close_top(&mut stack, &mut root);
                        }
                    }
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?;
                    append_text(&mut stack, &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?;
                    append_text(&mut stack, &decode_entity(&entity));
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e);
                    append_text(&mut stack, &text);
                }
                Event::Comment(e) => {
                    let body = reader.decoder().decode(&e)?.into_owned();
                    push_child(&mut stack, TreeNode::comment(body));
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }

        while !stack.is_empty() {
            close_top(&mut stack, &mut root);
        }
        Ok(root.unwrap_or_else(|| TreeNode::new(ROOT_TAG)))
    }

    fn element(&self, reader: &Reader<&[u8]>, e: &BytesStart) -> TreeNode {
        let mut node = TreeNode::new(decode_name(reader, e.name().as_ref()));
        for attr in e.html_attributes().flatten() {
            let key = decode_name(reader, attr.key.as_ref());
            let value = attr
                .unescape_value()
                .map_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned(), Cow::into_owned);
            node.attrs.push((key, value));
        }
        node
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

fn lenient_reader(html: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    reader
}

/// Reader offset into the slice it was created over.
fn offset(reader: &Reader<&[u8]>) -> Result<usize, HtmlError> {
    let position = reader.buffer_position();
    usize::try_from(position).map_err(|_| HtmlError::Offset(position))
}

fn decode_name(reader: &Reader<&[u8]>, name: &[u8]) -> String {
    reader
        .decoder()
        .decode(name)
        .map_or_else(|_| String::from_utf8_lossy(name).into_owned(), Cow::into_owned)
}

/// Attach `node` to the innermost open element.
fn push_child(stack: &mut [TreeNode], node: TreeNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

/// Pop the innermost open element and attach it to its parent.
fn close_top(stack: &mut Vec<TreeNode>, root: &mut Option<TreeNode>) {
    let Some(node) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

/// Append text to the open element's text or its last child's tail.
fn append_text(stack: &mut [TreeNode], text: &str) {
    let Some(node) = stack.last_mut() else {
        return;
    };
    match node.children.last_mut() {
        Some(last_child) => last_child.tail.push_str(text),
        None => node.text.push_str(text),
    }
}

/// Decode an entity reference to its character value.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = match s.strip_prefix("#x").or_else(|| s.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => s[1..].parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}
