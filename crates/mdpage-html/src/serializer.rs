//! HTML serializer for parsed fragments.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::fmt::Write;

use crate::tree::TreeNode;

/// Serialize a [`TreeNode`] tree back to HTML.
pub struct HtmlSerializer;

impl HtmlSerializer {
    /// Create a new serializer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize tree to an HTML string.
    ///
    /// The wrapper element itself is not written, only its text and children.
    /// Void elements are written self-closed (`<br />`); every other element
    /// gets an explicit closing tag even when empty.
    pub fn serialize(&self, tree: &TreeNode) -> String {
        let mut out = String::with_capacity(4096);
        push_escaped_text(&mut out, &tree.text);
        for child in &tree.children {
            serialize_node(child, &mut out);
        }
        out
    }
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize_node(node: &TreeNode, out: &mut String) {
    if node.is_comment() {
        // Writing to a String cannot fail.
        let _ = write!(out, "<!--{}-->", node.text);
        push_escaped_text(out, &node.tail);
        return;
    }

    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        push_escaped_attr(out, value);
        out.push('"');
    }

    if node.is_void() && node.text.is_empty() && node.children.is_empty() {
        out.push_str(" />");
    } else {
        out.push('>');
        if node.is_raw_text() {
            out.push_str(&node.text);
        } else {
            push_escaped_text(out, &node.text);
        }
        for child in &node.children {
            serialize_node(child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }

    push_escaped_text(out, &node.tail);
}

/// Escape text content. Only `&` and `<` are significant there.
fn push_escaped_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
}

fn push_escaped_attr(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
