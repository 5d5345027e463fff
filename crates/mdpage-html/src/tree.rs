//! Tree node representation for HTML fragments.

use crate::raw_text::is_raw_text_element;

/// Tag used for comment nodes.
const COMMENT_TAG: &str = "!--";

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Node in parsed HTML tree.
///
/// Text follows the element/tail model: `text` is the content before the
/// first child, and each child's `tail` is the content after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    /// Element tag name.
    pub tag: String,
    /// Direct text content.
    pub text: String,
    /// Text after element.
    pub tail: String,
    /// Element attributes, in source order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new tree node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Create a comment node.
    #[must_use]
    pub fn comment(body: impl Into<String>) -> Self {
        Self::new(COMMENT_TAG).with_text(body)
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether this node is a comment.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.tag == COMMENT_TAG
    }

    /// Whether this node is a void element.
    #[must_use]
    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }

    /// Whether this node's text is raw (`script`, `style`, ...) and written
    /// without escaping.
    #[must_use]
    pub fn is_raw_text(&self) -> bool {
        is_raw_text_element(&self.tag)
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((key.to_owned(), value)),
        }
    }

    /// Whether the `class` attribute contains `class` as a token.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Append `class` to the class list unless already present.
    ///
    /// Returns `true` if the class list changed.
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        let classes = match self.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_owned(),
        };
        self.set_attr("class", classes);
        true
    }

    /// Concatenated text of this node and its descendants (tail excluded).
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &TreeNode, out: &mut String) {
    if node.is_comment() {
        return;
    }
    out.push_str(&node.text);
    for child in &node.children {
        collect_text(child, out);
        out.push_str(&child.tail);
    }
}

/// Whether `tag` names an HTML void element.
pub(crate) fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag))
}
