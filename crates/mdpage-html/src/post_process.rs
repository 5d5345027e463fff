//! Attribute fix-ups applied to rendered HTML fragments.

use crate::error::HtmlError;
use crate::parser::HtmlParser;
use crate::serializer::HtmlSerializer;
use crate::tree::TreeNode;

/// Tokens added to the `rel` attribute of external links.
const EXTERNAL_REL: &[&str] = &["noopener", "noreferrer"];

/// Classes and switches used by [`HtmlPostProcessor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessConfig {
    /// Class given to `pre` elements without one.
    pub pre_class: String,
    /// Class given to inline `code` elements without one.
    pub inline_code_class: String,
    /// Class identifying diagram containers.
    pub diagram_class: String,
    /// Layout class appended to diagram containers.
    pub diagram_layout_class: String,
    /// Open external links in a new browsing context.
    pub external_links: bool,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            pre_class: "highlight".to_owned(),
            inline_code_class: "inline-code".to_owned(),
            diagram_class: "mermaid".to_owned(),
            diagram_layout_class: "mx-auto".to_owned(),
            external_links: true,
        }
    }
}

/// Number of elements changed by each rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostProcessReport {
    /// `pre` elements that received the default class.
    pub pre_blocks: usize,
    /// Inline `code` elements that received the default class.
    pub inline_code: usize,
    /// Diagram containers that received the layout class.
    pub diagrams: usize,
    /// Links marked as external.
    pub external_links: usize,
}

impl PostProcessReport {
    /// Whether no element was changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Total number of changed elements.
    #[must_use]
    pub fn total(&self) -> usize {
        self.pre_blocks + self.inline_code + self.diagrams + self.external_links
    }
}

/// Applies class and link rules to an HTML fragment in one traversal.
///
/// Only attributes are touched; element structure and text survive the
/// parse/serialize round trip. Every rule checks the current attributes
/// first, so running the processor on its own output changes nothing.
///
/// # Example
///
/// ```
/// use mdpage_html::{HtmlPostProcessor, PostProcessConfig};
///
/// let processor = HtmlPostProcessor::new(PostProcessConfig::default());
/// let (html, report) = processor.process("<pre><code>x</code></pre>").unwrap();
/// assert_eq!(html, r#"<pre class="highlight"><code>x</code></pre>"#);
/// assert_eq!(report.pre_blocks, 1);
/// ```
pub struct HtmlPostProcessor {
    config: PostProcessConfig,
    parser: HtmlParser,
    serializer: HtmlSerializer,
}

impl HtmlPostProcessor {
    /// Create a processor with the given classes.
    #[must_use]
    pub fn new(config: PostProcessConfig) -> Self {
        Self {
            config,
            parser: HtmlParser::new(),
            serializer: HtmlSerializer::new(),
        }
    }

    /// Rewrite `html` and report what changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment cannot be tokenized.
    pub fn process(&self, html: &str) -> Result<(String, PostProcessReport), HtmlError> {
        let mut tree = self.parser.parse(html)?;
        let mut report = PostProcessReport::default();
        self.visit_children(&mut tree, &mut report);

        tracing::debug!(
            pre_blocks = report.pre_blocks,
            inline_code = report.inline_code,
            diagrams = report.diagrams,
            external_links = report.external_links,
            "Post-processed HTML"
        );

        Ok((self.serializer.serialize(&tree), report))
    }

    fn visit_children(&self, node: &mut TreeNode, report: &mut PostProcessReport) {
        let parent = node.tag.as_str();
        for child in &mut node.children {
            if child.is_comment() {
                continue;
            }
            self.apply_rules(child, parent, report);
            self.visit_children(child, report);
        }
    }

    fn apply_rules(&self, node: &mut TreeNode, parent: &str, report: &mut PostProcessReport) {
        let tag = node.tag.to_ascii_lowercase();

        if tag == "pre" && node.attr("class").is_none() {
            node.set_attr("class", self.config.pre_class.as_str());
            report.pre_blocks += 1;
        }

        if tag == "code" && !parent.eq_ignore_ascii_case("pre") && node.attr("class").is_none() {
            node.set_attr("class", self.config.inline_code_class.as_str());
            report.inline_code += 1;
        }

        if node.has_class(&self.config.diagram_class)
            && node.add_class(&self.config.diagram_layout_class)
        {
            report.diagrams += 1;
        }

        if tag == "a" && self.config.external_links && mark_external_link(node) {
            report.external_links += 1;
        }
    }
}

impl Default for HtmlPostProcessor {
    fn default() -> Self {
        Self::new(PostProcessConfig::default())
    }
}

/// Whether `href` leaves the current site.
///
/// Same-page anchors, root-relative paths and mail links stay in place.
/// Protocol-relative `//host` URLs count as external.
fn is_external_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    if href.starts_with('/') && !href.starts_with("//") {
        return false;
    }
    !href
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
}

/// Add `target` and `rel` tokens to an external link.
///
/// Returns `true` if an attribute changed.
fn mark_external_link(node: &mut TreeNode) -> bool {
    if !node.attr("href").is_some_and(is_external_href) {
        return false;
    }

    let mut changed = false;
    if node.attr("target").is_none() {
        node.set_attr("target", "_blank");
        changed = true;
    }

    let rel = node.attr("rel").unwrap_or_default();
    let missing: Vec<&str> = EXTERNAL_REL
        .iter()
        .copied()
        .filter(|token| !rel.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case(token)))
        .collect();
    if !missing.is_empty() {
        let mut tokens: Vec<&str> = rel.split_ascii_whitespace().collect();
        tokens.extend(missing);
        let rel = tokens.join(" ");
        node.set_attr("rel", rel);
        changed = true;
    }

    changed
}
