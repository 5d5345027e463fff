//! Page builder: source document in, HTML page out.

use std::path::{Path, PathBuf};

use mdpage_config::{Config, OutputMode};
use mdpage_html::{
    HtmlError, HtmlPostProcessor, PostProcessConfig, PostProcessReport, SectionSelector,
    SectionSplice, replace_section_content,
};
use mdpage_renderer::{
    DiagramFence, DiagramRewriter, MarkdownOptions, MarkdownRenderer, RegionExtractor, RenderError,
};

use crate::template::PageTemplate;

/// Error returned by [`PageBuilder`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// File that was written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Extraction or rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// HTML could not be tokenized.
    #[error(transparent)]
    Html(#[from] HtmlError),
    /// The document template has no content placeholder.
    #[error("Template {template} has no {placeholder} placeholder")]
    MissingPlaceholder {
        /// Template file or name.
        template: String,
        /// Placeholder that was expected.
        placeholder: String,
    },
    /// Section mode target has no matching section. The file is unchanged.
    #[error("No <{tag} id=\"{id}\"> found in {}", path.display())]
    SectionNotFound {
        /// File searched.
        path: PathBuf,
        /// Section tag name.
        tag: String,
        /// Section id.
        id: String,
    },
}

/// Rendered and post-processed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// HTML fragment.
    pub html: String,
    /// Text of the first level-one heading.
    pub title: Option<String>,
    /// Number of diagram containers.
    pub diagram_count: usize,
    /// Number of headings that received an id.
    pub heading_count: usize,
    /// Changes made by the post-processor.
    pub post_process: PostProcessReport,
}

/// Summary of a completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// File written.
    pub output: PathBuf,
    /// How the file was written.
    pub mode: OutputMode,
    /// Title used for the page.
    pub title: String,
    /// Number of diagram containers.
    pub diagram_count: usize,
    /// Bytes written.
    pub bytes_written: usize,
}

/// Builds one HTML page from one Markdown source.
///
/// Every input is read and every check passes before the output file is
/// touched, so a failed build never leaves a partial file behind.
pub struct PageBuilder<'a> {
    config: &'a Config,
}

impl<'a> PageBuilder<'a> {
    /// Create a builder for the given configuration.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Read the source, render it and write the output.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or written, a marker is
    /// missing, the template has no placeholder, or, in section mode, the
    /// target has no matching section.
    pub fn build(&self) -> Result<BuildOutcome, BuildError> {
        let source_path = &self.config.source_resolved.path;
        let output = &self.config.output_resolved;

        let source = read_file(source_path)?;
        let page = self.render(&source)?;

        let html = match output.mode {
            OutputMode::Document => self.compose_document(&page)?,
            OutputMode::Section => self.splice_section(&page)?,
        };

        if output.mode == OutputMode::Document {
            ensure_parent_dir(&output.path)?;
        }
        std::fs::write(&output.path, &html).map_err(|e| BuildError::Write {
            path: output.path.clone(),
            source: e,
        })?;

        tracing::info!(
            source = %source_path.display(),
            output = %output.path.display(),
            mode = ?output.mode,
            diagrams = page.diagram_count,
            bytes = html.len(),
            "Built page"
        );

        Ok(BuildOutcome {
            output: output.path.clone(),
            mode: output.mode,
            title: self.page_title(&page),
            diagram_count: page.diagram_count,
            bytes_written: html.len(),
        })
    }

    /// Run extraction, diagram rewriting, Markdown rendering and
    /// post-processing over a source document.
    ///
    /// # Errors
    ///
    /// Returns an error if a marker is missing, the diagram fence does not
    /// compile, or the fragment cannot be tokenized.
    pub fn render(&self, source: &str) -> Result<RenderedPage, BuildError> {
        let source_config = &self.config.source_resolved;
        let diagrams = &self.config.diagrams;
        let markdown = &self.config.markdown;

        let mut extractor =
            RegionExtractor::new(&source_config.start_marker, &source_config.end_marker);
        if let Some(prefix) = &source_config.skip_prefix {
            extractor = extractor.with_skip_prefix(prefix);
        }
        let region = extractor.extract(source)?;

        let rewriter = DiagramRewriter::new(DiagramFence {
            open: diagrams.fence_open.clone(),
            close: diagrams.fence_close.clone(),
            container_class: diagrams.container_class.clone(),
        })?;

        let rendered = MarkdownRenderer::new(MarkdownOptions {
            tables: markdown.tables,
            toc: markdown.toc,
            highlight: markdown.highlight,
            strikethrough: markdown.strikethrough,
        })
        .with_diagrams(&rewriter)
        .render(&region);

        let processor = HtmlPostProcessor::new(PostProcessConfig {
            pre_class: self.config.html.pre_class.clone(),
            inline_code_class: self.config.html.inline_code_class.clone(),
            diagram_class: diagrams.container_class.clone(),
            diagram_layout_class: diagrams.layout_class.clone(),
            external_links: self.config.html.external_links,
        });
        let (html, report) = processor.process(&rendered.html)?;

        Ok(RenderedPage {
            html,
            title: rendered.title,
            diagram_count: rendered.diagram_count,
            heading_count: rendered.toc.len(),
            post_process: report,
        })
    }

    fn compose_document(&self, page: &RenderedPage) -> Result<String, BuildError> {
        let output = &self.config.output_resolved;
        let template = match &output.template {
            Some(path) => PageTemplate::load(path)?,
            None => PageTemplate::builtin(&self.config.diagrams.script_url, &output.placeholder),
        };
        tracing::debug!(template = template.name(), "Composing document");
        template.render(&output.placeholder, &page.html, &self.page_title(page))
    }

    fn splice_section(&self, page: &RenderedPage) -> Result<String, BuildError> {
        let output = &self.config.output_resolved;
        let path = &output.path;
        let existing = read_file(path)?;
        let selector = SectionSelector::new(&output.section_tag, &output.section_id);
        match replace_section_content(&existing, &selector, &page.html)? {
            SectionSplice::Replaced(html) => Ok(html),
            SectionSplice::NotFound => Err(BuildError::SectionNotFound {
                path: path.clone(),
                tag: selector.tag,
                id: selector.id,
            }),
        }
    }

    /// First level-one heading, else the source file stem.
    fn page_title(&self, page: &RenderedPage) -> String {
        page.title.clone().unwrap_or_else(|| {
            self.config
                .source_resolved
                .path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

fn read_file(path: &Path) -> Result<String, BuildError> {
    std::fs::read_to_string(path).map_err(|e| BuildError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<(), BuildError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| BuildError::Write {
                path: parent.to_path_buf(),
                source: e,
            })
        }
        _ => Ok(()),
    }
}
