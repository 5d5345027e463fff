//! Configuration management for mdpage.
//!
//! Parses `mdpage.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every field has a
//! documented default, so a run without any config file still works.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! The following values support `${VAR}` and `${VAR:-default}` expansion
//! (paths additionally expand a leading `~`):
//!
//! - `source.path`
//! - `output.path`
//! - `output.template`
//! - `diagrams.script_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the Markdown source file.
    pub source: Option<PathBuf>,
    /// Override the output file.
    pub output: Option<PathBuf>,
    /// Override the document template.
    pub template: Option<PathBuf>,
    /// Override the output mode.
    pub mode: Option<OutputMode>,
    /// Override the id of the section replaced in section mode.
    pub section_id: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdpage.toml";

/// Default source document, relative to the project directory.
const DEFAULT_SOURCE: &str = "arch.md";

/// Default output file, relative to the project directory.
const DEFAULT_OUTPUT: &str = "arch.html";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source document configuration (path is a relative string from TOML).
    source: SourceConfigRaw,
    /// Diagram block configuration.
    pub diagrams: DiagramsConfig,
    /// Markdown renderer extensions.
    pub markdown: MarkdownConfig,
    /// HTML post-processing configuration.
    pub html: HtmlConfig,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,

    /// Resolved source configuration (set after loading).
    #[serde(skip)]
    pub source_resolved: SourceConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw source configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    path: Option<String>,
    start_marker: Option<String>,
    end_marker: Option<String>,
    skip_prefix: Option<String>,
}

/// Resolved source document configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Markdown source file.
    pub path: PathBuf,
    /// Marker opening the published region.
    pub start_marker: String,
    /// Marker closing the published region.
    pub end_marker: String,
    /// Lines starting with this prefix are dropped. `None` keeps every line.
    pub skip_prefix: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SOURCE),
            start_marker: "<!-- WEBSITE: START -->".to_owned(),
            end_marker: "<!-- WEBSITE: END -->".to_owned(),
            skip_prefix: Some("TODO".to_owned()),
        }
    }
}

/// Diagram block configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Fence that opens a diagram block.
    pub fence_open: String,
    /// Fence that closes a diagram block.
    pub fence_close: String,
    /// Class of the container element diagrams are rewritten into.
    pub container_class: String,
    /// Layout class appended to diagram containers.
    pub layout_class: String,
    /// Client-side diagram script loaded by the built-in template.
    pub script_url: String,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            fence_open: "```mermaid".to_owned(),
            fence_close: "```".to_owned(),
            container_class: "mermaid".to_owned(),
            layout_class: "mx-auto".to_owned(),
            script_url: "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js".to_owned(),
        }
    }
}

/// Markdown renderer extensions.
///
/// Fenced code blocks are part of CommonMark and always enabled.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct MarkdownConfig {
    /// GFM table syntax.
    pub tables: bool,
    /// Heading ids and `[TOC]` marker replacement.
    pub toc: bool,
    /// Keep the fence language as a `language-*` class on code blocks.
    pub highlight: bool,
    /// `~~strikethrough~~` syntax.
    pub strikethrough: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            toc: true,
            highlight: true,
            strikethrough: true,
        }
    }
}

/// HTML post-processing configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HtmlConfig {
    /// Class given to `pre` elements without one.
    pub pre_class: String,
    /// Class given to inline `code` elements without one.
    pub inline_code_class: String,
    /// Open outbound links in a new browsing context.
    pub external_links: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            pre_class: "highlight".to_owned(),
            inline_code_class: "inline-code".to_owned(),
            external_links: true,
        }
    }
}

/// How the rendered fragment is written out.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Wrap the fragment in a full HTML document.
    #[default]
    Document,
    /// Replace the content of one section of an existing HTML file.
    Section,
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    path: Option<String>,
    mode: Option<OutputMode>,
    template: Option<String>,
    placeholder: Option<String>,
    section_tag: Option<String>,
    section_id: Option<String>,
}

/// Resolved output configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Output file (document mode) or file edited in place (section mode).
    pub path: PathBuf,
    /// Output mode.
    pub mode: OutputMode,
    /// Document template. `None` uses the built-in template.
    pub template: Option<PathBuf>,
    /// Token in the template replaced by the fragment.
    pub placeholder: String,
    /// Tag name of the section replaced in section mode.
    pub section_tag: String,
    /// `id` of the section replaced in section mode.
    pub section_id: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
            mode: OutputMode::Document,
            template: None,
            placeholder: "{{ content }}".to_owned(),
            section_tag: "section".to_owned(),
            section_id: "main_content".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.path`").
        field: String,
        /// Error message (e.g., "${`SITE_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a value usable as a single HTML class token.
fn require_class_token(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '&'))
    {
        return Err(ConfigError::Validation(format!(
            "{field} must be a single class name"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdpage.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source) = &settings.source {
            self.source_resolved.path.clone_from(source);
        }
        if let Some(output) = &settings.output {
            self.output_resolved.path.clone_from(output);
        }
        if let Some(template) = &settings.template {
            self.output_resolved.template = Some(template.clone());
        }
        if let Some(mode) = settings.mode {
            self.output_resolved.mode = mode;
        }
        if let Some(section_id) = &settings.section_id {
            self.output_resolved.section_id.clone_from(section_id);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            source: SourceConfigRaw::default(),
            diagrams: DiagramsConfig::default(),
            markdown: MarkdownConfig::default(),
            html: HtmlConfig::default(),
            output: OutputConfigRaw::default(),
            source_resolved: SourceConfig {
                path: base.join(DEFAULT_SOURCE),
                ..SourceConfig::default()
            },
            output_resolved: OutputConfig {
                path: base.join(DEFAULT_OUTPUT),
                ..OutputConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_source()?;
        self.validate_diagrams()?;
        self.validate_html()?;
        self.validate_output()?;
        Ok(())
    }

    /// Validate source configuration.
    fn validate_source(&self) -> Result<(), ConfigError> {
        let source = &self.source_resolved;
        require_non_empty(&source.start_marker, "source.start_marker")?;
        require_non_empty(&source.end_marker, "source.end_marker")?;
        if source.start_marker == source.end_marker {
            return Err(ConfigError::Validation(
                "source.start_marker and source.end_marker must differ".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate diagrams configuration.
    fn validate_diagrams(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.diagrams.fence_open, "diagrams.fence_open")?;
        require_non_empty(&self.diagrams.fence_close, "diagrams.fence_close")?;
        require_class_token(&self.diagrams.container_class, "diagrams.container_class")?;
        require_class_token(&self.diagrams.layout_class, "diagrams.layout_class")?;
        require_non_empty(&self.diagrams.script_url, "diagrams.script_url")?;
        require_http_url(&self.diagrams.script_url, "diagrams.script_url")?;
        Ok(())
    }

    /// Validate HTML post-processing configuration.
    fn validate_html(&self) -> Result<(), ConfigError> {
        require_class_token(&self.html.pre_class, "html.pre_class")?;
        require_class_token(&self.html.inline_code_class, "html.inline_code_class")?;
        Ok(())
    }

    /// Validate output configuration.
    fn validate_output(&self) -> Result<(), ConfigError> {
        let output = &self.output_resolved;
        require_non_empty(&output.placeholder, "output.placeholder")?;
        require_non_empty(&output.section_tag, "output.section_tag")?;
        require_non_empty(&output.section_id, "output.section_id")?;
        if output.path == self.source_resolved.path {
            return Err(ConfigError::Validation(
                "output.path cannot be the source document".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.source.path {
            self.source.path = Some(expand::expand_path(path, "source.path")?);
        }
        if let Some(ref path) = self.output.path {
            self.output.path = Some(expand::expand_path(path, "output.path")?);
        }
        if let Some(ref template) = self.output.template {
            self.output.template = Some(expand::expand_path(template, "output.template")?);
        }
        self.diagrams.script_url = expand::expand_env(&self.diagrams.script_url, "diagrams.script_url")?;
        Ok(())
    }

    /// Resolve raw sections, making relative paths absolute against the
    /// config directory.
    fn resolve(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        let source_defaults = SourceConfig::default();
        let output_defaults = OutputConfig::default();

        self.source_resolved = SourceConfig {
            path: resolve(self.source.path.as_deref(), DEFAULT_SOURCE),
            start_marker: self
                .source
                .start_marker
                .take()
                .unwrap_or(source_defaults.start_marker),
            end_marker: self
                .source
                .end_marker
                .take()
                .unwrap_or(source_defaults.end_marker),
            skip_prefix: match self.source.skip_prefix.take() {
                Some(prefix) if prefix.is_empty() => None,
                Some(prefix) => Some(prefix),
                None => source_defaults.skip_prefix,
            },
        };

        self.output_resolved = OutputConfig {
            path: resolve(self.output.path.as_deref(), DEFAULT_OUTPUT),
            mode: self.output.mode.unwrap_or_default(),
            template: self.output.template.as_deref().map(|t| config_dir.join(t)),
            placeholder: self
                .output
                .placeholder
                .take()
                .unwrap_or(output_defaults.placeholder),
            section_tag: self
                .output
                .section_tag
                .take()
                .unwrap_or(output_defaults.section_tag),
            section_id: self
                .output
                .section_id
                .take()
                .unwrap_or(output_defaults.section_id),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.source_resolved.path, PathBuf::from("/test/arch.md"));
        assert_eq!(config.output_resolved.path, PathBuf::from("/test/arch.html"));
        assert_eq!(config.source_resolved.start_marker, "<!-- WEBSITE: START -->");
        assert_eq!(config.source_resolved.end_marker, "<!-- WEBSITE: END -->");
        assert_eq!(config.source_resolved.skip_prefix.as_deref(), Some("TODO"));
        assert_eq!(config.diagrams.fence_open, "```mermaid");
        assert_eq!(config.diagrams.fence_close, "```");
        assert_eq!(config.output_resolved.mode, OutputMode::Document);
        assert_eq!(config.output_resolved.placeholder, "{{ content }}");
        assert_eq!(config.output_resolved.section_id, "main_content");
        assert!(config.output_resolved.template.is_none());
        assert!(config.markdown.tables);
        assert!(config.markdown.toc);
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve(Path::new("/project"));
        assert_eq!(
            config.source_resolved.path,
            PathBuf::from("/project/arch.md")
        );
        assert_eq!(config.html.pre_class, "highlight");
        assert_eq!(config.diagrams.container_class, "mermaid");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[source]
path = "docs/design.md"
start_marker = "<!-- BEGIN -->"
end_marker = "<!-- END -->"
skip_prefix = "FIXME"

[diagrams]
fence_open = "~~~mermaid"
fence_close = "~~~"
container_class = "diagram"
layout_class = "centered"

[markdown]
tables = false
toc = false

[html]
pre_class = "code-block"
external_links = false

[output]
path = "public/index.html"
mode = "section"
template = "layout.html"
placeholder = "<!-- CONTENT -->"
section_tag = "main"
section_id = "content"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project"));

        assert_eq!(
            config.source_resolved,
            SourceConfig {
                path: PathBuf::from("/project/docs/design.md"),
                start_marker: "<!-- BEGIN -->".to_owned(),
                end_marker: "<!-- END -->".to_owned(),
                skip_prefix: Some("FIXME".to_owned()),
            }
        );
        assert_eq!(config.diagrams.fence_open, "~~~mermaid");
        assert_eq!(config.diagrams.container_class, "diagram");
        assert!(!config.markdown.tables);
        assert!(!config.markdown.toc);
        assert!(config.markdown.highlight);
        assert_eq!(config.html.pre_class, "code-block");
        assert_eq!(config.html.inline_code_class, "inline-code");
        assert!(!config.html.external_links);
        assert_eq!(
            config.output_resolved,
            OutputConfig {
                path: PathBuf::from("/project/public/index.html"),
                mode: OutputMode::Section,
                template: Some(PathBuf::from("/project/layout.html")),
                placeholder: "<!-- CONTENT -->".to_owned(),
                section_tag: "main".to_owned(),
                section_id: "content".to_owned(),
            }
        );
    }

    #[test]
    fn test_empty_skip_prefix_disables_skipping() {
        let toml = r#"
[source]
skip_prefix = ""
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project"));
        assert!(config.source_resolved.skip_prefix.is_none());
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let toml = r#"
[output]
mode = "stream"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source: Some(PathBuf::from("/other/notes.md")),
            mode: Some(OutputMode::Section),
            section_id: Some("body".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.source_resolved.path,
            PathBuf::from("/other/notes.md")
        );
        assert_eq!(config.output_resolved.mode, OutputMode::Section);
        assert_eq!(config.output_resolved.section_id, "body");
        assert_eq!(config.output_resolved.path, PathBuf::from("/test/arch.html")); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_template() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            template: Some(PathBuf::from("/tpl/page.html")),
            output: Some(PathBuf::from("/out/page.html")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.output_resolved.template,
            Some(PathBuf::from("/tpl/page.html"))
        );
        assert_eq!(config.output_resolved.path, PathBuf::from("/out/page.html"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.source_resolved, before.source_resolved);
        assert_eq!(config.output_resolved, before.output_resolved);
    }

    #[test]
    fn test_expand_env_vars_paths() {
        // SAFETY: no other test reads or writes this variable
        unsafe {
            std::env::set_var("TEST_MDPAGE_OUT", "public");
        }

        let toml = r#"
[output]
path = "${TEST_MDPAGE_OUT}/index.html"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve(Path::new("/project"));

        assert_eq!(
            config.output_resolved.path,
            PathBuf::from("/project/public/index.html")
        );

        unsafe {
            std::env::remove_var("TEST_MDPAGE_OUT");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: no other test reads or writes this variable
        unsafe {
            std::env::remove_var("MISSING_VAR_MDPAGE_TEST");
        }

        let toml = r#"
[diagrams]
script_url = "${MISSING_VAR_MDPAGE_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_MDPAGE_TEST"));
        assert!(err.to_string().contains("diagrams.script_url"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/mdpage.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_marker() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.source_resolved.end_marker = String::new();
        assert_validation_error(&config, &["source.end_marker", "empty"]);
    }

    #[test]
    fn test_validate_identical_markers() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.source_resolved.end_marker = config.source_resolved.start_marker.clone();
        assert_validation_error(&config, &["must differ"]);
    }

    #[test]
    fn test_validate_empty_fence() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.diagrams.fence_close = String::new();
        assert_validation_error(&config, &["diagrams.fence_close", "empty"]);
    }

    #[test]
    fn test_validate_container_class_with_space() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.diagrams.container_class = "mermaid diagram".to_owned();
        assert_validation_error(&config, &["diagrams.container_class", "single class"]);
    }

    #[test]
    fn test_validate_script_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.diagrams.script_url = "ftp://cdn.example.com/mermaid.js".to_owned();
        assert_validation_error(&config, &["script_url", "http"]);
    }

    #[test]
    fn test_validate_pre_class_quote() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.html.pre_class = "a\"b".to_owned();
        assert_validation_error(&config, &["html.pre_class"]);
    }

    #[test]
    fn test_validate_empty_placeholder() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.output_resolved.placeholder = String::new();
        assert_validation_error(&config, &["output.placeholder", "empty"]);
    }

    #[test]
    fn test_validate_output_same_as_source() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.output_resolved.path = config.source_resolved.path.clone();
        assert_validation_error(&config, &["output.path"]);
    }
}
