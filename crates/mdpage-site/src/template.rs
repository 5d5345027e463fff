//! Document template for standalone pages.

use std::path::Path;

use mdpage_renderer::escape_html;

use crate::builder::BuildError;

/// Token replaced with the page title.
pub const TITLE_PLACEHOLDER: &str = "{{ title }}";

/// HTML document the rendered fragment is placed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    name: String,
    source: String,
}

impl PageTemplate {
    /// Built-in document that loads the diagram script and starts it on load.
    ///
    /// `placeholder` marks where the fragment goes.
    #[must_use]
    pub fn builtin(script_url: &str, placeholder: &str) -> Self {
        let source = format!(
            "<!doctype html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>{TITLE_PLACEHOLDER}</title>\n\
             <script src=\"{}\"></script>\n\
             <script>mermaid.initialize({{ startOnLoad: true }});</script>\n\
             </head>\n\
             <body>\n\
             {placeholder}\n\
             </body>\n\
             </html>\n",
            escape_html(script_url)
        );
        Self {
            name: "built-in template".to_owned(),
            source,
        }
    }

    /// Read a template file.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let source = std::fs::read_to_string(path).map_err(|e| BuildError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            name: path.display().to_string(),
            source,
        })
    }

    /// Template from an in-memory string.
    #[must_use]
    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Template name used in messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fill the template.
    ///
    /// The first occurrence of `placeholder` receives `content`; every
    /// [`TITLE_PLACEHOLDER`] receives the escaped `title`. Title tokens inside
    /// `content` are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingPlaceholder`] if the template does not
    /// contain `placeholder`.
    pub fn render(&self, placeholder: &str, content: &str, title: &str) -> Result<String, BuildError> {
        let Some((head, tail)) = self.source.split_once(placeholder) else {
            return Err(BuildError::MissingPlaceholder {
                template: self.name.clone(),
                placeholder: placeholder.to_owned(),
            });
        };

        let title = escape_html(title);
        let mut out = String::with_capacity(self.source.len() + content.len());
        out.push_str(&head.replace(TITLE_PLACEHOLDER, &title));
        out.push_str(content);
        out.push_str(&tail.replace(TITLE_PLACEHOLDER, &title));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SCRIPT: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js";

    #[test]
    fn test_builtin_template_loads_diagram_script() {
        let html = PageTemplate::builtin(SCRIPT, "{{ content }}")
            .render("{{ content }}", "<p>Hi</p>", "arch")
            .unwrap();

        assert_eq!(
            html,
            concat!(
                "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
                "<title>arch</title>\n",
                "<script src=\"https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js\"></script>\n",
                "<script>mermaid.initialize({ startOnLoad: true });</script>\n",
                "</head>\n<body>\n<p>Hi</p>\n</body>\n</html>\n"
            )
        );
    }

    #[test]
    fn test_builtin_uses_custom_placeholder() {
        let template = PageTemplate::builtin(SCRIPT, "<!-- BODY -->");
        let html = template.render("<!-- BODY -->", "<p>x</p>", "t").unwrap();

        assert!(html.contains("<body>\n<p>x</p>\n</body>"));
    }

    #[test]
    fn test_placeholder_replaced_once() {
        let template = PageTemplate::from_source("t.html", "<main>{{ content }}</main>{{ content }}");
        let html = template.render("{{ content }}", "X", "").unwrap();

        assert_eq!(html, "<main>X</main>{{ content }}");
    }

    #[test]
    fn test_title_escaped_and_not_applied_to_content() {
        let template =
            PageTemplate::from_source("t.html", "<title>{{ title }}</title>{{ content }}<h1>{{ title }}</h1>");
        let html = template
            .render("{{ content }}", "<p>{{ title }}</p>", "A & B")
            .unwrap();

        assert_eq!(
            html,
            "<title>A &amp; B</title><p>{{ title }}</p><h1>A &amp; B</h1>"
        );
    }

    #[test]
    fn test_missing_placeholder_is_error() {
        let template = PageTemplate::from_source("page.html", "<html></html>");
        let err = template.render("{{ content }}", "x", "t").unwrap_err();

        assert!(matches!(err, BuildError::MissingPlaceholder { .. }));
        assert_eq!(
            err.to_string(),
            "Template page.html has no {{ content }} placeholder"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PageTemplate::load(&dir.path().join("missing.html")).unwrap_err();

        assert!(matches!(err, BuildError::Read { .. }));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<body>{{ content }}</body>").unwrap();

        let template = PageTemplate::load(&path).unwrap();
        assert_eq!(template.name(), path.display().to_string());
        assert_eq!(
            template.render("{{ content }}", "x", "t").unwrap(),
            "<body>x</body>"
        );
    }
}
