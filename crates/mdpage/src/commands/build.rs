//! `mdpage build` command implementation.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use mdpage_config::{CliSettings, Config, OutputMode};
use mdpage_site::PageBuilder;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover mdpage.toml).
    #[arg(short, long, env = "MDPAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Markdown source file (overrides config).
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Output HTML file (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document template with a content placeholder (overrides config).
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Replace one section of the existing output file instead of writing
    /// a full document.
    #[arg(long)]
    in_place: bool,

    /// Id of the section replaced in place (overrides config).
    #[arg(long, value_name = "ID")]
    section: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let started = Instant::now();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if self.verbose {
            output.info(&format!(
                "Source: {}",
                config.source_resolved.path.display()
            ));
        }

        let outcome = PageBuilder::new(&config).build()?;
        tracing::info!(
            output = %outcome.output.display(),
            title = %outcome.title,
            bytes = outcome.bytes_written,
            elapsed_ms = started.elapsed().as_millis(),
            "Build finished"
        );
        output.success(&format!("Wrote {}", outcome.output.display()));
        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            source: self.source.clone(),
            output: self.output.clone(),
            template: self.template.clone(),
            mode: self.in_place.then_some(OutputMode::Section),
            section_id: self.section.clone(),
        }
    }
}
