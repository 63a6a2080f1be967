//! `refit render` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use refit_ast::Document;
use refit_backend::{BackendRegistry, WriterOptions};
use refit_config::{CliSettings, Config};
use refit_writer::{WriterSettings, render_document};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// JSON document to render (default: read stdin).
    input: Option<PathBuf>,

    /// Write output to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover refit.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Format used when the document does not select one (overrides config).
    #[arg(long, env = "REFIT_DEFAULT_FORMAT")]
    default_format: Option<String>,

    /// Render double quotes as <q> elements in HTML (overrides config).
    #[arg(long)]
    html_q_tags: Option<bool>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input parsing or rendering fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            default_format: self.default_format,
            html_q_tags: self.html_q_tags,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let document = read_document(self.input.as_deref())?;
        let registry = BackendRegistry::with_defaults();
        let result = render_document(&registry, &document, &writer_settings(&config))?;

        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        match &self.output {
            Some(path) => {
                std::fs::write(path, &result.output)?;
                output.success(&format!(
                    "Rendered {} ({} footnotes) to {}",
                    result.format,
                    result.footnotes,
                    path.display()
                ));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(result.output.as_bytes())?;
                stdout.flush()?;
            }
        }

        if self.verbose {
            output.info(&format!("Format: {}", result.format));
        }

        Ok(())
    }
}

/// Writer settings from the loaded configuration.
fn writer_settings(config: &Config) -> WriterSettings {
    WriterSettings {
        default_format: config.output.default_format.clone(),
        options: WriterOptions {
            html_q_tags: config.writer.html_q_tags,
            bullet_marker: config.writer.bullet_marker,
            footnotes_class: config.writer.footnotes_class.clone(),
        },
    }
}

/// Parse a JSON document from `path`, or stdin when absent.
fn read_document(path: Option<&Path>) -> Result<Document, CliError> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            content
        }
    };
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refit_ast::{Block, Inline};

    #[test]
    fn test_writer_settings_from_config() {
        let mut config = Config::default();
        config.output.default_format = "markdown".to_owned();
        config.writer.bullet_marker = '*';
        config.writer.footnotes_class = "endnotes".to_owned();

        let settings = writer_settings(&config);

        assert_eq!(settings.default_format, "markdown");
        assert_eq!(settings.options.bullet_marker, '*');
        assert_eq!(settings.options.footnotes_class, "endnotes");
        assert!(!settings.options.html_q_tags);
    }

    #[test]
    fn test_read_document_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(
            &path,
            r#"{
  "meta": {"custom_writer_format": "plain"},
  "blocks": [{"t": "Para", "c": [{"t": "Str", "c": "Hello"}]}]
}"#,
        )
        .unwrap();

        let document = read_document(Some(&path)).unwrap();

        assert_eq!(document.meta.get_str("custom_writer_format"), Some("plain"));
        assert_eq!(
            document.blocks,
            vec![Block::Para(vec![Inline::str("Hello")])]
        );
    }

    #[test]
    fn test_read_document_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_document(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::Json(_)), "got {err:?}");
    }

    #[test]
    fn test_render_file_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(
            &path,
            r#"{"blocks": [{"t": "Para", "c": [{"t": "Emph", "c": [{"t": "Str", "c": "hi"}]}]}]}"#,
        )
        .unwrap();

        let document = read_document(Some(&path)).unwrap();
        let registry = BackendRegistry::with_defaults();
        let result =
            render_document(&registry, &document, &writer_settings(&Config::default())).unwrap();

        assert_eq!(result.output, "<p><em>hi</em></p>\n");
    }
}
