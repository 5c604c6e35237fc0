//! Scaffold configuration collected from the user, plus network settings
//!
//! `ScaffoldConfig` is built once from raw answers (defaults substituted for
//! empty ones) and is read-only afterwards.

pub mod generator;

use crate::product::ProductConfig;
use crate::templates::TemplateSource;
use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use url::Url;

pub use generator::ProjectManifest;

/// Source folder used when the answer is empty
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Output folder used when the answer is empty
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Default layout folder for a given source folder
pub fn default_layout_dir(source_dir: &str) -> String {
    format!("{}/.layouts", source_dir)
}

/// Default component folder for a given source folder
pub fn default_component_dir(source_dir: &str) -> String {
    format!("{}/.components", source_dir)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be a relative path inside the project, got '{value}'")]
    EscapesProject { field: &'static str, value: String },
}

/// Raw answers as typed by the user; empty strings mean "use the default"
#[derive(Debug, Clone, Default)]
pub struct Answers {
    pub project_name: String,
    pub source_dir: String,
    pub output_dir: String,
    /// `None` leaves the layout folder unconfigured, `Some("")` picks the default
    pub layout_dir: Option<String>,
    /// `None` leaves the component folder unconfigured, `Some("")` picks the default
    pub component_dir: Option<String>,
}

/// Resolved, validated project configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldConfig {
    project_name: String,
    source_dir: String,
    output_dir: String,
    layout_dir: Option<String>,
    component_dir: Option<String>,
}

impl ScaffoldConfig {
    /// Resolve raw answers, substituting defaults for blank entries
    pub fn from_answers(answers: Answers, default_name: &str) -> Result<Self, ConfigError> {
        let project_name = or_default(&answers.project_name, default_name);
        let source_dir = or_default(&answers.source_dir, DEFAULT_SOURCE_DIR);
        let output_dir = or_default(&answers.output_dir, DEFAULT_OUTPUT_DIR);
        let layout_dir = answers
            .layout_dir
            .map(|dir| or_default(&dir, &default_layout_dir(&source_dir)));
        let component_dir = answers
            .component_dir
            .map(|dir| or_default(&dir, &default_component_dir(&source_dir)));

        validate_relative("project name", &project_name)?;
        validate_relative("source folder", &source_dir)?;
        validate_relative("output folder", &output_dir)?;
        if let Some(dir) = &layout_dir {
            validate_relative("layout folder", dir)?;
        }
        if let Some(dir) = &component_dir {
            validate_relative("component folder", dir)?;
        }

        Ok(Self {
            project_name,
            source_dir,
            output_dir,
            layout_dir,
            component_dir,
        })
    }

    /// Configuration with every answer left at its default
    #[cfg(test)]
    pub(crate) fn with_defaults(default_name: &str) -> Self {
        let source_dir = DEFAULT_SOURCE_DIR.to_string();
        Self {
            project_name: default_name.to_string(),
            layout_dir: Some(default_layout_dir(&source_dir)),
            component_dir: Some(default_component_dir(&source_dir)),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            source_dir,
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn source_dir(&self) -> &str {
        &self.source_dir
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn layout_dir(&self) -> Option<&str> {
        self.layout_dir.as_deref()
    }

    pub fn component_dir(&self) -> Option<&str> {
        self.component_dir.as_deref()
    }

    /// Directory the project is created in, relative to `workdir`
    pub fn project_root(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.project_name)
    }
}

fn or_default(answer: &str, default: &str) -> String {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn validate_relative(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let escapes = Path::new(value).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    let has_segment = Path::new(value)
        .components()
        .any(|c| matches!(c, Component::Normal(_)));

    if escapes || !has_segment {
        return Err(ConfigError::EscapesProject {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Timeouts and redirect limits for the two network stages
#[derive(Debug, Clone, Copy)]
pub struct NetworkOptions {
    pub connect_timeout: Duration,
    /// Whole-request bound for the template archive, body included
    pub fetch_timeout: Duration,
    pub version_timeout: Duration,
    pub max_redirects: usize,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            fetch_timeout: Duration::from_secs(60),
            version_timeout: Duration::from_secs(10),
            max_redirects: 5,
        }
    }
}

/// Where the template and release metadata come from
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Template source tried first; the embedded starter site backs up `Remote`
    pub template: TemplateSource,
    pub releases: Url,
}

impl Endpoints {
    pub fn new(template: TemplateSource, releases: Url) -> Self {
        Self { template, releases }
    }

    /// Resolve endpoints from the product defaults and environment overrides
    ///
    /// `offline` selects the embedded starter site; otherwise a local template
    /// directory takes precedence over the remote archive.
    pub fn from_env<C: ProductConfig>(
        config: &C,
        template_dir: Option<PathBuf>,
        offline: bool,
    ) -> Result<Self> {
        let template = match template_dir {
            _ if offline => TemplateSource::EmbeddedFallback(config.fallback_files()),
            Some(path) => TemplateSource::local(path),
            None => TemplateSource::from_config(config)?,
        };

        let releases_str = std::env::var(config.releases_url_env())
            .unwrap_or_else(|_| config.default_releases_url().to_string());
        let releases = Url::parse(&releases_str)
            .with_context(|| format!("Invalid releases URL: {}", releases_str))?;

        Ok(Self { template, releases })
    }
}
