//! Project scaffolding workflow
//!
//! Runs the stages in order, each exactly once:
//! create directories, acquire the template (falling back to the embedded
//! starter site when the remote archive fails), resolve the companion tool
//! version (falling back to the product default), write `package.json`.
//!
//! Network failures never escape [`ProjectScaffolder::run`]; local filesystem
//! failures do.

use crate::config::{Endpoints, NetworkOptions, ProjectManifest, ScaffoldConfig};
use crate::product::ProductConfig;
use crate::templates::fetcher::http_client;
use crate::templates::{
    copy_tree, fallback, fetch_and_extract, Acquisition, ArchiveFetcher, ExtractOptions,
    TemplateSource, VersionError, VersionResolver,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Process state the scaffolder would otherwise read ambiently
#[derive(Debug, Clone)]
pub struct ScaffoldEnv {
    /// Directory the project folder is created in
    pub workdir: PathBuf,
    pub endpoints: Endpoints,
    pub network: NetworkOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CreateDirectories,
    AcquireTemplate,
    ResolveVersion,
    WriteManifest,
    Done,
}

/// Version range recorded in the manifest and where it came from
#[derive(Debug)]
pub enum VersionOutcome {
    Resolved(String),
    Defaulted { range: String, reason: VersionError },
}

impl VersionOutcome {
    pub fn range(&self) -> &str {
        match self {
            VersionOutcome::Resolved(range) | VersionOutcome::Defaulted { range, .. } => range,
        }
    }
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct ScaffoldReport {
    pub project_root: PathBuf,
    pub source_dir: PathBuf,
    pub acquisition: Acquisition,
    pub version: VersionOutcome,
    pub manifest: ProjectManifest,
}

pub struct ProjectScaffolder<C: ProductConfig> {
    product: C,
    env: ScaffoldEnv,
    client: reqwest::Client,
}

impl<C: ProductConfig> ProjectScaffolder<C> {
    pub fn new(product: C, env: ScaffoldEnv) -> Result<Self> {
        let client = http_client(product.user_agent(), &env.network)
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(product, env, client))
    }

    /// Use a preconfigured client; it must not follow redirects on its own
    pub fn with_client(product: C, env: ScaffoldEnv, client: reqwest::Client) -> Self {
        Self {
            product,
            env,
            client,
        }
    }

    /// Scaffold a project for `config` under the configured working directory
    ///
    /// Existing files are overwritten; a second run against the same folder
    /// neither merges nor fails.
    pub async fn run(&self, config: &ScaffoldConfig) -> Result<ScaffoldReport> {
        let project_root = config.project_root(&self.env.workdir);

        enter(Stage::CreateDirectories);
        let source_dir = self.create_directories(&project_root, config).await?;

        enter(Stage::AcquireTemplate);
        let acquisition = self.acquire_template(&source_dir).await?;

        enter(Stage::ResolveVersion);
        let version = self.resolve_version().await;

        enter(Stage::WriteManifest);
        let manifest = ProjectManifest::synthesize(&self.product, config, version.range());
        manifest.write(&project_root).await?;

        enter(Stage::Done);
        Ok(ScaffoldReport {
            project_root,
            source_dir,
            acquisition,
            version,
            manifest,
        })
    }

    /// Create the project root, source and output folders; returns the source folder
    pub async fn create_directories(
        &self,
        project_root: &Path,
        config: &ScaffoldConfig,
    ) -> Result<PathBuf> {
        let source_dir = project_root.join(config.source_dir());
        let output_dir = project_root.join(config.output_dir());

        for dir in [project_root, source_dir.as_path(), output_dir.as_path()] {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        Ok(source_dir)
    }

    /// Populate `source_dir` from the configured template source
    ///
    /// A failed remote attempt is followed by the embedded starter site,
    /// written over whatever the extraction already produced.
    pub async fn acquire_template(&self, source_dir: &Path) -> Result<Acquisition> {
        match &self.env.endpoints.template {
            TemplateSource::Remote(url) => {
                let fetcher = ArchiveFetcher::with_client(self.client.clone(), self.env.network);
                let options = ExtractOptions::new(self.product.template_subdir())
                    .strip_components(self.product.strip_components());

                match fetch_and_extract(&fetcher, url, source_dir, &options).await {
                    Ok((url, entries)) => Ok(Acquisition::Fetched { url, entries }),
                    Err(reason) => {
                        warn!(error = %reason, "remote template unavailable, writing starter site");
                        let entries =
                            fallback::materialize(self.product.fallback_files(), source_dir)
                                .await?;
                        Ok(Acquisition::FellBack { reason, entries })
                    }
                }
            }
            TemplateSource::LocalBundle(path) => {
                let entries = copy_tree(path, source_dir).await?;
                Ok(Acquisition::Copied {
                    from: path.clone(),
                    entries,
                })
            }
            TemplateSource::EmbeddedFallback(files) => {
                let entries = fallback::materialize(files, source_dir).await?;
                Ok(Acquisition::Embedded { entries })
            }
        }
    }

    /// Look up the latest companion tool release, defaulting on any failure
    pub async fn resolve_version(&self) -> VersionOutcome {
        let resolver = VersionResolver::new(
            self.client.clone(),
            self.env.endpoints.releases.clone(),
            self.env.network,
        );

        match resolver.resolve_latest_version().await {
            Ok(range) => VersionOutcome::Resolved(range),
            Err(reason) => {
                let range = self.product.default_tool_version().to_string();
                warn!(error = %reason, %range, "could not resolve latest version");
                VersionOutcome::Defaulted { range, reason }
            }
        }
    }
}

fn enter(stage: Stage) {
    debug!(?stage, "scaffold stage");
}
