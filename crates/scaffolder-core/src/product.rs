//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface that each product (e.g. unify) must implement
//! to configure the scaffolding behavior for their specific needs.

use crate::config::ScaffoldConfig;
use crate::templates::fallback::{EmbeddedFile, STARTER_SITE};
use std::path::Path;

/// Configuration trait for different CLI products
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Template archive and release metadata URLs
/// - How archive entries are rebased into the source folder
/// - The companion build tool wired into `package.json`
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default URL of the starter template tarball
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding the template URL
    fn template_url_env(&self) -> &'static str;

    /// Default URL of the companion tool's latest release metadata
    fn default_releases_url(&self) -> &'static str;

    /// Environment variable name for overriding the releases URL
    fn releases_url_env(&self) -> &'static str;

    /// Directory inside the archive whose contents become the source folder
    fn template_subdir(&self) -> &'static str {
        "src"
    }

    /// Leading path segments to drop from every archive entry
    fn strip_components(&self) -> usize {
        1
    }

    /// npm package name of the companion build tool
    fn tool_package(&self) -> &'static str;

    /// Command prefix used in generated scripts
    fn tool_command(&self) -> &'static str;

    /// Version range recorded when the latest release cannot be resolved
    fn default_tool_version(&self) -> &'static str;

    /// Project name used when the user gives none
    fn default_project_name(&self) -> &'static str;

    /// Files written when the remote template cannot be fetched
    fn fallback_files(&self) -> &'static [EmbeddedFile] {
        STARTER_SITE
    }

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, config: &ScaffoldConfig) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
