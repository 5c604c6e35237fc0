//! `package.json` generation for scaffolded projects

use super::ScaffoldConfig;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// File name of the generated manifest inside the project root
pub const MANIFEST_FILE: &str = "package.json";

/// The generated project manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    pub name: String,

    #[serde(rename = "type")]
    pub module_type: String,

    pub scripts: BTreeMap<String, String>,

    pub dev_dependencies: BTreeMap<String, String>,
}

impl ProjectManifest {
    /// Build the manifest from the scaffold configuration and resolved tool version
    pub fn synthesize<C: ProductConfig>(
        product: &C,
        config: &ScaffoldConfig,
        tool_version: &str,
    ) -> Self {
        let mut scripts = BTreeMap::new();
        scripts.insert("build".to_string(), build_command(product, config));
        scripts.insert(
            "serve".to_string(),
            format!(
                "{} serve --output {}",
                product.tool_command(),
                config.output_dir()
            ),
        );

        let mut dev_dependencies = BTreeMap::new();
        dev_dependencies.insert(product.tool_package().to_string(), tool_version.to_string());

        Self {
            name: config.project_name().to_string(),
            module_type: "module".to_string(),
            scripts,
            dev_dependencies,
        }
    }

    /// Serialize as 2-space indented JSON with a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(self).context("Failed to serialize package.json")?;
        json.push('\n');
        Ok(json)
    }

    /// Write the manifest into the project root, replacing any existing one
    pub async fn write(&self, project_root: &Path) -> Result<()> {
        let path = project_root.join(MANIFEST_FILE);
        tokio::fs::write(&path, self.to_json()?)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn build_command<C: ProductConfig>(product: &C, config: &ScaffoldConfig) -> String {
    let mut command = format!(
        "{} build --source {} --output {}",
        product.tool_command(),
        config.source_dir(),
        config.output_dir()
    );

    // The build tool resolves layouts and components relative to the source folder
    if let Some(layouts) = config.layout_dir() {
        command.push_str(" --layouts ");
        command.push_str(relative_to_source(layouts, config.source_dir()));
    }
    if let Some(components) = config.component_dir() {
        command.push_str(" --components ");
        command.push_str(relative_to_source(components, config.source_dir()));
    }

    command
}

fn relative_to_source<'a>(dir: &'a str, source_dir: &str) -> &'a str {
    dir.strip_prefix(source_dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(dir)
}
