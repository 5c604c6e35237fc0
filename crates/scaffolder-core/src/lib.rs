//! Scaffolder Core - Shared library for static-site project scaffolding
//!
//! This library creates a new site project on disk: it populates the source
//! folder from a remote starter archive (falling back to an embedded starter
//! site), a local template bundle, or the embedded site directly, and writes a
//! `package.json` wired to the companion build tool.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Archive fetching and extraction, tree copying,
//!   the embedded starter site, release version lookup
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and `ProjectScaffolder`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{Answers, Endpoints, NetworkOptions, ProjectScaffolder, ScaffoldConfig, ScaffoldEnv};
//!
//! let env = ScaffoldEnv {
//!     workdir: std::env::current_dir()?,
//!     endpoints: Endpoints::from_env(&MyConfig, None, false)?,
//!     network: NetworkOptions::default(),
//! };
//! let config = ScaffoldConfig::from_answers(Answers::default(), "my-site")?;
//! let report = ProjectScaffolder::new(MyConfig, env)?.run(&config).await?;
//! ```

pub mod config;
pub mod product;
pub mod runtime;
pub mod scaffold;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{Answers, ConfigError, Endpoints, NetworkOptions, ProjectManifest, ScaffoldConfig};
pub use product::ProductConfig;
pub use scaffold::{ProjectScaffolder, ScaffoldEnv, ScaffoldReport, Stage, VersionOutcome};
pub use templates::{Acquisition, AcquireError, EntryKind, FileEntry, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
