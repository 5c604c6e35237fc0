//! Unify CLI - Project scaffolding for Unify static sites

mod logging;

use anyhow::Result;
use clap::Parser;
use scaffolder_core::tui::CreateArgs;
use scaffolder_core::{ProductConfig, ScaffoldConfig};
use std::path::{Path, PathBuf};

/// Unify product configuration
#[derive(Clone)]
pub struct UnifyConfig;

impl ProductConfig for UnifyConfig {
    fn name(&self) -> &'static str {
        "create-unify"
    }

    fn display_name(&self) -> &'static str {
        "Unify"
    }

    fn default_template_url(&self) -> &'static str {
        "https://api.github.com/repos/fwdslsh/unify-starter/tarball"
    }

    fn template_url_env(&self) -> &'static str {
        "UNIFY_TEMPLATE_URL"
    }

    fn default_releases_url(&self) -> &'static str {
        "https://api.github.com/repos/fwdslsh/unify/releases/latest"
    }

    fn releases_url_env(&self) -> &'static str {
        "UNIFY_RELEASES_URL"
    }

    fn tool_package(&self) -> &'static str {
        "@fwdslsh/unify"
    }

    fn tool_command(&self) -> &'static str {
        "npx @fwdslsh/unify"
    }

    fn default_tool_version(&self) -> &'static str {
        "^0.4.3"
    }

    fn default_project_name(&self) -> &'static str {
        "unify-site"
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/fwdslsh/unify"
    }

    fn next_steps(&self, dir: &Path, config: &ScaffoldConfig) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", config.project_name()));
        }

        // Step 2: Install the build tool pinned in package.json
        steps.push("npm install".to_string());

        // Step 3: Build into the output folder
        steps.push(format!(
            "npm run build    # writes {}/",
            config.output_dir()
        ));

        // Step 4: Preview
        steps.push("npm run serve".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-unify")]
#[command(about = "CLI for scaffolding Unify static-site projects")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub create: CliCreateArgs,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project name; the project is created in ./<NAME>
    pub name: Option<String>,

    /// Source folder (default: src)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Output folder (default: dist)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Layout folder (default: <source>/.layouts)
    #[arg(long)]
    pub layouts: Option<String>,

    /// Component folder (default: <source>/.components)
    #[arg(long)]
    pub components: Option<String>,

    /// Local directory to copy into the source folder instead of downloading the starter template
    #[arg(long = "template-dir", conflicts_with = "offline")]
    pub template_dir: Option<PathBuf>,

    /// Use the built-in starter site instead of downloading one
    #[arg(long)]
    pub offline: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            name: args.name,
            source: args.source,
            output: args.output,
            layouts: args.layouts,
            components: args.components,
            template_dir: args.template_dir,
            offline: args.offline,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    logging::init_logging(args.verbose)?;

    let config = UnifyConfig;
    let result = scaffolder_core::run(&config, args.create.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
