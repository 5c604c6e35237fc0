//! Charm-style CLI prompts using cliclack

use crate::config::{
    default_component_dir, default_layout_dir, Answers, Endpoints, NetworkOptions,
    ScaffoldConfig, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR,
};
use crate::product::ProductConfig;
use crate::runtime;
use crate::scaffold::{ProjectScaffolder, ScaffoldEnv, ScaffoldReport, VersionOutcome};
use crate::templates::Acquisition;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name (also the directory created)
    pub name: Option<String>,

    /// Source folder inside the project
    pub source: Option<String>,

    /// Output folder inside the project
    pub output: Option<String>,

    /// Layout folder
    pub layouts: Option<String>,

    /// Component folder
    pub components: Option<String>,

    /// Local directory to copy instead of downloading the starter template
    pub template_dir: Option<PathBuf>,

    /// Write the built-in starter site without touching the network for it
    pub offline: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Collect answers (every prompt completes before any I/O starts)
    let scaffold_config = collect_config(config, &args)?;

    // Step 2: Resolve where templates and release metadata come from
    let endpoints = setup_endpoints(config, &args)?;
    let workdir = std::env::current_dir().context("Failed to read current directory")?;

    // Step 3: Confirm before writing into a non-empty directory
    confirm_directory(&scaffold_config.project_root(&workdir), &args)?;

    // Step 4: Create project
    let env = ScaffoldEnv {
        workdir,
        endpoints,
        network: NetworkOptions::default(),
    };
    let scaffolder = ProjectScaffolder::new(config.clone(), env)?;
    let report = create_project(&scaffolder, &scaffold_config).await?;

    // Step 5: Explain anything that fell back
    report_advisories(config, &report)?;

    // Step 6: Show next steps
    print_next_steps(config, &report.project_root, &scaffold_config)?;

    Ok(())
}

fn ask(prompt: &str, preset: &Option<String>, default: &str, yes: bool) -> Result<String> {
    if let Some(value) = preset {
        return Ok(value.clone());
    }
    // Empty answers are replaced by defaults when the config is resolved
    if yes {
        return Ok(String::new());
    }

    let input: String = cliclack::input(prompt)
        .placeholder(default)
        .required(false)
        .interact()?;
    Ok(input)
}

fn collect_config<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<ScaffoldConfig> {
    let project_name = ask(
        "Project name",
        &args.name,
        config.default_project_name(),
        args.yes,
    )?;
    let source_dir = ask(
        "Source folder",
        &args.source,
        DEFAULT_SOURCE_DIR,
        args.yes,
    )?;
    let output_dir = ask(
        "Output folder",
        &args.output,
        DEFAULT_OUTPUT_DIR,
        args.yes,
    )?;

    // Layout and component defaults follow the chosen source folder
    let source_for_defaults = if source_dir.trim().is_empty() {
        DEFAULT_SOURCE_DIR
    } else {
        source_dir.trim()
    };
    let layout_dir = ask(
        "Layout folder",
        &args.layouts,
        &default_layout_dir(source_for_defaults),
        args.yes,
    )?;
    let component_dir = ask(
        "Component folder",
        &args.components,
        &default_component_dir(source_for_defaults),
        args.yes,
    )?;

    let answers = Answers {
        project_name,
        source_dir,
        output_dir,
        layout_dir: Some(layout_dir),
        component_dir: Some(component_dir),
    };

    let resolved = ScaffoldConfig::from_answers(answers, config.default_project_name())?;
    cliclack::log::success(format!(
        "Project {} (source: {}, output: {})",
        resolved.project_name(),
        resolved.source_dir(),
        resolved.output_dir()
    ))?;
    Ok(resolved)
}

fn setup_endpoints<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<Endpoints> {
    if args.offline {
        cliclack::log::info("Using the built-in starter site")?;
    } else if let Some(path) = &args.template_dir {
        cliclack::log::info(format!("Using local template from {}", path.display()))?;
    } else {
        cliclack::log::info("Using remote starter template")?;
    }

    Endpoints::from_env(config, args.template_dir.clone(), args.offline)
}

fn confirm_directory(path: &Path, args: &CreateArgs) -> Result<()> {
    if !path.is_dir() {
        return Ok(());
    }

    if let Ok(entries) = std::fs::read_dir(path) {
        let count = entries.count();
        if count > 0 {
            cliclack::log::warning(format!(
                "{} already has {} items; matching files will be overwritten",
                path.display(),
                count
            ))?;

            // Auto-confirm with --yes flag
            let confirm = if args.yes {
                true
            } else {
                cliclack::confirm("Continue anyway?")
                    .initial_value(true)
                    .interact()?
            };

            if !confirm {
                anyhow::bail!("Setup cancelled.");
            }
        }
    }

    Ok(())
}

async fn create_project<C: ProductConfig>(
    scaffolder: &ProjectScaffolder<C>,
    scaffold_config: &ScaffoldConfig,
) -> Result<ScaffoldReport> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let report = match scaffolder.run(scaffold_config).await {
        Ok(report) => report,
        Err(e) => {
            spinner.stop("Failed to create project");
            return Err(e);
        }
    };

    let origin = match &report.acquisition {
        Acquisition::Fetched { .. } => "starter template",
        Acquisition::Copied { .. } => "local template",
        Acquisition::Embedded { .. } | Acquisition::FellBack { .. } => "built-in starter site",
    };
    spinner.stop(format!(
        "Created {} files from the {} in {}",
        report.acquisition.file_count() + 1,
        origin,
        report.project_root.display()
    ));

    Ok(report)
}

fn report_advisories<C: ProductConfig>(config: &C, report: &ScaffoldReport) -> Result<()> {
    if let Acquisition::FellBack { reason, .. } = &report.acquisition {
        cliclack::log::warning(format!(
            "Could not download the starter template ({}); used the built-in starter site",
            reason
        ))?;
    }

    if let VersionOutcome::Defaulted { range, reason } = &report.version {
        cliclack::log::warning(format!(
            "Could not look up the latest {} release ({}); using {}",
            config.tool_package(),
            reason,
            range
        ))?;
    }

    if let Some(advisory) = runtime::script_runtime_advisory() {
        cliclack::log::warning(advisory)?;
    }

    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    scaffold_config: &ScaffoldConfig,
) -> Result<()> {
    let steps = config.next_steps(project_dir, scaffold_config);

    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step.cyan());
    }

    println!();
    println!("  Docs: {}", config.docs_url().underline());

    cliclack::outro("Happy building!")?;

    Ok(())
}
