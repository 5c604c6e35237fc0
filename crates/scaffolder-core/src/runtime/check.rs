//! Runtime detection for the tools the generated scripts rely on

use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Run `<binary> --version` and report what it printed
fn probe(binary: &str, name: &'static str) -> RuntimeInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe("node", "Node.js")
}

/// Check if npm (and with it `npx`) is available
pub fn check_npm() -> RuntimeInfo {
    probe("npm", "npm")
}

/// Advisory shown after scaffolding when the generated scripts cannot run yet
pub fn script_runtime_advisory() -> Option<String> {
    advisory_for(&[check_node(), check_npm()])
}

fn advisory_for(runtimes: &[RuntimeInfo]) -> Option<String> {
    let missing: Vec<&str> = runtimes
        .iter()
        .filter(|r| !r.available)
        .map(|r| r.name)
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(format!(
            "{} not found; install from https://nodejs.org to run the build scripts",
            missing.join(" and ")
        ))
    }
}
