//! Runtime detection
//!
//! Scaffolding never needs Node.js itself, but the generated `package.json`
//! scripts do, so its absence is reported as advice.

pub mod check;

pub use check::{check_node, check_npm, script_runtime_advisory, RuntimeInfo};
