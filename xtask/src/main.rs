//! Developer automation for the `MedMatch` workspace, invoked as
//! `cargo xtask <command>`.
//!
//! Output goes through `println!`/`eprintln!` because this binary talks to a
//! developer at a terminal, not to the tracing pipeline.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::{Command, ExitCode};

use anyhow::{anyhow, bail, Context};

const CI_STEPS: [(&str, fn() -> anyhow::Result<()>); 5] = [
    ("Checking Rust format", run_fmt),
    ("Running Clippy", run_clippy),
    ("Running tests", run_test),
    ("Checking dependencies", run_deny),
    ("Auditing dependencies", run_audit),
];

fn main() -> ExitCode {
    let task = env::args().nth(1);

    let result = match task.as_deref() {
        Some("ci") => run_ci(),
        Some("fmt") => run_fmt(),
        Some("clippy") => run_clippy(),
        Some("test") => run_test(),
        Some("deny") => run_deny(),
        Some("audit") => run_audit(),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown task: {unknown}\n");
            print_help();
            Err(anyhow!("unknown task"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Task failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("MedMatch Development Tasks");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci        Run all CI checks (fmt, clippy, test, deny, audit)");
    println!("    fmt       Check Rust code formatting");
    println!("    clippy    Run Clippy lints");
    println!("    test      Run all tests");
    println!("    deny      Check dependencies with cargo-deny");
    println!("    audit     Audit dependencies for security vulnerabilities");
    println!("    help      Show this help message");
}

/// Run every CI step in order, stopping at the first failure.
fn run_ci() -> anyhow::Result<()> {
    let total = CI_STEPS.len();
    for (index, (label, step)) in CI_STEPS.iter().enumerate() {
        println!("==> Step {}/{total}: {label}...", index + 1);
        step()?;
        println!();
    }
    println!("All CI checks passed.");
    Ok(())
}

fn run_fmt() -> anyhow::Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "format check failed; run 'cargo fmt --all' to fix")
}

fn run_clippy() -> anyhow::Result<()> {
    cargo(&["clippy", "--all-targets", "--all-features"], "clippy reported issues")
}

fn run_test() -> anyhow::Result<()> {
    cargo(&["test", "--workspace", "--all-features"], "tests failed")
}

fn run_deny() -> anyhow::Result<()> {
    ensure_installed("deny", "cargo install cargo-deny")?;
    cargo(&["deny", "check"], "cargo-deny found issues")
}

fn run_audit() -> anyhow::Result<()> {
    ensure_installed("audit", "cargo install cargo-audit")?;
    cargo(&["audit"], "cargo-audit found vulnerabilities")
}

/// Run a cargo subcommand, surfacing `failure` when it exits non-zero.
fn cargo(args: &[&str], failure: &str) -> anyhow::Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("failed to spawn cargo {}", args[0]))?;
    if !status.success() {
        bail!("{failure}");
    }
    Ok(())
}

/// Verify a third-party cargo subcommand is installed before invoking it.
fn ensure_installed(subcommand: &str, install_hint: &str) -> anyhow::Result<()> {
    let probe = Command::new("cargo").args([subcommand, "--version"]).output();
    if probe.is_ok_and(|output| output.status.success()) {
        return Ok(());
    }
    eprintln!("cargo-{subcommand} is not installed.");
    eprintln!("Install it with: {install_hint}");
    bail!("cargo-{subcommand} not found");
}
