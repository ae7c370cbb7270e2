//! CLI definition using clap derive.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "editgate", about = "eligibility gate for experimental inline edits")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate eligibility for one set of inputs (JSON verdict)
    Check(CheckOpts),
    /// Run a scripted gate session against a logging stub host
    Demo(DemoOpts),
}

#[derive(clap::Args)]
pub struct CheckOpts {
    /// Rollout flag state for the account
    #[arg(long)]
    pub flag_enabled: bool,

    /// Authentication state: authenticated | pending | unauthenticated
    #[arg(long, default_value = "authenticated")]
    pub auth: String,

    /// Subscription plan: free | pro | business (omit for unresolved)
    #[arg(long)]
    pub plan: Option<String>,

    /// Evaluate as an embedded/agent client instead of the desktop editor
    #[arg(long)]
    pub embedded: bool,

    /// Force-eligible test mode
    #[arg(long, env = "EDITGATE_TEST_MODE")]
    pub test_mode: bool,
}

#[derive(clap::Args)]
pub struct DemoOpts {
    /// Milliseconds between scripted upstream steps
    #[arg(long, default_value = "250")]
    pub step_ms: u64,

    /// Answer every ineligibility prompt by taking the fallback action
    #[arg(long)]
    pub accept_fallback: bool,
}
