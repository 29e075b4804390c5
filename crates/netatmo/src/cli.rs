//! Clap derive structures for the `netatmo` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// netatmo -- inspect a Netatmo camera account
#[derive(Debug, Parser)]
#[command(
    name = "netatmo",
    version,
    about = "Log in to Netatmo and list cameras, modules and events",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "NETATMO_HUB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and report the session and announced platforms
    Check,

    /// List camera names
    Cameras(HomeArgs),

    /// List the modules paired with a camera
    Modules(ModulesArgs),

    /// Show the latest event of each camera
    Events(EventsArgs),
}

#[derive(Debug, Args)]
pub struct HomeArgs {
    /// Only this home
    #[arg(long)]
    pub home: Option<String>,
}

#[derive(Debug, Args)]
pub struct ModulesArgs {
    /// Camera name
    pub camera: String,

    #[command(flatten)]
    pub home: HomeArgs,
}

#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Camera whose type (indoor or outdoor) selects the event log
    #[arg(long)]
    pub camera: Option<String>,

    #[command(flatten)]
    pub home: HomeArgs,
}
