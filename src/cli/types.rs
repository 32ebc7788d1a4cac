//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{decode::DecodeArgs, init::InitArgs, orgs::OrgsArgs, sync::SyncArgs};

#[derive(Parser, Debug)]
#[command(name = "issuesync")]
#[command(
    about = "Track open GitHub issues awaiting a team response as Asana tasks",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Command to run; a sync when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file replacing .issuesync/config.yaml and .issuesync/local.yaml
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect qualifying issues and create or update their tracking tasks
    Sync(SyncArgs),

    /// Write a template configuration file
    Init(InitArgs),

    /// Decode a tracking task name into its parts
    Decode(DecodeArgs),

    /// List GitHub organisation memberships
    Orgs(OrgsArgs),
}
