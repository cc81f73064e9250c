//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract translations into the catalog
//! - `init`: Initialize glean configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExtractCommand {
    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Catalog output file (overrides config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write rewritten copies of changed scripts under this directory
    #[arg(long)]
    pub emit_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translations from templates and scripts into a JSON catalog
    Extract(ExtractCommand),
    /// Initialize a new .gleanrc.json configuration file
    Init,
}
