use std::path::PathBuf;

use clap::{Parser, Subcommand};
use phonewatch_core::RuleKind;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "phonewatch")]
#[command(about = "Screen device notifications and classify device health")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to $PHONEWATCH_CONFIG, then the platform config dir)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Rule database, overrides the config file
    #[arg(short, long, value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read JSON-line events on stdin and print one JSON result per line
    Run,
    /// Create or refresh the default rule set
    Seed {
        /// Remove every existing rule first
        #[arg(long)]
        reset: bool,
    },
    /// Dry-run the filter over notification events on stdin and print totals
    Report,
    /// Print the rule table as JSON lines
    Rules,
    /// Print rule table statistics
    Stats,
    /// Add or replace a rule
    Set {
        /// Exact package name or prefix ending in `*`
        pattern: String,
        /// Rule kind: allow or deny
        #[arg(short, long, default_value = "deny")]
        kind: RuleKind,
        /// Free-form note
        #[arg(long, default_value = "")]
        description: String,
        /// Store the rule switched off
        #[arg(long)]
        inactive: bool,
    },
    /// Switch a rule on or off
    Toggle {
        /// Pattern of an existing rule
        pattern: String,
        /// Turn the rule off instead of on
        #[arg(long)]
        off: bool,
    },
    /// Delete a rule
    Remove {
        /// Pattern of the rule to delete
        pattern: String,
    },
}
