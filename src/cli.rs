// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Global output and config flags; subcommands hand raw tokens to the resolver.

use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use blue_green::output::OutputMode;

#[derive(Parser)]
#[command(name = "blue-green")]
#[command(after_help = "Global options may also follow the subcommand's arguments.")]
#[command(about = "Blue-green push and rollback for Cloud Foundry applications")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the configuration file (default: discover blue-green.yml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of archived generations to keep after a push
    #[arg(long, global = true, value_name = "N")]
    pub retain: Option<NonZeroUsize>,

    /// cf executable to use
    #[arg(long = "cf", global = true, value_name = "BINARY")]
    pub cf_binary: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Push a new version next to the running one and cut traffic over
    #[command(name = "blue-green-push")]
    Push {
        /// <app> -f <manifest> [-p <path>]
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Restore a retained generation of an application
    #[command(name = "blue-green-rollback")]
    Rollback {
        /// <app> <generation-tag>
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Show the production status and archived generations of an application
    #[command(name = "blue-green-generations")]
    Generations {
        /// <app>
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },
}

impl Commands {
    /// Subcommand name followed by its raw tokens, as the resolver expects.
    pub fn argv(&self) -> Vec<String> {
        let (name, args) = match self {
            Commands::Push { args } => ("blue-green-push", args),
            Commands::Rollback { args } => ("blue-green-rollback", args),
            Commands::Generations { args } => ("blue-green-generations", args),
        };
        std::iter::once(name.to_string())
            .chain(args.iter().cloned())
            .collect()
    }
}

/// Global switches that may also appear among a subcommand's raw tokens.
const GLOBAL_SWITCHES: &[&str] = &["-v", "--verbose", "-q", "--quiet", "--json"];
/// Global options that take a value.
const GLOBAL_OPTIONS: &[&str] = &["-c", "--config", "--retain", "--cf"];
const SUBCOMMANDS: &[&str] = &[
    "blue-green-push",
    "blue-green-rollback",
    "blue-green-generations",
];

/// Move global flags written after a subcommand in front of it.
///
/// Subcommands capture their tokens raw, so without this `--json` after the
/// app name would reach the argument resolver instead of clap.
pub fn hoist_global_flags(args: Vec<String>) -> Vec<String> {
    let Some(split) = args
        .iter()
        .position(|arg| SUBCOMMANDS.contains(&arg.as_str()))
    else {
        return args;
    };

    let mut head = args[..=split].to_vec();
    let subcommand = head.pop();
    let mut rest = Vec::new();

    let mut tail = args.into_iter().skip(split + 1);
    while let Some(arg) = tail.next() {
        let name = arg.split_once('=').map_or(arg.as_str(), |(name, _)| name);
        if GLOBAL_SWITCHES.contains(&arg.as_str()) {
            head.push(arg);
        } else if GLOBAL_OPTIONS.contains(&arg.as_str()) {
            head.push(arg);
            head.extend(tail.next());
        } else if name.starts_with("--") && GLOBAL_OPTIONS.contains(&name) {
            head.push(arg);
        } else {
            rest.push(arg);
        }
    }

    head.extend(subcommand);
    head.extend(rest);
    head
}
