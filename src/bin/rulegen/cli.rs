//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// rulegen - Converts resolved Soong modules into Bazel target rules
#[derive(Parser)]
#[command(name = "rulegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use instead of ~/.rulegen/config.toml
    #[arg(long, global = true, env = "RULEGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate build files from a resolved module graph
    Convert(ConvertArgs),

    /// Check that conversion is deterministic and error-free
    Check(CheckArgs),

    /// List the package boundaries of the workspace
    Packages(PackagesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where to find the workspace and its module graph.
#[derive(Args)]
pub struct WorkspaceArgs {
    /// Resolved module graph (TOML)
    #[arg(short, long)]
    pub modules: PathBuf,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Build file text
    Text,
    /// Structured rules as JSON
    Json,
}

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Only convert these packages (workspace-relative directories)
    #[arg(short, long)]
    pub package: Vec<String>,

    /// Write build files into the package directories instead of printing
    #[arg(short, long)]
    pub write: bool,

    /// Output format when printing
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}

#[derive(Args)]
pub struct PackagesArgs {
    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
