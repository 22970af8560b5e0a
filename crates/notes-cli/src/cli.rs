use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "notes", about = "Create, read and edit Notes document bundles", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Document settings (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new bundle
    New(NewArgs),
    /// Print a bundle's plain text
    Cat(PathArgs),
    /// Replace a bundle's text
    Write(TextArgs),
    /// Append plain text to a bundle
    Append(TextArgs),
    /// List a bundle's entries
    Ls(PathArgs),
    /// Show a bundle's digest and contents summary
    Info(PathArgs),
    /// Copy a bundle's RTF payload to a file
    Export(ExportArgs),
}

#[derive(Args)]
pub struct NewArgs {
    pub path: PathBuf,
    #[arg(short, long)]
    pub text: Option<String>,
}

#[derive(Args)]
pub struct PathArgs {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct TextArgs {
    pub path: PathBuf,
    #[arg(short, long)]
    pub text: String,
}

#[derive(Args)]
pub struct ExportArgs {
    pub path: PathBuf,
    pub out: PathBuf,
}
