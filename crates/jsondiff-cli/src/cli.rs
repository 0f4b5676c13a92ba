use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "jsondiff",
    about = "Structural diff for JSON documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

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
    /// Compare two JSON documents
    Diff(DiffArgs),
    /// Print the content digest of a JSON document
    Digest(DigestArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Source document
    pub src: PathBuf,
    /// Destination document
    pub dst: PathBuf,
    /// Path whose differences are not reported (repeatable)
    #[arg(long = "ignore", value_name = "PATH")]
    pub ignores: Vec<String>,
    /// Array path compared without regard to element order (repeatable)
    #[arg(long = "slice-order", value_name = "PATH")]
    pub slice_orders: Vec<String>,
    /// TOML file with `ignores`, `slice_orders` and `multiset`
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Count duplicate elements on order-insensitive arrays
    #[arg(long)]
    pub multiset: bool,
    /// Exit with status 1 when the documents differ
    #[arg(long)]
    pub exit_code: bool,
}

#[derive(Args)]
pub struct DigestArgs {
    /// Document to digest
    pub file: PathBuf,
    /// JSON pointer selecting a sub-value (e.g. `/items/0`)
    #[arg(long)]
    pub pointer: Option<String>,
}
