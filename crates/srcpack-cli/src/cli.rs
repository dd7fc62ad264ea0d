//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use srcpack_core::creation::config::MAX_COMPRESSION_LEVEL;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "srcpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Archive the files of a source tree selected by include/exclude patterns
    Archive(ArchiveArgs),
    /// List the entries of an archive
    List(ListArgs),
    /// Print shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct ArchiveArgs {
    /// Source directory (or single file) to archive
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output archive file path
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Include patterns, comma-separated (extensions, file names or globs; `!` negates)
    #[arg(short, long = "include", value_name = "SPEC")]
    pub include: Vec<String>,

    /// Exclude patterns, comma-separated (folder names or globs)
    #[arg(short = 'x', long = "exclude", value_name = "SPEC")]
    pub exclude: Vec<String>,

    /// Archive only dependency manifests matching these patterns
    #[arg(long, value_name = "SPEC")]
    pub manifests: Option<String>,

    /// File inlined at the archive root regardless of filters
    #[arg(long, value_name = "PATH")]
    pub extra_file: Option<PathBuf>,

    /// Keep only the shallowest files among files sharing a name
    #[arg(long)]
    pub dedup: bool,

    /// Visit every directory instead of skipping excluded subtrees
    #[arg(long)]
    pub no_prune: bool,

    /// Compression level (0 = store, 1-9 = deflate)
    #[arg(
        short = 'l',
        long,
        default_value_t = MAX_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_COMPRESSION_LEVEL))
    )]
    pub compression_level: u8,

    /// Succeed and keep the archive even when no file was selected
    #[arg(long)]
    pub allow_empty: bool,

    /// Overwrite output file if exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show sizes and permissions
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
