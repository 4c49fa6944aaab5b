use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub fn get_args() -> CliOpts {
    CliOpts::parse()
}

#[derive(Parser, Debug)]
#[clap(version = clap::crate_version!(), about = clap::crate_description!())]
pub struct CliOpts {
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Split subtitle records into shorter, retimed chunks
    Rechunk(RechunkOpts),

    /// Debugging Utilities
    #[clap(subcommand)]
    Debug(DebugCommand),
}

#[derive(Subcommand, Debug)]
pub enum DebugCommand {
    /// Show the chunking configuration resolved from all sources
    ShowConfig(ShowConfig),
}

#[derive(Parser, Debug)]
pub struct RechunkOpts {
    /// The input subtitle file, `-` or absent to read stdin
    pub input: Option<PathBuf>,

    /// The output subtitle file, `-` or absent to write stdout
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Print run statistics as JSON to stderr
    #[clap(long)]
    pub stats: bool,

    #[clap(flatten)]
    pub chunking: ChunkingConfig,
}

#[derive(Parser, Debug)]
pub struct ShowConfig {
    #[clap(flatten)]
    pub chunking: ChunkingConfig,
}

#[derive(Parser, Debug)]
pub struct ChunkingConfig {
    /// Maximum words per chunk, 0 disables splitting
    #[clap(short, long)]
    pub words: Option<usize>,

    /// Maximum seconds a split chunk may span, 0 disables the cap
    #[clap(short = 'd', long)]
    pub max_duration: Option<f64>,

    /// Maximum characters of text per chunk, 0 disables splitting by length
    #[clap(short = 'c', long)]
    pub max_chars: Option<usize>,

    /// Path to a config file.
    ///
    /// If not provided, will look for `rechunk.toml` in the user config dir.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Do not read `RECHUNK_*` environment variables
    #[clap(long)]
    pub no_env: bool,
}
