//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// libscout - locate native libraries and produce linker configuration
#[derive(Parser)]
#[command(name = "libscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Package root that owns `libs/` and `external/` (defaults to cwd)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve libraries into compiler/linker configuration
    Resolve(ResolveArgs),

    /// Download and unpack a package's sources
    Fetch(FetchArgs),

    /// Fetch and build a package from source
    Build(BuildArgs),

    /// Show the detected platform profile
    Platform(PlatformArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON object with the configuration keys
    #[default]
    Json,
    /// Compiler/linker flags, one per line
    Flags,
    /// `cargo:` build-script directives
    Cargo,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Logical library names
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Source language hint, passed through to the output
    #[arg(long)]
    pub language: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Never download sources
    #[arg(long)]
    pub offline: bool,

    /// Rebuild even when a built artifact exists
    #[arg(long)]
    pub force: bool,

    /// Skip the pkg-config probe
    #[arg(long)]
    pub no_pkg_config: bool,

    /// Extra directory to search first (repeatable)
    #[arg(long = "search-dir", value_name = "DIR")]
    pub search_dirs: Vec<PathBuf>,

    #[command(flatten)]
    pub toolset: ToolsetArgs,
}

#[derive(Args)]
pub struct ToolsetArgs {
    /// Windows toolset identifier (e.g. msvc14)
    #[arg(long, env = "LIBSCOUT_TOOLSET")]
    pub toolset: Option<String>,

    /// Language-runtime version used to pick a toolset
    #[arg(long, value_name = "VERSION")]
    pub runtime_version: Option<String>,
}

#[derive(Args)]
pub struct FetchArgs {
    /// Package with a source recipe
    pub package: String,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Package with a source recipe
    pub package: String,

    /// Rebuild even when a built artifact exists
    #[arg(long)]
    pub force: bool,

    /// Parallel make jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct PlatformArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
