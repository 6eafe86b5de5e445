use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// faulty-errorsas CLI options.
#[derive(Debug, Parser)]
#[command(
    name = "faulty-errorsas",
    version,
    about = "Detect errors.As calls that will panic because the target is not a pointer",
    args_conflicts_with_subcommands = true,
    subcommand_precedence_over_arg = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub check: CheckArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check Go files, directories or `dir/...` patterns.
    Check(CheckArgs),

    /// List available lints.
    ListRules,

    /// Explain a lint.
    Explain {
        /// Lint rule name.
        rule: String,
    },
}

#[derive(Debug, Clone, ClapArgs)]
pub struct CheckArgs {
    /// Files, directories, or `dir/...` for a recursive walk. Reads stdin when absent.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Path to a faulty-errorsas.toml; discovered from the first PATH otherwise.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip `_test.go` files.
    #[arg(long)]
    pub no_tests: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Github,
}
