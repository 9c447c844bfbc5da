//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Prompt preprocessing hook for Claude Code.
///
/// Without a subcommand the binary behaves as the `UserPromptSubmit` hook:
/// it reads the hook payload from stdin and prints the rewritten prompt.
#[derive(Parser, Debug)]
#[command(name = "ai-dev-kit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rewrite the prompt in the hook payload read from stdin.
    Hook,

    /// Install the hook, templates and settings into the configuration root.
    Install(InstallArgs),

    /// List the command tokens available in prompts.
    Commands,
}

#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct InstallArgs {
    /// Directory for the hook executable (default: <root>/hooks).
    #[arg(long, value_name = "DIR")]
    pub target_dir: Option<PathBuf>,

    /// Overwrite the variation template and hook settings.
    #[arg(long)]
    pub force: bool,

    /// Processors to enable, comma separated (default: all).
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub processors: Option<Vec<String>>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run; `hook` when none was given.
    pub fn command(self) -> Command {
        self.command.unwrap_or(Command::Hook)
    }
}
