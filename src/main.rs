//! `ai-dev-kit` binary: the hook itself plus installation helpers.

mod cli;

use std::process::ExitCode;

use ai_dev_kit::install::{AdapterConfig, ClaudeAdapter, IdeAdapter};
use ai_dev_kit::{ClaudeHome, CommandRegistry, HookSettings, hooks, observability};

use cli::{Cli, Command, InstallArgs};

#[tokio::main]
async fn main() -> ExitCode {
    observability::init_logging();

    match Cli::parse_args().command() {
        Command::Hook => run_hook().await,
        Command::Install(args) => run_install(args).await,
        Command::Commands => list_commands().await,
    }
}

async fn run_hook() -> ExitCode {
    let raw = match hooks::read_stdin().await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read hook payload");
            return ExitCode::FAILURE;
        }
    };

    let (output, code) = match hooks::handle(&raw).await {
        Ok(output) => (output, ExitCode::SUCCESS),
        Err(e) if e.has_prompt() => {
            tracing::error!(error = %e, "Processing failed, passing the prompt through");
            (e.fallback_output().to_string(), ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "No prompt in hook payload");
            (String::new(), ExitCode::FAILURE)
        }
    };

    if let Err(e) = hooks::write_stdout(&output).await {
        tracing::error!(error = %e, "Failed to write prompt");
        return ExitCode::FAILURE;
    }
    code
}

async fn run_install(args: InstallArgs) -> ExitCode {
    let home = match ClaudeHome::resolve() {
        Ok(home) => home,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = AdapterConfig {
        processors: args.processors,
        target_dir: args.target_dir,
        force: args.force,
    };
    let result = ClaudeAdapter::new(home, config).install().await;

    for file in &result.files_created {
        println!("  created {}", file.display());
    }
    if result.success {
        println!("{}", result.message);
        ExitCode::SUCCESS
    } else {
        eprintln!("Error: {}", result.message);
        ExitCode::FAILURE
    }
}

async fn list_commands() -> ExitCode {
    let settings = match ClaudeHome::resolve() {
        Ok(home) => HookSettings::load(&home.settings_path()).await,
        Err(e) => Err(e),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let registry = CommandRegistry::with_user_commands(&settings.commands);
    let width = registry.iter().map(|e| e.token.len()).max().unwrap_or(0);
    for entry in registry.iter() {
        println!("{:<width$}  {}", entry.token, entry.description);
    }
    ExitCode::SUCCESS
}
