//! CLI entry point - the composition root.
//!
//! Parses arguments, installs logging, builds the [`CliContext`] and routes
//! the command to its handler. Handlers return the exit code; errors are
//! printed here and mapped through [`CliError::exit_code`].

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use spt_cli::handlers::{self, start_server::StartServerArgs};
use spt_cli::{Cli, CliConfig, CliContext, CliError, Commands};

/// Logging goes to stderr so command output stays pipeable.
///
/// `-v` forces debug; otherwise `RUST_LOG` applies, defaulting to warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

async fn run(cli: Cli) -> Result<i32, CliError> {
    let ctx = CliContext::new(CliConfig::from_cli(&cli)?);

    match cli.command {
        Commands::Check => handlers::check::execute(&ctx).await,
        Commands::Eval { code } => handlers::code::eval(&ctx, &code).await,
        Commands::EvalStdin => handlers::code::eval_stdin(&ctx).await,
        Commands::EvalFile { path } => handlers::code::eval_file(&ctx, &path).await,
        Commands::RunFile { path } => handlers::code::run_file(&ctx, &path).await,
        Commands::Osc { address, args } => handlers::osc::execute(&ctx, &address, &args).await,
        Commands::StartServer {
            paths,
            background,
            cue_server,
        } => {
            let args = StartServerArgs {
                paths,
                background,
                cue_server,
            };
            handlers::start_server::execute(&ctx, args).await
        }
        Commands::Shutdown => handlers::shutdown::execute().await,
        Commands::Stop => handlers::stop::execute(&ctx).await,
        Commands::Logs => handlers::logs::execute().await,
        Commands::Record { path } => handlers::record::execute(&ctx, &path).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
