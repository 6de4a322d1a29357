mod cmd;

use anyhow::Result;
use clap::Parser;
use cmd::{Commands, ConfigAction, ReplayArgs};
use colored::Colorize;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "logdeck")]
#[command(about = "Replay a developer console event log with collapsing and filtering", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    replay: ReplayArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Log to stderr. RUST_LOG wins over the -v level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(Commands::Config { action }) = args.command {
        let result = match action {
            ConfigAction::Validate => cmd::config::validate(),
            ConfigAction::Show => cmd::config::show(),
        };
        if let Err(code) = result {
            std::process::exit(code);
        }
        return Ok(());
    }

    if let Err(e) = cmd::replay::run(&args.replay) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}
