mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    check, components, eval, expr, init, CheckArgs, ComponentsArgs, EvalArgs, ExprArgs, InitArgs,
};
use config::Config;
use formwork_designer::ComponentRegistry;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Formwork CLI - inspect, evaluate and check designed forms
#[derive(Parser, Debug)]
#[command(name = "formwork")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Formwork project
    Init(InitArgs),

    /// List registered components
    Components(ComponentsArgs),

    /// Resolve a form against a data model
    Eval(EvalArgs),

    /// Evaluate a single expression
    Expr(ExprArgs),

    /// Check forms for malformed expressions and structural problems
    Check(CheckArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Cannot get current directory")?;
    let config = Config::load(&cwd)?;
    let registry = Arc::new(ComponentRegistry::with_builtin_components());

    match cli.command {
        Command::Init(args) => init(args, &cwd, &config, registry),
        Command::Components(args) => components(args, &registry),
        Command::Eval(args) => eval(args, &cwd, &config),
        Command::Expr(args) => expr(args),
        Command::Check(args) => check(args, &cwd, &config, &registry),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
