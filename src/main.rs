//! vocabcheck CLI entry point.

use clap::Parser;
use vocabcheck::cli::{self, CacheCommands, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Analyze(args) => cli::run_analyze(args, &cli.logging),
        Commands::Report(args) => cli::run_report(args, &cli.logging),
        Commands::Cache(CacheCommands::Clean(args)) => cli::run_cache_clean(args, &cli.logging),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
