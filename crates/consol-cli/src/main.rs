mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::acquisition::GoodwillArgs;
use commands::consolidate::{CombineArgs, ConsolidateArgs};

/// Post-acquisition balance sheet consolidation
#[derive(Parser)]
#[command(
    name = "consol",
    version,
    about = "Post-acquisition balance sheet consolidation",
    long_about = "Models the consolidated balance sheet of an acquirer and target \
                  under named deal scenarios: intercompany elimination, purchase-price \
                  allocation (goodwill, step-ups, deferred tax), financing impacts, \
                  and leverage metrics, with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all deal scenarios through the full consolidation pipeline
    Consolidate(ConsolidateArgs),
    /// Combine two balance sheets with intercompany elimination
    Combine(CombineArgs),
    /// Calculate goodwill and step-up impacts for an acquisition
    Goodwill(GoodwillArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Consolidate(args) => commands::consolidate::run_consolidate(args),
        Commands::Combine(args) => commands::consolidate::run_combine(args),
        Commands::Goodwill(args) => commands::acquisition::run_goodwill(args),
        Commands::Version => {
            println!("consol {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
