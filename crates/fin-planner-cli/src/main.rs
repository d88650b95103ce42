mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::goals::GoalFundingArgs;
use commands::nav::{FundReturnArgs, RebaseArgs, TrailingReturnArgs};
use commands::retirement::RetirementArgs;
use commands::snapshot::SnapshotArgs;
use commands::time_value::{CagrArgs, ProjectCorpusArgs, SipArgs, TimelineArgs};

/// Goal-funding and retirement planning calculations
#[derive(Parser)]
#[command(
    name = "fpa",
    version,
    about = "Goal-funding and retirement planning calculations",
    long_about = "A CLI for personal financial planning arithmetic with decimal \
                  precision. Computes required SIPs, goal funding against a shared \
                  surplus, retirement corpus sizing, and trailing fund returns \
                  from NAV history."
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
    /// Monthly SIP required to reach a corpus
    Sip(SipArgs),
    /// Corpus reachable from a fixed monthly contribution
    ProjectCorpus(ProjectCorpusArgs),
    /// Years for a contribution to reach a corpus
    Timeline(TimelineArgs),
    /// Compound annual growth rate between two values
    Cagr(CagrArgs),
    /// Resolve investment status and timelines for all goals
    GoalFunding(GoalFundingArgs),
    /// Retirement corpus and SIP planning
    Retirement(RetirementArgs),
    /// Annualised trailing return from a NAV series
    TrailingReturn(TrailingReturnArgs),
    /// Rebase aligned series to a common base for comparison
    Rebase(RebaseArgs),
    /// Fetch a fund's NAV history and compute trailing returns
    FundReturn(FundReturnArgs),
    /// Assemble the report snapshot with its fallback summary
    Snapshot(SnapshotArgs),
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
        Commands::Sip(args) => commands::time_value::run_sip(args),
        Commands::ProjectCorpus(args) => commands::time_value::run_project_corpus(args),
        Commands::Timeline(args) => commands::time_value::run_timeline(args),
        Commands::Cagr(args) => commands::time_value::run_cagr(args),
        Commands::GoalFunding(args) => commands::goals::run_goal_funding(args),
        Commands::Retirement(args) => commands::retirement::run_retirement(args),
        Commands::TrailingReturn(args) => commands::nav::run_trailing_return(args),
        Commands::Rebase(args) => commands::nav::run_rebase(args),
        Commands::FundReturn(args) => commands::nav::run_fund_return(args),
        Commands::Snapshot(args) => commands::snapshot::run_snapshot(args),
        Commands::Version => {
            println!("fpa {}", env!("CARGO_PKG_VERSION"));
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
