mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arbiter-cli")]
#[command(about = "Arbiter CLI - Judge submissions against test files locally", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge a source file against a test file and print per-test results
    Judge {
        /// Language tag (python, cpp, java)
        #[arg(short, long)]
        language: String,

        /// Path to the source file
        #[arg(short, long)]
        source: PathBuf,

        /// Path to the test file (one case per line, last token is the
        /// expected output)
        #[arg(short, long)]
        tests: PathBuf,

        /// Per-test wall-clock timeout in milliseconds
        #[arg(long, default_value = "2000")]
        timeout_ms: u64,

        /// Memory ceiling reported for timed-out runs, in MB
        #[arg(long, default_value = "256")]
        memory_limit_mb: u64,

        /// Print results as JSON instead of a table
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Parse a test file and show the cases it defines
    CheckTests {
        /// Path to the test file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Judge {
            language,
            source,
            tests,
            timeout_ms,
            memory_limit_mb,
            json,
        } => {
            let all_passed =
                commands::judge(&language, &source, &tests, timeout_ms, memory_limit_mb, json)
                    .await?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::CheckTests { file } => {
            commands::check_tests(&file).await?;
        }
    }

    Ok(())
}
