//! Perf Trace CLI
//!
//! Converts profiler lifecycle events into a Chrome trace timeline
//! of process and thread lifetimes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use perf_trace_studio::commands::{
    display_schema, display_version, execute_convert, validate_args, validate_event_file,
    ConvertArgs,
};

/// Perf Trace - process timelines for the Chrome trace viewer
#[derive(Parser, Debug)]
#[command(name = "perf-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an event log into trace JSON
    Convert {
        /// Event log (JSON) to read
        input: PathBuf,

        /// Rendering mode: flat|flame|cascade|command
        #[arg(short = 'm', long)]
        render_mode: Option<String>,

        /// Output path for trace JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TOML config file
        #[arg(short, long, env = "PERF_TRACE_CONFIG")]
        config: Option<PathBuf>,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Wrap events in the JSON object format with run metadata
        #[arg(long)]
        metadata: bool,

        /// Print a text summary to stderr
        #[arg(long)]
        summary: bool,

        /// Keep events in file order instead of sorting by timestamp
        #[arg(long)]
        no_sort: bool,
    },

    /// Validate an event log file
    Validate {
        /// Path to event log JSON
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display output schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments; usage errors exit with 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Convert {
            input,
            render_mode,
            output,
            config,
            compact,
            metadata,
            summary,
            no_sort,
        } => {
            let args = ConvertArgs {
                input,
                output,
                render_mode,
                config,
                compact,
                metadata,
                print_summary: summary,
                no_sort,
            };

            // Validate args first
            validate_args(&args)?;

            execute_convert(args)?;
        }

        Commands::Validate { file } => {
            validate_event_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
