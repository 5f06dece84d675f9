//! Bloch Command-Line Interface
//!
//! Simulates circuit files and prints outcome probabilities together with
//! the Bloch vector and purity of every qubit.
//!
//! ```text
//! bloch simulate --input circuits/bell.json
//! bloch simulate --input circuits/ghz.yaml --depolarizing 0.02 --format json
//! bloch replay --input circuits/bell.json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{gates, replay, simulate, version};

/// Bloch - exact quantum circuit simulation with noise
#[derive(Parser)]
#[command(name = "bloch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a circuit file
    Simulate {
        /// Input file (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Run only the first N operations
        #[arg(long)]
        steps: Option<usize>,

        /// Depolarizing probability (overrides the file)
        #[arg(long, env = "BLOCH_DEPOLARIZING")]
        depolarizing: Option<f64>,

        /// Phase damping probability (overrides the file)
        #[arg(long, env = "BLOCH_PHASE_DAMPING")]
        phase_damping: Option<f64>,

        /// Simulator configuration file (JSON or YAML)
        #[arg(short, long, env = "BLOCH_CONFIG")]
        config: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Write the JSON result to a file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the state after every operation
    Replay {
        /// Input file (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Simulator configuration file (JSON or YAML)
        #[arg(short, long, env = "BLOCH_CONFIG")]
        config: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// List supported gates
    Gates,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Simulate {
            input,
            steps,
            depolarizing,
            phase_damping,
            config,
            format,
            output,
        } => {
            simulate::execute(
                &input,
                steps,
                depolarizing,
                phase_damping,
                config.as_deref(),
                &format,
                output.as_deref(),
            )
            .await
        }

        Commands::Replay {
            input,
            config,
            format,
        } => replay::execute(&input, config.as_deref(), &format),

        Commands::Gates => {
            gates::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
