use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};

use netsort::cli::{self, USAGE};
use netsort::ingest::PacketSet;
use netsort::{order, report};

/// Group, sort, and report network traffic from packet metadata CSV exports
#[derive(Parser, Debug)]
#[command(name = "netsort")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Subcommand tokens and input files, e.g. `group src sort bytes cap.csv`
    tokens: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging; report rows go to stdout, logs to stderr
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let request = cli::parse_tokens(&args.tokens)?;
    if request.show_help {
        print!("{USAGE}");
        return Ok(());
    }

    let config = request.mode.resolve();
    order::validate_order(&config)?;
    info!(
        "group={} sort={} order={}",
        config.group_by, config.sort_metric, config.order
    );

    if request.inputs.is_empty() {
        warn!("no input files given");
    }

    let mut packets = PacketSet::new();
    for path in &request.inputs {
        let appended = packets.append_file(path, config.input_format)?;
        info!("Loaded {} records from {}", appended, path.display());
    }

    let summary = packets.summarize(&config)?;
    info!(
        "Aggregated {} records into {} groups",
        packets.len(),
        summary.len()
    );

    let stdout = std::io::stdout();
    report::write_report(&mut stdout.lock(), &summary, &config)?;

    Ok(())
}
