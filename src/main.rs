//! logsynth - synthetic vendor log lines on stdout
//!
//! Builds one generator from the registry and writes a line per tick until the
//! configured count is reached or Ctrl+C is pressed. Diagnostics go to stderr.
//!
//! ## Configuration
//!
//! - `LOGSYNTH_FORMAT`: format identifier (default: fortinet:firewall)
//! - `LOGSYNTH_OPTIONS`: JSON object of format options, e.g. `{"seed": 42}`
//! - `LOGSYNTH_INTERVAL_MS`: milliseconds between lines (default: 50)
//! - `LOGSYNTH_COUNT`: number of lines to write (default: unlimited)
//! - `RUST_LOG`: Logging level filter (default: info)

use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::io::{stdout, AsyncWriteExt};
use tokio::time::interval;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use logsynth::config::Config;
use logsynth::formats::{build, default_registry};
use logsynth::{Generator, GeneratorError};

/// How often the generator task reports its rate
const REPORT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Generate(#[from] GeneratorError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    init_tracing();

    info!("Starting logsynth...");

    let config = match Config::from_env() {
        Ok(config) => {
            info!(
                format = %config.generator.format,
                interval_ms = config.interval.as_millis() as u64,
                count = ?config.count,
                "Configuration loaded"
            );
            config
        }
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    let registry = default_registry();
    let generator = match build(&registry, &config.generator) {
        Ok(generator) => {
            info!(format = generator.format(), "Generator initialized");
            generator
        }
        Err(e) => {
            error!(error = %e, available = ?registry.formats(), "Failed to build generator");
            std::process::exit(1);
        }
    };

    let mut generator_handle =
        tokio::spawn(run_generator(generator, config.interval, config.count));

    tokio::select! {
        result = &mut generator_handle => match result {
            Ok(Ok(written)) => info!(lines = written, "Generator finished"),
            Ok(Err(e)) => {
                error!(error = %e, "Generator failed");
                std::process::exit(1);
            }
            Err(e) => {
                error!(error = %e, "Generator task panicked");
                std::process::exit(1);
            }
        },
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Shutdown signal received, stopping..."),
                Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
            }
            generator_handle.abort();
        }
    }

    info!("logsynth stopped");
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Write one line per tick to stdout until `count` lines are out.
async fn run_generator(
    mut generator: Box<dyn Generator>,
    period: Duration,
    count: Option<u64>,
) -> Result<u64, RunError> {
    let mut ticker = interval(period);
    let mut out = stdout();
    let mut written: u64 = 0;
    let mut since_report: u64 = 0;
    let mut last_report_time = Instant::now();

    while count.map_or(true, |limit| written < limit) {
        ticker.tick().await;

        let mut line = generator.next()?;
        line.push(b'\n');
        out.write_all(&line).await?;
        out.flush().await?;

        written += 1;
        since_report += 1;

        if last_report_time.elapsed() >= REPORT_INTERVAL {
            info!(
                lines = since_report,
                rate = format!(
                    "{:.1}/s",
                    since_report as f64 / last_report_time.elapsed().as_secs_f64()
                ),
                "Generator progress"
            );
            since_report = 0;
            last_report_time = Instant::now();
        }
    }

    Ok(written)
}
