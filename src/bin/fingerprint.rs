//! Fingerprint CLI
//!
//! Prints the fingerprint of the values given on the command line.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `FINGERPRINT_SEED`: xxHash64 seed (default: 0)
//! - `RUST_LOG`: Log level filter (default: warn, or info with `--explain`)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! Logs go to stderr; stdout carries only results.
//!
//! ## Usage
//!
//! ```bash
//! fingerprint tenant-7 42
//! fingerprint --json '123.0' '"x"' '{"b":1,"a":2}'
//! fingerprint --modulo 16 order-991
//! ```

use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use value_fingerprint::{
    Fingerprinter, FingerprintConfig, HashError, Value, CANONICAL_ENCODING_VERSION,
};

#[derive(Debug, Parser)]
#[command(
    name = "fingerprint",
    version,
    about = "Deterministic 64-bit fingerprint of an ordered value list"
)]
struct Cli {
    /// Parse each VALUE as JSON instead of taking it as text.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Also print the bucket in [0, N).
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    modulo: Option<i64>,

    /// Log the canonical bytes each value contributes.
    #[arg(long, default_value_t = false)]
    explain: bool,

    /// Values to fingerprint, in order.
    values: Vec<String>,
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing(explain: bool) {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let default_level = if explain { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("fingerprint={0},value_fingerprint={0}", default_level).into()
    });

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init();
    }
}

/// Parse arguments; `--version` also reports the canonical encoding version.
fn parse_cli() -> Cli {
    let long_version = format!(
        "{} (canonical encoding {})",
        env!("CARGO_PKG_VERSION"),
        CANONICAL_ENCODING_VERSION
    );
    let matches = Cli::command().long_version(long_version).get_matches();
    Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn main() -> ExitCode {
    let cli = parse_cli();
    init_tracing(cli.explain);

    // Reject bad input before anything reaches stdout.
    if let Some(buckets) = cli.modulo {
        if buckets <= 0 {
            let e = HashError::InvalidArgument(buckets);
            error!(error = %e, "invalid bucket count");
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    }

    let config = FingerprintConfig::from_env();
    if cli.explain {
        info!(
            encoding_version = CANONICAL_ENCODING_VERSION,
            seed = config.seed,
            "fingerprint config"
        );
    }

    let docs = if cli.json {
        let mut docs = Vec::with_capacity(cli.values.len());
        for (index, raw) in cli.values.iter().enumerate() {
            match serde_json::from_str::<serde_json::Value>(raw) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    error!(index, value = %raw, error = %e, "argument is not valid JSON");
                    eprintln!("error: argument {} is not valid JSON: {}", index + 1, e);
                    return ExitCode::from(2);
                }
            }
        }
        docs
    } else {
        Vec::new()
    };

    let values: Vec<Value<'_>> = if cli.json {
        docs.iter().map(Value::from_json).collect()
    } else {
        cli.values.iter().map(Value::from).collect()
    };

    let mut fp = Fingerprinter::with_config(&config);
    for (index, value) in values.iter().enumerate() {
        if cli.explain {
            let bytes = Fingerprinter::canonical_bytes(value);
            info!(
                index,
                hex = %hex::encode(&bytes),
                text = %String::from_utf8_lossy(&bytes),
                "canonical bytes"
            );
        }
        fp.absorb(value);
    }
    let fingerprint = fp.finish();
    println!("{}", fingerprint);

    if let Some(buckets) = cli.modulo {
        match fingerprint.modulo(buckets) {
            Ok(bucket) => println!("{}", bucket),
            Err(e) => {
                error!(error = %e, "bucketing failed");
                eprintln!("error: {}", e);
                return ExitCode::from(2);
            }
        }
    }

    ExitCode::SUCCESS
}
