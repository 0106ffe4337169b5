//! `slots` CLI — compute resource availability from a JSON record file.
//!
//! ## Usage
//!
//! ```sh
//! # Open one-hour slots for one unit of room-1 on 2024-01-01 (records on stdin)
//! slots find --resource-id room-1 --date 2024-01-01 --duration 60 --quantity 1 < records.json
//!
//! # Read records from a file, subtract booked quantity from capacity
//! slots find -i records.json --resource-id room-1 --date 2024-01-01 \
//!     --duration 30 --quantity 2 --capacity netted --pretty
//!
//! # Report malformed records
//! slots check -i records.json
//!
//! # List the candidate windows for a day
//! slots candidates --date 2024-01-01 --duration 90
//! ```
//!
//! Skipped records are logged to stderr. Set `RUST_LOG` or pass `-v` for
//! more detail.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use slot_engine::{
    find_availability, format_timestamp, generate_slots, parse_timestamp, CapacityRule,
    Containment, EvaluationOptions, InMemorySource, RecordSet, SlotRequest,
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Resource slot availability CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the open slots for a resource on a day
    Find {
        /// Resource to query
        #[arg(long)]
        resource_id: String,
        /// Day to query (YYYY-MM-DD, UTC)
        #[arg(long)]
        date: String,
        /// Slot length in minutes
        #[arg(long)]
        duration: String,
        /// Units of capacity required
        #[arg(long, default_value = "1")]
        quantity: String,
        /// Record file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// How slots are matched against operating hours
        #[arg(long, value_enum, default_value_t = ContainmentArg::Exact)]
        containment: ContainmentArg,
        /// How existing reservations limit capacity
        #[arg(long, value_enum, default_value_t = CapacityArg::Exclusive)]
        capacity: CapacityArg,
        /// Fail if any record had to be skipped
        #[arg(long)]
        strict: bool,
        /// Pretty-print the JSON response
        #[arg(long)]
        pretty: bool,
        /// Computation timestamp to report (RFC 3339, defaults to now)
        #[arg(long)]
        now: Option<String>,
    },
    /// Validate a record file and print the skipped records as JSON
    Check {
        /// Record file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Also report records that belong to another resource
        #[arg(long)]
        resource_id: Option<String>,
    },
    /// Print the candidate windows for a day, one per line
    Candidates {
        /// Day (YYYY-MM-DD, UTC)
        #[arg(long)]
        date: NaiveDate,
        /// Slot length in minutes
        #[arg(long, allow_hyphen_values = true)]
        duration: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ContainmentArg {
    Exact,
    HourOfDay,
}

impl From<ContainmentArg> for Containment {
    fn from(arg: ContainmentArg) -> Self {
        match arg {
            ContainmentArg::Exact => Containment::Exact,
            ContainmentArg::HourOfDay => Containment::HourOfDay,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CapacityArg {
    Exclusive,
    Netted,
}

impl From<CapacityArg> for CapacityRule {
    fn from(arg: CapacityArg) -> Self {
        match arg {
            CapacityArg::Exclusive => CapacityRule::Exclusive,
            CapacityArg::Netted => CapacityRule::Netted,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Find {
            resource_id,
            date,
            duration,
            quantity,
            input,
            output,
            containment,
            capacity,
            strict,
            pretty,
            now,
        } => {
            let request = SlotRequest::from_query(&resource_id, &date, &duration, &quantity)
                .context("Invalid request")?;
            let records = read_records(input.as_deref())?;
            let options = EvaluationOptions {
                containment: containment.into(),
                capacity: capacity.into(),
            };
            let computed_at: DateTime<Utc> = match now.as_deref() {
                Some(text) => parse_timestamp(text).context("Invalid --now timestamp")?,
                None => Utc::now(),
            };

            let report = find_availability(
                &InMemorySource::new(records),
                &request,
                &options,
                computed_at,
            )
            .context("Failed to compute availability")?;
            tracing::debug!(
                slots = report.response.available_slots.len(),
                skipped = report.diagnostics.len(),
                "computed availability"
            );

            if strict && !report.diagnostics.is_empty() {
                anyhow::bail!(
                    "{} record(s) failed validation; first: {}",
                    report.diagnostics.len(),
                    report.diagnostics[0]
                );
            }

            let json = if pretty {
                serde_json::to_string_pretty(&report.response)?
            } else {
                serde_json::to_string(&report.response)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Check { input, resource_id } => {
            let records = read_records(input.as_deref())?;
            let validated = records.validate(resource_id.as_deref());
            println!("{}", serde_json::to_string_pretty(&validated.diagnostics)?);
            if !validated.diagnostics.is_empty() {
                anyhow::bail!("{} record(s) failed validation", validated.diagnostics.len());
            }
        }
        Commands::Candidates { date, duration } => {
            let length = chrono::Duration::try_minutes(duration)
                .with_context(|| format!("Duration out of range: {}", duration))?;
            let slots = generate_slots(date, length).context("Failed to generate candidates")?;
            for slot in slots {
                println!(
                    "{}/{}",
                    format_timestamp(slot.start()),
                    format_timestamp(slot.end())
                );
            }
        }
    }

    Ok(())
}

fn read_records(path: Option<&str>) -> Result<RecordSet> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("Failed to parse record JSON")
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
