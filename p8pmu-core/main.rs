use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use p8pmu::{
    check_batch, parse_event, parse_events, CountingScope, GenericEvent, PmuConfig, Power8Pmu,
    PowerPmu, SdarMode,
};

#[derive(Parser, Debug)]
#[command(name = "p8pmu")]
#[command(about = "Inspect POWER8 PMU event codes, constraints and MMCR values")]
struct Args {
    #[arg(short, long, help = "Enable verbose logging (shows constraint rejects)")]
    verbose: bool,

    #[arg(
        long,
        value_enum,
        default_value_t = SdarMode::TlbMiss,
        help = "SDAR update mode written into MMCRA"
    )]
    sdar_mode: SdarMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the decoded fields of an event
    Decode { event: String },

    /// Print each event's constraint and whether the batch fits
    Constraint {
        #[arg(required = true)]
        events: Vec<String>,
    },

    /// Place a batch on the counters and print the MMCR values
    Place {
        #[arg(required = true)]
        events: Vec<String>,
    },

    /// List interchangeable encodings of an event
    Alternatives {
        event: String,

        #[arg(long, help = "Events only count while the task runs")]
        task: bool,
    },

    /// List generic event names
    Generic,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let scope = match &args.command {
        Command::Alternatives { task: true, .. } => CountingScope::Task,
        _ => CountingScope::Cpu,
    };
    let config = PmuConfig::new(scope, args.sdar_mode);
    let pmu = Power8Pmu::new(config);
    tracing::debug!("Using {} PMU with {:?}", pmu.name(), config);

    match args.command {
        Command::Decode { event } => {
            let event = parse_event(&event)?;
            println!("event 0x{:x}", event);
            println!("{:#?}", event.fields());
            if event.is_fab_match() {
                println!("fab match: 0x{:02x}", event.thresh_ctl());
            }
        }
        Command::Constraint { events } => {
            let events = parse_events(&events)?;
            for &event in &events {
                match pmu.get_constraint(event) {
                    Ok(c) => println!("0x{:x}: mask 0x{:x} value 0x{:x}", event, c.mask, c.value),
                    Err(e) => println!("0x{:x}: {}", event, e),
                }
            }
            match check_batch(&events) {
                Ok(tally) => println!(
                    "feasible, {} of 4 general counters used",
                    tally.general_slots()
                ),
                Err(e) => println!("not feasible: {}", e),
            }
        }
        Command::Place { events } => {
            let events = parse_events(&events)?;
            check_batch(&events).context("Batch does not fit on the PMU")?;
            let placement = pmu.compute_mmcr(&events)?;
            for (event, counter) in events.iter().zip(&placement.counters) {
                println!("0x{:x} -> PMC{}", event, counter + 1);
            }
            println!("MMCR0 = 0x{:016x}", placement.mmcr.mmcr0);
            println!("MMCR1 = 0x{:016x}", placement.mmcr.mmcr1);
            println!("MMCRA = 0x{:016x}", placement.mmcr.mmcra);
        }
        Command::Alternatives { event, .. } => {
            let event = parse_event(&event)?;
            for alt in &pmu.alternatives(event) {
                println!("0x{:x}", alt);
            }
        }
        Command::Generic => {
            for event in GenericEvent::all() {
                match pmu.generic_event(event) {
                    Some(code) => println!("{:<24} 0x{:x}", event.name(), code),
                    None => println!("{:<24} unsupported", event.name()),
                }
            }
        }
    }

    Ok(())
}
