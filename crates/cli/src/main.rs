//! CLI for the refcap reference-capability handles.
//!
//! `demo` runs produce -> modify -> push -> top -> consume rounds and traces
//! every payload lifecycle; `scenario` walks a single value through a stack.

mod demo;
mod payload;
mod sink;

use clap::{Parser, Subcommand};
use payload::{EventKind, Journal};
use sink::NdjsonSink;

#[derive(Parser, Debug)]
#[command(name = "refcap", version, about = "Reference-capability handle driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run producer/consumer rounds against an owned stack.
    Demo {
        #[arg(short, long, env = "REFCAP_LOOPS", default_value_t = 2)]
        loops: u32,

        /// Emit lifecycle events as NDJSON on stdout.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Push a value, mutate it through the top view, pop it back.
    Scenario {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { loops, json } => {
            tracing::info!(loops, "starting demo");
            let journal = Journal::new();
            let depth = demo::run(loops, &journal)?;

            let live = journal.live();
            if live != 0 {
                tracing::warn!(live, "payloads outlived the run");
            }
            tracing::info!(
                depth,
                constructed = journal.count(EventKind::Constructed),
                dropped = journal.count(EventKind::Dropped),
                "demo complete"
            );

            if json {
                let mut s = NdjsonSink::stdout();
                s.write_rows(&journal.events())?;
                let n = s.finish()?;
                tracing::info!(rows = n, "ndjson sink: wrote to stdout");
            } else {
                for event in journal.events() {
                    println!("{:>4}  #{:<3} {}", event.seq, event.instance, event.kind.as_str());
                }
            }
        }
        Commands::Scenario { json } => {
            let outcome = demo::scenario()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("handle:       #{}", outcome.handle);
                println!("created:      {}", outcome.created);
                println!(
                    "moved-from:   {}",
                    outcome.moved_out_error.as_deref().unwrap_or("still accessible")
                );
                println!("top before:   {}", outcome.top_before);
                println!("popped:       {}", outcome.popped);
            }
        }
    }

    Ok(())
}
