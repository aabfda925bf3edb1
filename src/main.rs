use clap::Parser;
use frame_ring::bench::{BenchConfig, run};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[cfg(not(unix))]
compile_error!("This crate only supports Unix-like operating systems.");

#[derive(Parser, Debug)]
#[command(version, about = "Throughput/latency benchmark for the SPSC framed ring", long_about = None)]
struct Args {
    /// Number of messages to push through the ring.
    #[arg(short = 'n', long = "messages", default_value_t = 5_000_000)]
    messages: u64,

    /// Record a latency sample every N-th message (1 = every message).
    #[arg(long = "sample-every", default_value_t = 1)]
    sample_every: u32,

    /// Consumer sleep in microseconds when the ring is empty.
    #[arg(long = "empty-backoff-us", default_value_t = 10)]
    empty_backoff_us: u64,

    /// Ring capacity in bytes. Must be a power of two.
    #[arg(long = "capacity", default_value_t = 1 << 20)]
    capacity: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = BenchConfig {
        messages: args.messages,
        sample_every: args.sample_every,
        empty_backoff: Duration::from_micros(args.empty_backoff_us),
        capacity: args.capacity,
    };

    match run(&cfg) {
        Ok(results) => results.print_report(&cfg),
        Err(e) => {
            eprintln!("fatal: {e}");
            std::process::exit(1);
        }
    }
}
