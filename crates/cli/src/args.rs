use clap::Parser;
use std::path::PathBuf;

use crate::options::Strategy;

#[derive(Parser, Debug)]
#[command(
    name = "station_stats",
    version,
    about = "Per-station min/mean/max summary of a measurements file"
)]
pub struct Args {
    /// Input file, one `station;measurement` record per line
    #[arg(default_value = "measurements.txt")]
    pub path: PathBuf,

    /// Parallel workers (default: available cores, capped at 8)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Chunk scanning strategy
    #[arg(long, value_enum, default_value = "byte-scan")]
    pub strategy: Strategy,

    /// Per-worker read buffer in bytes (byte-scan strategy)
    #[arg(long)]
    pub buffer_size: Option<usize>,
}
