use crate::options::Strategy;
use derive_builder::Builder;
use std::path::PathBuf;

/// Default per-worker read buffer for the byte-scan strategy.
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Default backward-scan window used to snap chunk boundaries to a line
/// terminator. Must exceed the longest record in the input.
pub const DEFAULT_ALIGN_WINDOW: usize = 512;

/// Default cap on the worker count; more workers than this oversubscribe
/// the disk long before they saturate the cores.
pub const DEFAULT_JOBS_CAP: usize = 8;

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Config {
    /// Input file, one `station;measurement` record per line.
    #[builder(default = "default_path()")]
    pub path: PathBuf,

    /// Requested worker count; the engine caps it at available cores.
    #[builder(default = "default_jobs()")]
    pub jobs: usize,

    /// Per-worker read buffer in bytes (byte-scan strategy).
    #[builder(default = "DEFAULT_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Backward-scan window for chunk boundary alignment, in bytes.
    #[builder(default = "DEFAULT_ALIGN_WINDOW")]
    pub align_window: usize,

    #[builder(default)]
    pub strategy: Strategy,
}

fn default_path() -> PathBuf {
    PathBuf::from("measurements.txt")
}

fn default_jobs() -> usize {
    num_cpus::get().clamp(1, DEFAULT_JOBS_CAP)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: default_path(),
            jobs: default_jobs(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            align_window: DEFAULT_ALIGN_WINDOW,
            strategy: Strategy::default(),
        }
    }
}
