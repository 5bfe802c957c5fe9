// crates/cli/src/config.rs
use crate::args::Args;
use station_stats_engine::options as engine_options;
pub use station_stats_engine::config::{Config, ConfigBuilder};

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mut builder = ConfigBuilder::default();
        builder.path(args.path);
        if let Some(jobs) = args.jobs {
            builder.jobs(jobs);
        }
        if let Some(buffer_size) = args.buffer_size {
            builder.buffer_size(buffer_size);
        }
        builder.strategy(engine_options::Strategy::from(args.strategy));
        builder.build().expect("Failed to build config")
    }
}
