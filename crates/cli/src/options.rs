use clap::ValueEnum;
use station_stats_engine::options as engine_options;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Strategy {
    /// Fixed-buffer byte scanning with tail carry
    #[default]
    ByteScan,
    /// Buffered line iterator
    LineIter,
}

impl From<Strategy> for engine_options::Strategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::ByteScan => Self::ByteScan,
            Strategy::LineIter => Self::LineIter,
        }
    }
}
