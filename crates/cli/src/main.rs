use clap::Parser;
use station_stats_cli::args::Args;
use station_stats_cli::config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let config = Config::from(args);
    log::info!(
        "station_stats v{} · parallel={}",
        station_stats_cli::VERSION,
        config.jobs
    );

    match station_stats_engine::run(&config) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Application Error: {e}");
            ExitCode::FAILURE
        }
    }
}
