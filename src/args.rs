//! Argument parsing for running from the command line

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{config::Config, SAMPLE_RATE};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Frequency of the waveform coming out of the AWG in Hz (100 to 500000000)
    pub frequency: Option<String>,
    /// Digitizer sample rate in Hz
    #[clap(short, long, default_value_t = SAMPLE_RATE, value_parser = valid_rate)]
    pub sampler_rate: f64,
    /// Seconds to wait for the capture to complete, 0 to wait forever
    #[clap(short, long, default_value_t = 60)]
    pub timeout: u64,
    /// Skip the simulated capture delay
    #[clap(long)]
    pub no_delay: bool,
    /// Directory to export the reconstructed period to
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

impl Args {
    pub fn config(&self) -> Config {
        Config {
            sampler_hz: self.sampler_rate,
            simulate_capture_delay: !self.no_delay,
            capture_timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            output_dir: self.output_dir.clone(),
            ..Default::default()
        }
    }
}

/// Match verbosity filter with tracing subscriber log levels
pub fn convert_filter(filter: log::LevelFilter) -> tracing_subscriber::filter::LevelFilter {
    match filter {
        log::LevelFilter::Off => tracing_subscriber::filter::LevelFilter::OFF,
        log::LevelFilter::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        log::LevelFilter::Warn => tracing_subscriber::filter::LevelFilter::WARN,
        log::LevelFilter::Info => tracing_subscriber::filter::LevelFilter::INFO,
        log::LevelFilter::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
        log::LevelFilter::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
    }
}

fn valid_rate(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate >= 1.0 => Ok(rate),
        _ => Err("Sample rate must be a number of at least 1Hz".to_string()),
    }
}
