//! Session configuration

use std::{path::PathBuf, time::Duration};

use crate::{errors::Error, Result, MAX_SOURCE_HZ, MIN_SOURCE_HZ, PRECISION, SAMPLE_RATE};

/// Everything a capture session needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct Config {
    /// Digitizer sample rate in Hz (default: 10,000,001)
    pub sampler_hz: f64,

    /// Decimal digits kept on timestamps (default: 15)
    pub precision: u32,

    /// Lowest accepted source frequency in Hz (default: 100)
    pub min_source_hz: u64,

    /// Highest accepted source frequency in Hz (default: 500,000,000)
    pub max_source_hz: u64,

    /// Sleep for one coincidence period before dispatching generation, standing in
    /// for the time a real digitizer needs to fill its buffer (default: true)
    pub simulate_capture_delay: bool,

    /// Upper bound on the completion wait. `None` waits forever (default: 60 s)
    pub capture_timeout: Option<Duration>,

    /// Where the default analyzer exports the reconstructed period, if anywhere
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampler_hz: SAMPLE_RATE,
            precision: PRECISION,
            min_source_hz: MIN_SOURCE_HZ,
            max_source_hz: MAX_SOURCE_HZ,
            simulate_capture_delay: true,
            capture_timeout: Some(Duration::from_secs(60)),
            output_dir: None,
        }
    }
}

impl Config {
    /// Check a source frequency against the accepted range
    pub fn validate_source(&self, source_hz: u64) -> Result<u64> {
        if source_hz < self.min_source_hz || source_hz > self.max_source_hz {
            return Err(Error::Validation(format!(
                "source frequency {}Hz outside {}Hz..={}Hz",
                source_hz, self.min_source_hz, self.max_source_hz
            )));
        }
        Ok(source_hz)
    }

    /// Parse and validate a source frequency given as text
    pub fn parse_source(&self, s: &str) -> Result<u64> {
        let source_hz = s
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Validation(format!("{:?} is not an integer frequency", s)))?;
        self.validate_source(source_hz)
    }
}
