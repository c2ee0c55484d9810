//! Raw sample acquisition

use std::f64::consts::PI;

use num_traits::ToPrimitive;

use crate::{coincidence::FrequencyPair, errors::Error, Result, MAX_AMPLITUDE};

/// Anything that can fill a capture buffer of `sample_count` samples taken at
/// `pair.sampler_hz` from a source running at `pair.source_hz`.
///
/// A digitizer driver implements this in place of [`SineGenerator`].
pub trait SampleSource: Send + Sync {
    fn acquire(&self, pair: &FrequencyPair, sample_count: usize) -> Result<Vec<i16>>;
}

/// Simulated capture of a full-scale sine
#[derive(Debug, Clone, Copy, Default)]
pub struct SineGenerator;

impl SampleSource for SineGenerator {
    fn acquire(&self, pair: &FrequencyPair, sample_count: usize) -> Result<Vec<i16>> {
        let amplitude = MAX_AMPLITUDE as f64;
        (0..sample_count)
            .map(|n| {
                let v = (amplitude * ((2.0 * PI * n as f64 * pair.source_hz) / pair.sampler_hz).sin())
                    .round();
                v.to_i16()
                    .ok_or_else(|| Error::Generation(format!("sample {} out of range: {}", n, v)))
            })
            .collect()
    }
}
