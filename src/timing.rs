//! Per-sample capture time and phase within the source period

use crate::coincidence::FrequencyPair;

/// Magnitudes at or beyond this have no fractional digits left to round
const ROUND_LIMIT: f64 = 1e16;

/// Round to `digits` decimal places, halves away from zero
pub fn round_to(value: f64, digits: u32) -> f64 {
    if value.abs() >= ROUND_LIMIT {
        return value;
    }
    let power10 = 10f64.powi(digits as i32);
    // f64::round already breaks ties away from zero
    (value * power10).round() / power10
}

/// Timing of a single raw sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleTiming {
    pub index: usize,
    /// Seconds since the first sample
    pub absolute_s: f64,
    /// Seconds since the start of the source period this sample falls in
    pub relative_s: f64,
}

/// Column-wise timings for a whole capture
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timestamps {
    pub absolute: Vec<f64>,
    pub relative: Vec<f64>,
}

impl Timestamps {
    pub fn len(&self) -> usize {
        self.absolute.len()
    }

    pub fn is_empty(&self) -> bool {
        self.absolute.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SampleTiming> {
        Some(SampleTiming {
            index,
            absolute_s: *self.absolute.get(index)?,
            relative_s: *self.relative.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SampleTiming> + '_ {
        self.absolute
            .iter()
            .zip(&self.relative)
            .enumerate()
            .map(|(index, (&absolute_s, &relative_s))| SampleTiming {
                index,
                absolute_s,
                relative_s,
            })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PhaseTimestamper {
    pair: FrequencyPair,
    precision: u32,
}

impl PhaseTimestamper {
    pub fn new(pair: FrequencyPair, precision: u32) -> Self {
        Self { pair, precision }
    }

    /// Fold `sample_count` consecutive samples onto one source period
    pub fn timestamp(&self, sample_count: usize) -> Timestamps {
        let sample_period = 1.0 / self.pair.sampler_hz;
        let source_period = self.pair.source_period();
        let mut absolute = Vec::with_capacity(sample_count);
        let mut relative = Vec::with_capacity(sample_count);
        for n in 0..sample_count {
            let t = round_to(n as f64 * sample_period, self.precision);
            absolute.push(t);
            if n == 0 {
                relative.push(0.0);
                continue;
            }
            let since = |periods: f64| {
                let period_start = round_to(periods / self.pair.source_hz, self.precision);
                round_to(t - period_start, self.precision)
            };
            // Times are never negative, so this is the same as truncating
            let periods = (t / source_period).floor();
            let mut r = since(periods);
            // Near a boundary, rounding can land a sample a whole period out
            if r >= source_period {
                r = since(periods + 1.0);
            } else if r < 0.0 {
                r = since(periods - 1.0);
            }
            relative.push(if r > 0.0 { r } else { 0.0 });
        }
        Timestamps { absolute, relative }
    }
}
