//! Coincidence between the source waveform and the fixed sampler.
//!
//! After one coincidence period both the source and the sampler have completed a
//! whole number of cycles, so the samples taken in that window land on distinct
//! phases of the source and can be folded into a single period.

use tracing::debug;

use crate::{errors::Error, Result};

/// Greatest common divisor of two frequencies, truncated to integers
pub fn gcd(a: f64, b: f64) -> u64 {
    let mut a = a.abs().trunc() as u64;
    let mut b = b.abs().trunc() as u64;
    while a != 0 && b != 0 {
        if a > b {
            a %= b;
        } else {
            b %= a;
        }
    }
    if a == 0 {
        b
    } else {
        a
    }
}

/// Least common multiple, zero if either operand is zero
pub fn lcm(a: u64, b: u64) -> u64 {
    match gcd(a as f64, b as f64) {
        0 => 0,
        g => a / g * b,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyPair {
    pub source_hz: f64,
    pub sampler_hz: f64,
}

impl FrequencyPair {
    pub fn new(source_hz: f64, sampler_hz: f64) -> Result<Self> {
        for (name, f) in [("source", source_hz), ("sampler", sampler_hz)] {
            if !f.is_finite() || f <= 0.0 {
                return Err(Error::Validation(format!(
                    "{} frequency must be positive, got {}",
                    name, f
                )));
            }
        }
        Ok(Self {
            source_hz,
            sampler_hz,
        })
    }

    /// Duration of one source period in seconds
    pub fn source_period(&self) -> f64 {
        1.0 / self.source_hz
    }
}

/// How many samples to take, and what they amount to once folded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoincidencePlan {
    pub sample_count: usize,
    pub coincidence_period_s: f64,
    pub equivalent_sample_rate_hz: f64,
}

impl CoincidencePlan {
    pub fn solve(pair: &FrequencyPair) -> Result<Self> {
        let g = gcd(pair.source_hz, pair.sampler_hz);
        if g == 0 {
            return Err(Error::Validation(format!(
                "no coincidence between {}Hz and {}Hz",
                pair.source_hz, pair.sampler_hz
            )));
        }
        let coincidence_period_s = 1.0 / g as f64;
        let sample_count = (coincidence_period_s * pair.sampler_hz).round() as usize;
        let plan = Self {
            sample_count,
            coincidence_period_s,
            equivalent_sample_rate_hz: pair.source_hz * sample_count as f64,
        };
        debug!(gcd = g, ?plan, "Solved coincidence plan");
        Ok(plan)
    }
}
