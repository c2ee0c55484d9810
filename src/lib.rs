//! Equivalent-time sampling (ETS) reconstruction of a periodic waveform captured
//! at a fixed, much slower sampler rate.

pub mod args;
pub mod capture;
pub mod coincidence;
pub mod config;
pub mod errors;
pub mod exfil;
pub mod generator;
pub mod operator;
pub mod reorder;
pub mod timing;

pub use capture::{CaptureResult, CaptureSession, CaptureState, Outcome, Stage};
pub use coincidence::{gcd, lcm, CoincidencePlan, FrequencyPair};
pub use config::Config;
pub use errors::{Error, Result};
pub use exfil::{AnalysisSummary, Analyzer, PeakLevel};
pub use generator::{SampleSource, SineGenerator};
pub use operator::{Console, Operator};
pub use reorder::{compute_order, ReorderPermutation};
pub use timing::{round_to, PhaseTimestamper, SampleTiming, Timestamps};

/// Fixed digitizer sample rate (Hz)
pub const SAMPLE_RATE: f64 = 10_000_001.0;
/// Fractional decimal digits kept on every timestamp
pub const PRECISION: u32 = 15;
/// Full scale of a signed 16-bit sample
pub const MAX_AMPLITUDE: i16 = i16::MAX;
/// Lowest accepted source frequency (Hz)
pub const MIN_SOURCE_HZ: u64 = 100;
/// Highest accepted source frequency (Hz)
pub const MAX_SOURCE_HZ: u64 = 500_000_000;
