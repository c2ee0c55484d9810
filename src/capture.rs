//! This module contains all the capture logic

// A capture is a one-shot affair: solve the coincidence plan, let the sampler run for
// one coincidence period, then hand buffer generation to its own thread. The only
// place we block on that thread is the completion channel, which carries exactly one
// message (the finished buffer or the reason there isn't one).

use std::{
    fmt,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{bounded, RecvTimeoutError};
use tracing::{debug, error, info, warn};

use crate::{
    coincidence::{CoincidencePlan, FrequencyPair},
    config::Config,
    errors::Error,
    exfil::{AnalysisSummary, Analyzer},
    generator::SampleSource,
    operator::Operator,
    reorder::compute_order,
    timing::PhaseTimestamper,
    Result,
};

const CONFIRM_PROMPT: &str =
    "Please configure unit to output waveform with frequency specified.\nBegin waveform capture? (y/n)";
const ACK_PROMPT: &str = "\nDone processing. Enter 'e' to exit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    AwaitingConfirmation,
    Capturing,
    ProcessingResults,
    Done,
    Cancelled,
    Failed,
}

/// Where in the session a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Confirmation,
    Capture,
    Analysis,
    Acknowledgment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validation => "validation",
            Stage::Confirmation => "confirmation",
            Stage::Capture => "capture",
            Stage::Analysis => "analysis",
            Stage::Acknowledgment => "acknowledgment",
        };
        f.write_str(name)
    }
}

/// One reconstructed source period, ready for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    pub ordered_amplitudes: Vec<i16>,
    pub equivalent_sample_rate_hz: f64,
    pub source_hz: f64,
    pub sampler_hz: f64,
}

#[derive(Debug)]
pub enum Outcome {
    Done {
        plan: CoincidencePlan,
        summary: AnalysisSummary,
    },
    Cancelled,
    Failed {
        stage: Stage,
        error: Error,
    },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Done { .. } => 0,
            Outcome::Cancelled => 2,
            Outcome::Failed { .. } => 1,
        }
    }
}

type StageResult<T> = std::result::Result<T, (Stage, Error)>;

fn at(stage: Stage) -> impl FnOnce(Error) -> (Stage, Error) {
    move |e| (stage, e)
}

/// Format a duration as HH:MM:SS.cc
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:02}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        elapsed.subsec_millis() / 10
    )
}

fn check_length(raw: &[i16], sample_count: usize) -> Result<()> {
    if raw.len() != sample_count {
        return Err(Error::Generation(format!(
            "expected {} samples, got {}",
            sample_count,
            raw.len()
        )));
    }
    Ok(())
}

/// Fold a complete raw capture into one period at the equivalent sample rate.
/// A `raw` buffer that isn't exactly `plan.sample_count` long is a `Generation` error.
pub fn reconstruct(
    pair: &FrequencyPair,
    plan: &CoincidencePlan,
    precision: u32,
    raw: &[i16],
) -> Result<CaptureResult> {
    check_length(raw, plan.sample_count)?;
    let stamps = PhaseTimestamper::new(*pair, precision).timestamp(plan.sample_count);
    let order = compute_order(&stamps.relative);
    Ok(CaptureResult {
        ordered_amplitudes: order.apply(raw),
        equivalent_sample_rate_hz: plan.equivalent_sample_rate_hz,
        source_hz: pair.source_hz,
        sampler_hz: pair.sampler_hz,
    })
}

/// A single calibration run, from prompt to acknowledgment
pub struct CaptureSession<A, O> {
    config: Config,
    source: Arc<dyn SampleSource>,
    analyzer: A,
    operator: O,
    state: CaptureState,
}

impl<A: Analyzer, O: Operator> CaptureSession<A, O> {
    pub fn new(config: Config, source: Arc<dyn SampleSource>, analyzer: A, operator: O) -> Self {
        Self {
            config,
            source,
            analyzer,
            operator,
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn into_inner(self) -> (A, O) {
        (self.analyzer, self.operator)
    }

    fn transition(&mut self, next: CaptureState) {
        debug!(from = ?self.state, to = ?next, "Capture state change");
        self.state = next;
    }

    fn report(&mut self, message: &str) -> StageResult<()> {
        let stage = match self.state {
            CaptureState::Idle | CaptureState::AwaitingConfirmation | CaptureState::Cancelled => {
                Stage::Confirmation
            }
            CaptureState::Capturing => Stage::Capture,
            _ => Stage::Analysis,
        };
        self.operator.report(message).map_err(at(stage))
    }

    /// Run the whole session for a source at `source_hz`. Never panics on operator or
    /// collaborator misbehavior; every failure ends up in the returned [`Outcome`].
    pub fn run(&mut self, source_hz: u64) -> Outcome {
        match self.calibrate(source_hz) {
            Ok(outcome) => outcome,
            Err((stage, error)) => {
                error!(%stage, %error, "Calibration failed");
                self.transition(CaptureState::Failed);
                let message = match &error {
                    Error::InvalidConfirmation(_) => {
                        "Invalid input, please enter 'y' or 'n'. Exiting with code 1".to_owned()
                    }
                    Error::InvalidAcknowledgment(_) => {
                        "Invalid input, please enter 'e'. Exiting with code 1".to_owned()
                    }
                    e => format!("Capture failed during {}: {}", stage, e),
                };
                if let Err(e) = self.operator.report(&message) {
                    warn!(%e, "Could not report failure to operator");
                }
                Outcome::Failed { stage, error }
            }
        }
    }

    fn calibrate(&mut self, source_hz: u64) -> StageResult<Outcome> {
        let source_hz = self
            .config
            .validate_source(source_hz)
            .map_err(at(Stage::Validation))?;
        let pair = FrequencyPair::new(source_hz as f64, self.config.sampler_hz)
            .map_err(at(Stage::Validation))?;

        self.transition(CaptureState::AwaitingConfirmation);
        let answer = self
            .operator
            .prompt(CONFIRM_PROMPT)
            .map_err(at(Stage::Confirmation))?;
        if answer == "n" {
            self.transition(CaptureState::Cancelled);
            info!("Capture cancelled by operator");
            self.report("Capture cancelled")?;
            return Ok(Outcome::Cancelled);
        } else if answer != "y" {
            return Err((Stage::Confirmation, Error::InvalidConfirmation(answer)));
        }

        self.transition(CaptureState::Capturing);
        let stopwatch = Instant::now();
        let plan = CoincidencePlan::solve(&pair).map_err(at(Stage::Capture))?;
        info!(
            source_hz = pair.source_hz,
            sampler_hz = pair.sampler_hz,
            sample_count = plan.sample_count,
            period_s = plan.coincidence_period_s,
            "Starting capture"
        );
        if self.config.simulate_capture_delay {
            // Give the sampler one coincidence period to fill its buffer
            thread::sleep(Duration::from_secs_f64(plan.coincidence_period_s));
        }
        let raw = self
            .acquire(pair, plan.sample_count)
            .map_err(at(Stage::Capture))?;
        self.report(&format!(
            "Waveform capture complete. Run time: {}",
            format_elapsed(stopwatch.elapsed())
        ))?;
        self.report("Processing data")?;

        self.transition(CaptureState::ProcessingResults);
        let result = reconstruct(&pair, &plan, self.config.precision, &raw)
            .map_err(at(Stage::Capture))?;
        let summary = self.analyzer.analyze(&result).map_err(|e| match e {
            Error::Analysis(_) => (Stage::Analysis, e),
            other => (Stage::Analysis, Error::Analysis(other.to_string())),
        })?;
        if summary.value_db.is_nan() {
            return Err((
                Stage::Analysis,
                Error::Analysis(format!("{} is not a number", summary.label)),
            ));
        }

        self.report(&format!("Source Frequency: {}Hz", pair.source_hz))?;
        self.report(&format!("Real ADC Sample Rate: {}Hz", pair.sampler_hz))?;
        self.report(&format!(
            "Equivalent Sampling Rate: {}Hz",
            plan.equivalent_sample_rate_hz
        ))?;
        self.report(&format!("Number of Samples: {}", plan.sample_count))?;
        self.report(&format!("{}: {}dB", summary.label, summary.value_db))?;
        for line in &summary.outputs {
            self.report(line)?;
        }

        let ack = self
            .operator
            .prompt(ACK_PROMPT)
            .map_err(at(Stage::Acknowledgment))?;
        if ack != "e" {
            return Err((Stage::Acknowledgment, Error::InvalidAcknowledgment(ack)));
        }
        self.transition(CaptureState::Done);
        Ok(Outcome::Done { plan, summary })
    }

    /// Dispatch generation on its own thread and wait for it to signal completion
    fn acquire(&self, pair: FrequencyPair, sample_count: usize) -> Result<Vec<i16>> {
        let (sender, receiver) = bounded(1);
        let source = Arc::clone(&self.source);
        let handle = thread::Builder::new()
            .name("ets-generate".to_owned())
            .spawn(move || {
                // Fails only if the waiter already timed out, in which case nobody cares
                let _ = sender.send(source.acquire(&pair, sample_count));
            })?;
        info!(sample_count, "Dispatched sample generation");

        let disconnected =
            || Error::Generation("generation task exited without a result".to_owned());
        let completion = match self.config.capture_timeout {
            Some(timeout) => receiver.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => Error::Timeout {
                    timeout_ms: timeout.as_millis(),
                },
                RecvTimeoutError::Disconnected => disconnected(),
            })?,
            None => receiver.recv().map_err(|_| disconnected())?,
        };
        // The task has sent its only message, all that's left is to reap it
        if handle.join().is_err() {
            warn!("Generation thread panicked after completing");
        }

        let raw = completion.map_err(|e| match e {
            Error::Generation(_) => e,
            other => Error::Generation(other.to_string()),
        })?;
        check_length(&raw, sample_count)?;
        info!(sample_count, "Sample generation complete");
        Ok(raw)
    }
}
