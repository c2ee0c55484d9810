//! This module is responsible for handing the reconstructed period off for analysis

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Datelike, Timelike, Utc};
use tracing::info;

use crate::{capture::CaptureResult, errors::Error, Result, MAX_AMPLITUDE};

/// What an analyzer hands back: one figure in dB plus anything else worth showing
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub label: String,
    pub value_db: f64,
    pub outputs: Vec<String>,
}

/// Consumer of a finished, ordered capture
pub trait Analyzer {
    fn analyze(&mut self, result: &CaptureResult) -> Result<AnalysisSummary>;
}

/// Convert a chrono DateTime into a filename-friendly timestamp
fn export_timestamp(time: &DateTime<Utc>) -> String {
    format!(
        "{}-{:02}-{:02}-{:02}:{:02}:{:02}",
        time.year(),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// Peak level of the reconstruction relative to full scale
pub fn peak_dbfs(samples: &[i16]) -> f64 {
    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
    20.0 * (peak as f64 / MAX_AMPLITUDE as f64).log10()
}

/// Write one reconstructed period as `equivalent_time_s,amplitude` rows
pub fn write_csv(path: &Path, result: &CaptureResult) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    let dt = 1.0 / result.equivalent_sample_rate_hz;
    writeln!(file, "equivalent_time_s,amplitude")?;
    for (k, amplitude) in result.ordered_amplitudes.iter().enumerate() {
        writeln!(file, "{:e},{}", k as f64 * dt, amplitude)?;
    }
    file.flush()?;
    Ok(())
}

/// Default analyzer: reports peak level and optionally exports the period to disk
#[derive(Debug, Clone, Default)]
pub struct PeakLevel {
    output_dir: Option<PathBuf>,
}

impl PeakLevel {
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir }
    }
}

impl Analyzer for PeakLevel {
    fn analyze(&mut self, result: &CaptureResult) -> Result<AnalysisSummary> {
        if result.ordered_amplitudes.is_empty() {
            return Err(Error::Analysis("nothing to analyze".to_owned()));
        }
        let mut outputs = vec![];
        if let Some(dir) = &self.output_dir {
            fs::create_dir_all(dir)?;
            let path = dir.join(format!("ets-{}.csv", export_timestamp(&Utc::now())));
            write_csv(&path, result)?;
            info!(path = %path.display(), "Exported reconstructed period");
            outputs.push(format!("Reconstruction written to {}", path.display()));
        }
        Ok(AnalysisSummary {
            label: "Peak Level".to_owned(),
            value_db: peak_dbfs(&result.ordered_amplitudes),
            outputs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result(samples: Vec<i16>) -> CaptureResult {
        CaptureResult {
            ordered_amplitudes: samples,
            equivalent_sample_rate_hz: 4000.0,
            source_hz: 1000.0,
            sampler_hz: 3000.0,
        }
    }

    #[test]
    fn test_peak_dbfs() {
        assert_eq!(peak_dbfs(&[0, 32767, -5]), 0.0);
        assert!((peak_dbfs(&[0, -16384, 100]) - -6.02).abs() < 0.01);
        assert_eq!(peak_dbfs(&[0, 0]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_timestamp() {
        let t = Utc.with_ymd_and_hms(2024, 3, 7, 4, 5, 6).unwrap();
        assert_eq!(export_timestamp(&t), "2024-03-07-04:05:06");
    }

    #[test]
    fn test_empty_capture() {
        assert!(matches!(
            PeakLevel::default().analyze(&result(vec![])),
            Err(Error::Analysis(_))
        ));
    }

    #[test]
    fn test_export() {
        let dir = std::env::temp_dir().join(format!("ets-exfil-{}", std::process::id()));
        let summary = PeakLevel::new(Some(dir.clone()))
            .analyze(&result(vec![0, 32767, 0, -32767]))
            .unwrap();
        assert_eq!(summary.label, "Peak Level");
        assert_eq!(summary.value_db, 0.0);
        assert_eq!(summary.outputs.len(), 1);
        let path = fs::read_dir(&dir).unwrap().next().unwrap().unwrap().path();
        let csv = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "equivalent_time_s,amplitude");
        assert_eq!(lines[1], "0e0,0");
        assert_eq!(lines[2], "2.5e-4,32767");
        assert_eq!(lines.len(), 5);
        fs::remove_dir_all(&dir).unwrap();
    }
}
