//! Sweep results: per-worker step counts, persistence, and summaries.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::runner::RunnerError;

/// Episode lengths for one iteration budget, one slot per worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Planner iterations per decision.
    pub iterations: u32,

    /// Steps survived by each worker's episode, indexed by worker.
    pub steps: Vec<u32>,
}

impl SweepPoint {
    /// Create a new sweep point.
    pub fn new(iterations: u32, steps: Vec<u32>) -> Self {
        Self { iterations, steps }
    }

    /// File name used for this point inside a results directory.
    #[must_use]
    pub fn file_name(iterations: u32) -> String {
        format!("num_steps_{}.bin", iterations)
    }

    /// Write this point into `dir`, returning the file path.
    ///
    /// Writes to a temporary file and renames it into place, so readers
    /// never see a partially written file.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, RunnerError> {
        fs::create_dir_all(dir)?;

        let path = dir.join(Self::file_name(self.iterations));
        let tmp = path.with_extension("bin.tmp");

        let mut writer = BufWriter::new(File::create(&tmp)?);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        fs::rename(&tmp, &path)?;
        info!(path = %path.display(), workers = self.steps.len(), "saved sweep point");

        Ok(path)
    }

    /// Read a point written by `save`.
    pub fn load(path: &Path) -> Result<Self, RunnerError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }

    /// Five-number summary plus mean of the step counts.
    #[must_use]
    pub fn summary(&self) -> Option<StepSummary> {
        StepSummary::from_steps(&self.steps)
    }
}

/// Box-plot statistics of episode lengths.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    pub min: u32,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: u32,
    pub mean: f64,
}

impl StepSummary {
    /// Summarize step counts. Quartiles interpolate linearly between
    /// order statistics. `None` for an empty slice.
    #[must_use]
    pub fn from_steps(steps: &[u32]) -> Option<Self> {
        let mut sorted = steps.to_vec();
        sorted.sort_unstable();

        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let mean = sorted.iter().map(|&s| s as f64).sum::<f64>() / sorted.len() as f64;

        Some(Self {
            min,
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max,
            mean,
        })
    }
}

fn quantile(sorted: &[u32], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(SweepPoint::file_name(50), "num_steps_50.bin");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let point = SweepPoint::new(40, vec![12, 500, 37, 999]);

        let path = point.save(&dir.path().join("value_only")).unwrap();
        assert!(path.ends_with("num_steps_40.bin"));
        assert!(!path.with_extension("bin.tmp").exists());

        let loaded = SweepPoint::load(&path).unwrap();
        assert_eq!(loaded, point);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        SweepPoint::new(10, vec![1, 2]).save(dir.path()).unwrap();
        let path = SweepPoint::new(10, vec![3]).save(dir.path()).unwrap();

        assert_eq!(SweepPoint::load(&path).unwrap().steps, vec![3]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SweepPoint::load(&dir.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, RunnerError::Io(_)));
    }

    #[test]
    fn test_summary() {
        let summary = StepSummary::from_steps(&[7, 1, 3, 5]).unwrap();

        assert_eq!(summary.min, 1);
        assert_eq!(summary.max, 7);
        assert_eq!(summary.median, 4.0);
        assert_eq!(summary.q1, 2.5);
        assert_eq!(summary.q3, 5.5);
        assert_eq!(summary.mean, 4.0);
    }

    #[test]
    fn test_summary_single_and_empty() {
        let summary = SweepPoint::new(1, vec![9]).summary().unwrap();
        assert_eq!(summary.min, 9);
        assert_eq!(summary.q1, 9.0);
        assert_eq!(summary.median, 9.0);

        assert!(StepSummary::from_steps(&[]).is_none());
    }
}
