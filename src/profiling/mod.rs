//! Execution timing for scopes and multi-step operations.
//!
//! [`ScopeTimer`] logs how long a scope took when it is dropped, which is
//! what the `#[timed]` attribute expands to. [`Profiler`] aggregates named
//! steps of a longer operation and can persist the resulting report as JSON
//! under the SDK directory.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::random::random_string;
use crate::data::directory::{DirectoryError, SdkDirectory};

/// Errors raised while recording or persisting profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("could not serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not write profile: {0}")]
    Io(#[from] std::io::Error),
}

/// Logs the execution time of a scope when dropped.
pub struct ScopeTimer {
    label: String,
    start: Instant,
}

impl ScopeTimer {
    /// Starts a timer for the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
        }
    }

    /// The time elapsed since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        debug!(
            label = %self.label,
            "[Sails Profiler]: {} took {} seconds to execute.",
            self.label,
            elapsed.as_secs_f64()
        );
    }
}

/// Runs `operation` and logs its execution time under `label`.
pub fn time<T>(label: &str, operation: impl FnOnce() -> T) -> T {
    let _timer = ScopeTimer::new(label);
    operation()
}

#[derive(Debug, Clone)]
struct Step {
    label: String,
    calls: u64,
    total: Duration,
    min: Duration,
    max: Duration,
}

/// Aggregated timings for one named step of a profiled operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    pub label: String,
    pub calls: u64,
    pub total_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
}

/// A serializable snapshot of a finished profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub label: String,
    pub total_secs: f64,
    pub steps: Vec<StepStats>,
}

/// Collects step timings for a labelled operation.
///
/// Steps are reported in the order they were first recorded. Repeated
/// steps with the same label are folded into one entry.
pub struct Profiler {
    label: String,
    started: Instant,
    steps: Vec<Step>,
}

impl Profiler {
    /// Starts a profile for the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: Instant::now(),
            steps: Vec::new(),
        }
    }

    /// The profile label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The time elapsed since the profile was started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Runs `operation` and records its duration under `label`.
    pub fn step<T>(&mut self, label: &str, operation: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = operation();
        self.record(label, start.elapsed());
        result
    }

    /// Records an externally measured duration under `label`.
    pub fn record(&mut self, label: &str, duration: Duration) {
        match self.steps.iter_mut().find(|step| step.label == label) {
            Some(step) => {
                step.calls += 1;
                step.total += duration;
                step.min = step.min.min(duration);
                step.max = step.max.max(duration);
            }
            None => self.steps.push(Step {
                label: label.to_string(),
                calls: 1,
                total: duration,
                min: duration,
                max: duration,
            }),
        }
    }

    /// A snapshot of everything recorded so far.
    pub fn report(&self) -> ProfileReport {
        ProfileReport {
            label: self.label.clone(),
            total_secs: self.started.elapsed().as_secs_f64(),
            steps: self
                .steps
                .iter()
                .map(|step| StepStats {
                    label: step.label.clone(),
                    calls: step.calls,
                    total_secs: step.total.as_secs_f64(),
                    min_secs: step.min.as_secs_f64(),
                    max_secs: step.max.as_secs_f64(),
                })
                .collect(),
        }
    }

    /// Writes the report as pretty JSON under `profiles/` in the SDK
    /// directory and returns the file path. File names carry a random
    /// suffix so repeated profiles of the same label never collide.
    pub fn finish(self, directory: &SdkDirectory) -> Result<PathBuf, ProfileError> {
        let report = self.report();
        directory.ensure_subdir("profiles")?;

        let file_name = format!("profiles/{}-{}.json", self.label, random_string(2, "-"));
        let path = directory.path_for(&file_name);
        fs::write(&path, serde_json::to_string_pretty(&report)?)?;

        debug!(
            path = %path.display(),
            "[Sails Profiler]: {} full profile was saved to {}.",
            self.label,
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SdkConfig;

    fn scratch_directory() -> (tempfile::TempDir, SdkDirectory) {
        let tmp = tempfile::tempdir().unwrap();
        let config = SdkConfig {
            root: Some(tmp.path().join("sails")),
            hide_directory: false,
        };
        let directory = SdkDirectory::with_config(&config).unwrap();
        (tmp, directory)
    }

    #[test]
    fn scope_timer_tracks_elapsed_time() {
        let timer = ScopeTimer::new("noop");
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn time_returns_the_operation_result() {
        let value = time("addition", || 2 + 2);
        assert_eq!(value, 4);
    }

    #[test]
    fn repeated_steps_fold_into_one_entry() {
        let mut profiler = Profiler::new("batch");
        profiler.record("fetch", Duration::from_millis(10));
        profiler.record("fetch", Duration::from_millis(30));
        profiler.record("store", Duration::from_millis(20));

        let report = profiler.report();
        assert_eq!(report.steps.len(), 2);

        let fetch = &report.steps[0];
        assert_eq!(fetch.label, "fetch");
        assert_eq!(fetch.calls, 2);
        assert!((fetch.total_secs - 0.040).abs() < 0.001);
        assert!((fetch.min_secs - 0.010).abs() < 0.001);
        assert!((fetch.max_secs - 0.030).abs() < 0.001);
    }

    #[test]
    fn steps_keep_first_recorded_order() {
        let mut profiler = Profiler::new("ordered");
        profiler.record("c", Duration::from_millis(1));
        profiler.record("a", Duration::from_millis(1));
        profiler.record("c", Duration::from_millis(1));
        profiler.record("b", Duration::from_millis(1));

        let labels: Vec<_> = profiler
            .report()
            .steps
            .iter()
            .map(|step| step.label.clone())
            .collect();
        assert_eq!(labels, ["c", "a", "b"]);
    }

    #[test]
    fn step_returns_the_operation_result() {
        let mut profiler = Profiler::new("calc");
        let value = profiler.step("double", || 21 * 2);
        assert_eq!(value, 42);
        assert_eq!(profiler.report().steps[0].calls, 1);
    }

    #[test]
    fn finish_writes_a_parseable_report() {
        let (_tmp, directory) = scratch_directory();

        let mut profiler = Profiler::new("import");
        profiler.step("read", || std::thread::sleep(Duration::from_millis(2)));
        let path = profiler.finish(&directory).unwrap();

        assert!(path.starts_with(directory.root()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("import-"));
        assert!(name.ends_with(".json"));

        let report: ProfileReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(report.label, "import");
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].label, "read");
    }

    #[test]
    fn finished_profiles_do_not_collide() {
        let (_tmp, directory) = scratch_directory();

        let first = Profiler::new("job").finish(&directory).unwrap();
        let second = Profiler::new("job").finish(&directory).unwrap();
        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }
}
