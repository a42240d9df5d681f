//! Domain types shared by the sandbox and scheduler layers.
//!
//! These are the internal, closed representations of a submission and its
//! evolving execution state; the HTTP adapter translates between these and
//! the wire DTOs in `handlers::tasks`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS};

/// An accepted submission, immutable once constructed.
///
/// Unlike the open-ended key/value map this was distilled from, this is a
/// closed struct; unknown wire fields are ignored rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub language: String,
    pub code: String,
    #[serde(default)]
    pub stdin: Option<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
    pub timeout_s: u64,
    pub run_profiling: bool,
}

impl Submission {
    /// Clamp a raw requested timeout into the accepted range, applying the
    /// default when none was given.
    pub fn clamp_timeout(requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
            .clamp(MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS)
    }
}

/// Lifecycle state of a task. Terminal states (`Done`, `Timeout`, `Error`)
/// never transition further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Processing,
    Done,
    Timeout,
    Error,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Timeout | Self::Error)
    }
}

/// An accepted submission plus its evolving execution state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: Uuid,
    pub submission: Submission,
    pub worker_id: Option<usize>,
    pub enqueue_ts: DateTime<Utc>,
    pub start_ts: Option<DateTime<Utc>>,
    pub finish_ts: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub output: Option<ExecutionOutput>,
    pub error: Option<String>,
}

impl Task {
    pub fn queued(task_id: Uuid, submission: Submission) -> Self {
        Self {
            task_id,
            submission,
            worker_id: None,
            enqueue_ts: Utc::now(),
            start_ts: None,
            finish_ts: None,
            status: TaskStatus::Queued,
            output: None,
            error: None,
        }
    }

    pub fn mark_processing(&mut self, worker_id: usize) {
        self.worker_id = Some(worker_id);
        self.start_ts = Some(Utc::now());
        self.status = TaskStatus::Processing;
    }

    pub fn mark_done(&mut self, output: ExecutionOutput) {
        self.finish_ts = Some(Utc::now());
        self.status = TaskStatus::Done;
        self.output = Some(output);
    }

    pub fn mark_timeout(&mut self) {
        self.finish_ts = Some(Utc::now());
        self.status = TaskStatus::Timeout;
        self.error = Some("execution exceeded the requested timeout".to_string());
    }

    pub fn mark_error(&mut self, message: String) {
        self.finish_ts = Some(Utc::now());
        self.status = TaskStatus::Error;
        self.error = Some(message);
    }
}

/// Result of running a submission inside a sandbox container.
///
/// Exactly one of `profile`/`time_v` is populated, never both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionOutput {
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfilingResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_v: Option<TimeV>,
}

/// Sampling-mode measurement: periodic RSS samples of the target process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilingResult {
    /// Peak resident set size observed, in kilobytes.
    pub peak_memory_kb: i64,
    /// Running-maximum accumulator over all samples (not a trapezoidal
    /// integral) — preserved bit-for-bit for compatibility with existing
    /// clients.
    pub integral: i64,
    pub duration_ms: f64,
    /// `(timestamp_ns, rss_kb)` pairs in sample order.
    pub log: Vec<(i64, i64)>,
}

/// System-time mode measurement, parsed from `/usr/bin/time -v` stderr.
///
/// Every field is optional: the parser recognizes a fixed set of keys and
/// silently omits anything it cannot parse rather than failing the task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeV {
    pub command: Option<String>,
    pub user_time: Option<f64>,
    pub system_time: Option<f64>,
    pub cpu_percent: Option<f64>,
    pub elapsed_time_seconds: Option<f64>,
    pub max_resident_set_kb: Option<i64>,
    pub avg_shared_text_kb: Option<i64>,
    pub avg_unshared_data_kb: Option<i64>,
    pub avg_stack_size_kb: Option<i64>,
    pub avg_total_size_kb: Option<i64>,
    pub minor_page_faults: Option<i64>,
    pub major_page_faults: Option<i64>,
    pub voluntary_context_switches: Option<i64>,
    pub involuntary_context_switches: Option<i64>,
    pub swaps: Option<i64>,
    pub file_system_inputs: Option<i64>,
    pub file_system_outputs: Option<i64>,
    pub signals_delivered: Option<i64>,
    pub socket_messages_sent: Option<i64>,
    pub socket_messages_received: Option<i64>,
    pub page_size_bytes: Option<i64>,
    pub exit_status: Option<i32>,
}

/// A fixed-pool execution agent pinned to one CPU core.
#[derive(Debug, Clone, Copy)]
pub struct Worker {
    pub worker_id: usize,
    /// `worker_id mod host_cpu_count` on Linux; unset on other hosts.
    pub cpu_index: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_timeout_within_bounds() {
        assert_eq!(Submission::clamp_timeout(None), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(Submission::clamp_timeout(Some(0)), MIN_TIMEOUT_SECONDS);
        assert_eq!(Submission::clamp_timeout(Some(99999)), MAX_TIMEOUT_SECONDS);
        assert_eq!(Submission::clamp_timeout(Some(45)), 45);
    }

    #[test]
    fn terminal_states() {
        assert!(TaskStatus::Done.is_terminal());
        assert!(TaskStatus::Timeout.is_terminal());
        assert!(TaskStatus::Error.is_terminal());
        assert!(!TaskStatus::Queued.is_terminal());
        assert!(!TaskStatus::Processing.is_terminal());
    }

    #[test]
    fn task_lifecycle_timestamps_are_ordered() {
        let submission = Submission {
            language: "python".to_string(),
            code: "print(1)".to_string(),
            stdin: None,
            libraries: vec![],
            timeout_s: 30,
            run_profiling: false,
        };
        let mut task = Task::queued(Uuid::new_v4(), submission);
        assert_eq!(task.status, TaskStatus::Queued);

        task.mark_processing(0);
        assert_eq!(task.status, TaskStatus::Processing);
        assert!(task.start_ts.unwrap() >= task.enqueue_ts);

        task.mark_done(ExecutionOutput::default());
        assert_eq!(task.status, TaskStatus::Done);
        assert!(task.finish_ts.unwrap() >= task.start_ts.unwrap());
    }
}
