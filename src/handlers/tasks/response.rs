//! Wire DTOs for the task endpoints, kept separate from the internal
//! `Task`/`ExecutionOutput` domain types so their JSON shape is stable
//! independent of how the domain model evolves.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ExecutionOutput, Task, TaskStatus};
use crate::scheduler::SchedulerStatus;

/// `POST /execute` response body.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub task_id: uuid::Uuid,
    pub status: TaskStatus,
    pub error: Option<String>,
}

impl ExecuteResponse {
    pub fn accepted(task_id: uuid::Uuid) -> Self {
        Self {
            task_id,
            status: TaskStatus::Processing,
            error: None,
        }
    }
}

/// `GET /results/{task_id}` response body.
#[derive(Debug, Serialize)]
pub struct TaskResultResponse {
    pub task_id: uuid::Uuid,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dict: Option<ExecutionOutput>,
    pub worker_id: Option<usize>,
    pub timestamp: DateTime<Utc>,
    pub process_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Task> for TaskResultResponse {
    fn from(task: Task) -> Self {
        let process_time = match (task.start_ts, task.finish_ts) {
            (Some(start), Some(finish)) => {
                Some((finish - start).num_milliseconds() as f64 / 1000.0)
            }
            _ => None,
        };

        Self {
            task_id: task.task_id,
            status: task.status,
            output_dict: task.output,
            worker_id: task.worker_id,
            timestamp: task.finish_ts.or(task.start_ts).unwrap_or(task.enqueue_ts),
            process_time,
            error: task.error,
        }
    }
}

/// `GET /status` reuses the scheduler's own snapshot type verbatim.
pub type StatusResponse = SchedulerStatus;

/// Shared error body for 400/404/503 responses.
#[derive(Debug, Serialize)]
pub struct TaskErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl TaskErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "error",
            error: error.into(),
        }
    }
}
