//! Submit/poll façade (C7) tying the bounded queue, result cache, and
//! pinned worker pool together.

pub mod cache;
pub mod queue;
pub mod worker;

use std::sync::Arc;

use bollard::Docker;
use serde::Serialize;
use sysinfo::System;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Submission, Task, Worker};
use crate::sandbox::container::{ContainerClient, ImageRegistry};

use cache::ResultCache;
use queue::TaskQueue;

/// Host memory snapshot reported by `/status`.
#[derive(Debug, Clone, Serialize)]
pub struct MemorySnapshot {
    pub total_kb: u64,
    pub used_kb: u64,
    pub available_kb: u64,
    pub percent: f32,
}

/// Fleet-wide snapshot returned by `Scheduler::status`.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub queue_capacity: usize,
    pub queue_size: usize,
    pub cache_capacity: usize,
    pub cache_size: usize,
    pub worker_count: usize,
    pub worker_idle_flags: Vec<bool>,
    pub memory: MemorySnapshot,
}

pub struct Scheduler {
    queue: Arc<TaskQueue>,
    cache: Arc<ResultCache>,
    cache_capacity: usize,
    worker_count: usize,
}

impl Scheduler {
    /// Build the scheduler and spawn its pinned worker pool.
    pub fn start(config: &Config, docker: Docker) -> Self {
        let queue = Arc::new(TaskQueue::new(config.scheduler.queue_capacity));
        let cache = Arc::new(ResultCache::new(
            config.scheduler.cache_capacity,
            config.scheduler.workers,
        ));
        let container = Arc::new(ContainerClient::new(docker));
        let images = Arc::new(ImageRegistry::new());

        let host_cpu_count = core_affinity::get_core_ids().map(|ids| ids.len()).unwrap_or(1).max(1);
        let workers: Vec<Worker> = (0..config.scheduler.workers)
            .map(|worker_id| Worker {
                worker_id,
                cpu_index: Some(worker_id % host_cpu_count),
            })
            .collect();

        worker::spawn_workers(
            workers,
            Arc::clone(&queue),
            Arc::clone(&cache),
            container,
            images,
            config.scheduler.memory_limit_mb,
        );

        Self {
            queue,
            cache_capacity: config.scheduler.cache_capacity,
            worker_count: config.scheduler.workers,
            cache,
        }
    }

    /// Validate and enqueue a submission. Returns the assigned task id.
    pub fn submit(&self, mut submission: Submission) -> AppResult<Uuid> {
        if submission.code.trim().is_empty() {
            return Err(AppError::Validation("No code provided".to_string()));
        }
        if submission.language.trim().is_empty() {
            return Err(AppError::Validation("No language provided".to_string()));
        }

        submission.timeout_s = Submission::clamp_timeout(Some(submission.timeout_s));

        let task_id = Uuid::new_v4();
        self.queue.submit((task_id, submission))?;
        Ok(task_id)
    }

    /// Fetch the current snapshot of a task; removes it from the cache if
    /// its status is terminal (consume-once semantics).
    pub async fn poll(&self, task_id: Uuid) -> Option<Task> {
        self.cache.poll(task_id).await
    }

    pub async fn status(&self) -> SchedulerStatus {
        let mut system = System::new();
        system.refresh_memory();

        let total_kb = system.total_memory() / 1024;
        let available_kb = system.available_memory() / 1024;
        let used_kb = total_kb.saturating_sub(available_kb);
        let percent = if total_kb > 0 {
            (used_kb as f32 / total_kb as f32) * 100.0
        } else {
            0.0
        };

        SchedulerStatus {
            queue_capacity: self.queue.capacity(),
            queue_size: self.queue.len(),
            cache_capacity: self.cache_capacity,
            cache_size: self.cache.size().await,
            worker_count: self.worker_count,
            worker_idle_flags: self.cache.idle_flags().await,
            memory: MemorySnapshot {
                total_kb,
                used_kb,
                available_kb,
                percent,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(code: &str, language: &str) -> Submission {
        Submission {
            language: language.to_string(),
            code: code.to_string(),
            stdin: None,
            libraries: vec![],
            timeout_s: 9999,
            run_profiling: false,
        }
    }

    #[test]
    fn submit_rejects_missing_code() {
        let queue = Arc::new(TaskQueue::new(1));
        let cache = Arc::new(ResultCache::new(1, 1));
        let scheduler = Scheduler {
            queue,
            cache,
            cache_capacity: 1,
            worker_count: 1,
        };
        let result = scheduler.submit(submission("", "python"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn submit_clamps_oversized_timeout() {
        let queue = Arc::new(TaskQueue::new(4));
        let cache = Arc::new(ResultCache::new(4, 1));
        let scheduler = Scheduler {
            queue: Arc::clone(&queue),
            cache,
            cache_capacity: 4,
            worker_count: 1,
        };
        scheduler.submit(submission("print(1)", "python")).unwrap();
        let (_, accepted) = futures::executor::block_on(queue.take()).unwrap();
        assert_eq!(accepted.timeout_s, crate::constants::MAX_TIMEOUT_SECONDS);
    }
}
