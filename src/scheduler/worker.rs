//! Fixed pool of worker executors, each pinned to one CPU index, each
//! driving one sandbox session at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::models::{ExecutionOutput, Task, Worker};
use crate::sandbox::container::{ContainerClient, ImageRegistry};
use crate::sandbox::languages::LanguageAdapter;
use crate::sandbox::SandboxSession;

use super::cache::ResultCache;
use super::queue::TaskQueue;

/// Spawn `workers.len()` tokio tasks, each looping: mark idle, dequeue,
/// mark busy, drive one sandbox session under a timeout, record the
/// terminal result, repeat.
pub fn spawn_workers(
    workers: Vec<Worker>,
    queue: Arc<TaskQueue>,
    cache: Arc<ResultCache>,
    container: Arc<ContainerClient>,
    images: Arc<ImageRegistry>,
    memory_limit_mb: u64,
) -> Vec<JoinHandle<()>> {
    workers
        .into_iter()
        .map(|worker| {
            let queue = Arc::clone(&queue);
            let cache = Arc::clone(&cache);
            let container = Arc::clone(&container);
            let images = Arc::clone(&images);

            tokio::spawn(async move {
                if let Some(cpu_index) = worker.cpu_index {
                    if let Some(core) = core_affinity::get_core_ids()
                        .and_then(|ids| ids.into_iter().find(|id| id.id == cpu_index))
                    {
                        core_affinity::set_for_current(core);
                    }
                }

                run_worker_loop(worker, queue, cache, container, images, memory_limit_mb).await;
            })
        })
        .collect()
}

async fn run_worker_loop(
    worker: Worker,
    queue: Arc<TaskQueue>,
    cache: Arc<ResultCache>,
    container: Arc<ContainerClient>,
    images: Arc<ImageRegistry>,
    memory_limit_mb: u64,
) {
    loop {
        cache.set_idle(worker.worker_id, true).await;
        let Some((task_id, submission)) = queue.take().await else {
            // sender dropped; scheduler is shutting down
            return;
        };
        cache.set_idle(worker.worker_id, false).await;

        let mut task = Task::queued(task_id, submission.clone());
        task.mark_processing(worker.worker_id);
        cache.put(task.clone()).await;

        let adapter = match LanguageAdapter::for_language(&submission.language) {
            Ok(adapter) => adapter,
            Err(e) => {
                task.mark_error(e.to_string());
                cache.put(task).await;
                continue;
            }
        };

        let mut session = SandboxSession::new(
            Arc::clone(&container),
            Arc::clone(&images),
            adapter,
            memory_limit_mb,
            worker.cpu_index,
        );

        let deadline = Duration::from_secs(submission.timeout_s);
        match tokio::time::timeout(deadline, session.execute(&submission)).await {
            Ok(Ok(output)) => finish_run(&mut task, output),
            Ok(Err(e)) => task.mark_error(e.to_string()),
            Err(_elapsed) => {
                session.kill().await;
                task.mark_timeout();
            }
        }

        cache.put(task).await;
    }
}

fn finish_run(task: &mut Task, output: ExecutionOutput) {
    task.mark_done(output);
}
