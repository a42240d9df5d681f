//! Bounded, insertion-ordered cache of in-flight and completed tasks, plus
//! the worker idle-flag vector — colocated under the same mutex since no
//! other lock is held during updates, so there is no lock-ordering hazard.

use indexmap::IndexMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::Task;

struct CacheInner {
    tasks: IndexMap<Uuid, Task>,
    capacity: usize,
    idle: Vec<bool>,
}

/// `ResultCache`: `put` evicts the oldest entry whenever the map is at
/// capacity and the key being inserted is new; updating an existing key
/// never reorders it or triggers eviction on its own account.
pub struct ResultCache {
    inner: Mutex<CacheInner>,
}

impl ResultCache {
    pub fn new(capacity: usize, worker_count: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                tasks: IndexMap::new(),
                capacity,
                idle: vec![true; worker_count],
            }),
        }
    }

    pub async fn put(&self, task: Task) {
        let mut inner = self.inner.lock().await;
        let is_new = !inner.tasks.contains_key(&task.task_id);

        if is_new {
            while inner.tasks.len() >= inner.capacity && !inner.tasks.is_empty() {
                inner.tasks.shift_remove_index(0);
            }
        }

        inner.tasks.insert(task.task_id, task);
    }

    pub async fn get(&self, task_id: Uuid) -> Option<Task> {
        self.inner.lock().await.tasks.get(&task_id).cloned()
    }

    pub async fn delete(&self, task_id: Uuid) -> Option<Task> {
        self.inner.lock().await.tasks.shift_remove(&task_id)
    }

    /// Fetch a snapshot; if its status is terminal, remove it from the
    /// cache in the same locked section (consume-once poll semantics).
    pub async fn poll(&self, task_id: Uuid) -> Option<Task> {
        let mut inner = self.inner.lock().await;
        let task = inner.tasks.get(&task_id)?.clone();
        if task.status.is_terminal() {
            inner.tasks.shift_remove(&task_id);
        }
        Some(task)
    }

    pub async fn size(&self) -> usize {
        self.inner.lock().await.tasks.len()
    }

    pub async fn set_idle(&self, worker_id: usize, idle: bool) {
        let mut inner = self.inner.lock().await;
        if let Some(flag) = inner.idle.get_mut(worker_id) {
            *flag = idle;
        }
    }

    pub async fn idle_flags(&self) -> Vec<bool> {
        self.inner.lock().await.idle.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Submission;

    fn task() -> Task {
        Task::queued(
            Uuid::new_v4(),
            Submission {
                language: "python".to_string(),
                code: "print(1)".to_string(),
                stdin: None,
                libraries: vec![],
                timeout_s: 30,
                run_profiling: false,
            },
        )
    }

    #[tokio::test]
    async fn evicts_oldest_when_full() {
        let cache = ResultCache::new(2, 1);
        let first = task();
        let second = task();
        let third = task();
        let first_id = first.task_id;

        cache.put(first).await;
        cache.put(second).await;
        cache.put(third).await;

        assert_eq!(cache.size().await, 2);
        assert!(cache.get(first_id).await.is_none());
    }

    #[tokio::test]
    async fn put_updates_in_place_without_reordering() {
        let cache = ResultCache::new(2, 1);
        let mut first = task();
        let first_id = first.task_id;
        let second = task();

        cache.put(first.clone()).await;
        cache.put(second.clone()).await;

        first.mark_processing(0);
        cache.put(first).await;

        // still both present; updating `first` in place must not evict `second`
        assert_eq!(cache.size().await, 2);
        assert!(cache.get(second.task_id).await.is_some());
        assert_eq!(cache.get(first_id).await.unwrap().status, crate::models::TaskStatus::Processing);
    }

    #[tokio::test]
    async fn poll_consumes_terminal_tasks_once() {
        let cache = ResultCache::new(4, 1);
        let mut t = task();
        t.mark_done(crate::models::ExecutionOutput::default());
        let id = t.task_id;
        cache.put(t).await;

        assert!(cache.poll(id).await.is_some());
        assert!(cache.poll(id).await.is_none());
    }

    #[tokio::test]
    async fn poll_does_not_consume_processing_tasks() {
        let cache = ResultCache::new(4, 1);
        let mut t = task();
        t.mark_processing(0);
        let id = t.task_id;
        cache.put(t).await;

        assert!(cache.poll(id).await.is_some());
        assert!(cache.poll(id).await.is_some());
    }

    #[tokio::test]
    async fn idle_flags_are_tracked_per_worker() {
        let cache = ResultCache::new(4, 2);
        assert_eq!(cache.idle_flags().await, vec![true, true]);
        cache.set_idle(1, false).await;
        assert_eq!(cache.idle_flags().await, vec![true, false]);
    }
}
