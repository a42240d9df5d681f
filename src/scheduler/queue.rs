//! Bounded intake queue: non-blocking submit, blocking (async) take.

use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Submission;

/// One queued item: the task identifier assigned at submit time and the
/// submission itself.
pub type QueueItem = (Uuid, Submission);

/// Bounded multi-producer multi-consumer FIFO of capacity `Q`. `submit` is
/// non-blocking: on full, it fails with `AppError::QueueFull`. `take` is
/// the only operation that suspends, and does so indefinitely.
pub struct TaskQueue {
    sender: mpsc::Sender<QueueItem>,
    receiver: Mutex<mpsc::Receiver<QueueItem>>,
    capacity: usize,
}

impl TaskQueue {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender,
            receiver: Mutex::new(receiver),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of items waiting to be taken.
    pub fn len(&self) -> usize {
        self.capacity - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-blocking submit. Fails immediately with `QueueFull` rather than
    /// waiting for room.
    pub fn submit(&self, item: QueueItem) -> Result<(), AppError> {
        self.sender.try_send(item).map_err(|_| AppError::QueueFull)
    }

    /// Suspend until an item is available. Multiple workers share the same
    /// receiver end, serialized through the mutex; each item is delivered
    /// to exactly one caller.
    pub async fn take(&self) -> Option<QueueItem> {
        self.receiver.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> Submission {
        Submission {
            language: "python".to_string(),
            code: "print(1)".to_string(),
            stdin: None,
            libraries: vec![],
            timeout_s: 30,
            run_profiling: false,
        }
    }

    #[test]
    fn submit_fails_once_capacity_is_reached() {
        let queue = TaskQueue::new(1);
        assert!(queue.submit((Uuid::new_v4(), submission())).is_ok());
        let second = queue.submit((Uuid::new_v4(), submission()));
        assert!(matches!(second, Err(AppError::QueueFull)));
    }

    #[tokio::test]
    async fn take_returns_items_in_submission_order_for_one_producer() {
        let queue = TaskQueue::new(4);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        queue.submit((first, submission())).unwrap();
        queue.submit((second, submission())).unwrap();

        assert_eq!(queue.take().await.unwrap().0, first);
        assert_eq!(queue.take().await.unwrap().0, second);
    }
}
