//! Per-id turn-taking for client operations.
//!
//! Operations on the same id run one after another in arrival order;
//! operations on different ids never wait for each other. Slots are dropped
//! once nobody holds or waits for them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::record::FileId;

#[derive(Debug, Default)]
pub(crate) struct IdQueues {
    slots: Mutex<HashMap<FileId, Arc<AsyncMutex<()>>>>,
}

/// Held for the duration of one operation on one id.
pub(crate) struct IdTurn<'a> {
    queues: &'a IdQueues,
    id: FileId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl IdQueues {
    /// Wait until every earlier operation on `id` has finished.
    pub(crate) async fn acquire(&self, id: &FileId) -> IdTurn<'_> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(id.clone()).or_default())
        };
        let guard = slot.lock_owned().await;
        IdTurn {
            queues: self,
            id: id.clone(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for IdTurn<'_> {
    fn drop(&mut self) {
        // Release first so the strong count below only sees waiters.
        drop(self.guard.take());
        let mut slots = self
            .queues
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get(&self.id)
            && Arc::strong_count(slot) == 1
        {
            slots.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_id_runs_in_order() {
        let queues = IdQueues::default();
        let log = Mutex::new(Vec::new());
        let id = FileId::Int(1);

        let first = async {
            let _turn = queues.acquire(&id).await;
            log.lock().unwrap().push("first start");
            tokio::time::sleep(Duration::from_millis(20)).await;
            log.lock().unwrap().push("first end");
        };
        let second = async {
            tokio::task::yield_now().await;
            let _turn = queues.acquire(&id).await;
            log.lock().unwrap().push("second");
        };
        tokio::join!(first, second);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first start", "first end", "second"]
        );
        assert_eq!(queues.slot_count(), 0);
    }

    #[tokio::test]
    async fn different_ids_do_not_wait() {
        let queues = IdQueues::default();
        let a = queues.acquire(&FileId::Int(1)).await;
        let b = tokio::time::timeout(
            Duration::from_millis(100),
            queues.acquire(&FileId::Int(2)),
        )
        .await;
        assert!(b.is_ok());
        assert_eq!(queues.slot_count(), 2);
        drop(a);
        drop(b);
        assert_eq!(queues.slot_count(), 0);
    }
}
