use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per cafe. Holding the guard serializes every write to that
/// cafe's rating set together with the summary recompute that follows it.
#[derive(Clone, Default)]
pub struct CafeLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl CafeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, cafe_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().await;
            // Entries only referenced by the map are idle.
            locks.retain(|id, lock| *id == cafe_id || Arc::strong_count(lock) > 1);
            locks.entry(cafe_id).or_default().clone()
        };

        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.inner.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_idle_entries_are_pruned() {
        let locks = CafeLocks::new();

        for _ in 0..5 {
            let _guard = locks.acquire(Uuid::new_v4()).await;
        }

        assert_eq!(locks.tracked().await, 1);
    }

    #[tokio::test]
    async fn test_held_entries_survive_pruning() {
        let locks = CafeLocks::new();
        let _held = locks.acquire(Uuid::new_v4()).await;

        drop(locks.acquire(Uuid::new_v4()).await);
        drop(locks.acquire(Uuid::new_v4()).await);

        assert_eq!(locks.tracked().await, 2);
    }
}
