//! In-memory ledger store.

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::{LedgerStore, Tables};

/// In-memory store backed by a copy-on-write snapshot.
///
/// A transaction works on a private copy of the committed tables and swaps
/// it in on success. Readers only ever see committed snapshots.
///
/// Every transaction clones all tables, so a write costs O(size of the
/// ledger) and loading N journals one by one costs O(N²). Bulk imports
/// should go through a persistent [`LedgerStore`] instead.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Last committed state
    committed: RwLock<Tables>,
    /// Serializes writers
    writer: Mutex<()>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        let tables = self.committed.read();
        f(&tables)
    }

    fn transaction<T, E>(&self, f: impl FnOnce(&mut Tables) -> Result<T, E>) -> Result<T, E> {
        let _writer = self.writer.lock();
        let mut working = self.committed.read().clone();

        match f(&mut working) {
            Ok(value) => {
                *self.committed.write() = working;
                debug!("Transaction committed");
                Ok(value)
            }
            Err(err) => {
                debug!("Transaction rolled back");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_center::CostCenter;
    use kontor_common::CostCenterId;

    fn cost_center(tables: &mut Tables, number: &str) -> CostCenter {
        CostCenter {
            id: CostCenterId::new(tables.next_key()),
            number: number.to_string(),
            name: format!("Center {number}"),
            note: None,
        }
    }

    #[test]
    fn test_commit_on_ok() {
        let store = MemoryStore::new();
        let id = store
            .transaction(|tables| {
                let cc = cost_center(tables, "FZ1");
                let id = cc.id;
                tables.put_cost_center(cc);
                Ok::<_, ()>(id)
            })
            .unwrap();

        assert!(store.read(|tables| tables.cost_center(id).is_some()));
    }

    #[test]
    fn test_rollback_on_err() {
        let store = MemoryStore::new();
        let result = store.transaction(|tables| {
            let cc = cost_center(tables, "FZ1");
            tables.put_cost_center(cc);
            Err::<(), _>("boom")
        });

        assert_eq!(result, Err("boom"));
        assert!(store.read(|tables| tables.cost_center_by_number("FZ1").is_none()));

        // Rolled-back keys are not burnt
        let key = store.transaction(|tables| Ok::<_, ()>(tables.next_key())).unwrap();
        assert_eq!(key, 1);
    }
}
