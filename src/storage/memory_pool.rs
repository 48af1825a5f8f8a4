use crate::core::TransactionRecord;

/// Ordered pool of admitted, unconfirmed records.
///
/// The pool has no lock of its own: it lives inside the ledger state and is
/// only touched while the ledger's write lock is held.
#[derive(Debug, Clone, Default)]
pub struct MemoryPool {
    inner: Vec<TransactionRecord>,
}

impl MemoryPool {
    pub fn new() -> MemoryPool {
        MemoryPool { inner: vec![] }
    }

    pub fn add(&mut self, tx: TransactionRecord) {
        self.inner.push(tx);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Copy of every pending record in admission order
    pub fn get_all(&self) -> Vec<TransactionRecord> {
        self.inner.clone()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_admission_order() {
        let mut pool = MemoryPool::new();
        pool.add(TransactionRecord::new("a", "b", 1.0));
        pool.add(TransactionRecord::new("c", "d", 2.0));

        let all = pool.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].get_sender(), "a");
        assert_eq!(all[1].get_sender(), "c");
    }

    #[test]
    fn test_clear_empties_the_pool() {
        let mut pool = MemoryPool::new();
        pool.add(TransactionRecord::new("a", "b", 1.0));
        assert!(!pool.is_empty());
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
    }
}
