use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Process-local set of transaction ids that currently have a completion worker.
///
/// Membership is only changed through [`try_acquire`](Self::try_acquire) and
/// [`release`](Self::release); check-and-insert happens under one lock.
#[derive(Debug, Default)]
pub struct DedupRegistry {
    in_flight: Mutex<HashSet<String>>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashSet<String>> {
        // A panic while holding the lock cannot leave the set half-updated.
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `id` if absent. Returns `false` when it was already registered.
    pub fn try_acquire(&self, id: &str) -> bool {
        let mut entries = self.entries();
        if entries.contains(id) {
            return false;
        }
        entries.insert(id.to_string())
    }

    /// Removes `id`. Returns whether it was registered.
    pub fn release(&self, id: &str) -> bool {
        self.entries().remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries().contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Ownership of one registry entry; dropping it releases the id.
#[derive(Debug)]
pub struct RegistryLease {
    registry: Arc<DedupRegistry>,
    transaction_id: String,
}

impl RegistryLease {
    pub fn acquire(registry: &Arc<DedupRegistry>, transaction_id: &str) -> Option<Self> {
        if !registry.try_acquire(transaction_id) {
            return None;
        }
        Some(Self {
            registry: Arc::clone(registry),
            transaction_id: transaction_id.to_string(),
        })
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }
}

impl Drop for RegistryLease {
    fn drop(&mut self) {
        self.registry.release(&self.transaction_id);
        tracing::debug!(
            transaction_id = %self.transaction_id,
            "Released dedup registry entry"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_acquire_is_exclusive() {
        let registry = DedupRegistry::new();
        assert!(registry.try_acquire("t1"));
        assert!(!registry.try_acquire("t1"));
        assert!(registry.try_acquire("t2"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_release_allows_reacquire() {
        let registry = DedupRegistry::new();
        assert!(registry.try_acquire("t1"));
        assert!(registry.release("t1"));
        assert!(!registry.release("t1"));
        assert!(registry.try_acquire("t1"));
    }

    #[test]
    fn test_lease_releases_on_drop() {
        let registry = Arc::new(DedupRegistry::new());
        let lease = RegistryLease::acquire(&registry, "t1").unwrap();
        assert_eq!(lease.transaction_id(), "t1");
        assert!(RegistryLease::acquire(&registry, "t1").is_none());

        drop(lease);
        assert!(!registry.contains("t1"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_acquire_has_single_winner() {
        let registry = Arc::new(DedupRegistry::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.try_acquire("same-id"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
