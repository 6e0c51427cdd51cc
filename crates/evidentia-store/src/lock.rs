//! In-process exclusive locking per case, guarding manifest
//! read-modify-write spans (`associate`) so two concurrent callers cannot
//! race a read-then-write of `manifest.json` (spec §4.1 "Operations").

use crate::error::{StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct CaseLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CaseLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, case_id: &str) -> StoreResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| StoreError::Lock("case lock registry".to_string()))?;
        Ok(locks
            .entry(case_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    /// Runs `f` with exclusive access to `case_id`'s manifest span.
    pub fn with_case_lock<T>(
        &self,
        case_id: &str,
        f: impl FnOnce() -> StoreResult<T>,
    ) -> StoreResult<T> {
        let lock = self.lock_for(case_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::Lock(case_id.to_string()))?;
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn concurrent_calls_for_same_case_are_serialized() {
        let locks = Arc::new(CaseLocks::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let counter = counter.clone();
            handles.push(thread::spawn(move || {
                locks
                    .with_case_lock("case-1", || {
                        let before = counter.fetch_add(1, Ordering::SeqCst);
                        assert_eq!(before, 0, "overlapping access to the same case lock");
                        counter.fetch_sub(1, Ordering::SeqCst);
                        Ok(())
                    })
                    .unwrap();
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn different_cases_use_different_locks() {
        let locks = CaseLocks::new();
        locks.with_case_lock("case-a", || Ok(())).unwrap();
        locks.with_case_lock("case-b", || Ok(())).unwrap();
    }
}
