use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::SeasonId;

/// One write lock per season, so at most one registration or reversal is in
/// flight for a season while other seasons proceed independently
#[derive(Debug, Clone, Default)]
pub struct SeasonLocks {
    locks: Arc<Mutex<HashMap<SeasonId, Arc<Mutex<()>>>>>,
}

impl SeasonLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self, season_id: SeasonId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(season_id).or_default())
    }
}

/// Locks a season handle; the guarded value is `()`, so a poisoned lock is
/// still safe to reuse
pub fn acquire(handle: &Mutex<()>) -> MutexGuard<'_, ()> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
