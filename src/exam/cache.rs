// src/exam/cache.rs

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::exam_result::ScoreResult;

/// Cache key: (enrollment id, lesson id).
type Key = (i64, i64);

#[derive(Debug, Clone)]
struct Entry {
    /// Number of persisted submissions the result was computed from.
    version: u64,
    result: ScoreResult,
}

/// Computed results, keyed by learner and exam.
///
/// An entry is only served when its version equals the current persisted
/// submission count, and recording a submission drops the entry outright.
/// A disabled cache stores nothing.
#[derive(Debug, Clone)]
pub struct ResultCache {
    enabled: bool,
    entries: Arc<RwLock<HashMap<Key, Entry>>>,
}

impl ResultCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Arc::default(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Key, Entry>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Key, Entry>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, enrollment_id: i64, lesson_id: i64, version: u64) -> Option<ScoreResult> {
        if !self.enabled {
            return None;
        }
        self.read()
            .get(&(enrollment_id, lesson_id))
            .filter(|entry| entry.version == version)
            .map(|entry| entry.result.clone())
    }

    pub fn put(&self, enrollment_id: i64, lesson_id: i64, version: u64, result: ScoreResult) {
        if !self.enabled {
            return;
        }
        self.write()
            .insert((enrollment_id, lesson_id), Entry { version, result });
    }

    pub fn invalidate(&self, enrollment_id: i64, lesson_id: i64) {
        self.write().remove(&(enrollment_id, lesson_id));
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(earned: i64) -> ScoreResult {
        ScoreResult {
            earned_score: earned,
            max_score: 4,
            percentage: earned as f64 * 25.0,
            passed: earned >= 3,
            breakdown: Vec::new(),
        }
    }

    #[test]
    fn test_hit_requires_matching_version() {
        let cache = ResultCache::new(true);
        cache.put(1, 2, 3, result(1));

        assert_eq!(cache.get(1, 2, 3), Some(result(1)));
        assert_eq!(cache.get(1, 2, 4), None);
        assert_eq!(cache.get(9, 2, 3), None);
    }

    #[test]
    fn test_invalidate_drops_entry() {
        let cache = ResultCache::new(true);
        cache.put(1, 2, 3, result(1));
        cache.invalidate(1, 2);
        assert_eq!(cache.get(1, 2, 3), None);
    }

    #[test]
    fn test_survives_poisoned_lock() {
        let cache = ResultCache::new(true);
        cache.put(1, 2, 3, result(1));

        let shared = cache.clone();
        let panicked = std::thread::spawn(move || {
            let _guard = shared.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(panicked.is_err());
        assert!(cache.entries.is_poisoned());

        assert_eq!(cache.get(1, 2, 3), Some(result(1)));
        cache.invalidate(1, 2);
        assert_eq!(cache.get(1, 2, 3), None);
        cache.put(1, 2, 4, result(3));
        assert_eq!(cache.get(1, 2, 4), Some(result(3)));
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let cache = ResultCache::new(false);
        cache.put(1, 2, 3, result(4));
        assert_eq!(cache.get(1, 2, 3), None);
    }
}
