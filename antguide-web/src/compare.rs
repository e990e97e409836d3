//! Per-user species compare tray
//!
//! Small in-memory set of species ids per user. Deliberately not persisted;
//! a tray is scratch state for one browsing session.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct CompareTray {
    inner: Arc<Mutex<HashMap<i64, BTreeSet<i64>>>>,
}

impl CompareTray {
    /// Add a species to a user's tray. Returns false when already present.
    pub fn add(&self, user_id: i64, species_id: i64) -> bool {
        let mut trays = self.inner.lock().expect("compare tray lock poisoned");
        trays.entry(user_id).or_default().insert(species_id)
    }

    pub fn contains(&self, user_id: i64, species_id: i64) -> bool {
        let trays = self.inner.lock().expect("compare tray lock poisoned");
        trays
            .get(&user_id)
            .map(|tray| tray.contains(&species_id))
            .unwrap_or(false)
    }

    /// Species ids in a user's tray, ascending
    pub fn list(&self, user_id: i64) -> Vec<i64> {
        let trays = self.inner.lock().expect("compare tray lock poisoned");
        trays
            .get(&user_id)
            .map(|tray| tray.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self, user_id: i64) {
        let mut trays = self.inner.lock().expect("compare tray lock poisoned");
        trays.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_per_species() {
        let tray = CompareTray::default();
        assert!(tray.add(1, 10));
        assert!(!tray.add(1, 10));
        assert_eq!(tray.list(1), vec![10]);
    }

    #[test]
    fn trays_are_per_user() {
        let tray = CompareTray::default();
        tray.add(1, 10);
        tray.add(2, 20);
        assert!(tray.contains(1, 10));
        assert!(!tray.contains(2, 10));
        tray.clear(1);
        assert_eq!(tray.list(1), Vec::<i64>::new());
        assert_eq!(tray.list(2), vec![20]);
    }
}
