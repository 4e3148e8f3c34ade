//! Marker id -> time-ordered samples.

use std::collections::BTreeMap;

use marker_trajectory_core::{MarkerId, TrajectorySample};
use serde::{Deserialize, Serialize};

/// Point-in-time copy of every accumulated trajectory, keyed by marker id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySnapshot {
    pub trajectories: BTreeMap<MarkerId, Vec<TrajectorySample>>,
}

impl TrajectorySnapshot {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Number of markers with at least one sample.
    #[inline]
    pub fn marker_count(&self) -> usize {
        self.trajectories.len()
    }

    /// Total samples across all markers.
    pub fn sample_count(&self) -> usize {
        self.trajectories.values().map(Vec::len).sum()
    }

    pub fn trajectory(&self, id: MarkerId) -> Option<&[TrajectorySample]> {
        self.trajectories.get(&id).map(Vec::as_slice)
    }

    /// Earliest and latest sample timestamps, if any sample exists.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        self.trajectories
            .values()
            .flatten()
            .map(|s| s.timestamp)
            .fold(None, |acc, t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
    }
}

/// Owned store of per-marker trajectories.
///
/// A key exists only once a sample has been appended for it since the last
/// [`TrajectoryStore::clear`]. Samples keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryStore {
    trajectories: BTreeMap<MarkerId, Vec<TrajectorySample>>,
}

impl TrajectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `sample` to the end of `id`'s trajectory, creating it on first use.
    pub fn append(&mut self, id: MarkerId, sample: TrajectorySample) {
        self.trajectories.entry(id).or_default().push(sample);
    }

    /// Drop every trajectory.
    pub fn clear(&mut self) {
        self.trajectories = BTreeMap::new();
    }

    /// Copy the current contents.
    pub fn snapshot(&self) -> TrajectorySnapshot {
        TrajectorySnapshot {
            trajectories: self.trajectories.clone(),
        }
    }

    /// Move the current contents out, leaving the store empty.
    pub fn take(&mut self) -> TrajectorySnapshot {
        TrajectorySnapshot {
            trajectories: std::mem::take(&mut self.trajectories),
        }
    }

    pub fn trajectory(&self, id: MarkerId) -> Option<&[TrajectorySample]> {
        self.trajectories.get(&id).map(Vec::as_slice)
    }

    pub fn ids(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.trajectories.keys().copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Number of markers with at least one sample.
    #[inline]
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn sample_count(&self) -> usize {
        self.trajectories.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64, x: f32) -> TrajectorySample {
        TrajectorySample {
            timestamp: t,
            x,
            y: 0.0,
            z: 1.0,
        }
    }

    #[test]
    fn append_creates_entry_on_first_use() {
        let mut store = TrajectoryStore::new();
        assert!(store.is_empty());
        store.append(5, sample(0.0, 0.1));
        assert_eq!(store.len(), 1);
        assert_eq!(store.trajectory(5).map(<[_]>::len), Some(1));
        assert!(store.trajectory(6).is_none());
    }

    #[test]
    fn append_keeps_insertion_order_and_duplicates() {
        let mut store = TrajectoryStore::new();
        store.append(1, sample(0.0, 0.1));
        store.append(1, sample(0.5, 0.2));
        store.append(1, sample(0.5, 0.2));
        let xs: Vec<f32> = store
            .trajectory(1)
            .expect("trajectory")
            .iter()
            .map(|s| s.x)
            .collect();
        assert_eq!(xs, vec![0.1, 0.2, 0.2]);
    }

    #[test]
    fn clear_empties_everything() {
        let mut store = TrajectoryStore::new();
        store.append(1, sample(0.0, 0.1));
        store.append(2, sample(0.0, 0.2));
        store.clear();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.sample_count(), 0);

        store.append(2, sample(1.0, 0.3));
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![2]);
        assert_eq!(store.sample_count(), 1);
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let mut store = TrajectoryStore::new();
        store.append(1, sample(0.0, 0.1));
        let snap = store.snapshot();
        store.append(1, sample(1.0, 0.2));
        store.append(9, sample(1.0, 0.3));
        assert_eq!(snap.sample_count(), 1);
        assert_eq!(snap.marker_count(), 1);
        assert_eq!(store.sample_count(), 3);
    }

    #[test]
    fn take_leaves_store_empty() {
        let mut store = TrajectoryStore::new();
        store.append(3, sample(0.0, 0.1));
        store.append(4, sample(0.1, 0.2));
        let snap = store.take();
        assert_eq!(snap.marker_count(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn snapshot_time_span() {
        let mut store = TrajectoryStore::new();
        assert_eq!(store.snapshot().time_span(), None);
        store.append(3, sample(2.0, 0.1));
        store.append(1, sample(1.0, 0.2));
        store.append(3, sample(4.5, 0.2));
        assert_eq!(store.snapshot().time_span(), Some((1.0, 4.5)));
    }
}
