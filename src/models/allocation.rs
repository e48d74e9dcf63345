//! Allocation (slot) model and store.
//!
//! An allocation places exactly one work order on one track for one time
//! window. It carries a snapshot of the work order's demand (vehicle length,
//! electrification need) so the conflict detector only needs allocations and
//! tracks.
//!
//! The store is the only mutable entity of a scheduling session, and it is
//! never mutated in place: [`AllocationStore::with_moved`] returns a new
//! store and leaves the original untouched.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{ConflictId, TimeWindow, WorkOrder};
use crate::error::{EngineError, EngineResult};

/// A work order placed on a track for a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocation identifier, derived from the work order ID.
    pub id: String,
    /// Allocated work order.
    pub work_order_id: String,
    /// Vehicle of the work order (denormalized for display).
    pub vehicle_id: String,
    /// Track currently holding the work order.
    pub track_id: String,
    /// Start time (ms).
    pub start_ms: i64,
    /// End time (ms, exclusive).
    pub end_ms: i64,
    /// Vehicle length the track must accommodate (m).
    pub vehicle_length_m: f64,
    /// Whether the work needs usable overhead line.
    pub requires_electrification: bool,
    /// Conflicts currently implicating this allocation. Derived.
    pub conflict_ids: Vec<ConflictId>,
}

impl Allocation {
    /// Creates an allocation for a work order.
    ///
    /// The window is `[start_ms, start_ms + order.duration_ms)`.
    ///
    /// # Errors
    /// [`EngineError::TimeOverflow`] if the window end does not fit in an `i64`.
    pub fn for_work_order(
        order: &WorkOrder,
        track_id: impl Into<String>,
        start_ms: i64,
    ) -> EngineResult<Self> {
        let id = Self::slot_id(&order.id);
        let window = checked_window(&id, start_ms, order.duration_ms)?;
        Ok(Self {
            id,
            work_order_id: order.id.clone(),
            vehicle_id: order.vehicle_id.clone(),
            track_id: track_id.into(),
            start_ms: window.start_ms,
            end_ms: window.end_ms,
            vehicle_length_m: order.vehicle_length_m,
            requires_electrification: order.requires_electrification,
            conflict_ids: Vec::new(),
        })
    }

    /// Allocation ID for a work order.
    ///
    /// Stable across re-seeding and auto-resolution.
    pub fn slot_id(work_order_id: &str) -> String {
        format!("slot-{work_order_id}")
    }

    /// Occupied window.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_ms, self.end_ms)
    }

    /// Duration (end - start) in ms.
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Whether any conflict implicates this allocation.
    pub fn has_conflicts(&self) -> bool {
        !self.conflict_ids.is_empty()
    }
}

fn checked_window(
    allocation_id: &str,
    start_ms: i64,
    duration_ms: i64,
) -> EngineResult<TimeWindow> {
    TimeWindow::starting_at(start_ms, duration_ms).ok_or_else(|| EngineError::TimeOverflow {
        allocation_id: allocation_id.to_string(),
        start_ms,
    })
}

/// Ordered list of allocations, at most one per work order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationStore {
    allocations: Vec<Allocation>,
}

impl AllocationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from externally supplied allocations.
    ///
    /// Rejects repeated allocation IDs, a second allocation for the same
    /// work order, and windows with `end <= start`. Track references are
    /// not checked; the conflict detector reports dangling ones.
    pub fn from_allocations(allocations: Vec<Allocation>) -> EngineResult<Self> {
        let mut ids = HashSet::new();
        let mut orders = HashSet::new();
        for a in &allocations {
            if !ids.insert(a.id.as_str()) {
                return Err(EngineError::DuplicateAllocationId(a.id.clone()));
            }
            if !orders.insert(a.work_order_id.as_str()) {
                return Err(EngineError::DuplicateAllocation(a.work_order_id.clone()));
            }
            if a.duration_ms() <= 0 {
                return Err(EngineError::NonPositiveDuration {
                    allocation_id: a.id.clone(),
                    duration_ms: a.duration_ms(),
                });
            }
        }
        Ok(Self { allocations })
    }

    /// Appends an allocation produced by the engine itself.
    pub(crate) fn push(&mut self, allocation: Allocation) {
        debug_assert!(self.for_work_order(&allocation.work_order_id).is_none());
        self.allocations.push(allocation);
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Allocation> {
        self.allocations.iter_mut()
    }

    /// Allocations in store order.
    pub fn as_slice(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Iterates allocations in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Allocation> {
        self.allocations.iter()
    }

    /// Number of allocations.
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Finds an allocation by ID.
    pub fn get(&self, allocation_id: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.id == allocation_id)
    }

    /// Finds the allocation of a work order.
    pub fn for_work_order(&self, work_order_id: &str) -> Option<&Allocation> {
        self.allocations
            .iter()
            .find(|a| a.work_order_id == work_order_id)
    }

    /// Returns all allocations on a track, in store order.
    pub fn on_track(&self, track_id: &str) -> Vec<&Allocation> {
        self.allocations
            .iter()
            .filter(|a| a.track_id == track_id)
            .collect()
    }

    /// Returns a new store with one allocation moved.
    ///
    /// The allocation keeps its duration; `end` is recomputed from the new
    /// start. Derived conflict IDs are cleared on the moved allocation.
    /// `self` is left untouched.
    ///
    /// # Errors
    /// - [`EngineError::UnknownAllocation`] if no allocation has `allocation_id`
    /// - [`EngineError::NonPositiveDuration`] if the allocation's window is empty
    /// - [`EngineError::TimeOverflow`] if the moved window ends past `i64::MAX`
    pub fn with_moved(
        &self,
        allocation_id: &str,
        track_id: &str,
        start_ms: i64,
    ) -> EngineResult<Self> {
        let idx = self
            .allocations
            .iter()
            .position(|a| a.id == allocation_id)
            .ok_or_else(|| EngineError::UnknownAllocation(allocation_id.to_string()))?;

        let duration_ms = self.allocations[idx].duration_ms();
        if duration_ms <= 0 {
            return Err(EngineError::NonPositiveDuration {
                allocation_id: allocation_id.to_string(),
                duration_ms,
            });
        }

        let window = checked_window(allocation_id, start_ms, duration_ms)?;

        let mut next = self.clone();
        let moved = &mut next.allocations[idx];
        moved.track_id = track_id.to_string();
        moved.start_ms = window.start_ms;
        moved.end_ms = window.end_ms;
        moved.conflict_ids.clear();
        Ok(next)
    }
}

impl FromIterator<Allocation> for AllocationStore {
    /// Collects without validation. Use [`AllocationStore::from_allocations`]
    /// for untrusted input.
    fn from_iter<I: IntoIterator<Item = Allocation>>(iter: I) -> Self {
        Self {
            allocations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AllocationStore {
    type Item = &'a Allocation;
    type IntoIter = std::slice::Iter<'a, Allocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.allocations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaintenanceStage, HOUR_MS};

    fn order(id: &str, hours: f64) -> WorkOrder {
        WorkOrder::new(id, format!("V-{id}"), MaintenanceStage::Cleaning).with_duration_hours(hours)
    }

    #[test]
    fn test_allocation_for_work_order() {
        let wo = order("W1", 2.0).with_vehicle_length(120.0);
        let a = Allocation::for_work_order(&wo, "T1", 1000).unwrap();

        assert_eq!(a.id, "slot-W1");
        assert_eq!(a.work_order_id, "W1");
        assert_eq!(a.vehicle_id, "V-W1");
        assert_eq!(a.start_ms, 1000);
        assert_eq!(a.end_ms, 1000 + 2 * HOUR_MS);
        assert_eq!(a.duration_ms(), 2 * HOUR_MS);
        assert!(!a.requires_electrification);
        assert!(!a.has_conflicts());
    }

    #[test]
    fn test_from_allocations_rejects_duplicates() {
        let wo = order("W1", 1.0);
        let a = Allocation::for_work_order(&wo, "T1", 0).unwrap();
        let mut b = Allocation::for_work_order(&wo, "T2", 0).unwrap();
        b.id = "other".into();

        let err = AllocationStore::from_allocations(vec![a, b]).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateAllocation(id) if id == "W1"));
    }

    #[test]
    fn test_from_allocations_rejects_repeated_id() {
        let a = Allocation::for_work_order(&order("W1", 1.0), "T1", 0).unwrap();
        let mut b = Allocation::for_work_order(&order("W2", 1.0), "T2", 0).unwrap();
        b.id = a.id.clone();

        let err = AllocationStore::from_allocations(vec![a, b]).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateAllocationId(id) if id == "slot-W1"));
    }

    #[test]
    fn test_for_work_order_overflow() {
        let wo = order("W1", 2.0);
        let err = Allocation::for_work_order(&wo, "T1", i64::MAX - HOUR_MS).unwrap_err();
        assert!(matches!(err, EngineError::TimeOverflow { allocation_id, .. } if allocation_id == "slot-W1"));

        // Largest duration hours_to_ms can produce still fits from zero
        let huge = order("W2", 1e15);
        assert_eq!(
            Allocation::for_work_order(&huge, "T1", 0).unwrap().end_ms,
            i64::MAX
        );
    }

    #[test]
    fn test_from_allocations_rejects_empty_window() {
        let mut a = Allocation::for_work_order(&order("W1", 1.0), "T1", 0).unwrap();
        a.end_ms = a.start_ms;
        let err = AllocationStore::from_allocations(vec![a]).unwrap_err();
        assert!(matches!(err, EngineError::NonPositiveDuration { .. }));
    }

    #[test]
    fn test_with_moved_is_copy_on_write() {
        let store = AllocationStore::from_allocations(vec![
            Allocation::for_work_order(&order("W1", 2.0), "T1", 0).unwrap(),
            Allocation::for_work_order(&order("W2", 1.0), "T1", 0).unwrap(),
        ])
        .unwrap();

        let moved = store.with_moved("slot-W2", "T2", 5 * HOUR_MS).unwrap();

        // Original unchanged
        let before = store.get("slot-W2").unwrap();
        assert_eq!(before.track_id, "T1");
        assert_eq!(before.start_ms, 0);

        let after = moved.get("slot-W2").unwrap();
        assert_eq!(after.track_id, "T2");
        assert_eq!(after.start_ms, 5 * HOUR_MS);
        assert_eq!(after.end_ms, 6 * HOUR_MS);
        assert_eq!(moved.len(), 2);
    }

    #[test]
    fn test_with_moved_overflow_leaves_store_untouched() {
        let store: AllocationStore = vec![Allocation::for_work_order(&order("W1", 1.0), "T1", 0).unwrap()]
            .into_iter()
            .collect();

        let err = store.with_moved("slot-W1", "T1", i64::MAX - 1).unwrap_err();
        assert!(matches!(err, EngineError::TimeOverflow { start_ms, .. } if start_ms == i64::MAX - 1));
        assert_eq!(store.get("slot-W1").unwrap().start_ms, 0);
    }

    #[test]
    fn test_with_moved_rejects_empty_window() {
        // Collected without validation, so the empty window gets in
        let mut a = Allocation::for_work_order(&order("W1", 1.0), "T1", 0).unwrap();
        a.end_ms = a.start_ms;
        let store: AllocationStore = vec![a].into_iter().collect();

        let err = store.with_moved("slot-W1", "T2", HOUR_MS).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NonPositiveDuration { ref allocation_id, duration_ms: 0 } if allocation_id == "slot-W1"
        ));
    }

    #[test]
    fn test_with_moved_unknown_allocation() {
        let store = AllocationStore::new();
        let err = store.with_moved("slot-X", "T1", 0).unwrap_err();
        assert!(matches!(err, EngineError::UnknownAllocation(_)));
    }

    #[test]
    fn test_store_queries() {
        let store: AllocationStore = vec![
            Allocation::for_work_order(&order("W1", 1.0), "T1", 0).unwrap(),
            Allocation::for_work_order(&order("W2", 1.0), "T2", 0).unwrap(),
            Allocation::for_work_order(&order("W3", 1.0), "T1", HOUR_MS).unwrap(),
        ]
        .into_iter()
        .collect();

        assert_eq!(store.on_track("T1").len(), 2);
        assert_eq!(store.for_work_order("W2").map(|a| a.track_id.as_str()), Some("T2"));
        assert!(store.get("slot-W9").is_none());
        assert_eq!((&store).into_iter().count(), 3);
    }
}
