//! Schedule (result) model.
//!
//! A schedule is what every engine operation hands back to the host: the
//! allocation store, the conflicts detected on it, and the work orders that
//! could not be placed at all.

use serde::{Deserialize, Serialize};

use super::{Allocation, AllocationStore, Conflict, ConflictKind};

/// Result of a scheduling operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Allocations (work order → track × time).
    pub allocations: AllocationStore,
    /// Conflicts detected on `allocations`.
    pub conflicts: Vec<Conflict>,
    /// Work orders without an allocation.
    pub unassigned: Vec<UnassignedWorkOrder>,
}

/// A work order the engine could not place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedWorkOrder {
    /// The work order.
    pub work_order_id: String,
    /// Why no track qualified.
    pub reason: Infeasibility,
}

/// Why a work order has no qualifying track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Infeasibility {
    /// The facility has no tracks.
    NoTracks,
    /// Vehicle longer than every track.
    TooLong { longest_track_m: f64 },
    /// No long-enough track has usable overhead line.
    NoElectrifiedTrack,
}

impl UnassignedWorkOrder {
    /// Creates an unassigned record.
    pub fn new(work_order_id: impl Into<String>, reason: Infeasibility) -> Self {
        Self {
            work_order_id: work_order_id.into(),
            reason,
        }
    }
}

impl Schedule {
    /// Creates a schedule and annotates each allocation's `conflict_ids`.
    pub fn new(
        mut allocations: AllocationStore,
        conflicts: Vec<Conflict>,
        unassigned: Vec<UnassignedWorkOrder>,
    ) -> Self {
        for a in allocations.iter_mut() {
            a.conflict_ids = conflicts
                .iter()
                .filter(|c| c.involves(&a.id))
                .map(|c| c.id.clone())
                .collect();
        }
        Self {
            allocations,
            conflicts,
            unassigned,
        }
    }

    /// Creates an empty schedule.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the schedule has no conflicts.
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Whether every work order received an allocation.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// Makespan: latest end time across all allocations (ms).
    pub fn makespan_ms(&self) -> Option<i64> {
        self.allocations.iter().map(|a| a.end_ms).max()
    }

    /// Finds the allocation for a given work order.
    pub fn allocation_for_work_order(&self, work_order_id: &str) -> Option<&Allocation> {
        self.allocations.for_work_order(work_order_id)
    }

    /// Returns all allocations on a track, sorted by start time.
    pub fn allocations_for_track(&self, track_id: &str) -> Vec<&Allocation> {
        let mut on_track = self.allocations.on_track(track_id);
        on_track.sort_by_key(|a| a.start_ms);
        on_track
    }

    /// Returns the conflicts of one kind.
    pub fn conflicts_of_kind(&self, kind: ConflictKind) -> Vec<&Conflict> {
        self.conflicts.iter().filter(|c| c.kind() == kind).collect()
    }

    /// Returns the conflicts implicating an allocation.
    pub fn conflicts_for_allocation(&self, allocation_id: &str) -> Vec<&Conflict> {
        self.conflicts
            .iter()
            .filter(|c| c.involves(allocation_id))
            .collect()
    }

    /// Whether the given work order was left unassigned.
    pub fn is_unassigned(&self, work_order_id: &str) -> bool {
        self.unassigned
            .iter()
            .any(|u| u.work_order_id == work_order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaintenanceStage, WorkOrder};

    fn sample_store() -> AllocationStore {
        let w1 = WorkOrder::new("W1", "V1", MaintenanceStage::Cleaning).with_duration_ms(5000);
        let w2 = WorkOrder::new("W2", "V2", MaintenanceStage::Cleaning).with_duration_ms(3000);
        let w3 = WorkOrder::new("W3", "V3", MaintenanceStage::Cleaning).with_duration_ms(3000);
        vec![
            Allocation::for_work_order(&w1, "T1", 5000).unwrap(),
            Allocation::for_work_order(&w2, "T2", 1000).unwrap(),
            Allocation::for_work_order(&w3, "T1", 0).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_schedule_annotates_conflicts() {
        let conflicts = vec![
            Conflict::overlap("slot-W1", "slot-W3", "T1", "overlap"),
            Conflict::length_exceeded("slot-W1", "T1", "too long"),
        ];
        let s = Schedule::new(sample_store(), conflicts, Vec::new());

        let w1 = s.allocation_for_work_order("W1").unwrap();
        assert_eq!(w1.conflict_ids.len(), 2);
        let w2 = s.allocation_for_work_order("W2").unwrap();
        assert!(!w2.has_conflicts());
        let w3 = s.allocation_for_work_order("W3").unwrap();
        assert_eq!(w3.conflict_ids.len(), 1);

        assert!(!s.is_conflict_free());
        assert_eq!(s.conflicts_of_kind(ConflictKind::Overlap).len(), 1);
        assert_eq!(s.conflicts_for_allocation("slot-W1").len(), 2);
    }

    #[test]
    fn test_schedule_queries() {
        let s = Schedule::new(
            sample_store(),
            Vec::new(),
            vec![UnassignedWorkOrder::new("W9", Infeasibility::NoTracks)],
        );
        assert_eq!(s.makespan_ms(), Some(10_000));
        assert!(s.is_conflict_free());
        assert!(!s.is_complete());
        assert!(s.is_unassigned("W9"));
        assert!(!s.is_unassigned("W1"));

        // Sorted by start time
        let t1: Vec<&str> = s
            .allocations_for_track("T1")
            .iter()
            .map(|a| a.work_order_id.as_str())
            .collect();
        assert_eq!(t1, vec!["W3", "W1"]);
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::empty();
        assert_eq!(s.makespan_ms(), None);
        assert!(s.is_conflict_free());
        assert!(s.is_complete());
    }
}
