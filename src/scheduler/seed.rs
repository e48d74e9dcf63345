//! Round-robin allocation seeding.
//!
//! # Algorithm
//!
//! Work order `i` (input order) goes to `tracks[i mod n]` and starts at
//! `reference + i * duration(i)`.
//!
//! This is a baseline, not a scheduler. It ignores length, electrification,
//! and occupancy, so typical inputs come out with visible conflicts. Removing
//! them is the job of the auto-resolver.
//!
//! # Complexity
//! O(n) in the number of work orders.

use tracing::debug;

use super::PlanOutcome;
use crate::error::{EngineError, EngineResult};
use crate::models::{Allocation, AllocationStore, Infeasibility, Track, UnassignedWorkOrder, WorkOrder};

/// Builds the initial allocation store.
///
/// With no tracks, the store is empty and every work order is reported as
/// unassigned with [`Infeasibility::NoTracks`].
///
/// # Errors
/// [`EngineError::TimeOverflow`] if a staggered window does not fit in an `i64`.
///
/// # Example
///
/// ```
/// use depot_schedule::models::{MaintenanceStage, Track, WorkOrder};
/// use depot_schedule::scheduler::seed_allocations;
///
/// let tracks = vec![Track::new("T1", "D1", 200.0), Track::new("T2", "D1", 200.0)];
/// let orders = vec![
///     WorkOrder::new("A", "V1", MaintenanceStage::Cleaning),
///     WorkOrder::new("B", "V2", MaintenanceStage::Cleaning),
///     WorkOrder::new("C", "V3", MaintenanceStage::Cleaning),
/// ];
///
/// let outcome = seed_allocations(&orders, &tracks, 0).unwrap();
/// let track_ids: Vec<&str> = outcome.allocations.iter().map(|a| a.track_id.as_str()).collect();
/// assert_eq!(track_ids, vec!["T1", "T2", "T1"]);
/// ```
pub fn seed_allocations(
    work_orders: &[WorkOrder],
    tracks: &[Track],
    reference_ms: i64,
) -> EngineResult<PlanOutcome> {
    if tracks.is_empty() {
        debug!(work_orders = work_orders.len(), "no tracks; seeding skipped");
        return Ok(PlanOutcome {
            allocations: AllocationStore::new(),
            unassigned: work_orders
                .iter()
                .map(|wo| UnassignedWorkOrder::new(&wo.id, Infeasibility::NoTracks))
                .collect(),
        });
    }

    let allocations = work_orders
        .iter()
        .enumerate()
        .map(|(i, wo)| {
            let track = &tracks[i % tracks.len()];
            let start_ms = staggered_start(reference_ms, i, wo)?;
            Allocation::for_work_order(wo, &track.id, start_ms)
        })
        .collect::<EngineResult<AllocationStore>>()?;

    debug!(
        allocations = allocations.len(),
        tracks = tracks.len(),
        "seeded round-robin allocations"
    );

    Ok(PlanOutcome {
        allocations,
        unassigned: Vec::new(),
    })
}

/// `reference + index * duration`, or an overflow error.
fn staggered_start(reference_ms: i64, index: usize, order: &WorkOrder) -> EngineResult<i64> {
    i64::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(order.duration_ms))
        .and_then(|offset| reference_ms.checked_add(offset))
        .ok_or_else(|| EngineError::TimeOverflow {
            allocation_id: Allocation::slot_id(&order.id),
            start_ms: reference_ms,
        })
}
