//! Priority-driven greedy auto-resolver.
//!
//! # Algorithm
//!
//! 1. Stable-sort work orders by priority rank (descending). Ties keep
//!    input order.
//! 2. Keep a "next free" cursor per track, starting at the reference time.
//! 3. For each work order, collect the tracks that fit its length and, if
//!    needed, have usable overhead line.
//! 4. Pick one according to the [`PlacementPolicy`] and place the work order
//!    at `max(cursor, reference)`. Advance the cursor to the new end.
//! 5. Work orders without a qualifying track are reported as unassigned.
//!
//! The result replaces the whole store. Manual arrangements are discarded
//! so that the result is conflict-free whenever every work order has a
//! qualifying track.
//!
//! # Complexity
//! O(n log n + n * t) where n = work orders, t = tracks.

use tracing::{debug, info, warn};

use super::PlanOutcome;
use crate::config::{EngineConfig, PlacementPolicy, DEFAULT_MIN_ELECTRIFIED_LENGTH_M};
use crate::error::EngineResult;
use crate::models::{
    Allocation, AllocationStore, Infeasibility, Track, UnassignedWorkOrder, WorkOrder,
};

/// Greedy, priority-first, deterministic re-planner.
///
/// # Example
///
/// ```
/// use depot_schedule::models::{AllocationStore, MaintenanceStage, Priority, Track, WorkOrder};
/// use depot_schedule::scheduler::AutoResolver;
///
/// let tracks = vec![Track::new("T1", "D1", 200.0)];
/// let orders = vec![
///     WorkOrder::new("low", "V1", MaintenanceStage::Cleaning).with_priority(Priority::Low),
///     WorkOrder::new("high", "V2", MaintenanceStage::Cleaning).with_priority(Priority::High),
/// ];
///
/// let outcome = AutoResolver::new().resolve(&orders, &tracks, &AllocationStore::new(), 0).unwrap();
/// let high = outcome.allocations.for_work_order("high").unwrap();
/// let low = outcome.allocations.for_work_order("low").unwrap();
/// assert_eq!(high.start_ms, 0);
/// assert_eq!(low.start_ms, high.end_ms);
/// ```
#[derive(Debug, Clone)]
pub struct AutoResolver {
    placement: PlacementPolicy,
    min_electrified_length_m: f64,
}

impl AutoResolver {
    /// Creates a first-fit resolver with the default electrification threshold.
    pub fn new() -> Self {
        Self {
            placement: PlacementPolicy::FirstFit,
            min_electrified_length_m: DEFAULT_MIN_ELECTRIFIED_LENGTH_M,
        }
    }

    /// Creates a resolver from an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new()
            .with_placement(config.placement)
            .with_min_electrified_length(config.min_electrified_length_m)
    }

    /// Sets the placement policy.
    pub fn with_placement(mut self, placement: PlacementPolicy) -> Self {
        self.placement = placement;
        self
    }

    /// Sets the minimum usable electrified length (m).
    pub fn with_min_electrified_length(mut self, meters: f64) -> Self {
        self.min_electrified_length_m = meters;
        self
    }

    /// Re-plans all work orders.
    ///
    /// `current` is not used for placement; it is only compared against
    /// the new plan for logging.
    ///
    /// # Errors
    /// [`EngineError::TimeOverflow`](crate::error::EngineError::TimeOverflow)
    /// if a track's queue runs past `i64::MAX`.
    pub fn resolve(
        &self,
        work_orders: &[WorkOrder],
        tracks: &[Track],
        current: &AllocationStore,
        reference_ms: i64,
    ) -> EngineResult<PlanOutcome> {
        let mut next_free: Vec<i64> = vec![reference_ms; tracks.len()];
        let mut allocations = AllocationStore::new();
        let mut unassigned = Vec::new();

        for idx in Self::priority_order(work_orders) {
            let order = &work_orders[idx];
            let Some(t) = self.select_track(order, tracks, &next_free) else {
                let reason = self.infeasibility(order, tracks);
                warn!(work_order = %order.id, ?reason, "work order has no qualifying track");
                unassigned.push(UnassignedWorkOrder::new(&order.id, reason));
                continue;
            };

            let start_ms = next_free[t].max(reference_ms);
            let allocation = Allocation::for_work_order(order, &tracks[t].id, start_ms)?;
            next_free[t] = allocation.end_ms;
            allocations.push(allocation);
        }

        let moved = allocations
            .iter()
            .filter(|a| {
                current
                    .for_work_order(&a.work_order_id)
                    .map_or(true, |prev| prev.track_id != a.track_id || prev.start_ms != a.start_ms)
            })
            .count();

        info!(
            allocated = allocations.len(),
            unassigned = unassigned.len(),
            moved,
            policy = ?self.placement,
            "auto-resolve complete"
        );

        Ok(PlanOutcome {
            allocations,
            unassigned,
        })
    }

    /// Whether a track can hold a work order.
    pub fn qualifies(&self, track: &Track, order: &WorkOrder) -> bool {
        track.accommodates(order.vehicle_length_m)
            && (!order.requires_electrification
                || track.has_usable_electrification(self.min_electrified_length_m))
    }

    fn select_track(&self, order: &WorkOrder, tracks: &[Track], next_free: &[i64]) -> Option<usize> {
        let mut candidates = tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| self.qualifies(t, order))
            .map(|(i, _)| i);

        let chosen = match self.placement {
            PlacementPolicy::FirstFit => candidates.next(),
            // min_by_key keeps the first minimum, i.e. registry order on ties
            PlacementPolicy::EarliestAvailable => candidates.min_by_key(|&i| next_free[i]),
        };
        if let Some(i) = chosen {
            debug!(work_order = %order.id, track = %tracks[i].id, "track selected");
        }
        chosen
    }

    fn infeasibility(&self, order: &WorkOrder, tracks: &[Track]) -> Infeasibility {
        if tracks.is_empty() {
            return Infeasibility::NoTracks;
        }
        if !tracks.iter().any(|t| t.accommodates(order.vehicle_length_m)) {
            let longest_track_m = tracks.iter().map(|t| t.length_m).fold(0.0, f64::max);
            return Infeasibility::TooLong { longest_track_m };
        }
        Infeasibility::NoElectrifiedTrack
    }

    /// Indices sorted by priority rank descending; stable on ties.
    fn priority_order(work_orders: &[WorkOrder]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..work_orders.len()).collect();
        indices.sort_by(|&a, &b| {
            work_orders[b]
                .priority
                .rank()
                .cmp(&work_orders[a].priority.rank())
        });
        indices
    }
}

impl Default for AutoResolver {
    fn default() -> Self {
        Self::new()
    }
}
