//! Allocation builders: baseline seeding and greedy auto-resolution.
//!
//! # Seeding
//!
//! `seed_allocations` assigns work orders round-robin over the tracks with a
//! simple stagger. It makes no attempt at feasibility.
//!
//! # Auto-resolution
//!
//! `AutoResolver` re-plans every work order with a priority-ordered,
//! first-fit-by-track heuristic. It is neither optimal nor a backtracking
//! solver. It is deterministic, and a dispatcher can follow why each work
//! order landed where it did.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Graham (1966), "Bounds for certain multiprocessing anomalies" (list scheduling)

mod resolve;
mod seed;

pub use resolve::AutoResolver;
pub use seed::seed_allocations;

use crate::models::{AllocationStore, UnassignedWorkOrder};

/// Allocations produced by a builder, plus the work orders it could not place.
#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
    /// New allocation store.
    pub allocations: AllocationStore,
    /// Work orders without an allocation.
    pub unassigned: Vec<UnassignedWorkOrder>,
}
