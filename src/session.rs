//! Scheduling façade.
//!
//! Two surfaces over the same engine:
//!
//! - **Free functions** ([`seed`], [`apply_manual_move`], [`auto_resolve`],
//!   and their `_with` variants taking an [`EngineConfig`]). They are
//!   stateless and copy-on-write: inputs are never modified and every call
//!   returns a fresh [`Schedule`].
//! - **[`SchedulingSession`]**: holds one facility's tracks, the loaded work
//!   orders, and the current schedule, and enforces the state machine
//!
//! ```text
//! Empty ──load──▶ Seeded ──move──▶ UserEdited
//!                   │  ▲              │
//!                   │  └──── load ────┤
//!                   └──auto_resolve──▶ AutoResolved ◀─┘
//! ```
//!
//! Every mutation is followed by a conflict detection pass. The session has
//! no internal locking; a host with several editors must serialize calls per
//! session. Readers take [`SchedulingSession::snapshot`], an `Arc` that a
//! later mutation never changes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::EngineConfig;
use crate::conflict::ConflictDetector;
use crate::error::{EngineError, EngineResult};
use crate::models::{AllocationStore, Conflict, Schedule, Track, TrackRegistry, WorkOrder};
use crate::scheduler::{seed_allocations, AutoResolver, PlanOutcome};
use crate::validation::validate_input;

pub use crate::conflict::detect_conflicts;

/// Seeds allocations round-robin and detects conflicts (default configuration).
pub fn seed(work_orders: &[WorkOrder], tracks: &[Track], reference_ms: i64) -> EngineResult<Schedule> {
    seed_with(&EngineConfig::default(), work_orders, tracks, reference_ms)
}

/// Seeds allocations round-robin and detects conflicts.
///
/// Work order durations are refined by the configured duration table first.
pub fn seed_with(
    config: &EngineConfig,
    work_orders: &[WorkOrder],
    tracks: &[Track],
    reference_ms: i64,
) -> EngineResult<Schedule> {
    validate_input(work_orders, tracks).map_err(EngineError::InvalidInput)?;
    let refined = refine_all(config, work_orders);
    Ok(finish(
        config,
        seed_allocations(&refined, tracks, reference_ms)?,
        tracks,
    ))
}

/// Moves one allocation and re-detects conflicts (default configuration).
pub fn apply_manual_move(
    allocations: &AllocationStore,
    tracks: &[Track],
    allocation_id: &str,
    new_track_id: &str,
    new_start_ms: i64,
) -> EngineResult<Schedule> {
    apply_manual_move_with(
        &EngineConfig::default(),
        allocations,
        tracks,
        allocation_id,
        new_track_id,
        new_start_ms,
    )
}

/// Moves one allocation and re-detects conflicts.
///
/// The allocation keeps its duration. `allocations` is left untouched.
/// The returned schedule has no unassigned work orders, since a move
/// cannot change which work orders are placed.
///
/// # Errors
/// - [`EngineError::UnknownAllocation`] if no allocation has `allocation_id`
/// - [`EngineError::UnknownTrack`] if `new_track_id` is not in `tracks`
/// - [`EngineError::TimeOverflow`] if the moved window ends past `i64::MAX`
pub fn apply_manual_move_with(
    config: &EngineConfig,
    allocations: &AllocationStore,
    tracks: &[Track],
    allocation_id: &str,
    new_track_id: &str,
    new_start_ms: i64,
) -> EngineResult<Schedule> {
    if !tracks.iter().any(|t| t.id == new_track_id) {
        return Err(EngineError::UnknownTrack(new_track_id.to_string()));
    }
    let moved = allocations.with_moved(allocation_id, new_track_id, new_start_ms)?;
    Ok(finish(
        config,
        PlanOutcome {
            allocations: moved,
            unassigned: Vec::new(),
        },
        tracks,
    ))
}

/// Re-plans all work orders and detects conflicts (default configuration).
pub fn auto_resolve(
    work_orders: &[WorkOrder],
    tracks: &[Track],
    allocations: &AllocationStore,
    reference_ms: i64,
) -> EngineResult<Schedule> {
    auto_resolve_with(
        &EngineConfig::default(),
        work_orders,
        tracks,
        allocations,
        reference_ms,
    )
}

/// Re-plans all work orders and detects conflicts.
///
/// Infeasible work orders appear in [`Schedule::unassigned`].
pub fn auto_resolve_with(
    config: &EngineConfig,
    work_orders: &[WorkOrder],
    tracks: &[Track],
    allocations: &AllocationStore,
    reference_ms: i64,
) -> EngineResult<Schedule> {
    validate_input(work_orders, tracks).map_err(EngineError::InvalidInput)?;
    let refined = refine_all(config, work_orders);
    let outcome =
        AutoResolver::from_config(config).resolve(&refined, tracks, allocations, reference_ms)?;
    Ok(finish(config, outcome, tracks))
}

fn refine_all(config: &EngineConfig, work_orders: &[WorkOrder]) -> Vec<WorkOrder> {
    work_orders
        .iter()
        .map(|wo| config.duration_table.refine(wo))
        .collect()
}

fn finish(config: &EngineConfig, outcome: PlanOutcome, tracks: &[Track]) -> Schedule {
    let conflicts = ConflictDetector::from_config(config).detect(outcome.allocations.as_slice(), tracks);
    Schedule::new(outcome.allocations, conflicts, outcome.unassigned)
}

/// Lifecycle state of a [`SchedulingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No work orders loaded yet.
    Empty,
    /// Round-robin baseline after a load.
    Seeded,
    /// At least one manual move since the last load or resolve.
    UserEdited,
    /// Result of the last auto-resolve.
    AutoResolved,
}

/// Stateful scheduling session for one facility.
///
/// # Example
///
/// ```
/// use depot_schedule::models::{MaintenanceStage, Track, TrackRegistry, WorkOrder};
/// use depot_schedule::session::{SchedulingSession, SessionState};
///
/// let registry = TrackRegistry::new()
///     .with_track(Track::new("T1", "D1", 200.0).with_electrification(200.0))
///     .with_track(Track::new("T2", "D1", 120.0));
/// let mut session = SchedulingSession::new(&registry, "D1");
///
/// let orders = vec![
///     WorkOrder::new("W1", "V1", MaintenanceStage::MonthlyInspection),
///     WorkOrder::new("W2", "V2", MaintenanceStage::DailyInspection),
/// ];
/// let seeded = session.load(orders, 0).unwrap();
/// assert!(!seeded.is_conflict_free()); // W2 lands on unelectrified T2
///
/// let resolved = session.auto_resolve(0).unwrap();
/// assert!(resolved.is_conflict_free());
/// assert_eq!(session.state(), SessionState::AutoResolved);
/// ```
#[derive(Debug, Clone)]
pub struct SchedulingSession {
    facility_id: String,
    config: EngineConfig,
    tracks: Vec<Track>,
    work_orders: Vec<WorkOrder>,
    schedule: Arc<Schedule>,
    state: SessionState,
}

impl SchedulingSession {
    /// Creates an empty session over a facility's tracks.
    ///
    /// The tracks are copied; later changes to the registry do not reach
    /// the session.
    pub fn new(registry: &TrackRegistry, facility_id: impl Into<String>) -> Self {
        let facility_id = facility_id.into();
        let tracks = registry.list_tracks(&facility_id).to_vec();
        Self {
            facility_id,
            config: EngineConfig::default(),
            tracks,
            work_orders: Vec::new(),
            schedule: Arc::new(Schedule::empty()),
            state: SessionState::Empty,
        }
    }

    /// Sets the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Facility this session schedules.
    pub fn facility_id(&self) -> &str {
        &self.facility_id
    }

    /// Tracks in registry order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Loaded work orders (durations already refined).
    pub fn work_orders(&self) -> &[WorkOrder] {
        &self.work_orders
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Immutable snapshot of the current schedule.
    pub fn snapshot(&self) -> Arc<Schedule> {
        Arc::clone(&self.schedule)
    }

    /// Conflicts of the current schedule.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.schedule.conflicts
    }

    /// Loads a work order set, seeds allocations, and detects conflicts.
    ///
    /// Allowed from any state; a reload discards the previous schedule.
    /// On error, the session is left unchanged.
    #[instrument(skip(self, work_orders), fields(facility = %self.facility_id, count = work_orders.len()))]
    pub fn load(&mut self, work_orders: Vec<WorkOrder>, reference_ms: i64) -> EngineResult<Arc<Schedule>> {
        validate_input(&work_orders, &self.tracks).map_err(EngineError::InvalidInput)?;

        let refined = refine_all(&self.config, &work_orders);
        let outcome = seed_allocations(&refined, &self.tracks, reference_ms)?;
        let schedule = finish(&self.config, outcome, &self.tracks);

        self.work_orders = refined;
        Ok(self.transition(schedule, SessionState::Seeded))
    }

    /// Moves one allocation to a track and start time, then re-detects.
    ///
    /// Does not re-plan anything else. On error, the session is left
    /// unchanged.
    ///
    /// # Errors
    /// - [`EngineError::NotLoaded`] before the first [`load`](Self::load)
    /// - [`EngineError::UnknownAllocation`] / [`EngineError::UnknownTrack`]
    #[instrument(skip(self), fields(facility = %self.facility_id))]
    pub fn move_allocation(
        &mut self,
        allocation_id: &str,
        track_id: &str,
        start_ms: i64,
    ) -> EngineResult<Arc<Schedule>> {
        if self.state == SessionState::Empty {
            return Err(EngineError::NotLoaded);
        }
        let moved = apply_manual_move_with(
            &self.config,
            &self.schedule.allocations,
            &self.tracks,
            allocation_id,
            track_id,
            start_ms,
        )?;
        let schedule = Schedule::new(
            moved.allocations,
            moved.conflicts,
            self.schedule.unassigned.clone(),
        );
        Ok(self.transition(schedule, SessionState::UserEdited))
    }

    /// Re-plans every loaded work order and detects conflicts.
    ///
    /// # Errors
    /// - [`EngineError::NotLoaded`] before the first [`load`](Self::load)
    #[instrument(skip(self), fields(facility = %self.facility_id))]
    pub fn auto_resolve(&mut self, reference_ms: i64) -> EngineResult<Arc<Schedule>> {
        if self.state == SessionState::Empty {
            return Err(EngineError::NotLoaded);
        }
        let outcome = AutoResolver::from_config(&self.config).resolve(
            &self.work_orders,
            &self.tracks,
            &self.schedule.allocations,
            reference_ms,
        )?;
        let schedule = finish(&self.config, outcome, &self.tracks);
        Ok(self.transition(schedule, SessionState::AutoResolved))
    }

    fn transition(&mut self, schedule: Schedule, next: SessionState) -> Arc<Schedule> {
        info!(
            from = ?self.state,
            to = ?next,
            allocations = schedule.allocations.len(),
            conflicts = schedule.conflicts.len(),
            unassigned = schedule.unassigned.len(),
            "session transition"
        );
        self.schedule = Arc::new(schedule);
        self.state = next;
        self.snapshot()
    }
}
