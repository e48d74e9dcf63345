//! Conflict detection.
//!
//! Evaluates an allocation store against the track registry and reports
//! every temporal overlap and constraint violation.
//!
//! # Rules
//!
//! | Rule | Condition | ID |
//! |------|-----------|----|
//! | Overlap | same track, `A.start < B.end && B.start < A.end` | `{A}-{B}` |
//! | Length | `vehicle_length > track.length` | `{A}-length` |
//! | Electrification | needs OLE, `track.electrified < minimum` | `{A}-ole` |
//!
//! Windows are half-open, so back-to-back allocations are legal.
//!
//! # Dangling track references
//! An allocation on a track that is not in the registry is treated as a
//! track of zero length without electrification. It always fails the
//! length rule (and the electrification rule if it needs OLE), and it is
//! left out of overlap checks since it belongs to no track group.
//!
//! # Complexity
//! O(n²) per track group; fleet sizes are tens to low hundreds.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::{EngineConfig, DEFAULT_MIN_ELECTRIFIED_LENGTH_M};
use crate::models::{Allocation, Conflict, Track};

/// Pure conflict detector.
///
/// # Example
///
/// ```
/// use depot_schedule::conflict::ConflictDetector;
/// use depot_schedule::models::{Allocation, MaintenanceStage, Track, WorkOrder};
///
/// let tracks = vec![Track::new("T1", "D1", 200.0)];
/// let a = WorkOrder::new("A", "V1", MaintenanceStage::Cleaning).with_duration_ms(1000);
/// let b = WorkOrder::new("B", "V2", MaintenanceStage::Cleaning).with_duration_ms(1000);
/// let allocations = vec![
///     Allocation::for_work_order(&a, "T1", 0).unwrap(),
///     Allocation::for_work_order(&b, "T1", 500).unwrap(),
/// ];
///
/// let conflicts = ConflictDetector::new().detect(&allocations, &tracks);
/// assert_eq!(conflicts.len(), 1);
/// assert_eq!(conflicts[0].id.to_string(), "slot-A-slot-B");
/// ```
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    min_electrified_length_m: f64,
}

impl ConflictDetector {
    /// Creates a detector with the default electrification threshold.
    pub fn new() -> Self {
        Self {
            min_electrified_length_m: DEFAULT_MIN_ELECTRIFIED_LENGTH_M,
        }
    }

    /// Creates a detector from an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new().with_min_electrified_length(config.min_electrified_length_m)
    }

    /// Sets the minimum usable electrified length (m).
    pub fn with_min_electrified_length(mut self, meters: f64) -> Self {
        self.min_electrified_length_m = meters;
        self
    }

    /// Detects all conflicts.
    ///
    /// Deterministic: overlaps come first, grouped by track in order of
    /// first appearance and by pair position within the store; per-allocation
    /// violations follow in store order.
    pub fn detect(&self, allocations: &[Allocation], tracks: &[Track]) -> Vec<Conflict> {
        let track_index: HashMap<&str, &Track> =
            tracks.iter().map(|t| (t.id.as_str(), t)).collect();

        let mut conflicts = Vec::new();
        self.detect_overlaps(allocations, &track_index, &mut conflicts);
        let overlaps = conflicts.len();
        self.detect_violations(allocations, &track_index, &mut conflicts);

        debug!(
            allocations = allocations.len(),
            overlaps,
            violations = conflicts.len() - overlaps,
            "conflict detection pass"
        );
        conflicts
    }

    fn detect_overlaps(
        &self,
        allocations: &[Allocation],
        track_index: &HashMap<&str, &Track>,
        out: &mut Vec<Conflict>,
    ) {
        // track_id → allocation indices, groups in first-seen order
        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        let mut group_of: HashMap<&str, usize> = HashMap::new();

        for (i, a) in allocations.iter().enumerate() {
            let track_id = a.track_id.as_str();
            if !track_index.contains_key(track_id) {
                continue;
            }
            let g = *group_of.entry(track_id).or_insert_with(|| {
                groups.push((track_id, Vec::new()));
                groups.len() - 1
            });
            groups[g].1.push(i);
        }

        for (track_id, members) in &groups {
            for (x, &i) in members.iter().enumerate() {
                for &j in &members[x + 1..] {
                    let a = &allocations[i];
                    let b = &allocations[j];
                    if a.window().overlaps(&b.window()) {
                        out.push(Conflict::overlap(
                            &a.id,
                            &b.id,
                            *track_id,
                            format!(
                                "{} [{}, {}) overlaps {} [{}, {}) on track {}",
                                a.work_order_id,
                                a.start_ms,
                                a.end_ms,
                                b.work_order_id,
                                b.start_ms,
                                b.end_ms,
                                track_id
                            ),
                        ));
                    }
                }
            }
        }
    }

    fn detect_violations(
        &self,
        allocations: &[Allocation],
        track_index: &HashMap<&str, &Track>,
        out: &mut Vec<Conflict>,
    ) {
        for a in allocations {
            let track = track_index.get(a.track_id.as_str()).copied();
            if track.is_none() {
                warn!(
                    allocation = %a.id,
                    track = %a.track_id,
                    "allocation references unknown track"
                );
            }
            let (length_m, electrified_m) =
                track.map_or((0.0, 0.0), |t| (t.length_m, t.electrified_length()));

            if a.vehicle_length_m > length_m {
                out.push(Conflict::length_exceeded(
                    &a.id,
                    &a.track_id,
                    format!(
                        "{} needs {} m but track {} is {} m",
                        a.work_order_id, a.vehicle_length_m, a.track_id, length_m
                    ),
                ));
            }

            if a.requires_electrification && electrified_m < self.min_electrified_length_m {
                out.push(Conflict::electrification_missing(
                    &a.id,
                    &a.track_id,
                    format!(
                        "{} needs overhead line but track {} has {} m (minimum {} m)",
                        a.work_order_id, a.track_id, electrified_m, self.min_electrified_length_m
                    ),
                ));
            }
        }
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Detects conflicts with the default electrification threshold.
pub fn detect_conflicts(allocations: &[Allocation], tracks: &[Track]) -> Vec<Conflict> {
    ConflictDetector::new().detect(allocations, tracks)
}
