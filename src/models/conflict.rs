//! Conflict model.
//!
//! Conflicts are derived data: the detector recomputes the full set on every
//! pass, so a conflict disappears as soon as its cause is gone. Identity is
//! a structured [`ConflictId`] built from the allocation(s) and the rule that
//! produced it, which keeps re-detection idempotent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Two allocations occupy the same track at the same time.
    Overlap,
    /// Vehicle longer than the track.
    LengthExceeded,
    /// Electrified work on a track without usable overhead line.
    ElectrificationMissing,
}

/// Deterministic conflict identity.
///
/// Displays as `"{first}-{second}"`, `"{allocation}-length"`, or
/// `"{allocation}-ole"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConflictId {
    /// Overlap between two allocations, in store order.
    Overlap { first: String, second: String },
    /// Length violation of one allocation.
    LengthExceeded { allocation: String },
    /// Electrification violation of one allocation.
    ElectrificationMissing { allocation: String },
}

impl ConflictId {
    /// The kind of conflict this ID denotes.
    pub fn kind(&self) -> ConflictKind {
        match self {
            Self::Overlap { .. } => ConflictKind::Overlap,
            Self::LengthExceeded { .. } => ConflictKind::LengthExceeded,
            Self::ElectrificationMissing { .. } => ConflictKind::ElectrificationMissing,
        }
    }

    /// Allocation IDs implicated by this conflict.
    pub fn allocation_ids(&self) -> Vec<&str> {
        match self {
            Self::Overlap { first, second } => vec![first.as_str(), second.as_str()],
            Self::LengthExceeded { allocation } | Self::ElectrificationMissing { allocation } => {
                vec![allocation.as_str()]
            }
        }
    }

    /// Whether the given allocation is implicated.
    pub fn involves(&self, allocation_id: &str) -> bool {
        self.allocation_ids().contains(&allocation_id)
    }
}

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap { first, second } => write!(f, "{first}-{second}"),
            Self::LengthExceeded { allocation } => write!(f, "{allocation}-length"),
            Self::ElectrificationMissing { allocation } => write!(f, "{allocation}-ole"),
        }
    }
}

/// A detected scheduling conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Deterministic identity.
    pub id: ConflictId,
    /// Track on which the conflict occurs (as referenced by the allocation).
    pub track_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

impl Conflict {
    /// Creates an overlap conflict.
    pub fn overlap(
        first: impl Into<String>,
        second: impl Into<String>,
        track_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: ConflictId::Overlap {
                first: first.into(),
                second: second.into(),
            },
            track_id: track_id.into(),
            message: message.into(),
            severity: 90,
        }
    }

    /// Creates a length violation.
    pub fn length_exceeded(
        allocation_id: impl Into<String>,
        track_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: ConflictId::LengthExceeded {
                allocation: allocation_id.into(),
            },
            track_id: track_id.into(),
            message: message.into(),
            severity: 95,
        }
    }

    /// Creates an electrification violation.
    pub fn electrification_missing(
        allocation_id: impl Into<String>,
        track_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: ConflictId::ElectrificationMissing {
                allocation: allocation_id.into(),
            },
            track_id: track_id.into(),
            message: message.into(),
            severity: 80,
        }
    }

    /// Conflict kind.
    #[inline]
    pub fn kind(&self) -> ConflictKind {
        self.id.kind()
    }

    /// Whether the given allocation is implicated.
    pub fn involves(&self, allocation_id: &str) -> bool {
        self.id.involves(allocation_id)
    }
}
