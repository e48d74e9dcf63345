//! Work order model.
//!
//! A work order is one maintenance demand for one vehicle. The maintenance
//! stage determines the default duration and whether the work needs
//! overhead line; the priority drives the order of auto-resolution.
//!
//! # Time Representation
//! Durations are in milliseconds. Stage defaults are defined in hours and
//! converted with [`hours_to_ms`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::hours_to_ms;

/// Vehicle length used when none is given (m), a typical four-car unit.
pub const DEFAULT_VEHICLE_LENGTH_M: f64 = 80.0;

/// Maintenance tier of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaintenanceStage {
    /// Daily check (pantograph and roof included).
    DailyInspection,
    /// Monthly inspection with traction tests.
    MonthlyInspection,
    /// Annual inspection.
    AnnualInspection,
    /// Underfloor wheel lathe reprofiling.
    WheelLathe,
    /// Interior/exterior cleaning.
    Cleaning,
}

impl MaintenanceStage {
    /// Default duration of this stage (hours).
    pub fn default_hours(self) -> f64 {
        match self {
            Self::DailyInspection => 2.0,
            Self::MonthlyInspection => 6.0,
            Self::AnnualInspection => 24.0,
            Self::WheelLathe => 4.0,
            Self::Cleaning => 3.0,
        }
    }

    /// Whether the work needs an energised overhead line.
    pub fn requires_electrification(self) -> bool {
        matches!(
            self,
            Self::DailyInspection | Self::MonthlyInspection | Self::AnnualInspection
        )
    }
}

/// Work order priority.
///
/// Total order via a fixed rank map: `High` > `Medium` > `Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Numeric rank (higher = scheduled first).
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(s)
    }
}

/// A maintenance work order.
///
/// Immutable once loaded into a session; the engine only ever changes the
/// allocation that refers to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    /// Unique work order identifier.
    pub id: String,
    /// Vehicle (unit) requiring maintenance.
    pub vehicle_id: String,
    /// Vehicle family, used for duration refinement.
    pub vehicle_family: Option<String>,
    /// Maintenance tier.
    pub stage: MaintenanceStage,
    /// Scheduling priority.
    pub priority: Priority,
    /// Length the assigned track must accommodate (m).
    pub vehicle_length_m: f64,
    /// Whether the track must provide usable overhead line. Derived from `stage`.
    pub requires_electrification: bool,
    /// Nominal duration (ms).
    pub duration_ms: i64,
}

impl WorkOrder {
    /// Creates a work order with the stage's default duration.
    pub fn new(
        id: impl Into<String>,
        vehicle_id: impl Into<String>,
        stage: MaintenanceStage,
    ) -> Self {
        Self {
            id: id.into(),
            vehicle_id: vehicle_id.into(),
            vehicle_family: None,
            stage,
            priority: Priority::default(),
            vehicle_length_m: DEFAULT_VEHICLE_LENGTH_M,
            requires_electrification: stage.requires_electrification(),
            duration_ms: hours_to_ms(stage.default_hours()),
        }
    }

    /// Sets the vehicle family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.vehicle_family = Some(family.into());
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the vehicle length.
    pub fn with_vehicle_length(mut self, length_m: f64) -> Self {
        self.vehicle_length_m = length_m;
        self
    }

    /// Sets the duration in milliseconds.
    pub fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Sets the duration in hours.
    pub fn with_duration_hours(self, hours: f64) -> Self {
        self.with_duration_ms(hours_to_ms(hours))
    }
}
