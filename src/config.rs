//! Engine configuration.
//!
//! Tunables that a depot may want to adjust without code changes: the
//! minimum usable overhead-line length, the auto-resolver's placement
//! policy, and a stage/vehicle-family duration table. Every field has a
//! default, so an empty JSON object is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EngineResult;
use crate::models::{hours_to_ms, MaintenanceStage, WorkOrder};

/// Minimum electrified length (m) for an OLE section to be usable.
///
/// Partial electrification shorter than this cannot hold a pantograph-up
/// vehicle for testing.
pub const DEFAULT_MIN_ELECTRIFIED_LENGTH_M: f64 = 50.0;

/// Track selection rule of the auto-resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementPolicy {
    /// First qualifying track in registry order.
    #[default]
    FirstFit,
    /// Qualifying track that frees up earliest; ties go to registry order.
    EarliestAvailable,
}

/// A duration override for a stage, optionally narrowed to a vehicle family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationRule {
    /// Maintenance stage the rule applies to.
    pub stage: MaintenanceStage,
    /// Vehicle family; `None` applies to every family.
    #[serde(default)]
    pub vehicle_family: Option<String>,
    /// Duration in hours.
    pub hours: f64,
}

/// Stage/vehicle-family duration table.
///
/// Durations only ever refine a work order upward: the effective duration
/// is `max(nominal, table)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationTable {
    rules: Vec<DurationRule>,
}

impl DurationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule for every vehicle family.
    pub fn with_stage(mut self, stage: MaintenanceStage, hours: f64) -> Self {
        self.rules.push(DurationRule {
            stage,
            vehicle_family: None,
            hours,
        });
        self
    }

    /// Adds a rule for one vehicle family.
    pub fn with_family(
        mut self,
        stage: MaintenanceStage,
        family: impl Into<String>,
        hours: f64,
    ) -> Self {
        self.rules.push(DurationRule {
            stage,
            vehicle_family: Some(family.into()),
            hours,
        });
        self
    }

    /// Table duration (ms) for a stage and family.
    ///
    /// An exact family rule wins over a family-less rule.
    pub fn lookup_ms(&self, stage: MaintenanceStage, family: Option<&str>) -> Option<i64> {
        let exact = family.and_then(|f| {
            self.rules
                .iter()
                .find(|r| r.stage == stage && r.vehicle_family.as_deref() == Some(f))
        });
        exact
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.stage == stage && r.vehicle_family.is_none())
            })
            .map(|r| hours_to_ms(r.hours))
    }

    /// Returns the order with its duration refined by the table.
    pub fn refine(&self, order: &WorkOrder) -> WorkOrder {
        let mut refined = order.clone();
        if let Some(ms) = self.lookup_ms(order.stage, order.vehicle_family.as_deref()) {
            refined.duration_ms = refined.duration_ms.max(ms);
        }
        refined
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum usable electrified length (m).
    pub min_electrified_length_m: f64,
    /// Auto-resolver track selection.
    pub placement: PlacementPolicy,
    /// Duration refinements applied on load.
    pub duration_table: DurationTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_electrified_length_m: DEFAULT_MIN_ELECTRIFIED_LENGTH_M,
            placement: PlacementPolicy::FirstFit,
            duration_table: DurationTable::new(),
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum usable electrified length.
    pub fn with_min_electrified_length(mut self, meters: f64) -> Self {
        self.min_electrified_length_m = meters;
        self
    }

    /// Sets the placement policy.
    pub fn with_placement(mut self, placement: PlacementPolicy) -> Self {
        self.placement = placement;
        self
    }

    /// Sets the duration table.
    pub fn with_duration_table(mut self, table: DurationTable) -> Self {
        self.duration_table = table;
        self
    }

    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
