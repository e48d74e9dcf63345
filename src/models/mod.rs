//! Depot scheduling domain models.
//!
//! Provides the data types shared by seeding, conflict detection, and
//! auto-resolution.
//!
//! # Domain Mappings
//!
//! | depot-schedule | Generic scheduling |
//! |----------------|--------------------|
//! | WorkOrder | Task / Job |
//! | Track | Resource (disjunctive) |
//! | Allocation | Assignment |
//! | Conflict | Constraint violation |

mod allocation;
mod conflict;
mod schedule;
mod track;
mod window;
mod work_order;

pub use allocation::{Allocation, AllocationStore};
pub use conflict::{Conflict, ConflictId, ConflictKind};
pub use schedule::{Infeasibility, Schedule, UnassignedWorkOrder};
pub use track::{Track, TrackRegistry};
pub use window::{hours_to_ms, TimeWindow, HOUR_MS};
pub use work_order::{MaintenanceStage, Priority, WorkOrder, DEFAULT_VEHICLE_LENGTH_M};
