//! Depot maintenance scheduling.
//!
//! Places maintenance work orders for rail vehicles onto depot tracks,
//! detects physical and temporal conflicts, and re-plans greedily to remove
//! them.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Track`, `TrackRegistry`, `WorkOrder`,
//!   `Allocation`, `AllocationStore`, `Conflict`, `Schedule`
//! - **`validation`**: Input integrity checks (duplicate IDs, lengths, durations)
//! - **`conflict`**: Overlap, length, and overhead-line detection
//! - **`scheduler`**: Round-robin seeding and the priority-driven auto-resolver
//! - **`session`**: Stateless operations plus the stateful `SchedulingSession`
//! - **`config`**: Tunables (OLE threshold, placement policy, duration table)
//! - **`logging`**: `tracing-subscriber` setup for hosts and tests
//!
//! # Time
//!
//! All instants are milliseconds on a caller-chosen epoch. Windows are
//! half-open `[start, end)`, so back-to-back work on one track is not an
//! overlap. No operation reads the wall clock; seeding and resolving take
//! an explicit reference time.
//!
//! # Example
//!
//! ```
//! use depot_schedule::models::{MaintenanceStage, Track, WorkOrder};
//! use depot_schedule::session::{apply_manual_move, auto_resolve, seed};
//!
//! let tracks = vec![
//!     Track::new("T1", "D1", 150.0),
//!     Track::new("T2", "D1", 150.0).with_electrification(150.0),
//! ];
//! let orders = vec![
//!     WorkOrder::new("W1", "V1", MaintenanceStage::Cleaning).with_duration_hours(2.0),
//!     WorkOrder::new("W2", "V2", MaintenanceStage::Cleaning).with_duration_hours(2.0),
//! ];
//!
//! let seeded = seed(&orders, &tracks, 0).unwrap();
//! assert!(seeded.is_conflict_free());
//!
//! // Drag W2 onto T1 while W1 still occupies it
//! let edited = apply_manual_move(&seeded.allocations, &tracks, "slot-W2", "T1", 3_600_000).unwrap();
//! assert_eq!(edited.conflicts.len(), 1);
//!
//! let resolved = auto_resolve(&orders, &tracks, &edited.allocations, 0).unwrap();
//! assert!(resolved.is_conflict_free());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Lentink et al. (2006), "Applying Operations Research techniques to
//!   planning of train shunting"

pub mod config;
pub mod conflict;
pub mod error;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod session;
pub mod validation;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use session::{SchedulingSession, SessionState};
