//! Input validation for depot scheduling.
//!
//! Checks structural integrity of tracks and work orders before seeding.
//! Detects:
//! - Duplicate IDs
//! - Non-positive track or vehicle lengths
//! - Non-positive durations
//! - Electrified sections that are negative or longer than their track
//!
//! All problems are collected; validation does not stop at the first one.

use crate::models::{Track, WorkOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A track or vehicle length is zero, negative, or not finite.
    NonPositiveLength,
    /// A work order duration is zero or negative.
    NonPositiveDuration,
    /// Electrified section is negative or longer than the track.
    InvalidElectrification,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Validates tracks on their own.
pub fn validate_tracks(tracks: &[Track]) -> ValidationResult {
    let mut errors = Vec::new();
    collect_track_errors(tracks, &mut errors);
    finish(errors)
}

/// Validates work orders on their own.
pub fn validate_work_orders(work_orders: &[WorkOrder]) -> ValidationResult {
    let mut errors = Vec::new();
    collect_work_order_errors(work_orders, &mut errors);
    finish(errors)
}

/// Validates the input data for a scheduling session.
///
/// Checks:
/// 1. No duplicate track IDs
/// 2. Every track has a positive length
/// 3. Electrified sections are non-negative and fit within their track
/// 4. No duplicate work order IDs
/// 5. Every work order has a positive vehicle length and duration
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(work_orders: &[WorkOrder], tracks: &[Track]) -> ValidationResult {
    let mut errors = Vec::new();
    collect_track_errors(tracks, &mut errors);
    collect_work_order_errors(work_orders, &mut errors);
    finish(errors)
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_track_errors(tracks: &[Track], errors: &mut Vec<ValidationError>) {
    let mut track_ids = HashSet::new();
    for t in tracks {
        if !track_ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate track ID: {}", t.id),
            ));
        }

        if !is_positive(t.length_m) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveLength,
                format!("Track '{}' has non-positive length {}", t.id, t.length_m),
            ));
        }

        if let Some(ole) = t.electrified_length_m {
            if !ole.is_finite() || ole < 0.0 || ole > t.length_m {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidElectrification,
                    format!(
                        "Track '{}' electrified length {} outside [0, {}]",
                        t.id, ole, t.length_m
                    ),
                ));
            }
        }
    }
}

fn collect_work_order_errors(work_orders: &[WorkOrder], errors: &mut Vec<ValidationError>) {
    let mut order_ids = HashSet::new();
    for wo in work_orders {
        if !order_ids.insert(wo.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate work order ID: {}", wo.id),
            ));
        }

        if !is_positive(wo.vehicle_length_m) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveLength,
                format!(
                    "Work order '{}' has non-positive vehicle length {}",
                    wo.id, wo.vehicle_length_m
                ),
            ));
        }

        if wo.duration_ms <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDuration,
                format!(
                    "Work order '{}' has non-positive duration {} ms",
                    wo.id, wo.duration_ms
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaintenanceStage;

    fn sample_tracks() -> Vec<Track> {
        vec![
            Track::new("T1", "D1", 200.0).with_electrification(200.0),
            Track::new("T2", "D1", 150.0),
        ]
    }

    fn sample_orders() -> Vec<WorkOrder> {
        vec![
            WorkOrder::new("W1", "V1", MaintenanceStage::DailyInspection),
            WorkOrder::new("W2", "V2", MaintenanceStage::WheelLathe),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_orders(), &sample_tracks()).is_ok());
    }

    #[test]
    fn test_duplicate_track_id() {
        let tracks = vec![Track::new("T1", "D1", 100.0), Track::new("T1", "D1", 120.0)];
        let errors = validate_input(&sample_orders(), &tracks).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("track")));
    }

    #[test]
    fn test_duplicate_work_order_id() {
        let orders = vec![
            WorkOrder::new("W1", "V1", MaintenanceStage::Cleaning),
            WorkOrder::new("W1", "V2", MaintenanceStage::Cleaning),
        ];
        let errors = validate_work_orders(&orders).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
    }

    #[test]
    fn test_non_positive_track_length() {
        let tracks = vec![Track::new("T0", "D1", 0.0), Track::new("TN", "D1", f64::NAN)];
        let errors = validate_tracks(&tracks).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::NonPositiveLength)
                .count(),
            2
        );
    }

    #[test]
    fn test_invalid_electrification() {
        let tracks = vec![
            Track::new("T1", "D1", 100.0).with_electrification(120.0),
            Track::new("T2", "D1", 100.0).with_electrification(-1.0),
            Track::new("T3", "D1", 100.0).with_electrification(0.0),
        ];
        let errors = validate_tracks(&tracks).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidElectrification));
    }

    #[test]
    fn test_malformed_work_order() {
        let orders = vec![WorkOrder::new("W1", "V1", MaintenanceStage::Cleaning)
            .with_vehicle_length(-5.0)
            .with_duration_ms(0)];
        let errors = validate_work_orders(&orders).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NonPositiveLength));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NonPositiveDuration));
    }

    #[test]
    fn test_multiple_errors() {
        let orders = vec![WorkOrder::new("W1", "V1", MaintenanceStage::Cleaning).with_duration_ms(-1)];
        let tracks = vec![Track::new("T1", "D1", -10.0)];
        let errors = validate_input(&orders, &tracks).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
