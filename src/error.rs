//! Engine error type.
//!
//! Boundary failures only. Conflicts and infeasible work orders are regular
//! output and never surface here.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input data failed validation.
    #[error("invalid input ({} problem(s)): {}", .0.len(), join_messages(.0))]
    InvalidInput(Vec<ValidationError>),

    /// No allocation with the given ID exists in the store.
    #[error("unknown allocation '{0}'")]
    UnknownAllocation(String),

    /// A move targeted a track that is not in the registry.
    #[error("unknown track '{0}'")]
    UnknownTrack(String),

    /// An allocation would have an empty or negative window.
    #[error("allocation '{allocation_id}' has non-positive duration ({duration_ms} ms)")]
    NonPositiveDuration {
        allocation_id: String,
        duration_ms: i64,
    },

    /// Two allocations reference the same work order.
    #[error("work order '{0}' has more than one allocation")]
    DuplicateAllocation(String),

    /// Two allocations share an allocation ID.
    #[error("allocation ID '{0}' is used more than once")]
    DuplicateAllocationId(String),

    /// An allocation window does not fit in the millisecond time range.
    #[error("allocation '{allocation_id}' window starting at {start_ms} ms overflows the time range")]
    TimeOverflow { allocation_id: String, start_ms: i64 },

    /// Operation requires loaded work orders.
    #[error("no work orders loaded")]
    NotLoaded,

    /// Configuration could not be parsed.
    #[error("invalid engine configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Engine result alias.
pub type EngineResult<T> = Result<T, EngineError>;

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_input_message() {
        let err = EngineError::InvalidInput(vec![
            ValidationError::new(ValidationErrorKind::DuplicateId, "Duplicate track ID: T1"),
            ValidationError::new(ValidationErrorKind::NonPositiveLength, "Track 'T2' length 0"),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("invalid input (2 problem(s))"));
        assert!(msg.contains("Duplicate track ID: T1; Track 'T2' length 0"));
    }

    #[test]
    fn test_other_messages() {
        assert_eq!(
            EngineError::UnknownTrack("T9".into()).to_string(),
            "unknown track 'T9'"
        );
        let e = EngineError::NonPositiveDuration {
            allocation_id: "slot-A".into(),
            duration_ms: 0,
        };
        assert!(e.to_string().contains("slot-A"));

        let e = EngineError::TimeOverflow {
            allocation_id: "slot-B".into(),
            start_ms: i64::MAX,
        };
        assert!(e.to_string().contains("slot-B"));
        assert!(e.to_string().contains("overflows"));
    }
}
