//! Errors raised while parsing descriptors, checking types and building boxes.
//!
//! Every failure is terminal for the call that raised it: nothing is retried
//! and no partially built box escapes.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoxError {
    /// The base-type guard of a box kind rejected the value.
    #[error("Cannot cast value of type {value_type} to {kind}")]
    BaseTypeMismatch { value_type: String, kind: String },

    /// The declared type of a box rejected the value.
    #[error("Cannot cast value \"{value}\" of type {value_type} to {target}")]
    TypeMismatch {
        value: String,
        value_type: String,
        target: String,
    },

    #[error("No box type \"{0}\" exists")]
    UnknownBoxKind(String),

    #[error("Unknown type \"{0}\"")]
    UnknownType(String),

    /// Built-in type names and `None` cannot be taken by a registration.
    #[error("Type name \"{0}\" is reserved")]
    ReservedName(String),

    #[error("Invalid type descriptor \"{descriptor}\" at {position}: {reason}")]
    InvalidDescriptor {
        descriptor: String,
        position: usize,
        reason: &'static str,
    },
}

impl BoxError {
    /// Both guard and declared-type failures are type mismatches to callers.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            BoxError::BaseTypeMismatch { .. } | BoxError::TypeMismatch { .. }
        )
    }
}

pub type BoxResult<T> = Result<T, BoxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_documented_formats() {
        let err = BoxError::TypeMismatch {
            value: "foo".to_string(),
            value_type: "string".to_string(),
            target: "int".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot cast value \"foo\" of type string to int"
        );
        assert!(err.is_type_mismatch());

        let err = BoxError::UnknownBoxKind("BadBox".to_string());
        assert_eq!(err.to_string(), "No box type \"BadBox\" exists");
        assert!(!err.is_type_mismatch());
    }
}
