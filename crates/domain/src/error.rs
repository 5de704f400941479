//! Unified error types for the rules engine
//!
//! Every rejection the engine produces is local and recoverable: the caller is
//! expected to surface it as a message and let the player retry.

use thiserror::Error;

use crate::value_objects::DiceParseError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., attribute outside its creation range)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A resource pool cannot cover a cost
    #[error("Insufficient {resource}: {required} required, {available} available")]
    InsufficientResource {
        resource: &'static str,
        required: i32,
        available: i32,
    },

    /// State transition not allowed (e.g., pushing a roll twice)
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// The selection was already made (e.g., training a trained skill)
    #[error("Duplicate selection: {0}")]
    DuplicateSelection(String),

    /// Unknown named thing (skill, ability, spell)
    #[error("Not found: {kind} '{name}'")]
    NotFound { kind: &'static str, name: String },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for rule violations on caller input.
    ///
    /// # Example
    /// ```ignore
    /// if !(3..=18).contains(&raw) {
    ///     return Err(DomainError::validation("STR must be between 3 and 18"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an insufficient resource error
    pub fn insufficient(resource: &'static str, required: i32, available: i32) -> Self {
        Self::InsufficientResource {
            resource,
            required,
            available,
        }
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    /// Create a duplicate selection error
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::DuplicateSelection(msg.into())
    }

    /// Create a not found error
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("STR must be between 3 and 18");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: STR must be between 3 and 18"
        );
    }

    #[test]
    fn test_insufficient_resource_error() {
        let err = DomainError::insufficient("WP", 3, 1);
        assert_eq!(err.to_string(), "Insufficient WP: 3 required, 1 available");
    }

    #[test]
    fn test_duplicate_selection_error() {
        let err = DomainError::duplicate("Sneaking is already trained");
        assert!(matches!(err, DomainError::DuplicateSelection(_)));
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("skill", "Juggling");
        assert_eq!(err.to_string(), "Not found: skill 'Juggling'");
    }

    #[test]
    fn test_from_dice_parse_error() {
        let domain_err: DomainError = DiceParseError::Empty.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
        assert!(domain_err.to_string().contains("Empty dice formula"));
    }
}
