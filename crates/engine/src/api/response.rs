//! Console responses and error classification.

use serde::{Deserialize, Serialize};
use sheetsmith_domain::DomainError;

use super::request::RequestError;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::{CharacterError, CreationError};

/// Result of a console request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseResult {
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ResponseResult {
    pub fn success<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => ResponseResult::Success { data: Some(value) },
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response");
                ResponseResult::error(ErrorCode::InternalError, "Failed to encode the response")
            }
        }
    }

    pub fn success_empty() -> Self {
        ResponseResult::Success { data: None }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ResponseResult::Error {
            code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseResult::Success { .. })
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ResponseResult::Error { code, .. } => Some(*code),
            ResponseResult::Success { .. } => None,
        }
    }

    /// Payload of a successful response.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseResult::Success { data } => data.as_ref(),
            ResponseResult::Error { .. } => None,
        }
    }
}

/// Error classification codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The line could not be parsed, or nothing is selected.
    BadRequest,
    NotFound,
    /// The request clashes with the current state: a second push, a reward
    /// already taken, a stale save.
    Conflict,
    /// A rules check rejected the input.
    ValidationError,
    InternalError,
}

impl From<&RequestError> for ResponseResult {
    fn from(error: &RequestError) -> Self {
        ResponseResult::error(ErrorCode::BadRequest, error.to_string())
    }
}

impl From<&DomainError> for ResponseResult {
    fn from(error: &DomainError) -> Self {
        let code = match error {
            DomainError::NotFound { .. } => ErrorCode::NotFound,
            DomainError::InvalidStateTransition(_) | DomainError::DuplicateSelection(_) => {
                ErrorCode::Conflict
            }
            DomainError::Validation(_)
            | DomainError::InsufficientResource { .. }
            | DomainError::Parse(_) => ErrorCode::ValidationError,
        };
        ResponseResult::error(code, error.to_string())
    }
}

impl From<&RepoError> for ResponseResult {
    fn from(error: &RepoError) -> Self {
        match error {
            RepoError::NotFound { .. } => {
                ResponseResult::error(ErrorCode::NotFound, error.to_string())
            }
            RepoError::VersionConflict { .. } => ResponseResult::error(
                ErrorCode::Conflict,
                "The sheet was changed elsewhere - reload it and try again",
            ),
            RepoError::Serialization(message) => ResponseResult::error(
                ErrorCode::BadRequest,
                format!("Unreadable character sheet: {}", message),
            ),
            RepoError::Database { operation, .. } => {
                tracing::error!(error = %error, operation = %operation, "Repository error");
                ResponseResult::error(
                    ErrorCode::InternalError,
                    format!("Failed to {} - please try again", operation),
                )
            }
        }
    }
}

impl From<&CharacterError> for ResponseResult {
    fn from(error: &CharacterError) -> Self {
        match error {
            CharacterError::CharacterNotFound(_) => {
                ResponseResult::error(ErrorCode::NotFound, error.to_string())
            }
            CharacterError::Domain(e) => e.into(),
            CharacterError::Repo(e) => e.into(),
        }
    }
}

impl From<&CreationError> for ResponseResult {
    fn from(error: &CreationError) -> Self {
        match error {
            CreationError::DraftNotFound(_) => {
                ResponseResult::error(ErrorCode::NotFound, error.to_string())
            }
            CreationError::Domain(e) => e.into(),
            CreationError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetsmith_domain::CharacterId;

    #[test]
    fn domain_errors_are_classified() {
        let cases = [
            (DomainError::not_found("skill", "Juggling"), ErrorCode::NotFound),
            (
                DomainError::invalid_state_transition("already pushed"),
                ErrorCode::Conflict,
            ),
            (DomainError::duplicate("taken"), ErrorCode::Conflict),
            (DomainError::insufficient("WP", 4, 1), ErrorCode::ValidationError),
            (DomainError::validation("STR 19"), ErrorCode::ValidationError),
        ];
        for (error, code) in cases {
            assert_eq!(ResponseResult::from(&error).error_code(), Some(code));
        }
    }

    #[test]
    fn stale_save_is_a_conflict() {
        let id = CharacterId::new();
        let error = CharacterError::Repo(RepoError::version_conflict(id, 1, 2));
        assert_eq!(
            ResponseResult::from(&error).error_code(),
            Some(ErrorCode::Conflict)
        );
    }

    #[test]
    fn database_details_stay_out_of_the_message() {
        let error = RepoError::database("save character", "disk full at /var/lib/x");
        let response = ResponseResult::from(&error);
        assert_eq!(response.error_code(), Some(ErrorCode::InternalError));
        let ResponseResult::Error { message, .. } = response else {
            panic!("expected an error");
        };
        assert!(!message.contains("/var/lib"));
    }

    #[test]
    fn serializes_with_status_tag() {
        let json =
            serde_json::to_value(ResponseResult::error(ErrorCode::NotFound, "nope")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "not_found");

        let json = serde_json::to_value(ResponseResult::success(3)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"], 3);
    }

    #[test]
    fn unencodable_payload_is_an_internal_error() {
        // Tuple keys cannot become JSON object keys
        let payload = std::collections::BTreeMap::from([((1, 2), 3)]);
        let response = ResponseResult::success(payload);
        assert_eq!(response.error_code(), Some(ErrorCode::InternalError));
        assert!(response.data().is_none());
    }
}
