//! Error taxonomy for the tracker
//!
//! The analytics functions never fail on well-typed input, so everything here
//! comes from input validation or from the collaborators around the engine
//! (document store, identity, text generation).

use thiserror::Error;

/// Input that cannot become a record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("unknown muscle group: {0}")]
    UnknownMuscleGroup(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("a session needs at least one exercise")]
    NoExercises,

    #[error("exercise {0} needs at least one set")]
    NoSets(String),

    #[error("invalid set {0:?}, expected LOADxREPS or LOADxREPS@RIR")]
    InvalidSetSpec(String),
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        ValidationError::MissingField { field: field.into() }
    }

    pub fn out_of_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("malformed document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("text generation failed: {0}")]
    TextGeneration(String),

    #[error("{0} is not available yet")]
    ConfigurationUnavailable(&'static str),
}

impl EngineError {
    pub fn text_generation(message: impl Into<String>) -> Self {
        EngineError::TextGeneration(message.into())
    }

    /// Failure of an external collaborator (store or text generation)
    pub fn is_collaborator(&self) -> bool {
        matches!(
            self,
            EngineError::Storage(_) | EngineError::Document(_) | EngineError::TextGeneration(_)
        )
    }

    /// Message shown to the user at the CLI boundary
    pub fn user_message(&self) -> String {
        match self {
            EngineError::Validation(e) => format!("Please fix the input: {}", e),
            EngineError::ConfigurationUnavailable(what) => {
                format!("Nothing was saved: {} is not available.", what)
            }
            other => format!("Something went wrong: {}. Please try again.", other),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = ValidationError::out_of_range("rir", 7.0, 0.0, 5.0);
        assert_eq!(err.to_string(), "rir must be between 0 and 5, got 7");
    }

    #[test]
    fn test_collaborator_classification() {
        assert!(EngineError::text_generation("empty response").is_collaborator());
        assert!(!EngineError::ConfigurationUnavailable("store").is_collaborator());
        assert!(!EngineError::from(ValidationError::NoExercises).is_collaborator());
    }

    #[test]
    fn test_configuration_message_says_nothing_saved() {
        let msg = EngineError::ConfigurationUnavailable("training store").user_message();
        assert!(msg.contains("Nothing was saved"), "Message: {}", msg);
    }
}
