//! Error types for the registration wizard.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Draft store error: {0}")]
    Draft(#[from] DraftError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),
}

/// Registry lookup failures.
///
/// These are programming invariant violations, not user-recoverable
/// conditions: an unknown field or major reaching a registry means a caller
/// skipped validation. They abort the render path and are logged as defects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Unknown field name: {name}")]
    UnknownField { name: String },

    #[error("Unknown major: {value}")]
    UnknownMajor { value: String },
}

/// Wizard navigation failures, surfaced to the caller of `advance`/`retreat`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Validation failed for {} field(s)", .0.errors.len())]
    Validation(FieldErrors),

    #[error("No major resolved from the current navigation path")]
    MajorUnresolved,

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("The final step is reached through submission, not advance")]
    AtFinalStep,

    #[error("Session already submitted")]
    AlreadySubmitted,
}

/// Field-level validation errors for one step.
///
/// Recovered locally: advancement is blocked and the messages are shown
/// next to the offending fields. The session continues.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FieldErrors {
    pub errors: Vec<FieldError>,
}

/// One field's validation failure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Draft persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Submission failures, distinguished so the user sees the right message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Submission rejected by the server: {reason}")]
    Rejected { reason: String },
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
