/// Convenience result type used across timeweave.
pub type TimeweaveResult<T> = Result<T, TimeweaveError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is produced deterministically from malformed input; the same input always fails
/// the same way.
#[derive(thiserror::Error, Debug)]
pub enum TimeweaveError {
    /// Reference to an unknown object id or an undeclared property.
    #[error("not found: {0}")]
    NotFound(String),

    /// Interpolation fraction outside `[0, 1]`.
    #[error("invalid fraction: {0}")]
    InvalidFraction(String),

    /// Negative/non-finite durations, or windows with `start > end`.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Composite tree whose timing cannot be derived unambiguously.
    #[error("malformed composite: {0}")]
    MalformedComposite(String),

    /// A property was written with a value of a different kind than its declared default.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Invalid user-provided document or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TimeweaveError {
    /// Build a [`TimeweaveError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`TimeweaveError::InvalidFraction`] value.
    pub fn invalid_fraction(msg: impl Into<String>) -> Self {
        Self::InvalidFraction(msg.into())
    }

    /// Build a [`TimeweaveError::InvalidInterval`] value.
    pub fn invalid_interval(msg: impl Into<String>) -> Self {
        Self::InvalidInterval(msg.into())
    }

    /// Build a [`TimeweaveError::MalformedComposite`] value.
    pub fn malformed_composite(msg: impl Into<String>) -> Self {
        Self::MalformedComposite(msg.into())
    }

    /// Build a [`TimeweaveError::TypeMismatch`] value.
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Build a [`TimeweaveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TimeweaveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for TimeweaveError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
