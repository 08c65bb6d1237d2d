/// Result alias used across flipkit's fallible boundaries.
pub type FlipResult<T> = Result<T, FlipError>;

/// Errors raised while loading configuration or parsing host-provided values.
///
/// Nothing on the animation path returns these to a caller: a firing hook degrades to the
/// node's natural state and logs instead.
#[derive(thiserror::Error, Debug)]
pub enum FlipError {
    /// Invalid transition configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A transform string that could not be resolved to a matrix.
    #[error("transform error: {0}")]
    Transform(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlipError {
    /// Build a [`FlipError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FlipError::Transform`].
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::Transform(msg.into())
    }

    /// Build a [`FlipError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FlipError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
