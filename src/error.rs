//! Error handling for arrayflow
//!
//! This module defines the crate-level error type and a Result alias used by
//! configuration, engine start-up and graph construction. Errors raised while
//! a graph evaluates are [`PrimitiveError`]s and are wrapped here unchanged.

use crate::execution::PrimitiveError;
use thiserror::Error;

/// Main error type for arrayflow operations
#[derive(Error, Debug)]
pub enum ArrayFlowError {
    /// Errors related to configuration loading/saving/validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors raised by primitive construction or evaluation
    #[error("Primitive error: {0}")]
    Primitive(#[from] PrimitiveError),

    /// Errors starting or driving the locality runtimes
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ArrayFlowError>,
    },
}

impl ArrayFlowError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ArrayFlowError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The primitive error at the root of this error, if any.
    pub fn primitive(&self) -> Option<&PrimitiveError> {
        match self {
            ArrayFlowError::Primitive(e) => Some(e),
            ArrayFlowError::WithContext { source, .. } => source.primitive(),
            _ => None,
        }
    }
}

/// Result type alias for arrayflow operations
pub type Result<T> = std::result::Result<T, ArrayFlowError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, PrimitiveError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ArrayFlowError::from(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ArrayFlowError::from(e).with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::Site;

    #[test]
    fn test_error_display() {
        let err = ArrayFlowError::Config("localities must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: localities must be at least 1"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = ArrayFlowError::Runtime("test".to_string());
        let with_ctx = err.with_context("Failed to start engine");
        assert!(with_ctx.to_string().contains("Failed to start engine"));
    }

    #[test]
    fn test_primitive_error_survives_context() {
        let site = Site::new("/arrayflow/mean$0", "demo");
        let result: std::result::Result<(), _> =
            Err(PrimitiveError::empty_sequence(&site, "empty sequences are not supported"));
        let err = result.context("Evaluating demo graph").unwrap_err();
        assert!(err.to_string().contains("/arrayflow/mean$0 (demo)"));
        assert!(matches!(
            err.primitive(),
            Some(PrimitiveError::EmptySequence { .. })
        ));
    }
}
