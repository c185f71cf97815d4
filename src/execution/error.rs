//! Primitive-level error types.
//!
//! Every failure raised while building or evaluating a primitive graph carries
//! the [`Site`] of the primitive that raised it: its qualified instance name and
//! the codename of the file it was compiled from. Together with the cause string
//! this triple is what tooling matches on, so the `Display` format is stable.

use std::fmt;
use thiserror::Error;

/// Diagnostic location of a primitive instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Site {
    /// Fully qualified instance name, e.g. `/arrayflow/__ge$3/0$1$4`.
    pub name: String,
    /// Tag of the source the instance was compiled from.
    pub codename: String,
}

impl Site {
    pub fn new(name: impl Into<String>, codename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codename: codename.into(),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() {
            "<unnamed>"
        } else {
            &self.name
        };
        if self.codename.is_empty() {
            write!(f, "{}", name)
        } else {
            write!(f, "{} ({})", name, self.codename)
        }
    }
}

/// Errors raised by primitive construction and evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrimitiveError {
    /// Wrong operand (or argument) count.
    #[error("{site}: {message}")]
    Arity { site: Site, message: String },

    /// Malformed or empty operand.
    #[error("{site}: {message}")]
    InvalidOperand { site: Site, message: String },

    /// Operands of compatible rank whose extents disagree.
    #[error("{site}: {message}")]
    ShapeMismatch { site: Site, message: String },

    /// Operand kinds or ranks that no kernel handles.
    #[error("{site}: {message}")]
    IncompatibleOperands { site: Site, message: String },

    /// A statistic that needs at least one element got none.
    #[error("{site}: {message}")]
    EmptySequence { site: Site, message: String },

    /// Lookup of a name that is not known.
    #[error("{site}: {message}")]
    UnknownIdentifier { site: Site, message: String },

    /// The locality a primitive is pinned to could not run it.
    #[error("{site}: {message}")]
    Placement { site: Site, message: String },

    #[error("pattern '{0}' is already registered")]
    DuplicatePattern(String),
}

impl PrimitiveError {
    pub fn arity(site: &Site, message: impl Into<String>) -> Self {
        PrimitiveError::Arity {
            site: site.clone(),
            message: message.into(),
        }
    }

    pub fn invalid_operand(site: &Site, message: impl Into<String>) -> Self {
        PrimitiveError::InvalidOperand {
            site: site.clone(),
            message: message.into(),
        }
    }

    pub fn shape_mismatch(site: &Site, message: impl Into<String>) -> Self {
        PrimitiveError::ShapeMismatch {
            site: site.clone(),
            message: message.into(),
        }
    }

    pub fn incompatible(site: &Site, message: impl Into<String>) -> Self {
        PrimitiveError::IncompatibleOperands {
            site: site.clone(),
            message: message.into(),
        }
    }

    pub fn empty_sequence(site: &Site, message: impl Into<String>) -> Self {
        PrimitiveError::EmptySequence {
            site: site.clone(),
            message: message.into(),
        }
    }

    pub fn unknown_identifier(site: &Site, message: impl Into<String>) -> Self {
        PrimitiveError::UnknownIdentifier {
            site: site.clone(),
            message: message.into(),
        }
    }

    pub fn placement(site: &Site, message: impl Into<String>) -> Self {
        PrimitiveError::Placement {
            site: site.clone(),
            message: message.into(),
        }
    }

    /// The site of the primitive that raised this error, if any.
    pub fn site(&self) -> Option<&Site> {
        match self {
            PrimitiveError::Arity { site, .. }
            | PrimitiveError::InvalidOperand { site, .. }
            | PrimitiveError::ShapeMismatch { site, .. }
            | PrimitiveError::IncompatibleOperands { site, .. }
            | PrimitiveError::EmptySequence { site, .. }
            | PrimitiveError::UnknownIdentifier { site, .. }
            | PrimitiveError::Placement { site, .. } => Some(site),
            PrimitiveError::DuplicatePattern(_) => None,
        }
    }

    /// Human-readable cause, without the site prefix.
    pub fn message(&self) -> &str {
        match self {
            PrimitiveError::Arity { message, .. }
            | PrimitiveError::InvalidOperand { message, .. }
            | PrimitiveError::ShapeMismatch { message, .. }
            | PrimitiveError::IncompatibleOperands { message, .. }
            | PrimitiveError::EmptySequence { message, .. }
            | PrimitiveError::UnknownIdentifier { message, .. }
            | PrimitiveError::Placement { message, .. } => message,
            PrimitiveError::DuplicatePattern(name) => name,
        }
    }
}

pub type PrimitiveResult<T> = std::result::Result<T, PrimitiveError>;
