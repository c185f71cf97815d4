//! Qualified primitive instance names.
//!
//! Instances are named `/arrayflow/<primitive>$<sequence>/<compile_id>$<line>$<column>`.
//! The trailing location part is optional. Name-driven primitives (the
//! `pi()` family) recover their bare name from this form.

use std::fmt;

const PREFIX: &str = "/arrayflow/";

/// Parsed form of a qualified instance name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimitiveName {
    pub primitive: String,
    pub sequence: Option<u64>,
    pub compile_id: Option<u64>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl PrimitiveName {
    pub fn new(primitive: impl Into<String>, sequence: u64) -> Self {
        Self {
            primitive: primitive.into(),
            sequence: Some(sequence),
            ..Default::default()
        }
    }

    /// Attach the source location the instance was compiled from.
    pub fn at(mut self, compile_id: u64, line: u32, column: u32) -> Self {
        self.compile_id = Some(compile_id);
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Parse a qualified name. Returns `None` for anything not in qualified form.
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(PREFIX)?;
        let (head, tail) = match rest.split_once('/') {
            Some((head, tail)) => (head, Some(tail)),
            None => (rest, None),
        };

        let mut head_parts = head.split('$');
        let primitive = head_parts.next().filter(|p| !p.is_empty())?.to_string();
        let sequence = match head_parts.next() {
            Some(s) => Some(s.parse().ok()?),
            None => None,
        };
        if head_parts.next().is_some() {
            return None;
        }

        let mut parsed = Self {
            primitive,
            sequence,
            ..Default::default()
        };

        if let Some(tail) = tail.filter(|t| !t.is_empty()) {
            let mut parts = tail.split('$');
            parsed.compile_id = Some(parts.next()?.parse().ok()?);
            parsed.line = Some(parts.next()?.parse().ok()?);
            parsed.column = Some(parts.next()?.parse().ok()?);
            if parts.next().is_some() {
                return None;
            }
        }

        Some(parsed)
    }
}

impl fmt::Display for PrimitiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.primitive)?;
        if let Some(sequence) = self.sequence {
            write!(f, "${}", sequence)?;
        }
        if let (Some(id), Some(line), Some(column)) = (self.compile_id, self.line, self.column) {
            write!(f, "/{}${}${}", id, line, column)?;
        }
        Ok(())
    }
}

/// Bare primitive name embedded in `name`, or `name` itself when unqualified.
pub fn bare_name(name: &str) -> String {
    PrimitiveName::parse(name)
        .map(|parsed| parsed.primitive)
        .unwrap_or_else(|| name.to_string())
}
