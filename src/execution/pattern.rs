//! Pattern registry for primitive construction.
//!
//! Each primitive kind contributes one or more [`MatchPattern`] descriptors:
//! a canonical name, the call signatures the language front-end matches
//! against, a factory and optional help text. The registry is filled once at
//! start-up and only read afterwards.

use crate::execution::error::{PrimitiveError, PrimitiveResult, Site};
use crate::execution::name::PrimitiveName;
use crate::execution::placement::Locality;
use crate::execution::primitive::PrimitiveHandle;
use crate::execution::primitives;
use crate::types::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Builds a primitive instance: `(locality, operands, instance name, codename)`.
pub type Factory = fn(Locality, Vec<Value>, &str, &str) -> PrimitiveResult<PrimitiveHandle>;

/// Descriptor contributed by one primitive kind.
#[derive(Clone, Copy)]
pub struct MatchPattern {
    /// Canonical primitive name, e.g. `"__ge"`.
    pub name: &'static str,
    /// Call syntax strings, e.g. `"_1 >= _2"`.
    pub signatures: &'static [&'static str],
    pub factory: Factory,
    pub help: Option<&'static str>,
}

impl MatchPattern {
    pub const fn new(
        name: &'static str,
        signatures: &'static [&'static str],
        factory: Factory,
    ) -> Self {
        Self {
            name,
            signatures,
            factory,
            help: None,
        }
    }

    pub const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

impl fmt::Debug for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchPattern")
            .field("name", &self.name)
            .field("signatures", &self.signatures)
            .finish()
    }
}

/// Registered patterns, keyed by canonical name.
pub struct PatternRegistry {
    patterns: Vec<MatchPattern>,
    index: HashMap<&'static str, usize>,
    sequence: AtomicU64,
}

impl PatternRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            index: HashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// A registry holding every built-in primitive.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for pattern in primitives::builtin_patterns() {
            if let Err(e) = registry.register(pattern) {
                tracing::warn!("Skipping built-in pattern: {}", e);
            }
        }
        registry
    }

    pub fn register(&mut self, pattern: MatchPattern) -> PrimitiveResult<()> {
        if self.index.contains_key(pattern.name) {
            return Err(PrimitiveError::DuplicatePattern(pattern.name.to_string()));
        }
        self.index.insert(pattern.name, self.patterns.len());
        self.patterns.push(pattern);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&MatchPattern> {
        self.index.get(name).map(|&i| &self.patterns[i])
    }

    /// Pattern that lists `signature` among its call signatures.
    pub fn find_by_signature(&self, signature: &str) -> Option<&MatchPattern> {
        self.patterns
            .iter()
            .find(|p| p.signatures.iter().any(|s| *s == signature))
    }

    /// Patterns in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &MatchPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn help(&self, name: &str) -> Option<&'static str> {
        self.get(name).and_then(|p| p.help)
    }

    /// Instantiate `name`, assigning the next qualified instance name.
    pub fn create(
        &self,
        name: &str,
        locality: Locality,
        operands: Vec<Value>,
        codename: &str,
    ) -> PrimitiveResult<PrimitiveHandle> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let instance_name = PrimitiveName::new(name, sequence).to_string();
        self.create_named(name, locality, operands, &instance_name, codename)
    }

    /// Instantiate `name` under an explicit instance name.
    pub fn create_named(
        &self,
        name: &str,
        locality: Locality,
        operands: Vec<Value>,
        instance_name: &str,
        codename: &str,
    ) -> PrimitiveResult<PrimitiveHandle> {
        let pattern = self.get(name).ok_or_else(|| {
            PrimitiveError::unknown_identifier(
                &Site::new(instance_name, codename),
                format!("no primitive is registered under the name '{}'", name),
            )
        })?;
        (pattern.factory)(locality, operands, instance_name, codename)
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.patterns.iter().map(|p| p.name)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_builtins_are_registered_once() {
        let registry = PatternRegistry::with_builtins();
        let builtin_count = primitives::builtin_patterns().count();
        assert_eq!(registry.len(), builtin_count);
        for name in ["__ge", "for", "parallel_block", "sum", "var", "pi", "con"] {
            assert!(registry.get(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = PatternRegistry::with_builtins();
        let pattern = *registry.get("sum").unwrap();
        assert_eq!(
            registry.register(pattern),
            Err(PrimitiveError::DuplicatePattern("sum".into()))
        );
    }

    #[test]
    fn test_find_by_signature() {
        let registry = PatternRegistry::with_builtins();
        assert_eq!(registry.find_by_signature("_1 >= _2").map(|p| p.name), Some("__ge"));
        assert!(registry.find_by_signature("_1 ** _2").is_none());
    }

    #[test]
    fn test_create_assigns_qualified_names() {
        let registry = PatternRegistry::with_builtins();
        let a = registry
            .create("__ge", Locality::here(), vec![Value::Int(2), Value::Int(1)], "test")
            .unwrap();
        let b = registry
            .create("__ge", Locality::here(), vec![Value::Int(1), Value::Int(2)], "test")
            .unwrap();
        assert_eq!(a.name(), "/arrayflow/__ge$0");
        assert_eq!(b.name(), "/arrayflow/__ge$1");
        assert_eq!(a.codename(), "test");
        assert_eq!(block_on(a.evaluate(vec![])), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_create_unknown_primitive() {
        let registry = PatternRegistry::with_builtins();
        let err = registry
            .create("nonexistent", Locality::here(), vec![], "test")
            .unwrap_err();
        assert!(matches!(err, PrimitiveError::UnknownIdentifier { .. }));
    }
}
