//! Graph builders for tests

use arrayflow::{Locality, PatternRegistry, PrimitiveHandle, Value};

/// Builds primitive graphs from the built-in registry on one locality
pub struct GraphBuilder {
    registry: PatternRegistry,
    locality: Locality,
    codename: String,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            registry: PatternRegistry::with_builtins(),
            locality: Locality::here(),
            codename: "test".to_string(),
        }
    }

    pub fn on(mut self, locality: Locality) -> Self {
        self.locality = locality;
        self
    }

    pub fn codename(mut self, codename: &str) -> Self {
        self.codename = codename.to_string();
        self
    }

    /// Create `name` with `operands`, panicking on construction errors
    pub fn node(&self, name: &str, operands: Vec<Value>) -> PrimitiveHandle {
        self.try_node(name, operands)
            .unwrap_or_else(|e| panic!("failed to create {}: {}", name, e))
    }

    pub fn try_node(
        &self,
        name: &str,
        operands: Vec<Value>,
    ) -> arrayflow::PrimitiveResult<PrimitiveHandle> {
        self.registry
            .create(name, self.locality.clone(), operands, &self.codename)
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Float vector literal
pub fn vector(values: &[f64]) -> Value {
    Value::from(values.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_creates_nodes() {
        let graph = GraphBuilder::new().codename("builder");
        let node = graph.node("sum", vec![vector(&[1.0])]);
        assert_eq!(node.codename(), "builder");
        assert_eq!(node.kind(), "sum");
    }
}
