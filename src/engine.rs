//! Engine facade: configuration, localities and the pattern registry in one place.

use crate::config::EngineConfig;
use crate::error::{ArrayFlowError, Result, ResultExt};
use crate::execution::{
    Locality, LocalityId, LocalityPool, MatchPattern, PatternRegistry, PrimitiveError,
    PrimitiveHandle, Site,
};
use crate::types::Value;
use std::sync::Arc;

/// Codename used for instances created through the engine unless overridden.
pub const DEFAULT_CODENAME: &str = "<engine>";

/// Builder for [`Engine`].
pub struct EngineBuilder {
    config: EngineConfig,
    codename: String,
    extra_patterns: Vec<MatchPattern>,
}

impl EngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            codename: DEFAULT_CODENAME.to_string(),
            extra_patterns: Vec::new(),
        }
    }

    /// Codename attached to every instance the engine creates.
    pub fn codename(mut self, codename: impl Into<String>) -> Self {
        self.codename = codename.into();
        self
    }

    /// Contribute an additional pattern next to the built-ins.
    pub fn pattern(mut self, pattern: MatchPattern) -> Self {
        self.extra_patterns.push(pattern);
        self
    }

    pub fn build(self) -> Result<Engine> {
        self.config.validate()?;

        let mut registry = PatternRegistry::with_builtins();
        for pattern in self.extra_patterns {
            registry
                .register(pattern)
                .context("Failed to register pattern")?;
        }

        let pool = LocalityPool::new(
            self.config.localities,
            self.config.worker_threads,
            &self.config.thread_name_prefix,
        )
        .map_err(|e| ArrayFlowError::Runtime(format!("Failed to start localities: {}", e)))?;

        tracing::info!(
            "Engine started with {} patterns on {} localities",
            registry.len(),
            pool.len()
        );

        Ok(Engine {
            config: self.config,
            codename: self.codename,
            pool,
            registry,
        })
    }
}

/// A running engine.
pub struct Engine {
    config: EngineConfig,
    codename: String,
    pool: Arc<LocalityPool>,
    registry: PatternRegistry,
}

impl Engine {
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    /// Engine with built-in patterns only.
    pub fn new(config: EngineConfig) -> Result<Self> {
        EngineBuilder::new(config).build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &Arc<LocalityPool> {
        &self.pool
    }

    pub fn locality(&self, id: LocalityId) -> Option<Locality> {
        self.pool.locality(id)
    }

    /// Instantiate primitive `name` on locality `locality`.
    pub fn create(
        &self,
        name: &str,
        locality: LocalityId,
        operands: Vec<Value>,
    ) -> Result<PrimitiveHandle> {
        let target = self.locality(locality).ok_or_else(|| {
            PrimitiveError::placement(
                &Site::new(name, self.codename.as_str()),
                format!(
                    "{} is not available ({} localities configured)",
                    locality,
                    self.pool.len()
                ),
            )
        })?;
        Ok(self
            .registry
            .create(name, target, operands, &self.codename)?)
    }

    /// Evaluate `root` to completion, blocking the calling thread.
    ///
    /// Must not be called from inside an async context.
    pub fn evaluate(&self, root: &PrimitiveHandle, args: Vec<Value>) -> Result<Value> {
        let future = root.evaluate(args);
        let result = self.pool.block_on(LocalityId::HERE, future).ok_or_else(|| {
            ArrayFlowError::Runtime("the engine has no localities".to_string())
        })?;
        Ok(result?)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("localities", &self.pool.len())
            .field("patterns", &self.registry.len())
            .field("codename", &self.codename)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(localities: usize) -> Engine {
        Engine::new(EngineConfig {
            localities,
            worker_threads: 1,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Engine::new(EngineConfig {
            localities: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(ArrayFlowError::Config(_))));
    }

    #[test]
    fn test_create_on_unknown_locality() {
        let engine = engine(1);
        let err = engine
            .create("sum", LocalityId(5), vec![Value::from(vec![1.0])])
            .unwrap_err();
        assert!(matches!(err.primitive(), Some(PrimitiveError::Placement { .. })));
    }

    #[test]
    fn test_evaluate_across_localities() {
        let engine = engine(2);
        let sum = engine
            .create("sum", LocalityId(1), vec![Value::from(vec![1.0, 2.0, 3.0])])
            .unwrap();
        let ge = engine
            .create("__ge", LocalityId(0), vec![sum.into(), Value::Int(5)])
            .unwrap();
        assert_eq!(engine.evaluate(&ge, vec![]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_duplicate_plugin_pattern() {
        let pattern = *PatternRegistry::with_builtins().get("sum").unwrap();
        let result = Engine::builder(EngineConfig::default())
            .pattern(pattern)
            .build();
        assert!(matches!(
            result.unwrap_err().primitive(),
            Some(PrimitiveError::DuplicatePattern(_))
        ));
    }
}
