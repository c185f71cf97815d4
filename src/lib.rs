//! # arrayflow: asynchronous dataflow engine for array-language primitives
//!
//! Source expressions compile into a graph of **primitives**. Each primitive is
//! a unit of computation (comparison, arithmetic, reduction, control flow)
//! that evaluates asynchronously and may be pinned to any of several compute
//! localities. A graph is built once and evaluated as often as needed with
//! different arguments.
//!
//! ## Architecture
//!
//! - **Values**: [`types::Value`] holds scalars, strings, `ndarray`-backed
//!   arrays, literal lists and handles to other primitives
//! - **Execution**: [`execution`] has the primitive abstraction, the pattern
//!   registry, the future-based dataflow helpers and the built-in primitives
//! - **Placement**: each locality is a dedicated tokio runtime; primitives are
//!   dispatched to their locality through the `Transport` seam
//! - **Analysis**: [`analysis`] has the streaming reducers behind the
//!   statistics primitives
//!
//! ## Configuration
//!
//! Engine configuration is read from `<config dir>/arrayflow/engine.toml`
//! (or any `.toml`/`.json` file); see [`config::EngineConfig`].
//!
//! ## Example
//!
//! ```ignore
//! use arrayflow::{config::EngineConfig, Engine, LocalityId, Value};
//!
//! let engine = Engine::new(EngineConfig::default())?;
//! let sum = engine.create("sum", LocalityId(0), vec![Value::from(vec![1.0, 2.0, 3.0])])?;
//! let ge = engine.create("__ge", LocalityId(0), vec![sum.into(), Value::Int(5)])?;
//! assert_eq!(engine.evaluate(&ge, vec![])?, Value::Bool(true));
//! ```

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod types;

// Re-export commonly used types
pub use config::{EngineConfig, LoggingConfig};
pub use engine::{Engine, EngineBuilder};
pub use error::{ArrayFlowError, Result};
pub use execution::{
    Locality, LocalityId, PatternRegistry, PrimitiveError, PrimitiveHandle, PrimitiveResult,
};
pub use types::{NumericArray, Value};
