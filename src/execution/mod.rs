//! Primitive execution graph.
//!
//! # Architecture
//!
//! ```text
//! PatternRegistry ──create──▶ PrimitiveHandle ──evaluate(args)──▶ EvalFuture
//!                                  │
//!                       operands: Value::Primitive(..)
//!                                  ▼
//!                          child PrimitiveHandles
//! ```
//!
//! A graph is built once from the [`PatternRegistry`] and evaluated as often
//! as needed. Evaluation is future-based: each instance joins its operand
//! futures and continues once all are ready. Instances are pinned to a
//! [`Locality`] and always run there.

pub mod broadcast;
pub mod dataflow;
pub mod error;
pub mod id;
pub mod name;
pub mod pattern;
pub mod placement;
pub mod primitive;
pub mod primitives;

pub use error::{PrimitiveError, PrimitiveResult, Site};
pub use id::LocalityId;
pub use name::{bare_name, PrimitiveName};
pub use pattern::{Factory, MatchPattern, PatternRegistry};
pub use placement::{Locality, LocalityPool, Transport};
pub use primitive::{
    no_args, AnyPrimitive, Args, BuiltinPrimitive, EvalFuture, PrimitiveBase, PrimitiveHandle,
    PrimitivePlugin,
};
