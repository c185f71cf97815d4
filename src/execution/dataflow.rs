//! Continuation helpers shared by all primitives.
//!
//! A primitive evaluates by turning each operand into a future, joining them
//! and transforming the joined values. Literal operands become ready futures
//! without boxing; primitive operands are evaluated on their own locality.
//!
//! The join is unordered: sibling operands run concurrently and may finish in
//! any order, but the continuation only sees the results once all are ready.
//! The first failure ends the join and drops the remaining siblings.

use crate::execution::error::{PrimitiveError, PrimitiveResult, Site};
use crate::execution::primitive::{Args, EvalFuture};
use crate::types::Value;
use futures::future::{self, Either, Ready};
use std::sync::Arc;

/// Future for a single operand.
pub type OperandFuture = Either<Ready<PrimitiveResult<Value>>, EvalFuture>;

/// Future resolving to the value of `operand` under `args`.
pub fn value_operand(operand: &Value, args: &Args) -> OperandFuture {
    match operand {
        Value::Primitive(p) => Either::Right(p.evaluate_shared(Arc::clone(args))),
        literal => Either::Left(future::ready(Ok(literal.clone()))),
    }
}

/// One future per operand, in operand order.
pub fn map_operands(operands: &[Value], args: &Args) -> Vec<OperandFuture> {
    operands
        .iter()
        .map(|operand| value_operand(operand, args))
        .collect()
}

/// Evaluate all operands concurrently and collect their values in order.
pub async fn join_operands(operands: &[Value], args: &Args) -> PrimitiveResult<Vec<Value>> {
    let pending = map_operands(operands, args);
    tracing::trace!("Joining {} operands", pending.len());
    future::try_join_all(pending).await
}

/// Boolean view of an evaluated value.
///
/// Uses [`Value::truthy`]: arrays are true when any element is non-zero.
pub fn extract_boolean(value: &Value, site: &Site) -> PrimitiveResult<bool> {
    value.truthy().ok_or_else(|| {
        PrimitiveError::incompatible(
            site,
            format!("a {} value can't be used as a condition", value.kind_name()),
        )
    })
}

pub async fn boolean_operand(operand: &Value, args: &Args, site: &Site) -> PrimitiveResult<bool> {
    let value = value_operand(operand, args).await?;
    extract_boolean(&value, site)
}

pub async fn string_operand(operand: &Value, args: &Args, site: &Site) -> PrimitiveResult<String> {
    match value_operand(operand, args).await? {
        Value::Str(s) => Ok(s),
        other => Err(PrimitiveError::invalid_operand(
            site,
            format!("expected a string operand, got {}", other.kind_name()),
        )),
    }
}

pub async fn integer_operand(operand: &Value, args: &Args, site: &Site) -> PrimitiveResult<i64> {
    let value = value_operand(operand, args).await?;
    value.as_int().ok_or_else(|| {
        PrimitiveError::invalid_operand(
            site,
            format!("expected an integer operand, got {}", value.kind_name()),
        )
    })
}
