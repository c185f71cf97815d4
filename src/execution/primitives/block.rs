//! Expression blocks: `block(...)` runs its operands in order,
//! `parallel_block(...)` runs them concurrently. Both resolve to the value of
//! the last operand.

use crate::execution::dataflow::{join_operands, value_operand};
use crate::execution::error::PrimitiveResult;
use crate::execution::pattern::MatchPattern;
use crate::execution::placement::Locality;
use crate::execution::primitive::{
    Args, BuiltinPrimitive, EvalFuture, PrimitiveBase, PrimitiveHandle,
};
use crate::types::Value;
use futures::FutureExt;
use std::sync::Arc;

pub const MATCH_DATA: &[MatchPattern] = &[
    MatchPattern::new("block", &["block(__1)"], create_block)
        .with_help("block(expr...)\nEvaluates each expression in order; returns the last value."),
    MatchPattern::new("parallel_block", &["parallel_block(__1)"], create_parallel_block)
        .with_help("parallel_block(expr...)\nEvaluates all expressions concurrently; returns the last value."),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Block;

impl Block {
    pub fn kind(&self) -> &str {
        "block"
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let operands = Arc::clone(base.operands());
        let args = Arc::clone(args);
        async move {
            let mut last = Value::Empty;
            for operand in operands.iter() {
                last = value_operand(operand, &args).await?;
            }
            Ok(last)
        }
        .boxed()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelBlock;

impl ParallelBlock {
    pub fn kind(&self) -> &str {
        "parallel_block"
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let operands = Arc::clone(base.operands());
        let args = Arc::clone(args);
        async move {
            let mut values = join_operands(&operands, &args).await?;
            Ok(values.pop().unwrap_or_default())
        }
        .boxed()
    }
}

pub fn create_block(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    base.require_at_least(1, "the block primitive requires at least one argument")?;
    base.require_valid("the block primitive requires that all of its operands are valid")?;
    Ok(PrimitiveHandle::new(locality, base, BuiltinPrimitive::Block(Block)))
}

pub fn create_parallel_block(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    base.require_at_least(
        1,
        "the parallel_block_operation primitive requires at least one argument",
    )?;
    base.require_valid(
        "the parallel_block_operation primitive requires that all of its operands are valid",
    )?;
    Ok(PrimitiveHandle::new(
        locality,
        base,
        BuiltinPrimitive::ParallelBlock(ParallelBlock),
    ))
}
