//! Conditional loops: `for(init, cond, step, body)` and `while(cond, body)`.
//!
//! Each evaluation call drives its own [`LoopTask`] through an explicit state
//! machine. Every iteration ends with a cooperative yield, so a long loop
//! never monopolises a worker and never grows the stack.

use crate::execution::dataflow::{extract_boolean, value_operand};
use crate::execution::error::{PrimitiveResult, Site};
use crate::execution::pattern::MatchPattern;
use crate::execution::placement::Locality;
use crate::execution::primitive::{
    Args, BuiltinPrimitive, EvalFuture, PrimitiveBase, PrimitiveHandle,
};
use crate::types::Value;
use futures::FutureExt;
use std::sync::Arc;

pub const MATCH_DATA: &[MatchPattern] = &[
    MatchPattern::new("for", &["for(_1, _2, _3, _4)"], create_for_operation).with_help(
        "for(init, cond, step, body)\n\
         Evaluates init once, then body and step while cond holds.\n\
         Returns the value of the last body evaluation.",
    ),
    MatchPattern::new("while", &["while(_1, _2)"], create_while_operation).with_help(
        "while(cond, body)\n\
         Evaluates body while cond holds.\n\
         Returns the value of the last body evaluation.",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Init,
    CondCheck,
    Body,
    Step,
    Done,
}

/// Per-call loop state.
struct LoopTask {
    init: Option<Value>,
    cond: Value,
    step: Option<Value>,
    body: Value,
    args: Args,
    site: Arc<Site>,
    result: Value,
    iterations: u64,
}

impl LoopTask {
    async fn run(mut self) -> PrimitiveResult<Value> {
        let mut state = LoopState::Init;
        loop {
            state = match state {
                LoopState::Init => {
                    if let Some(init) = &self.init {
                        value_operand(init, &self.args).await?;
                    }
                    LoopState::CondCheck
                }
                LoopState::CondCheck => {
                    let cond = value_operand(&self.cond, &self.args).await?;
                    if extract_boolean(&cond, &self.site)? {
                        LoopState::Body
                    } else {
                        LoopState::Done
                    }
                }
                LoopState::Body => {
                    self.result = value_operand(&self.body, &self.args).await?;
                    self.iterations += 1;
                    tracing::trace!("{}: iteration {} done", self.site, self.iterations);
                    LoopState::Step
                }
                LoopState::Step => {
                    if let Some(step) = &self.step {
                        value_operand(step, &self.args).await?;
                    }
                    tokio::task::yield_now().await;
                    LoopState::CondCheck
                }
                LoopState::Done => return Ok(self.result),
            };
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ForOperation;

impl ForOperation {
    pub fn kind(&self) -> &str {
        "for"
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let operands = base.operands();
        LoopTask {
            init: Some(operands[0].clone()),
            cond: operands[1].clone(),
            step: Some(operands[2].clone()),
            body: operands[3].clone(),
            args: Arc::clone(args),
            site: Arc::clone(base.site()),
            result: Value::Empty,
            iterations: 0,
        }
        .run()
        .boxed()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WhileOperation;

impl WhileOperation {
    pub fn kind(&self) -> &str {
        "while"
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let operands = base.operands();
        LoopTask {
            init: None,
            cond: operands[0].clone(),
            step: None,
            body: operands[1].clone(),
            args: Arc::clone(args),
            site: Arc::clone(base.site()),
            result: Value::Empty,
            iterations: 0,
        }
        .run()
        .boxed()
    }
}

pub fn create_for_operation(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    base.require_exact(4, "the for_operation primitive requires exactly four arguments")?;
    base.require_valid(
        "the for_operation primitive requires that the arguments given by the operands array are valid",
    )?;
    Ok(PrimitiveHandle::new(locality, base, BuiltinPrimitive::For(ForOperation)))
}

pub fn create_while_operation(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    base.require_exact(2, "the while_operation primitive requires exactly two arguments")?;
    base.require_valid(
        "the while_operation primitive requires that the arguments given by the operands array are valid",
    )?;
    Ok(PrimitiveHandle::new(locality, base, BuiltinPrimitive::While(WhileOperation)))
}
