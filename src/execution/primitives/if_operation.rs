//! `if(cond, then[, else])`: evaluates the condition, then exactly one branch.

use crate::execution::dataflow::{boolean_operand, value_operand};
use crate::execution::error::PrimitiveResult;
use crate::execution::pattern::MatchPattern;
use crate::execution::placement::Locality;
use crate::execution::primitive::{
    Args, BuiltinPrimitive, EvalFuture, PrimitiveBase, PrimitiveHandle,
};
use crate::types::Value;
use futures::FutureExt;
use std::sync::Arc;

pub const MATCH_DATA: &[MatchPattern] = &[MatchPattern::new(
    "if",
    &["if(_1, _2)", "if(_1, _2, _3)"],
    create_if_operation,
)
.with_help("if(cond, then, else)\nEvaluates `then` if cond holds, `else` otherwise.")];

#[derive(Debug, Clone, Copy, Default)]
pub struct IfOperation;

impl IfOperation {
    pub fn kind(&self) -> &str {
        "if"
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let operands = Arc::clone(base.operands());
        let site = Arc::clone(base.site());
        let args = Arc::clone(args);
        async move {
            let branch = if boolean_operand(&operands[0], &args, &site).await? {
                operands.get(1)
            } else {
                operands.get(2)
            };
            match branch {
                Some(branch) => value_operand(branch, &args).await,
                None => Ok(Value::Empty),
            }
        }
        .boxed()
    }
}

pub fn create_if_operation(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    base.require_between(2, 3, "the if primitive requires two or three arguments")?;
    base.require_valid("the if primitive requires that all of its operands are valid")?;
    Ok(PrimitiveHandle::new(locality, base, BuiltinPrimitive::If(IfOperation)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn create(operands: Vec<Value>) -> PrimitiveHandle {
        create_if_operation(Locality::here(), operands, "if", "test").unwrap()
    }

    #[test]
    fn test_branches() {
        let p = create(vec![Value::Bool(true), Value::Int(1), Value::Int(2)]);
        assert_eq!(block_on(p.evaluate(vec![])), Ok(Value::Int(1)));
        let p = create(vec![Value::from(vec![0.0, 0.0]), Value::Int(1), Value::Int(2)]);
        assert_eq!(block_on(p.evaluate(vec![])), Ok(Value::Int(2)));
    }

    #[test]
    fn test_missing_else_is_empty() {
        let p = create(vec![Value::Int(0), Value::Int(1)]);
        assert_eq!(block_on(p.evaluate(vec![])), Ok(Value::Empty));
    }
}
