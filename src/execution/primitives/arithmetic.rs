//! Element-wise arithmetic: `+`, `-`, `*`, `/`.

use crate::execution::broadcast::broadcast_binary;
use crate::execution::dataflow::join_operands;
use crate::execution::error::{PrimitiveError, PrimitiveResult, Site};
use crate::execution::pattern::MatchPattern;
use crate::execution::placement::Locality;
use crate::execution::primitive::{
    Args, BuiltinPrimitive, EvalFuture, PrimitiveBase, PrimitiveHandle,
};
use crate::types::Value;
use futures::FutureExt;
use std::sync::Arc;

pub const MATCH_DATA: &[MatchPattern] = &[
    MatchPattern::new("__add", &["_1 + _2"], create_add),
    MatchPattern::new("__sub", &["_1 - _2"], create_sub),
    MatchPattern::new("__mul", &["_1 * _2"], create_mul),
    MatchPattern::new("__div", &["_1 / _2"], create_div),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    pub fn name(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "__add",
            ArithmeticOp::Sub => "__sub",
            ArithmeticOp::Mul => "__mul",
            ArithmeticOp::Div => "__div",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
        }
    }

    #[inline]
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            ArithmeticOp::Add => lhs + rhs,
            ArithmeticOp::Sub => lhs - rhs,
            ArithmeticOp::Mul => lhs * rhs,
            ArithmeticOp::Div => lhs / rhs,
        }
    }

    /// Exact integer result, `None` on overflow or for division.
    fn apply_int(&self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            ArithmeticOp::Add => lhs.checked_add(rhs),
            ArithmeticOp::Sub => lhs.checked_sub(rhs),
            ArithmeticOp::Mul => lhs.checked_mul(rhs),
            ArithmeticOp::Div => None,
        }
    }
}

/// Combine two evaluated values.
pub fn arithmetic_values(
    op: ArithmeticOp,
    lhs: &Value,
    rhs: &Value,
    site: &Site,
) -> PrimitiveResult<Value> {
    if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
        if let Some(exact) = op.apply_int(*a, *b) {
            return Ok(Value::Int(exact));
        }
    }
    match (lhs.to_numeric(), rhs.to_numeric()) {
        (Some(a), Some(b)) => {
            let result = broadcast_binary(a.view(), b.view(), |x, y| op.apply(x, y), site)?;
            Ok(Value::from_f64_array(result))
        }
        _ => Err(PrimitiveError::incompatible(
            site,
            format!(
                "the operands of '{}' have incompatible types: {} and {}",
                op.symbol(),
                lhs.kind_name(),
                rhs.kind_name()
            ),
        )),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Arithmetic {
    op: ArithmeticOp,
}

impl Arithmetic {
    pub fn op(&self) -> ArithmeticOp {
        self.op
    }

    pub fn kind(&self) -> &str {
        self.op.name()
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let op = self.op;
        let site = Arc::clone(base.site());
        let (operands, args) = base.bind(args);
        async move {
            if operands.len() != 2 {
                return Err(PrimitiveError::arity(
                    &site,
                    format!("the '{}' primitive requires exactly two operands", op.symbol()),
                ));
            }
            let values = join_operands(&operands, &args).await?;
            arithmetic_values(op, &values[0], &values[1], &site)
        }
        .boxed()
    }
}

fn create(
    op: ArithmeticOp,
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    if !base.no_operands() {
        base.require_exact(
            2,
            &format!("the '{}' primitive requires exactly two operands", op.symbol()),
        )?;
        base.require_valid(&format!(
            "the '{}' primitive requires that its operands are valid",
            op.symbol()
        ))?;
    }
    Ok(PrimitiveHandle::new(
        locality,
        base,
        BuiltinPrimitive::Arithmetic(Arithmetic { op }),
    ))
}

pub fn create_add(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(ArithmeticOp::Add, locality, operands, name, codename)
}

pub fn create_sub(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(ArithmeticOp::Sub, locality, operands, name, codename)
}

pub fn create_mul(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(ArithmeticOp::Mul, locality, operands, name, codename)
}

pub fn create_div(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(ArithmeticOp::Div, locality, operands, name, codename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumericArray;
    use futures::executor::block_on;

    fn site() -> Site {
        Site::new("/arrayflow/__sub$0", "test")
    }

    #[test]
    fn test_integers_stay_exact() {
        let r = arithmetic_values(ArithmeticOp::Add, &Value::Int(2), &Value::Int(3), &site());
        assert_eq!(r, Ok(Value::Int(5)));
        let r = arithmetic_values(ArithmeticOp::Div, &Value::Int(3), &Value::Int(2), &site());
        assert_eq!(r, Ok(Value::Float(1.5)));
        let r = arithmetic_values(ArithmeticOp::Mul, &Value::Int(i64::MAX), &Value::Int(2), &site());
        assert!(matches!(r, Ok(Value::Float(_))));
    }

    #[test]
    fn test_matrix_minus_vector() {
        let m = Value::Array(NumericArray::matrix(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap());
        let v = Value::from(vec![1.0, 2.0]);
        let r = arithmetic_values(ArithmeticOp::Sub, &m, &v, &site()).unwrap();
        assert_eq!(
            r,
            Value::Array(NumericArray::matrix(2, 2, vec![4.0, 4.0, 6.0, 6.0]).unwrap())
        );
    }

    #[test]
    fn test_string_operand_is_incompatible() {
        let r = arithmetic_values(ArithmeticOp::Add, &Value::from("a"), &Value::Int(1), &site());
        assert!(matches!(r, Err(PrimitiveError::IncompatibleOperands { .. })));
    }

    #[test]
    fn test_evaluates_nested_operands() {
        let inner = create_mul(Locality::here(), vec![Value::Int(4), Value::Float(0.5)], "mul", "test")
            .unwrap();
        let outer = create_sub(Locality::here(), vec![Value::from(inner), Value::Int(1)], "sub", "test")
            .unwrap();
        assert_eq!(block_on(outer.evaluate(vec![])), Ok(Value::Float(1.0)));
    }
}
