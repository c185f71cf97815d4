//! Element-wise comparisons: `>`, `>=`, `<`, `<=`, `==`, `!=`.

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
    MatchPattern::new("__gt", &["_1 > _2"], create_greater)
        .with_help("greater(x, y)\nElement-wise x > y."),
    MatchPattern::new("__ge", &["_1 >= _2"], create_greater_equal)
        .with_help("greater_equal(x, y)\nElement-wise x >= y."),
    MatchPattern::new("__lt", &["_1 < _2"], create_less)
        .with_help("less(x, y)\nElement-wise x < y."),
    MatchPattern::new("__le", &["_1 <= _2"], create_less_equal)
        .with_help("less_equal(x, y)\nElement-wise x <= y."),
    MatchPattern::new("__eq", &["_1 == _2"], create_equal)
        .with_help("equal(x, y)\nElement-wise x == y."),
    MatchPattern::new("__ne", &["_1 != _2"], create_not_equal)
        .with_help("not_equal(x, y)\nElement-wise x != y."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
}

impl CompareOp {
    /// Registered primitive name.
    pub fn name(&self) -> &'static str {
        match self {
            CompareOp::Greater => "__gt",
            CompareOp::GreaterEqual => "__ge",
            CompareOp::Less => "__lt",
            CompareOp::LessEqual => "__le",
            CompareOp::Equal => "__eq",
            CompareOp::NotEqual => "__ne",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Greater => ">",
            CompareOp::GreaterEqual => ">=",
            CompareOp::Less => "<",
            CompareOp::LessEqual => "<=",
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
        }
    }

    #[inline]
    pub fn apply<T: PartialOrd + ?Sized>(&self, lhs: &T, rhs: &T) -> bool {
        match self {
            CompareOp::Greater => lhs > rhs,
            CompareOp::GreaterEqual => lhs >= rhs,
            CompareOp::Less => lhs < rhs,
            CompareOp::LessEqual => lhs <= rhs,
            CompareOp::Equal => lhs == rhs,
            CompareOp::NotEqual => lhs != rhs,
        }
    }
}

/// Compare two evaluated values.
///
/// Strings compare lexicographically. Integer operands, scalar or array, are
/// compared exactly as `i64`; every other numeric pair goes through the
/// broadcasting kernel as `f64`.
pub fn compare_values(
    op: CompareOp,
    lhs: &Value,
    rhs: &Value,
    site: &Site,
) -> PrimitiveResult<Value> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => {
            return Ok(Value::Bool(op.apply(a.as_str(), b.as_str())));
        }
        (Value::Int(a), Value::Int(b)) => return Ok(Value::Bool(op.apply(a, b))),
        _ => {}
    }
    if let (Some(a), Some(b)) = (lhs.to_int_array(), rhs.to_int_array()) {
        let result = broadcast_binary(a.view(), b.view(), |x, y| op.apply(&x, &y), site)?;
        return Ok(Value::from_bool_array(result));
    }
    match (lhs.to_numeric(), rhs.to_numeric()) {
        (Some(a), Some(b)) => {
            let result = broadcast_binary(a.view(), b.view(), |x, y| op.apply(&x, &y), site)?;
            Ok(Value::from_bool_array(result))
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
pub struct Comparison {
    op: CompareOp,
}

impl Comparison {
    pub fn new(op: CompareOp) -> Self {
        Self { op }
    }

    pub fn op(&self) -> CompareOp {
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
            compare_values(op, &values[0], &values[1], &site)
        }
        .boxed()
    }
}

fn create(
    op: CompareOp,
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
            "the '{}' primitive requires that the arguments given by the operands array are valid",
            op.symbol()
        ))?;
    }
    Ok(PrimitiveHandle::new(
        locality,
        base,
        BuiltinPrimitive::Compare(Comparison::new(op)),
    ))
}

pub fn create_greater(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(CompareOp::Greater, locality, operands, name, codename)
}

pub fn create_greater_equal(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(CompareOp::GreaterEqual, locality, operands, name, codename)
}

pub fn create_less(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(CompareOp::Less, locality, operands, name, codename)
}

pub fn create_less_equal(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(CompareOp::LessEqual, locality, operands, name, codename)
}

pub fn create_equal(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(CompareOp::Equal, locality, operands, name, codename)
}

pub fn create_not_equal(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(CompareOp::NotEqual, locality, operands, name, codename)
}
