//! Mutable variables, `store` and positional argument access.

use crate::execution::dataflow::value_operand;
use crate::execution::error::{PrimitiveError, PrimitiveResult};
use crate::execution::pattern::MatchPattern;
use crate::execution::placement::Locality;
use crate::execution::primitive::{
    no_args, Args, BuiltinPrimitive, EvalFuture, PrimitiveBase, PrimitiveHandle,
};
use crate::types::Value;
use futures::FutureExt;
use std::sync::{Arc, PoisonError, RwLock};

pub const MATCH_DATA: &[MatchPattern] = &[
    MatchPattern::new("variable", &["variable(_1)"], create_variable)
        .with_help("variable(init)\nA named slot holding the value of `init` until overwritten by store()."),
    MatchPattern::new("store", &["store(_1, _2)"], create_store)
        .with_help("store(var, value)\nEvaluates `value` and writes it into the variable `var`."),
    MatchPattern::new("access_argument", &["access_argument(_1)"], create_access_argument)
        .with_help("access_argument(n)\nReturns the n-th argument of the current call."),
];

type Slot = Arc<RwLock<Value>>;

/// Named mutable slot.
///
/// The slot starts out holding the initialiser operand. Reading evaluates
/// whatever is in the slot, so a primitive-valued initialiser is evaluated on
/// each read until a `store` replaces it with a plain value.
#[derive(Debug, Clone)]
pub struct Variable {
    slot: Slot,
}

impl Variable {
    pub fn kind(&self) -> &str {
        "variable"
    }

    pub fn get(&self) -> Value {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, value: Value) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    pub fn eval(&self, _base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let current = self.get();
        let args = Arc::clone(args);
        async move { value_operand(&current, &args).await }.boxed()
    }
}

/// Evaluates its value operand and writes it into a variable.
#[derive(Debug, Clone)]
pub struct Store {
    target: Variable,
}

impl Store {
    pub fn kind(&self) -> &str {
        "store"
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let target = self.target.clone();
        let value = base.operands()[1].clone();
        let args = Arc::clone(args);
        async move {
            let value = value_operand(&value, &args).await?;
            target.set(value);
            Ok(Value::Empty)
        }
        .boxed()
    }
}

/// Positional access into the call arguments.
#[derive(Debug, Clone, Copy)]
pub struct AccessArgument {
    index: usize,
}

impl AccessArgument {
    pub fn kind(&self) -> &str {
        "access_argument"
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let index = self.index;
        let site = Arc::clone(base.site());
        let args = Arc::clone(args);
        async move {
            let arg = args.get(index).ok_or_else(|| {
                PrimitiveError::arity(
                    &site,
                    format!(
                        "argument {} requested but only {} argument(s) supplied",
                        index,
                        args.len()
                    ),
                )
            })?;
            value_operand(arg, &no_args()).await
        }
        .boxed()
    }
}

pub fn create_variable(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    base.require_exact(1, "the variable primitive requires exactly one operand")?;
    base.require_valid("the variable primitive requires a valid initial value")?;
    let slot = Arc::new(RwLock::new(base.operands()[0].clone()));
    Ok(PrimitiveHandle::new(
        locality,
        base,
        BuiltinPrimitive::Variable(Variable { slot }),
    ))
}

pub fn create_store(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    base.require_exact(2, "the store primitive requires exactly two operands")?;
    base.require_valid("the store primitive requires that both operands are valid")?;

    let target = match base.operands()[0].as_primitive().and_then(|p| p.as_builtin()) {
        Some(BuiltinPrimitive::Variable(var)) => var.clone(),
        _ => {
            return Err(PrimitiveError::invalid_operand(
                base.site(),
                "the first operand of store must be a variable",
            ))
        }
    };

    Ok(PrimitiveHandle::new(
        locality,
        base,
        BuiltinPrimitive::Store(Store { target }),
    ))
}

pub fn create_access_argument(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    base.require_exact(1, "the access_argument primitive requires exactly one operand")?;
    let index = match base.operands()[0].as_int() {
        Some(i) if i >= 0 => i as usize,
        _ => {
            return Err(PrimitiveError::invalid_operand(
                base.site(),
                "the access_argument primitive requires a non-negative integer index",
            ))
        }
    };
    Ok(PrimitiveHandle::new(
        locality,
        base,
        BuiltinPrimitive::Argument(AccessArgument { index }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn variable(init: Value) -> PrimitiveHandle {
        create_variable(Locality::here(), vec![init], "/arrayflow/variable$0", "test").unwrap()
    }

    #[test]
    fn test_store_then_read() {
        let var = variable(Value::Int(1));
        let store = create_store(
            Locality::here(),
            vec![Value::from(var.clone()), Value::Float(2.5)],
            "/arrayflow/store$0",
            "test",
        )
        .unwrap();

        assert_eq!(block_on(var.evaluate(vec![])), Ok(Value::Int(1)));
        assert_eq!(block_on(store.evaluate(vec![])), Ok(Value::Empty));
        assert_eq!(block_on(var.evaluate(vec![])), Ok(Value::Float(2.5)));
    }

    #[test]
    fn test_variable_rejects_empty_initial_value() {
        let err = create_variable(
            Locality::here(),
            vec![Value::Empty],
            "/arrayflow/variable$1",
            "test",
        )
        .unwrap_err();
        assert!(matches!(err, PrimitiveError::InvalidOperand { .. }));
    }

    #[test]
    fn test_store_requires_variable_target() {
        let err = create_store(
            Locality::here(),
            vec![Value::Int(1), Value::Int(2)],
            "/arrayflow/store$1",
            "test",
        )
        .unwrap_err();
        assert!(matches!(err, PrimitiveError::InvalidOperand { .. }));
    }

    #[test]
    fn test_access_argument() {
        let arg = create_access_argument(
            Locality::here(),
            vec![Value::Int(1)],
            "/arrayflow/access_argument$0",
            "test",
        )
        .unwrap();
        assert_eq!(
            block_on(arg.evaluate(vec![Value::Int(10), Value::from("x")])),
            Ok(Value::from("x"))
        );
        let err = block_on(arg.evaluate(vec![Value::Int(10)])).unwrap_err();
        assert!(matches!(err, PrimitiveError::Arity { .. }));
    }
}
