//! Statistics primitives: `amin`, `amax`, `sum`, `prod`, `logsumexp`, `mean`,
//! `var` and `std`, each with an optional axis.

use crate::analysis::statistics::{EmptySequence, Statistic};
use crate::execution::dataflow::join_operands;
use crate::execution::error::{PrimitiveError, PrimitiveResult, Site};
use crate::execution::pattern::MatchPattern;
use crate::execution::placement::Locality;
use crate::execution::primitive::{
    Args, BuiltinPrimitive, EvalFuture, PrimitiveBase, PrimitiveHandle,
};
use crate::types::Value;
use futures::FutureExt;
use ndarray::{ArrayD, Axis, RemoveAxis};
use std::sync::Arc;

pub const MATCH_DATA: &[MatchPattern] = &[
    MatchPattern::new("amin", &["amin(_1)", "amin(_1, _2)"], create_amin)
        .with_help("amin(a, axis)\nMinimum of `a`, or of each lane along `axis`."),
    MatchPattern::new("amax", &["amax(_1)", "amax(_1, _2)"], create_amax)
        .with_help("amax(a, axis)\nMaximum of `a`, or of each lane along `axis`."),
    MatchPattern::new("sum", &["sum(_1)", "sum(_1, _2)"], create_sum)
        .with_help("sum(a, axis)\nSum of `a`, or of each lane along `axis`."),
    MatchPattern::new("prod", &["prod(_1)", "prod(_1, _2)"], create_prod)
        .with_help("prod(a, axis)\nProduct of `a`, or of each lane along `axis`."),
    MatchPattern::new("logsumexp", &["logsumexp(_1)", "logsumexp(_1, _2)"], create_logsumexp)
        .with_help("logsumexp(a, axis)\nln(sum(exp(a))), over `a` or each lane along `axis`."),
    MatchPattern::new("mean", &["mean(_1)", "mean(_1, _2)"], create_mean)
        .with_help("mean(a, axis)\nArithmetic mean. Fails on empty input."),
    MatchPattern::new("var", &["var(_1)", "var(_1, _2)"], create_var)
        .with_help("var(a, axis)\nPopulation variance. Fails on empty input."),
    MatchPattern::new("std", &["std(_1)", "std(_1, _2)"], create_std)
        .with_help("std(a, axis)\nPopulation standard deviation. Fails on empty input."),
];

/// Reduce `values` as a whole, or along `axis` when given.
pub fn reduce_values(
    statistic: Statistic,
    values: &Value,
    axis: Option<i64>,
    site: &Site,
) -> PrimitiveResult<Value> {
    let array = values.to_numeric().ok_or_else(|| {
        PrimitiveError::incompatible(
            site,
            format!(
                "{} can't reduce a value of kind {}",
                statistic.name(),
                values.kind_name()
            ),
        )
    })?;
    let empty = |e: EmptySequence| PrimitiveError::empty_sequence(site, e.to_string());

    let Some(axis) = axis else {
        return statistic.reduce(array.view()).map(Value::Float).map_err(empty);
    };

    let rank = array.ndim() as i64;
    let normalized = if axis < 0 { axis + rank } else { axis };
    if normalized < 0 || normalized >= rank {
        return Err(PrimitiveError::invalid_operand(
            site,
            format!(
                "axis {} is out of range for an operand of rank {}",
                axis, rank
            ),
        ));
    }
    let axis = Axis(normalized as usize);

    let mut reduced = Vec::with_capacity(array.len() / array.len_of(axis).max(1));
    for lane in array.lanes(axis) {
        reduced.push(statistic.reduce(lane.into_dyn()).map_err(empty)?);
    }
    let shape = array.raw_dim().remove_axis(axis);
    let result = ArrayD::from_shape_vec(shape, reduced)
        .map_err(|e| PrimitiveError::shape_mismatch(site, e.to_string()))?;
    Ok(Value::from_f64_array(result))
}

#[derive(Debug, Clone, Copy)]
pub struct Statistics {
    statistic: Statistic,
}

impl Statistics {
    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    pub fn kind(&self) -> &str {
        self.statistic.name()
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let statistic = self.statistic;
        let site = Arc::clone(base.site());
        let (operands, args) = base.bind(args);
        async move {
            if operands.is_empty() || operands.len() > 2 {
                return Err(PrimitiveError::arity(
                    &site,
                    format!("{} requires one or two operands", statistic.name()),
                ));
            }
            let values = join_operands(&operands, &args).await?;
            let axis = match values.get(1) {
                None => None,
                Some(v) => Some(v.as_int().ok_or_else(|| {
                    PrimitiveError::invalid_operand(
                        &site,
                        format!("the axis must be an integer, got {}", v.kind_name()),
                    )
                })?),
            };
            reduce_values(statistic, &values[0], axis, &site)
        }
        .boxed()
    }
}

fn create(
    statistic: Statistic,
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    if !base.no_operands() {
        base.require_between(
            1,
            2,
            &format!("{} requires one or two operands", statistic.name()),
        )?;
        base.require_valid(&format!(
            "the {} primitive requires that all operands are valid",
            statistic.name()
        ))?;
    }
    Ok(PrimitiveHandle::new(
        locality,
        base,
        BuiltinPrimitive::Statistics(Statistics { statistic }),
    ))
}

pub fn create_amin(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(Statistic::Min, locality, operands, name, codename)
}

pub fn create_amax(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(Statistic::Max, locality, operands, name, codename)
}

pub fn create_sum(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(Statistic::Sum, locality, operands, name, codename)
}

pub fn create_prod(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(Statistic::Product, locality, operands, name, codename)
}

pub fn create_logsumexp(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(Statistic::LogSumExp, locality, operands, name, codename)
}

pub fn create_mean(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(Statistic::Mean, locality, operands, name, codename)
}

pub fn create_var(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(Statistic::Variance, locality, operands, name, codename)
}

pub fn create_std(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    create(Statistic::StdDev, locality, operands, name, codename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumericArray;
    use futures::executor::block_on;

    fn site() -> Site {
        Site::new("/arrayflow/sum$0", "test")
    }

    fn matrix() -> Value {
        Value::Array(NumericArray::matrix(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap())
    }

    #[test]
    fn test_whole_array() {
        assert_eq!(
            reduce_values(Statistic::Sum, &matrix(), None, &site()),
            Ok(Value::Float(21.0))
        );
        assert_eq!(
            reduce_values(Statistic::Max, &Value::Int(3), None, &site()),
            Ok(Value::Float(3.0))
        );
    }

    #[test]
    fn test_along_axis() {
        assert_eq!(
            reduce_values(Statistic::Sum, &matrix(), Some(0), &site()),
            Ok(Value::from(vec![5.0, 7.0, 9.0]))
        );
        assert_eq!(
            reduce_values(Statistic::Mean, &matrix(), Some(-1), &site()),
            Ok(Value::from(vec![2.0, 5.0]))
        );
        let v = Value::from(vec![1.0, 3.0]);
        assert_eq!(
            reduce_values(Statistic::Mean, &v, Some(0), &site()),
            Ok(Value::Float(2.0))
        );
    }

    #[test]
    fn test_axis_out_of_range() {
        assert!(matches!(
            reduce_values(Statistic::Sum, &matrix(), Some(2), &site()),
            Err(PrimitiveError::InvalidOperand { .. })
        ));
        assert!(matches!(
            reduce_values(Statistic::Sum, &Value::Float(1.0), Some(0), &site()),
            Err(PrimitiveError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn test_empty_mean_fails() {
        let empty = Value::Array(NumericArray::vector(vec![]));
        let err = reduce_values(Statistic::Mean, &empty, None, &site()).unwrap_err();
        assert!(matches!(err, PrimitiveError::EmptySequence { .. }));
        assert_eq!(err.message(), "empty sequences are not supported");
    }

    #[test]
    fn test_primitive_with_axis_operand() {
        let p = create_sum(Locality::here(), vec![matrix(), Value::Int(1)], "sum", "test").unwrap();
        assert_eq!(block_on(p.evaluate(vec![])), Ok(Value::from(vec![6.0, 15.0])));

        let bad = create_sum(Locality::here(), vec![matrix(), Value::from("x")], "sum", "test")
            .unwrap();
        assert!(matches!(
            block_on(bad.evaluate(vec![])),
            Err(PrimitiveError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn test_empty_operands_are_rejected() {
        let err = create_mean(Locality::here(), vec![Value::Empty], "mean", "test").unwrap_err();
        assert!(matches!(err, PrimitiveError::InvalidOperand { .. }));

        let err = create_sum(Locality::here(), vec![matrix(), Value::Empty], "sum", "test")
            .unwrap_err();
        assert!(matches!(err, PrimitiveError::InvalidOperand { .. }));
    }

    #[test]
    fn test_string_is_incompatible() {
        assert!(matches!(
            reduce_values(Statistic::Sum, &Value::from("abc"), None, &site()),
            Err(PrimitiveError::IncompatibleOperands { .. })
        ));
    }
}
