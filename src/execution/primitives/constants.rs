//! Named constants of nature: `con("pi")`, `e()`, `pi()`, `ua()`.

use crate::execution::dataflow::string_operand;
use crate::execution::error::{PrimitiveError, PrimitiveResult, Site};
use crate::execution::name::bare_name;
use crate::execution::pattern::MatchPattern;
use crate::execution::placement::Locality;
use crate::execution::primitive::{
    Args, BuiltinPrimitive, EvalFuture, PrimitiveBase, PrimitiveHandle,
};
use crate::types::Value;
use futures::FutureExt;
use std::sync::Arc;

const HELP: &str = "con(name)\n\
    Returns the value of the named constant of nature.\n\
    The aliases e(), pi() and ua() take no argument.\n\
    Known names: \"e\", \"pi\", \"ua\".";

pub const MATCH_DATA: &[MatchPattern] = &[
    MatchPattern::new("con", &["con(_1)"], create_constants_of_nature).with_help(HELP),
    MatchPattern::new("e", &["e()"], create_constants_of_nature).with_help(HELP),
    MatchPattern::new("pi", &["pi()"], create_constants_of_nature).with_help(HELP),
    MatchPattern::new("ua", &["ua()"], create_constants_of_nature).with_help(HELP),
];

/// Value of a named constant.
pub fn lookup(name: &str) -> Option<f64> {
    match name {
        "e" => Some(std::f64::consts::E),
        "pi" => Some(std::f64::consts::PI),
        "ua" => Some(42.0),
        _ => None,
    }
}

fn calculate(name: &str, site: &Site) -> PrimitiveResult<Value> {
    lookup(name).map(Value::Float).ok_or_else(|| {
        PrimitiveError::unknown_identifier(
            site,
            format!("unknown constant of nature requested: {}", name),
        )
    })
}

/// Constant lookup, by operand or by the instance's own name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantsOfNature;

impl ConstantsOfNature {
    pub fn kind(&self) -> &str {
        "con"
    }

    pub fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let site = Arc::clone(base.site());
        let (operands, args) = base.bind(args);
        async move {
            match operands.len() {
                0 => calculate(&bare_name(&site.name), &site),
                1 => {
                    let name = string_operand(&operands[0], &args, &site).await?;
                    calculate(&name, &site)
                }
                _ => Err(PrimitiveError::arity(
                    &site,
                    "constants_of_nature accepts either none or exactly one argument",
                )),
            }
        }
        .boxed()
    }
}

pub fn create_constants_of_nature(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    codename: &str,
) -> PrimitiveResult<PrimitiveHandle> {
    let base = PrimitiveBase::new(operands, name, codename);
    base.require_between(
        0,
        1,
        "constants_of_nature accepts either none or exactly one argument",
    )?;
    base.require_valid("the constants_of_nature primitive requires that its argument is valid")?;
    Ok(PrimitiveHandle::new(
        locality,
        base,
        BuiltinPrimitive::Constant(ConstantsOfNature),
    ))
}
