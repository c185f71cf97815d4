//! Built-in primitives.
//!
//! Each module contributes a `MATCH_DATA` table of [`MatchPattern`]s; the
//! registry is built from [`builtin_patterns`] at start-up.

pub mod arithmetic;
pub mod block;
pub mod comparison;
pub mod constants;
pub mod for_operation;
pub mod if_operation;
pub mod statistics;
pub mod variable;

pub use arithmetic::{Arithmetic, ArithmeticOp};
pub use block::{Block, ParallelBlock};
pub use comparison::{CompareOp, Comparison};
pub use constants::ConstantsOfNature;
pub use for_operation::{ForOperation, WhileOperation};
pub use if_operation::IfOperation;
pub use statistics::Statistics;
pub use variable::{AccessArgument, Store, Variable};

use crate::execution::pattern::MatchPattern;

/// Every built-in pattern, in registration order.
pub fn builtin_patterns() -> impl Iterator<Item = MatchPattern> {
    [
        constants::MATCH_DATA,
        variable::MATCH_DATA,
        comparison::MATCH_DATA,
        arithmetic::MATCH_DATA,
        statistics::MATCH_DATA,
        for_operation::MATCH_DATA,
        if_operation::MATCH_DATA,
        block::MATCH_DATA,
    ]
    .into_iter()
    .flatten()
    .copied()
}
