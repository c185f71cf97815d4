//! Broadcasting numeric kernel.
//!
//! Binary element-wise operations dispatch on the `(lhs rank, rhs rank)` pair:
//!
//! | lhs \ rhs | 0             | 1                    | 2                    |
//! |-----------|---------------|----------------------|----------------------|
//! | 0         | scalar        | scalar over vector   | scalar over matrix   |
//! | 1         | vector/scalar | equal shapes         | vector over rows     |
//! | 2         | matrix/scalar | vector over rows     | equal shapes         |
//!
//! A vector broadcast over a matrix must have as many elements as the matrix
//! has columns. The result has the broadcast shape and element `i` is always
//! `f(lhs[i], rhs[i])`.

use crate::execution::error::{PrimitiveError, PrimitiveResult, Site};
use ndarray::{ArrayD, ArrayViewD, IxDyn, Zip};

/// Shape both operands are broadcast to, or the reason they can't be.
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize], site: &Site) -> PrimitiveResult<IxDyn> {
    match (lhs.len(), rhs.len()) {
        (0, 0) => Ok(IxDyn(&[])),
        (0, 1) | (0, 2) => Ok(IxDyn(rhs)),
        (1, 0) | (2, 0) => Ok(IxDyn(lhs)),
        (1, 1) | (2, 2) => {
            if lhs != rhs {
                return Err(PrimitiveError::shape_mismatch(
                    site,
                    format!(
                        "the dimensions of the operands do not match: {:?} vs {:?}",
                        lhs, rhs
                    ),
                ));
            }
            Ok(IxDyn(lhs))
        }
        (1, 2) => {
            if lhs[0] != rhs[1] {
                return Err(PrimitiveError::shape_mismatch(
                    site,
                    format!(
                        "the vector has {} elements but the matrix has {} columns",
                        lhs[0], rhs[1]
                    ),
                ));
            }
            Ok(IxDyn(rhs))
        }
        (2, 1) => {
            if rhs[0] != lhs[1] {
                return Err(PrimitiveError::shape_mismatch(
                    site,
                    format!(
                        "the matrix has {} columns but the vector has {} elements",
                        lhs[1], rhs[0]
                    ),
                ));
            }
            Ok(IxDyn(lhs))
        }
        (l, r) => Err(PrimitiveError::incompatible(
            site,
            format!(
                "the operands have incompatible number of dimensions: {} and {}",
                l, r
            ),
        )),
    }
}

/// Apply `f` element-wise over the broadcast of `lhs` and `rhs`.
pub fn broadcast_binary<T, R, F>(
    lhs: ArrayViewD<'_, T>,
    rhs: ArrayViewD<'_, T>,
    f: F,
    site: &Site,
) -> PrimitiveResult<ArrayD<R>>
where
    T: Copy,
    F: Fn(T, T) -> R,
{
    let shape = broadcast_shape(lhs.shape(), rhs.shape(), site)?;
    let cannot_broadcast = || {
        PrimitiveError::shape_mismatch(site, format!("cannot broadcast operands to {:?}", shape))
    };
    let lhs = lhs.broadcast(shape.clone()).ok_or_else(cannot_broadcast)?;
    let rhs = rhs.broadcast(shape.clone()).ok_or_else(cannot_broadcast)?;
    Ok(Zip::from(lhs).and(rhs).map_collect(|&x, &y| f(x, y)))
}
