//! Streaming statistical reducers
//!
//! Every reducer follows the same protocol:
//! - `identity()` creates a fresh accumulator
//! - `combine()` folds in a scalar or a whole array
//! - `finalize()` consumes the accumulator, given the number of folded elements
//!
//! Variance and standard deviation use Welford's online algorithm, so a single
//! pass is numerically stable even for large, offset data.

use ndarray::{ArrayD, ArrayViewD};
use thiserror::Error;

/// A reducer that needs at least one element got none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("empty sequences are not supported")]
pub struct EmptySequence;

/// Input to [`Reducer::combine`]: a single value or a whole array.
#[derive(Debug, Clone)]
pub enum Chunk<'a> {
    Scalar(f64),
    Array(ArrayViewD<'a, f64>),
}

impl From<f64> for Chunk<'_> {
    fn from(value: f64) -> Self {
        Chunk::Scalar(value)
    }
}

impl<'a> From<ArrayViewD<'a, f64>> for Chunk<'a> {
    fn from(values: ArrayViewD<'a, f64>) -> Self {
        Chunk::Array(values)
    }
}

impl<'a> From<&'a ArrayD<f64>> for Chunk<'a> {
    fn from(values: &'a ArrayD<f64>) -> Self {
        Chunk::Array(values.view())
    }
}

/// Identity / combine / finalize protocol shared by all reducers.
pub trait Reducer {
    type Acc;

    fn identity(&self) -> Self::Acc;

    fn combine_scalar(&self, acc: &mut Self::Acc, value: f64);

    /// Fold a chunk into `acc`, returning the number of elements folded.
    fn combine<'a>(&self, acc: &mut Self::Acc, chunk: impl Into<Chunk<'a>>) -> usize {
        match chunk.into() {
            Chunk::Scalar(value) => {
                self.combine_scalar(acc, value);
                1
            }
            Chunk::Array(values) => {
                for &value in values.iter() {
                    self.combine_scalar(acc, value);
                }
                values.len()
            }
        }
    }

    fn finalize(&self, acc: Self::Acc, count: usize) -> Result<f64, EmptySequence>;

    /// Reduce a whole array in one go.
    fn reduce(&self, values: ArrayViewD<'_, f64>) -> Result<f64, EmptySequence> {
        let mut acc = self.identity();
        let count = self.combine(&mut acc, values);
        self.finalize(acc, count)
    }
}

/// Running minimum; `+inf` for an empty sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl Reducer for Min {
    type Acc = f64;

    fn identity(&self) -> f64 {
        f64::INFINITY
    }

    #[inline]
    fn combine_scalar(&self, acc: &mut f64, value: f64) {
        *acc = acc.min(value);
    }

    fn finalize(&self, acc: f64, _count: usize) -> Result<f64, EmptySequence> {
        Ok(acc)
    }
}

/// Running maximum; `-inf` for an empty sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl Reducer for Max {
    type Acc = f64;

    fn identity(&self) -> f64 {
        f64::NEG_INFINITY
    }

    #[inline]
    fn combine_scalar(&self, acc: &mut f64, value: f64) {
        *acc = acc.max(value);
    }

    fn finalize(&self, acc: f64, _count: usize) -> Result<f64, EmptySequence> {
        Ok(acc)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl Reducer for Sum {
    type Acc = f64;

    fn identity(&self) -> f64 {
        0.0
    }

    #[inline]
    fn combine_scalar(&self, acc: &mut f64, value: f64) {
        *acc += value;
    }

    fn finalize(&self, acc: f64, _count: usize) -> Result<f64, EmptySequence> {
        Ok(acc)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Product;

impl Reducer for Product {
    type Acc = f64;

    fn identity(&self) -> f64 {
        1.0
    }

    #[inline]
    fn combine_scalar(&self, acc: &mut f64, value: f64) {
        *acc *= value;
    }

    fn finalize(&self, acc: f64, _count: usize) -> Result<f64, EmptySequence> {
        Ok(acc)
    }
}

/// `ln(sum(exp(x)))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSumExp;

impl Reducer for LogSumExp {
    type Acc = f64;

    fn identity(&self) -> f64 {
        0.0
    }

    #[inline]
    fn combine_scalar(&self, acc: &mut f64, value: f64) {
        *acc += value.exp();
    }

    fn finalize(&self, acc: f64, _count: usize) -> Result<f64, EmptySequence> {
        Ok(acc.ln())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl Reducer for Mean {
    type Acc = f64;

    fn identity(&self) -> f64 {
        0.0
    }

    #[inline]
    fn combine_scalar(&self, acc: &mut f64, value: f64) {
        *acc += value;
    }

    fn finalize(&self, acc: f64, count: usize) -> Result<f64, EmptySequence> {
        if count == 0 {
            return Err(EmptySequence);
        }
        Ok(acc / count as f64)
    }
}

/// Welford accumulator: count, running mean and sum of squared deviations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Welford {
    pub count: u64,
    pub mean: f64,
    pub m2: f64,
}

impl Welford {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Combine two partial accumulators (Chan et al.).
    pub fn merge(&mut self, other: &Welford) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = count as f64;
        self.mean += delta * n_b / n;
        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.count = count;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Population variance over `count` elements.
    pub fn variance(&self, count: usize) -> Result<f64, EmptySequence> {
        match count {
            0 => Err(EmptySequence),
            1 => Ok(0.0),
            n => Ok(self.m2 / n as f64),
        }
    }
}

/// Population variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Variance;

impl Reducer for Variance {
    type Acc = Welford;

    fn identity(&self) -> Welford {
        Welford::new()
    }

    #[inline]
    fn combine_scalar(&self, acc: &mut Welford, value: f64) {
        acc.push(value);
    }

    fn finalize(&self, acc: Welford, count: usize) -> Result<f64, EmptySequence> {
        acc.variance(count)
    }
}

/// Population standard deviation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDev;

impl Reducer for StdDev {
    type Acc = Welford;

    fn identity(&self) -> Welford {
        Welford::new()
    }

    #[inline]
    fn combine_scalar(&self, acc: &mut Welford, value: f64) {
        acc.push(value);
    }

    fn finalize(&self, acc: Welford, count: usize) -> Result<f64, EmptySequence> {
        acc.variance(count).map(f64::sqrt)
    }
}

/// Reducer selector used by the statistics primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Min,
    Max,
    Sum,
    Product,
    LogSumExp,
    Mean,
    Variance,
    StdDev,
}

impl Statistic {
    /// Primitive name the statistic is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Min => "amin",
            Statistic::Max => "amax",
            Statistic::Sum => "sum",
            Statistic::Product => "prod",
            Statistic::LogSumExp => "logsumexp",
            Statistic::Mean => "mean",
            Statistic::Variance => "var",
            Statistic::StdDev => "std",
        }
    }

    pub fn all() -> &'static [Statistic] {
        &[
            Statistic::Min,
            Statistic::Max,
            Statistic::Sum,
            Statistic::Product,
            Statistic::LogSumExp,
            Statistic::Mean,
            Statistic::Variance,
            Statistic::StdDev,
        ]
    }

    pub fn reduce(&self, values: ArrayViewD<'_, f64>) -> Result<f64, EmptySequence> {
        match self {
            Statistic::Min => Min.reduce(values),
            Statistic::Max => Max.reduce(values),
            Statistic::Sum => Sum.reduce(values),
            Statistic::Product => Product.reduce(values),
            Statistic::LogSumExp => LogSumExp.reduce(values),
            Statistic::Mean => Mean.reduce(values),
            Statistic::Variance => Variance.reduce(values),
            Statistic::StdDev => StdDev.reduce(values),
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
