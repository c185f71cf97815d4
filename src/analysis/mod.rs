//! Numeric analysis for arrayflow
//!
//! This module provides the streaming reducers behind the statistics
//! primitives:
//! - min, max, sum, product and log-sum-exp
//! - mean, variance and standard deviation (Welford)

pub mod statistics;

pub use statistics::{Chunk, EmptySequence, Reducer, Statistic, Welford};
