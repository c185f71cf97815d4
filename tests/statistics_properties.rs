//! Property tests for the statistics reducers

use arrayflow::analysis::{Reducer, Statistic, Welford};
use ndarray::{ArrayD, IxDyn};
use proptest::prelude::*;

fn array(values: &[f64]) -> ArrayD<f64> {
    ArrayD::from_shape_vec(IxDyn(&[values.len()]), values.to_vec()).unwrap()
}

fn two_pass_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

fn close(a: f64, b: f64) -> bool {
    close_within(a, b, 1e-9)
}

fn close_within(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= tolerance * scale
}

/// Streaming variance drifts by about 2e-9 relative at a 1e9 offset.
const LARGE_OFFSET_TOLERANCE: f64 = 1e-6;

proptest! {
    #[test]
    fn welford_matches_two_pass(values in prop::collection::vec(-1e3f64..1e3, 2..200)) {
        let welford = Statistic::Variance.reduce(array(&values).view()).unwrap();
        let expected = two_pass_variance(&values);
        prop_assert!(close(welford, expected), "{} vs {}", welford, expected);
    }

    #[test]
    fn welford_holds_up_at_large_offsets(
        offset in prop::sample::select(vec![1e6, 1e8, 1e9]),
        spread in prop::collection::vec(0f64..1e3, 2..1000),
    ) {
        let values: Vec<f64> = spread.iter().map(|d| offset + d).collect();
        // exact: every value lies in [offset, 2 * offset]
        let shifted: Vec<f64> = values.iter().map(|v| v - offset).collect();
        let expected = two_pass_variance(&shifted);
        let welford = Statistic::Variance.reduce(array(&values).view()).unwrap();
        prop_assert!(
            close_within(welford, expected, LARGE_OFFSET_TOLERANCE),
            "offset {}: {} vs {}", offset, welford, expected
        );
    }

    #[test]
    fn merged_partials_match_single_pass(
        values in prop::collection::vec(-1e3f64..1e3, 2..200),
        split in 0usize..200,
    ) {
        let split = split.min(values.len());
        let (left, right) = values.split_at(split);

        let mut a = Welford::new();
        left.iter().for_each(|v| a.push(*v));
        let mut b = Welford::new();
        right.iter().for_each(|v| b.push(*v));
        a.merge(&b);

        let mut whole = Welford::new();
        values.iter().for_each(|v| whole.push(*v));

        prop_assert_eq!(a.count, whole.count);
        prop_assert!(close(a.mean, whole.mean));
        prop_assert!(close(a.m2, whole.m2));
    }

    #[test]
    fn identity_is_neutral(value in -1e6f64..1e6) {
        for statistic in [Statistic::Sum, Statistic::Product, Statistic::Min, Statistic::Max] {
            let single = statistic.reduce(array(&[value]).view()).unwrap();
            prop_assert!(close(single, value), "{}: {} vs {}", statistic, single, value);
        }
    }

    #[test]
    fn mean_of_copies_is_the_value(value in -1e6f64..1e6, n in 1usize..64) {
        let values = vec![value; n];
        let mean = Statistic::Mean.reduce(array(&values).view()).unwrap();
        prop_assert!(close(mean, value));
    }

    #[test]
    fn variance_of_equal_elements_is_zero(value in -1e6f64..1e6, n in 1usize..64) {
        let values = vec![value; n];
        let variance = Statistic::Variance.reduce(array(&values).view()).unwrap();
        prop_assert!(variance.abs() <= 1e-12 * value.abs().max(1.0));
        let std = Statistic::StdDev.reduce(array(&values).view()).unwrap();
        prop_assert!(std >= 0.0);
    }

    #[test]
    fn min_le_mean_le_max(values in prop::collection::vec(-1e3f64..1e3, 1..100)) {
        let view = array(&values);
        let min = Statistic::Min.reduce(view.view()).unwrap();
        let mean = Statistic::Mean.reduce(view.view()).unwrap();
        let max = Statistic::Max.reduce(view.view()).unwrap();
        prop_assert!(min <= mean + 1e-9 && mean <= max + 1e-9);
    }

    #[test]
    fn logsumexp_bounds(values in prop::collection::vec(-50f64..50.0, 1..50)) {
        let view = array(&values);
        let lse = Statistic::LogSumExp.reduce(view.view()).unwrap();
        let max = Statistic::Max.reduce(view.view()).unwrap();
        prop_assert!(lse >= max - 1e-9);
        prop_assert!(lse <= max + (values.len() as f64).ln() + 1e-9);
    }
}

#[test]
fn empty_input() {
    let empty = array(&[]);
    for statistic in [Statistic::Mean, Statistic::Variance, Statistic::StdDev] {
        assert!(statistic.reduce(empty.view()).is_err(), "{}", statistic);
    }
    assert_eq!(Statistic::Sum.reduce(empty.view()), Ok(0.0));
    assert_eq!(Statistic::Product.reduce(empty.view()), Ok(1.0));
    assert_eq!(Statistic::Min.reduce(empty.view()), Ok(f64::INFINITY));
    assert_eq!(Statistic::Max.reduce(empty.view()), Ok(f64::NEG_INFINITY));
}

#[test]
fn variance_at_a_billion_offset() {
    let values: Vec<f64> = (0..1000).map(|i| 1e9 + (i % 10) as f64).collect();
    // 0..=9 repeated a hundred times
    let expected = 8.25;
    let variance = Statistic::Variance.reduce(array(&values).view()).unwrap();
    assert!(
        close_within(variance, expected, LARGE_OFFSET_TOLERANCE),
        "{} vs {}",
        variance,
        expected
    );
    let mean = Statistic::Mean.reduce(array(&values).view()).unwrap();
    assert!(close(mean, 1e9 + 4.5));
}

#[test]
fn chunks_combine_like_a_flat_pass() {
    let reducer = arrayflow::analysis::statistics::Sum;
    let mut acc = reducer.identity();
    let mut count = reducer.combine(&mut acc, 1.5);
    count += reducer.combine(&mut acc, &array(&[2.0, 3.0]));
    assert_eq!(count, 3);
    assert_eq!(reducer.finalize(acc, count), Ok(6.5));
}
