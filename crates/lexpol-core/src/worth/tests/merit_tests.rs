use std::cmp::Ordering;

use crate::worth::merit::Merit;

fn tuple(values: &[f64]) -> Merit {
    Merit::Tuple(values.iter().map(|v| Merit::Scalar(*v)).collect())
}

#[test]
fn scalars_order_numerically() {
    assert_eq!(
        Merit::Scalar(1.0).total_cmp(&Merit::Scalar(2.0)),
        Ordering::Less
    );
    assert_eq!(
        Merit::Scalar(2.0).total_cmp(&Merit::Scalar(2.0)),
        Ordering::Equal
    );
}

#[test]
fn tuples_order_lexicographically_first_component_dominant() {
    // A better first component beats any amount of later advantage.
    assert_eq!(
        tuple(&[0.0, -100.0]).total_cmp(&tuple(&[-1.0, 100.0])),
        Ordering::Greater
    );
    // Equal first components fall through to the second.
    assert_eq!(
        tuple(&[0.0, -1.0]).total_cmp(&tuple(&[0.0, 0.0])),
        Ordering::Less
    );
    assert_eq!(
        tuple(&[0.0, 0.0]).total_cmp(&tuple(&[0.0, 0.0])),
        Ordering::Equal
    );
}

#[test]
fn nested_tuples_compare_recursively() {
    let left = Merit::Tuple(vec![Merit::Scalar(1.0), tuple(&[2.0, 3.0])]);
    let right = Merit::Tuple(vec![Merit::Scalar(1.0), tuple(&[2.0, 4.0])]);
    assert_eq!(left.total_cmp(&right), Ordering::Less);
    assert_eq!(left.partial_cmp(&right), Some(Ordering::Less));
}

#[test]
fn partial_cmp_rejects_shape_mismatches() {
    assert_eq!(Merit::Scalar(1.0).partial_cmp(&tuple(&[1.0])), None);
    assert_eq!(tuple(&[1.0]).partial_cmp(&tuple(&[1.0, 2.0])), None);
}

#[test]
fn total_cmp_stays_total_on_nan() {
    let nan = Merit::Scalar(f64::NAN);
    let one = Merit::Scalar(1.0);
    // f64::total_cmp places NaN above every number; what matters here is
    // that the order is deterministic and antisymmetric.
    assert_eq!(nan.total_cmp(&one), Ordering::Greater);
    assert_eq!(one.total_cmp(&nan), Ordering::Less);
    assert_eq!(nan.total_cmp(&nan), Ordering::Equal);
}

#[test]
fn map_scalars_preserves_shape() {
    let merit = Merit::Tuple(vec![Merit::Scalar(1.9), tuple(&[-2.7, 0.2])]);
    assert_eq!(
        merit.map_scalars(f64::trunc),
        Merit::Tuple(vec![Merit::Scalar(1.0), tuple(&[-2.0, 0.0])])
    );
}
