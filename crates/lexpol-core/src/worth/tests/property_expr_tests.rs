use std::f64::consts::FRAC_1_SQRT_2;

use proptest::prelude::*;

use crate::worth::expr::{STRICTNESS_PENALTY, id, num};
use crate::worth::merit::Merit;

proptest! {
    #[test]
    fn gte_is_reflexive_on_every_vector(
        vector in proptest::collection::vec(-1.0e6f64..1.0e6, 1..8),
        raw_index in 0usize..8,
    ) {
        let index = raw_index % vector.len();
        let merit = id(index).gte(id(index)).evaluate(&vector);
        prop_assert_eq!(merit, Merit::Scalar(0.0));
    }

    #[test]
    fn gt_margin_is_zero_iff_strictly_greater(
        a in -1.0e6f64..1.0e6,
        b in -1.0e6f64..1.0e6,
    ) {
        let merit = num(a).gt(num(b)).evaluate(&[]).as_scalar().unwrap();
        if a > b {
            prop_assert_eq!(merit, 0.0);
        } else {
            let expected = -(a - b).abs() * FRAC_1_SQRT_2 - STRICTNESS_PENALTY;
            prop_assert_eq!(merit, expected);
            prop_assert!(merit <= -STRICTNESS_PENALTY);
        }
    }

    #[test]
    fn gte_margin_scales_with_the_shortfall(
        a in -1.0e6f64..1.0e6,
        b in -1.0e6f64..1.0e6,
    ) {
        let merit = num(a).gte(num(b)).evaluate(&[]).as_scalar().unwrap();
        if a >= b {
            prop_assert_eq!(merit, 0.0);
        } else {
            prop_assert_eq!(merit, -(a - b).abs() * FRAC_1_SQRT_2);
        }
    }

    #[test]
    fn or_combination_of_scalars_is_always_satisfied(
        a in -1.0e6f64..1.0e6,
        b in -1.0e6f64..1.0e6,
    ) {
        // One of the two soft-Gte directions always holds over the reals.
        let merit = (num(a) | num(b)).evaluate(&[]);
        prop_assert_eq!(merit, Merit::Scalar(0.0));
    }

    #[test]
    fn arithmetic_matches_plain_evaluation(
        vector in proptest::collection::vec(-1.0e3f64..1.0e3, 3..4),
        weight in -10.0f64..10.0,
    ) {
        let expr = -id(0) + id(1) * weight - id(2);
        let merit = expr.evaluate(&vector).as_scalar().unwrap();
        let expected = -vector[0] + vector[1] * weight - vector[2];
        prop_assert!((merit - expected).abs() < 1e-9);
    }
}
