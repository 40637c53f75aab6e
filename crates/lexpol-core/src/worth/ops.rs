//! Operator sugar so worth expressions compose like ordinary arithmetic:
//! `-id(2) + 0.5 * id(1)`, `id(0) | id(1)`, and so on. Numeric literals
//! auto-wrap as `Const` through the `Into<WorthExpr>` conversions.

use std::ops::{Add, BitOr, Mul, Neg, Sub};

use crate::worth::expr::WorthExpr;

impl From<f64> for WorthExpr {
    fn from(value: f64) -> Self {
        WorthExpr::Const(value)
    }
}

impl From<i32> for WorthExpr {
    fn from(value: i32) -> Self {
        WorthExpr::Const(f64::from(value))
    }
}

impl Neg for WorthExpr {
    type Output = WorthExpr;

    fn neg(self) -> WorthExpr {
        WorthExpr::Neg(Box::new(self))
    }
}

impl<R: Into<WorthExpr>> Add<R> for WorthExpr {
    type Output = WorthExpr;

    fn add(self, rhs: R) -> WorthExpr {
        WorthExpr::Add(Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<WorthExpr>> Sub<R> for WorthExpr {
    type Output = WorthExpr;

    fn sub(self, rhs: R) -> WorthExpr {
        WorthExpr::Add(
            Box::new(self),
            Box::new(WorthExpr::Neg(Box::new(rhs.into()))),
        )
    }
}

impl<R: Into<WorthExpr>> Mul<R> for WorthExpr {
    type Output = WorthExpr;

    fn mul(self, rhs: R) -> WorthExpr {
        WorthExpr::Mul(Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<WorthExpr>> BitOr<R> for WorthExpr {
    type Output = WorthExpr;

    /// Or-combination: zero when either direction's soft `>=` is satisfied,
    /// otherwise the sum of both penalties.
    fn bitor(self, rhs: R) -> WorthExpr {
        let rhs = rhs.into();
        WorthExpr::Add(
            Box::new(WorthExpr::Gte(
                Box::new(rhs.clone()),
                Box::new(self.clone()),
            )),
            Box::new(WorthExpr::Gte(Box::new(self), Box::new(rhs))),
        )
    }
}
