use std::f64::consts::FRAC_1_SQRT_2;

use crate::worth::merit::Merit;

/// Fixed penalty added to an unsatisfied strict comparison.
/// Keeps `Gt` strictly sharper than `Gte` at the equality boundary: exact
/// equality never counts as satisfying `>`.
pub const STRICTNESS_PENALTY: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
/// Immutable expression tree evaluated on a reward vector to produce a
/// `Merit`. Built once from combinators, evaluated once per candidate action
/// per state per sweep, so evaluation is pure tree walking with no parsing.
///
/// The soft comparisons return 0 when satisfied and otherwise the negated
/// Euclidean distance, in the `(a, b)` plane, from the point to the line
/// `a = b`. That margin is what makes near-ties distinguishable instead of
/// collapsing to a flat boolean landscape.
pub enum WorthExpr {
    /// Reference to position `k` of the reward vector.
    Id(usize),
    Const(f64),
    Neg(Box<WorthExpr>),
    Add(Box<WorthExpr>, Box<WorthExpr>),
    Mul(Box<WorthExpr>, Box<WorthExpr>),
    /// Soft `left >= right`.
    Gte(Box<WorthExpr>, Box<WorthExpr>),
    /// Soft `left > right`, with the strictness penalty at the boundary.
    Gt(Box<WorthExpr>, Box<WorthExpr>),
    /// Lexicographic composition: evaluates to a tuple, first part dominant.
    Lex(Vec<WorthExpr>),
    /// Marks that merits from this subtree should be truncated before the
    /// policy-selection step. Evaluation is transparent; the truncation rule
    /// itself is supplied by whoever runs the selection.
    Trunc(Box<WorthExpr>),
}

/// Reference the `k`th reward component.
pub fn id(k: usize) -> WorthExpr {
    WorthExpr::Id(k)
}

/// Constant expression.
pub fn num(value: f64) -> WorthExpr {
    WorthExpr::Const(value)
}

/// Impose lexicographic ordering over a sequence of sub-expressions.
pub fn lex(parts: impl IntoIterator<Item = WorthExpr>) -> WorthExpr {
    WorthExpr::Lex(parts.into_iter().collect())
}

/// Flag a subtree for truncation before policy selection.
pub fn trunc(inner: WorthExpr) -> WorthExpr {
    WorthExpr::Trunc(Box::new(inner))
}

impl WorthExpr {
    /// Evaluate against a reward vector.
    ///
    /// An `Id` index beyond the vector arity is a construction-time mismatch
    /// between the reward builder and this expression; callers are expected
    /// to check `arity_bound` up front, so indexing here panics rather than
    /// recovering.
    pub fn evaluate(&self, vector: &[f64]) -> Merit {
        match self {
            WorthExpr::Lex(parts) => {
                Merit::Tuple(parts.iter().map(|part| part.evaluate(vector)).collect())
            }
            WorthExpr::Trunc(inner) => inner.evaluate(vector),
            scalar => Merit::Scalar(scalar.eval_scalar(vector)),
        }
    }

    fn eval_scalar(&self, vector: &[f64]) -> f64 {
        match self {
            WorthExpr::Id(k) => vector[*k],
            WorthExpr::Const(value) => *value,
            WorthExpr::Neg(inner) => -inner.eval_scalar(vector),
            WorthExpr::Add(left, right) => left.eval_scalar(vector) + right.eval_scalar(vector),
            WorthExpr::Mul(left, right) => left.eval_scalar(vector) * right.eval_scalar(vector),
            WorthExpr::Gte(left, right) => {
                let lw = left.eval_scalar(vector);
                let rw = right.eval_scalar(vector);
                if lw >= rw {
                    0.0
                } else {
                    // distance to the half-plane lw >= rw
                    -(lw - rw).abs() * FRAC_1_SQRT_2
                }
            }
            WorthExpr::Gt(left, right) => {
                let lw = left.eval_scalar(vector);
                let rw = right.eval_scalar(vector);
                if lw > rw {
                    0.0
                } else {
                    -(lw - rw).abs() * FRAC_1_SQRT_2 - STRICTNESS_PENALTY
                }
            }
            WorthExpr::Trunc(inner) => inner.eval_scalar(vector),
            WorthExpr::Lex(_) => {
                panic!("lexicographic tuple used where a scalar value is required")
            }
        }
    }

    /// Minimum reward arity this expression needs: one past the largest
    /// `Id` index it references, or 0 when it references none.
    pub fn arity_bound(&self) -> usize {
        match self {
            WorthExpr::Id(k) => k + 1,
            WorthExpr::Const(_) => 0,
            WorthExpr::Neg(inner) | WorthExpr::Trunc(inner) => inner.arity_bound(),
            WorthExpr::Add(left, right)
            | WorthExpr::Mul(left, right)
            | WorthExpr::Gte(left, right)
            | WorthExpr::Gt(left, right) => left.arity_bound().max(right.arity_bound()),
            WorthExpr::Lex(parts) => parts
                .iter()
                .map(WorthExpr::arity_bound)
                .max()
                .unwrap_or(0),
        }
    }

    /// Whether a truncation marker appears anywhere in the tree.
    pub fn truncates(&self) -> bool {
        match self {
            WorthExpr::Trunc(_) => true,
            WorthExpr::Id(_) | WorthExpr::Const(_) => false,
            WorthExpr::Neg(inner) => inner.truncates(),
            WorthExpr::Add(left, right)
            | WorthExpr::Mul(left, right)
            | WorthExpr::Gte(left, right)
            | WorthExpr::Gt(left, right) => left.truncates() || right.truncates(),
            WorthExpr::Lex(parts) => parts.iter().any(WorthExpr::truncates),
        }
    }

    /// Soft `self >= other`.
    pub fn gte(self, other: impl Into<WorthExpr>) -> WorthExpr {
        WorthExpr::Gte(Box::new(self), Box::new(other.into()))
    }

    /// Soft `self > other`.
    pub fn gt(self, other: impl Into<WorthExpr>) -> WorthExpr {
        WorthExpr::Gt(Box::new(self), Box::new(other.into()))
    }

    /// Soft `self <= other`, expressed as the swapped `Gte`.
    pub fn lte(self, other: impl Into<WorthExpr>) -> WorthExpr {
        WorthExpr::Gte(Box::new(other.into()), Box::new(self))
    }

    /// Soft `self < other`, expressed as the swapped `Gt`.
    pub fn lt(self, other: impl Into<WorthExpr>) -> WorthExpr {
        WorthExpr::Gt(Box::new(other.into()), Box::new(self))
    }
}

#[derive(Debug, Clone)]
/// A finished worth functional: an expression plus the facts the engine
/// needs up front (arity requirement, truncation intent). Shared read-only
/// by the engine while it runs.
pub struct Worth {
    expr: WorthExpr,
    arity_bound: usize,
    truncates: bool,
}

impl Worth {
    pub fn new(expr: WorthExpr) -> Self {
        let arity_bound = expr.arity_bound();
        let truncates = expr.truncates();
        Worth {
            expr,
            arity_bound,
            truncates,
        }
    }

    /// Score one reward vector.
    pub fn score(&self, vector: &[f64]) -> Merit {
        self.expr.evaluate(vector)
    }

    /// Minimum reward arity the wrapped expression references.
    pub fn arity_bound(&self) -> usize {
        self.arity_bound
    }

    /// Whether merits should be truncated before policy selection.
    pub fn truncates(&self) -> bool {
        self.truncates
    }

    /// Borrow the underlying expression tree.
    pub fn expr(&self) -> &WorthExpr {
        &self.expr
    }
}

impl From<WorthExpr> for Worth {
    fn from(expr: WorthExpr) -> Self {
        Worth::new(expr)
    }
}
