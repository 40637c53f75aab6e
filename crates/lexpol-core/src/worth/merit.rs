use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
/// The comparable value a worth expression produces for one reward vector.
/// Scalars come from arithmetic and soft comparisons, tuples from
/// lexicographic composition. Tuples may nest (priority groups).
pub enum Merit {
    Scalar(f64),
    Tuple(Vec<Merit>),
}

impl Merit {
    /// Return the scalar payload, or `None` for tuples.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Merit::Scalar(value) => Some(*value),
            Merit::Tuple(_) => None,
        }
    }

    /// Total order used for action selection.
    /// Scalars compare via `f64::total_cmp` so a NaN cannot poison the argmax,
    /// tuples compare lexicographically (first component dominant).
    /// Merits produced by one expression always share a shape; the
    /// scalar-vs-tuple arms only exist to keep the order total.
    pub fn total_cmp(&self, other: &Merit) -> Ordering {
        match (self, other) {
            (Merit::Scalar(a), Merit::Scalar(b)) => a.total_cmp(b),
            (Merit::Tuple(a), Merit::Tuple(b)) => {
                for (left, right) in a.iter().zip(b.iter()) {
                    match left.total_cmp(right) {
                        Ordering::Equal => continue,
                        ordering => return ordering,
                    }
                }
                a.len().cmp(&b.len())
            }
            (Merit::Scalar(_), Merit::Tuple(_)) => Ordering::Less,
            (Merit::Tuple(_), Merit::Scalar(_)) => Ordering::Greater,
        }
    }

    /// Apply a scalar transform to every leaf, preserving the tuple shape.
    /// This is how a truncation policy is applied before action selection.
    pub fn map_scalars(&self, transform: fn(f64) -> f64) -> Merit {
        match self {
            Merit::Scalar(value) => Merit::Scalar(transform(*value)),
            Merit::Tuple(parts) => Merit::Tuple(
                parts
                    .iter()
                    .map(|part| part.map_scalars(transform))
                    .collect(),
            ),
        }
    }
}

impl PartialOrd for Merit {
    /// Standard lexicographic tuple ordering.
    /// Shape mismatches compare as `None`: they mean two different
    /// expressions were compared, which the engine never does.
    fn partial_cmp(&self, other: &Merit) -> Option<Ordering> {
        match (self, other) {
            (Merit::Scalar(a), Merit::Scalar(b)) => a.partial_cmp(b),
            (Merit::Tuple(a), Merit::Tuple(b)) => {
                if a.len() != b.len() {
                    return None;
                }
                for (left, right) in a.iter().zip(b.iter()) {
                    match left.partial_cmp(right)? {
                        Ordering::Equal => continue,
                        ordering => return Some(ordering),
                    }
                }
                Some(Ordering::Equal)
            }
            _ => None,
        }
    }
}

impl From<f64> for Merit {
    fn from(value: f64) -> Self {
        Merit::Scalar(value)
    }
}
