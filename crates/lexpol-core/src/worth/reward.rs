use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Combines independent scalar reward functions into one vector-valued
/// reward function. Component order is push order and fixes the index each
/// component gets in worth expressions.
pub struct RewardStack<S: ?Sized> {
    components: Vec<Box<dyn Fn(&S) -> f64>>,
}

impl<S: ?Sized> RewardStack<S> {
    pub fn new() -> Self {
        RewardStack {
            components: Vec::new(),
        }
    }

    /// Append a scalar component.
    pub fn push(&mut self, component: impl Fn(&S) -> f64 + 'static) {
        self.components.push(Box::new(component));
    }

    /// Chaining form of `push`.
    pub fn with(mut self, component: impl Fn(&S) -> f64 + 'static) -> Self {
        self.push(component);
        self
    }

    /// Arity of the produced vectors; `Id(k)` references need `k < len()`.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Evaluate every component at `state`, in push order.
    pub fn vector(&self, state: &S) -> RewardVec {
        RewardVec(
            self.components
                .iter()
                .map(|component| component(state))
                .collect(),
        )
    }
}

impl<S: ?Sized> Default for RewardStack<S> {
    fn default() -> Self {
        RewardStack::new()
    }
}

impl<S: ?Sized> fmt::Debug for RewardStack<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewardStack")
            .field("arity", &self.components.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One vector-valued reward: an ordered, fixed-arity tuple of scalars, one
/// per objective. Also the value type the engine propagates, so it carries
/// the componentwise arithmetic a Bellman backup needs.
pub struct RewardVec(Vec<f64>);

impl RewardVec {
    /// All-zero vector of the given arity.
    pub fn zeros(arity: usize) -> Self {
        RewardVec(vec![0.0; arity])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Componentwise `self += weight * other`.
    /// Every objective accumulates independently across the same transition,
    /// so probability weights and the discount apply to all components alike.
    pub fn add_scaled(&mut self, other: &RewardVec, weight: f64) {
        debug_assert_eq!(self.0.len(), other.0.len());
        for (target, source) in self.0.iter_mut().zip(other.0.iter()) {
            *target += weight * source;
        }
    }

    /// Componentwise `self *= weight`.
    pub fn scale(&mut self, weight: f64) {
        for value in &mut self.0 {
            *value *= weight;
        }
    }

    /// Largest componentwise absolute difference; the convergence metric.
    pub fn max_abs_diff(&self, other: &RewardVec) -> f64 {
        debug_assert_eq!(self.0.len(), other.0.len());
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl From<Vec<f64>> for RewardVec {
    fn from(values: Vec<f64>) -> Self {
        RewardVec(values)
    }
}

impl Index<usize> for RewardVec {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}
