use std::cmp::Ordering;
use std::collections::HashMap;
use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use lexpol_core::{Merit, RewardVec, Worth};

use crate::{CompiledModel, SolveError, StateKey};

const DEFAULT_SOLVE_CONFIG_YAML: &str = include_str!("../config/solve.default.yaml");

/// Convergence configuration for value iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveConfig {
    /// Scaling of the continuation term. 1.0 leans on absorbing states to
    /// bound accumulation; below 1.0 convergence is guaranteed.
    pub discount: f64,
    /// Sweep-to-sweep max componentwise change below which we stop.
    pub tolerance: f64,
    /// Hard sweep bound; hitting it reports non-convergence, not an error.
    pub max_sweeps: usize,
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig {
            discount: 1.0,
            tolerance: 1e-9,
            max_sweeps: 10_000,
        }
    }
}

impl SolveConfig {
    /// Parse a solve config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SolveConfigError> {
        let config: SolveConfig = serde_yaml::from_str(yaml).map_err(SolveConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a solve config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SolveConfigError> {
        let yaml = fs::read_to_string(path).map_err(SolveConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SOLVE_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SolveConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    fn validate(&self) -> Result<(), SolveConfigError> {
        if !self.discount.is_finite() || self.discount < 0.0 || self.discount > 1.0 {
            return Err(SolveConfigError::Invalid(
                "discount must be finite and within [0, 1]".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SolveConfigError::Invalid(
                "tolerance must be finite and >= 0".to_string(),
            ));
        }
        if self.max_sweeps == 0 {
            return Err(SolveConfigError::Invalid(
                "max_sweeps must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Error type for loading and validating `SolveConfig`.
#[derive(Debug)]
pub enum SolveConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for SolveConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            SolveConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            SolveConfigError::Invalid(err) => write!(f, "invalid solve config: {err}"),
        }
    }
}

impl std::error::Error for SolveConfigError {}

/// Per-sweep metrics emitted by the engine.
#[derive(Debug, Clone, Copy)]
pub struct SweepMetrics {
    /// 1-based sweep count.
    pub sweep: usize,
    /// Largest per-state, per-component value change this sweep.
    pub max_delta: f64,
}

/// Vector-valued value iteration driven by a worth functional.
///
/// Each sweep performs Jacobi-style Bellman backups: every candidate reads
/// the frozen previous value function, so the outcome never depends on state
/// traversal order. Candidates are ranked by the worth's merit, but the full
/// reward vector of the winner is what gets propagated, keeping
/// lower-priority objectives distinguishable across sweeps.
pub struct ValueIteration<'a> {
    model: &'a CompiledModel,
    rewards: Vec<RewardVec>,
    worth: Worth,
    config: SolveConfig,
    truncation: fn(f64) -> f64,
}

impl<'a> ValueIteration<'a> {
    /// Set up an engine run, checking the reward table against the model and
    /// the worth expression's identifier references up front.
    pub fn new(
        model: &'a CompiledModel,
        rewards: Vec<RewardVec>,
        worth: impl Into<Worth>,
        config: SolveConfig,
    ) -> Result<Self, SolveError> {
        let worth = worth.into();

        if rewards.len() != model.state_count() {
            return Err(SolveError::RewardCountMismatch {
                expected: model.state_count(),
                found: rewards.len(),
            });
        }

        let arity = rewards.first().map_or(0, RewardVec::len);
        for vector in &rewards {
            if vector.len() != arity {
                return Err(SolveError::MixedRewardArity {
                    first: arity,
                    other: vector.len(),
                });
            }
        }

        // An out-of-range identifier is a construction-time mismatch between
        // the reward builder and the worth expression.
        if worth.arity_bound() > arity {
            return Err(SolveError::ArityMismatch {
                arity,
                required: worth.arity_bound(),
            });
        }

        Ok(ValueIteration {
            model,
            rewards,
            worth,
            config,
            truncation: f64::trunc,
        })
    }

    /// Override the truncation rule applied to merits of `Trunc`-marked
    /// worth expressions before action selection.
    pub fn with_truncation(mut self, truncation: fn(f64) -> f64) -> Self {
        self.truncation = truncation;
        self
    }

    /// Run sweeps until the tolerance is met or the sweep bound is reached.
    pub fn solve(&self) -> Solution {
        self.solve_with_hook(|_| {})
    }

    /// Run sweeps, invoking a callback with metrics after each one.
    pub fn solve_with_hook<F: FnMut(&SweepMetrics)>(&self, mut on_sweep: F) -> Solution {
        let state_count = self.model.state_count();

        // Neutral start: the immediate reward with no continuation.
        let mut values = self.rewards.clone();
        let mut policy: Vec<Option<usize>> = vec![None; state_count];
        let mut converged = false;
        let mut sweeps = 0;
        let mut max_delta = f64::INFINITY;

        for sweep in 1..=self.config.max_sweeps {
            let mut next_values = Vec::with_capacity(state_count);

            for index in 0..state_count {
                let key = StateKey::from(index);
                match self.backup(key, &values) {
                    Some((action_index, vector)) => {
                        policy[index] = Some(action_index);
                        next_values.push(vector);
                    }
                    // No actions: the value stays at the immediate reward and
                    // no policy entry is assigned.
                    None => next_values.push(self.rewards[index].clone()),
                }
            }

            let delta = values
                .iter()
                .zip(next_values.iter())
                .map(|(old, new)| old.max_abs_diff(new))
                .fold(0.0, f64::max);

            values = next_values;
            sweeps = sweep;
            max_delta = delta;
            on_sweep(&SweepMetrics {
                sweep,
                max_delta: delta,
            });

            if delta <= self.config.tolerance {
                converged = true;
                break;
            }
        }

        Solution {
            state_ids: self.model.state_ids().map(str::to_string).collect(),
            state_index: self
                .model
                .state_ids()
                .enumerate()
                .map(|(index, id)| (id.to_string(), index))
                .collect(),
            action_ids: (0..state_count)
                .map(|index| {
                    let key = StateKey::from(index);
                    policy[index]
                        .and_then(|action| self.model.action_id(key, action))
                        .map(str::to_string)
                })
                .collect(),
            values,
            converged,
            sweeps,
            max_delta,
        }
    }

    /// One Bellman backup for one state against the frozen value table.
    /// Returns the winning `(action_index, candidate_vector)`, or `None` for
    /// an actionless state.
    fn backup(&self, key: StateKey, frozen: &[RewardVec]) -> Option<(usize, RewardVec)> {
        let num_actions = self.model.num_actions(key)?;
        let index = key.index();

        let mut best: Option<(usize, RewardVec, Merit)> = None;
        for action_index in 0..num_actions {
            let outcomes = self.model.outcomes(key, action_index)?;

            let mut candidate = self.rewards[index].clone();
            for &(next, prob) in outcomes {
                candidate.add_scaled(&frozen[next.index()], prob * self.config.discount);
            }

            let mut merit = self.worth.score(candidate.as_slice());
            if self.worth.truncates() {
                merit = merit.map_scalars(self.truncation);
            }

            // Strictly-greater replacement only: merit ties resolve to the
            // earliest registered action, keeping the policy deterministic.
            let wins = match &best {
                None => true,
                Some((_, _, best_merit)) => merit.total_cmp(best_merit) == Ordering::Greater,
            };
            if wins {
                best = Some((action_index, candidate, merit));
            }
        }

        best.map(|(action_index, vector, _)| (action_index, vector))
    }
}

impl fmt::Debug for ValueIteration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueIteration")
            .field("states", &self.model.state_count())
            .field("worth", self.worth.expr())
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Debug, Clone)]
/// The converged (or best-effort) result of a run: vector value function,
/// deterministic policy, and convergence report.
pub struct Solution {
    state_ids: Vec<String>,
    state_index: HashMap<String, usize>,
    action_ids: Vec<Option<String>>,
    values: Vec<RewardVec>,
    converged: bool,
    sweeps: usize,
    max_delta: f64,
}

impl Solution {
    /// Whether the tolerance was met before the sweep bound.
    /// `false` means the values are best-effort, not wrong.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Sweeps actually performed.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Final sweep's largest componentwise value change.
    pub fn max_delta(&self) -> f64 {
        self.max_delta
    }

    fn index_of(&self, state_id: &str) -> Result<usize, SolveError> {
        self.state_index
            .get(state_id)
            .copied()
            .ok_or_else(|| SolveError::UnknownState {
                state: state_id.to_string(),
            })
    }

    /// The value vector computed for a state.
    pub fn value(&self, state_id: &str) -> Result<&RewardVec, SolveError> {
        let index = self.index_of(state_id)?;
        Ok(&self.values[index])
    }

    /// The selected action at a state. Fails explicitly for states with no
    /// registered actions instead of defaulting.
    pub fn policy(&self, state_id: &str) -> Result<&str, SolveError> {
        let index = self.index_of(state_id)?;
        self.action_ids[index]
            .as_deref()
            .ok_or_else(|| SolveError::NoActionAvailable {
                state: state_id.to_string(),
            })
    }

    /// `(state_id, selected_action)` pairs in state registration order.
    /// Actionless states carry `None`.
    pub fn policy_entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.state_ids
            .iter()
            .map(String::as_str)
            .zip(self.action_ids.iter().map(Option::as_deref))
    }

    /// Render the full policy, one `state -> action` line per state.
    pub fn display_policy(&self) -> String {
        let mut out = String::new();
        for (state, action) in self.policy_entries() {
            out.push_str(state);
            out.push_str(" -> ");
            out.push_str(action.unwrap_or("(no action)"));
            out.push('\n');
        }
        out
    }

    pub(crate) fn state_rows(&self) -> impl Iterator<Item = (&str, &RewardVec, Option<&str>)> {
        self.state_ids
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
            .zip(self.action_ids.iter().map(Option::as_deref))
            .map(|((state, value), action)| (state, value, action))
    }
}
