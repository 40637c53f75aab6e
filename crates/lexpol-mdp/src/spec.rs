use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CompiledModel, ModelError, compiled::PROB_TOLERANCE};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Serializable transition-structure schema used for YAML IO and validation.
///
/// Rewards are deliberately absent: they are vector-valued, state-based, and
/// supplied separately through a reward stack. There is no start state either,
/// the engine sweeps every state, and no terminal flag, absorption is just a
/// self-loop.
pub struct ModelSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// All state declarations in the model.
    pub states: Vec<StateSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A single state declaration.
pub struct StateSpec {
    /// Unique state id.
    pub id: String,
    /// Available actions from this state. A state that only ever appears as
    /// a successor has none.
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A named action and its distribution over successor states.
pub struct ActionSpec {
    pub id: String,
    pub transitions: Vec<TransitionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One probabilistic transition for an action.
pub struct TransitionSpec {
    pub next: String,
    pub prob: f64,
}

impl ModelSpec {
    /// Validate schema invariants using the crate default tolerance.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.validate_with_tolerance(PROB_TOLERANCE)
    }

    /// Validate ids, transitions, and probability constraints.
    ///
    /// A distribution that does not sum to 1 is rejected outright, never
    /// renormalized.
    pub fn validate_with_tolerance(&self, tolerance: f64) -> Result<(), ModelError> {
        // State ids must be unique.
        let mut ids = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if !ids.insert(state.id.as_str()) {
                return Err(ModelError::DuplicateStateId {
                    id: state.id.clone(),
                });
            }
        }

        for state in &self.states {
            let mut action_ids = HashSet::with_capacity(state.actions.len());
            for action in &state.actions {
                if !action_ids.insert(action.id.as_str()) {
                    return Err(ModelError::DuplicateActionId {
                        state: state.id.clone(),
                        action: action.id.clone(),
                    });
                }

                if action.transitions.is_empty() {
                    return Err(ModelError::EmptyTransitions {
                        state: state.id.clone(),
                        action: action.id.clone(),
                    });
                }

                let mut sum = 0.0_f64;
                for (i, transition) in action.transitions.iter().enumerate() {
                    if !transition.prob.is_finite() || transition.prob < 0.0 {
                        return Err(ModelError::InvalidProbability {
                            state: state.id.clone(),
                            action: action.id.clone(),
                            transition_index: i,
                            value: transition.prob,
                        });
                    }

                    if !ids.contains(transition.next.as_str()) {
                        return Err(ModelError::UnknownNextState {
                            state: state.id.clone(),
                            action: action.id.clone(),
                            next: transition.next.clone(),
                        });
                    }

                    sum += transition.prob;
                }

                // Transition probabilities for an action must sum to 1 within
                // tolerance.
                if (sum - 1.0).abs() > tolerance {
                    return Err(ModelError::ProbabilitySum {
                        state: state.id.clone(),
                        action: action.id.clone(),
                        sum,
                        tolerance,
                    });
                }
            }
        }

        Ok(())
    }

    /// Compile this spec into the runtime representation.
    pub fn compile(&self) -> Result<CompiledModel, ModelError> {
        CompiledModel::from_spec(self)
    }
}
