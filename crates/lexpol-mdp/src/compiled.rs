use std::collections::HashMap;

use lexpol_core::{RewardStack, RewardVec};

use crate::{ModelError, ModelSpec};

/// Floating point tolerance used when validating probability sums.
pub(crate) const PROB_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Dense index for states in a compiled model.
pub struct StateKey(usize);

impl StateKey {
    /// Return the underlying state index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for StateKey {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone)]
/// Runtime form of a transition structure with resolved state references.
/// State and action order follow the spec, so iteration and tie-breaking
/// stay in registration order.
pub struct CompiledModel {
    states: Vec<StateRec>,
    state_ids: Vec<String>,
    state_id_to_key: HashMap<String, StateKey>,
}

#[derive(Debug, Clone)]
struct StateRec {
    actions: Vec<ActionRec>,
}

#[derive(Debug, Clone)]
struct ActionRec {
    id: String,
    outcomes: Vec<(StateKey, f64)>,
}

impl CompiledModel {
    /// Compile and validate a spec into a fast runtime representation.
    pub(crate) fn from_spec(spec: &ModelSpec) -> Result<Self, ModelError> {
        spec.validate_with_tolerance(PROB_TOLERANCE)?;

        let mut state_id_to_key = HashMap::with_capacity(spec.states.len());
        let mut state_ids = Vec::with_capacity(spec.states.len());

        for (idx, state) in spec.states.iter().enumerate() {
            let key = StateKey::from(idx);
            state_id_to_key.insert(state.id.clone(), key);
            state_ids.push(state.id.clone());
        }

        let mut states = Vec::with_capacity(spec.states.len());
        for state in &spec.states {
            let mut actions = Vec::with_capacity(state.actions.len());

            for action in &state.actions {
                let mut outcomes = Vec::with_capacity(action.transitions.len());
                for transition in &action.transitions {
                    let next = state_id_to_key.get(&transition.next).copied().ok_or_else(
                        || ModelError::UnknownNextState {
                            state: state.id.clone(),
                            action: action.id.clone(),
                            next: transition.next.clone(),
                        },
                    )?;
                    outcomes.push((next, transition.prob));
                }

                actions.push(ActionRec {
                    id: action.id.clone(),
                    outcomes,
                });
            }

            states.push(StateRec { actions });
        }

        Ok(Self {
            states,
            state_ids,
            state_id_to_key,
        })
    }

    /// Return the number of compiled states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Convert a state key back to its original string id.
    pub fn state_id(&self, key: StateKey) -> Option<&str> {
        self.state_ids.get(key.index()).map(String::as_str)
    }

    /// Convert a string id into a compiled state key.
    pub fn state_key(&self, id: &str) -> Option<StateKey> {
        self.state_id_to_key.get(id).copied()
    }

    /// All state ids in registration order.
    pub fn state_ids(&self) -> impl Iterator<Item = &str> {
        self.state_ids.iter().map(String::as_str)
    }

    /// Return the number of actions available from a state.
    pub fn num_actions(&self, key: StateKey) -> Option<usize> {
        self.states
            .get(key.index())
            .map(|state| state.actions.len())
    }

    /// Action ids available at a state, in registration order.
    pub fn action_ids(&self, key: StateKey) -> Option<impl Iterator<Item = &str>> {
        self.states
            .get(key.index())
            .map(|state| state.actions.iter().map(|action| action.id.as_str()))
    }

    /// Resolve an action index back to its id.
    pub fn action_id(&self, key: StateKey, action_index: usize) -> Option<&str> {
        self.states
            .get(key.index())?
            .actions
            .get(action_index)
            .map(|action| action.id.as_str())
    }

    /// The `(next_state, probability)` distribution for `(state, action)`.
    /// `None` for an unregistered pair, never a default distribution.
    pub fn outcomes(&self, key: StateKey, action_index: usize) -> Option<&[(StateKey, f64)]> {
        self.states
            .get(key.index())?
            .actions
            .get(action_index)
            .map(|action| action.outcomes.as_slice())
    }

    /// Evaluate a reward stack at every state, in state order.
    /// This is the per-state immediate reward table the engine consumes.
    pub fn reward_table(&self, stack: &RewardStack<str>) -> Vec<RewardVec> {
        self.state_ids.iter().map(|id| stack.vector(id)).collect()
    }
}
