use crate::{ActionSpec, CompiledModel, ModelError, ModelSpec, StateSpec, TransitionSpec};

#[derive(Debug, Clone, Default)]
/// Incremental transition-structure builder.
///
/// The state set is derived from what gets registered: a state is declared
/// the first time it appears as a source, and states that only ever appear
/// as successors are declared (actionless) when the spec is built.
/// Registration order of states and of actions within a state is preserved,
/// it is the engine's deterministic tie-break order.
pub struct ModelBuilder {
    states: Vec<StateSpec>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action at a state with its distribution over successors.
    ///
    /// Re-registering an action id at the same state is caught by
    /// validation, not silently replaced.
    pub fn add_action<N>(
        &mut self,
        state_id: impl Into<String>,
        action_id: impl Into<String>,
        transitions: impl IntoIterator<Item = (N, f64)>,
    ) -> &mut Self
    where
        N: Into<String>,
    {
        let state_id = state_id.into();
        let transitions = transitions
            .into_iter()
            .map(|(next, prob)| TransitionSpec {
                next: next.into(),
                prob,
            })
            .collect();

        let index = match self.states.iter().position(|s| s.id == state_id) {
            Some(index) => index,
            None => {
                self.states.push(StateSpec {
                    id: state_id,
                    actions: Vec::new(),
                });
                self.states.len() - 1
            }
        };

        self.states[index].actions.push(ActionSpec {
            id: action_id.into(),
            transitions,
        });

        self
    }

    /// Finish the spec, declaring successor-only states, and validate it.
    pub fn build_spec(self) -> Result<ModelSpec, ModelError> {
        let mut states = self.states;

        // Successor-only states become actionless declarations, in first
        // mention order.
        let mut successors: Vec<String> = Vec::new();
        for state in &states {
            for action in &state.actions {
                for transition in &action.transitions {
                    let known = states.iter().any(|s| s.id == transition.next)
                        || successors.iter().any(|id| *id == transition.next);
                    if !known {
                        successors.push(transition.next.clone());
                    }
                }
            }
        }
        for id in successors {
            states.push(StateSpec {
                id,
                actions: Vec::new(),
            });
        }

        let spec = ModelSpec {
            version: Some(1),
            states,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Build, validate, and compile in one step.
    pub fn compile(self) -> Result<CompiledModel, ModelError> {
        let spec = self.build_spec()?;
        spec.compile()
    }
}
