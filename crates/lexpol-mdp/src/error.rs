use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for model loading, validation, compilation, and builder
/// operations.
pub enum ModelError {
    #[error("failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate state id '{id}'")]
    DuplicateStateId { id: String },

    #[error("duplicate action id '{action}' in state '{state}'")]
    DuplicateActionId { state: String, action: String },

    #[error("state '{state}' action '{action}' must contain at least one transition")]
    EmptyTransitions { state: String, action: String },

    #[error(
        "invalid probability in state '{state}', action '{action}', transition {transition_index}: {value}"
    )]
    InvalidProbability {
        state: String,
        action: String,
        transition_index: usize,
        value: f64,
    },

    #[error(
        "probability sum for state '{state}', action '{action}' must be within {tolerance} of 1.0, got {sum}"
    )]
    ProbabilitySum {
        state: String,
        action: String,
        sum: f64,
        tolerance: f64,
    },

    #[error(
        "transition in state '{state}', action '{action}' references unknown next state '{next}'"
    )]
    UnknownNextState {
        state: String,
        action: String,
        next: String,
    },
}

#[derive(Debug, Error)]
/// Error type for engine construction and solution queries.
pub enum SolveError {
    #[error("unknown state '{state}'")]
    UnknownState { state: String },

    #[error("state '{state}' has no registered actions, so no policy entry exists for it")]
    NoActionAvailable { state: String },

    #[error(
        "worth expression references reward component {required} but reward vectors have arity {arity}"
    )]
    ArityMismatch { arity: usize, required: usize },

    #[error("reward table has {found} entries but the model has {expected} states")]
    RewardCountMismatch { expected: usize, found: usize },

    #[error("reward vectors must share one arity, found both {first} and {other}")]
    MixedRewardArity { first: usize, other: usize },
}
