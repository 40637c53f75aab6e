mod builder;
mod compiled;
mod engine;
mod error;
mod io;
mod snapshot;
mod spec;

pub use builder::ModelBuilder;
pub use compiled::{CompiledModel, StateKey};
pub use engine::{Solution, SolveConfig, SolveConfigError, SweepMetrics, ValueIteration};
pub use error::{ModelError, SolveError};
pub use io::{compile_yaml, load_yaml, save_yaml};
pub use snapshot::{SolutionSnapshot, StateSnapshot};
pub use spec::{ActionSpec, ModelSpec, StateSpec, TransitionSpec};
