use serde::Serialize;

use crate::Solution;

#[derive(Debug, Clone, Serialize)]
/// Serializable report of a finished run, for display and inspection
/// tooling. Read-only: nothing feeds back into the engine.
pub struct SolutionSnapshot {
    pub schema_version: u32,
    pub converged: bool,
    pub sweeps: usize,
    pub max_delta: f64,
    pub states: Vec<StateSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub id: String,
    pub value: Vec<f64>,
    /// Selected action, absent for states with no registered actions.
    pub action: Option<String>,
}

impl SolutionSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Solution {
    /// Export the solution as a serializable snapshot.
    pub fn snapshot(&self) -> SolutionSnapshot {
        SolutionSnapshot {
            schema_version: 1,
            converged: self.converged(),
            sweeps: self.sweeps(),
            max_delta: self.max_delta(),
            states: self
                .state_rows()
                .map(|(id, value, action)| StateSnapshot {
                    id: id.to_string(),
                    value: value.as_slice().to_vec(),
                    action: action.map(str::to_string),
                })
                .collect(),
        }
    }
}
