//! Python environment adapter.

use pyo3::prelude::*;

use crate::core::{Simulator, SimulatorError, Transition};

/// A gymnasium-style Python environment driven from Rust.
///
/// Expects `env.action_space.n` and `env.step(action)` returning
/// `(obs, reward, terminated, truncated, info)`. Snapshots use
/// `copy.deepcopy`. Truncation is ignored; only `terminated` ends a branch.
pub struct PyEnvSimulator {
    env: PyObject,
    num_actions: usize,
}

impl PyEnvSimulator {
    /// Wrap a Python environment object.
    pub fn new(py: Python<'_>, env: PyObject) -> PyResult<Self> {
        let num_actions = env
            .getattr(py, "action_space")?
            .getattr(py, "n")?
            .extract::<usize>(py)?;

        if num_actions == 0 {
            return Err(pyo3::exceptions::PyValueError::new_err(
                "environment must have at least one action",
            ));
        }

        Ok(Self { env, num_actions })
    }

    /// The wrapped Python object.
    pub fn env(&self) -> &PyObject {
        &self.env
    }
}

impl Simulator for PyEnvSimulator {
    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn snapshot(&self) -> Result<Self, SimulatorError> {
        Python::with_gil(|py| {
            let copy = py
                .import_bound("copy")
                .and_then(|module| module.call_method1("deepcopy", (self.env.bind(py),)))
                .map_err(|e| SimulatorError::Snapshot(e.to_string()))?;

            Ok(Self {
                env: copy.unbind(),
                num_actions: self.num_actions,
            })
        })
    }

    fn step(&mut self, action: usize) -> Result<Transition, SimulatorError> {
        self.check_action(action)?;

        Python::with_gil(|py| {
            let result = self
                .env
                .call_method1(py, "step", (action,))
                .map_err(|e| SimulatorError::Step(e.to_string()))?;

            let (_obs, reward, terminated, _truncated, _info): (PyObject, f64, bool, PyObject, PyObject) =
                result
                    .extract(py)
                    .map_err(|e| SimulatorError::Step(format!("unexpected step() result: {}", e)))?;

            Ok(Transition::new(reward, terminated))
        })
    }
}
