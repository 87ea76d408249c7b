//! Planner bindings for Python.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::core::SearchError;
use crate::mcts::{MctsConfig, MctsPlanner};

use super::py_env::PyEnvSimulator;

fn to_py_err(err: SearchError) -> PyErr {
    match err {
        SearchError::Simulator(e) => PyRuntimeError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn make_config(exploration: f64, horizon: usize, gamma: f64, seed: u64) -> MctsConfig {
    MctsConfig::default()
        .with_exploration(exploration)
        .with_horizon(horizon)
        .with_gamma(gamma)
        .with_seed(seed)
}

/// UCT planner over a Python environment.
///
/// The environment is deep-copied on construction; the caller's object is
/// never stepped.
#[pyclass(name = "MctsPlanner")]
pub struct PyMctsPlanner {
    inner: MctsPlanner<PyEnvSimulator>,
}

#[pymethods]
impl PyMctsPlanner {
    /// Create a planner.
    ///
    /// # Arguments
    /// - env: gymnasium-style environment with a discrete action space
    /// - exploration: UCT exploration constant (default: 2.0)
    /// - horizon: rollout length (default: 10)
    /// - gamma: rollout discount factor (default: 0.9)
    /// - seed: rollout sampling seed (default: 42)
    #[new]
    #[pyo3(signature = (env, exploration = 2.0, horizon = 10, gamma = 0.9, seed = 42))]
    fn new(
        py: Python<'_>,
        env: PyObject,
        exploration: f64,
        horizon: usize,
        gamma: f64,
        seed: u64,
    ) -> PyResult<Self> {
        let sim = PyEnvSimulator::new(py, env)?;
        let config = make_config(exploration, horizon, gamma, seed);
        let inner = MctsPlanner::new(&sim, config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Search for `iterations` passes and return the best action.
    fn run(&mut self, iterations: u32) -> PyResult<usize> {
        self.inner.run(iterations).map_err(to_py_err)
    }

    /// (action, visits, mean value) for each root child of the latest run.
    fn root_action_values(&self) -> Vec<(usize, u32, f64)> {
        self.inner.root_action_values()
    }

    /// Number of nodes in the latest tree.
    #[getter]
    fn node_count(&self) -> usize {
        self.inner.tree().len()
    }

    fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "MctsPlanner(c={}, horizon={}, gamma={}, seed={})",
            config.exploration_constant, config.rollout_horizon, config.gamma, config.seed
        )
    }
}

/// Plan a single action for `env`.
#[pyfunction]
#[pyo3(signature = (env, iterations, exploration = 2.0, horizon = 10, gamma = 0.9, seed = 42))]
pub fn plan(
    py: Python<'_>,
    env: PyObject,
    iterations: u32,
    exploration: f64,
    horizon: usize,
    gamma: f64,
    seed: u64,
) -> PyResult<usize> {
    let sim = PyEnvSimulator::new(py, env)?;
    let config = make_config(exploration, horizon, gamma, seed);
    crate::mcts::plan(&sim, config, iterations).map_err(to_py_err)
}
