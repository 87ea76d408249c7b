//! Cart-pole balancing task.
//!
//! A pole is hinged to a cart moving along a frictionless track. Action 0
//! pushes the cart left, action 1 pushes it right. Every step earns a reward
//! of 1 until the pole falls past 12 degrees or the cart leaves the track.
//!
//! Dynamics use explicit Euler integration with the classic constants
//! (gravity 9.8, cart mass 1.0, pole mass 0.1, pole half-length 0.5,
//! force 10, time step 0.02).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{SimRng, Simulator, SimulatorError, Transition};

const GRAVITY: f64 = 9.8;
const MASS_CART: f64 = 1.0;
const MASS_POLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASS_CART + MASS_POLE;
const HALF_LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = MASS_POLE * HALF_LENGTH;
const FORCE_MAG: f64 = 10.0;
const TAU: f64 = 0.02;

/// Pole angle at which the episode fails (12 degrees).
pub const THETA_THRESHOLD: f64 = 12.0 * 2.0 * std::f64::consts::PI / 360.0;

/// Cart position at which the episode fails.
pub const X_THRESHOLD: f64 = 2.4;

/// Physical state of the cart and pole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartPoleState {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}

impl CartPoleState {
    /// Has the cart left the track or the pole fallen?
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.x.abs() > X_THRESHOLD || self.theta.abs() > THETA_THRESHOLD
    }
}

/// Cart-pole simulator. Cloning produces an independent snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct CartPole {
    state: CartPoleState,

    /// Steps taken since termination (None while running).
    steps_beyond_terminated: Option<u32>,

    /// Steps taken since reset.
    elapsed_steps: u32,
}

impl CartPole {
    /// Create a cart-pole with each state component drawn uniformly from
    /// `[-0.05, 0.05]`.
    pub fn new(seed: u64) -> Self {
        let mut rng = SimRng::new(seed);
        let state = CartPoleState {
            x: rng.gen_range_f64(-0.05, 0.05),
            x_dot: rng.gen_range_f64(-0.05, 0.05),
            theta: rng.gen_range_f64(-0.05, 0.05),
            theta_dot: rng.gen_range_f64(-0.05, 0.05),
        };
        Self::with_state(state)
    }

    /// Create a cart-pole in an explicit state.
    pub fn with_state(state: CartPoleState) -> Self {
        Self {
            state,
            steps_beyond_terminated: None,
            elapsed_steps: 0,
        }
    }

    /// Current physical state.
    #[must_use]
    pub fn state(&self) -> CartPoleState {
        self.state
    }

    /// Steps taken since reset.
    #[must_use]
    pub fn elapsed_steps(&self) -> u32 {
        self.elapsed_steps
    }

    /// Has the episode ended?
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.steps_beyond_terminated.is_some()
    }

    fn integrate(&mut self, action: usize) {
        let CartPoleState { x, x_dot, theta, theta_dot } = self.state;

        let force = if action == 1 { FORCE_MAG } else { -FORCE_MAG };
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (HALF_LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta * cos_theta / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.state = CartPoleState {
            x: x + TAU * x_dot,
            x_dot: x_dot + TAU * x_acc,
            theta: theta + TAU * theta_dot,
            theta_dot: theta_dot + TAU * theta_acc,
        };
    }
}

impl Simulator for CartPole {
    fn num_actions(&self) -> usize {
        2
    }

    fn snapshot(&self) -> Result<Self, SimulatorError> {
        Ok(self.clone())
    }

    fn step(&mut self, action: usize) -> Result<Transition, SimulatorError> {
        self.check_action(action)?;

        self.integrate(action);
        self.elapsed_steps += 1;

        if !self.state.is_failed() && self.steps_beyond_terminated.is_none() {
            return Ok(Transition::new(1.0, false));
        }

        let reward = match self.steps_beyond_terminated {
            None => {
                self.steps_beyond_terminated = Some(0);
                1.0
            }
            Some(beyond) => {
                if beyond == 0 {
                    warn!("stepping a cart-pole that has already terminated");
                }
                self.steps_beyond_terminated = Some(beyond + 1);
                0.0
            }
        };

        Ok(Transition::new(reward, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_is_seeded_and_small() {
        let a = CartPole::new(42);
        let b = CartPole::new(42);
        let c = CartPole::new(43);

        assert_eq!(a, b);
        assert_ne!(a.state(), c.state());

        let s = a.state();
        for v in [s.x, s.x_dot, s.theta, s.theta_dot] {
            assert!(v.abs() <= 0.05);
        }
        assert!(!a.is_terminated());
    }

    #[test]
    fn test_single_step_dynamics() {
        let mut env = CartPole::with_state(CartPoleState::default());
        let t = env.step(1).unwrap();

        assert_eq!(t, Transition::new(1.0, false));

        let s = env.state();
        // Position and angle integrate the old velocities, which were zero.
        assert_eq!(s.x, 0.0);
        assert_eq!(s.theta, 0.0);
        // Pushing right accelerates the cart right and tips the pole left.
        assert!(s.x_dot > 0.0);
        assert!(s.theta_dot < 0.0);

        let expected_x_acc = (10.0 / 1.1) - 0.05 * (-(10.0 / 1.1) / (0.5 * (4.0 / 3.0 - 0.1 / 1.1))) / 1.1;
        assert!((s.x_dot - 0.02 * expected_x_acc).abs() < 1e-12);
    }

    #[test]
    fn test_push_left_mirrors_push_right() {
        let mut left = CartPole::with_state(CartPoleState::default());
        let mut right = CartPole::with_state(CartPoleState::default());
        left.step(0).unwrap();
        right.step(1).unwrap();

        assert!((left.state().x_dot + right.state().x_dot).abs() < 1e-12);
        assert!((left.state().theta_dot + right.state().theta_dot).abs() < 1e-12);
    }

    #[test]
    fn test_falls_when_pushed_one_way() {
        let mut env = CartPole::new(1);
        let mut rewards = 0.0;

        for _ in 0..200 {
            let t = env.step(1).unwrap();
            rewards += t.reward;
            if t.terminal {
                break;
            }
        }

        assert!(env.is_terminated());
        assert!(env.elapsed_steps() < 200);
        assert_eq!(rewards, env.elapsed_steps() as f64);
    }

    #[test]
    fn test_steps_after_termination_pay_nothing() {
        let state = CartPoleState { theta: 0.3, ..CartPoleState::default() };
        let mut env = CartPole::with_state(state);

        assert_eq!(env.step(0).unwrap(), Transition::new(1.0, true));
        assert_eq!(env.step(0).unwrap(), Transition::new(0.0, true));
        assert_eq!(env.step(1).unwrap(), Transition::new(0.0, true));
    }

    #[test]
    fn test_invalid_action() {
        let mut env = CartPole::new(0);
        assert_eq!(
            env.step(2),
            Err(SimulatorError::InvalidAction { action: 2, num_actions: 2 })
        );
        assert_eq!(env.elapsed_steps(), 0);
    }

    #[test]
    fn test_snapshot_independent() {
        let env = CartPole::new(5);
        let mut copy = env.snapshot().unwrap();
        copy.step(0).unwrap();

        assert_eq!(env.elapsed_steps(), 0);
        assert_ne!(env.state(), copy.state());
    }
}
