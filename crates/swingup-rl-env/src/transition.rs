//! Observation, reward and termination rules of the swing-up task

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};
use swingup_rl_core::{Observation, Reward, RewardFunction};

use crate::config::SwingUpConfig;
use crate::physics::BodyState;

/// Largest `|pole_angle|` still counted as balanced, 10° from upright
pub const STAND_THRESHOLD: f64 = 1.0 / 18.0;

/// Reward for the step on which the pole falls out of the balanced band
pub const LOSS_OF_BALANCE_PENALTY: f64 = -50.0;

/// Reward for the step on which the cart reaches a track boundary
pub const BOUNDARY_PENALTY: f64 = -100.0;

/// Normalized view of the physical state, every component in `[-1, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingUpObservation {
    /// Cart horizontal velocity
    pub cart_velocity: f64,
    /// 0 upright, ±1 hanging straight down
    pub pole_angle: f64,
    /// Pole angular velocity
    pub pole_angular_velocity: f64,
    /// 0 on target, -1 at the left bound, +1 at the right bound
    pub target_distance: f64,
}

impl SwingUpObservation {
    /// Components in observation order
    #[must_use]
    pub fn components(&self) -> [f64; 4] {
        [
            self.cart_velocity,
            self.pole_angle,
            self.pole_angular_velocity,
            self.target_distance,
        ]
    }

    /// Pole within the balanced band
    #[must_use]
    pub fn is_standing(&self) -> bool {
        self.pole_angle.abs() <= STAND_THRESHOLD
    }

    /// Cart has reached a track boundary
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn at_boundary(&self) -> bool {
        self.target_distance.abs() == 1.0
    }
}

impl Observation for SwingUpObservation {
    fn to_vec(&self) -> Vec<f64> {
        self.components().to_vec()
    }

    fn shape(&self) -> Vec<usize> {
        vec![4]
    }
}

/// Maps raw body state onto [`SwingUpObservation`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    velocity_scale: f64,
    angular_velocity_scale: f64,
    left_bound: f64,
    right_bound: f64,
}

impl Normalizer {
    /// Scales and bounds taken from the configuration
    #[must_use]
    pub fn from_config(config: &SwingUpConfig) -> Self {
        Self {
            velocity_scale: config.velocity_scale,
            angular_velocity_scale: config.angular_velocity_scale,
            left_bound: config.left_bound(),
            right_bound: config.right_bound(),
        }
    }

    /// Observe the cart and pole relative to `target`.
    #[must_use]
    pub fn observe(&self, cart: &BodyState, pole: &BodyState, target: f64) -> SwingUpObservation {
        SwingUpObservation {
            cart_velocity: (cart.velocity[0] / self.velocity_scale).clamp(-1.0, 1.0),
            pole_angle: pole_angle_norm(pole.angle),
            pole_angular_velocity: (pole.angular_velocity / self.angular_velocity_scale)
                .clamp(-1.0, 1.0),
            target_distance: target_distance_norm(
                cart.position[0],
                target,
                self.left_bound,
                self.right_bound,
            ),
        }
    }
}

/// Pole direction folded into `[-1, 1]`: 0 upright, ±1 pointing straight down.
///
/// Positive values lean towards +x.
#[must_use]
pub fn pole_angle_norm(angle: f64) -> f64 {
    let shifted = (angle + FRAC_PI_2).rem_euclid(TAU);
    (1.0 - shifted / PI).clamp(-1.0, 1.0)
}

/// Signed, piecewise linear distance of the cart from the target.
///
/// Left of the target it runs from 0 down to -1 at `left`, right of it from
/// 0 up to +1 at `right`, clipped beyond.
#[must_use]
pub fn target_distance_norm(x: f64, target: f64, left: f64, right: f64) -> f64 {
    if x < target {
        ((x - target) / (target - left)).clamp(-1.0, 0.0)
    } else {
        ((target - x) / (target - right)).clamp(0.0, 1.0)
    }
}

/// Shaped reward for raising the pole and holding it over the target
#[derive(Debug, Clone, Copy, Default)]
pub struct SwingUpReward;

impl SwingUpReward {
    /// Reward of a post-step observation alone, before any override
    #[must_use]
    pub fn shaped(&self, obs: &SwingUpObservation) -> f64 {
        let on_target = 1.0 - obs.target_distance.abs();
        if obs.is_standing() {
            10.0 + on_target * 20.0
        } else {
            let slope = 18.0 / 17.0;
            (-slope * obs.pole_angle.abs() + slope) + on_target * 0.5
        }
    }
}

impl RewardFunction for SwingUpReward {
    type State = SwingUpObservation;
    type Action = f64;

    fn reward(
        &self,
        state: &Self::State,
        _action: &Self::Action,
        next_state: &Self::State,
    ) -> Reward {
        if next_state.at_boundary() {
            return Reward(BOUNDARY_PENALTY);
        }
        if state.is_standing() && !next_state.is_standing() {
            return Reward(LOSS_OF_BALANCE_PENALTY);
        }
        Reward(self.shaped(next_state))
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The cart reached a track boundary
    Boundary,
    /// The step counter reached `max_steps`
    TimeLimit,
}

/// Terminal condition after a step, boundary taking precedence
#[must_use]
pub fn termination(obs: &SwingUpObservation, steps: usize, max_steps: usize) -> Option<Termination> {
    if obs.at_boundary() {
        Some(Termination::Boundary)
    } else if steps >= max_steps {
        Some(Termination::TimeLimit)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn obs(pole_angle: f64, target_distance: f64) -> SwingUpObservation {
        SwingUpObservation {
            cart_velocity: 0.0,
            pole_angle,
            pole_angular_velocity: 0.0,
            target_distance,
        }
    }

    fn body(x: f64, vx: f64, angle: f64, omega: f64) -> BodyState {
        BodyState {
            position: [x, 400.0],
            velocity: [vx, 0.0],
            angle,
            angular_velocity: omega,
        }
    }

    #[test]
    fn test_pole_angle_upright_and_hanging() {
        assert_relative_eq!(pole_angle_norm(FRAC_PI_2), 0.0, epsilon = 1e-12);
        assert_relative_eq!(pole_angle_norm(FRAC_PI_2 + TAU), 0.0, epsilon = 1e-12);
        assert_relative_eq!(pole_angle_norm(-FRAC_PI_2).abs(), 1.0, epsilon = 1e-12);
        // Leaning right of upright is positive, left is negative.
        assert!(pole_angle_norm(FRAC_PI_2 - 0.1) > 0.0);
        assert!(pole_angle_norm(FRAC_PI_2 + 0.1) < 0.0);
    }

    #[test]
    fn test_stand_threshold_is_ten_degrees() {
        let inside = pole_angle_norm(FRAC_PI_2 - 9.9_f64.to_radians());
        let outside = pole_angle_norm(FRAC_PI_2 - 10.1_f64.to_radians());
        assert!(obs(inside, 0.0).is_standing());
        assert!(!obs(outside, 0.0).is_standing());
    }

    #[test]
    fn test_target_distance_piecewise() {
        assert_eq!(target_distance_norm(300.0, 300.0, 40.0, 760.0), 0.0);
        assert_eq!(target_distance_norm(40.0, 300.0, 40.0, 760.0), -1.0);
        assert_eq!(target_distance_norm(20.0, 300.0, 40.0, 760.0), -1.0);
        assert_eq!(target_distance_norm(760.0, 300.0, 40.0, 760.0), 1.0);
        assert_relative_eq!(target_distance_norm(170.0, 300.0, 40.0, 760.0), -0.5);
        assert_relative_eq!(target_distance_norm(530.0, 300.0, 40.0, 760.0), 0.5);
    }

    #[test]
    fn test_shaped_reward_peaks_upright_on_target() {
        let reward = SwingUpReward;
        assert_relative_eq!(reward.shaped(&obs(0.0, 0.0)), 30.0);
        assert_relative_eq!(reward.shaped(&obs(0.0, 0.5)), 20.0);
        assert_relative_eq!(reward.shaped(&obs(1.0, 0.0)), 0.5, epsilon = 1e-12);
        // Continuous with the balanced band's edge on the unbalanced side.
        assert_relative_eq!(reward.shaped(&obs(STAND_THRESHOLD + 1e-12, 1.0 - 1e-12)), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_loss_of_balance_penalty() {
        let reward = SwingUpReward;
        let before = obs(0.05, 0.0);
        let after = obs(0.06, 0.0);
        assert_eq!(reward.reward(&before, &0.0, &after), Reward(LOSS_OF_BALANCE_PENALTY));
        // Staying unbalanced is not penalised.
        let r = reward.reward(&obs(0.5, 0.0), &0.0, &obs(0.6, 0.0));
        assert!(r.value() > 0.0);
    }

    #[test]
    fn test_boundary_overrides_everything() {
        let reward = SwingUpReward;
        assert_eq!(reward.reward(&obs(0.0, 0.0), &1.0, &obs(0.5, -1.0)), Reward(BOUNDARY_PENALTY));
        assert_eq!(reward.reward(&obs(0.0, 0.0), &1.0, &obs(0.0, 1.0)), Reward(BOUNDARY_PENALTY));
    }

    #[test]
    fn test_termination_precedence() {
        assert_eq!(termination(&obs(0.0, 1.0), 10, 10), Some(Termination::Boundary));
        assert_eq!(termination(&obs(0.0, 0.2), 10, 10), Some(Termination::TimeLimit));
        assert_eq!(termination(&obs(0.0, 0.2), 9, 10), None);
    }

    proptest! {
        #[test]
        fn observation_is_always_clipped(
            x in -1.0e6..1.0e6f64,
            vx in -1.0e6..1.0e6f64,
            angle in -1.0e3..1.0e3f64,
            omega in -1.0e4..1.0e4f64,
            target in 150.0..650.0f64,
        ) {
            let normalizer = Normalizer::from_config(&SwingUpConfig::default());
            let o = normalizer.observe(&body(x, vx, 0.0, 0.0), &body(0.0, 0.0, angle, omega), target);
            for value in o.components() {
                prop_assert!((-1.0..=1.0).contains(&value));
            }
        }

        #[test]
        fn distance_sign_matches_side(x in 0.0..800.0f64, target in 150.0..650.0f64) {
            let d = target_distance_norm(x, target, 40.0, 760.0);
            if x < target {
                prop_assert!(d <= 0.0);
            } else {
                prop_assert!(d >= 0.0);
            }
        }
    }
}
