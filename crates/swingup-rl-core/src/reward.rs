//! Reward signals and reward functions

use serde::{Deserialize, Serialize};

/// Reward signal from the environment
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Reward(pub f64);

impl Reward {
    /// Get the reward value
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Trait for reward functions
pub trait RewardFunction: Send + Sync {
    /// State type
    type State;
    /// Action type
    type Action;

    /// Compute reward for a state-action-next_state transition
    fn reward(
        &self,
        state: &Self::State,
        action: &Self::Action,
        next_state: &Self::State,
    ) -> Reward;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pays the distance travelled.
    struct Progress;

    impl RewardFunction for Progress {
        type State = f64;
        type Action = f64;

        fn reward(&self, state: &f64, _action: &f64, next_state: &f64) -> Reward {
            Reward(next_state - state)
        }
    }

    #[test]
    fn test_reward_function_sees_both_states() {
        assert_eq!(Progress.reward(&1.0, &0.0, &3.5).value(), 2.5);
        assert!(Reward(-1.0) < Reward(0.0));
    }
}
