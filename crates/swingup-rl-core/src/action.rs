//! Action representations and action spaces

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for actions in an RL environment
pub trait Action: Clone + Debug + Send + Sync {
    /// Convert action to a vector representation
    fn to_vec(&self) -> Vec<f64>;
}

/// Trait for defining action spaces
pub trait ActionSpace: Send + Sync {
    /// The type of actions in this space
    type Action: Action;

    /// Sample a random action from the space using the caller's generator
    fn sample(&self, rng: &mut dyn RngCore) -> Self::Action;

    /// Check if an action is valid within this space
    fn contains(&self, action: &Self::Action) -> bool;

    /// Get the dimensionality of the action space
    fn dim(&self) -> Option<usize>;
}

/// Continuous action (e.g., for continuous control)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousAction(pub Vec<f64>);

impl Action for ContinuousAction {
    fn to_vec(&self) -> Vec<f64> {
        self.0.clone()
    }
}

impl From<f64> for ContinuousAction {
    fn from(value: f64) -> Self {
        Self(vec![value])
    }
}

/// Continuous action space (box)
#[derive(Debug, Clone)]
pub struct ContinuousSpace {
    /// Lower bounds for each dimension
    pub low: Vec<f64>,
    /// Upper bounds for each dimension
    pub high: Vec<f64>,
}

impl ContinuousSpace {
    /// Create a new continuous action space
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> crate::Result<Self> {
        if low.len() != high.len() {
            return Err(crate::RLError::DimensionMismatch {
                expected: low.len(),
                actual: high.len(),
            });
        }
        if let Some((l, h)) = low.iter().zip(&high).find(|(l, h)| l > h) {
            return Err(crate::RLError::InvalidConfig(format!(
                "lower bound {l} exceeds upper bound {h}"
            )));
        }
        Ok(Self { low, high })
    }
}

impl ActionSpace for ContinuousSpace {
    type Action = ContinuousAction;

    fn sample(&self, rng: &mut dyn RngCore) -> Self::Action {
        let values: Vec<f64> = self.low.iter()
            .zip(&self.high)
            .map(|(l, h)| rng.gen_range(*l..=*h))
            .collect();

        ContinuousAction(values)
    }

    fn contains(&self, action: &Self::Action) -> bool {
        action.0.len() == self.low.len() &&
        action.0.iter()
            .zip(&self.low)
            .zip(&self.high)
            .all(|((x, l), h)| x >= l && x <= h)
    }

    fn dim(&self) -> Option<usize> {
        Some(self.low.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_mismatched_bounds() {
        assert!(ContinuousSpace::new(vec![-1.0], vec![1.0, 2.0]).is_err());
        assert!(ContinuousSpace::new(vec![1.0], vec![-1.0]).is_err());
    }

    #[test]
    fn test_contains_checks_length() {
        let space = ContinuousSpace::new(vec![-1.0], vec![1.0]).unwrap();
        assert!(space.contains(&ContinuousAction::from(0.5)));
        assert!(!space.contains(&ContinuousAction(vec![0.5, 0.5])));
        assert!(!space.contains(&ContinuousAction::from(1.5)));
    }

    proptest! {
        #[test]
        fn sampled_actions_stay_in_bounds(seed in any::<u64>()) {
            let space = ContinuousSpace::new(vec![-1.0, 0.0], vec![1.0, 0.0]).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let action = space.sample(&mut rng);
            prop_assert!(space.contains(&action));
        }
    }
}
