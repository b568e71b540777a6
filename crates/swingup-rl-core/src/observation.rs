//! Observation representations and observation spaces

use ndarray::Array1;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Trait for observations from an environment
pub trait Observation: Clone + Debug + Send + Sync {
    /// Convert observation to a feature vector
    fn to_vec(&self) -> Vec<f64>;

    /// Get the shape of the observation
    fn shape(&self) -> Vec<usize>;

    /// Feature vector as an ndarray, for agent code
    fn to_array(&self) -> Array1<f64> {
        Array1::from(self.to_vec())
    }
}

/// Trait for defining observation spaces
pub trait ObservationSpace: Send + Sync {
    /// The type of observations in this space
    type Observation: Observation;

    /// Check if an observation is valid within this space
    fn contains(&self, obs: &Self::Observation) -> bool;

    /// Get the shape of observations in this space
    fn shape(&self) -> Vec<usize>;
}

/// Box observation space
#[derive(Debug, Clone)]
pub struct BoxObservationSpace<O> {
    /// Lower bounds
    pub low: Vec<f64>,
    /// Upper bounds
    pub high: Vec<f64>,
    /// Shape of observations
    pub shape: Vec<usize>,
    _observation: PhantomData<fn() -> O>,
}

impl<O> BoxObservationSpace<O> {
    /// Create a new box observation space
    pub fn new(low: Vec<f64>, high: Vec<f64>, shape: Vec<usize>) -> crate::Result<Self> {
        let total_size: usize = shape.iter().product();
        if low.len() != total_size || high.len() != total_size {
            return Err(crate::RLError::DimensionMismatch {
                expected: total_size,
                actual: low.len(),
            });
        }
        Ok(Self {
            low,
            high,
            shape,
            _observation: PhantomData,
        })
    }

    /// Flat space `[-bound, bound]^dim`
    #[must_use]
    pub fn symmetric(bound: f64, dim: usize) -> Self {
        Self {
            low: vec![-bound; dim],
            high: vec![bound; dim],
            shape: vec![dim],
            _observation: PhantomData,
        }
    }
}

impl<O: Observation> ObservationSpace for BoxObservationSpace<O> {
    type Observation = O;

    fn contains(&self, obs: &Self::Observation) -> bool {
        let data = obs.to_vec();
        data.len() == self.low.len() &&
        data.iter()
            .zip(&self.low)
            .zip(&self.high)
            .all(|((x, l), h)| x >= l && x <= h)
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }
}
