//! Environment traits and types

use serde::{Deserialize, Serialize};

use crate::{ActionSpace, Action, Observation, ObservationSpace, Reward, State};

/// Result of a single environment step
#[derive(Debug, Clone)]
pub struct Step<O, S> {
    /// Observation from the environment
    pub observation: O,
    /// Reward signal
    pub reward: Reward,
    /// Whether the episode is done
    pub done: bool,
    /// Whether the episode was truncated (e.g., time limit)
    pub truncated: bool,
    /// Additional info from the environment
    pub info: StepInfo,
    /// Internal state (if available)
    pub state: Option<S>,
}

/// Additional information from a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Custom fields
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl StepInfo {
    /// True when no diagnostics were recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Episode information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Episode ID
    pub id: String,
    /// Total reward
    pub total_reward: f64,
    /// Number of steps
    pub steps: usize,
    /// Whether episode was truncated
    pub truncated: bool,
    /// Start time
    pub start_time: chrono::DateTime<chrono::Utc>,
    /// End time
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
}

/// Configuration for environments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Random seed
    pub seed: Option<u64>,
    /// Maximum episode steps
    pub max_steps: Option<usize>,
    /// Render mode
    pub render_mode: Option<String>,
    /// Additional parameters
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// Core environment trait
///
/// Every call runs to completion before returning; implementations own
/// their simulation state exclusively.
pub trait Environment: Send + Sync {
    /// Observation type
    type Observation: Observation;
    /// Action type
    type Action: Action;
    /// State type
    type State: State;

    /// Get the observation space
    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>>;

    /// Get the action space
    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>>;

    /// Reset the environment
    fn reset(&mut self) -> crate::Result<(Self::Observation, StepInfo)>;

    /// Take a step in the environment
    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::Observation, Self::State>>;

    /// Render the environment (optional)
    fn render(&mut self) -> crate::Result<()> {
        Ok(())
    }

    /// Close the environment
    fn close(&mut self) -> crate::Result<()> {
        Ok(())
    }

    /// Get current episode info
    fn episode_info(&self) -> Option<Episode> {
        None
    }
}

/// Wrapper for environments that tracks episodes
pub struct TrackedEnvironment<E> {
    /// Inner environment
    pub env: E,
    /// Current episode
    pub episode: Option<Episode>,
    /// Step counter
    pub step_count: usize,
}

impl<E> TrackedEnvironment<E> {
    /// Create a new tracked environment
    pub fn new(env: E) -> Self {
        Self {
            env,
            episode: None,
            step_count: 0,
        }
    }
}

impl<E> Environment for TrackedEnvironment<E>
where
    E: Environment,
{
    type Observation = E::Observation;
    type Action = E::Action;
    type State = E::State;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        self.env.observation_space()
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        self.env.action_space()
    }

    fn reset(&mut self) -> crate::Result<(Self::Observation, StepInfo)> {
        // End current episode if exists
        if let Some(ref mut episode) = self.episode {
            if episode.end_time.is_none() {
                episode.end_time = Some(chrono::Utc::now());
            }
        }

        self.episode = Some(Episode {
            id: uuid::Uuid::new_v4().to_string(),
            total_reward: 0.0,
            steps: 0,
            truncated: false,
            start_time: chrono::Utc::now(),
            end_time: None,
        });
        self.step_count = 0;

        self.env.reset()
    }

    fn step(&mut self, action: Self::Action) -> crate::Result<Step<Self::Observation, Self::State>> {
        let step = self.env.step(action)?;

        self.step_count += 1;
        if let Some(ref mut episode) = self.episode {
            episode.total_reward += step.reward.value();
            episode.steps = self.step_count;

            if step.done || step.truncated {
                episode.truncated = step.truncated;
                episode.end_time = Some(chrono::Utc::now());
                tracing::debug!(
                    id = %episode.id,
                    steps = episode.steps,
                    total_reward = episode.total_reward,
                    "episode finished"
                );
            }
        }

        Ok(step)
    }

    fn render(&mut self) -> crate::Result<()> {
        self.env.render()
    }

    fn close(&mut self) -> crate::Result<()> {
        self.env.close()
    }

    fn episode_info(&self) -> Option<Episode> {
        self.episode.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxObservationSpace, ContinuousAction, ContinuousSpace, Terminal};

    #[derive(Debug, Clone)]
    struct Count(f64);

    impl Observation for Count {
        fn to_vec(&self) -> Vec<f64> {
            vec![self.0]
        }

        fn shape(&self) -> Vec<usize> {
            vec![1]
        }
    }

    #[derive(Debug, Clone)]
    struct CountState(Terminal);

    impl State for CountState {
        fn features(&self) -> Vec<f64> {
            Vec::new()
        }

        fn is_terminal(&self) -> bool {
            self.0.is_terminal()
        }
    }

    /// Ends after three steps, paying the action value as reward.
    struct CounterEnv {
        steps: usize,
    }

    impl Environment for CounterEnv {
        type Observation = Count;
        type Action = ContinuousAction;
        type State = CountState;

        fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Count>> {
            Box::new(BoxObservationSpace::new(vec![0.0], vec![3.0], vec![1]).unwrap())
        }

        fn action_space(&self) -> Box<dyn ActionSpace<Action = ContinuousAction>> {
            Box::new(ContinuousSpace::new(vec![0.0], vec![1.0]).unwrap())
        }

        fn reset(&mut self) -> crate::Result<(Count, StepInfo)> {
            self.steps = 0;
            Ok((Count(0.0), StepInfo::default()))
        }

        fn step(&mut self, action: ContinuousAction) -> crate::Result<Step<Count, CountState>> {
            self.steps += 1;
            let done = self.steps >= 3;
            Ok(Step {
                observation: Count(self.steps as f64),
                reward: Reward(action.0[0]),
                done,
                truncated: done,
                info: StepInfo::default(),
                state: Some(CountState(if done { Terminal::Truncated } else { Terminal::No })),
            })
        }
    }

    #[test]
    fn test_tracked_environment_records_episode() {
        let mut env = TrackedEnvironment::new(CounterEnv { steps: 0 });
        assert!(env.episode_info().is_none());

        env.reset().unwrap();
        let mut last = env.step(ContinuousAction::from(0.5)).unwrap();
        while !last.done {
            last = env.step(ContinuousAction::from(0.5)).unwrap();
        }

        let episode = env.episode_info().unwrap();
        assert_eq!(episode.steps, 3);
        assert!((episode.total_reward - 1.5).abs() < 1e-12);
        assert!(episode.truncated);
        assert!(episode.end_time.is_some());
        assert!(last.state.unwrap().is_terminal());
    }

    #[test]
    fn test_reset_starts_new_episode() {
        let mut env = TrackedEnvironment::new(CounterEnv { steps: 0 });
        env.reset().unwrap();
        let first = env.episode_info().unwrap().id;
        env.step(ContinuousAction::from(1.0)).unwrap();
        env.reset().unwrap();
        let second = env.episode_info().unwrap();
        assert_ne!(first, second.id);
        assert_eq!(second.steps, 0);
    }

    #[test]
    fn test_environment_config_params_flatten() {
        let config: EnvironmentConfig = serde_json::from_str(
            r#"{"seed": 7, "max_steps": 20, "force_scale": 600.0}"#,
        ).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_steps, Some(20));
        assert!(config.render_mode.is_none());
        assert_eq!(config.params["force_scale"], serde_json::json!(600.0));
    }
}
