//! Cart-pole swing-up environment
//!
//! This crate provides a reinforcement learning environment in which an
//! agent must swing a hanging pole upright by pushing its cart, then keep it
//! balanced above a randomly placed target. Rigid-body dynamics come from
//! rapier2d; rendering to PNG frames is available behind the
//! `visualization` feature.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod episode;
pub mod physics;
pub mod presenter;
pub mod scene;
pub mod swing_up;
pub mod transition;

pub use config::SwingUpConfig;
pub use episode::{EpisodeState, Phase};
pub use physics::{BodyState, Simulation};
pub use presenter::{NullPresenter, Presenter, SceneFrame};
#[cfg(feature = "visualization")]
pub use presenter::FramePresenter;
pub use scene::{Scene, SceneSpec};
pub use swing_up::{PhysicalState, SwingUpEnv};
pub use transition::{SwingUpObservation, SwingUpReward, Termination};

// Re-export core types
pub use swingup_rl_core::{
    Action, ActionSpace, ContinuousAction, Environment, EnvironmentConfig, Episode,
    Observation, ObservationSpace, RLError, Result, Reward, State, Step, StepInfo, Terminal,
    TrackedEnvironment,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{ContinuousAction, SwingUpConfig, SwingUpEnv, TrackedEnvironment};
    pub use swingup_rl_core::prelude::*;
}
