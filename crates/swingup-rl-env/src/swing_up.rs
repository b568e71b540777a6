//! Cart-pole swing-up environment
//!
//! A pole hangs from a cart that slides on a horizontal track. The agent
//! pushes the cart with a force in `[-force_scale, force_scale]` and is paid
//! for raising the pole and holding it upright above a target position drawn
//! at random every episode. Reaching either end of the track ends the episode
//! with a penalty; otherwise it runs for `max_steps` steps.
//!
//! Each step applies the force, damps both bodies, notes whether the pole was
//! balanced, advances the simulation by one increment, then observes, scores
//! and checks termination. Every reset rebuilds the scene from scratch.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use swingup_rl_core::{
    ActionSpace, BoxObservationSpace, ContinuousAction, ContinuousSpace, Environment,
    EnvironmentConfig, ObservationSpace, RLError, Result, RewardFunction, State, Step,
    StepInfo, Terminal,
};

use crate::config::SwingUpConfig;
use crate::episode::{EpisodeState, Phase};
use crate::presenter::{NullPresenter, Presenter, SceneFrame};
use crate::scene::{Scene, SceneSpec};
use crate::transition::{termination, Normalizer, SwingUpObservation, SwingUpReward, Termination};

/// Raw physical state after a step, in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalState {
    /// Cart horizontal position
    pub cart_x: f64,
    /// Cart horizontal velocity
    pub cart_velocity: f64,
    /// Absolute pole angle
    pub pole_angle: f64,
    /// Pole angular velocity
    pub pole_angular_velocity: f64,
    /// Episode status at the time of the snapshot
    pub terminal: Terminal,
}

impl State for PhysicalState {
    fn features(&self) -> Vec<f64> {
        vec![
            self.cart_x,
            self.cart_velocity,
            self.pole_angle,
            self.pole_angular_velocity,
        ]
    }

    fn is_terminal(&self) -> bool {
        self.terminal.is_terminal()
    }
}

/// The swing-up environment
pub struct SwingUpEnv {
    config: SwingUpConfig,
    normalizer: Normalizer,
    reward_fn: SwingUpReward,
    rng: StdRng,
    scene: Scene,
    episode: EpisodeState,
    force: f64,
    presenter: Box<dyn Presenter>,
}

impl SwingUpEnv {
    /// Create an environment, opening the frame presenter when
    /// `render_enabled` is set. The first episode is ready immediately.
    pub fn new(config: SwingUpConfig) -> Result<Self> {
        config.validate()?;
        let presenter = open_presenter(&config)?;
        Ok(Self::assemble(config, presenter))
    }

    /// Create an environment from the generic configuration record
    pub fn from_env_config(env: &EnvironmentConfig) -> Result<Self> {
        Self::new(SwingUpConfig::from_env_config(env)?)
    }

    /// Create an environment that renders through `presenter`
    pub fn with_presenter(config: SwingUpConfig, presenter: Box<dyn Presenter>) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, presenter))
    }

    /// Build the first scene from an already validated configuration
    fn assemble(config: SwingUpConfig, presenter: Box<dyn Presenter>) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let scene = SceneSpec::sample(&config, &mut rng).build(&config);

        info!(
            max_steps = config.max_steps,
            force_scale = config.force_scale,
            seed = ?config.seed,
            render = config.render_enabled,
            "swing-up environment created"
        );

        Self {
            normalizer: Normalizer::from_config(&config),
            reward_fn: SwingUpReward,
            rng,
            scene,
            episode: EpisodeState::new(config.max_steps),
            force: 0.0,
            presenter,
            config,
        }
    }

    /// Reseed the generator; the next reset draws from the new sequence
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Environment configuration
    #[must_use]
    pub fn config(&self) -> &SwingUpConfig {
        &self.config
    }

    /// Target position of the current episode
    #[must_use]
    pub fn target(&self) -> f64 {
        self.scene.target()
    }

    /// Initial configuration of the current episode
    #[must_use]
    pub fn scene_spec(&self) -> &SceneSpec {
        self.scene.spec()
    }

    /// Steps taken in the current episode
    #[must_use]
    pub fn steps(&self) -> usize {
        self.episode.steps()
    }

    /// Lifecycle phase of the current episode
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.episode.phase()
    }

    /// The done flag
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.episode.is_done()
    }

    /// Observation of the current physical state
    #[must_use]
    pub fn observe(&self) -> SwingUpObservation {
        self.normalizer.observe(
            &self.scene.cart_state(),
            &self.scene.pole_state(),
            self.scene.target(),
        )
    }

    /// Raw physical state
    #[must_use]
    pub fn physical_state(&self) -> PhysicalState {
        let cart = self.scene.cart_state();
        let pole = self.scene.pole_state();
        PhysicalState {
            cart_x: cart.position[0],
            cart_velocity: cart.velocity[0],
            pole_angle: pole.angle,
            pole_angular_velocity: pole.angular_velocity,
            terminal: self.episode.terminal(),
        }
    }

    /// Snapshot for presenters
    #[must_use]
    pub fn scene_frame(&self) -> SceneFrame {
        let config = &self.config;
        let cart = self.scene.cart_state();
        let pole = self.scene.pole_state();
        let pivot = self
            .scene
            .simulation()
            .world_point(self.scene.pole(), [-config.pole_length / 2.0, 0.0]);

        SceneFrame {
            track_length: config.track_length,
            track_y: config.track_y,
            cart_center: cart.position,
            cart_half_extents: [config.cart_width / 2.0, config.cart_height / 2.0],
            pole_center: pole.position,
            pole_angle: pole.angle,
            pole_half_extents: [config.pole_length / 2.0, config.pole_thickness / 2.0],
            pivot,
            target: self.scene.target(),
            force: self.force,
            force_scale: config.force_scale,
        }
    }
}

impl Environment for SwingUpEnv {
    type Observation = SwingUpObservation;
    type Action = ContinuousAction;
    type State = PhysicalState;

    fn observation_space(&self) -> Box<dyn ObservationSpace<Observation = Self::Observation>> {
        Box::new(BoxObservationSpace::symmetric(1.0, 4))
    }

    fn action_space(&self) -> Box<dyn ActionSpace<Action = Self::Action>> {
        Box::new(ContinuousSpace {
            low: vec![-1.0],
            high: vec![1.0],
        })
    }

    fn reset(&mut self) -> Result<(Self::Observation, StepInfo)> {
        let spec = SceneSpec::sample(&self.config, &mut self.rng);
        self.scene = spec.build(&self.config);
        self.episode.reset();
        self.force = 0.0;

        info!(target_x = spec.target, tilt = spec.tilt, "episode reset");
        Ok((self.observe(), StepInfo::default()))
    }

    /// Advance one increment under `action`, a single value expected in
    /// `[-1, 1]`. Out-of-range values are applied as given.
    fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation, Self::State>> {
        self.episode.ensure_steppable()?;
        let value = match action.0.as_slice() {
            [value] => *value,
            other => {
                return Err(RLError::DimensionMismatch {
                    expected: 1,
                    actual: other.len(),
                })
            }
        };
        if !(-1.0..=1.0).contains(&value) {
            warn!(action = value, "action outside [-1, 1], applying unclipped");
        }

        self.force = value * self.config.force_scale;
        let (cart, pole) = (self.scene.cart(), self.scene.pole());
        let simulation = self.scene.simulation_mut();
        simulation.apply_horizontal_force(cart, self.force);
        simulation.damp_velocity(pole, self.config.pole_damping);
        simulation.damp_velocity(cart, self.config.cart_damping);

        // Balance is judged before the physics advance.
        let before = self.observe();

        self.scene.simulation_mut().step();
        let steps = self.episode.advance();

        let observation = self.observe();
        let reward = self.reward_fn.reward(&before, &value, &observation);
        let cause = termination(&observation, steps, self.episode.max_steps());
        if let Some(cause) = cause {
            self.episode.terminate(cause);
            info!(?cause, steps, reward = reward.value(), "episode terminated");
        }

        debug!(
            steps,
            force = self.force,
            reward = reward.value(),
            done = self.episode.is_done(),
            "step"
        );

        Ok(Step {
            observation,
            reward,
            done: self.episode.is_done(),
            truncated: cause == Some(Termination::TimeLimit),
            info: StepInfo::default(),
            state: Some(self.physical_state()),
        })
    }

    fn render(&mut self) -> Result<()> {
        let frame = self.scene_frame();
        self.presenter.present(&frame)
    }

    fn close(&mut self) -> Result<()> {
        self.presenter.close()
    }
}

fn open_presenter(config: &SwingUpConfig) -> Result<Box<dyn Presenter>> {
    if config.render_enabled {
        open_frame_presenter(config)
    } else {
        Ok(Box::new(NullPresenter))
    }
}

#[cfg(feature = "visualization")]
fn open_frame_presenter(config: &SwingUpConfig) -> Result<Box<dyn Presenter>> {
    let presenter = crate::presenter::FramePresenter::new(&config.frame_dir, config.frame_rate)?;
    Ok(Box::new(presenter))
}

#[cfg(not(feature = "visualization"))]
fn open_frame_presenter(_config: &SwingUpConfig) -> Result<Box<dyn Presenter>> {
    Err(RLError::Render(
        "rendering requires the `visualization` feature".to_string(),
    ))
}
