//! Scene construction for one episode
//!
//! A [`SceneSpec`] is the immutable, randomized description of an episode's
//! start: where the cart sits, which way the pole points and where the target
//! line is. [`SceneSpec::build`] turns it into a fresh [`Scene`] with its own
//! simulation; nothing from a previous episode is reused.

use nalgebra::{Isometry2, Point2, Vector2};
use rand::Rng;
use rapier2d::prelude::RigidBodyHandle;

use crate::config::SwingUpConfig;
use crate::physics::{BodyState, Simulation};

/// Randomized initial configuration of an episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSpec {
    /// Cart centre
    pub cart: [f64; 2],
    /// Pole direction from pivot to tip, radians
    pub tilt: f64,
    /// Target position on the track
    pub target: f64,
    /// Pole length
    pub pole_length: f64,
}

impl SceneSpec {
    /// Draw the target position, then the pole tilt, from the configured ranges.
    pub fn sample<R: Rng + ?Sized>(config: &SwingUpConfig, rng: &mut R) -> Self {
        let [target_low, target_high] = config.target_range;
        let target = rng.gen_range(target_low..=target_high);
        let [tilt_low, tilt_high] = config.tilt_range;
        let tilt = rng.gen_range(tilt_low..=tilt_high);

        Self {
            cart: config.initial_cart,
            tilt,
            target,
            pole_length: config.pole_length,
        }
    }

    fn pole_frame(&self) -> Isometry2<f64> {
        Isometry2::new(Vector2::new(self.cart[0], self.cart[1]), self.tilt)
    }

    /// Centre of the pole
    #[must_use]
    pub fn pole_center(&self) -> [f64; 2] {
        let center = self.pole_frame() * Point2::new(self.pole_length / 2.0, 0.0);
        [center.x, center.y]
    }

    /// Free end of the pole
    #[must_use]
    pub fn pole_tip(&self) -> [f64; 2] {
        let tip = self.pole_frame() * Point2::new(self.pole_length, 0.0);
        [tip.x, tip.y]
    }

    /// Create the track, cart, pole and their joints in a new simulation.
    #[must_use]
    pub fn build(&self, config: &SwingUpConfig) -> Scene {
        let mut simulation = Simulation::new(config.gravity, config.dt);

        let track = simulation.add_fixed_body([0.0, 0.0]);
        let cart = simulation.add_box_body(
            self.cart,
            0.0,
            [config.cart_width / 2.0, config.cart_height / 2.0],
            config.cart_mass,
        );
        let pole = simulation.add_box_body(
            self.pole_center(),
            self.tilt,
            [config.pole_length / 2.0, config.pole_thickness / 2.0],
            config.pole_mass,
        );

        simulation.add_slider(track, cart, [0.0, config.track_y], config.slider_limits());
        simulation.add_pivot(cart, pole, [0.0, 0.0], [-config.pole_length / 2.0, 0.0]);

        tracing::debug!(
            target_x = self.target,
            tilt = self.tilt,
            "scene built"
        );

        Scene {
            spec: *self,
            simulation,
            cart,
            pole,
        }
    }
}

/// Live physical configuration of one episode
pub struct Scene {
    spec: SceneSpec,
    simulation: Simulation,
    cart: RigidBodyHandle,
    pole: RigidBodyHandle,
}

impl Scene {
    /// The description this scene was built from
    #[must_use]
    pub fn spec(&self) -> &SceneSpec {
        &self.spec
    }

    /// Target position of this episode
    #[must_use]
    pub fn target(&self) -> f64 {
        self.spec.target
    }

    /// Cart body handle
    #[must_use]
    pub fn cart(&self) -> RigidBodyHandle {
        self.cart
    }

    /// Pole body handle
    #[must_use]
    pub fn pole(&self) -> RigidBodyHandle {
        self.pole
    }

    /// Current cart kinematics
    #[must_use]
    pub fn cart_state(&self) -> BodyState {
        self.simulation.body_state(self.cart)
    }

    /// Current pole kinematics
    #[must_use]
    pub fn pole_state(&self) -> BodyState {
        self.simulation.body_state(self.pole)
    }

    /// Read access to the simulation
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Write access to the simulation
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }
}
