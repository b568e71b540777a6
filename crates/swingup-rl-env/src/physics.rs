//! Owned rigid-body simulation context
//!
//! Wraps one rapier2d world. The environment only adds bodies and joints
//! while building a scene, then applies a force, damps velocities, advances a
//! fixed increment and reads kinematic state back.

use rapier2d::prelude::*;

/// Kinematic state of one body, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// Centre of mass position
    pub position: [f64; 2],
    /// Linear velocity
    pub velocity: [f64; 2],
    /// Absolute rotation in radians, within `(-π, π]`
    pub angle: f64,
    /// Angular velocity in radians per time unit
    pub angular_velocity: f64,
}

/// One physics world, exclusively owned by an environment instance
pub struct Simulation {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl Simulation {
    /// Empty world with downward `gravity` advancing `dt` per step
    #[must_use]
    pub fn new(gravity: f64, dt: f64) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: real(dt),
            ..IntegrationParameters::default()
        };

        Self {
            gravity: vector![0.0, -real(gravity)],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Immovable anchor body at `position`
    pub fn add_fixed_body(&mut self, position: [f64; 2]) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![real(position[0]), real(position[1])])
            .build();
        self.bodies.insert(body)
    }

    /// Dynamic box of the given mass. Its shape never collides with anything;
    /// the only interactions are joints and applied forces.
    pub fn add_box_body(
        &mut self,
        center: [f64; 2],
        angle: f64,
        half_extents: [f64; 2],
        mass: f64,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![real(center[0]), real(center[1])])
            .rotation(real(angle))
            .can_sleep(false)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::cuboid(real(half_extents[0]), real(half_extents[1]))
            .mass(real(mass))
            .collision_groups(InteractionGroups::none())
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        handle
    }

    /// Constrain `body` to slide horizontally along `track` without rotating.
    ///
    /// `anchor` is the slider origin in the track's frame; the body's centre
    /// stays within `limits` measured from it.
    pub fn add_slider(
        &mut self,
        track: RigidBodyHandle,
        body: RigidBodyHandle,
        anchor: [f64; 2],
        limits: [f64; 2],
    ) {
        let joint = PrismaticJointBuilder::new(Vector::x_axis())
            .local_anchor1(point![real(anchor[0]), real(anchor[1])])
            .local_anchor2(point![0.0, 0.0])
            .limits([real(limits[0]), real(limits[1])])
            .build();
        self.impulse_joints.insert(track, body, joint, true);
    }

    /// Pin `anchor1` (in `body1`'s frame) to `anchor2` (in `body2`'s frame), free to rotate
    pub fn add_pivot(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        anchor1: [f64; 2],
        anchor2: [f64; 2],
    ) {
        let joint = RevoluteJointBuilder::new()
            .local_anchor1(point![real(anchor1[0]), real(anchor1[1])])
            .local_anchor2(point![real(anchor2[0]), real(anchor2[1])])
            .build();
        self.impulse_joints.insert(body1, body2, joint, true);
    }

    /// Replace the force acting on `body` during the next step with a horizontal push
    pub fn apply_horizontal_force(&mut self, body: RigidBodyHandle, force: f64) {
        let body = &mut self.bodies[body];
        body.reset_forces(true);
        body.add_force(vector![real(force), 0.0], true);
    }

    /// Scale both linear and angular velocity of `body` by `factor`
    pub fn damp_velocity(&mut self, body: RigidBodyHandle, factor: f64) {
        let body = &mut self.bodies[body];
        let linvel = *body.linvel() * real(factor);
        let angvel = body.angvel() * real(factor);
        body.set_linvel(linvel, true);
        body.set_angvel(angvel, true);
    }

    /// Advance the world by one fixed increment
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Read back the kinematic state of `body`
    #[must_use]
    pub fn body_state(&self, body: RigidBodyHandle) -> BodyState {
        let body = &self.bodies[body];
        let translation = body.translation();
        let linvel = body.linvel();
        BodyState {
            position: [f64::from(translation.x), f64::from(translation.y)],
            velocity: [f64::from(linvel.x), f64::from(linvel.y)],
            angle: f64::from(body.rotation().angle()),
            angular_velocity: f64::from(body.angvel()),
        }
    }

    /// World coordinates of a point given in `body`'s local frame
    #[must_use]
    pub fn world_point(&self, body: RigidBodyHandle, local: [f64; 2]) -> [f64; 2] {
        let point = self.bodies[body].position() * point![real(local[0]), real(local[1])];
        [f64::from(point.x), f64::from(point.y)]
    }

    /// Number of dynamic and fixed bodies in the world
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of joints in the world
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn real(value: f64) -> Real {
    value as Real
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_free_body_falls() {
        let mut sim = Simulation::new(1000.0, DT);
        let body = sim.add_box_body([100.0, 100.0], 0.0, [10.0, 10.0], 1.0);

        sim.step();

        let state = sim.body_state(body);
        assert!(state.velocity[1] < 0.0);
        assert!(state.position[1] < 100.0);
    }

    #[test]
    fn test_slider_holds_height_and_follows_force() {
        let mut sim = Simulation::new(1000.0, DT);
        let track = sim.add_fixed_body([0.0, 0.0]);
        let cart = sim.add_box_body([400.0, 400.0], 0.0, [40.0, 20.0], 1.0);
        sim.add_slider(track, cart, [0.0, 400.0], [20.0, 780.0]);

        for _ in 0..10 {
            sim.apply_horizontal_force(cart, 600.0);
            sim.step();
        }

        let state = sim.body_state(cart);
        assert!((state.position[1] - 400.0).abs() < 1.0);
        assert!(state.position[0] > 400.0);
        assert!(state.velocity[0] > 0.0);
        assert!(state.angle.abs() < 1e-3);
        assert_eq!(sim.joint_count(), 1);
        assert_eq!(sim.body_count(), 2);
    }

    #[test]
    fn test_damping_scales_velocity() {
        let mut sim = Simulation::new(1000.0, DT);
        let body = sim.add_box_body([0.0, 0.0], 0.0, [1.0, 1.0], 1.0);
        sim.step();
        let before = sim.body_state(body).velocity[1];

        sim.damp_velocity(body, 0.5);

        let after = sim.body_state(body).velocity[1];
        assert!((after - before * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_world_point_follows_rotation() {
        let mut sim = Simulation::new(1000.0, DT);
        let body = sim.add_box_body([10.0, 20.0], std::f64::consts::FRAC_PI_2, [5.0, 1.0], 1.0);
        let tip = sim.world_point(body, [5.0, 0.0]);
        assert!((tip[0] - 10.0).abs() < 1e-4);
        assert!((tip[1] - 25.0).abs() < 1e-4);
    }
}
