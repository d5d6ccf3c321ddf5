//! Thin wrapper around the rapier3d physics world
//!
//! The game never touches the solver directly: it registers box bodies,
//! nudges the kinematic mover, swaps collision shapes after a cut, steps
//! the world and reads poses back. rapier's nalgebra types stay inside
//! this module; everything crossing the boundary is glam.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::consts::GRAVITY_Y;

/// Handle to one rigid body owned by the physics world
pub type BodyHandle = RigidBodyHandle;

/// Rigid body world for the tower and its falling overhangs
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, GRAVITY_Y, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Register a box body with the given full dimensions.
    ///
    /// `mass == 0` creates a fixed body (settled layers, and the moving
    /// layer, which the controller translates by hand). A positive mass
    /// creates a dynamic body driven by the solver from then on.
    pub fn create_body(&mut self, size: Vec3, position: Vec3, mass: f32) -> BodyHandle {
        debug_assert!(
            size.min_element() > 0.0,
            "body dimensions must be positive, got {size}"
        );

        let body = if mass > 0.0 {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        }
        .translation(vector![position.x, position.y, position.z])
        .build();
        let handle = self.bodies.insert(body);

        let mut collider = ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0);
        if mass > 0.0 {
            collider = collider.mass(mass);
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);

        handle
    }

    pub fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Swap the body's collision shape for a smaller cuboid.
    ///
    /// Attached shapes cannot be resized in place, so this detaches every
    /// collider and attaches one freshly built at the new footprint.
    pub fn replace_shape(&mut self, handle: BodyHandle, size: Vec3) {
        debug_assert!(
            size.min_element() > 0.0,
            "replacement dimensions must be positive, got {size}"
        );

        let old: Vec<ColliderHandle> = self.bodies[handle].colliders().to_vec();
        for collider in old {
            self.colliders.remove(
                collider,
                &mut self.island_manager,
                &mut self.bodies,
                false,
            );
        }

        let collider = ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
    }

    /// Move a body by hand (kinematic advance of the active layer)
    pub fn translate(&mut self, handle: BodyHandle, delta: Vec3) {
        let body = &mut self.bodies[handle];
        let t = *body.translation();
        body.set_translation(vector![t.x + delta.x, t.y + delta.y, t.z + delta.z], true);
    }

    pub fn position(&self, handle: BodyHandle) -> Vec3 {
        let t = self.bodies[handle].translation();
        Vec3::new(t.x, t.y, t.z)
    }

    pub fn rotation(&self, handle: BodyHandle) -> Quat {
        let q = self.bodies[handle].rotation();
        Quat::from_xyzw(q.i, q.j, q.k, q.w)
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
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

    /// Drop every body and collider (game restart)
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    #[cfg(test)]
    fn collider_count_of(&self, handle: BodyHandle) -> usize {
        self.bodies[handle].colliders().len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_body_stays_put() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_body(Vec3::new(3.0, 1.0, 3.0), Vec3::new(0.0, 5.0, 0.0), 0.0);

        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        assert_eq!(world.position(handle), Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_body(Vec3::ONE, Vec3::new(0.0, 10.0, 0.0), 5.0);

        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        assert!(world.position(handle).y < 10.0);
    }

    #[test]
    fn test_dynamic_body_rests_on_fixed_ground() {
        let mut world = PhysicsWorld::new();
        world.create_body(Vec3::new(100.0, 0.1, 100.0), Vec3::new(0.0, -0.5, 0.0), 0.0);
        let brick = world.create_body(Vec3::new(1.0, 1.0, 1.0), Vec3::new(0.0, 3.0, 0.0), 5.0);

        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        // Came to rest on top of the ground plane, not through it
        let y = world.position(brick).y;
        assert!(y > -0.6, "brick fell through the ground: y = {y}");
        assert!(y < 1.0, "brick never landed: y = {y}");
    }

    #[test]
    fn test_replace_shape_swaps_single_collider() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_body(Vec3::new(3.0, 1.0, 3.0), Vec3::ZERO, 0.0);
        assert_eq!(world.collider_count_of(handle), 1);

        world.replace_shape(handle, Vec3::new(2.5, 1.0, 3.0));
        assert_eq!(world.collider_count_of(handle), 1);
    }

    #[test]
    fn test_translate_moves_fixed_body() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_body(Vec3::ONE, Vec3::ZERO, 0.0);
        world.translate(handle, Vec3::new(0.25, 0.0, 0.0));
        world.translate(handle, Vec3::new(0.25, 0.0, 0.0));
        assert!((world.position(handle).x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_remove_body_updates_count() {
        let mut world = PhysicsWorld::new();
        let a = world.create_body(Vec3::ONE, Vec3::ZERO, 0.0);
        let _b = world.create_body(Vec3::ONE, Vec3::Y * 2.0, 5.0);
        assert_eq!(world.body_count(), 2);
        world.remove_body(a);
        assert_eq!(world.body_count(), 1);
    }
}
