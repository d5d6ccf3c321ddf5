//! Box factory and overhang spawner
//!
//! The one place where layers come into existence: a new layer registers
//! exactly one visual box and one physics body at the same pose, so the
//! two representations start in lockstep.

use glam::Vec3;

use super::cut::Remainder;
use super::layer::{Axis, Layer, OverhangSet};
use crate::consts::{BOX_HEIGHT, OVERHANG_MASS};
use crate::layer_color;
use crate::physics::PhysicsWorld;
use crate::renderer::Scene;

/// Create a layer at `position` with the given footprint.
///
/// `falls = false` registers a mass-0 body: settled layers, and the active
/// mover which the controller translates by hand. `falls = true` registers
/// a dynamic body the solver owns from here on. `stack_height` only picks
/// the color on the hue ramp.
pub fn create_layer(
    scene: &mut Scene,
    world: &mut PhysicsWorld,
    position: Vec3,
    width: f32,
    depth: f32,
    direction: Axis,
    falls: bool,
    stack_height: usize,
) -> Layer {
    assert!(
        width > 0.0 && depth > 0.0 && width.is_finite() && depth.is_finite(),
        "layer footprint must be positive and finite, got {width} x {depth}"
    );

    let size = Vec3::new(width, BOX_HEIGHT, depth);
    let visual = scene.create_box(size, position, layer_color(stack_height));
    let mass = if falls { OVERHANG_MASS } else { 0.0 };
    let body = world.create_body(size, position, mass);

    Layer {
        width,
        depth,
        direction,
        visual,
        body,
    }
}

/// Spawn the cut-away remainder as a falling piece.
///
/// Always dynamic, at the same vertical level as the layer that was cut;
/// the piece joins the overhang set and never re-enters the stack.
pub fn spawn_overhang(
    scene: &mut Scene,
    world: &mut PhysicsWorld,
    overhangs: &mut OverhangSet,
    remainder: &Remainder,
    direction: Axis,
    stack_height: usize,
) {
    let layer = create_layer(
        scene,
        world,
        remainder.position,
        remainder.width,
        remainder.depth,
        direction,
        true,
        stack_height,
    );
    overhangs.push(layer);
}
