//! The overlap cutter
//!
//! When the moving layer is stopped over the one beneath it, the retained
//! overlap is kept in place and the rest becomes a falling remainder. The
//! visual box shrinks via a scale transform on its original geometry; the
//! physics body cannot be resized in place, so its shape is rebuilt at the
//! new footprint. Both representations end up at the same re-centered pose.

use glam::Vec3;

use super::layer::{Axis, Layer};
use crate::consts::BOX_HEIGHT;
use crate::physics::PhysicsWorld;
use crate::renderer::Scene;

/// Geometry of the cut-away piece, ready to hand to the overhang spawner
#[derive(Debug, Clone, PartialEq)]
pub struct Remainder {
    /// Center of the piece (same vertical level as the cut layer)
    pub position: Vec3,
    pub width: f32,
    pub depth: f32,
}

/// Shrink `layer` to the retained overlap and return the remainder.
///
/// `overlap` is the retained size along the layer's movement axis, `size`
/// its pre-cut size along that axis, and `delta` the signed offset between
/// this layer and the one beneath it. `overlap <= 0` means a miss and must
/// be handled by the caller before getting here.
pub fn cut_layer(
    scene: &mut Scene,
    world: &mut PhysicsWorld,
    layer: &mut Layer,
    overlap: f32,
    size: f32,
    delta: f32,
) -> Remainder {
    debug_assert!(
        overlap > 0.0 && overlap <= size,
        "overlap {overlap} outside (0, {size}]"
    );

    let axis = layer.direction;

    // Only the movement-axis dimension shrinks
    match axis {
        Axis::X => layer.width = overlap,
        Axis::Z => layer.depth = overlap,
    }

    // Re-center the visual box and scale it down along the cut axis; the
    // geometry itself stays at its creation size
    let instance = scene.instance_mut(layer.visual);
    axis.set(&mut instance.scale, overlap / size);
    instance.position += axis.unit() * (-delta / 2.0);

    // The physics body shifts identically and gets a fresh, smaller shape
    world.translate(layer.body, axis.unit() * (-delta / 2.0));
    world.replace_shape(layer.body, Vec3::new(layer.width, BOX_HEIGHT, layer.depth));

    // The cut-away piece sits just past the retained overlap, on the side
    // the signed delta points to
    let overhang_size = delta.abs();
    let shift = (overlap / 2.0 + overhang_size / 2.0) * delta.signum();
    let position = scene.position(layer.visual) + axis.unit() * shift;
    let (width, depth) = match axis {
        Axis::X => (overhang_size, layer.depth),
        Axis::Z => (layer.width, overhang_size),
    };

    Remainder {
        position,
        width,
        depth,
    }
}
