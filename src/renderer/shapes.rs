//! CPU-side box tessellation
//!
//! Each box instance becomes 12 triangles, transformed on the CPU so the
//! pipeline draws everything from one vertex buffer with no per-object
//! uniforms.

use glam::Vec3;

use super::scene::{BoxInstance, Scene};
use super::vertex::Vertex;

/// Unit cube faces: outward normal plus four corners in fan order, at
/// half-extent 1 (scaled down per instance)
const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    // +x
    ([1.0, 0.0, 0.0], [
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        [1.0, -1.0, 1.0],
    ]),
    // -x
    ([-1.0, 0.0, 0.0], [
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, -1.0],
    ]),
    // +y
    ([0.0, 1.0, 0.0], [
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
    ]),
    // -y
    ([0.0, -1.0, 0.0], [
        [-1.0, -1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
    ]),
    // +z
    ([0.0, 0.0, 1.0], [
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
    ]),
    // -z
    ([0.0, 0.0, -1.0], [
        [-1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ]),
];

/// Append the 36 vertices of one box
pub fn push_box(out: &mut Vec<Vertex>, instance: &BoxInstance) {
    let half = instance.size * instance.scale * 0.5;

    for (normal, corners) in FACES {
        let n = (instance.rotation * Vec3::from(normal)).to_array();
        let world = corners
            .map(|c| (instance.position + instance.rotation * (Vec3::from(c) * half)).to_array());

        // Two CCW triangles per face
        for i in [0, 1, 2, 0, 2, 3] {
            out.push(Vertex::new(world[i], n, instance.color));
        }
    }
}

/// Tessellate every box in the scene
pub fn scene_vertices(scene: &Scene) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(scene.len() * 36);
    for instance in scene.iter() {
        push_box(&mut vertices, instance);
    }
    vertices
}
