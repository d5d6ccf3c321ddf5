//! Retained box scene
//!
//! The registration surface the game logic talks to: create a box, move it,
//! scale it, remove it. Holds plain data only (no GPU types), so game tests
//! can run against the real scene headlessly. The pipeline turns these
//! instances into vertices each frame.

use glam::{Quat, Vec3};
use std::collections::BTreeMap;

/// Handle to one box owned by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisualId(u32);

/// One renderable box
#[derive(Debug, Clone)]
pub struct BoxInstance {
    /// Geometry dimensions fixed at creation
    pub size: Vec3,
    pub position: Vec3,
    pub rotation: Quat,
    /// Visual-only scale layered on top of `size` (overlap cuts shrink a
    /// layer by scaling, not by rebuilding geometry)
    pub scale: Vec3,
    pub color: [f32; 4],
}

/// All boxes currently registered for rendering
#[derive(Default)]
pub struct Scene {
    boxes: BTreeMap<u32, BoxInstance>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new box. The caller owns the returned handle exclusively.
    pub fn create_box(&mut self, size: Vec3, position: Vec3, color: [f32; 4]) -> VisualId {
        let id = self.next_id;
        self.next_id += 1;
        self.boxes.insert(
            id,
            BoxInstance {
                size,
                position,
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
                color,
            },
        );
        VisualId(id)
    }

    pub fn remove(&mut self, id: VisualId) {
        self.boxes.remove(&id.0);
    }

    /// Drop every box (game restart)
    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Look up an instance. A stale handle is a programming error.
    pub fn instance(&self, id: VisualId) -> &BoxInstance {
        self.boxes.get(&id.0).expect("stale visual handle")
    }

    pub fn instance_mut(&mut self, id: VisualId) -> &mut BoxInstance {
        self.boxes.get_mut(&id.0).expect("stale visual handle")
    }

    pub fn position(&self, id: VisualId) -> Vec3 {
        self.instance(id).position
    }

    pub fn set_position(&mut self, id: VisualId, position: Vec3) {
        self.instance_mut(id).position = position;
    }

    pub fn translate(&mut self, id: VisualId, delta: Vec3) {
        self.instance_mut(id).position += delta;
    }

    pub fn set_rotation(&mut self, id: VisualId, rotation: Quat) {
        self.instance_mut(id).rotation = rotation;
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoxInstance> {
        self.boxes.values()
    }
}
