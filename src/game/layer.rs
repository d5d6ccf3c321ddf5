//! Layer, stack and overhang bookkeeping
//!
//! A layer pairs one visual box with one physics body. The two share a pose
//! at creation and after every cut; they only diverge through physics
//! integration (falling overhangs) or the controller's kinematic writes
//! (the single moving layer).

use glam::Vec3;

use crate::physics::BodyHandle;
use crate::renderer::VisualId;

/// Horizontal axis a layer moves along (and is cut along)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// The axis the next layer moves along
    pub fn flip(self) -> Axis {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Z => Vec3::Z,
        }
    }

    /// Component of `v` along this axis
    pub fn of(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.z,
        }
    }

    pub fn set(self, v: &mut Vec3, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Z => v.z = value,
        }
    }
}

/// One brick layer: shared footprint metadata plus exclusive ownership of
/// its visual box and physics body
#[derive(Debug)]
pub struct Layer {
    /// Footprint along x; only ever shrunk, by the overlap cutter
    pub width: f32,
    /// Footprint along z; only ever shrunk, by the overlap cutter
    pub depth: f32,
    pub direction: Axis,
    pub visual: VisualId,
    pub body: BodyHandle,
}

impl Layer {
    /// Footprint size along the layer's own movement axis
    pub fn size_along_direction(&self) -> f32 {
        match self.direction {
            Axis::X => self.width,
            Axis::Z => self.depth,
        }
    }
}

/// The tower of settled layers. Insertion order is build order is vertical
/// order; the last element is the active top layer.
#[derive(Debug, Default)]
pub struct Stack {
    layers: Vec<Layer>,
}

impl Stack {
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn pop(&mut self) -> Option<Layer> {
        self.layers.pop()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn top(&self) -> Option<&Layer> {
        self.layers.last()
    }

    /// The active top layer (mutable) together with the settled layer
    /// right beneath it
    pub fn top_and_below(&mut self) -> Option<(&mut Layer, &Layer)> {
        let n = self.layers.len();
        if n < 2 {
            return None;
        }
        let (below, top) = self.layers.split_at_mut(n - 1);
        Some((&mut top[0], &below[n - 2]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Layer> + '_ {
        self.layers.drain(..)
    }
}

/// Currently falling pieces. Unordered; a layer moved here is dynamic and
/// never takes part in cut/overlap logic again.
#[derive(Debug, Default)]
pub struct OverhangSet {
    pieces: Vec<Layer>,
}

impl OverhangSet {
    pub fn push(&mut self, layer: Layer) {
        self.pieces.push(layer);
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.pieces.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Layer> + '_ {
        self.pieces.drain(..)
    }
}
