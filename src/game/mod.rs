//! Game logic: the stack, the cutter, and the controller driving them

pub mod controller;
pub mod cut;
pub mod factory;
pub mod layer;

pub use controller::{GameController, Phase, TickInput};
pub use cut::{cut_layer, Remainder};
pub use factory::{create_layer, spawn_overhang};
pub use layer::{Axis, Layer, OverhangSet, Stack};
