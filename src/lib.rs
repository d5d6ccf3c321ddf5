//! Brick Stack - a 3D stack-the-bricks arcade game
//!
//! Core modules:
//! - `game`: Layer/stack bookkeeping, the overlap cutter, and the game
//!   state machine (idle -> running -> ended)
//! - `physics`: Thin rapier3d wrapper (bodies, shape swaps, stepping)
//! - `renderer`: Retained box scene + WebGPU pipeline

pub mod game;
pub mod physics;
pub mod renderer;

pub use game::{GameController, Phase, TickInput};

/// Game configuration constants
pub mod consts {
    /// Height of every brick layer
    pub const BOX_HEIGHT: f32 = 1.0;
    /// Footprint (width and depth) of the foundation bricks
    pub const BASE_SIZE: f32 = 3.0;

    /// Speed of the moving brick, units per second
    pub const BLOCK_SPEED: f32 = 8.0;
    /// A moving brick that drifts past this coordinate without being
    /// stopped has missed the tower
    pub const MISS_BOUND: f32 = 10.0;
    /// Off-stage coordinate where each fresh brick enters
    pub const SPAWN_OFFSET: f32 = -10.0;

    /// Mass of a falling overhang piece; settled layers have mass 0
    pub const OVERHANG_MASS: f32 = 5.0;
    /// World gravity, y component
    pub const GRAVITY_Y: f32 = -10.0;

    /// Camera height at game start
    pub const CAMERA_BASE_HEIGHT: f32 = 4.0;
    /// Vertical field of view in degrees
    pub const CAMERA_FOV_DEG: f32 = 85.0;

    /// Overhangs thinner than this are not worth spawning as bodies
    pub const GEOM_EPS: f32 = 1e-4;
}

/// Convert HSL (h in degrees, s/l in [0, 1]) to RGB
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

/// Color of a layer spawned at the given stack height.
///
/// Hue ramp starting at green, drifting slowly as the tower grows.
/// Purely cosmetic; never feeds back into physics or scoring.
pub fn layer_color(stack_height: usize) -> [f32; 4] {
    let [r, g, b] = hsl_to_rgb(150.0 + stack_height as f32 * 4.0, 1.0, 0.5);
    [r, g, b, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 0.001 && red[1] < 0.001 && red[2] < 0.001);

        let green = hsl_to_rgb(120.0, 1.0, 0.5);
        assert!(green[1] > 0.999 && green[0] < 0.001);

        let white = hsl_to_rgb(200.0, 0.0, 1.0);
        assert!(white.iter().all(|c| (c - 1.0).abs() < 0.001));
    }

    #[test]
    fn test_layer_color_ramp_moves_with_height() {
        // Consecutive heights get distinct hues, all fully opaque
        let a = layer_color(0);
        let b = layer_color(5);
        assert_ne!(a, b);
        assert_eq!(a[3], 1.0);
        assert_eq!(b[3], 1.0);
    }
}
