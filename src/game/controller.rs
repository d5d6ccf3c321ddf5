//! Game state machine and per-tick orchestration
//!
//! Owns the stack, the overhang set and the phase; drives one tick per
//! rendered frame in a fixed order: input, kinematic advance of the mover
//! (with the bound check), physics step, physics->visual sync for every
//! falling piece. Transitions complete fully within the tick that
//! triggers them.

use glam::Vec3;

use super::cut::{cut_layer, Remainder};
use super::factory::{create_layer, spawn_overhang};
use super::layer::{Axis, OverhangSet, Stack};
use crate::consts::*;
use crate::physics::PhysicsWorld;
use crate::renderer::Scene;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the first input; instructions visible
    Idle,
    /// Active gameplay, the top layer is moving
    Running,
    /// The tower was missed; results visible until restart
    Ended,
}

/// Input collected for a single tick. One-shot flags are cleared by the
/// caller once the tick has consumed them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Tap/click/space: start the game, or stop the moving layer
    pub primary: bool,
    /// "R": restart from any phase
    pub restart: bool,
}

/// Ground plane under the tower
const GROUND_SIZE: Vec3 = Vec3::new(100.0, 0.1, 100.0);
const GROUND_POSITION: Vec3 = Vec3::new(-2.0, -0.5, -2.0);
const GROUND_COLOR: [f32; 4] = [0.776, 0.529, 0.404, 1.0];

/// Orchestrates the whole game; every piece of mutable game state lives
/// here and is reached only through this controller.
pub struct GameController {
    phase: Phase,
    stack: Stack,
    overhangs: OverhangSet,
    /// Number of successful splits this run
    splits: u32,
    /// Set exactly once per run, at the miss
    final_score: Option<u32>,
    /// Camera-equivalent view height; rises with the tower
    view_height: f32,
}

impl GameController {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            stack: Stack::default(),
            overhangs: OverhangSet::default(),
            splits: 0,
            final_score: None,
            view_height: CAMERA_BASE_HEIGHT,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Score shown during play: one point per successful split
    pub fn score(&self) -> u32 {
        self.splits
    }

    /// Score shown on the results panel; foundation layers excluded
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn overhangs(&self) -> &OverhangSet {
        &self.overhangs
    }

    pub fn view_height(&self) -> f32 {
        self.view_height
    }

    /// Advance the game by one frame.
    ///
    /// Runs in every phase; the gameplay parts are gated on `Running` while
    /// physics keeps stepping so already-falling pieces settle naturally.
    pub fn tick(&mut self, input: &TickInput, dt: f32, scene: &mut Scene, world: &mut PhysicsWorld) {
        // Input first, synchronously before any movement
        if input.restart {
            self.start_game(scene, world);
        } else if input.primary {
            match self.phase {
                Phase::Idle => self.start_game(scene, world),
                Phase::Running => self.split_or_miss(scene, world),
                // A stray tap after the miss is ignored; leaving Ended
                // takes the explicit restart input
                Phase::Ended => {}
            }
        }

        // Kinematic advance of the mover; physics integration is bypassed
        // for this one layer until it misses
        if self.phase == Phase::Running {
            if let Some(top) = self.stack.top() {
                let step = top.direction.unit() * (BLOCK_SPEED * dt);
                let visual = top.visual;
                let body = top.body;
                let direction = top.direction;
                scene.translate(visual, step);
                world.translate(body, step);

                if direction.of(scene.position(visual)) > MISS_BOUND {
                    self.missed_the_spot(scene, world);
                }
            }
        }

        // Cosmetic: view height chases the tower top, never descends
        let target = BOX_HEIGHT * (self.stack.len() as f32 - 2.0) + CAMERA_BASE_HEIGHT;
        if self.view_height < target {
            self.view_height += BLOCK_SPEED * dt;
        }

        if dt > 0.0 {
            world.step(dt);
        }
        self.sync_overhang_visuals(scene, world);
    }

    /// Idle/Ended -> Running: rebuild the world from scratch
    fn start_game(&mut self, scene: &mut Scene, world: &mut PhysicsWorld) {
        log::info!("game started");

        self.phase = Phase::Running;
        self.splits = 0;
        self.final_score = None;
        self.view_height = CAMERA_BASE_HEIGHT;

        // Drop every prior box and body, then rebuild the floor
        self.stack.drain().for_each(drop);
        self.overhangs.drain().for_each(drop);
        scene.clear();
        world.clear();
        scene.create_box(GROUND_SIZE, GROUND_POSITION, GROUND_COLOR);
        world.create_body(GROUND_SIZE, GROUND_POSITION, 0.0);

        // Foundation brick, then the first mover entering from off-stage
        self.add_layer(scene, world, 0.0, 0.0, BASE_SIZE, BASE_SIZE, Axis::Z);
        self.add_layer(scene, world, SPAWN_OFFSET, 0.0, BASE_SIZE, BASE_SIZE, Axis::X);
    }

    /// Append a settled/kinematic layer on top of the stack
    fn add_layer(
        &mut self,
        scene: &mut Scene,
        world: &mut PhysicsWorld,
        x: f32,
        z: f32,
        width: f32,
        depth: f32,
        direction: Axis,
    ) {
        let y = BOX_HEIGHT * self.stack.len() as f32;
        let layer = create_layer(
            scene,
            world,
            Vec3::new(x, y, z),
            width,
            depth,
            direction,
            false,
            self.stack.len(),
        );
        self.stack.push(layer);
    }

    /// Running -> Running on overlap, Running -> Ended on a miss
    fn split_or_miss(&mut self, scene: &mut Scene, world: &mut PhysicsWorld) {
        let Some((top, below)) = self.stack.top_and_below() else {
            return;
        };

        let direction = top.direction;
        let size = top.size_along_direction();
        let delta =
            direction.of(scene.position(top.visual)) - direction.of(scene.position(below.visual));
        let overhang_size = delta.abs();
        let overlap = size - overhang_size;

        if overlap <= 0.0 {
            self.missed_the_spot(scene, world);
            return;
        }

        let remainder = cut_layer(scene, world, top, overlap, size, delta);
        let top_position = scene.position(top.visual);
        let new_width = top.width;
        let new_depth = top.depth;

        // A perfect drop leaves nothing worth spawning
        if overhang_size > GEOM_EPS {
            spawn_overhang(
                scene,
                world,
                &mut self.overhangs,
                &remainder,
                direction,
                self.stack.len(),
            );
        }

        self.splits += 1;
        log::info!("split #{}: overlap {overlap:.3}, overhang {overhang_size:.3}", self.splits);

        // Next brick: keeps the cut layer's coordinate on the settled axis,
        // enters off-stage along the flipped movement axis
        let next_direction = direction.flip();
        let (next_x, next_z) = match direction {
            Axis::X => (top_position.x, SPAWN_OFFSET),
            Axis::Z => (SPAWN_OFFSET, top_position.z),
        };
        self.add_layer(scene, world, next_x, next_z, new_width, new_depth, next_direction);
    }

    /// Running -> Ended: the top layer becomes one last falling piece
    fn missed_the_spot(&mut self, scene: &mut Scene, world: &mut PhysicsWorld) {
        self.final_score = Some(self.splits);
        self.phase = Phase::Ended;
        log::info!("missed; final score {}", self.splits);

        // The geometry reappears as an overhang; the original handles are
        // removed from stack tracking entirely
        let Some(top) = self.stack.pop() else {
            return;
        };
        let position = scene.position(top.visual);
        let remainder = Remainder {
            position,
            width: top.width,
            depth: top.depth,
        };
        spawn_overhang(
            scene,
            world,
            &mut self.overhangs,
            &remainder,
            top.direction,
            self.stack.len(),
        );
        scene.remove(top.visual);
        world.remove_body(top.body);
    }

    /// One-directional sync: physics is authoritative for every falling
    /// piece; the mover is written by the controller, never copied here.
    fn sync_overhang_visuals(&self, scene: &mut Scene, world: &PhysicsWorld) {
        for piece in self.overhangs.iter() {
            scene.set_position(piece.visual, world.position(piece.body));
            scene.set_rotation(piece.visual, world.rotation(piece.body));
        }
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        game: GameController,
        scene: Scene,
        world: PhysicsWorld,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                game: GameController::new(),
                scene: Scene::new(),
                world: PhysicsWorld::new(),
            }
        }

        fn tick(&mut self, input: TickInput, dt: f32) {
            self.game.tick(&input, dt, &mut self.scene, &mut self.world);
        }

        fn primary(&mut self) {
            self.tick(TickInput { primary: true, ..Default::default() }, 0.0);
        }

        fn restart(&mut self) {
            self.tick(TickInput { restart: true, ..Default::default() }, 0.0);
        }

        fn run(&mut self, dt: f32) {
            self.tick(TickInput::default(), dt);
        }

        fn started() -> Self {
            let mut h = Self::new();
            h.primary();
            h
        }

        fn top_position(&self) -> Vec3 {
            let top = self.game.stack().top().unwrap();
            self.scene.position(top.visual)
        }
    }

    #[test]
    fn test_idle_until_first_input() {
        let mut h = Harness::new();
        assert_eq!(h.game.phase(), Phase::Idle);
        h.run(1.0 / 60.0);
        assert_eq!(h.game.phase(), Phase::Idle);
        assert!(h.game.stack().is_empty());
    }

    #[test]
    fn test_start_builds_two_foundation_layers() {
        let h = Harness::started();
        assert_eq!(h.game.phase(), Phase::Running);
        assert_eq!(h.game.stack().len(), 2);
        assert!(h.game.overhangs().is_empty());
        assert_eq!(h.game.score(), 0);
        // Mover enters off-stage on the x axis
        assert_eq!(h.top_position(), Vec3::new(SPAWN_OFFSET, BOX_HEIGHT, 0.0));
        // Ground plane plus two layers
        assert_eq!(h.scene.len(), 3);
        assert_eq!(h.world.body_count(), 3);
    }

    #[test]
    fn test_mover_advances_kinematically_in_both_representations() {
        let mut h = Harness::started();
        h.run(0.5);
        let expected = SPAWN_OFFSET + BLOCK_SPEED * 0.5;
        assert!((h.top_position().x - expected).abs() < 1e-4);
        let top = h.game.stack().top().unwrap();
        assert!((h.world.position(top.body).x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_first_split_end_to_end() {
        // First layer 3x3 moving on x, stopped at signed delta 0.5
        let mut h = Harness::started();
        // 10.5 units at 8 u/s: lands exactly at x = 0.5
        h.run(1.3125);
        assert!((h.top_position().x - 0.5).abs() < 1e-5);

        h.primary();

        assert_eq!(h.game.phase(), Phase::Running);
        assert_eq!(h.game.score(), 1);
        assert_eq!(h.game.stack().len(), 3);
        assert_eq!(h.game.overhangs().len(), 1);

        // The cut layer kept width 2.5, depth untouched
        let layers: Vec<_> = h.game.stack().iter().collect();
        let cut = layers[1];
        assert!((cut.width - 2.5).abs() < 1e-5);
        assert_eq!(cut.depth, 3.0);

        // One overhang of size 0.5 at the correct offset
        let piece = h.game.overhangs().iter().next().unwrap();
        assert!((piece.width - 0.5).abs() < 1e-5);
        assert_eq!(piece.depth, 3.0);

        // New top: same x as the cut layer, off-stage on z, flipped axis
        let top = h.game.stack().top().unwrap();
        assert_eq!(top.direction, Axis::Z);
        let pos = h.top_position();
        assert!((pos.x - 0.25).abs() < 1e-5);
        assert_eq!(pos.z, SPAWN_OFFSET);
        assert_eq!(pos.y, 2.0 * BOX_HEIGHT);
    }

    #[test]
    fn test_alternation_and_height_invariants_over_many_splits() {
        let mut h = Harness::started();
        for _ in 0..5 {
            // Stop each mover just past center: delta alternates sign but
            // stays small, so every split succeeds
            h.run(1.2875); // 10.3 units: delta 0.3 from the layer beneath
            h.primary();
        }
        assert_eq!(h.game.score(), 5);
        assert_eq!(h.game.stack().len(), 7);

        let layers: Vec<_> = h.game.stack().iter().collect();
        for (i, pair) in layers.windows(2).enumerate() {
            assert_ne!(pair[0].direction, pair[1].direction, "alternation broke at {i}");
        }
        for (i, layer) in layers.iter().enumerate() {
            let y = h.scene.position(layer.visual).y;
            assert!((y - BOX_HEIGHT * i as f32).abs() < 1e-4, "layer {i} at y {y}");
        }
    }

    #[test]
    fn test_conservation_across_a_split() {
        let mut h = Harness::started();
        h.run(1.3125); // delta 0.5
        h.primary();

        let cut = h.game.stack().iter().nth(1).unwrap();
        let piece = h.game.overhangs().iter().next().unwrap();
        assert!((cut.width + piece.width - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_complete_miss_ends_the_game() {
        let mut h = Harness::started();
        // 13.5 units: mover stops at x = 3.5, past any overlap with the base
        h.run(1.6875);
        h.primary();

        assert_eq!(h.game.phase(), Phase::Ended);
        assert_eq!(h.game.final_score(), Some(0));
        // The missed layer left the stack and fell as one full-size piece
        assert_eq!(h.game.stack().len(), 1);
        assert_eq!(h.game.overhangs().len(), 1);
        let piece = h.game.overhangs().iter().next().unwrap();
        assert_eq!(piece.width, 3.0);
        assert_eq!(piece.depth, 3.0);
    }

    #[test]
    fn test_bound_overrun_ends_exactly_once() {
        let mut h = Harness::started();
        // Drift well past the bound with no input
        for _ in 0..200 {
            h.run(1.0 / 60.0);
        }
        assert_eq!(h.game.phase(), Phase::Ended);
        assert_eq!(h.game.overhangs().len(), 1);
        assert_eq!(h.game.final_score(), Some(0));

        // Further ticks must not convert anything else
        for _ in 0..30 {
            h.run(1.0 / 60.0);
        }
        assert_eq!(h.game.overhangs().len(), 1);
        assert_eq!(h.game.stack().len(), 1);
    }

    #[test]
    fn test_final_score_excludes_foundation_layers() {
        let mut h = Harness::started();
        for _ in 0..3 {
            h.run(1.2875);
            h.primary();
        }
        // stack.len() == 5; miss now
        h.run(1.6875); // drifts 13.5 units from -10, far past the tower
        h.primary();
        assert_eq!(h.game.phase(), Phase::Ended);
        assert_eq!(h.game.final_score(), Some(3));
    }

    #[test]
    fn test_restart_is_idempotent_from_any_phase() {
        // From Ended
        let mut h = Harness::started();
        h.run(1.6875);
        h.primary(); // miss
        assert_eq!(h.game.phase(), Phase::Ended);
        h.restart();
        assert_eq!(h.game.phase(), Phase::Running);
        assert_eq!(h.game.stack().len(), 2);
        assert!(h.game.overhangs().is_empty());
        assert_eq!(h.game.score(), 0);
        assert_eq!(h.game.final_score(), None);
        assert_eq!(h.scene.len(), 3);
        assert_eq!(h.world.body_count(), 3);

        // Explicit restart mid-run behaves identically
        h.run(0.5);
        h.tick(TickInput { restart: true, ..Default::default() }, 0.0);
        assert_eq!(h.game.stack().len(), 2);
        assert_eq!(h.game.view_height(), CAMERA_BASE_HEIGHT);
    }

    #[test]
    fn test_primary_is_ignored_on_the_results_screen() {
        let mut h = Harness::started();
        h.run(1.6875);
        h.primary(); // miss
        assert_eq!(h.game.phase(), Phase::Ended);

        // Tapping again must not start a new game; only restart does
        h.primary();
        assert_eq!(h.game.phase(), Phase::Ended);
        assert_eq!(h.game.final_score(), Some(0));
        assert_eq!(h.game.stack().len(), 1);
        assert_eq!(h.game.overhangs().len(), 1);

        h.restart();
        assert_eq!(h.game.phase(), Phase::Running);
        assert_eq!(h.game.stack().len(), 2);
    }

    #[test]
    fn test_overhangs_fall_and_visuals_follow_physics() {
        let mut h = Harness::started();
        h.run(1.3125);
        h.primary();

        let piece = h.game.overhangs().iter().next().unwrap();
        let (visual, body) = (piece.visual, piece.body);
        let before = h.scene.position(visual);

        for _ in 0..60 {
            h.run(1.0 / 60.0);
        }

        let after_visual = h.scene.position(visual);
        let after_body = h.world.position(body);
        assert!(after_visual.y < before.y, "overhang never fell");
        assert!((after_visual - after_body).length() < 1e-5, "visual diverged from physics");
    }

    #[test]
    fn test_settled_layers_are_never_synced_from_physics() {
        let mut h = Harness::started();
        h.run(1.3125);
        h.primary();
        for _ in 0..60 {
            h.run(1.0 / 60.0);
        }
        // The foundation layer still sits exactly at the origin
        let base = h.game.stack().iter().next().unwrap();
        assert_eq!(h.scene.position(base.visual), Vec3::ZERO);
    }

    #[test]
    fn test_view_height_rises_with_the_tower() {
        let mut h = Harness::started();
        let start = h.game.view_height();
        for _ in 0..4 {
            h.run(1.2875);
            h.primary();
        }
        for _ in 0..120 {
            h.run(1.0 / 60.0);
        }
        assert!(h.game.view_height() > start);
    }

    #[test]
    fn test_perfect_drop_spawns_no_overhang() {
        let mut h = Harness::started();
        h.run(1.25); // exactly 10 units: delta 0
        assert!(h.top_position().x.abs() < 1e-5);
        h.primary();
        assert_eq!(h.game.phase(), Phase::Running);
        assert_eq!(h.game.score(), 1);
        assert!(h.game.overhangs().is_empty());
        let cut = h.game.stack().iter().nth(1).unwrap();
        assert!((cut.width - 3.0).abs() < 1e-5);
    }
}
