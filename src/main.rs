//! Brick Stack entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use brick_stack::physics::PhysicsWorld;
    use brick_stack::renderer::{scene_vertices, Camera, RenderState, Scene};
    use brick_stack::{GameController, Phase, TickInput};

    /// Game instance holding all state
    struct Game {
        controller: GameController,
        scene: Scene,
        world: PhysicsWorld,
        camera: Camera,
        render_state: Option<RenderState>,
        input: TickInput,
        last_time: f64,
    }

    impl Game {
        fn new() -> Self {
            Self {
                controller: GameController::new(),
                scene: Scene::new(),
                world: PhysicsWorld::new(),
                camera: Camera::new(),
                render_state: None,
                input: TickInput::default(),
                last_time: 0.0,
            }
        }

        /// Advance the game by one frame and clear the one-shot inputs
        fn update(&mut self, dt: f32) {
            let input = self.input;
            self.controller
                .tick(&input, dt, &mut self.scene, &mut self.world);
            self.input = TickInput::default();

            self.camera.height = self.controller.view_height();
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = scene_vertices(&self.scene);
                let view_proj = self.camera.view_proj(render_state.aspect());
                match render_state.render(&vertices, view_proj) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            // Live score counter
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.controller.score().to_string()));
            }

            // Instructions only before the first game
            if let Some(el) = document.get_element_by_id("instructions") {
                if self.controller.phase() == Phase::Idle {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Results panel after a miss
            if let Some(el) = document.get_element_by_id("results") {
                if self.controller.phase() == Phase::Ended {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        let score = self.controller.final_score().unwrap_or(0);
                        score_el.set_text_content(Some(&score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Brick Stack starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new()));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Brick Stack running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click: start the game or stop the moving brick
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.primary = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start, same action
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.primary = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: space stops, R restarts
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        // Space doubles as the restart key on the results
                        // screen; clicks there are ignored
                        if g.controller.phase() == Phase::Ended {
                            g.input.restart = true;
                        } else {
                            g.input.primary = true;
                        }
                    }
                    "r" | "R" => g.input.restart = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Delta time from the frame timestamp, capped so a background
            // tab cannot produce one giant step
            let dt = if g.last_time > 0.0 {
                (((time - g.last_time) / 1000.0) as f32).min(0.1)
            } else {
                1.0 / 60.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brick_stack::physics::PhysicsWorld;
    use brick_stack::renderer::Scene;
    use brick_stack::{GameController, Phase, TickInput};

    env_logger::init();
    log::info!("Brick Stack (native) starting...");
    log::info!("Native mode runs a scripted headless game - run with `trunk serve` for web version");

    let mut controller = GameController::new();
    let mut scene = Scene::new();
    let mut world = PhysicsWorld::new();

    // Start, then stop each brick slightly off-center until the tower
    // ends on a deliberate miss
    let press = TickInput {
        primary: true,
        ..Default::default()
    };
    controller.tick(&press, 0.0, &mut scene, &mut world);

    for round in 0.. {
        let drift = if round < 8 { 1.2875 } else { 1.6875 };
        controller.tick(&TickInput::default(), drift, &mut scene, &mut world);
        controller.tick(&press, 0.0, &mut scene, &mut world);
        if controller.phase() == Phase::Ended {
            break;
        }
    }

    // Let the falling pieces settle
    for _ in 0..120 {
        controller.tick(&TickInput::default(), 1.0 / 60.0, &mut scene, &mut world);
    }

    log::info!(
        "Game over: final score {}",
        controller.final_score().unwrap_or(0)
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
