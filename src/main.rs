//! Heart Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use heart_dodge::GameConfig;
    use heart_dodge::Settings;
    use heart_dodge::audio::{AudioManager, SoundEffect};
    use heart_dodge::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use heart_dodge::platform::input::Direction;
    use heart_dodge::platform::web::RafHost;
    use heart_dodge::platform::{DisplaySize, TickToken};
    use heart_dodge::renderer::{DrawList, SdfRenderState, draw_frame};
    use heart_dodge::sim::{GameLoop, GamePhase, StopReason, TickOutcome};

    const CANVAS_ID: &str = "gameCanvas";
    const MODAL_ID: &str = "gameOverModal";
    const MUSIC_ID: &str = "bgMusic";

    /// Game instance holding all state
    struct Game {
        game_loop: GameLoop<RafHost>,
        render_state: Option<SdfRenderState>,
        draw_list: DrawList,
        audio: AudioManager,
    }

    impl Game {
        fn new(weak: &Weak<RefCell<Game>>, settings: &Settings) -> Self {
            let weak = weak.clone();
            let host = RafHost::new(move |token| {
                if let Some(game) = weak.upgrade() {
                    frame(&game, token);
                }
            });
            let config = GameConfig::default();
            let draw_list = DrawList::new(Vec2::new(config.canvas_width, config.canvas_height));
            Self {
                game_loop: GameLoop::new(config, host),
                render_state: None,
                draw_list,
                audio: AudioManager::new(settings, MUSIC_ID),
            }
        }

        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.game_loop.start(seed);
            set_modal_visible(false);
        }

        /// Render the current frame
        fn render(&mut self) {
            let snapshot = self.game_loop.snapshot();
            draw_frame(&mut self.draw_list, &snapshot);
            let dim = match snapshot.phase {
                GamePhase::Stopped(StopReason::GameOver) => 1.0,
                _ => 0.0,
            };
            let time = js_sys::Date::now();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.draw_list, dim, time) {
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
    }

    /// One scheduled tick: advance, play sounds, redraw
    fn frame(game: &Rc<RefCell<Game>>, token: TickToken) {
        let mut g = game.borrow_mut();
        match g.game_loop.tick(token) {
            TickOutcome::Skipped | TickOutcome::Paused => return,
            TickOutcome::Advanced(step) => {
                if step.jumped {
                    g.audio.play(SoundEffect::Jump);
                }
            }
            TickOutcome::GameOver(_) => g.audio.play(SoundEffect::GameOver),
        }
        g.render();
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element(id: &str) -> Option<Element> {
        document()?.get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_modal_visible(visible: bool) {
        if let Some(modal) = element(MODAL_ID) {
            let classes = modal.class_list();
            let _ = if visible {
                classes.add_1("show")
            } else {
                classes.remove_1("show")
            };
        }
    }

    /// Attach an event handler for the lifetime of the page
    fn listen<E>(target: &web_sys::EventTarget, event: &str, handler: impl FnMut(E) + 'static)
    where
        E: wasm_bindgen::convert::FromWasmAbi + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        if target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Could not attach {} listener", event);
        }
        closure.forget();
    }

    fn first_touch(event: &TouchEvent) -> Option<Vec2> {
        let touch = event.changed_touches().get(0)?;
        Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Heart Dodge starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        setup_page_animation(&document);

        let settings = Settings::load();
        // Write back the sanitized form so a broken entry is repaired
        settings.save();
        setup_touch_controls(&window, &document, &settings);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        let (width, height) = DisplaySize::internal();
        canvas.set_width(width);
        canvas.set_height(height);
        resize_canvas(&window, &canvas);
        {
            let window_clone = window.clone();
            let canvas = canvas.clone();
            listen(&window, "resize", move |_event: web_sys::Event| {
                resize_canvas(&window_clone, &canvas);
            });
        }

        let game = Rc::new_cyclic(|weak| RefCell::new(Game::new(weak, &settings)));
        setup_game_listeners(&game);

        // Initialize WebGPU; the game still runs (unseen) if this fails
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                match instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await
                {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match SdfRenderState::new(surface, &adapter, width, height, [CANVAS_WIDTH, CANVAS_HEIGHT]).await {
                            Ok(mut render_state) => {
                                render_state.set_start_time(js_sys::Date::now());
                                game.borrow_mut().render_state = Some(render_state);
                            }
                            Err(e) => log::error!("Failed to create device: {:?}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {:?}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {:?}", e),
        }

        setup_input_handlers(&window, &canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&document, game.clone());
        setup_music(&document, game.clone());

        // Idle frame so the player is visible before the first start
        game.borrow_mut().render();

        log::info!("Heart Dodge ready!");
        Ok(())
    }

    fn setup_page_animation(document: &Document) {
        for selector in ["header", ".hero", ".game"] {
            if let Some(el) = document.query_selector(selector).ok().flatten() {
                let _ = el.class_list().add_1("fade-in");
            }
        }
    }

    fn setup_touch_controls(window: &web_sys::Window, document: &Document, settings: &Settings) {
        let Some(controls) = document
            .get_element_by_id("touchControls")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let is_touch = js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false)
            || window.navigator().max_touch_points() > 0;
        let visible = settings.touch_controls.visible(is_touch);
        let _ = controls.set_attribute("aria-hidden", if visible { "false" } else { "true" });
        let _ = controls
            .style()
            .set_property("display", if visible { "flex" } else { "none" });
    }

    fn resize_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) {
        let inner_width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(CANVAS_WIDTH as f64);
        let size = DisplaySize::for_viewport(inner_width);
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", size.width));
        let _ = style.set_property("height", &format!("{}px", size.height));
    }

    fn setup_game_listeners(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        g.game_loop.on_tick(|frame| {
            set_text("scoreText", &format!("Score: {}", frame.score));
        });
        g.game_loop.on_game_over(|info| {
            set_text("finalScore", &info.final_score.to_string());
            set_modal_visible(true);
        });
    }

    fn setup_input_handlers(window: &web_sys::Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            listen(window, "keydown", move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if !g.game_loop.is_running() {
                    return;
                }
                if g.game_loop.input_mut().key_down(&event.key()) {
                    event.prevent_default();
                }
            });
        }
        {
            let game = game.clone();
            listen(window, "keyup", move |event: KeyboardEvent| {
                game.borrow_mut().game_loop.input_mut().key_up(&event.key());
            });
        }

        // Swipe / tap on the canvas
        {
            let game = game.clone();
            listen(canvas, "touchstart", move |event: TouchEvent| {
                if let Some(pos) = first_touch(&event) {
                    game.borrow_mut().game_loop.input_mut().touch_start(pos);
                }
            });
        }
        {
            let game = game.clone();
            listen(canvas, "touchend", move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if !g.game_loop.is_running() {
                    return;
                }
                if let Some(pos) = first_touch(&event) {
                    g.game_loop.input_mut().touch_end(pos);
                }
            });
        }

        // On-screen buttons (touch, plus mouse for desktop testing)
        let Some(document) = document() else { return };
        for (id, dir) in [("leftBtn", Direction::Left), ("rightBtn", Direction::Right)] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, pressed) in [("touchstart", true), ("touchend", false)] {
                let game = game.clone();
                listen(&btn, event_name, move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().game_loop.input_mut().set_button(dir, pressed);
                });
            }
            for (event_name, pressed) in [("mousedown", true), ("mouseup", false), ("mouseleave", false)] {
                let game = game.clone();
                listen(&btn, event_name, move |_event: MouseEvent| {
                    game.borrow_mut().game_loop.input_mut().set_button(dir, pressed);
                });
            }
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["playGameBtn", "restartBtn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                listen(&btn, "click", move |_event: MouseEvent| {
                    game.borrow_mut().start();
                });
            }
        }

        if let Some(btn) = document.get_element_by_id("closeModalBtn") {
            listen(&btn, "click", move |_event: MouseEvent| {
                set_modal_visible(false);
            });
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        listen(document, "visibilitychange", move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                game.borrow_mut().game_loop.handle_visibility_change(false);
            }
        });
    }

    fn setup_music(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(body) = document.body() else { return };
        listen(&body, "click", move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            g.audio.resume();
            g.audio.start_music();
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    //! Native autopilot run on the manual host

    use heart_dodge::GameConfig;
    use heart_dodge::platform::ManualHost;
    use heart_dodge::sim::{GameLoop, Session, TickOutcome};

    /// Simulated frame length (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// How far above the player the autopilot looks for danger
    const LOOKAHEAD: f32 = 180.0;

    /// Steer away from the nearest heart falling toward the player's column
    fn steer(session: &Session, config: &GameConfig) -> Option<&'static str> {
        let player = session.player.rect();
        let threat = session
            .obstacles
            .iter()
            .filter(|o| {
                let bottom = o.pos.y + o.size;
                bottom > player.min.y - LOOKAHEAD
                    && o.pos.y < player.max().y
                    && o.pos.x < player.max().x + 8.0
                    && o.pos.x + o.size > player.min.x - 8.0
            })
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

        let threat_center = threat.pos.x + threat.size / 2.0;
        let player_center = player.min.x + player.size.x / 2.0;
        let room_left = threat.pos.x;
        let room_right = config.canvas_width - (threat.pos.x + threat.size);
        let go_left = if room_left < player.size.x + 4.0 {
            false
        } else if room_right < player.size.x + 4.0 {
            true
        } else {
            player_center < threat_center
        };
        Some(if go_left { "ArrowLeft" } else { "ArrowRight" })
    }

    pub fn run(seed: u64, max_ms: f64) {
        let mut game = GameLoop::new(GameConfig::default(), ManualHost::new());
        game.start(seed);

        let mut held: Option<&'static str> = None;
        let mut elapsed = 0.0;
        while elapsed < max_ms {
            let wanted = steer(game.session(), game.config());
            if wanted != held {
                if let Some(key) = held {
                    game.input_mut().key_up(key);
                }
                if let Some(key) = wanted {
                    game.input_mut().key_down(key);
                }
                held = wanted;
            }

            game.host_mut().advance(FRAME_MS);
            elapsed += FRAME_MS;
            let Some(token) = game.host_mut().take_pending() else {
                break;
            };
            if let TickOutcome::GameOver(info) = game.tick(token) {
                println!(
                    "Game over after {:.1}s with score {} (seed {})",
                    info.elapsed_ms / 1000.0,
                    info.final_score,
                    info.seed
                );
                return;
            }
        }

        let session = game.session();
        println!(
            "Survived {:.1}s with score {} (seed {}, interval {:.0} ms, multiplier {:.2})",
            session.elapsed_ms / 1000.0,
            session.score,
            session.seed,
            session.spawn_interval,
            session.speed_multiplier
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Heart Dodge (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    headless::run(seed, 120_000.0);
}
