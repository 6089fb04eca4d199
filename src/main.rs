//! River Hop entry point
//!
//! Browser: wires DOM input, HUD, audio and the render hook around the
//! simulation and runs it once per animation frame.
//! Native: runs a headless autopilot demo and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use river_hop::audio::{AudioManager, SoundEffect, death_label};
    use river_hop::platform::{
        KeyAction, MoveQueue, button_direction, key_action, swipe_direction,
    };
    use river_hop::sim::{GameEvent, GamePhase, RunState, Snapshot, TickInput, tick};
    use river_hop::{HighScore, Settings};

    // Drawing lives in the page; it registers `window.riverHopRender(snapshot)`
    #[wasm_bindgen(inline_js = "
        export function draw_snapshot(json) {
            const draw = globalThis.riverHopRender;
            if (typeof draw === 'function') {
                draw(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn draw_snapshot(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: RunState,
        input: TickInput,
        moves: MoveQueue,
        last_time: f64,
        settings: Settings,
        audio: AudioManager,
        high_score: HighScore,
        touch_start: Option<(f32, f32)>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Last death message, shown until the next start
        toast: Option<&'static str>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, high_score: HighScore) -> Self {
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());
            Self {
                state: RunState::new(seed, high_score.score),
                input: TickInput::default(),
                moves: MoveQueue::new(),
                last_time: 0.0,
                settings,
                audio,
                high_score,
                touch_start: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                toast: None,
            }
        }

        fn run_active(&self) -> bool {
            !matches!(self.state.phase, GamePhase::Idle | GamePhase::GameOver)
        }

        /// Space/Enter/tap: start when nothing is running, else pause
        fn start_or_pause(&mut self) {
            self.audio.resume();
            if self.run_active() {
                self.input.pause = true;
            } else {
                self.input.start = true;
            }
        }

        /// Run one simulation tick and dispatch its events
        fn update(&mut self, dt: f32, time: f64) {
            // Every hop since the last frame is applied; extras as zero-length ticks
            let frame = std::mem::take(&mut self.input);
            for (i, input) in self.moves.drain_into(frame).iter().enumerate() {
                tick(&mut self.state, input, if i == 0 { dt } else { 0.0 });
            }

            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                match event {
                    GameEvent::LevelStarted { .. } => self.toast = None,
                    GameEvent::Died { cause } => self.toast = Some(death_label(cause)),
                    GameEvent::GameOverNotice { score, high_score } => {
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(&format!(
                                "Game Over - Score: {}  ·  Best: {}",
                                score, high_score
                            ));
                        }
                    }
                    _ => {}
                }
                if self.high_score.observe(&event) {
                    self.high_score.save();
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Hand the frame to the page renderer
        fn render(&self) {
            if let Some(json) = Snapshot::capture(&self.state).to_json() {
                draw_snapshot(&json);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = Snapshot::capture(&self.state).hud;

            if let Some(el) = document.get_element_by_id("lives") {
                el.set_text_content(Some(&format!("❤️ x{}", hud.lives)));
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_text_content(Some(&format!("Level {}", hud.level)));
            }
            if let Some(el) = document.get_element_by_id("points") {
                el.set_text_content(Some(&hud.score_line()));
            }
            if let Some(el) = document.get_element_by_id("time") {
                el.set_text_content(Some(&hud.time_label()));
                let class = if hud.time_warning { "badge warn" } else { "badge" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("timeBar") {
                let _ = el.set_attribute(
                    "style",
                    &format!("width: {:.1}%", hud.time_fraction * 100.0),
                );
                let class = if hud.time_warning { "bar warn" } else { "bar" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("toast") {
                el.set_text_content(self.toast);
            }
            if let Some(el) = document.get_element_by_id("fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }
            if let Some(btn) = document.get_element_by_id("btnPlay") {
                let label = if self.run_active() { "▶︎ Restart" } else { "▶︎ Play" };
                btn.set_text_content(Some(label));
            }
            if let Some(btn) = document.get_element_by_id("btnPause") {
                let label = if matches!(self.state.phase, GamePhase::Paused { .. }) {
                    "Resume"
                } else {
                    "Pause"
                };
                btn.set_text_content(Some(label));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("River Hop starting...");

        let settings = Settings::load();
        let high_score = HighScore::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings, high_score)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());
        game.borrow().update_hud();
        request_animation_frame(game);

        log::info!("River Hop running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(action) = key_action(&event.key()) else {
                    return;
                };
                event.prevent_default();
                let mut g = game.borrow_mut();
                match action {
                    KeyAction::Move(dir) => g.moves.push(dir),
                    KeyAction::StartOrPause => g.start_or_pause(),
                    KeyAction::Pause => g.input.pause = true,
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(zone) = window
            .document()
            .and_then(|d| d.get_element_by_id("touchZone"))
        else {
            log::warn!("No #touchZone element, swipe input disabled");
            return;
        };

        // Touch start: remember where the swipe began
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                if !g.run_active() {
                    g.input.start = true;
                }
                if let Some(t) = event.touches().get(0) {
                    g.touch_start = Some((t.client_x() as f32, t.client_y() as f32));
                }
            });
            let _ = zone
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: decode the swipe
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let Some((x0, y0)) = g.touch_start.take() else {
                    return;
                };
                if let Some(t) = event.changed_touches().get(0) {
                    let dx = t.client_x() as f32 - x0;
                    let dy = t.client_y() as f32 - y0;
                    let threshold = g.settings.swipe_threshold;
                    if let Some(dir) = swipe_direction(dx, dy, threshold) {
                        g.moves.push(dir);
                    }
                }
            });
            let _ = zone
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("btnPlay") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.start = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("btnPause") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // On-screen direction pad: <button class="dir" data-dir="up">
        let Ok(buttons) = document.query_selector_all(".dir") else {
            return;
        };
        for i in 0..buttons.length() {
            let Some(el) = buttons
                .item(i)
                .and_then(|n| n.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            let Some(dir) = el.get_attribute("data-dir").and_then(|d| button_direction(&d))
            else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().moves.push(dir);
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Delta time in seconds; tick clamps long frames
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        fn pause_if_live(g: &mut Game, reason: &str) {
            if g.settings.pause_on_blur
                && matches!(g.state.phase, GamePhase::Running | GamePhase::Respawning)
            {
                g.input.pause = true;
                log::info!("Auto-paused ({})", reason);
            }
        }

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    pause_if_live(&mut game.borrow_mut(), "tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                pause_if_live(&mut game.borrow_mut(), "window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("River Hop (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    let summary = demo::run(seed, 10 * 60);
    println!(
        "Seed {}: level {}, score {}, {} homes filled, {} deaths, {:.1}s simulated",
        seed, summary.level, summary.score, summary.homes, summary.deaths, summary.seconds
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use river_hop::HighScore;
    use river_hop::audio::SoundEffect;
    use river_hop::sim::{Autopilot, GameEvent, RunState, tick};

    pub struct Summary {
        pub level: u32,
        pub score: u64,
        pub homes: u32,
        pub deaths: u32,
        pub seconds: f64,
    }

    /// Let the autopilot play until game over or `max_seconds` of simulation
    pub fn run(seed: u64, max_seconds: u32) -> Summary {
        let mut high_score = HighScore::load();
        let mut state = RunState::new(seed, high_score.score);
        let mut pilot = Autopilot::new();
        let dt = 1.0 / 60.0_f32;
        let (mut homes, mut deaths) = (0, 0);

        for _ in 0..(max_seconds * 60) {
            let input = pilot.input(&state, dt);
            tick(&mut state, &input, dt);

            for event in state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    log::trace!("cue {:?}", effect);
                }
                match event {
                    GameEvent::SlotClaimed { slot } => {
                        homes += 1;
                        log::info!("Home {} filled (score {})", slot, state.score);
                    }
                    GameEvent::Died { cause } => {
                        deaths += 1;
                        log::info!("Died: {:?} ({} lives left)", cause, state.lives);
                    }
                    _ => {}
                }
                if high_score.observe(&event) {
                    high_score.save();
                }
            }

            if state.is_over() && state.pending.is_none() {
                break;
            }
        }

        Summary {
            level: state.level,
            score: state.score,
            homes,
            deaths,
            seconds: state.clock,
        }
    }
}
