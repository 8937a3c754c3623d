//! Block Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! browser build drives the game from `requestAnimationFrame`; the native
//! build plays one headless autopilot session and prints the leaderboard.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use block_dash::consts::{MAX_SUBSTEPS, SIM_DT};
    use block_dash::error::{GameError, GameResult};
    use block_dash::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use block_dash::platform::web::RafScheduler;
    use block_dash::platform::{FrameLoop, now_ms};
    use block_dash::renderer::CanvasSurface;
    use block_dash::{FrameOutcome, Game, GameSummary, Phase, Settings};

    /// LocalStorage when the page allows it, memory otherwise
    enum BrowserStore {
        Local(LocalStore),
        Memory(MemoryStore),
    }

    impl BrowserStore {
        fn open() -> Self {
            match LocalStore::open() {
                Ok(store) => BrowserStore::Local(store),
                Err(e) => {
                    log::warn!("{e}; leaderboard will not survive a reload");
                    BrowserStore::Memory(MemoryStore::new())
                }
            }
        }
    }

    impl KeyValueStore for BrowserStore {
        fn read(&self, key: &str) -> GameResult<Option<String>> {
            match self {
                BrowserStore::Local(s) => s.read(key),
                BrowserStore::Memory(s) => s.read(key),
            }
        }

        fn write(&mut self, key: &str, value: &str) -> GameResult<()> {
            match self {
                BrowserStore::Local(s) => s.write(key, value),
                BrowserStore::Memory(s) => s.write(key, value),
            }
        }
    }

    /// Everything the page callbacks share
    struct App {
        game: Game<BrowserStore>,
        frames: FrameLoop<RafScheduler>,
        surface: CanvasSurface,
        accumulator: f32,
        last_time: f64,
    }

    impl App {
        /// Forget frame timing so the first step after a (re)start is not huge
        fn reset_clock(&mut self) {
            self.accumulator = 0.0;
            self.last_time = 0.0;
        }

        /// Run simulation steps for one animation frame, then redraw
        fn update(&mut self, time: f64) -> FrameOutcome {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;
            self.accumulator += dt.min(0.1);

            let now = now_ms();
            let mut outcome = FrameOutcome::Continue;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.game.current_input();
                outcome = self.game.step(&input, now);
                self.accumulator -= SIM_DT;
                substeps += 1;
                if !outcome.wants_next_frame() {
                    break;
                }
            }

            self.game.draw(&mut self.surface);
            outcome
        }
    }

    fn page_document() -> GameResult<Document> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| GameError::Host("no document".into()))
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> GameResult<T> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| GameError::Host(format!("missing #{id}")))?
            .dyn_into::<T>()
            .map_err(|_| GameError::Host(format!("#{id} has the wrong element type")))
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if hidden {
                el.set_attribute("hidden", "")
            } else {
                el.remove_attribute("hidden")
            };
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() -> GameResult<()> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Block Dash starting...");

        let window = web_sys::window().ok_or_else(|| GameError::Host("no window".into()))?;
        let document = page_document()?;

        let store = BrowserStore::open();
        let settings = Settings::load(&store);
        let canvas: HtmlCanvasElement = element(&document, "gameCanvas")?;
        let surface = CanvasSurface::new(&canvas, settings.canvas_width, settings.canvas_height)?;

        let app = Rc::new(RefCell::new(App {
            game: Game::new(settings, store),
            frames: FrameLoop::new(RafScheduler::new(window.clone())),
            surface,
            accumulator: 0.0,
            last_time: 0.0,
        }));

        {
            let frame_app = app.clone();
            let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                on_frame(&frame_app, time);
            });
            app.borrow_mut().frames.scheduler_mut().set_callback(callback);
        }

        render_leaderboard(&app.borrow().game);
        setup_start_button(&document, app.clone())?;
        setup_keyboard(&window, app.clone());
        setup_game_over_prompt(&document, app.clone())?;

        if let Ok(input) = element::<HtmlInputElement>(&document, "username") {
            let _ = input.focus();
        }

        log::info!("Block Dash running!");
        Ok(())
    }

    fn on_frame(app: &Rc<RefCell<App>>, time: f64) {
        let outcome = {
            let mut a = app.borrow_mut();
            a.frames.fired();
            let outcome = a.update(time);
            if outcome.wants_next_frame() {
                a.frames.schedule();
            }
            outcome
        };

        if let FrameOutcome::SessionOver(summary) = outcome {
            render_leaderboard(&app.borrow().game);
            show_game_over(&summary);
        }
    }

    fn setup_start_button(document: &Document, app: Rc<RefCell<App>>) -> GameResult<()> {
        let button: web_sys::HtmlElement = element(document, "startGameButton")?;
        let input: HtmlInputElement = element(document, "username")?;

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut a = app.borrow_mut();
            let started = a.game.start(&input.value(), now_ms());
            match started {
                Ok(()) => {
                    a.reset_clock();
                    a.frames.schedule();
                    let name = a.game.session().map(|s| s.username.clone()).unwrap_or_default();
                    drop(a);
                    if let Ok(document) = page_document() {
                        set_hidden(&document, "user-input", true);
                        set_text(&document, "username-display", &format!("Player: {name}"));
                        set_hidden(&document, "username-display", false);
                    }
                }
                Err(e @ GameError::EmptyUsername) => {
                    drop(a);
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(&e.to_string());
                    }
                }
                Err(e) => log::warn!("Start ignored: {e}"),
            }
        });
        button.set_onclick(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if a.game.key_down(&event.key()) {
                    event.prevent_default();
                } else if event.key() == "i" && a.game.phase() == Phase::Running {
                    a.game.toggle_autopilot();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.key());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        // Keys released while the window is unfocused never send keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().game.release_keys();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_game_over_prompt(document: &Document, app: Rc<RefCell<App>>) -> GameResult<()> {
        let replay: web_sys::HtmlElement = element(document, "replay-btn")?;
        let quit: web_sys::HtmlElement = element(document, "quit-btn")?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                let replayed = a.game.replay(now_ms());
                match replayed {
                    Ok(()) => {
                        a.reset_clock();
                        a.frames.schedule();
                        if let Ok(document) = page_document() {
                            set_hidden(&document, "game-over", true);
                        }
                    }
                    Err(e) => log::warn!("Replay ignored: {e}"),
                }
            });
            replay.set_onclick(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.frames.cancel();
                a.game.terminate();
                let App { game, surface, .. } = &mut *a;
                game.draw(surface);
                drop(a);
                if let Ok(document) = page_document() {
                    set_hidden(&document, "game-over", true);
                    set_hidden(&document, "username-display", true);
                    set_hidden(&document, "user-input", false);
                    if let Ok(input) = element::<HtmlInputElement>(&document, "username") {
                        let _ = input.focus();
                    }
                }
            });
            quit.set_onclick(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
        Ok(())
    }

    fn show_game_over(summary: &GameSummary) {
        let Ok(document) = page_document() else {
            return;
        };
        let text = if summary.cleared {
            format!(
                "You cleared all {} levels in {} seconds!",
                summary.level, summary.duration_secs
            )
        } else {
            format!(
                "Game Over! Level: {}. Time: {} seconds.",
                summary.level, summary.duration_secs
            )
        };
        set_text(&document, "game-over-text", &text);
        set_hidden(&document, "game-over", false);
    }

    /// Rebuild the leaderboard table body
    fn render_leaderboard(game: &Game<BrowserStore>) {
        let Ok(document) = page_document() else {
            return;
        };
        let Some(body) = document
            .query_selector("#leaderboardTable tbody")
            .ok()
            .flatten()
        else {
            return;
        };
        body.set_text_content(None);

        for row in game.leaderboard().rows(game.settings().leaderboard_display) {
            let Ok(tr) = document.create_element("tr") else {
                continue;
            };
            let cells = [
                row.rank.to_string(),
                row.entry.username.clone(),
                row.entry.level.to_string(),
                row.entry.duration_label(),
            ];
            for cell in cells {
                if let Ok(td) = document.create_element("td") {
                    // Text content, never HTML: usernames are player input
                    td.set_text_content(Some(&cell));
                    let _ = tr.append_child(&td);
                }
            }
            let _ = body.append_child(&tr);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Block Dash failed to start: {e}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use block_dash::consts::SIM_DT;
    use block_dash::persistence::FileStore;
    use block_dash::{FrameOutcome, Game, GameResult, GameSummary, Settings};

    /// Ten minutes of frames; the autopilot rarely survives that long
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    /// Play one autopilot session and record it
    ///
    /// Usage: `block-dash [USERNAME] [SEED]`
    pub fn run() -> GameResult<()> {
        let mut args = std::env::args().skip(1);
        let username = args.next().unwrap_or_else(|| "autopilot".to_string());
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(|| block_dash::platform::now_ms() as u64);

        let store = FileStore::from_env();
        log::info!("Using data directory {}", store.dir().display());
        let settings = Settings::load(&store);
        let leaderboard_rows = settings.leaderboard_display;
        let mut game = Game::new(settings, store);

        // Simulated clock: one frame is SIM_DT seconds
        game.start_with_seed(&username, 0.0, seed)?;
        game.set_autopilot(true);

        let mut summary: Option<GameSummary> = None;
        for frame in 1..=MAX_FRAMES {
            let now = frame as f64 * SIM_DT as f64 * 1000.0;
            let input = game.current_input();
            match game.step(&input, now) {
                FrameOutcome::LevelUp { level } => println!("Reached level {level}"),
                FrameOutcome::SessionOver(s) => {
                    summary = Some(s);
                    break;
                }
                FrameOutcome::Continue | FrameOutcome::Idle => {}
            }
        }

        match summary {
            Some(s) => println!(
                "{} finished on level {} after {}s{}",
                s.username,
                s.level,
                s.duration_secs,
                s.rank.map(|r| format!(" (rank #{r})")).unwrap_or_default()
            ),
            None => {
                log::warn!("Autopilot still alive after {MAX_FRAMES} frames; not recorded");
                game.terminate();
            }
        }

        println!("\n{:<4} {:<16} {:>5} {:>8}", "#", "Player", "Level", "Time");
        for row in game.leaderboard().rows(leaderboard_rows) {
            println!(
                "{:<4} {:<16} {:>5} {:>8}",
                row.rank,
                row.entry.username,
                row.entry.level,
                row.entry.duration_label()
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Block Dash (native) starting...");
    log::info!("Native mode runs a headless autopilot session - run with `trunk serve` to play");

    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
