//! Dark Blue entry point
//!
//! In the browser: canvas front end driven by `requestAnimationFrame`.
//! Natively: validates a level pack, prints text previews and runs each level
//! idle for a few seconds.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlImageElement,
        KeyboardEvent, TouchEvent,
    };

    use dark_blue::audio::{AudioManager, SoundEffect};
    use dark_blue::render::{Display, Frame, SpriteKind, canvas_size};
    use dark_blue::sim::KeyState;
    use dark_blue::{Game, GameProgress, LevelPack, Settings};

    /// Sprite sheets, drawn only once loaded
    struct Sheets {
        tiles: HtmlImageElement,
        player: HtmlImageElement,
    }

    fn is_loaded(img: &HtmlImageElement) -> bool {
        img.complete() && img.natural_width() > 0
    }

    /// Browser game instance
    struct App {
        game: Game,
        display: Display,
        keys: KeyState,
        touch_controls: bool,
        last_time: Option<f64>,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        scoreboard: Element,
        sheets: Option<Sheets>,
    }

    impl App {
        fn resize_canvas(&self) {
            let (w, h) = canvas_size(self.game.level());
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }

        /// Run one animation frame; returns false once the game is over
        fn update(&mut self, time: f64) -> bool {
            // Clamped again by Game::frame
            let step = match self.last_time {
                Some(last) => ((time - last).min(100.0) / 1000.0) as f32,
                None => 0.0,
            };
            self.last_time = Some(time);

            let progress = match self.game.frame(step, &self.keys) {
                Ok(progress) => progress,
                Err(e) => {
                    log::error!("Failed to start level: {e}");
                    return false;
                }
            };
            let events = self.game.drain_events();
            self.audio.play_events(&events);

            match progress {
                GameProgress::Playing => {}
                GameProgress::LevelRestarted(_) | GameProgress::LevelAdvanced(_) => {
                    self.display = Display::new(self.game.level());
                    self.resize_canvas();
                }
                GameProgress::Completed => {
                    self.audio.play(SoundEffect::GameWon);
                    return false;
                }
            }

            let frame = self.display.draw_frame(self.game.level(), step);
            self.draw(&frame);
            true
        }

        fn draw(&self, frame: &Frame) {
            let cx = &self.ctx;
            cx.set_fill_style_str(&frame.background.css());
            cx.fill_rect(
                0.0,
                0.0,
                self.canvas.width() as f64,
                self.canvas.height() as f64,
            );

            for sprite in &frame.sprites {
                let (x, y, w, h) = (
                    sprite.x as f64,
                    sprite.y as f64,
                    sprite.width as f64,
                    sprite.height as f64,
                );
                let sheet = self.sheets.as_ref().map(|s| match sprite.kind {
                    SpriteKind::Player { .. } => &s.player,
                    _ => &s.tiles,
                });

                let flipped = matches!(sprite.kind, SpriteKind::Player { flipped: true, .. });
                if flipped {
                    cx.save();
                    let around = x + w / 2.0;
                    let _ = cx.translate(around, 0.0);
                    let _ = cx.scale(-1.0, 1.0);
                    let _ = cx.translate(-around, 0.0);
                }

                match sheet {
                    Some(img) if is_loaded(img) => {
                        let sx = sprite.kind.sheet_x(sprite.width) as f64;
                        let _ = cx
                            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                                img, sx, 0.0, w, h, x, y, w, h,
                            );
                    }
                    _ => {
                        cx.set_fill_style_str(&sprite.kind.color().css());
                        cx.fill_rect(x, y, w, h);
                    }
                }

                if flipped {
                    cx.restore();
                }
            }

            self.scoreboard.set_text_content(Some(&frame.scoreboard));
        }
    }

    fn load_sheets() -> Option<Sheets> {
        let tiles = HtmlImageElement::new().ok()?;
        tiles.set_src("img/sprites.png");
        let player = HtmlImageElement::new().ok()?;
        player.set_src("img/player.png");
        Some(Sheets { tiles, player })
    }

    fn create_element(document: &Document, tag: &str, class: &str) -> Option<Element> {
        let el = document.create_element(tag).ok()?;
        el.set_class_name(class);
        Some(el)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Dark Blue starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };
        let Some(body) = document.body() else {
            log::error!("No document body");
            return;
        };

        let settings = Settings::load();
        // Write back so missing fields get their defaults in storage
        settings.save();
        let seed = js_sys::Date::now() as u64;
        let game = match Game::new(LevelPack::builtin(), settings.physics, seed) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Cannot start game: {e}");
                return;
            }
        };

        let Some(scoreboard) = create_element(&document, "div", "scoreboard") else {
            return;
        };
        let Some(canvas) = document
            .create_element("canvas")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("Failed to create canvas");
            return;
        };
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("Canvas 2D context unavailable");
            return;
        };
        let _ = body.append_child(&scoreboard);
        let _ = body.append_child(&canvas);

        let app = App {
            display: Display::new(game.level()),
            game,
            keys: KeyState::default(),
            touch_controls: settings.touch_controls,
            last_time: None,
            audio: AudioManager::new(&settings),
            canvas,
            ctx,
            scoreboard,
            sheets: load_sheets(),
        };
        app.resize_canvas();

        let app = Rc::new(RefCell::new(app));
        setup_input_handlers(&document, app.clone());
        request_animation_frame(app);

        log::info!("Dark Blue running!");
    }

    fn setup_input_handlers(document: &Document, app: Rc<RefCell<App>>) {
        // Keyboard
        for (kind, down) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if a.keys.handle_key(&event.key(), event.key_code(), down) {
                    event.prevent_default();
                    if down {
                        a.audio.resume();
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if !app.borrow().touch_controls {
            return;
        }

        // Touch start/move: steer toward the touch point
        for kind in ["touchstart", "touchmove"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let mut a = app.borrow_mut();
                let rect = a.canvas.get_bounding_client_rect();
                let px = touch.client_x() as f32 - rect.left() as f32;
                let py = touch.client_y() as f32 - rect.top() as f32;
                let point = a.display.viewport.to_level(px, py);
                let player = a.game.level().player().clone();
                a.keys.apply_touch(point, &player);
                a.audio.resume();
            });
            let _ = document.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().keys.release_touch();
            });
            let _ =
                document.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn show_win_message(message: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let (Some(body), Some(el)) = (document.body(), create_element(&document, "div", "winner"))
        {
            el.set_text_content(Some(message));
            let _ = body.append_child(&el);
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let running = app.borrow_mut().update(time);
        if running {
            request_animation_frame(app);
        } else if let Some(message) = app.borrow().game.win_message() {
            log::info!("{message}");
            show_win_message(message);
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
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use serde::Serialize;

    use dark_blue::consts::MAX_FRAME_SECS;
    use dark_blue::render::{render_text, scoreboard};
    use dark_blue::sim::{KeyState, LevelStatus};
    use dark_blue::{LevelPack, Settings};

    const USAGE: &str =
        "usage: dark-blue [LEVELS.json] [--settings SETTINGS.json] [--seconds N] [--json]";

    /// Longest idle run accepted per level (one hour)
    const MAX_IDLE_SECS: f32 = 3600.0;

    #[derive(Debug, Default, PartialEq)]
    struct Args {
        levels: Option<PathBuf>,
        settings: Option<PathBuf>,
        seconds: f32,
        json: bool,
    }

    fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args, String> {
        let mut args = Args {
            seconds: 3.0,
            ..Default::default()
        };
        let mut iter = argv.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--settings" => {
                    let path = iter.next().ok_or("--settings needs a path")?;
                    args.settings = Some(path.into());
                }
                "--seconds" => {
                    let value = iter.next().ok_or("--seconds needs a value")?;
                    args.seconds = match value.parse::<f32>() {
                        Ok(secs) if (0.0..=MAX_IDLE_SECS).contains(&secs) => secs,
                        _ => {
                            return Err(format!(
                                "--seconds must be a number from 0 to {MAX_IDLE_SECS}, got {value:?}"
                            ));
                        }
                    };
                }
                "--json" => args.json = true,
                "-h" | "--help" => return Err(USAGE.to_string()),
                _ if arg.starts_with("--") => return Err(format!("unknown option {arg}\n{USAGE}")),
                _ => args.levels = Some(arg.into()),
            }
        }
        Ok(args)
    }

    /// Frame lengths covering `seconds`, each at most `MAX_FRAME_SECS`
    fn idle_frames(seconds: f32) -> impl Iterator<Item = f32> {
        let frames = (seconds / MAX_FRAME_SECS).ceil().max(0.0) as u64;
        let total = seconds as f64;
        (0..frames)
            .map(move |i| {
                let done = i as f64 * MAX_FRAME_SECS as f64;
                (total - done).min(MAX_FRAME_SECS as f64) as f32
            })
            .filter(|&step| step > 0.0)
    }

    /// Outcome of idling through one level
    #[derive(Debug, Serialize)]
    struct LevelReport {
        level: usize,
        width: usize,
        height: usize,
        coins: usize,
        status: LevelStatus,
        player: (f32, f32),
    }

    pub fn run() -> ExitCode {
        env_logger::init();

        let args = match parse_args(std::env::args().skip(1)) {
            Ok(args) => args,
            Err(msg) => {
                eprintln!("{msg}");
                return ExitCode::FAILURE;
            }
        };

        let settings = match &args.settings {
            Some(path) => match Settings::from_path(path) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("{}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            },
            None => Settings::default(),
        };

        let pack = match &args.levels {
            Some(path) => match LevelPack::from_path(path) {
                Ok(pack) => pack,
                Err(e) => {
                    eprintln!("{}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            },
            None => LevelPack::builtin(),
        };

        let mut reports = Vec::with_capacity(pack.len());
        for (index, plan) in pack.iter().enumerate() {
            let mut level = match plan.build(index, index as u64, settings.physics) {
                Ok(level) => level,
                Err(e) => {
                    eprintln!("level {}: {e}", index + 1);
                    return ExitCode::FAILURE;
                }
            };

            if !args.json {
                println!("{}", scoreboard(&level));
                print!("{}", render_text(&level));
            }

            let keys = KeyState::default();
            let mut elapsed = 0.0f64;
            for step in idle_frames(args.seconds) {
                if level.is_finished() {
                    break;
                }
                level.animate(step, &keys);
                elapsed += step as f64;
            }
            log::info!(
                "Level {} after {:.1}s idle: {}",
                index + 1,
                elapsed,
                level.status().as_str()
            );

            let player = level.player().pos;
            reports.push(LevelReport {
                level: index + 1,
                width: level.width(),
                height: level.height(),
                coins: level.total_coins(),
                status: level.status(),
                player: (player.x, player.y),
            });

            if !args.json {
                println!("status after idle: {}\n", level.status().as_str());
            }
        }

        if args.json {
            match serde_json::to_string_pretty(&reports) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("failed to encode report: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        ExitCode::SUCCESS
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}
