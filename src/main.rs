use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseEventKind},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use log::{error, info, LevelFilter};
use minifb::{Key, KeyRepeat, MouseMode, Scale, Window, WindowOptions};
use simplelog::{Config, WriteLogger};
use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::panic;
use std::time::{Duration, Instant};

use lunar_renderer::app::{App, SceneConfig};
use lunar_renderer::core::OrbitControls;
use lunar_renderer::pipeline::{FrameBuffer, Pipeline, TermBuffer};
use lunar_renderer::ui::ControlPanel;
use lunar_renderer::{DisplayTarget, RunConfig};

fn main() -> io::Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("lunar_renderer.log")
        .expect("unable to open log file");
    WriteLogger::init(LevelFilter::Info, Config::default(), log_file)
        .expect("unable to install logger");

    let matches = lunar_renderer::create_clap_command().get_matches();
    let cfg = lunar_renderer::handle_clap_matches(&matches);
    info!("starting in {:?} mode", cfg.target);

    match cfg.target {
        DisplayTarget::Window => run_win(cfg),
        DisplayTarget::Terminal => run_term(cfg),
    }
}

fn scene_config(cfg: &RunConfig, aspect: f32) -> SceneConfig {
    SceneConfig {
        assets: cfg.assets.clone(),
        surface: cfg.surface.clone(),
        displacement: cfg.displacement.clone(),
        backdrop: cfg.backdrop.clone(),
        aspect,
    }
}

fn run_win(cfg: RunConfig) -> io::Result<()> {
    let mut window = Window::new(
        "Lunar Renderer",
        cfg.width,
        cfg.height,
        WindowOptions {
            resize: true,
            scale: Scale::X1,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    window.set_target_fps(60);

    let aspect = cfg.width as f32 / cfg.height as f32;
    let mut app = App::assemble(&scene_config(&cfg, aspect), Some(OrbitControls::new()));
    let mut panel = ControlPanel::new();
    let mut pipeline = Pipeline::<FrameBuffer>::new(cfg.width, cfg.height);

    let mut was_down = false;
    let mut right_last: Option<(f32, f32)> = None;
    let mut last_frame = Instant::now();

    while window.is_open() {
        if window.is_key_down(Key::Escape) || window.is_key_down(Key::Q) {
            break;
        }

        // Control panel: arrows step the sliders, space fires the live phase.
        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            let v = panel.step_light(1);
            app.set_light_intensity(v);
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            let v = panel.step_light(-1);
            app.set_light_intensity(v);
        }
        if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            let p = panel.step_phase(1);
            app.set_phase(p);
        }
        if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            let p = panel.step_phase(-1);
            app.set_phase(p);
        }
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            app.apply_live_phase();
        }

        // Pointer: left drag rotates the moon (and orbits the camera),
        // right drag pans, the wheel zooms.
        match window.get_mouse_pos(MouseMode::Discard) {
            Some((x, y)) => {
                // Any button starts a drag, matching the canvas behavior.
                let down = window.get_mouse_down(minifb::MouseButton::Left)
                    || window.get_mouse_down(minifb::MouseButton::Right)
                    || window.get_mouse_down(minifb::MouseButton::Middle);
                if down && !was_down {
                    app.on_pointer_down(x, y);
                } else if down || !was_down {
                    app.on_pointer_move(x, y);
                } else {
                    app.on_pointer_up();
                }
                was_down = down;

                if window.get_mouse_down(minifb::MouseButton::Right) {
                    if let Some((lx, ly)) = right_last {
                        app.on_secondary_drag(x - lx, y - ly);
                    }
                    right_last = Some((x, y));
                } else {
                    right_last = None;
                }
            }
            None => {
                app.on_pointer_leave();
                was_down = false;
                right_last = None;
            }
        }
        if let Some((_, scroll_y)) = window.get_scroll_wheel() {
            app.on_scroll(scroll_y);
        }

        // Follow the window size.
        let (w, h) = window.get_size();
        if (w, h) != (pipeline.width, pipeline.height) && w > 0 && h > 0 {
            info!("resize to {w}x{h}");
            app.on_resize(w, h);
            pipeline.resize(w, h);
        }

        app.tick();

        let mut overlay = panel.overlay_lines();
        overlay.push(format!("{}", pipeline.metrics()));
        pipeline.render_frame(&app.scene, &overlay, Some(&mut window))?;

        let now = Instant::now();
        pipeline.update_metrics(now - last_frame);
        last_frame = now;
    }

    Ok(())
}

fn cleanup_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, Show, terminal::LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

fn run_term(cfg: RunConfig) -> io::Result<()> {
    // Restore the terminal before any panic message hits the screen.
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = cleanup_terminal() {
            eprintln!("Failed to cleanup terminal: {}", e);
        }
        eprintln!("\n=== Panic Occurred ===");
        original_hook(panic_info);
        error!("Panic occurred: {:?}", panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        Hide,
        Clear(ClearType::All)
    )?;

    // Without mouse capture there is no orbit capability; the scene
    // assembler logs the degradation and we keep rendering.
    let orbit = match execute!(stdout, EnableMouseCapture) {
        Ok(()) => Some(OrbitControls::new()),
        Err(_) => None,
    };

    let (cols, rows) = terminal::size()?;
    let (width, height) = (cols as usize, rows as usize * 2);
    let mut app = App::assemble(
        &scene_config(&cfg, width as f32 / height as f32),
        orbit,
    );
    let mut panel = ControlPanel::new();
    let mut pipeline = Pipeline::<TermBuffer>::new(width, height);

    let mut last_frame = Instant::now();
    let frame_duration = Duration::from_millis(16); // ~60 FPS

    'mainloop: loop {
        // (a) Drain pending input
        while event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break 'mainloop,
                    KeyCode::Up => {
                        let v = panel.step_light(1);
                        app.set_light_intensity(v);
                    }
                    KeyCode::Down => {
                        let v = panel.step_light(-1);
                        app.set_light_intensity(v);
                    }
                    KeyCode::Right => {
                        let p = panel.step_phase(1);
                        app.set_phase(p);
                    }
                    KeyCode::Left => {
                        let p = panel.step_phase(-1);
                        app.set_phase(p);
                    }
                    KeyCode::Char(' ') => {
                        app.apply_live_phase();
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    // Cell rows are two pixels tall.
                    let (x, y) = (mouse.column as f32, (mouse.row as f32) * 2.0);
                    match mouse.kind {
                        MouseEventKind::Down(_) => app.on_pointer_down(x, y),
                        MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                            app.on_pointer_move(x, y)
                        }
                        MouseEventKind::Up(_) => app.on_pointer_up(),
                        MouseEventKind::ScrollUp => app.on_scroll(1.0),
                        MouseEventKind::ScrollDown => app.on_scroll(-1.0),
                        _ => {}
                    }
                }
                Event::Resize(new_cols, new_rows) => {
                    let (w, h) = (new_cols as usize, new_rows as usize * 2);
                    info!("terminal resize to {w}x{h}");
                    app.on_resize(w, h);
                    pipeline.resize(w, h);
                }
                _ => {}
            }
        }

        // (b) Render when the frame budget has elapsed
        let now = Instant::now();
        if now - last_frame >= frame_duration {
            app.tick();
            pipeline.render_frame(&app.scene, &panel.overlay_lines(), None)?;
            pipeline.update_metrics(now - last_frame);
            last_frame = now;
        }
    }

    cleanup_terminal()
}
