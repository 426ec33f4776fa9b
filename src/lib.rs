use std::{
    fmt::Display,
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::{Arg, ArgMatches, Command};

pub mod app;
pub mod core;
pub mod phase;
pub mod pipeline;
pub mod ui;

pub use app::App;
pub use core::Camera;
pub use core::Color;
pub use core::Entity;
pub use core::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTarget {
    Terminal,
    Window,
}

pub struct Metrics {
    pub last_frame: Instant,
    pub frame_time: Duration,
    pub fps_counter: u32,
    pub fps_update_timer: Instant,
    pub current_fps: f32,
    pub frame_times: Vec<f32>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            frame_time: Duration::from_secs_f32(1.0 / 60.0),
            fps_counter: 0,
            fps_update_timer: Instant::now(),
            current_fps: 0.0,
            frame_times: Vec::with_capacity(120),
        }
    }

    pub fn update(&mut self, frame_delta: Duration) {
        self.fps_counter += 1;
        self.frame_times.push(frame_delta.as_secs_f32() * 1000.0);
        if self.frame_times.len() > 120 {
            self.frame_times.remove(0);
        }
        if self.fps_update_timer.elapsed() >= Duration::from_secs(1) {
            self.current_fps = self.fps_counter as f32;
            self.fps_counter = 0;
            self.fps_update_timer = Instant::now();

            let avg = self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
            self.frame_time = Duration::from_secs_f32((avg / 1000.0).max(1e-6));
        }
    }
}

impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FPS: {:.2} | Avg: {:.2}ms | Min: {:.2}ms | Max: {:.2}ms",
            self.current_fps,
            self.frame_time.as_secs_f32() * 1000.0,
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::min)
                .unwrap_or(0.0),
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::max)
                .unwrap_or(0.0)
        )
    }
}

pub static DEBUG_PIPELINE: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

// Helper macro for debug printing
#[macro_export]
macro_rules! debug_print {
    ($($arg:tt)*) => {
        if $crate::DEBUG_PIPELINE.load(std::sync::atomic::Ordering::Relaxed) {
            log::debug!($($arg)*);
        }
    };
}

/// Everything main needs to run, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: DisplayTarget,
    pub assets: PathBuf,
    pub width: usize,
    pub height: usize,
    pub surface: String,
    pub displacement: String,
    pub backdrop: String,
}

pub fn create_clap_command() -> Command {
    Command::new("lunar_renderer")
        .about("Software-rendered interactive moon viewer")
        .version("0.1")
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Render into a window (minifb) or the terminal (crossterm)")
                .value_parser(["window", "terminal", "w", "t"])
                .default_value("window"),
        )
        .arg(
            Arg::new("assets")
                .short('a')
                .long("assets")
                .value_name("DIR")
                .help("Directory searched for textures and the overlay font")
                .default_value("assets"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .help("Window width (window mode only)")
                .value_parser(clap::value_parser!(usize))
                .default_value("1280"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .help("Window height (window mode only)")
                .value_parser(clap::value_parser!(usize))
                .default_value("720"),
        )
        .arg(
            Arg::new("surface")
                .long("surface")
                .value_name("FILE")
                .help("Moon surface color texture")
                .default_value("lroc_color_poles_1k.jpg"),
        )
        .arg(
            Arg::new("displacement")
                .long("displacement")
                .value_name("FILE")
                .help("Greyscale relief map displacing the moon geometry")
                .default_value("ldem_3_8bit.jpg"),
        )
        .arg(
            Arg::new("backdrop")
                .long("backdrop")
                .value_name("FILE")
                .help("Starfield backdrop texture")
                .default_value("hipp8_s.jpg"),
        )
}

pub fn handle_clap_matches(matches: &ArgMatches) -> RunConfig {
    let target = match matches
        .get_one::<String>("mode")
        .map(|s| s.as_str())
        .unwrap_or("window")
    {
        "terminal" | "t" => DisplayTarget::Terminal,
        _ => DisplayTarget::Window,
    };

    RunConfig {
        target,
        assets: PathBuf::from(matches.get_one::<String>("assets").unwrap()),
        width: *matches.get_one::<usize>("width").unwrap(),
        height: *matches.get_one::<usize>("height").unwrap(),
        surface: matches.get_one::<String>("surface").unwrap().clone(),
        displacement: matches.get_one::<String>("displacement").unwrap().clone(),
        backdrop: matches.get_one::<String>("backdrop").unwrap().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pick_the_window_target() {
        let matches = create_clap_command().get_matches_from(["lunar_renderer"]);
        let cfg = handle_clap_matches(&matches);
        assert_eq!(cfg.target, DisplayTarget::Window);
        assert_eq!(cfg.width, 1280);
        assert_eq!(cfg.height, 720);
        assert_eq!(cfg.surface, "lroc_color_poles_1k.jpg");
    }

    #[test]
    fn terminal_mode_accepts_the_short_form() {
        let matches =
            create_clap_command().get_matches_from(["lunar_renderer", "-m", "t"]);
        assert_eq!(handle_clap_matches(&matches).target, DisplayTarget::Terminal);

        let matches = create_clap_command().get_matches_from([
            "lunar_renderer",
            "--mode",
            "terminal",
            "--width",
            "640",
        ]);
        let cfg = handle_clap_matches(&matches);
        assert_eq!(cfg.target, DisplayTarget::Terminal);
        assert_eq!(cfg.width, 640);
    }
}
