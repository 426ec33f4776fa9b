//! The floating control panel, reduced to what a framebuffer can offer: two
//! range-clamped slider values stepped from the keyboard, and the overlay
//! text that displays them. The widgets clamp; the application setters the
//! values feed do not.

pub const LIGHT_MIN: f32 = 0.0;
pub const LIGHT_MAX: f32 = 2.0;
pub const LIGHT_STEP: f32 = 0.1;

pub const PHASE_MIN: f32 = 0.0;
pub const PHASE_MAX: f32 = 1.0;
pub const PHASE_STEP: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct ControlPanel {
    pub light_intensity: f32,
    pub moon_phase: f32,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self {
            light_intensity: 1.0,
            moon_phase: 0.5,
        }
    }

    /// Step the light-intensity slider and return the new value.
    pub fn step_light(&mut self, steps: i32) -> f32 {
        self.light_intensity =
            snap(self.light_intensity + steps as f32 * LIGHT_STEP, LIGHT_STEP)
                .clamp(LIGHT_MIN, LIGHT_MAX);
        self.light_intensity
    }

    /// Step the moon-phase slider and return the new value.
    pub fn step_phase(&mut self, steps: i32) -> f32 {
        self.moon_phase = snap(self.moon_phase + steps as f32 * PHASE_STEP, PHASE_STEP)
            .clamp(PHASE_MIN, PHASE_MAX);
        self.moon_phase
    }

    pub fn overlay_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Light Intensity: {:>4.1} {}",
                self.light_intensity,
                bar(self.light_intensity, LIGHT_MIN, LIGHT_MAX)
            ),
            format!(
                "Moon Phase:      {:>4.2} {}",
                self.moon_phase,
                bar(self.moon_phase, PHASE_MIN, PHASE_MAX)
            ),
            "drag: rotate moon | arrows: sliders | space: live lunar phase | q: quit".to_string(),
        ]
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

// Keeps repeated +/- steps from accumulating float drift off the step grid.
fn snap(value: f32, step: f32) -> f32 {
    (value / step).round() * step
}

fn bar(value: f32, min: f32, max: f32) -> String {
    const WIDTH: usize = 20;
    let filled = (((value - min) / (max - min)) * WIDTH as f32).round() as usize;
    let filled = filled.min(WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_slider_steps_and_clamps() {
        let mut panel = ControlPanel::new();
        assert!((panel.step_light(1) - 1.1).abs() < 1e-6);
        assert!((panel.step_light(-2) - 0.9).abs() < 1e-6);

        for _ in 0..50 {
            panel.step_light(1);
        }
        assert_eq!(panel.light_intensity, LIGHT_MAX);

        for _ in 0..50 {
            panel.step_light(-1);
        }
        assert_eq!(panel.light_intensity, LIGHT_MIN);
    }

    #[test]
    fn phase_slider_steps_and_clamps() {
        let mut panel = ControlPanel::new();
        assert!((panel.step_phase(1) - 0.51).abs() < 1e-6);
        for _ in 0..200 {
            panel.step_phase(1);
        }
        assert_eq!(panel.moon_phase, PHASE_MAX);
        for _ in 0..200 {
            panel.step_phase(-1);
        }
        assert_eq!(panel.moon_phase, PHASE_MIN);
    }

    #[test]
    fn repeated_steps_stay_on_the_grid() {
        let mut panel = ControlPanel::new();
        for _ in 0..7 {
            panel.step_phase(1);
        }
        assert!((panel.moon_phase - 0.57).abs() < 1e-6);
    }

    #[test]
    fn overlay_reports_both_sliders() {
        let panel = ControlPanel::new();
        let lines = panel.overlay_lines();
        assert!(lines[0].contains("Light Intensity"));
        assert!(lines[1].contains("Moon Phase"));
    }
}
