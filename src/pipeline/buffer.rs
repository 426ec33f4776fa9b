use crate::core::Color;
use fontdue::{Font, FontSettings};
use log::warn;
use minifb::Window;
use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSliceMut;
use std::io::{self, stdout, Write};
use std::sync::Once;

/// A render target: a depth-tested pixel grid plus a text overlay, presented
/// either to a minifb window or to the terminal.
pub trait Buffer {
    fn new(width: usize, height: usize) -> Self
    where
        Self: Sized;
    fn resize(&mut self, width: usize, height: usize);
    fn clear(&mut self);
    /// Depth-tested opaque write.
    fn set_pixel(&mut self, pos: (usize, usize), depth: f32, color: Color);
    /// Depth-tested translucent write: blends over what is already there and
    /// leaves the depth buffer untouched.
    fn blend_pixel(&mut self, pos: (usize, usize), depth: f32, color: Color, alpha: f32);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color);
    fn present(&mut self) -> io::Result<()> {
        Ok(()) // Default does nothing
    }
    fn present_window(&mut self, _window: &mut Window) -> io::Result<()> {
        Ok(()) // Default implementation does nothing
    }
}

pub const OVERLAY_FONT_PATH: &str = "assets/IBMPlexMono-Medium.ttf";
const OVERLAY_FONT_PX: f32 = 14.0;

static FONT_WARN: Once = Once::new();

fn load_overlay_font() -> Option<Font> {
    let font_data = match std::fs::read(OVERLAY_FONT_PATH) {
        Ok(data) => data,
        Err(e) => {
            FONT_WARN.call_once(|| {
                warn!("overlay font '{OVERLAY_FONT_PATH}' unavailable ({e}); skipping text overlay");
            });
            return None;
        }
    };
    match Font::from_bytes(
        font_data,
        FontSettings {
            scale: OVERLAY_FONT_PX,
            ..FontSettings::default()
        },
    ) {
        Ok(font) => Some(font),
        Err(e) => {
            FONT_WARN.call_once(|| {
                warn!("overlay font '{OVERLAY_FONT_PATH}' failed to parse ({e}); skipping text overlay");
            });
            None
        }
    }
}

/// 0xRRGGBB pixels for a minifb window.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
    pub depth: Vec<f32>,
    font: Option<Font>,
}

impl Buffer for FrameBuffer {
    fn new(width: usize, height: usize) -> Self {
        let buf_size = width * height;
        FrameBuffer {
            width,
            height,
            data: vec![0; buf_size],
            depth: vec![f32::INFINITY; buf_size],
            font: load_overlay_font(),
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data = vec![0; width * height];
        self.depth = vec![f32::INFINITY; width * height];
    }

    fn clear(&mut self) {
        self.data.par_chunks_mut(1024).for_each(|chunk| {
            for point in chunk {
                *point = 0;
            }
        });
        self.depth.par_chunks_mut(1024).for_each(|chunk| {
            for d in chunk {
                *d = f32::INFINITY;
            }
        });
    }

    fn set_pixel(&mut self, pos: (usize, usize), depth: f32, color: Color) {
        if pos.0 < self.width && pos.1 < self.height {
            let index = pos.0 + pos.1 * self.width;
            if depth < self.depth[index] {
                self.data[index] = color.to_u32();
                self.depth[index] = depth;
            }
        }
    }

    fn blend_pixel(&mut self, pos: (usize, usize), depth: f32, color: Color, alpha: f32) {
        if pos.0 < self.width && pos.1 < self.height {
            let index = pos.0 + pos.1 * self.width;
            if depth < self.depth[index] {
                self.data[index] = Color::lerp_u32(self.data[index], color.to_u32(), alpha);
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
        let Some(font) = &self.font else {
            return;
        };
        let mut cursor_x = x;

        for c in text.chars() {
            let (metrics, bitmap) = font.rasterize(c, OVERLAY_FONT_PX);
            if metrics.width == 0 {
                cursor_x += metrics.advance_width as i32;
                continue;
            }

            for (i, &alpha) in bitmap.iter().enumerate() {
                let bx = i % metrics.width;
                let by = i / metrics.width;

                let px = cursor_x + bx as i32 + metrics.xmin;
                let py = y + by as i32 + metrics.ymin;

                if px >= 0 && px < self.width as i32 && py >= 0 && py < self.height as i32 {
                    let idx = (py as usize) * self.width + (px as usize);
                    let alpha_f = alpha as f32 / 255.0;
                    self.data[idx] =
                        Color::lerp_u32(self.data[idx], (color * alpha_f).to_u32(), alpha_f);
                }
            }

            cursor_x += metrics.advance_width as i32;
        }
    }

    fn present_window(&mut self, window: &mut Window) -> io::Result<()> {
        window
            .update_with_buffer(&self.data, self.width, self.height)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        Ok(())
    }
}

struct OverlayText {
    col: usize,
    row: usize,
    text: String,
    color: Color,
}

/// Terminal cells, two vertical pixels per cell via the upper-half block:
/// the glyph's foreground colors the top pixel, the cell background the
/// bottom one. Pixel height is therefore always twice the row count.
pub struct TermBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<Color>,
    pub depth: Vec<f32>,
    overlay: Vec<OverlayText>,
}

const CLEAR_COLOR: Color = Color::BLACK;

impl Buffer for TermBuffer {
    fn new(width: usize, height: usize) -> Self {
        TermBuffer {
            width,
            height,
            data: vec![CLEAR_COLOR; width * height],
            depth: vec![f32::INFINITY; width * height],
            overlay: Vec::new(),
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data = vec![CLEAR_COLOR; width * height];
        self.depth = vec![f32::INFINITY; width * height];
        self.overlay.clear();
    }

    fn clear(&mut self) {
        let buf_size = self.width * self.height;
        self.data[..buf_size].par_chunks_mut(1024).for_each(|chunk| {
            for point in chunk {
                *point = CLEAR_COLOR;
            }
        });
        self.depth[..buf_size].par_chunks_mut(1024).for_each(|chunk| {
            for depth in chunk {
                *depth = f32::INFINITY;
            }
        });
        self.overlay.clear();
    }

    fn set_pixel(&mut self, pos: (usize, usize), depth: f32, color: Color) {
        if pos.0 < self.width && pos.1 < self.height {
            let index = pos.0 + pos.1 * self.width;
            if depth < self.depth[index] {
                self.data[index] = color;
                self.depth[index] = depth;
            }
        }
    }

    fn blend_pixel(&mut self, pos: (usize, usize), depth: f32, color: Color, alpha: f32) {
        if pos.0 < self.width && pos.1 < self.height {
            let index = pos.0 + pos.1 * self.width;
            if depth < self.depth[index] {
                self.data[index] = self.data[index].lerp(&color, alpha);
            }
        }
    }

    /// Pixel coordinates are mapped onto the cell grid with the same glyph
    /// metrics the framebuffer overlay uses, so call sites stay identical.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
        self.overlay.push(OverlayText {
            col: (x.max(0) as usize) / 8,
            row: (y.max(0) as usize) / 16,
            text: text.to_string(),
            color,
        });
    }

    fn present(&mut self) -> io::Result<()> {
        let rows = self.height / 2;
        let mut output = String::with_capacity(self.width * rows * 24);

        // Keep track of the last color pair to minimize escape churn
        let mut last: Option<(Color, Color)> = None;

        output.push_str("\x1b[?25l"); // Hide cursor
        output.push_str("\x1b[H"); // Move cursor to home position

        for row in 0..rows {
            output.push_str(&format!("\x1b[{};1H", row + 1));
            for x in 0..self.width {
                let top = self.data[x + (row * 2) * self.width];
                let bottom = if row * 2 + 1 < self.height {
                    self.data[x + (row * 2 + 1) * self.width]
                } else {
                    CLEAR_COLOR
                };
                if last != Some((top, bottom)) {
                    output.push_str(&top.to_fg_escape());
                    output.push_str(&bottom.to_bg_escape());
                    last = Some((top, bottom));
                }
                output.push('\u{2580}'); // upper half block
            }
        }

        for item in &self.overlay {
            output.push_str(&format!(
                "\x1b[{};{}H\x1b[0m{}{}",
                item.row + 1,
                item.col + 1,
                item.color.to_fg_escape(),
                item.text
            ));
            last = None;
        }
        output.push_str("\x1b[0m");

        let mut stdout = stdout();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closer_fragments_win_the_depth_test() {
        let mut buf = TermBuffer::new(4, 4);
        buf.set_pixel((1, 1), 0.8, Color::RED);
        buf.set_pixel((1, 1), 0.2, Color::GREEN);
        // A farther write afterwards must not replace it.
        buf.set_pixel((1, 1), 0.5, Color::BLUE);
        assert_eq!(buf.data[1 + 4], Color::GREEN);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut buf = TermBuffer::new(4, 4);
        buf.set_pixel((7, 9), 0.1, Color::RED);
        buf.blend_pixel((4, 0), 0.1, Color::RED, 0.5);
        assert!(buf.data.iter().all(|&c| c == CLEAR_COLOR));
    }

    #[test]
    fn blending_leaves_depth_untouched() {
        let mut buf = TermBuffer::new(2, 2);
        buf.set_pixel((0, 0), 0.5, Color::WHITE);
        buf.blend_pixel((0, 0), 0.3, Color::BLACK, 0.5);
        let blended = buf.data[0];
        assert!((blended.r - 0.5).abs() < 1e-6);
        // Depth still belongs to the opaque write: an opaque fragment at 0.4
        // must still land.
        buf.set_pixel((0, 0), 0.4, Color::RED);
        assert_eq!(buf.data[0], Color::RED);
    }

    #[test]
    fn blend_behind_existing_surface_is_discarded() {
        let mut buf = TermBuffer::new(2, 2);
        buf.set_pixel((0, 0), 0.2, Color::WHITE);
        buf.blend_pixel((0, 0), 0.9, Color::BLACK, 0.5);
        assert_eq!(buf.data[0], Color::WHITE);
    }

    #[test]
    fn clear_resets_pixels_depth_and_overlay() {
        let mut buf = TermBuffer::new(4, 4);
        buf.set_pixel((2, 2), 0.1, Color::RED);
        buf.draw_text("hi", 0, 0, Color::WHITE);
        buf.clear();
        assert!(buf.data.iter().all(|&c| c == CLEAR_COLOR));
        assert!(buf.depth.iter().all(|&d| d == f32::INFINITY));
        assert!(buf.overlay.is_empty());
    }

    #[test]
    fn framebuffer_depth_test_matches() {
        let mut buf = FrameBuffer::new(4, 4);
        buf.set_pixel((0, 0), 0.9, Color::RED);
        buf.set_pixel((0, 0), 0.1, Color::GREEN);
        buf.set_pixel((0, 0), 0.5, Color::BLUE);
        assert_eq!(buf.data[0], Color::GREEN.to_u32());
    }

    #[test]
    fn framebuffer_blend_mixes_u32_channels() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.set_pixel((0, 0), 0.5, Color::WHITE);
        buf.blend_pixel((0, 0), 0.3, Color::BLACK, 0.5);
        let c = buf.data[0];
        let r = (c >> 16) & 0xFF;
        assert!(r.abs_diff(127) <= 1);
    }

    #[test]
    fn resize_reallocates_the_grid() {
        let mut buf = TermBuffer::new(4, 4);
        buf.resize(8, 6);
        assert_eq!(buf.data.len(), 48);
        assert_eq!(buf.depth.len(), 48);
    }
}
