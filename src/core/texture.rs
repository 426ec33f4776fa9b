use crate::core::Color;
use glam::Vec2;
use log::warn;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Represents a loaded texture with sampling capabilities
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub data: Arc<Vec<Color>>,
    pub path: String,
}

impl Texture {
    /// Load a texture from a file path
    pub fn load_from_file(path: &str) -> Result<Self, String> {
        let img = image::open(path)
            .map_err(|e| format!("Failed to load texture '{}': {}", path, e))?;

        // Convert to RGB8 format
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut color_data = Vec::with_capacity((width * height) as usize);
        for pixel in rgb_img.pixels() {
            let r = pixel[0] as f32 / 255.0;
            let g = pixel[1] as f32 / 255.0;
            let b = pixel[2] as f32 / 255.0;
            color_data.push(Color::new(r, g, b));
        }

        Ok(Texture {
            width,
            height,
            data: Arc::new(color_data),
            path: path.to_string(),
        })
    }

    /// Build a texture from pixels already in memory.
    pub fn from_pixels(width: u32, height: u32, data: Vec<Color>, label: &str) -> Self {
        assert_eq!(data.len(), (width * height) as usize);
        Texture {
            width,
            height,
            data: Arc::new(data),
            path: label.to_string(),
        }
    }

    /// A 1x1 texture of a single color.
    pub fn flat(color: Color, label: &str) -> Self {
        Texture {
            width: 1,
            height: 1,
            data: Arc::new(vec![color]),
            path: label.to_string(),
        }
    }

    /// Procedural star speckle, used when no backdrop image is on disk.
    /// Mostly near-black with a sprinkle of single-pixel stars; every 16th
    /// star gets a small cross so a few read as brighter.
    pub fn star_speckle(width: u32, height: u32, stars: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = vec![Color::new(0.01, 0.01, 0.02); (width * height) as usize];

        let put = |data: &mut Vec<Color>, x: i64, y: i64, c: Color| {
            if x >= 0 && x < width as i64 && y >= 0 && y < height as i64 {
                data[(y as u32 * width + x as u32) as usize] = c;
            }
        };

        for i in 0..stars {
            let x = rng.gen_range(0..width) as i64;
            let y = rng.gen_range(0..height) as i64;
            let brightness: f32 = rng.gen_range(0.3..1.0);
            // A faint warm/cool tint keeps the field from looking flat.
            let tint = rng.gen_range(-0.08..0.08f32);
            let star = Color::new(
                (brightness + tint).clamp(0.0, 1.0),
                brightness,
                (brightness - tint).clamp(0.0, 1.0),
            );
            put(&mut data, x, y, star);
            if i % 16 == 0 {
                let dim = star * 0.5;
                put(&mut data, x - 1, y, dim);
                put(&mut data, x + 1, y, dim);
                put(&mut data, x, y - 1, dim);
                put(&mut data, x, y + 1, dim);
            }
        }

        Texture::from_pixels(width, height, data, "procedural_starfield")
    }

    /// Sample the texture at UV coordinates using bilinear filtering
    pub fn sample(&self, uv: Vec2) -> Color {
        self.sample_filtered(uv, TextureFilter::Bilinear)
    }

    pub fn sample_direct(&self, uv: Vec2) -> Color {
        self.sample_filtered(uv, TextureFilter::Nearest)
    }

    /// Sample the texture as a greyscale height value in [0, 1].
    pub fn sample_scalar(&self, uv: Vec2) -> f32 {
        self.sample(uv).luminance()
    }

    /// Sample the texture with specified filtering
    pub fn sample_filtered(&self, uv: Vec2, filter: TextureFilter) -> Color {
        // Wrap UV coordinates to [0, 1] using euclidean modulo (handles negatives).
        let u = wrap_uv(uv.x);
        let v = wrap_uv(1.0 - uv.y);

        match filter {
            TextureFilter::Nearest => self.sample_nearest(u, v),
            TextureFilter::Bilinear => self.sample_bilinear(u, v),
        }
    }

    fn sample_nearest(&self, u: f32, v: f32) -> Color {
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        let index = (y * self.width + x) as usize;
        self.data[index]
    }

    fn sample_bilinear(&self, u: f32, v: f32) -> Color {
        let x_f = u * (self.width - 1) as f32;
        let y_f = v * (self.height - 1) as f32;

        let x0 = x_f.floor() as u32;
        let y0 = y_f.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let dx = x_f - x0 as f32;
        let dy = y_f - y0 as f32;

        let c00 = self.data[(y0 * self.width + x0) as usize];
        let c10 = self.data[(y0 * self.width + x1) as usize];
        let c01 = self.data[(y1 * self.width + x0) as usize];
        let c11 = self.data[(y1 * self.width + x1) as usize];

        let c0 = c00.lerp(&c10, dx);
        let c1 = c01.lerp(&c11, dx);
        c0.lerp(&c1, dy)
    }
}

fn wrap_uv(value: f32) -> f32 {
    value.rem_euclid(1.0)
}

/// Texture filtering modes
#[derive(Debug, Clone, Copy)]
pub enum TextureFilter {
    Nearest,
    Bilinear,
}

/// Texture manager for loading and caching textures
pub struct TextureManager {
    textures: HashMap<String, Arc<Texture>>,
    base_path: String,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::with_base_path("assets/")
    }

    pub fn with_base_path(base_path: &str) -> Self {
        Self {
            textures: HashMap::new(),
            base_path: normalize_base_path(base_path),
        }
    }

    /// Load a texture and cache it
    pub fn load_texture(&mut self, path: &str) -> Result<Arc<Texture>, String> {
        let normalized_path = normalize_texture_path(path);

        if let Some(texture) = self.textures.get(&normalized_path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_texture_path(&normalized_path).ok_or_else(|| {
            format!(
                "Texture '{}' not found (base path: '{}')",
                normalized_path, self.base_path
            )
        })?;

        let texture = Texture::load_from_file(full_path.to_string_lossy().as_ref())?;
        let arc_texture = Arc::new(texture);

        self.textures.insert(normalized_path, arc_texture.clone());
        Ok(arc_texture)
    }

    /// Get a texture from cache, loading it if necessary; a load failure
    /// degrades to the given fallback.
    pub fn get_or(&mut self, path: &str, fallback: Texture) -> Arc<Texture> {
        match self.load_texture(path) {
            Ok(texture) => texture,
            Err(e) => {
                warn!("{}; substituting '{}'", e, fallback.path);
                Arc::new(fallback)
            }
        }
    }
}

fn normalize_base_path(base_path: &str) -> String {
    let mut base = base_path.to_string();
    if !base.ends_with('/') && !base.ends_with('\\') {
        base.push(std::path::MAIN_SEPARATOR);
    }
    base
}

fn normalize_texture_path(path: &str) -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}

impl TextureManager {
    fn resolve_texture_path(&self, path: &str) -> Option<PathBuf> {
        let base = Path::new(&self.base_path);
        let path_obj = Path::new(path);

        if path_obj.is_absolute() {
            return path_obj.exists().then(|| path_obj.to_path_buf());
        }

        let candidate = base.join(path_obj);
        if candidate.exists() {
            return Some(candidate);
        }

        if let Some(file_name) = path_obj.file_name() {
            let candidate = base.join(file_name);
            if candidate.exists() {
                return Some(candidate);
            }
        }

        None
    }
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: top row red/green, bottom row blue/white.
        Texture::from_pixels(
            2,
            2,
            vec![Color::RED, Color::GREEN, Color::BLUE, Color::WHITE],
            "checker",
        )
    }

    #[test]
    fn nearest_picks_texels() {
        let tex = checker();
        // v is flipped inside sample_filtered, so uv (0,1) is the top-left texel.
        assert_eq!(tex.sample_direct(Vec2::new(0.0, 0.99)), Color::RED);
        assert_eq!(tex.sample_direct(Vec2::new(0.99, 0.99)), Color::GREEN);
        assert_eq!(tex.sample_direct(Vec2::new(0.0, 0.01)), Color::BLUE);
    }

    #[test]
    fn uv_wraps_outside_unit_square() {
        let tex = checker();
        let inside = tex.sample_direct(Vec2::new(0.25, 0.75));
        let wrapped = tex.sample_direct(Vec2::new(1.25, -0.25));
        assert_eq!(inside, wrapped);
    }

    #[test]
    fn bilinear_blends_neighbors() {
        let tex = Texture::from_pixels(
            2,
            1,
            vec![Color::BLACK, Color::WHITE],
            "gradient",
        );
        let mid = tex.sample(Vec2::new(0.5, 0.5));
        assert!((mid.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn scalar_sample_is_luminance() {
        let tex = Texture::flat(Color::new(0.2, 0.4, 0.6), "flat");
        assert!((tex.sample_scalar(Vec2::new(0.3, 0.7)) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn star_speckle_stays_in_range() {
        let tex = Texture::star_speckle(64, 32, 100, 7);
        assert_eq!(tex.data.len(), 64 * 32);
        for c in tex.data.iter() {
            assert!(c.r >= 0.0 && c.r <= 1.0);
            assert!(c.g >= 0.0 && c.g <= 1.0);
            assert!(c.b >= 0.0 && c.b <= 1.0);
        }
        // Deterministic for a given seed.
        let again = Texture::star_speckle(64, 32, 100, 7);
        assert_eq!(tex.data[100], again.data[100]);
    }
}
