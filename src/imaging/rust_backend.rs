//! Pure Rust scene encoder, statically linked.
//!
//! ## Crate mapping
//!
//! | Step | Crate / function |
//! |---|---|
//! | Rasterize paths + gradient | `tiny_skia::Pixmap::fill_path` (anti-aliased, non-zero winding) |
//! | Palette reduction | [`quantize`](super::quantize::quantize) (median cut) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (`CompressionType::Best`, adaptive filtering) |

use super::backend::{BackendError, SceneEncoder};
use super::params::{PaletteSize, Quality};
use super::quantize::quantize;
use super::scene::{Fill, PlacedBlock, Scene};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use tiny_skia::{
    FillRule, GradientStop, LinearGradient, Paint, Pixmap, Point, Shader, SpreadMode, Transform,
};

/// Pure Rust encoder producing palette-reduced RGBA PNGs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustBackend {
    pub palette: PaletteSize,
    pub quality: Quality,
}

impl RustBackend {
    pub fn new(palette: PaletteSize, quality: Quality) -> Self {
        Self { palette, quality }
    }
}

/// Rasterize a scene onto a fresh pixmap.
pub fn rasterize(scene: &Scene) -> Result<Pixmap, BackendError> {
    let mut pixmap = Pixmap::new(scene.canvas_width, scene.canvas_height).ok_or_else(|| {
        BackendError::EncodingFailed(format!(
            "Cannot allocate {}x{} canvas",
            scene.canvas_width, scene.canvas_height
        ))
    })?;
    pixmap.fill(scene.background.to_skia());

    for placed in &scene.blocks {
        if placed.block.is_empty() {
            continue;
        }
        let path = placed
            .block
            .to_skia_path()
            .and_then(|p| p.transform(placed.transform()))
            .ok_or_else(|| BackendError::InvalidPath(placed.block.text.clone()))?;

        let mut paint = Paint {
            anti_alias: true,
            ..Paint::default()
        };
        paint.shader = shader_for(scene, placed);
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    Ok(pixmap)
}

/// Solid color, or the scene gradient stretched over the block's rendered
/// height (top = first stop, bottom = last stop).
fn shader_for(scene: &Scene, placed: &PlacedBlock) -> Shader<'static> {
    let middle = scene.gradient[1].color.to_skia();
    match placed.fill {
        Fill::Solid(color) => Shader::SolidColor(color.to_skia()),
        Fill::Gradient => {
            let Some(bounds) = placed.rendered_bounds().filter(|b| b.height() > 0.0) else {
                return Shader::SolidColor(middle);
            };
            let stops = scene
                .gradient
                .iter()
                .map(|s| GradientStop::new(s.offset, s.color.to_skia()))
                .collect();
            LinearGradient::new(
                Point::from_xy(bounds.min_x, bounds.min_y),
                Point::from_xy(bounds.min_x, bounds.max_y),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )
            .unwrap_or(Shader::SolidColor(middle))
        }
    }
}

/// Straight-alpha RGBA8 bytes from a (premultiplied) pixmap.
fn demultiplied_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

impl SceneEncoder for RustBackend {
    fn encode(&self, scene: Scene) -> Result<Vec<u8>, BackendError> {
        let pixmap = rasterize(&scene)?;
        let mut rgba = demultiplied_rgba(&pixmap);
        quantize(&mut rgba, self.palette, self.quality);

        let mut bytes = Vec::new();
        PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive)
            .write_image(
                &rgba,
                scene.canvas_width,
                scene.canvas_height,
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| BackendError::EncodingFailed(format!("PNG encode failed: {}", e)))?;
        Ok(bytes)
    }
}
