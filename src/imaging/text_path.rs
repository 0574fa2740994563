//! Text-to-path conversion.
//!
//! Turns a string into vector outlines using a loaded [`Typeface`]. Glyphs are
//! laid out left to right on a baseline at `y = 0`, starting at `x = 0`, in
//! canvas orientation (y grows downward), so the run's local origin is the
//! left end of its baseline.
//!
//! The result is a [`TextBlock`]: the path commands, their tight bounding
//! box measured *before* any fit-to-width scaling, and the scale factor the
//! block must be drawn at to fit the caller's maximum width.
//!
//! Characters the font has no glyph for render as the font's `.notdef` glyph
//! (usually an empty box). That is a known limitation; no substitution is
//! attempted.

use super::calculations::fit_scale;
use super::typeface::{Typeface, TypefaceError, TypefaceSet, Weight};
use std::fmt::Write as _;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

/// One drawing command in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    CubicTo(f32, f32, f32, f32, f32, f32),
    Close,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    fn at(x: f32, y: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: f32, y: f32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// A measured run of text, ready to be placed in a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub font_size: f32,
    pub weight: Weight,
    pub commands: Vec<PathCommand>,
    /// Unscaled width of the tight bounding box.
    pub width: f32,
    /// Unscaled height of the tight bounding box.
    pub height: f32,
    /// Uniform scale in `(0, 1]`, applied about the local origin.
    pub scale: f32,
    /// Top-left corner of the unscaled bounding box relative to the local origin.
    pub origin_offset: (f32, f32),
}

impl TextBlock {
    /// A block with no geometry. Used for empty text and degenerate inputs.
    pub fn empty(text: &str, font_size: f32, weight: Weight) -> Self {
        Self {
            text: text.to_string(),
            font_size,
            weight,
            commands: Vec::new(),
            width: 0.0,
            height: 0.0,
            scale: 1.0,
            origin_offset: (0.0, 0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn scaled_width(&self) -> f32 {
        self.width * self.scale
    }

    pub fn scaled_height(&self) -> f32 {
        self.height * self.scale
    }

    /// SVG path data (`d` attribute) for the unscaled outline, two decimals.
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for command in &self.commands {
            // Writing into a String cannot fail.
            let _ = match *command {
                PathCommand::MoveTo(x, y) => write!(d, "M{x:.2} {y:.2}"),
                PathCommand::LineTo(x, y) => write!(d, "L{x:.2} {y:.2}"),
                PathCommand::QuadTo(x1, y1, x, y) => write!(d, "Q{x1:.2} {y1:.2} {x:.2} {y:.2}"),
                PathCommand::CubicTo(x1, y1, x2, y2, x, y) => {
                    write!(d, "C{x1:.2} {y1:.2} {x2:.2} {y2:.2} {x:.2} {y:.2}")
                }
                PathCommand::Close => write!(d, "Z"),
            };
        }
        d
    }

    /// Build the unscaled outline as a tiny-skia path. `None` for empty blocks.
    pub fn to_skia_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(x, y) => pb.move_to(x, y),
                PathCommand::LineTo(x, y) => pb.line_to(x, y),
                PathCommand::QuadTo(x1, y1, x, y) => pb.quad_to(x1, y1, x, y),
                PathCommand::CubicTo(x1, y1, x2, y2, x, y) => pb.cubic_to(x1, y1, x2, y2, x, y),
                PathCommand::Close => pb.close(),
            }
        }
        pb.finish()
    }
}

/// Convert `text` to outlines at `font_size` using the requested weight.
///
/// Empty text, a non-positive font size, or a non-positive `max_width` all
/// yield a zero-extent block rather than an error. The returned block's
/// `scale` shrinks it to `max_width` when it is wider; it is never enlarged.
pub fn text_path(
    typefaces: &TypefaceSet,
    text: &str,
    font_size: f32,
    weight: Weight,
    max_width: f32,
) -> Result<TextBlock, TypefaceError> {
    outline_text(typefaces.get(weight), text, font_size, max_width)
}

/// Same as [`text_path`] against a single typeface.
pub fn outline_text(
    typeface: &Typeface,
    text: &str,
    font_size: f32,
    max_width: f32,
) -> Result<TextBlock, TypefaceError> {
    let weight = typeface.weight();
    if text.is_empty() || !is_positive(font_size) || !is_positive(max_width) {
        return Ok(TextBlock::empty(text, font_size, weight));
    }

    let face = typeface.face()?;
    let units_to_px = font_size / f32::from(typeface.units_per_em());

    let mut collector = OutlineCollector {
        commands: Vec::new(),
        scale: units_to_px,
        pen_x: 0.0,
    };
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
        if let Some(left) = previous {
            collector.pen_x += f32::from(kerning(&face, left, glyph)) * units_to_px;
        }
        // Glyphs without outlines (spaces) still advance the pen.
        face.outline_glyph(glyph, &mut collector);
        let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
        collector.pen_x += f32::from(advance) * units_to_px;
        previous = Some(glyph);
    }

    let commands = collector.commands;
    let Some(bounds) = tight_bounds(&commands) else {
        return Ok(TextBlock::empty(text, font_size, weight));
    };

    let width = bounds.width();
    Ok(TextBlock {
        text: text.to_string(),
        font_size,
        weight,
        commands,
        width,
        height: bounds.height(),
        scale: fit_scale(width, max_width),
        origin_offset: (bounds.min_x, bounds.min_y),
    })
}

fn is_positive(value: f32) -> bool {
    value > 0.0
}

/// Horizontal pair kerning from the legacy `kern` table, in font units.
fn kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> i16 {
    let Some(kern) = face.tables().kern else {
        return 0;
    };
    kern.subtables
        .into_iter()
        .filter(|s| s.horizontal && !s.variable && !s.has_cross_stream)
        .find_map(|s| s.glyphs_kerning(left, right))
        .unwrap_or(0)
}

/// Receives ttf-parser outline callbacks (font units, y-up) and records them
/// in pixels, y-down, offset by the current pen position.
struct OutlineCollector {
    commands: Vec<PathCommand>,
    scale: f32,
    pen_x: f32,
}

impl OutlineCollector {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.pen_x + x * self.scale, -y * self.scale)
    }
}

impl OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.commands.push(PathCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.commands.push(PathCommand::LineTo(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.commands.push(PathCommand::QuadTo(x1, y1, x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.commands.push(PathCommand::CubicTo(x1, y1, x2, y2, x, y));
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}

/// Tight bounding box of a path: on-curve points plus curve extrema.
/// Off-curve control points only count where the curve actually reaches.
pub fn tight_bounds(commands: &[PathCommand]) -> Option<Bounds> {
    let mut bounds = Bounds::at(f32::INFINITY, f32::INFINITY);
    bounds.max_x = f32::NEG_INFINITY;
    bounds.max_y = f32::NEG_INFINITY;
    let mut touched = false;
    let mut include = |x: f32, y: f32| {
        bounds.include(x, y);
        touched = true;
    };

    let mut current = (0.0f32, 0.0f32);
    let mut start = current;
    for command in commands {
        match *command {
            PathCommand::MoveTo(x, y) => {
                include(x, y);
                current = (x, y);
                start = current;
            }
            PathCommand::LineTo(x, y) => {
                include(x, y);
                current = (x, y);
            }
            PathCommand::QuadTo(x1, y1, x, y) => {
                for t in quad_extrema(current.0, x1, x)
                    .into_iter()
                    .chain(quad_extrema(current.1, y1, y))
                    .flatten()
                {
                    include(quad_at(current.0, x1, x, t), quad_at(current.1, y1, y, t));
                }
                include(x, y);
                current = (x, y);
            }
            PathCommand::CubicTo(x1, y1, x2, y2, x, y) => {
                for t in cubic_extrema(current.0, x1, x2, x)
                    .into_iter()
                    .chain(cubic_extrema(current.1, y1, y2, y))
                    .flatten()
                {
                    include(
                        cubic_at(current.0, x1, x2, x, t),
                        cubic_at(current.1, y1, y2, y, t),
                    );
                }
                include(x, y);
                current = (x, y);
            }
            PathCommand::Close => current = start,
        }
    }
    touched.then_some(bounds)
}

fn in_open_unit(t: f32) -> Option<f32> {
    (t > 0.0 && t < 1.0).then_some(t)
}

fn quad_extrema(p0: f32, p1: f32, p2: f32) -> [Option<f32>; 1] {
    let denom = p0 - 2.0 * p1 + p2;
    if denom.abs() < f32::EPSILON {
        return [None];
    }
    [in_open_unit((p0 - p1) / denom)]
}

fn quad_at(p0: f32, p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    mt * mt * p0 + 2.0 * mt * t * p1 + t * t * p2
}

/// Roots of the cubic's derivative inside (0, 1).
fn cubic_extrema(p0: f32, p1: f32, p2: f32, p3: f32) -> [Option<f32>; 2] {
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 2.0 * (p0 - 2.0 * p1 + p2);
    let c = p1 - p0;

    if a.abs() < f32::EPSILON {
        if b.abs() < f32::EPSILON {
            return [None, None];
        }
        return [in_open_unit(-c / b), None];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return [None, None];
    }
    let sq = disc.sqrt();
    [
        in_open_unit((-b + sq) / (2.0 * a)),
        in_open_unit((-b - sq) / (2.0 * a)),
    ]
}

fn cubic_at(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    mt * mt * mt * p0 + 3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t * p3
}
