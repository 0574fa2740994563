//! Scene composition.
//!
//! A [`Scene`] is the complete vector description of one card: canvas size,
//! white background, the headline gradient, and the text blocks with their
//! positions and fills. It is built once per artifact and handed by value to
//! a [`SceneEncoder`](super::backend::SceneEncoder).
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Site Title                (extra-bold, dark)  │
//! │ January 16, 2024          (regular, primary)  │
//! │                                              │
//! │                                              │
//! │ serendipity        (extra-bold, gradient)    │
//! │ ░░░░ descender room (20% of headline size)   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Each block is scaled about its own local origin (the left end of its
//! baseline) and then translated to its anchor. A long headline therefore
//! shrinks toward its baseline: its bottom edge stays put and the space above
//! it grows. This is intentional; the bottom-anchored headline keeps the same
//! baseline regardless of word length.

use super::calculations::{
    CANVAS_HEIGHT, CANVAS_WIDTH, HEADLINE_SIZE, SUBTITLE_SIZE, TITLE_SIZE, card_layout,
};
use super::params::Rgba;
use super::text_path::{Bounds, TextBlock, text_path};
use super::typeface::{TypefaceError, TypefaceSet, Weight};
use crate::config::RenderConfig;

/// Position of the middle gradient stop (the primary color).
const GRADIENT_MID: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, 0.0 (top) to 1.0 (bottom).
    pub offset: f32,
    pub color: Rgba,
}

/// How a text block is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    /// The scene's vertical gradient, spanning the block's rendered bounds.
    Gradient,
}

/// A text block anchored on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    pub block: TextBlock,
    /// Canvas position of the block's local origin (left end of the baseline).
    pub position: (f32, f32),
    pub fill: Fill,
}

impl PlacedBlock {
    /// Local → canvas transform: scale about the local origin, then translate.
    pub fn transform(&self) -> tiny_skia::Transform {
        let (x, y) = self.position;
        let s = self.block.scale;
        tiny_skia::Transform::from_translate(x, y).pre_scale(s, s)
    }

    /// Bounding box on the canvas after scaling and placement.
    pub fn rendered_bounds(&self) -> Option<Bounds> {
        if self.block.is_empty() {
            return None;
        }
        let (x, y) = self.position;
        let s = self.block.scale;
        let (ox, oy) = self.block.origin_offset;
        Some(Bounds {
            min_x: x + ox * s,
            min_y: y + oy * s,
            max_x: x + (ox + self.block.width) * s,
            max_y: y + (oy + self.block.height) * s,
        })
    }
}

/// Everything needed to rasterize one card.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub background: Rgba,
    /// light → primary → dark at 0% / 60% / 100%.
    pub gradient: [GradientStop; 3],
    /// Painted in order.
    pub blocks: Vec<PlacedBlock>,
}

impl Scene {
    /// The block painted with the gradient, if any.
    pub fn headline(&self) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.fill == Fill::Gradient)
    }
}

/// Lay out a card.
///
/// The site title and the subtitle are placed top-left; an empty or absent
/// subtitle is left out. The headline is always present (possibly empty) and
/// is drawn exactly as given: casing decisions belong to the caller.
pub fn compose(
    title: &str,
    subtitle: Option<&str>,
    headline: &str,
    config: &RenderConfig,
    typefaces: &TypefaceSet,
) -> Result<Scene, TypefaceError> {
    let layout = card_layout(CANVAS_WIDTH, CANVAS_HEIGHT);
    let colors = &config.colors;
    let mut blocks = Vec::with_capacity(3);

    if !title.is_empty() {
        blocks.push(PlacedBlock {
            block: text_path(
                typefaces,
                title,
                TITLE_SIZE,
                Weight::ExtraBold,
                layout.max_width,
            )?,
            position: layout.title,
            fill: Fill::Solid(colors.primary_dark),
        });
    }

    if let Some(subtitle) = subtitle.filter(|s| !s.is_empty()) {
        blocks.push(PlacedBlock {
            block: text_path(
                typefaces,
                subtitle,
                SUBTITLE_SIZE,
                Weight::Regular,
                layout.max_width,
            )?,
            position: layout.subtitle,
            fill: Fill::Solid(colors.primary),
        });
    }

    blocks.push(PlacedBlock {
        block: text_path(
            typefaces,
            headline,
            HEADLINE_SIZE,
            Weight::ExtraBold,
            layout.max_width,
        )?,
        position: layout.headline,
        fill: Fill::Gradient,
    });

    Ok(Scene {
        canvas_width: CANVAS_WIDTH,
        canvas_height: CANVAS_HEIGHT,
        background: Rgba::WHITE,
        gradient: [
            GradientStop {
                offset: 0.0,
                color: colors.primary_light,
            },
            GradientStop {
                offset: GRADIENT_MID,
                color: colors.primary,
            },
            GradientStop {
                offset: 1.0,
                color: colors.primary_dark,
            },
        ],
        blocks,
    })
}
