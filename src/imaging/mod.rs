//! Social card imaging in pure Rust.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Load fonts** | `ttf-parser` faces over bytes read once at startup |
//! | **Text → outlines** | `ttf_parser::Face::outline_glyph` + `kern` pair adjustments |
//! | **Fit to width** | [`fit_scale`] (uniform shrink, never enlarge) |
//! | **Compose** | [`compose`]: white canvas, title, subtitle, gradient headline |
//! | **Rasterize → PNG** | tiny-skia + median-cut palette + `image` PNG encoder |
//!
//! The module is split into:
//! - **Typeface**: [`TypefaceSet`], loaded once and passed by reference
//! - **Text paths**: [`TextBlock`] geometry and measurement
//! - **Calculations**: Pure functions for canvas and layout math (unit testable)
//! - **Parameters**: Data structures describing encoding choices
//! - **Scene**: The composed vector description of one card
//! - **Backend**: [`SceneEncoder`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining composition + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
mod quantize;
pub mod rust_backend;
pub mod scene;
pub mod text_path;
pub mod typeface;

pub use backend::{BackendError, SceneEncoder};
pub use calculations::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CardLayout, HEADLINE_SIZE, card_layout, content_width,
    fit_scale, padding,
};
pub use operations::{CardText, RenderError, render_card};
pub use params::{PaletteSize, Quality, Rgba};
pub use rust_backend::RustBackend;
pub use scene::{Fill, GradientStop, PlacedBlock, Scene, compose};
pub use text_path::{Bounds, PathCommand, TextBlock, text_path};
pub use typeface::{Typeface, TypefaceError, TypefaceSet, Weight};
