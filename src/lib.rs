//! # wotd-social
//!
//! Social-preview (Open Graph) image generator for a word-of-the-day site.
//! Every featured word and every generic page gets one 1200×630 PNG card: the
//! site title top-left, a date or subtitle beneath it, and the headline
//! anchored to the bottom in a brand-color gradient, shrunk to fit when long.
//!
//! # Pipeline
//!
//! ```text
//! fonts ─→ TypefaceSet ─┐
//!                       ├─→ text_path ─→ fit_scale ─→ compose ─→ Scene
//! RenderConfig ─────────┘                                         │
//!                                     OutputLayout::resolve ←── RustBackend (PNG)
//!                                               │
//!                                         write_artifact
//! ```
//!
//! Data flows one way. Typefaces are loaded once at startup and passed by
//! reference; a missing or corrupt font stops the run before anything is
//! rendered. After that, each card is independent: a failure is reported with
//! the word, date, or page path it belongs to and the batch carries on.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Fonts, glyph outlines, fit-to-width, scene composition, rasterizing, PNG encoding |
//! | [`naming`] | Slugs, dates, and the output path for every artifact; atomic writes |
//! | [`social`] | Batch driver: one artifact, all artifacts, skip-or-force, stats and events |
//! | [`words`] | Loads the word dataset (JSON files) |
//! | [`types`] | Shared input types (`WordEntry`, `PageEntry`) |
//! | [`config`] | `social.toml` loading, validation, and the derived `RenderConfig` |
//! | [`output`] | CLI output formatting for batch events |
//!
//! # Design Decisions
//!
//! ## Vector First, Pixels Last
//!
//! Text is converted to glyph outlines and measured as geometry, so fitting a
//! long word to the canvas is exact arithmetic on path bounds. Only the final
//! step touches pixels: tiny-skia rasterizes the scene, a median-cut pass
//! bounds the palette to 128 colors, and the `image` crate writes the PNG with
//! maximum compression.
//!
//! ## Origin-Anchored Scaling
//!
//! A headline wider than the content area is scaled uniformly about the left
//! end of its baseline, with no recentering. The baseline stays put and the
//! glyphs shrink toward it, so very long words end up shorter as well as
//! narrower. This is tested as part of the layout contract.
//!
//! ## Deterministic Output
//!
//! Same inputs, same bytes. Nothing in the pipeline reads the clock, the
//! environment, or hash-map iteration order, so regenerating a card that has
//! not changed produces an identical file.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod social;
pub mod types;
pub mod words;

#[cfg(test)]
pub(crate) mod test_helpers;
