//! Shared test utilities.
//!
//! Real glyph outlines come from the `notosans` dev-dependency, so tests that
//! measure or rasterize text need no font files on disk.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let scene = compose("Site", None, "word", &test_render_config(), &noto_typefaces())?;
//! ```

use crate::config::{BrandColors, RenderConfig};
use crate::imaging::{Rgba, Typeface, TypefaceSet, Weight};

/// Noto Sans loaded for both weights.
///
/// The crate only ships one weight, so the "extra-bold" face is the regular
/// outline under a different label. Geometry tests care about outlines, not
/// stroke weight.
pub fn noto_typefaces() -> TypefaceSet {
    TypefaceSet::new(
        Typeface::from_bytes(Weight::Regular, notosans::REGULAR_TTF.to_vec()).unwrap(),
        Typeface::from_bytes(Weight::ExtraBold, notosans::REGULAR_TTF.to_vec()).unwrap(),
    )
}

/// Render config with the stock brand colors.
pub fn test_render_config() -> RenderConfig {
    RenderConfig {
        site_title: "Word of the Day".to_string(),
        colors: BrandColors {
            primary: Rgba::opaque(0x4f, 0x46, 0xe5),
            primary_light: Rgba::opaque(0xa5, 0xb4, 0xfc),
            primary_dark: Rgba::opaque(0x31, 0x2e, 0x81),
        },
    }
}
