//! Pure layout calculations for social cards.
//!
//! All functions here are pure and testable without fonts, pixels, or I/O.
//!
//! Every card is a fixed 1200×630 canvas. Padding is the same on all four
//! sides and is 5% of the shorter dimension (31.5px). Text blocks are shrunk
//! to fit the width between the paddings, never enlarged.

/// Canvas width in pixels (Open Graph recommended size).
pub const CANVAS_WIDTH: u32 = 1200;
/// Canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 630;

/// Fraction of the shorter canvas dimension used as padding on every side.
pub const PADDING_RATIO: f32 = 0.05;
/// Fraction of the headline size kept free below its baseline for descenders.
pub const DESCENDER_RATIO: f32 = 0.2;

pub const TITLE_SIZE: f32 = 36.0;
pub const SUBTITLE_SIZE: f32 = 28.0;
pub const SUBTITLE_GAP: f32 = 12.0;
pub const HEADLINE_SIZE: f32 = 160.0;

/// Uniform shrink factor that makes a block of width `width` fit in `max_width`.
///
/// Returns `max_width / width` when the block is too wide and `1.0` otherwise,
/// so the result is always in `(0, 1]`.
///
/// # Examples
/// ```
/// # use wotd_social::imaging::fit_scale;
/// assert_eq!(fit_scale(500.0, 1000.0), 1.0);
/// assert_eq!(fit_scale(2000.0, 1000.0), 0.5);
/// ```
pub fn fit_scale(width: f32, max_width: f32) -> f32 {
    if width > max_width && max_width > 0.0 {
        max_width / width
    } else {
        1.0
    }
}

/// Symmetric padding for a canvas.
pub fn padding(canvas_width: u32, canvas_height: u32) -> f32 {
    canvas_width.min(canvas_height) as f32 * PADDING_RATIO
}

/// Width available to a text block between the left and right padding.
pub fn content_width(canvas_width: u32, canvas_height: u32) -> f32 {
    canvas_width as f32 - 2.0 * padding(canvas_width, canvas_height)
}

/// Baseline positions of the three text blocks on a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLayout {
    pub padding: f32,
    pub max_width: f32,
    /// `(x, baseline_y)` of the site title.
    pub title: (f32, f32),
    /// `(x, baseline_y)` of the subtitle, directly under the title.
    pub subtitle: (f32, f32),
    /// `(x, baseline_y)` of the headline, anchored to the bottom padding.
    pub headline: (f32, f32),
}

/// Compute text anchors for the given canvas.
///
/// - Title baseline: `padding + TITLE_SIZE`
/// - Subtitle baseline: title baseline + `SUBTITLE_GAP + SUBTITLE_SIZE`
/// - Headline baseline: `height - padding - DESCENDER_RATIO * HEADLINE_SIZE`
pub fn card_layout(canvas_width: u32, canvas_height: u32) -> CardLayout {
    let pad = padding(canvas_width, canvas_height);
    let title_y = pad + TITLE_SIZE;
    let subtitle_y = title_y + SUBTITLE_GAP + SUBTITLE_SIZE;
    let headline_y = canvas_height as f32 - pad - HEADLINE_SIZE * DESCENDER_RATIO;

    CardLayout {
        padding: pad,
        max_width: content_width(canvas_width, canvas_height),
        title: (pad, title_y),
        subtitle: (pad, subtitle_y),
        headline: (pad, headline_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // fit_scale
    // =========================================================================

    #[test]
    fn narrow_block_is_not_scaled() {
        assert_eq!(fit_scale(400.0, 1137.0), 1.0);
    }

    #[test]
    fn exact_fit_is_not_scaled() {
        assert_eq!(fit_scale(1137.0, 1137.0), 1.0);
    }

    #[test]
    fn wide_block_is_shrunk_to_max_width() {
        let scale = fit_scale(2274.0, 1137.0);
        assert_eq!(scale, 0.5);
        assert!((2274.0 * scale - 1137.0).abs() < 1e-3);
    }

    #[test]
    fn scale_stays_in_unit_interval() {
        for width in [1.0, 10.0, 999.0, 1500.0, 1e6] {
            let s = fit_scale(width, 1000.0);
            assert!(s > 0.0 && s <= 1.0, "width {width} gave {s}");
            assert!(width * s <= 1000.0 + 1e-3);
        }
    }

    #[test]
    fn zero_width_is_not_scaled() {
        assert_eq!(fit_scale(0.0, 1000.0), 1.0);
    }

    #[test]
    fn non_positive_max_never_produces_bad_scale() {
        assert_eq!(fit_scale(100.0, 0.0), 1.0);
        assert_eq!(fit_scale(100.0, -5.0), 1.0);
    }

    // =========================================================================
    // padding / layout
    // =========================================================================

    #[test]
    fn padding_is_five_percent_of_short_side() {
        assert_eq!(padding(CANVAS_WIDTH, CANVAS_HEIGHT), 31.5);
        assert_eq!(padding(630, 1200), 31.5);
    }

    #[test]
    fn content_width_subtracts_both_paddings() {
        assert_eq!(content_width(CANVAS_WIDTH, CANVAS_HEIGHT), 1137.0);
    }

    #[test]
    fn title_sits_below_top_padding() {
        let layout = card_layout(CANVAS_WIDTH, CANVAS_HEIGHT);
        assert_eq!(layout.title, (31.5, 31.5 + TITLE_SIZE));
    }

    #[test]
    fn subtitle_follows_title() {
        let layout = card_layout(CANVAS_WIDTH, CANVAS_HEIGHT);
        assert_eq!(layout.subtitle.0, layout.title.0);
        assert_eq!(
            layout.subtitle.1,
            layout.title.1 + SUBTITLE_GAP + SUBTITLE_SIZE
        );
    }

    #[test]
    fn headline_reserves_descender_space() {
        let layout = card_layout(CANVAS_WIDTH, CANVAS_HEIGHT);
        // 630 - 31.5 - 0.2 * 160
        assert_eq!(layout.headline, (31.5, 566.5));
    }
}
