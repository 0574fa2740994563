//! Palette quantization (median cut).
//!
//! Reduces an RGBA buffer to at most [`PaletteSize`] distinct colors in
//! place. Cards are mostly flat white with anti-aliased text edges and one
//! gradient, so the unique color count is modest and a plain median cut over
//! the color histogram is enough.
//!
//! The result is deterministic: the histogram is sorted before splitting and
//! ties are broken by color value, never by hash order.
//!
//! If the image already fits in the palette it is left untouched. Otherwise
//! color channel precision is first reduced according to [`Quality`], then
//! the histogram is split into boxes and every pixel is replaced by the most
//! frequent color of its box. Alpha is never reduced, and channel values 0
//! and 255 survive the precision step, so the opaque white background (always
//! the most frequent color of its box) comes out exactly as it went in.

use super::params::{PaletteSize, Quality};
use std::collections::HashMap;

type Color = [u8; 4];

/// Quantize `rgba` (tightly packed RGBA8) in place and return the palette.
pub fn quantize(rgba: &mut [u8], max_colors: PaletteSize, quality: Quality) -> Vec<Color> {
    let exact = histogram(rgba);
    if exact.len() <= max_colors.value() {
        return exact.into_iter().map(|(c, _)| c).collect();
    }

    let shift = quality.precision_shift();
    if shift > 0 {
        for px in rgba.chunks_exact_mut(4) {
            for channel in &mut px[..3] {
                *channel = reduce(*channel, shift);
            }
        }
    }

    let boxes = median_cut(histogram(rgba), max_colors.value());

    let mut lookup: HashMap<Color, usize> = HashMap::new();
    let mut palette = Vec::with_capacity(boxes.len());
    for (index, entries) in boxes.iter().enumerate() {
        palette.push(dominant_color(entries));
        for (color, _) in entries {
            lookup.insert(*color, index);
        }
    }

    for px in rgba.chunks_exact_mut(4) {
        let color: Color = [px[0], px[1], px[2], px[3]];
        if let Some(&index) = lookup.get(&color) {
            px.copy_from_slice(&palette[index]);
        }
    }
    palette
}

/// Drop `shift` low bits and re-center the value in its bucket.
/// Full-off and full-on channels are kept as they are.
fn reduce(value: u8, shift: u32) -> u8 {
    if value == u8::MIN || value == u8::MAX {
        return value;
    }
    let mask = 0xFFu8 << shift;
    let half = 1u8 << (shift - 1);
    (value & mask) | half
}

/// Sorted `(color, count)` pairs.
fn histogram(rgba: &[u8]) -> Vec<(Color, u32)> {
    let mut counts: HashMap<Color, u32> = HashMap::new();
    for px in rgba.chunks_exact(4) {
        *counts.entry([px[0], px[1], px[2], px[3]]).or_insert(0) += 1;
    }
    let mut entries: Vec<(Color, u32)> = counts.into_iter().collect();
    entries.sort_unstable_by_key(|(c, _)| *c);
    entries
}

/// Split the histogram into at most `max_boxes` boxes.
fn median_cut(histogram: Vec<(Color, u32)>, max_boxes: usize) -> Vec<Vec<(Color, u32)>> {
    let mut boxes = vec![histogram];

    while boxes.len() < max_boxes {
        // Widest splittable box; first one wins ties.
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.len() > 1)
            .map(|(i, b)| {
                let (channel, range) = widest_channel(b);
                (i, channel, range)
            })
            .fold(None, |best: Option<(usize, usize, u8)>, current| match best {
                Some(b) if b.2 >= current.2 => Some(b),
                _ => Some(current),
            });

        let Some((index, channel, _)) = candidate else {
            break;
        };

        let mut entries = boxes.swap_remove(index);
        entries.sort_unstable_by_key(|(c, _)| (c[channel], *c));
        let split = median_index(&entries);
        let upper = entries.split_off(split);
        boxes.push(entries);
        boxes.push(upper);
    }

    // Stable palette order regardless of split history.
    boxes.sort_unstable_by_key(|b| b.first().map(|(c, _)| *c));
    boxes
}

fn widest_channel(entries: &[(Color, u32)]) -> (usize, u8) {
    (0..4)
        .map(|channel| {
            let (lo, hi) = entries.iter().fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| {
                (lo.min(c[channel]), hi.max(c[channel]))
            });
            (channel, hi - lo)
        })
        .fold((0, 0), |best, current| {
            if current.1 > best.1 { current } else { best }
        })
}

/// Index that splits `entries` into two non-empty halves by pixel count.
fn median_index(entries: &[(Color, u32)]) -> usize {
    let total: u64 = entries.iter().map(|(_, n)| u64::from(*n)).sum();
    let mut running = 0u64;
    for (i, (_, n)) in entries.iter().enumerate() {
        running += u64::from(*n);
        if running * 2 >= total {
            return (i + 1).clamp(1, entries.len() - 1);
        }
    }
    entries.len() / 2
}

/// Most frequent color in a box; the lowest color wins ties.
fn dominant_color(entries: &[(Color, u32)]) -> Color {
    entries
        .iter()
        .fold(None, |best: Option<(Color, u32)>, &(color, n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((color, n)),
        })
        .map(|(color, _)| color)
        .unwrap_or([0, 0, 0, 0])
}
