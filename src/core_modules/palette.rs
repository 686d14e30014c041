// THEORY:
// Fill colors are load-bearing for containment: the analyzer reads nesting from
// which colors survive an overlay, so two shapes sharing a fill (or a shape painted
// in the background color) make the evidence meaningless. Color assignment is
// therefore an explicit collaborator handed to the scene, not a global random call.
//
// `DistinctPalette` walks the 24-bit color space with an odd multiplier. Multiplying
// by an odd number is a bijection modulo 2^24, so the first 2^24 - 1 colors it yields
// are pairwise distinct, and consecutive colors land far apart.

use image::Rgb;

/// Hands out fill colors for new shapes.
pub trait ColorSource: Send {
    fn next_color(&mut self) -> Rgb<u8>;
}

const COLOR_SPACE: u32 = 1 << 24;
const STRIDE: u32 = 0x9E_37_79;

/// Deterministic generator of pairwise distinct colors, never equal to `background`.
#[derive(Debug, Clone)]
pub struct DistinctPalette {
    counter: u32,
    background: Rgb<u8>,
}

impl DistinctPalette {
    pub fn new(background: Rgb<u8>) -> Self {
        Self { counter: 0, background }
    }

    fn color_at(index: u32) -> Rgb<u8> {
        let packed = index.wrapping_mul(STRIDE) % COLOR_SPACE;
        Rgb([(packed >> 16) as u8, (packed >> 8) as u8, packed as u8])
    }
}

impl ColorSource for DistinctPalette {
    fn next_color(&mut self) -> Rgb<u8> {
        loop {
            self.counter = (self.counter + 1) % COLOR_SPACE;
            let color = Self::color_at(self.counter);
            if color != self.background {
                return color;
            }
        }
    }
}

/// Replays a fixed list of colors, cycling when exhausted. Distinctness is the
/// caller's responsibility.
#[derive(Debug, Clone)]
pub struct FixedPalette {
    colors: Vec<Rgb<u8>>,
    next: usize,
}

impl FixedPalette {
    pub fn new(colors: Vec<Rgb<u8>>) -> Self {
        Self { colors, next: 0 }
    }
}

impl ColorSource for FixedPalette {
    fn next_color(&mut self) -> Rgb<u8> {
        if self.colors.is_empty() {
            return Rgb([0, 0, 0]);
        }
        let color = self.colors[self.next % self.colors.len()];
        self.next += 1;
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::canvas::DEFAULT_BACKGROUND;
    use std::collections::HashSet;

    #[test]
    fn distinct_palette_never_repeats() {
        let mut palette = DistinctPalette::new(DEFAULT_BACKGROUND);
        let colors: HashSet<[u8; 3]> = (0..10_000).map(|_| palette.next_color().0).collect();
        assert_eq!(colors.len(), 10_000);
        assert!(!colors.contains(&DEFAULT_BACKGROUND.0));
    }

    #[test]
    fn distinct_palette_skips_background() {
        let background = DistinctPalette::color_at(1);
        let mut palette = DistinctPalette::new(background);
        assert_ne!(palette.next_color(), background);
    }

    #[test]
    fn fixed_palette_cycles() {
        let mut palette = FixedPalette::new(vec![Rgb([1, 1, 1]), Rgb([2, 2, 2])]);
        assert_eq!(palette.next_color(), Rgb([1, 1, 1]));
        assert_eq!(palette.next_color(), Rgb([2, 2, 2]));
        assert_eq!(palette.next_color(), Rgb([1, 1, 1]));
    }
}
