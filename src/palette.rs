// Fixed colour palettes used to reduce captured frames to a handful of
// colours before they are encoded.

use image::{Rgb, RgbImage};

pub const BLACK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
pub const GREEN: Rgb<u8> = Rgb([0x00, 0xff, 0x00]);
pub const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);

#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
}

impl Palette {
    /// Panics on an empty palette, there would be nothing to map to.
    pub fn new(colors: Vec<Rgb<u8>>) -> Palette {
        assert!(!colors.is_empty(), "palette needs at least one colour");
        Palette { colors }
    }

    // Wood, leaves and background
    pub fn tree() -> Palette {
        Palette::new(vec![BLACK, GREEN, WHITE])
    }

    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }

    /// Closest palette entry by squared RGB distance. Ties go to the
    /// earliest entry.
    pub fn nearest(&self, color: Rgb<u8>) -> Rgb<u8> {
        let mut best = self.colors[0];
        let mut best_dist = distance_sq(color, best);
        for &candidate in &self.colors[1..] {
            let dist = distance_sq(color, candidate);
            if dist < best_dist {
                best = candidate;
                best_dist = dist;
            }
        }
        best
    }

    pub fn quantize(&self, image: &RgbImage) -> RgbImage {
        let mut out = image.clone();
        for pixel in out.pixels_mut() {
            *pixel = self.nearest(*pixel);
        }
        out
    }
}

fn distance_sq(a: Rgb<u8>, b: Rgb<u8>) -> u32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}
