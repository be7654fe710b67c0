//! Display colors.

use rand::Rng;

/// Generates a random `#RRGGBB` color (uppercase hex).
pub fn random_hex_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let rgb: u32 = rng.gen_range(0..=0x00FF_FFFF);
    format!("#{rgb:06X}")
}
