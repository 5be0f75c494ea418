//! Nearest-color palette quantization.

use super::Color;
use crate::schema::Palette;

/// Euclidean RGB distance, computed in single precision.
#[inline]
pub fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Index of the palette entry closest to `color`.
///
/// Entries are scanned in stored order and the first minimum wins, so exact
/// ties resolve to the lowest index.
pub fn nearest_index(palette: &Palette, color: Color) -> usize {
    let query = [color.r as f32, color.g as f32, color.b as f32];

    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (i, &entry) in palette.colours().iter().enumerate() {
        let d = distance(entry, query);
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_palette() -> Palette {
        Palette::new(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let palette = rgb_palette();
        assert_eq!(nearest_index(&palette, Color::new(0.0, 1.0, 0.0)), 1);
        assert_eq!(nearest_index(&palette, Color::new(0.0, 0.0, 1.0)), 2);
    }

    #[test]
    fn test_nearest() {
        let palette = rgb_palette();
        assert_eq!(nearest_index(&palette, Color::new(0.9, 0.2, 0.1)), 0);
        assert_eq!(nearest_index(&palette, Color::new(0.2, 0.3, 0.8)), 2);
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let palette = rgb_palette();
        // Equidistant from every entry.
        assert_eq!(nearest_index(&palette, Color::new(0.5, 0.5, 0.5)), 0);

        let duplicated =
            Palette::new(vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5], [0.5, 0.5, 0.5]]).unwrap();
        assert_eq!(nearest_index(&duplicated, Color::new(0.5, 0.5, 0.5)), 1);
    }

    #[test]
    fn test_deterministic() {
        let palette = rgb_palette();
        let color = Color::new(0.3, 0.31, 0.29);
        let first = nearest_index(&palette, color);
        for _ in 0..10 {
            assert_eq!(nearest_index(&palette, color), first);
        }
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]), 0.0);
        assert!((distance([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]) - 3f32.sqrt()).abs() < 1e-6);
    }
}
