use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// Precompute the picker background once per widget.
///
/// Cell `(x, y)` shows the colour `(r, 1, b)` with `r = x / size * ratio` and
/// `b = y / size * ratio`, normalised so its largest channel is 255.
pub fn chromaticity_gradient(size: u32, ratio: f32) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| {
        let r = x as f32 / size as f32 * ratio;
        let b = y as f32 / size as f32 * ratio;
        let max = r.max(1.0).max(b);
        let q = |v: f32| (v / max * 255.0).round() as u8;
        Rgb([q(r), q(1.0), q(b)])
    })
}

/// White anti-aliased ring of the given radius on a transparent square.
pub fn marker_ring(radius: u32) -> RgbaImage {
    let side = radius * 2;
    let ring = radius as f32 - 1.5;
    RgbaImage::from_fn(side, side, |x, y| {
        let dx = x as f32 + 0.5 - radius as f32;
        let dy = y as f32 + 0.5 - radius as f32;
        let distance = (dx * dx + dy * dy).sqrt();
        let coverage = (1.0 - (distance - ring).abs()).clamp(0.0, 1.0);
        Rgba([255, 255, 255, (coverage * 255.0).round() as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_axes() {
        let gradient = chromaticity_gradient(30, 3.0);

        assert_eq!(gradient.dimensions(), (30, 30));
        assert_eq!(gradient.get_pixel(0, 0).0, [0, 255, 0]);
        // r = 1 at x = 10, b = 1 at y = 10.
        assert_eq!(gradient.get_pixel(10, 0).0, [255, 255, 0]);
        assert_eq!(gradient.get_pixel(0, 10).0, [0, 255, 255]);
    }

    #[test]
    fn test_gradient_is_normalised_to_brightest_channel() {
        let gradient = chromaticity_gradient(64, 3.0);
        for px in gradient.pixels() {
            assert_eq!(px.0.iter().copied().max(), Some(255));
        }
    }

    #[test]
    fn test_marker_is_hollow() {
        let ring = marker_ring(6);
        assert_eq!(ring.dimensions(), (12, 12));
        assert_eq!(ring.get_pixel(6, 6).0[3], 0);
        assert!(ring.pixels().any(|p| p.0[3] > 128));
    }
}
