use image::{Rgb, RgbImage};

use crate::relight::scene::LinearImage;

/// Exponent of the display encoding, `v^(1/DISPLAY_GAMMA)`.
pub const DISPLAY_GAMMA: f32 = 2.2;

/// A 3x3 colour matrix applied to column vectors: `out[i] = sum_j m[i][j] * rgb[j]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub [[f32; 3]; 3]);

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix =
        ColorMatrix([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Camera RGB to linear sRGB, shared by every scene.
    pub const CAM_TO_SRGB: ColorMatrix = ColorMatrix([
        [1.267_493_1, 0.538_554_44, -0.806_047_56],
        [-0.310_501_8, 1.721_217, -0.410_715_25],
        [-0.083_569_82, -0.611_945_83, 1.695_515_7],
    ]);

    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let m = &self.0;
        [
            m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
            m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
            m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
        ]
    }
}

/// Clamp to [0, 1], gamma encode and quantise to 8 bits with rounding.
///
/// NaN maps to 0.
pub fn encode_gamma(v: f32) -> u8 {
    let v = v.max(0.0).min(1.0);
    (255.0 * v.powf(1.0 / DISPLAY_GAMMA)).round() as u8
}

/// Gamma encode a linear image as-is (camera space).
pub fn encode_linear(image: &LinearImage) -> RgbImage {
    encode_with(image, |rgb| rgb)
}

/// Transform into display space, then gamma encode.
pub fn encode_display(image: &LinearImage, cam_to_display: &ColorMatrix) -> RgbImage {
    encode_with(image, |rgb| cam_to_display.apply(rgb))
}

fn encode_with(image: &LinearImage, transform: impl Fn([f32; 3]) -> [f32; 3]) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let out = transform(image.pixel(x, y));
        Rgb([encode_gamma(out[0]), encode_gamma(out[1]), encode_gamma(out[2])])
    })
}
