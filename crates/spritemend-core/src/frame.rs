use ndarray::Array2;

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};

/// A single decoded frame: flat RGBA samples, row-major.
///
/// This is the working form of a frame inside the pipeline. Encoded frames
/// (PNG bytes) are opaque to everything except the codec module.
#[derive(Clone, Debug, PartialEq)]
pub struct RawPixelBuffer {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel. Always 4 for buffers produced by the codec.
    pub channels: u8,
    /// RGBA samples, `width * height * channels` bytes.
    pub data: Vec<u8>,
}

impl RawPixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            channels: 4,
            data,
        }
    }

    /// A fully transparent buffer of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, vec![0u8; (width * height * 4) as usize])
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// RGBA samples of the pixel at (x, y).
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.data[((y * self.width + x) * 4 + 3) as usize]
    }

    /// BT.601 luminance plane in [0, 255], shape = (height, width).
    pub fn luminance(&self) -> Array2<f32> {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut plane = Array2::zeros((h, w));
        for row in 0..h {
            for col in 0..w {
                let i = (row * w + col) * 4;
                plane[[row, col]] = LUMINANCE_R * self.data[i] as f32
                    + LUMINANCE_G * self.data[i + 1] as f32
                    + LUMINANCE_B * self.data[i + 2] as f32;
            }
        }
        plane
    }
}
