#![allow(dead_code)]

use spritemend_core::analyze::{BucketConfig, BucketPredicate, BucketRule};
use spritemend_core::codec;
use spritemend_core::frame::RawPixelBuffer;

pub const RED: [u8; 4] = [220, 30, 30, 255];
pub const GREEN: [u8; 4] = [30, 220, 30, 255];

/// Fill a rectangle of the buffer with one RGBA value.
pub fn fill_rect(buf: &mut RawPixelBuffer, x: u32, y: u32, w: u32, h: u32, rgba: [u8; 4]) {
    for yy in y..y + h {
        for xx in x..x + w {
            let i = ((yy * buf.width + xx) * 4) as usize;
            buf.data[i..i + 4].copy_from_slice(&rgba);
        }
    }
}

/// A transparent canvas with one solid block of the given color.
pub fn sprite_frame(
    width: u32,
    height: u32,
    block: (u32, u32, u32, u32),
    rgba: [u8; 4],
) -> RawPixelBuffer {
    let mut buf = RawPixelBuffer::blank(width, height);
    fill_rect(&mut buf, block.0, block.1, block.2, block.3, rgba);
    buf
}

/// A frame whose first `run_len` pixels (raster order) are the given color.
/// Adjacent frames built this way differ in exactly |run_a - run_b| pixels.
pub fn run_frame(width: u32, height: u32, run_len: usize, rgba: [u8; 4]) -> RawPixelBuffer {
    let mut buf = RawPixelBuffer::blank(width, height);
    for i in 0..run_len.min((width * height) as usize) {
        buf.data[i * 4..i * 4 + 4].copy_from_slice(&rgba);
    }
    buf
}

/// A frame of uniform gray luminance, fully opaque.
pub fn uniform_frame(width: u32, height: u32, gray: u8) -> RawPixelBuffer {
    let mut buf = RawPixelBuffer::blank(width, height);
    fill_rect(&mut buf, 0, 0, width, height, [gray, gray, gray, 255]);
    buf
}

/// Encode decoded buffers back to PNG bytes for pipeline-level tests.
pub fn encode_frames(frames: &[RawPixelBuffer]) -> Vec<Vec<u8>> {
    frames
        .iter()
        .map(|f| codec::encode(f).expect("encode test frame"))
        .collect()
}

/// Bucket calibration matching the test sprite's red body.
pub fn red_buckets(primary: bool) -> BucketConfig {
    BucketConfig {
        rules: vec![BucketRule {
            label: "body".into(),
            predicate: BucketPredicate::RgbRange {
                r: [180, 255],
                g: [0, 80],
                b: [0, 80],
            },
        }],
        primary: primary.then(|| "body".into()),
    }
}
