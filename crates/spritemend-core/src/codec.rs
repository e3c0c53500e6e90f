//! Image codec collaborator.
//!
//! Everything that touches encoded bytes or raw pixel geometry lives here:
//! decode/encode, crop, resize-with-padding, compositing, and the tolerant
//! pixelwise compare. The analysis and detection modules only ever see
//! [`RawPixelBuffer`]s produced by these functions.

use std::io::Cursor;

use image::{imageops, DynamicImage, ImageBuffer, ImageFormat, RgbaImage};

use crate::error::{Result, SpriteMendError};
use crate::frame::RawPixelBuffer;

/// A rectangle in image coordinates for cropping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Validate the crop rect against source dimensions.
    pub fn validated(&self, src_w: u32, src_h: u32) -> Result<CropRect> {
        if self.width == 0 || self.height == 0 {
            return Err(SpriteMendError::InvalidCrop(
                "Crop width and height must be > 0".into(),
            ));
        }
        if self.x + self.width > src_w || self.y + self.height > src_h {
            return Err(SpriteMendError::InvalidCrop(format!(
                "Crop region ({},{} {}x{}) exceeds source dimensions ({src_w}x{src_h})",
                self.x, self.y, self.width, self.height
            )));
        }
        Ok(*self)
    }
}

/// Decode an encoded frame (PNG or any format the `image` crate recognizes)
/// into an RGBA buffer. Failures are fatal to the pipeline.
pub fn decode(bytes: &[u8]) -> Result<RawPixelBuffer> {
    let img = image::load_from_memory(bytes)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(SpriteMendError::InvalidDimensions { width, height });
    }
    Ok(RawPixelBuffer::new(width, height, rgba.into_raw()))
}

/// Encode an RGBA buffer as PNG bytes.
pub fn encode(buf: &RawPixelBuffer) -> Result<Vec<u8>> {
    let img: RgbaImage = ImageBuffer::from_raw(buf.width, buf.height, buf.data.clone())
        .ok_or_else(|| SpriteMendError::InvalidDimensions {
            width: buf.width,
            height: buf.height,
        })?;
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Extract a rectangular region of the buffer.
pub fn crop(buf: &RawPixelBuffer, rect: &CropRect) -> Result<RawPixelBuffer> {
    let rect = rect.validated(buf.width, buf.height)?;
    let src_stride = (buf.width * 4) as usize;
    let row_bytes = (rect.width * 4) as usize;
    let mut data = Vec::with_capacity((rect.width * rect.height * 4) as usize);

    for row in 0..rect.height as usize {
        let src_row = rect.y as usize + row;
        let start = src_row * src_stride + (rect.x * 4) as usize;
        data.extend_from_slice(&buf.data[start..start + row_bytes]);
    }

    Ok(RawPixelBuffer::new(rect.width, rect.height, data))
}

/// Resize with padding (contain fit): scale the image to fit inside
/// `width` x `height` preserving aspect ratio, then center it on a
/// transparent canvas of exactly that size.
pub fn resize_pad(buf: &RawPixelBuffer, width: u32, height: u32) -> Result<RawPixelBuffer> {
    if width == 0 || height == 0 {
        return Err(SpriteMendError::InvalidDimensions { width, height });
    }
    if buf.width == width && buf.height == height {
        return Ok(buf.clone());
    }

    let scale = (width as f64 / buf.width as f64).min(height as f64 / buf.height as f64);
    let scaled = if (scale - 1.0).abs() < f64::EPSILON {
        buf.clone()
    } else {
        let new_w = ((buf.width as f64 * scale).round() as u32).max(1);
        let new_h = ((buf.height as f64 * scale).round() as u32).max(1);
        let img: RgbaImage = ImageBuffer::from_raw(buf.width, buf.height, buf.data.clone())
            .ok_or_else(|| SpriteMendError::InvalidDimensions {
                width: buf.width,
                height: buf.height,
            })?;
        let resized = imageops::resize(&img, new_w, new_h, imageops::FilterType::Triangle);
        RawPixelBuffer::new(new_w, new_h, resized.into_raw())
    };

    let left = (width - scaled.width) as i64 / 2;
    let top = (height - scaled.height) as i64 / 2;
    composite(
        width,
        height,
        &[CompositeLayer {
            input: &scaled,
            left,
            top,
        }],
    )
}

/// One layer to place on a composite canvas.
pub struct CompositeLayer<'a> {
    pub input: &'a RawPixelBuffer,
    pub left: i64,
    pub top: i64,
}

/// Composite layers onto a transparent canvas of the given size using
/// source-over blending. Layer regions outside the canvas are clipped.
///
/// Pixels placed over fully transparent canvas are copied verbatim, so a
/// single layer on a blank canvas reproduces its samples exactly.
pub fn composite(width: u32, height: u32, layers: &[CompositeLayer<'_>]) -> Result<RawPixelBuffer> {
    if width == 0 || height == 0 {
        return Err(SpriteMendError::InvalidDimensions { width, height });
    }
    let mut canvas = RawPixelBuffer::blank(width, height);

    for layer in layers {
        let src = layer.input;
        for sy in 0..src.height as i64 {
            let dy = layer.top + sy;
            if dy < 0 || dy >= height as i64 {
                continue;
            }
            for sx in 0..src.width as i64 {
                let dx = layer.left + sx;
                if dx < 0 || dx >= width as i64 {
                    continue;
                }
                let s = src.rgba(sx as u32, sy as u32);
                let di = ((dy as u32 * width + dx as u32) * 4) as usize;
                blend_over(&mut canvas.data[di..di + 4], s);
            }
        }
    }

    Ok(canvas)
}

/// Source-over blend of one RGBA pixel onto a destination slice.
fn blend_over(dst: &mut [u8], src: [u8; 4]) {
    let sa = src[3] as u32;
    if sa == 255 || dst[3] == 0 {
        dst.copy_from_slice(&src);
        return;
    }
    if sa == 0 {
        return;
    }
    let da = dst[3] as u32;
    let out_a = sa + da * (255 - sa) / 255;
    if out_a == 0 {
        dst.copy_from_slice(&[0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let sc = src[c] as u32;
        let dc = dst[c] as u32;
        dst[c] = ((sc * sa + dc * da * (255 - sa) / 255) / out_a) as u8;
    }
    dst[3] = out_a as u8;
}

/// Count pixels that differ between two same-sized buffers.
///
/// A pixel counts as different when any RGBA channel deviates by more than
/// `tolerance` (fraction of 255). Pixel pairs that are both fully transparent
/// are always equal, whatever their RGB samples.
pub fn pixel_diff(a: &RawPixelBuffer, b: &RawPixelBuffer, tolerance: f64) -> Result<u64> {
    if a.width != b.width || a.height != b.height {
        return Err(SpriteMendError::SizeMismatch {
            a_width: a.width,
            a_height: a.height,
            b_width: b.width,
            b_height: b.height,
        });
    }

    let tol = (tolerance * 255.0).round() as i16;
    let mut count = 0u64;
    for (pa, pb) in a.data.chunks_exact(4).zip(b.data.chunks_exact(4)) {
        if pa[3] == 0 && pb[3] == 0 {
            continue;
        }
        let differs = pa
            .iter()
            .zip(pb.iter())
            .any(|(&x, &y)| (x as i16 - y as i16).abs() > tol);
        if differs {
            count += 1;
        }
    }
    Ok(count)
}
