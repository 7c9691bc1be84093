// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pixel decoding port.
//!
//! Depth and stencil images arrive in a container format (typically PNG).
//! Decoding that container is the embedder's concern; the session only needs
//! the resulting pixel grid.

use vantage_geom::Dimensions;
use vantage_scene::{ImageAttributes, PixelImage};

use crate::ClientError;

/// Decodes container bytes into pixel grids.
pub trait PixelDecoder: Send + Sync {
    /// 16-bit depth image.
    fn decode_depth(&self, bytes: &[u8], size: (usize, usize))
        -> Result<PixelImage<u16>, ClientError>;

    /// 8-bit stencil image.
    fn decode_stencil(&self, bytes: &[u8], size: (usize, usize))
        -> Result<PixelImage<u8>, ClientError>;
}

/// Decodes already-raw pixels: little-endian `u16` depth, one byte per
/// stencil pixel, row-major.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPixelDecoder;

impl PixelDecoder for RawPixelDecoder {
    fn decode_depth(
        &self,
        bytes: &[u8],
        (width, height): (usize, usize),
    ) -> Result<PixelImage<u16>, ClientError> {
        if bytes.len() % 2 != 0 {
            return Err(ClientError::Pixels(format!(
                "depth payload has odd length {}",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        Ok(PixelImage::new(width, height, pixels)?)
    }

    fn decode_stencil(
        &self,
        bytes: &[u8],
        (width, height): (usize, usize),
    ) -> Result<PixelImage<u8>, ClientError> {
        Ok(PixelImage::new(width, height, bytes.to_vec())?)
    }
}

/// Largest image, in pixels, a frame may declare.
pub const MAX_IMAGE_PIXELS: f64 = 268_435_456.0;

/// Integer pixel size of the image described by `attributes`.
///
/// # Errors
/// [`ClientError::Pixels`] when the declared size is not finite, negative,
/// or larger than [`MAX_IMAGE_PIXELS`].
pub fn image_size(attributes: &ImageAttributes) -> Result<(usize, usize), ClientError> {
    let Dimensions { width, height } = attributes.image_dimensions();
    if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
        return Err(ClientError::Pixels(format!(
            "invalid image size {width}x{height}"
        )));
    }
    if width * height > MAX_IMAGE_PIXELS {
        return Err(ClientError::Pixels(format!(
            "image size {width}x{height} exceeds {MAX_IMAGE_PIXELS} pixels"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let size = (width as usize, height as usize);
    Ok(size)
}

/// Raw little-endian encoding of depth pixels, the inverse of
/// [`RawPixelDecoder::decode_depth`].
pub fn encode_raw_depth(pixels: &[u16]) -> Vec<u8> {
    pixels.iter().flat_map(|p| p.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_geom::Rectangle;
    use vantage_scene::SceneError;

    #[test]
    fn depth_is_little_endian() {
        let image = RawPixelDecoder.decode_depth(&[0x34, 0x12, 0xff, 0xff], (2, 1)).unwrap();
        assert_eq!(image.pixels(), &[0x1234, 0xffff]);
    }

    #[test]
    fn size_mismatch_reports_buffer_size() {
        let err = RawPixelDecoder.decode_stencil(&[0; 5], (2, 2)).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Scene(SceneError::BufferSize {
                expected: 4,
                actual: 5
            })
        ));
    }

    #[test]
    fn absurd_image_sizes_are_rejected() {
        let frame = Dimensions::new(4.0, 4.0);
        let mut attributes = ImageAttributes::full_frame(frame);
        assert_eq!(image_size(&attributes).unwrap(), (4, 4));

        attributes.image_rect = Rectangle::new(0.0, 0.0, 1e12, 1e12);
        assert!(matches!(image_size(&attributes), Err(ClientError::Pixels(_))));

        attributes.image_rect = Rectangle::new(0.0, 0.0, f64::INFINITY, 2.0);
        assert!(image_size(&attributes).is_err());

        attributes.image_rect = Rectangle::new(0.0, 0.0, 4.0, 4.0);
        attributes.image_scale = f64::NAN;
        assert!(image_size(&attributes).is_err());
    }
}
