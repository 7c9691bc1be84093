// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Delivered image geometry and decoded pixel grids.

use std::sync::Arc;

use vantage_geom::{Dimensions, DVec2, Rectangle};

use crate::SceneError;

/// Placement of a delivered image within its frame.
///
/// The renderer may send only a sub-rectangle of the frame (`image_rect`, in
/// frame pixels) and may pre-scale it: one frame pixel maps to `image_scale`
/// image pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageAttributes {
    /// Full frame size in frame pixels.
    pub frame_dimensions: Dimensions,
    /// Region of the frame covered by the image, in frame pixels.
    pub image_rect: Rectangle,
    /// Image pixels per frame pixel.
    pub image_scale: f64,
}

impl ImageAttributes {
    /// Image covering the whole frame at scale 1.
    #[must_use]
    pub fn full_frame(frame_dimensions: Dimensions) -> Self {
        Self {
            frame_dimensions,
            image_rect: Rectangle::from_dimensions(frame_dimensions),
            image_scale: 1.0,
        }
    }

    /// Expected decoded image size.
    #[must_use]
    pub fn image_dimensions(&self) -> Dimensions {
        Dimensions::new(
            (self.image_rect.width * self.image_scale).round(),
            (self.image_rect.height * self.image_scale).round(),
        )
    }

    /// Frame point → continuous image pixel coordinates.
    #[must_use]
    pub fn frame_point_to_image(&self, pt: DVec2) -> DVec2 {
        (pt - self.image_rect.top_left()) * self.image_scale
    }

    /// Frame aspect ratio.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.frame_dimensions.aspect_ratio()
    }
}

/// Row-major pixel grid decoded from an image container.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelImage<T> {
    width: usize,
    height: usize,
    pixels: Arc<[T]>,
}

fn pixel_count(width: usize, height: usize) -> Result<usize, SceneError> {
    width.checked_mul(height).ok_or_else(|| {
        SceneError::InvalidArgument(format!("image size {width}x{height} overflows"))
    })
}

impl<T: Copy> PixelImage<T> {
    /// Wraps decoded pixels, checking `pixels.len() == width * height`.
    ///
    /// # Errors
    /// [`SceneError::BufferSize`] on a length mismatch,
    /// [`SceneError::InvalidArgument`] when `width * height` overflows.
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Result<Self, SceneError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(SceneError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// Grid filled with one value.
    ///
    /// # Errors
    /// [`SceneError::InvalidArgument`] when `width * height` overflows.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, SceneError> {
        Ok(Self {
            width,
            height,
            pixels: vec![value; pixel_count(width, height)?].into(),
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw row-major pixels.
    #[must_use]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    /// Pixel at integer coordinates.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            self.pixels.get(y * self.width + x).copied()
        } else {
            None
        }
    }

    /// Pixel under a frame-space point, `None` outside the image.
    #[must_use]
    pub fn sample(&self, attributes: &ImageAttributes, frame_pt: DVec2) -> Option<T> {
        let p = attributes.frame_point_to_image(frame_pt).floor();
        if !p.is_finite() || p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (x, y) = (p.x as usize, p.y as usize);
        self.get(x, y)
    }
}
