//! Rendering: fonts, glyph masks, text layout, scene compositing and transitions

pub mod compositor;
pub mod fonts;
pub mod glyph;
#[cfg(feature = "icons")]
pub mod icons;
pub mod layout;
pub mod transition;

use image::{Rgb, RgbImage};

pub use compositor::{AnimationPhase, Compositor};
pub use fonts::FontId;
pub use glyph::{GlyphCache, GlyphMask};

/// One fully rendered, opaque RGB raster ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// A black frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Rgb(rgb)),
        }
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel at `(x, y)`; panics when out of bounds like `image` does.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// Scale one color channel by a 0-255 brightness: `floor(c * b / 255)`.
///
/// Full brightness returns the channel untouched.
pub fn scale_channel(channel: u8, brightness: u8) -> u8 {
    if brightness == u8::MAX {
        return channel;
    }
    (channel as u32 * brightness as u32 / 255) as u8
}
