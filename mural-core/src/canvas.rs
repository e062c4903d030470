// The raster surface every brush paints on and every snapshot restores into.

use image::{Rgba, RgbaImage};
use tracing::{debug, info, trace, warn};

use crate::raster::{composite_pixel, CompositeOp};

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        info!(
            "Creating new canvas of size {}x{} with background color {:?}",
            width, height, background
        );

        let image = RgbaImage::from_pixel(width, height, background);
        trace!("Canvas created");

        Self { image }
    }

    /// A fully transparent canvas.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::new(width, height, Rgba([0, 0, 0, 0]))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        debug!(
            "Wrapping existing {}x{} image as canvas",
            image.width(),
            image.height()
        );
        Self { image }
    }

    // Check if coordinates are within canvas bounds
    fn is_valid_coordinate(&self, x: u32, y: u32) -> bool {
        x < self.image.width() && y < self.image.height()
    }

    // Get the color of a pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if !self.is_valid_coordinate(x, y) {
            warn!(
                "Requested pixel color at invalid coordinates ({}, {})",
                x, y
            );
            return None;
        }

        Some(*self.image.get_pixel(x, y))
    }

    // Set the color of a pixel at (x, y), replacing whatever was there
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) -> bool {
        if !self.is_valid_coordinate(x, y) {
            warn!(
                "Attempted to set pixel color at invalid coordinates ({}, {})",
                x, y
            );
            return false;
        }

        trace!("Setting pixel color at ({}, {}) to {:?}", x, y, color);
        self.image.put_pixel(x, y, color);
        true
    }

    /// Composite `color` (straight alpha) over the pixel at signed coordinates,
    /// scaled by `coverage`. Out-of-bounds writes are silently clipped.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: [u8; 4], coverage: f32, op: CompositeOp) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if !self.is_valid_coordinate(x, y) {
            return;
        }
        composite_pixel(self.image.get_pixel_mut(x, y), color, coverage, op);
    }

    // Fill entire canvas with a color
    pub fn fill(&mut self, color: Rgba<u8>) {
        info!("Filling canvas {:?}", color);
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
        trace!("Canvas fill complete");
    }

    // Clear canvas to fully transparent pixels
    pub fn clear(&mut self) {
        info!("Clearing canvas");
        self.fill(Rgba([0, 0, 0, 0]));
    }

    /// Overwrite the canvas with `source`, anchored at the origin.
    /// A source of a different size is clipped, and uncovered pixels become transparent.
    pub fn replace_with(&mut self, source: &RgbaImage) {
        if source.dimensions() == self.image.dimensions() {
            self.image.copy_from_slice(source.as_raw());
            return;
        }

        warn!(
            "Restoring {}x{} image into {}x{} canvas; clipping",
            source.width(),
            source.height(),
            self.image.width(),
            self.image.height()
        );
        self.clear();
        let w = source.width().min(self.image.width());
        let h = source.height().min(self.image.height());
        for y in 0..h {
            for x in 0..w {
                self.image.put_pixel(x, y, *source.get_pixel(x, y));
            }
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    // Get canvas dimensions
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

// Create a default canvas
impl Default for Canvas {
    fn default() -> Self {
        Canvas::new(512, 512, Rgba([255, 255, 255, 255]))
    }
}
