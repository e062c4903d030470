//! Pattern tile cache.
//!
//! Pattern brushes build a small tile once and reuse it while the brush's
//! color and size stay the same. Each brush type owns at most one slot; a
//! lookup with a different key rebuilds that slot in place.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use mural_core::Rgb;
use tracing::{debug, trace};

use crate::spec::BrushType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub brush: BrushType,
    pub color: Rgb,
    size_bits: u32,
}

impl TileKey {
    pub fn new(brush: BrushType, color: Rgb, size: f32) -> Self {
        Self {
            brush,
            color,
            size_bits: size.to_bits(),
        }
    }

    pub fn size(&self) -> f32 {
        f32::from_bits(self.size_bits)
    }
}

#[derive(Debug, Default)]
pub struct TileCache {
    slots: HashMap<BrushType, (TileKey, Arc<RgbaImage>)>,
    user_image: Option<Arc<RgbaImage>>,
    hits: u64,
    builds: u64,
}

impl TileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached tile for `key`, building it with `build` on a miss.
    /// `build` receives the user-supplied image, if any, and may decline by
    /// returning `None`.
    pub fn get_or_build<F>(&mut self, key: TileKey, build: F) -> Option<Arc<RgbaImage>>
    where
        F: FnOnce(&TileKey, Option<&RgbaImage>) -> Option<RgbaImage>,
    {
        if let Some((cached_key, tile)) = self.slots.get(&key.brush) {
            if *cached_key == key {
                self.hits += 1;
                trace!(brush = %key.brush, hits = self.hits, "tile cache hit");
                return Some(Arc::clone(tile));
            }
        }

        let tile = Arc::new(build(&key, self.user_image.as_deref())?);
        self.builds += 1;
        debug!(
            brush = %key.brush,
            color = %key.color,
            size = key.size(),
            width = tile.width(),
            height = tile.height(),
            "built pattern tile"
        );
        self.slots.insert(key.brush, (key, Arc::clone(&tile)));
        Some(tile)
    }

    pub fn invalidate(&mut self, brush: BrushType) {
        if self.slots.remove(&brush).is_some() {
            debug!(brush = %brush, "invalidated pattern tile");
        }
    }

    pub fn invalidate_all(&mut self) {
        self.slots.clear();
    }

    /// Replace the image used by the pattern-image brush.
    pub fn set_user_image(&mut self, image: RgbaImage) {
        self.user_image = Some(Arc::new(image));
        self.invalidate(BrushType::PatternImage);
    }

    pub fn user_image(&self) -> Option<&RgbaImage> {
        self.user_image.as_deref()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
