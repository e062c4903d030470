//! Brush tag to renderer mapping.

use std::collections::HashMap;

use tracing::debug;

use crate::families;
use crate::renderer::StrokeRenderer;
use crate::spec::BrushType;

pub struct BrushRegistry {
    renderers: HashMap<BrushType, Box<dyn StrokeRenderer>>,
}

impl BrushRegistry {
    /// A registry with nothing registered; every brush renders the fallback line.
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// A registry with the built-in renderer for every brush type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        families::register_defaults(&mut registry);
        registry
    }

    /// Install `renderer` for `brush`, replacing any previous one.
    pub fn register(&mut self, brush: BrushType, renderer: Box<dyn StrokeRenderer>) {
        if let Some(old) = self.renderers.insert(brush, renderer) {
            debug!(brush = %brush, replaced = old.name(), "renderer replaced");
        }
    }

    pub fn get(&self, brush: BrushType) -> Option<&dyn StrokeRenderer> {
        self.renderers.get(&brush).map(|r| r.as_ref())
    }

    pub fn contains(&self, brush: BrushType) -> bool {
        self.renderers.contains_key(&brush)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl Default for BrushRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for BrushRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut brushes: Vec<_> = self.renderers.keys().map(|b| b.as_str()).collect();
        brushes.sort_unstable();
        f.debug_struct("BrushRegistry")
            .field("brushes", &brushes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{BrushFn, StrokeContext};
    use mural_core::Point;

    fn noop(_: &mut StrokeContext<'_>, _: Point, _: Option<Point>) {}

    #[test]
    fn test_defaults_cover_every_brush() {
        let registry = BrushRegistry::with_defaults();
        assert_eq!(registry.len(), BrushType::ALL.len());
        for brush in BrushType::ALL {
            let renderer = registry.get(brush).unwrap();
            assert_eq!(renderer.name(), brush.as_str());
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = BrushRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.get(BrushType::Neon).is_none());

        registry.register(BrushType::Neon, Box::new(BrushFn::new("custom", noop)));
        assert!(registry.contains(BrushType::Neon));
        assert_eq!(registry.get(BrushType::Neon).unwrap().name(), "custom");
        assert_eq!(registry.len(), 1);
    }
}
