//! Brush engine: the active brush, the renderer registry and per-engine state.

use image::RgbaImage;
use mural_core::{Canvas, Point, Rgb};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

use crate::families::FALLBACK;
use crate::registry::BrushRegistry;
use crate::renderer::{StrokeContext, StrokeRenderer};
use crate::spec::{BrushSpec, BrushType};
use crate::tiles::TileCache;
use crate::BrushError;

#[derive(Debug)]
pub struct BrushEngine {
    spec: BrushSpec,
    registry: BrushRegistry,
    tiles: TileCache,
    rng: StdRng,
    /// Set when the last `configure_tag` named a tag we don't know.
    unrecognized: Option<String>,
}

impl BrushEngine {
    pub fn new() -> Self {
        Self::with_rng(BrushRegistry::with_defaults(), StdRng::from_entropy())
    }

    /// Engine with a fixed RNG seed, for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(BrushRegistry::with_defaults(), StdRng::seed_from_u64(seed))
    }

    pub fn with_registry(registry: BrushRegistry) -> Self {
        Self::with_rng(registry, StdRng::from_entropy())
    }

    fn with_rng(registry: BrushRegistry, rng: StdRng) -> Self {
        Self {
            spec: BrushSpec::default(),
            registry,
            tiles: TileCache::new(),
            rng,
            unrecognized: None,
        }
    }

    /// Store the active `BrushSpec`, size clamped. Performs no drawing.
    pub fn configure(&mut self, spec: BrushSpec) {
        let spec = spec.clamped();
        debug!(brush = %spec.brush, color = %spec.color, size = spec.size, "brush configured");
        self.spec = spec;
        self.unrecognized = None;
    }

    /// Configure from a raw UI tag. An unknown tag is logged and remembered;
    /// later `draw` calls then use the plain-line fallback with `color`/`size`.
    pub fn configure_tag(&mut self, tag: &str, color: Rgb, size: f32) -> Result<(), BrushError> {
        match tag.parse::<BrushType>() {
            Ok(brush) => {
                self.configure(BrushSpec::new(brush, color, size));
                Ok(())
            }
            Err(err) => {
                warn!(tag, "unknown brush tag; using plain line");
                self.spec = BrushSpec::new(self.spec.brush, color, size);
                self.unrecognized = Some(tag.to_string());
                Err(err)
            }
        }
    }

    pub fn spec(&self) -> &BrushSpec {
        &self.spec
    }

    pub fn tiles(&self) -> &TileCache {
        &self.tiles
    }

    pub fn registry(&self) -> &BrushRegistry {
        &self.registry
    }

    pub fn set_pattern_image(&mut self, image: RgbaImage) {
        debug!(width = image.width(), height = image.height(), "pattern image set");
        self.tiles.set_user_image(image);
    }

    /// Paint `previous -> point` with the active brush. `stroke` holds the
    /// in-progress stroke's points, `point` last. Never fails.
    pub fn draw(&mut self, canvas: &mut Canvas, point: Point, previous: Option<Point>, stroke: &[Point]) {
        let renderer: &dyn StrokeRenderer = match self.unrecognized {
            Some(_) => &FALLBACK,
            None => self.registry.get(self.spec.brush).unwrap_or(&FALLBACK),
        };
        trace!(renderer = renderer.name(), x = point.x, y = point.y, "draw");

        let mut ctx = StrokeContext {
            canvas,
            spec: &self.spec,
            stroke,
            rng: &mut self.rng,
            tiles: &mut self.tiles,
        };
        renderer.draw(&mut ctx, point, previous);
    }
}

impl Default for BrushEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::test_support::{blank, changed_pixels};

    fn stroke(engine: &mut BrushEngine, canvas: &mut Canvas, points: &[Point]) {
        for i in 0..points.len() {
            let previous = i.checked_sub(1).map(|j| points[j]);
            engine.draw(canvas, points[i], previous, &points[..=i]);
        }
    }

    #[test]
    fn test_configure_does_not_draw() {
        let mut engine = BrushEngine::with_seed(1);
        let mut canvas = blank();
        engine.configure(BrushSpec::new(BrushType::Neon, Rgb::new(255, 0, 0), 9.0));
        assert_eq!(engine.spec().brush, BrushType::Neon);
        assert_eq!(changed_pixels(&canvas), 0);

        stroke(&mut engine, &mut canvas, &[Point::new(10.0, 10.0)]);
        assert!(changed_pixels(&canvas) > 0);
    }

    #[test]
    fn test_pattern_tile_is_reused_across_segments() {
        let mut engine = BrushEngine::with_seed(2);
        let mut canvas = blank();
        engine.configure(BrushSpec::new(BrushType::StampCircle, Rgb::new(0, 128, 0), 6.0));

        let points = [Point::new(10.0, 10.0), Point::new(20.0, 20.0), Point::new(30.0, 20.0)];
        stroke(&mut engine, &mut canvas, &points);
        assert_eq!(engine.tiles().builds(), 1);
        assert_eq!(engine.tiles().hits(), 2);

        engine.configure(BrushSpec::new(BrushType::StampCircle, Rgb::new(0, 128, 0), 7.0));
        stroke(&mut engine, &mut canvas, &points[..1]);
        assert_eq!(engine.tiles().builds(), 2);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_plain_line() {
        let mut engine = BrushEngine::with_seed(3);
        let err = engine
            .configure_tag("crayon", Rgb::new(10, 20, 30), 4.0)
            .unwrap_err();
        assert_eq!(err, BrushError::UnknownBrush { tag: "crayon".into() });

        let mut canvas = blank();
        stroke(
            &mut engine,
            &mut canvas,
            &[Point::new(10.0, 32.0), Point::new(50.0, 32.0)],
        );
        assert_eq!(canvas.get_pixel(30, 32).unwrap(), Rgb::new(10, 20, 30).to_rgba(255));

        engine.configure_tag("marker", Rgb::BLACK, 4.0).unwrap();
        assert_eq!(engine.spec().brush, BrushType::Marker);
    }

    #[test]
    fn test_empty_registry_uses_fallback() {
        let mut engine = BrushEngine::with_registry(BrushRegistry::empty());
        engine.configure(BrushSpec::new(BrushType::Fire, Rgb::BLACK, 4.0));
        let mut canvas = blank();
        stroke(
            &mut engine,
            &mut canvas,
            &[Point::new(10.0, 32.0), Point::new(50.0, 32.0)],
        );
        assert_eq!(canvas.get_pixel(30, 32).unwrap(), Rgb::BLACK.to_rgba(255));
    }

    #[test]
    fn test_out_of_range_sizes_draw_without_panicking() {
        let mut engine = BrushEngine::with_seed(5);
        let points = [Point::new(10.0, 10.0), Point::new(30.0, 20.0), Point::new(50.0, 40.0)];

        for brush in [BrushType::Confetti, BrushType::PatternRainbow, BrushType::Thick] {
            engine.configure(BrushSpec {
                brush,
                color: Rgb::BLACK,
                size: f32::MAX,
            });
            assert_eq!(engine.spec().size, BrushSpec::MAX_SIZE);
            let mut canvas = blank();
            stroke(&mut engine, &mut canvas, &points);
            assert!(changed_pixels(&canvas) > 0, "{brush}");
        }

        let zero: BrushSpec =
            serde_json::from_str(r##"{"type":"stamp-star","color":"#123456","size":0}"##).unwrap();
        engine.configure(zero);
        assert_eq!(engine.spec().size, BrushSpec::MIN_SIZE);
        let mut canvas = blank();
        stroke(&mut engine, &mut canvas, &points);
        assert!(changed_pixels(&canvas) > 0);
    }

    #[test]
    fn test_pattern_image_replaces_tile() {
        let mut engine = BrushEngine::with_seed(4);
        engine.configure(BrushSpec::new(BrushType::PatternImage, Rgb::BLACK, 4.0));
        let mut canvas = blank();
        let points = [Point::new(10.0, 10.0), Point::new(40.0, 40.0)];

        stroke(&mut engine, &mut canvas, &points);
        assert_eq!(engine.tiles().builds(), 0);

        engine.set_pattern_image(RgbaImage::from_pixel(8, 8, Rgb::new(200, 0, 0).to_rgba(255)));
        stroke(&mut engine, &mut canvas, &points);
        assert_eq!(engine.tiles().builds(), 1);
        assert_eq!(canvas.get_pixel(25, 25).unwrap(), Rgb::new(200, 0, 0).to_rgba(255));
    }
}
