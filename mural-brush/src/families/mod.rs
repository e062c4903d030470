// Stroke algorithms, one module per family.

use mural_core::Point;

use crate::registry::BrushRegistry;
use crate::renderer::BrushFn;
use crate::spec::BrushType;

pub mod eraser;
pub mod line;
pub mod particle;
pub mod pattern;
pub mod shape;

/// Renderer used when a tag is unknown or has nothing registered.
pub const FALLBACK: BrushFn = BrushFn::new("plain-line", line::plain_line);

/// The segment to paint; a first point becomes a zero-length segment.
pub(crate) fn segment(point: Point, previous: Option<Point>) -> (Point, Point) {
    (previous.unwrap_or(point), point)
}

pub(crate) fn register_defaults(registry: &mut BrushRegistry) {
    use BrushType::*;

    let table: [(BrushType, crate::renderer::DrawFn); 33] = [
        (Pencil, line::pencil),
        (Smooth, line::smooth),
        (Marker, line::marker),
        (Neon, line::neon),
        (Oil, line::oil),
        (Thick, line::thick),
        (Sliced, line::sliced),
        (Charcoal, line::charcoal),
        (Chalk, line::chalk),
        (Watercolor, line::watercolor),
        (Glow, line::glow),
        (Shadow, line::shadow),
        (Spray, particle::spray),
        (Aerosol, particle::aerosol),
        (Dots, particle::dots),
        (Confetti, particle::confetti),
        (Bubble, particle::bubble),
        (Fire, particle::fire),
        (Particles, particle::particles),
        (HeartSpray, particle::heart_spray),
        (Lightning, shape::lightning),
        (Glitch, shape::glitch),
        (Ribbon, shape::ribbon),
        (Wiggle, shape::wiggle),
        (Beads, shape::beads),
        (Fur, shape::fur),
        (Sketchy, shape::sketchy),
        (StampCircle, pattern::stamp_circle),
        (StampStar, pattern::stamp_star),
        (PatternLines, pattern::pattern_lines),
        (PatternRainbow, pattern::pattern_rainbow),
        (PatternImage, pattern::pattern_image),
        (Eraser, eraser::eraser),
    ];

    for (brush, draw) in table {
        registry.register(brush, Box::new(BrushFn::new(brush.as_str(), draw)));
    }
}
