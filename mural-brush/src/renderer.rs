// Stroke renderer seam: one implementation per brush tag.

use mural_core::{Canvas, Point};
use rand::rngs::StdRng;

use crate::spec::BrushSpec;
use crate::tiles::TileCache;

/// Everything a renderer may touch during one `draw` call.
pub struct StrokeContext<'a> {
    pub canvas: &'a mut Canvas,
    pub spec: &'a BrushSpec,
    /// Points of the in-progress stroke so far, current point last.
    pub stroke: &'a [Point],
    pub rng: &'a mut StdRng,
    pub tiles: &'a mut TileCache,
}

impl StrokeContext<'_> {
    /// The last `n` stroke points, if the stroke is that long.
    pub fn recent(&self, n: usize) -> Option<&[Point]> {
        self.stroke
            .len()
            .checked_sub(n)
            .map(|start| &self.stroke[start..])
    }
}

pub trait StrokeRenderer: Send + Sync {
    /// Paint the segment `previous -> point`. `previous` is `None` on the
    /// first point of a stroke; renderers must still leave a mark.
    fn draw(&self, ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>);

    fn name(&self) -> &str;
}

pub type DrawFn = fn(&mut StrokeContext<'_>, Point, Option<Point>);

/// A stateless renderer backed by a plain function.
#[derive(Debug, Clone, Copy)]
pub struct BrushFn {
    name: &'static str,
    draw: DrawFn,
}

impl BrushFn {
    pub const fn new(name: &'static str, draw: DrawFn) -> Self {
        Self { name, draw }
    }
}

impl StrokeRenderer for BrushFn {
    fn draw(&self, ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
        (self.draw)(ctx, point, previous)
    }

    fn name(&self) -> &str {
        self.name
    }
}
