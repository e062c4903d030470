// Eraser: a continuous line composited destination-out.

use mural_core::{CompositeOp, Paint, Point, Rgb, StrokeStyle};

use super::segment;
use crate::renderer::StrokeContext;

pub fn eraser(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let paint = Paint::solid(Rgb::BLACK).with_op(CompositeOp::DestinationOut);
    ctx.canvas
        .stroke_line(from, to, &StrokeStyle::new(ctx.spec.size, paint));
}
