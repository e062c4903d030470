//! Procedural-shape family.
//!
//! These brushes derive a geometric construction from the segment (zig-zags,
//! arcs, waves) or, for `fur` and `sketchy`, from every earlier point of the
//! stroke that lies within a distance threshold of the current one.

use std::f32::consts::PI;

use mural_core::geometry::random_range;
use mural_core::{CompositeOp, Paint, Point, Rgb, StrokeStyle};
use rand::Rng;

use super::segment;
use crate::renderer::StrokeContext;

/// Midpoint-displacement polyline between `from` and `to`.
fn zigzag<R: Rng + ?Sized>(rng: &mut R, from: Point, to: Point, displacement: f32, depth: u32) -> Vec<Point> {
    let mut points = vec![from, to];
    let mut spread = displacement;

    for _ in 0..depth {
        let mut next = Vec::with_capacity(points.len() * 2);
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (nx, ny) = a.normal_to(b);
            let off = random_range(rng, -spread, spread);
            next.push(a);
            next.push(a.midpoint(b).offset(nx * off, ny * off));
        }
        next.push(to);
        points = next;
        spread /= 2.0;
    }
    points
}

pub fn lightning(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;
    let bolt = zigzag(ctx.rng, from, to, (from.distance(to) * 0.3).max(size), 3);

    let halo = StrokeStyle::new(
        (size * 0.5).max(1.0),
        Paint::solid(ctx.spec.color).with_op(CompositeOp::Lighter),
    )
    .with_shadow(size * 2.0, ctx.spec.color);
    ctx.canvas.stroke_polyline(&bolt, &halo);

    let core = StrokeStyle::new((size * 0.2).max(1.0), Paint::solid(ctx.spec.color.shade(80.0)));
    ctx.canvas.stroke_polyline(&bolt, &core);
}

/// A plain line torn by horizontal slices of shifted color channels.
pub fn glitch(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;
    ctx.canvas
        .stroke_line(from, to, &StrokeStyle::new(size, Paint::solid(ctx.spec.color)));

    for _ in 0..ctx.rng.gen_range(1..=3) {
        let origin = point.offset(
            random_range(ctx.rng, -size * 2.0, size * 2.0),
            random_range(ctx.rng, -size, size),
        );
        let w = random_range(ctx.rng, size, size * 3.0);
        let h = random_range(ctx.rng, 1.0, (size * 0.4).max(1.5));
        let paint = match ctx.rng.gen_range(0..3) {
            0 => Paint::solid(Rgb::new(255, 0, 60))
                .with_alpha(0.6)
                .with_op(CompositeOp::Screen),
            1 => Paint::solid(Rgb::new(0, 255, 255))
                .with_alpha(0.6)
                .with_op(CompositeOp::Screen),
            _ => Paint::solid(Rgb::BLACK).with_op(CompositeOp::DestinationOut),
        };
        ctx.canvas.fill_rect(origin, w, h, &paint);
    }
}

/// Half-circle arc spanning the segment, radius half the inter-point distance.
pub fn ribbon(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;
    let radius = from.distance(to) / 2.0;

    if radius < 0.5 {
        ctx.canvas
            .fill_circle(point, (size * 0.3).max(0.5), &Paint::solid(ctx.spec.color));
        return;
    }

    let center = from.midpoint(to);
    let start = center.angle_to(from);
    let arc = StrokeStyle::new((size * 0.3).max(1.0), Paint::solid(ctx.spec.color));
    ctx.canvas.stroke_arc(center, radius, start, start + PI, &arc);

    let band = StrokeStyle::new(size, Paint::solid(ctx.spec.color).with_alpha(0.3));
    ctx.canvas.stroke_line(from, to, &band);
}

/// Sine wave around the segment; the phase advances with stroke length.
pub fn wiggle(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;
    let (nx, ny) = from.normal_to(to);
    let phase = ctx.stroke.len() as f32 * 0.6;

    let wave: Vec<Point> = (0..=8)
        .map(|i| {
            let t = i as f32 / 8.0;
            let off = (phase + t * 0.6).sin() * size * 0.5;
            from.lerp(to, t).offset(nx * off, ny * off)
        })
        .collect();
    let style = StrokeStyle::new((size * 0.4).max(1.0), Paint::solid(ctx.spec.color));
    ctx.canvas.stroke_polyline(&wave, &style);
}

pub fn beads(ctx: &mut StrokeContext<'_>, point: Point, _previous: Option<Point>) {
    let size = ctx.spec.size;
    let r = (size / 2.0).max(1.0);
    let color = ctx.spec.color;

    ctx.canvas
        .fill_circle(point, r, &Paint::solid(color).with_alpha(0.9));
    ctx.canvas
        .stroke_circle(point, r, 1.0, &Paint::solid(color.shade(-30.0)));
    ctx.canvas.fill_circle(
        point.offset(-r * 0.35, -r * 0.35),
        r / 3.0,
        &Paint::solid(color.shade(60.0)).with_alpha(0.8),
    );
}

// Both neighbor brushes scan the whole stroke on every move; work grows with
// stroke length.
// TODO: bucket stroke points in a uniform grid so the scan only visits nearby cells.
fn neighbor_threshold(size: f32, factor: f32) -> f32 {
    (size * factor).powi(2).max(400.0)
}

/// Short hairs toward every nearby earlier point of the stroke.
pub fn fur(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let thin = StrokeStyle::new(1.0, Paint::solid(ctx.spec.color).with_alpha(0.5));
    ctx.canvas.stroke_line(from, to, &thin);

    let threshold = neighbor_threshold(ctx.spec.size, 8.0);
    let hair = StrokeStyle::new(1.0, Paint::solid(ctx.spec.color).with_alpha(0.1));
    let earlier = ctx.stroke.len().saturating_sub(1);

    for i in 0..earlier {
        let other = ctx.stroke[i];
        let d2 = point.distance_squared(other);
        if d2 < threshold && ctx.rng.gen::<f32>() > d2 / threshold {
            let dx = (other.x - point.x) * 0.5;
            let dy = (other.y - point.y) * 0.5;
            ctx.canvas
                .stroke_line(point.offset(dx, dy), point.offset(-dx, -dy), &hair);
        }
    }
}

/// Loose construction lines joining the pointer to nearby stroke points.
pub fn sketchy(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let line = StrokeStyle::new(1.0, Paint::solid(ctx.spec.color).with_alpha(0.6));
    ctx.canvas.stroke_line(from, to, &line);

    let threshold = neighbor_threshold(ctx.spec.size, 6.0);
    let earlier = ctx.stroke.len().saturating_sub(1);

    for i in 0..earlier {
        let other = ctx.stroke[i];
        let d2 = point.distance_squared(other);
        if d2 < threshold && ctx.rng.gen::<f32>() > d2 / threshold {
            let dx = (other.x - point.x) * 0.3;
            let dy = (other.y - point.y) * 0.3;
            let alpha = ctx.rng.gen_range(0.05..=0.2);
            let style = StrokeStyle::new(1.0, Paint::solid(ctx.spec.color).with_alpha(alpha));
            ctx.canvas
                .stroke_line(point.offset(dx, dy), other.offset(-dx, -dy), &style);
        }
    }
}
