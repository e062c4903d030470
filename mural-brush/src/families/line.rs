//! Continuous-line family.
//!
//! Each call strokes one or more short segments between the previous and
//! current pointer positions. Multi-pass brushes jitter every pass
//! independently to build texture.

use mural_core::geometry::{jitter, random_in_disc, random_range};
use mural_core::{CompositeOp, Paint, Point, Rgb, StrokeStyle};
use rand::Rng;

use super::segment;
use crate::renderer::StrokeContext;

pub fn plain_line(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let style = StrokeStyle::new(ctx.spec.size, Paint::solid(ctx.spec.color));
    ctx.canvas.stroke_line(from, to, &style);
}

pub fn pencil(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let width = (ctx.spec.size * 0.75).max(1.0);
    let alpha = ctx.rng.gen_range(0.8..=1.0);
    let style = StrokeStyle::new(width, Paint::solid(ctx.spec.color).with_alpha(alpha));
    ctx.canvas.stroke_line(from, to, &style);
}

/// Quadratic curve from the previous midpoint to the current one, with the
/// previous raw point as control, so consecutive calls join without corners.
pub fn smooth(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let style = StrokeStyle::new(ctx.spec.size, Paint::solid(ctx.spec.color));
    match ctx.recent(3).map(|r| (r[0], r[1], r[2])) {
        Some((a, b, c)) => {
            ctx.canvas
                .stroke_quadratic(a.midpoint(b), b, b.midpoint(c), &style);
        }
        None => {
            let (from, to) = segment(point, previous);
            ctx.canvas.stroke_line(from, to, &style);
        }
    }
}

pub fn marker(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let paint = Paint::solid(ctx.spec.color)
        .with_alpha(0.5)
        .with_op(CompositeOp::Multiply);
    ctx.canvas
        .stroke_line(from, to, &StrokeStyle::new(ctx.spec.size * 1.5, paint));
}

pub fn neon(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;
    let color = ctx.spec.color;

    let halo = StrokeStyle::new(size, Paint::solid(color).with_op(CompositeOp::Lighter))
        .with_shadow(size * 1.5, color);
    ctx.canvas.stroke_line(from, to, &halo);

    let core = StrokeStyle::new((size * 0.35).max(1.0), Paint::solid(color.shade(70.0)));
    ctx.canvas.stroke_line(from, to, &core);
}

pub fn oil(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;

    for _ in 0..3 {
        let a = jitter(ctx.rng, from, size * 0.25);
        let b = jitter(ctx.rng, to, size * 0.25);
        let width = size * ctx.rng.gen_range(0.5..=1.0);
        let color = ctx.spec.color.shade(ctx.rng.gen_range(-15.0..=15.0));
        let alpha = ctx.rng.gen_range(0.6..=0.95);
        let style = StrokeStyle::new(width, Paint::solid(color).with_alpha(alpha));
        ctx.canvas.stroke_line(a, b, &style);
    }
}

/// Parallel strands offset along the segment normal.
pub fn thick(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;
    let (mut nx, mut ny) = from.normal_to(to);
    if nx == 0.0 && ny == 0.0 {
        ny = 1.0;
    }
    let style = StrokeStyle::new(size * 0.6, Paint::solid(ctx.spec.color).with_alpha(0.85));

    for i in -2..=2 {
        let d = i as f32 * size * 0.3;
        ctx.canvas
            .stroke_line(from.offset(nx * d, ny * d), to.offset(nx * d, ny * d), &style);
    }
}

/// Calligraphic nib: thin strands along a fixed diagonal.
pub fn sliced(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;
    let style = StrokeStyle::new((size * 0.15).max(1.0), Paint::solid(ctx.spec.color));

    for i in 0..5 {
        let d = (i as f32 - 2.0) * size / 4.0;
        ctx.canvas
            .stroke_line(from.offset(d, -d), to.offset(d, -d), &style);
    }
}

pub fn charcoal(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;

    for _ in 0..4 {
        let a = jitter(ctx.rng, from, size * 0.3);
        let b = jitter(ctx.rng, to, size * 0.3);
        let width = random_range(ctx.rng, 1.0, (size * 0.4).max(1.5));
        let alpha = ctx.rng.gen_range(0.1..=0.4);
        let style = StrokeStyle::new(width, Paint::solid(ctx.spec.color).with_alpha(alpha));
        ctx.canvas.stroke_line(a, b, &style);
    }

    let grain = Paint::solid(ctx.spec.color).with_alpha(0.2);
    for _ in 0..(size as usize / 2).max(1) {
        let t = ctx.rng.gen::<f32>();
        let p = random_in_disc(ctx.rng, from.lerp(to, t), size * 0.5);
        ctx.canvas.fill_circle(p, 0.5, &grain);
    }
}

/// Solid stroke with small holes punched back out of it.
pub fn chalk(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;

    let style = StrokeStyle::new(size, Paint::solid(ctx.spec.color).with_alpha(0.85));
    ctx.canvas.stroke_line(from, to, &style);

    for _ in 0..((size * 1.5) as usize).max(1) {
        let t = ctx.rng.gen::<f32>();
        let p = random_in_disc(ctx.rng, from.lerp(to, t), size * 0.5);
        let hole = Paint::solid(Rgb::BLACK)
            .with_alpha(ctx.rng.gen_range(0.3..=0.8))
            .with_op(CompositeOp::DestinationOut);
        let r = ctx.rng.gen_range(0.5..=1.5);
        ctx.canvas.fill_circle(p, r, &hole);
    }
}

pub fn watercolor(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;

    for _ in 0..4 {
        let a = jitter(ctx.rng, from, size * 0.4);
        let b = jitter(ctx.rng, to, size * 0.4);
        let width = size * ctx.rng.gen_range(1.0..=2.0);
        let paint = Paint::solid(ctx.spec.color)
            .with_alpha(ctx.rng.gen_range(0.03..=0.08))
            .with_op(CompositeOp::Multiply);
        ctx.canvas.stroke_line(a, b, &StrokeStyle::new(width, paint));
    }
}

pub fn glow(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;
    let paint = Paint::solid(ctx.spec.color)
        .with_alpha(0.9)
        .with_op(CompositeOp::Lighter);
    let style = StrokeStyle::new(size * 0.6, paint).with_shadow(size * 1.2, ctx.spec.color);
    ctx.canvas.stroke_line(from, to, &style);
}

pub fn shadow(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;
    let style = StrokeStyle::new(size, Paint::solid(ctx.spec.color))
        .with_shadow(size, ctx.spec.color.shade(-60.0));
    ctx.canvas.stroke_line(from, to, &style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::test_support::{changed_pixels, diagonal, paint};
    use crate::spec::BrushType;
    use image::Rgba;

    #[test]
    fn test_first_point_leaves_a_mark() {
        let p = [Point::new(30.0, 30.0)];
        for (draw, brush) in [
            (plain_line as crate::renderer::DrawFn, BrushType::Pencil),
            (pencil, BrushType::Pencil),
            (smooth, BrushType::Smooth),
            (marker, BrushType::Marker),
            (thick, BrushType::Thick),
            (sliced, BrushType::Sliced),
            (shadow, BrushType::Shadow),
        ] {
            assert!(changed_pixels(&paint(draw, brush, 6.0, &p)) > 0, "{brush}");
        }
    }

    #[test]
    fn test_plain_line_covers_segment() {
        let canvas = paint(
            plain_line,
            BrushType::Pencil,
            4.0,
            &[Point::new(10.0, 32.0), Point::new(50.0, 32.0)],
        );
        for x in 10..50 {
            assert_eq!(canvas.get_pixel(x, 32), Some(Rgba([20, 40, 200, 255])));
        }
        assert_eq!(canvas.get_pixel(30, 10), Some(Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_chalk_punches_translucent_holes() {
        let canvas = paint(chalk, BrushType::Chalk, 12.0, &diagonal());
        let translucent = canvas.image().pixels().filter(|p| p[3] < 255).count();
        assert!(translucent > 0);
    }

    #[test]
    fn test_multi_pass_brushes_paint() {
        for (draw, brush) in [
            (oil as crate::renderer::DrawFn, BrushType::Oil),
            (charcoal, BrushType::Charcoal),
            (watercolor, BrushType::Watercolor),
            (neon, BrushType::Neon),
            (glow, BrushType::Glow),
        ] {
            assert!(changed_pixels(&paint(draw, brush, 8.0, &diagonal())) > 20, "{brush}");
        }
    }
}
