//! Particle and spray family.
//!
//! Every call scatters N small marks around the current point. N and the
//! scatter radius scale with brush size; opacity is drawn per particle.

use std::f32::consts::TAU;

use mural_core::geometry::{random_center_weighted, random_in_disc, random_range};
use mural_core::{CompositeOp, Hsl, Paint, Point, Rgb};
use rand::Rng;

use super::segment;
use crate::renderer::StrokeContext;

fn particle_count(size: f32, per_unit: f32, min: usize, max: usize) -> usize {
    ((size * per_unit) as usize).clamp(min, max)
}

pub fn spray(ctx: &mut StrokeContext<'_>, point: Point, _previous: Option<Point>) {
    let size = ctx.spec.size;
    for _ in 0..particle_count(size, 2.0, 4, 200) {
        let p = random_in_disc(ctx.rng, point, size);
        let paint = Paint::solid(ctx.spec.color).with_alpha(ctx.rng.gen_range(0.4..=1.0));
        ctx.canvas.fill_circle(p, 0.6, &paint);
    }
}

/// Soft, dense airbrush; particles cluster toward the nozzle center.
pub fn aerosol(ctx: &mut StrokeContext<'_>, point: Point, _previous: Option<Point>) {
    let size = ctx.spec.size;
    for _ in 0..particle_count(size, 3.0, 6, 300) {
        let p = random_center_weighted(ctx.rng, point, size * 1.5);
        let paint = Paint::solid(ctx.spec.color).with_alpha(ctx.rng.gen_range(0.05..=0.3));
        let r = ctx.rng.gen_range(0.5..=1.0);
        ctx.canvas.fill_circle(p, r, &paint);
    }
}

/// Evenly spaced round dots along the segment.
pub fn dots(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;
    let step = (size * 1.5).max(1.0);
    let count = (from.distance(to) / step).ceil().max(1.0) as usize;

    for i in 1..=count {
        let p = from.lerp(to, i as f32 / count as f32);
        let paint = Paint::solid(ctx.spec.color).with_alpha(ctx.rng.gen_range(0.7..=1.0));
        ctx.canvas.fill_circle(p, size / 3.0, &paint);
    }
}

pub fn confetti(ctx: &mut StrokeContext<'_>, point: Point, _previous: Option<Point>) {
    let size = ctx.spec.size;
    for _ in 0..3 + (size / 5.0) as usize {
        let p = random_in_disc(ctx.rng, point, size * 1.5);
        let w = random_range(ctx.rng, size * 0.2, size * 0.5).max(1.0);
        let h = random_range(ctx.rng, size * 0.2, size * 0.5).max(1.0);
        let color = Rgb::from_hsl(Hsl {
            h: ctx.rng.gen_range(0.0..360.0),
            s: 0.8,
            l: 0.55,
        });
        let paint = Paint::solid(color).with_alpha(ctx.rng.gen_range(0.7..=1.0));
        ctx.canvas
            .fill_rect(p.offset(-w / 2.0, -h / 2.0), w, h, &paint);
    }
}

pub fn bubble(ctx: &mut StrokeContext<'_>, point: Point, _previous: Option<Point>) {
    let size = ctx.spec.size;
    let count = ctx.rng.gen_range(1..=2);
    for _ in 0..count {
        let center = random_in_disc(ctx.rng, point, size);
        let r = random_range(ctx.rng, size * 0.2, size * 0.6).max(1.0);
        let ring = Paint::solid(ctx.spec.color).with_alpha(ctx.rng.gen_range(0.4..=0.8));
        ctx.canvas.stroke_circle(center, r, 1.0, &ring);

        let highlight = Paint::solid(Rgb::WHITE).with_alpha(0.6);
        ctx.canvas
            .fill_circle(center.offset(-r * 0.4, -r * 0.4), r * 0.15, &highlight);
    }
}

/// Embers rising above the pointer, red through yellow, added as light.
pub fn fire(ctx: &mut StrokeContext<'_>, point: Point, _previous: Option<Point>) {
    let size = ctx.spec.size;
    let ember = Rgb::new(255, 60, 0);
    let flame = Rgb::new(255, 220, 60);

    for _ in 0..particle_count(size, 1.5, 3, 150) {
        let p = random_in_disc(ctx.rng, point, size * 0.6);
        let rise = random_range(ctx.rng, 0.0, size);
        let color = ember.mix(flame, ctx.rng.gen()).mix(ctx.spec.color, 0.15);
        let paint = Paint::solid(color)
            .with_alpha(ctx.rng.gen_range(0.2..=0.6))
            .with_op(CompositeOp::Lighter);
        let r = random_range(ctx.rng, size * 0.1, size * 0.3).max(0.5);
        ctx.canvas.fill_circle(p.offset(0.0, -rise), r, &paint);
    }
}

pub fn particles(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    let (from, to) = segment(point, previous);
    let size = ctx.spec.size;

    for _ in 0..particle_count(size, 0.5, 3, 60) {
        let t = ctx.rng.gen::<f32>();
        let p = random_in_disc(ctx.rng, from.lerp(to, t), size);
        let color = ctx.spec.color.jitter_hue(ctx.rng, 20.0);
        let paint = Paint::solid(color).with_alpha(ctx.rng.gen_range(0.3..=0.9));
        let r = random_range(ctx.rng, 0.5, size * 0.25);
        ctx.canvas.fill_circle(p, r, &paint);
    }
}

pub fn heart_spray(ctx: &mut StrokeContext<'_>, point: Point, _previous: Option<Point>) {
    let size = ctx.spec.size;
    for _ in 0..2 {
        let center = random_in_disc(ctx.rng, point, size * 1.5);
        let scale = random_range(ctx.rng, size * 0.3, size * 0.7).max(2.0);
        let paint = Paint::solid(ctx.spec.color).with_alpha(ctx.rng.gen_range(0.5..=1.0));
        ctx.canvas.fill_polygon(&heart(center, scale), &paint);
    }
}

/// Classic parametric heart, roughly `scale` pixels across.
fn heart(center: Point, scale: f32) -> Vec<Point> {
    let k = scale / 32.0;
    (0..24)
        .map(|i| {
            let t = TAU * i as f32 / 24.0;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            center.offset(x * k, -y * k)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::test_support::{changed_pixels, paint};
    use crate::renderer::DrawFn;
    use crate::spec::BrushType;

    #[test]
    fn test_particles_stay_near_the_pointer() {
        let center = Point::new(32.0, 32.0);
        let canvas = paint(spray, BrushType::Spray, 6.0, &[center]);
        for (x, y, px) in canvas.image().enumerate_pixels() {
            if px[0] != 255 || px[1] != 255 || px[2] != 255 {
                let d = Point::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                assert!(d <= 6.0 + 2.0, "particle at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_every_particle_brush_emits_on_first_point() {
        let p = [Point::new(32.0, 32.0)];
        for (draw, brush) in [
            (spray as DrawFn, BrushType::Spray),
            (aerosol, BrushType::Aerosol),
            (dots, BrushType::Dots),
            (confetti, BrushType::Confetti),
            (bubble, BrushType::Bubble),
            (fire, BrushType::Fire),
            (particles, BrushType::Particles),
            (heart_spray, BrushType::HeartSpray),
        ] {
            assert!(changed_pixels(&paint(draw, brush, 10.0, &p)) > 0, "{brush}");
        }
    }

    #[test]
    fn test_bigger_spray_emits_more() {
        let p = [Point::new(32.0, 32.0)];
        let small = changed_pixels(&paint(spray, BrushType::Spray, 4.0, &p));
        let large = changed_pixels(&paint(spray, BrushType::Spray, 20.0, &p));
        assert!(large > small);
    }

    #[test]
    fn test_heart_is_closed_polygon_around_center() {
        let pts = heart(Point::new(0.0, 0.0), 32.0);
        assert_eq!(pts.len(), 24);
        assert!(pts.iter().all(|p| p.x.abs() <= 16.5 && p.y.abs() <= 17.5));
    }
}
