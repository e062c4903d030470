//! Pattern-stamp family.
//!
//! Each brush lazily builds a small tile, caches it under (brush, color, size)
//! and strokes a smooth curve with the tile repeated as the paint source.

use std::f32::consts::{FRAC_PI_2, PI};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use mural_core::{Canvas, Hsl, Paint, Point, Rgb, StrokeStyle};
use tracing::debug;

use super::{line, segment};
use crate::renderer::StrokeContext;
use crate::spec::BrushType;
use crate::tiles::TileKey;

type TileBuilder = fn(&TileKey, Option<&RgbaImage>) -> Option<RgbaImage>;

fn stamp_stroke(
    ctx: &mut StrokeContext<'_>,
    brush: BrushType,
    build: TileBuilder,
    point: Point,
    previous: Option<Point>,
) {
    let key = TileKey::new(brush, ctx.spec.color, ctx.spec.size);
    let Some(tile) = ctx.tiles.get_or_build(key, build) else {
        debug!(brush = %brush, "no tile available; drawing plain line");
        line::plain_line(ctx, point, previous);
        return;
    };

    let style = StrokeStyle::new(ctx.spec.size * 2.0, Paint::pattern(tile));
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

fn tile_side(size: f32, factor: f32, min: f32) -> u32 {
    (size * factor).ceil().max(min) as u32
}

fn circle_tile(key: &TileKey, _: Option<&RgbaImage>) -> Option<RgbaImage> {
    let side = tile_side(key.size(), 2.0, 4.0);
    let mut tile = Canvas::transparent(side, side);
    let c = side as f32 / 2.0;
    tile.fill_circle(Point::new(c, c), key.size() * 0.6, &Paint::solid(key.color));
    Some(tile.into_image())
}

fn star_tile(key: &TileKey, _: Option<&RgbaImage>) -> Option<RgbaImage> {
    let side = tile_side(key.size(), 2.5, 6.0);
    let mut tile = Canvas::transparent(side, side);
    let c = side as f32 / 2.0;
    let outer = side as f32 * 0.4;
    let inner = outer * 0.45;

    let star: Vec<Point> = (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = -FRAC_PI_2 + i as f32 * PI / 5.0;
            Point::new(c + a.cos() * r, c + a.sin() * r)
        })
        .collect();
    tile.fill_polygon(&star, &Paint::solid(key.color));
    Some(tile.into_image())
}

fn lines_tile(key: &TileKey, _: Option<&RgbaImage>) -> Option<RgbaImage> {
    let side = tile_side(key.size(), 1.0, 4.0);
    let s = side as f32;
    let mut tile = Canvas::transparent(side, side);
    let style = StrokeStyle::new((s / 4.0).max(1.0), Paint::solid(key.color));

    // The neighbours across each edge keep the diagonal continuous when tiled.
    for dx in [-s, 0.0, s] {
        tile.stroke_line(Point::new(dx, s), Point::new(dx + s, 0.0), &style);
    }
    Some(tile.into_image())
}

fn rainbow_tile(key: &TileKey, _: Option<&RgbaImage>) -> Option<RgbaImage> {
    const BANDS: u32 = 7;
    let band = (key.size() / 4.0).round().max(1.0) as u32;
    let mut tile = RgbaImage::new(1, band * BANDS);

    for i in 0..BANDS {
        let hue = Rgb::from_hsl(Hsl {
            h: i as f32 * 360.0 / BANDS as f32,
            s: 0.9,
            l: 0.55,
        })
        .mix(key.color, 0.15);
        for y in i * band..(i + 1) * band {
            tile.put_pixel(0, y, hue.to_rgba(255));
        }
    }
    Some(tile)
}

fn image_tile(key: &TileKey, image: Option<&RgbaImage>) -> Option<RgbaImage> {
    let image = image?;
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    let side = tile_side(key.size(), 4.0, 4.0);
    Some(imageops::resize(image, side, side, FilterType::Triangle))
}

pub fn stamp_circle(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    stamp_stroke(ctx, BrushType::StampCircle, circle_tile, point, previous);
}

pub fn stamp_star(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    stamp_stroke(ctx, BrushType::StampStar, star_tile, point, previous);
}

pub fn pattern_lines(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    stamp_stroke(ctx, BrushType::PatternLines, lines_tile, point, previous);
}

pub fn pattern_rainbow(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    stamp_stroke(ctx, BrushType::PatternRainbow, rainbow_tile, point, previous);
}

/// Repeats the user-supplied image; without one it draws a plain line.
pub fn pattern_image(ctx: &mut StrokeContext<'_>, point: Point, previous: Option<Point>) {
    stamp_stroke(ctx, BrushType::PatternImage, image_tile, point, previous);
}
