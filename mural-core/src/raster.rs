//! Anti-aliased paint primitives.
//!
//! Every primitive computes a per-pixel coverage for the whole shape first and
//! composites each touched pixel once, so a translucent stroke never darkens
//! where its own segments overlap.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tracing::trace;

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::geometry::{flatten_arc, flatten_quadratic, Point};

/// Porter-Duff and separable blend operators available to brushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositeOp {
    /// Normal painting.
    #[default]
    SourceOver,
    /// Additive light; channels saturate at white.
    Lighter,
    Multiply,
    Screen,
    /// Removes destination alpha where the source is opaque.
    DestinationOut,
}

/// Where a primitive takes its color from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Solid(Rgb),
    /// A tile repeated from the canvas origin.
    Pattern(Arc<RgbaImage>),
}

impl Source {
    fn sample(&self, x: i32, y: i32) -> [u8; 4] {
        match self {
            Source::Solid(c) => [c.r, c.g, c.b, 255],
            Source::Pattern(tile) => {
                let (w, h) = tile.dimensions();
                if w == 0 || h == 0 {
                    return [0, 0, 0, 0];
                }
                let tx = x.rem_euclid(w as i32) as u32;
                let ty = y.rem_euclid(h as i32) as u32;
                tile.get_pixel(tx, ty).0
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub source: Source,
    pub alpha: f32,
    pub op: CompositeOp,
}

impl Paint {
    pub fn solid(color: Rgb) -> Self {
        Self {
            source: Source::Solid(color),
            alpha: 1.0,
            op: CompositeOp::SourceOver,
        }
    }

    pub fn pattern(tile: Arc<RgbaImage>) -> Self {
        Self {
            source: Source::Pattern(tile),
            alpha: 1.0,
            op: CompositeOp::SourceOver,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_op(mut self, op: CompositeOp) -> Self {
        self.op = op;
        self
    }

    fn apply(&self, canvas: &mut Canvas, x: i32, y: i32, coverage: f32) {
        let mut color = self.source.sample(x, y);
        color[3] = (color[3] as f32 * self.alpha).round() as u8;
        canvas.blend_pixel(x, y, color, coverage, self.op);
    }
}

/// Soft halo drawn beneath a stroke, like a canvas shadow with no offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub blur: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub paint: Paint,
    pub shadow: Option<Shadow>,
}

impl StrokeStyle {
    pub fn new(width: f32, paint: Paint) -> Self {
        Self {
            width,
            paint,
            shadow: None,
        }
    }

    pub fn with_shadow(mut self, blur: f32, color: Rgb) -> Self {
        if blur > 0.0 {
            self.shadow = Some(Shadow { blur, color });
        }
        self
    }
}

/// Composite one straight-alpha source pixel onto `dst`.
pub(crate) fn composite_pixel(dst: &mut Rgba<u8>, src: [u8; 4], coverage: f32, op: CompositeOp) {
    let sa = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;

    if op == CompositeOp::DestinationOut {
        let oa = da * (1.0 - sa);
        dst[3] = to_u8(oa);
        return;
    }

    let oa = match op {
        CompositeOp::Lighter => (sa + da).min(1.0),
        _ => sa + da * (1.0 - sa),
    };
    if oa <= 0.0 {
        return;
    }

    for i in 0..3 {
        let sc = src[i] as f32 / 255.0;
        let dc = dst[i] as f32 / 255.0;
        // Premultiplied result.
        let co = match op {
            CompositeOp::SourceOver => sc * sa + dc * da * (1.0 - sa),
            CompositeOp::Lighter => (sc * sa + dc * da).min(1.0),
            CompositeOp::Multiply => {
                sc * sa * (1.0 - da) + dc * da * (1.0 - sa) + sa * da * (sc * dc)
            }
            CompositeOp::Screen => {
                sc * sa * (1.0 - da) + dc * da * (1.0 - sa) + sa * da * (sc + dc - sc * dc)
            }
            CompositeOp::DestinationOut => unreachable!(),
        };
        dst[i] = to_u8((co / oa).min(1.0));
    }
    dst[3] = to_u8(oa);
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Pixel rectangle `[x0, x1) x [y0, y1)` touched by a shape, clipped to the canvas.
fn clip_bounds(canvas: &Canvas, min: Point, max: Point) -> Option<(i32, i32, i32, i32)> {
    let x0 = (min.x.floor() as i32).max(0);
    let y0 = (min.y.floor() as i32).max(0);
    let x1 = (max.x.ceil() as i32).min(canvas.width() as i32);
    let y1 = (max.y.ceil() as i32).min(canvas.height() as i32);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0, y0, x1, y1))
}

fn points_bounds(points: &[Point], pad: f32) -> (Point, Point) {
    let mut min = Point::new(f32::INFINITY, f32::INFINITY);
    let mut max = Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min.offset(-pad, -pad), max.offset(pad, pad))
}

fn polyline_distance(p: Point, points: &[Point]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => p.distance(*only),
        _ => points
            .windows(2)
            .map(|w| p.distance_to_segment(w[0], w[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

fn pixel_center(x: i32, y: i32) -> Point {
    Point::new(x as f32 + 0.5, y as f32 + 0.5)
}

impl Canvas {
    /// Stroke an open polyline with round joins and caps.
    /// A single point (or coincident points) still leaves a round mark.
    pub fn stroke_polyline(&mut self, points: &[Point], style: &StrokeStyle) {
        if points.is_empty() || !(style.width > 0.0) {
            return;
        }
        let half = (style.width / 2.0).max(0.5);
        let blur = style.shadow.map_or(0.0, |s| s.blur);
        let (min, max) = points_bounds(points, half + blur + 1.0);
        let Some((x0, y0, x1, y1)) = clip_bounds(self, min, max) else {
            return;
        };
        trace!(points = points.len(), width = style.width, "stroke polyline");

        let shadow_paint = style.shadow.map(|s| Paint {
            source: Source::Solid(s.color),
            alpha: style.paint.alpha,
            op: style.paint.op,
        });

        for y in y0..y1 {
            for x in x0..x1 {
                let d = polyline_distance(pixel_center(x, y), points);
                if let (Some(shadow), Some(paint)) = (style.shadow, shadow_paint.as_ref()) {
                    if d < half + shadow.blur {
                        let falloff = if d <= half {
                            1.0
                        } else {
                            let t = 1.0 - (d - half) / shadow.blur;
                            t * t
                        };
                        paint.apply(self, x, y, falloff * 0.6);
                    }
                }
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    style.paint.apply(self, x, y, coverage);
                }
            }
        }
    }

    pub fn stroke_line(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        self.stroke_polyline(&[from, to], style);
    }

    pub fn stroke_quadratic(&mut self, from: Point, ctrl: Point, to: Point, style: &StrokeStyle) {
        let steps = (from.distance(ctrl) + ctrl.distance(to)).ceil().clamp(2.0, 32.0) as usize;
        self.stroke_polyline(&flatten_quadratic(from, ctrl, to, steps), style);
    }

    pub fn stroke_arc(&mut self, center: Point, radius: f32, start: f32, end: f32, style: &StrokeStyle) {
        self.stroke_polyline(&flatten_arc(center, radius, start, end), style);
    }

    pub fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        let radius = radius.max(0.5);
        let (min, max) = points_bounds(&[center], radius + 1.0);
        let Some((x0, y0, x1, y1)) = clip_bounds(self, min, max) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let coverage = (radius + 0.5 - pixel_center(x, y).distance(center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    paint.apply(self, x, y, coverage);
                }
            }
        }
    }

    /// Outline of a full circle.
    pub fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, paint: &Paint) {
        let half = (width / 2.0).max(0.5);
        let (min, max) = points_bounds(&[center], radius + half + 1.0);
        let Some((x0, y0, x1, y1)) = clip_bounds(self, min, max) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let ring = (pixel_center(x, y).distance(center) - radius).abs();
                let coverage = (half + 0.5 - ring).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    paint.apply(self, x, y, coverage);
                }
            }
        }
    }

    /// Axis-aligned rectangle with fractional-edge coverage.
    pub fn fill_rect(&mut self, origin: Point, width: f32, height: f32, paint: &Paint) {
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let max = origin.offset(width, height);
        let Some((x0, y0, x1, y1)) = clip_bounds(self, origin, max) else {
            return;
        };
        for y in y0..y1 {
            let cover_y = ((y + 1) as f32).min(max.y) - (y as f32).max(origin.y);
            for x in x0..x1 {
                let cover_x = ((x + 1) as f32).min(max.x) - (x as f32).max(origin.x);
                let coverage = (cover_x * cover_y).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    paint.apply(self, x, y, coverage);
                }
            }
        }
    }

    /// Even-odd polygon fill, 2x2 supersampled.
    pub fn fill_polygon(&mut self, points: &[Point], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let (min, max) = points_bounds(points, 1.0);
        let Some((x0, y0, x1, y1)) = clip_bounds(self, min, max) else {
            return;
        };
        const SAMPLES: [(f32, f32); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];
        for y in y0..y1 {
            for x in x0..x1 {
                let hits = SAMPLES
                    .iter()
                    .filter(|(sx, sy)| contains(points, Point::new(x as f32 + sx, y as f32 + sy)))
                    .count();
                if hits > 0 {
                    paint.apply(self, x, y, hits as f32 / SAMPLES.len() as f32);
                }
            }
        }
    }
}

fn contains(polygon: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
