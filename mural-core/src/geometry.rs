//! Points and the small amount of geometry brushes need.

use std::ops::{Add, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A position in canvas pixel coordinates.
/// Callers have already divided out device pixel ratio and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    /// Angle in radians of the vector from `self` to `other`.
    pub fn angle_to(self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    pub fn offset(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Unit normal of the segment `self -> other`; zero for coincident points.
    pub fn normal_to(self, other: Point) -> (f32, f32) {
        let len = self.distance(other);
        if len <= f32::EPSILON {
            return (0.0, 0.0);
        }
        (-(other.y - self.y) / len, (other.x - self.x) / len)
    }

    /// Distance from `self` to the segment `a -> b`.
    pub fn distance_to_segment(self, a: Point, b: Point) -> f32 {
        let abx = b.x - a.x;
        let aby = b.y - a.y;
        let len_sq = abx * abx + aby * aby;
        if len_sq <= f32::EPSILON {
            return self.distance(a);
        }
        let t = (((self.x - a.x) * abx + (self.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
        self.distance(Point::new(a.x + abx * t, a.y + aby * t))
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Uniform sample in the disc of `radius` around `center`.
pub fn random_in_disc<R: Rng + ?Sized>(rng: &mut R, center: Point, radius: f32) -> Point {
    if radius <= 0.0 {
        return center;
    }
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let r = radius * rng.gen::<f32>().sqrt();
    center.offset(angle.cos() * r, angle.sin() * r)
}

/// Sample biased toward the center, the way an airbrush nozzle falls off.
pub fn random_center_weighted<R: Rng + ?Sized>(rng: &mut R, center: Point, radius: f32) -> Point {
    if radius <= 0.0 {
        return center;
    }
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let r = radius * rng.gen::<f32>();
    center.offset(angle.cos() * r, angle.sin() * r)
}

/// Move a point by up to `amount` on each axis.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, point: Point, amount: f32) -> Point {
    point.offset(
        random_range(rng, -amount, amount),
        random_range(rng, -amount, amount),
    )
}

/// `gen_range` that tolerates empty or inverted ranges by returning `lo`.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Flatten a quadratic Bezier into `steps + 1` points.
pub fn flatten_quadratic(p0: Point, ctrl: Point, p1: Point, steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            let inv = 1.0 - t;
            Point::new(
                inv * inv * p0.x + 2.0 * inv * t * ctrl.x + t * t * p1.x,
                inv * inv * p0.y + 2.0 * inv * t * ctrl.y + t * t * p1.y,
            )
        })
        .collect()
}

/// Flatten a circular arc into a polyline, sweeping from `start` to `end` radians.
pub fn flatten_arc(center: Point, radius: f32, start: f32, end: f32) -> Vec<Point> {
    let sweep = end - start;
    let steps = ((sweep.abs() * radius.max(1.0)) / 2.0).ceil().clamp(4.0, 128.0) as usize;
    (0..=steps)
        .map(|i| {
            let a = start + sweep * (i as f32 / steps as f32);
            center.offset(a.cos() * radius, a.sin() * radius)
        })
        .collect()
}
