//! mural-core: raster surface, paint primitives and shared utilities for the mural painter.
//!
//! Design rules:
//! - Exactly one `Canvas` is painted per editing session.
//! - Pixels are stored straight (non-premultiplied) RGBA8 so snapshots are lossless.
//! - Every primitive composites once per pixel, whatever the shape's overlap.
//! - Snapshots are self-contained PNG data URLs, the same text used for export.

pub mod canvas;
pub mod color;
pub mod geometry;
pub mod raster;
pub mod snapshot;

pub use canvas::Canvas;
pub use color::{ColorError, Hsl, Rgb};
pub use geometry::Point;
pub use raster::{CompositeOp, Paint, Shadow, Source, StrokeStyle};
pub use snapshot::{Snapshot, SnapshotError, DATA_URL_PREFIX};

/// Re-exported so downstream crates name pixel types without a direct `image` dependency.
pub use image::{Rgba, RgbaImage};
