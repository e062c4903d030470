//! mural-brush: the procedural raster brush engine.
//!
//! Design rules:
//! - A `BrushSpec` is immutable; changing tool, color or size re-issues one.
//! - Each brush tag maps to an independent `StrokeRenderer` in a `BrushRegistry`.
//! - Drawing never fails: unknown or unregistered brushes render as a plain line.
//! - Pattern tiles live in an explicit `TileCache` keyed by (brush, color, size).
//! - Randomness is per call; identical input need not give identical pixels.

use thiserror::Error;

pub mod engine;
pub mod families;
pub mod registry;
pub mod renderer;
pub mod spec;
pub mod tiles;

pub use engine::BrushEngine;
pub use registry::BrushRegistry;
pub use renderer::{BrushFn, StrokeContext, StrokeRenderer};
pub use spec::{BrushFamily, BrushSpec, BrushType};
pub use tiles::{TileCache, TileKey};

/// Errors surfaced by brush configuration helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrushError {
    #[error("unknown brush type: {tag}")]
    UnknownBrush { tag: String },
}
