//! mural-session: pointer-driven drawing sessions.
//!
//! A `DrawingSession` owns the one canvas of an editing session together
//! with the brush engine, the stroke controller and the history store.
//! Pointer events drive the engine synchronously; each finished stroke is
//! committed to history exactly once.

pub mod config;
pub mod controller;
pub mod emission;
pub mod export;
pub mod session;

pub use config::SessionConfig;
pub use controller::{StrokeController, StrokeState};
pub use emission::EmissionTask;
pub use export::{ArtworkRecord, ArtworkUpload, ExportError};
pub use session::DrawingSession;
