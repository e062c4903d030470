//! Drawing session: one canvas plus everything that paints on it.

use std::time::Instant;

use mural_brush::{BrushEngine, BrushError, BrushSpec};
use mural_core::{Canvas, Point, Rgb, RgbaImage, Snapshot, SnapshotError};
use mural_history::{HistoryError, HistoryStore, Storage};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::controller::StrokeController;
use crate::export::{ArtworkUpload, ExportError};

#[derive(Debug)]
pub struct DrawingSession {
    config: SessionConfig,
    canvas: Canvas,
    engine: BrushEngine,
    controller: StrokeController,
    history: HistoryStore,
}

impl DrawingSession {
    /// Open a session over `storage`. If the persisted history points at an
    /// entry, that snapshot is painted onto the fresh canvas.
    pub async fn open(config: SessionConfig, storage: Storage) -> Self {
        Self::with_engine(config, storage, BrushEngine::new()).await
    }

    pub async fn with_engine(config: SessionConfig, storage: Storage, engine: BrushEngine) -> Self {
        let mut canvas = Canvas::new(config.width, config.height, config.background.to_rgba(255));
        let history = HistoryStore::open(config.history.clone(), storage);
        let restored = history.restore_current(&mut canvas).await;
        info!(
            width = config.width,
            height = config.height,
            entries = history.len(),
            restored,
            "drawing session opened"
        );

        let controller = StrokeController::new(config.emission_interval(), config.max_emissions_per_tick);
        Self {
            config,
            canvas,
            engine,
            controller,
            history,
        }
    }

    pub fn configure(&mut self, spec: BrushSpec) {
        self.engine.configure(spec);
    }

    /// Configure from a raw tool tag; unknown tags still draw, as a plain line.
    pub fn configure_tag(&mut self, tag: &str, color: Rgb, size: f32) -> Result<(), BrushError> {
        self.engine.configure_tag(tag, color, size)
    }

    pub fn set_pattern_image(&mut self, image: RgbaImage) {
        self.engine.set_pattern_image(image);
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.pointer_down_at(point, Instant::now());
    }

    /// Pointer-down with an explicit clock, for hosts that drive `tick` themselves.
    pub fn pointer_down_at(&mut self, point: Point, now: Instant) {
        let continuous = self.engine.spec().brush.emits_continuously();
        self.controller.pointer_down(point, continuous, now);
    }

    pub fn pointer_move(&mut self, point: Point) {
        if let Some(previous) = self.controller.pointer_move(point) {
            self.engine
                .draw(&mut self.canvas, point, Some(previous), self.controller.points());
        }
    }

    /// Run any continuous emissions owed at `now`. Returns how many ran.
    pub fn tick(&mut self, now: Instant) -> u32 {
        let due = self.controller.due_emissions(now);
        let Some(point) = self.controller.emission_position() else {
            return due;
        };
        for _ in 0..due {
            self.engine
                .draw(&mut self.canvas, point, Some(point), self.controller.points());
        }
        due
    }

    /// End the stroke and commit it. Returns the new history key, or `None`
    /// if no stroke was in progress.
    pub async fn pointer_up(&mut self) -> Result<Option<String>, HistoryError> {
        if !self.controller.finish() {
            return Ok(None);
        }
        let key = self.history.save(&self.canvas).await?;
        Ok(Some(key))
    }

    /// Leaving the surface commits the partial stroke like pointer-up.
    pub async fn pointer_leave(&mut self) -> Result<Option<String>, HistoryError> {
        self.pointer_up().await
    }

    pub async fn undo(&mut self) -> bool {
        self.history.undo(&mut self.canvas).await
    }

    pub async fn redo(&mut self) -> bool {
        self.history.redo(&mut self.canvas).await
    }

    /// Wipe the canvas back to the background and drop all history.
    pub async fn clear(&mut self) {
        self.controller.finish();
        self.canvas.fill(self.config.background.to_rgba(255));
        self.history.clear().await;
    }

    pub fn export_image(&self) -> Result<Snapshot, SnapshotError> {
        Snapshot::encode(&self.canvas)
    }

    /// Request body for creating (`id == None`) or updating an artwork.
    pub fn export_upload(&self, title: &str, id: Option<Uuid>) -> Result<ArtworkUpload, ExportError> {
        let image = self.export_image()?;
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let upload = match id {
            Some(id) => ArtworkUpload::update(id, title, image, w, h),
            None => ArtworkUpload::create(title, image, w, h),
        };
        upload.validate()?;
        Ok(upload)
    }

    /// Stop any continuous emission. The canvas and history stay as they are.
    pub fn teardown(&mut self) {
        if self.controller.is_emitting() {
            debug!("stopping emission on teardown");
        }
        self.controller.halt_emission();
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn engine(&self) -> &BrushEngine {
        &self.engine
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn controller(&self) -> &StrokeController {
        &self.controller
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_drawing(&self) -> bool {
        self.controller.is_drawing()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

impl Drop for DrawingSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
