//! Snapshot codec: a canvas as a self-contained PNG data URL.
//!
//! The same text is what history backends store and what the export path
//! hands to the artwork API, so both tiers of storage only ever see strings.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::canvas::Canvas;

pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encoded image of a canvas at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not a PNG data URL")]
    NotADataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image codec failure: {0}")]
    Image(#[from] image::ImageError),
}

impl Snapshot {
    /// Encode the full canvas losslessly.
    pub fn encode(canvas: &Canvas) -> Result<Self, SnapshotError> {
        let mut bytes = Vec::new();
        canvas
            .image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

        let mut url = String::with_capacity(DATA_URL_PREFIX.len() + bytes.len() * 4 / 3 + 4);
        url.push_str(DATA_URL_PREFIX);
        STANDARD.encode_string(&bytes, &mut url);

        debug!(
            width = canvas.width(),
            height = canvas.height(),
            encoded_len = url.len(),
            "encoded canvas snapshot"
        );
        Ok(Self(url))
    }

    /// Wrap text read back from storage. Validation is deferred to `decode`.
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn decode(&self) -> Result<RgbaImage, SnapshotError> {
        let payload = self
            .0
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or(SnapshotError::NotADataUrl)?;
        let bytes = STANDARD.decode(payload)?;
        let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?.to_rgba8();
        trace!(
            width = image.width(),
            height = image.height(),
            "decoded snapshot"
        );
        Ok(image)
    }

    /// Decode and overwrite `canvas`. On error the canvas is left untouched.
    pub fn restore_into(&self, canvas: &mut Canvas) -> Result<(), SnapshotError> {
        let image = self.decode()?;
        canvas.replace_with(&image);
        Ok(())
    }
}
