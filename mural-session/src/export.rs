//! Artwork export payloads.
//!
//! The session never talks to the artwork API itself. It produces an
//! `ArtworkUpload` body for a create (no id) or update (existing id) call and
//! parses the `ArtworkRecord` the API answers with.

use mural_core::{Snapshot, SnapshotError, DATA_URL_PREFIX};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkUpload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// PNG data URL, the same encoding history snapshots use.
    pub image: Snapshot,
}

impl ArtworkUpload {
    pub fn create(title: impl Into<String>, image: Snapshot, width: u32, height: u32) -> Self {
        Self {
            id: None,
            title: title.into(),
            width,
            height,
            image,
        }
    }

    pub fn update(id: Uuid, title: impl Into<String>, image: Snapshot, width: u32, height: u32) -> Self {
        Self {
            id: Some(id),
            ..Self::create(title, image, width, height)
        }
    }

    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.title.trim().is_empty() {
            return Err(ExportError::EmptyTitle);
        }
        if self.width == 0 || self.height == 0 {
            return Err(ExportError::EmptyImage);
        }
        if !self.image.as_str().starts_with(DATA_URL_PREFIX) {
            return Err(ExportError::Snapshot(SnapshotError::NotADataUrl));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }
}

/// Stored artwork as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtworkRecord {
    pub id: Uuid,
    pub title: String,
    pub image: String,
}

impl ArtworkRecord {
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("artwork title is empty")]
    EmptyTitle,

    #[error("artwork image has no pixels")]
    EmptyImage,

    #[error("snapshot failure: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("artwork json: {0}")]
    Json(#[from] serde_json::Error),
}
