//! Meme collection on disk
//!
//! Each saved meme is three files sharing an id: the rendered image, the
//! original photo and a JSON record with the captions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::CompositeArtifact;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid meme record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Saved meme metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemeRecord {
    /// Meme identifier
    pub id: String,
    pub top_caption: String,
    pub bottom_caption: String,
    /// Rendered image dimensions
    pub width: u32,
    pub height: u32,
    /// Rendered image file name, relative to the store
    pub rendered_file: String,
    /// Original photo file name, relative to the store
    pub source_file: String,
    /// Seconds since the Unix epoch
    pub created_at: u64,
}

/// Directory of saved memes
#[derive(Debug, Clone)]
pub struct MemeStore {
    dir: PathBuf,
}

impl MemeStore {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist the artifact with both captions and the original photo
    pub fn save(&self, artifact: &CompositeArtifact) -> Result<MemeRecord, StoreError> {
        self.save_as(artifact, Uuid::new_v4().to_string())
    }

    fn save_as(&self, artifact: &CompositeArtifact, id: String) -> Result<MemeRecord, StoreError> {
        let rendered = artifact.rendered_image();
        let record = MemeRecord {
            rendered_file: format!("{id}.png"),
            source_file: format!("{id}-source.png"),
            top_caption: artifact.top_caption().to_string(),
            bottom_caption: artifact.bottom_caption().to_string(),
            width: rendered.width(),
            height: rendered.height(),
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
            id,
        };

        let mut written = Vec::new();
        if let Err(e) = self.write_files(artifact, &record, &mut written) {
            // No orphan images without a record
            for path in &written {
                if let Err(remove_err) = std::fs::remove_file(path) {
                    warn!("Failed to remove partial meme file {:?}: {}", path, remove_err);
                }
            }
            return Err(e);
        }

        info!("Saved meme {} to {:?}", record.id, self.dir);
        Ok(record)
    }

    /// Write the three files of a meme, recording each path once it exists
    fn write_files(
        &self,
        artifact: &CompositeArtifact,
        record: &MemeRecord,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), StoreError> {
        let rendered_path = self.dir.join(&record.rendered_file);
        artifact.rendered_image().save(&rendered_path)?;
        written.push(rendered_path);

        let source_path = self.dir.join(&record.source_file);
        artifact.source_image().to_rgba8().save(&source_path)?;
        written.push(source_path);

        let json = serde_json::to_string_pretty(record)?;
        let record_path = self.record_path(&record.id);
        std::fs::write(&record_path, json)?;
        written.push(record_path);
        Ok(())
    }

    /// Load a single record by id
    pub fn load(&self, id: &str) -> Result<MemeRecord, StoreError> {
        let content = std::fs::read_to_string(self.record_path(id))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// All readable records, oldest first. Corrupt records are skipped.
    pub fn list(&self) -> Result<Vec<MemeRecord>, StoreError> {
        let mut records = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = std::fs::read_to_string(&path)
                .map_err(StoreError::from)
                .and_then(|content| Ok(serde_json::from_str::<MemeRecord>(&content)?));
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable meme record {:?}: {}", path, e),
            }
        }

        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}
