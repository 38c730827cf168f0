//! Decoding picked photos into source images

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::session::SourceImage;

/// Decode an encoded photo (PNG, JPEG, ...). Unusable data yields `None`.
pub fn decode_image(bytes: &[u8]) -> Option<SourceImage> {
    match image::load_from_memory(bytes) {
        Ok(image) => Some(Arc::new(image)),
        Err(e) => {
            debug!("Ignoring undecodable image data: {}", e);
            None
        }
    }
}

/// Read and decode a photo from disk. Missing or unusable files yield `None`.
pub fn load_image(path: &Path) -> Option<SourceImage> {
    match std::fs::read(path) {
        Ok(bytes) => decode_image(&bytes),
        Err(e) => {
            debug!("Could not read image {:?}: {}", path, e);
            None
        }
    }
}
