//! Image Acquisition Layer
//!
//! The camera and photo library belong to the host. The screen talks to them
//! through [`ImageAcquisition`]; [`FileAcquisition`] is the headless stand-in
//! that reads photos from disk.

pub mod frame;

use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::CaptureSettings;
use crate::session::SourceImage;

/// Where a photo is requested from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Camera,
    Library,
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Camera => write!(f, "camera"),
            ImageSource::Library => write!(f, "photo library"),
        }
    }
}

/// Host-provided photo picker
pub trait ImageAcquisition {
    /// Whether the host can deliver photos from `source` at all
    fn is_source_available(&self, source: ImageSource) -> bool;

    /// Ask the user for a photo. `None` means the user cancelled or the
    /// picker returned nothing usable.
    fn request_image(&mut self, source: ImageSource) -> Option<SourceImage>;
}

/// Picker backed by image files on disk
#[derive(Debug, Clone, Default)]
pub struct FileAcquisition {
    /// Photo returned for library requests
    library_image: Option<PathBuf>,
    /// Photo returned for camera requests; no camera when unset
    camera_image: Option<PathBuf>,
}

impl FileAcquisition {
    pub fn new(settings: &CaptureSettings) -> Self {
        Self {
            library_image: None,
            camera_image: settings.camera_image.clone(),
        }
    }

    /// Choose the file the next library request returns
    pub fn select_library_image(&mut self, path: impl Into<PathBuf>) {
        self.library_image = Some(path.into());
    }

    /// Choose the file the camera "captures"
    pub fn set_camera_image(&mut self, path: Option<PathBuf>) {
        self.camera_image = path;
    }
}

impl ImageAcquisition for FileAcquisition {
    fn is_source_available(&self, source: ImageSource) -> bool {
        match source {
            ImageSource::Library => true,
            ImageSource::Camera => self.camera_image.is_some(),
        }
    }

    fn request_image(&mut self, source: ImageSource) -> Option<SourceImage> {
        let path = match source {
            ImageSource::Library => self.library_image.as_ref(),
            ImageSource::Camera => self.camera_image.as_ref(),
        };
        let Some(path) = path else {
            debug!("No file selected for {}, treating as cancelled", source);
            return None;
        };

        info!("Loading photo from {} at {:?}", source, path);
        frame::load_image(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_camera_unavailable_by_default() {
        let picker = FileAcquisition::new(&CaptureSettings::default());
        assert!(!picker.is_source_available(ImageSource::Camera));
        assert!(picker.is_source_available(ImageSource::Library));
    }

    #[test]
    fn test_camera_available_when_configured() {
        let settings = CaptureSettings {
            camera_image: Some(PathBuf::from("/tmp/capture.png")),
        };
        let picker = FileAcquisition::new(&settings);
        assert!(picker.is_source_available(ImageSource::Camera));
    }

    #[test]
    fn test_library_request_without_selection_is_cancel() {
        let mut picker = FileAcquisition::default();
        assert!(picker.request_image(ImageSource::Library).is_none());
    }

    #[test]
    fn test_library_request_loads_selected_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cat.png");
        RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255])).save(&path).unwrap();

        let mut picker = FileAcquisition::default();
        picker.select_library_image(&path);

        let image = picker.request_image(ImageSource::Library).unwrap();
        assert_eq!(image.width(), 3);
    }

    #[test]
    fn test_unreadable_file_is_cancel() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let mut picker = FileAcquisition::default();
        picker.select_library_image(&path);

        assert!(picker.request_image(ImageSource::Library).is_none());
    }
}
