//! Opaque references to captured images.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Where a capture came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// Live camera shot.
    Camera,
    /// Picked from the photo library.
    Library,
}

impl CaptureSource {
    pub fn label(&self) -> &'static str {
        match self {
            CaptureSource::Camera => "camera",
            CaptureSource::Library => "library",
        }
    }
}

/// Opaque handle to a captured image.
///
/// The application never inspects image contents; it only carries the handle
/// between the capture provider, the analysis provider and the verification
/// flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRef {
    id: Uuid,
    path: PathBuf,
    source: CaptureSource,
}

impl CaptureRef {
    pub fn new(path: impl Into<PathBuf>, source: CaptureSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            source,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> CaptureSource {
        self.source
    }

    /// Short id for display and logs.
    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }
}

/// Failure modes of the platform capture boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("camera permission denied")]
    Denied,
    #[error("camera hardware error: {0}")]
    Hardware(String),
    #[error("selection cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_refs_are_unique() {
        let a = CaptureRef::new("/tmp/a.jpg", CaptureSource::Camera);
        let b = CaptureRef::new("/tmp/a.jpg", CaptureSource::Camera);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn short_id_is_eight_chars() {
        let c = CaptureRef::new("/tmp/c.jpg", CaptureSource::Library);
        assert_eq!(c.short_id().len(), 8);
    }
}
