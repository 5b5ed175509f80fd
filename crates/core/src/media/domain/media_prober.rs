use std::path::Path;

use super::media_metadata::MediaMetadata;

/// Domain interface for inspecting a media container.
pub trait MediaProber: Send {
    fn probe(&self, path: &Path) -> Result<MediaMetadata, Box<dyn std::error::Error>>;
}
