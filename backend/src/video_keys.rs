//! Video identifiers and the storage keys derived from them

use std::fmt;

use uuid::Uuid;

/// Prefix under which every video object is stored
pub const VIDEO_KEY_PREFIX: &str = "videos";

/// Extension assumed when none can be determined
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Filename used when an upload carries none
pub const DEFAULT_FILENAME: &str = "video.mp4";

/// Unique token assigned to a video at upload time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoIdentifier(Uuid);

impl VideoIdentifier {
    /// Generates a fresh random (v4) identifier
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VideoIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Key of a video object within the bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// The key as stored in the bucket
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}

/// Key an upload is written to: `videos/{identifier}.{extension}`
///
/// The extension is whatever follows the last `.` of the original
/// filename, or `mp4` when the filename has no dot at all.
#[must_use]
pub fn derive_upload_key(identifier: &VideoIdentifier, original_filename: &str) -> StorageKey {
    let extension = original_filename
        .rsplit_once('.')
        .map_or(DEFAULT_EXTENSION, |(_, ext)| ext);

    StorageKey(format!("{VIDEO_KEY_PREFIX}/{identifier}.{extension}"))
}

/// Key a lookup by public identifier resolves to
///
/// Lookups always assume MP4: an identifier already ending in `.mp4` is
/// used as-is, anything else gets `.mp4` appended. Videos uploaded with
/// another extension cannot be reached through this mapping.
#[must_use]
pub fn derive_lookup_key(identifier: &str) -> StorageKey {
    let suffix = format!(".{DEFAULT_EXTENSION}");

    if identifier.ends_with(&suffix) {
        StorageKey(format!("{VIDEO_KEY_PREFIX}/{identifier}"))
    } else {
        StorageKey(format!("{VIDEO_KEY_PREFIX}/{identifier}{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_are_unique_uuids() {
        let a = VideoIdentifier::new();
        let b = VideoIdentifier::new();

        assert_ne!(a, b);
        let rendered = a.to_string();
        assert_eq!(rendered.len(), 36);
        assert!(Uuid::parse_str(&rendered).is_ok());
    }

    #[test]
    fn test_upload_key_uses_last_extension() {
        let id = VideoIdentifier::new();

        assert_eq!(
            derive_upload_key(&id, "clip.mp4").as_str(),
            format!("videos/{id}.mp4")
        );
        assert_eq!(
            derive_upload_key(&id, "holiday.final.webm").as_str(),
            format!("videos/{id}.webm")
        );
        assert_eq!(
            derive_upload_key(&id, "MOVIE.MOV").as_str(),
            format!("videos/{id}.MOV")
        );
    }

    #[test]
    fn test_upload_key_defaults_to_mp4() {
        let id = VideoIdentifier::new();

        assert_eq!(
            derive_upload_key(&id, "recording").as_str(),
            format!("videos/{id}.mp4")
        );
        assert_eq!(
            derive_upload_key(&id, "").as_str(),
            format!("videos/{id}.mp4")
        );
    }

    #[test]
    fn test_upload_key_trailing_dot_gives_empty_extension() {
        let id = VideoIdentifier::new();

        assert_eq!(
            derive_upload_key(&id, "clip.").as_str(),
            format!("videos/{id}.")
        );
    }

    #[test]
    fn test_lookup_key_appends_mp4() {
        assert_eq!(derive_lookup_key("test-id").as_str(), "videos/test-id.mp4");
        assert_eq!(
            derive_lookup_key("test-id.webm").as_str(),
            "videos/test-id.webm.mp4"
        );
    }

    #[test]
    fn test_lookup_key_keeps_existing_mp4() {
        assert_eq!(
            derive_lookup_key("test-id.mp4").as_str(),
            "videos/test-id.mp4"
        );
    }

    #[test]
    fn test_non_mp4_upload_is_unreachable_by_lookup() {
        let id = VideoIdentifier::new();
        let upload_key = derive_upload_key(&id, "clip.webm");
        let lookup_key = derive_lookup_key(&id.to_string());

        assert_ne!(upload_key, lookup_key);
    }

    #[test]
    fn test_mp4_upload_round_trips_through_lookup() {
        let id = VideoIdentifier::new();

        assert_eq!(
            derive_upload_key(&id, "clip.mp4"),
            derive_lookup_key(&id.to_string())
        );
    }
}
