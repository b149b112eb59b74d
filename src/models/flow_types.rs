use crate::models::classify_types::Material;
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";
const CONTENT_SCHEME: &str = "content://";

/// Reference to a transient image, carried through the flow as an opaque
/// URI string. `file://` references point at files this process can open
/// directly; `content://` references come from a platform provider and are
/// resolvable only through the scratch-directory basename heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefScheme {
    LocalFile,
    OpaqueContent,
}

impl ImageRef {
    pub fn from_uri(uri: impl Into<String>) -> Self {
        ImageRef { uri: uri.into() }
    }

    pub fn for_local_file(path: &Path) -> Self {
        ImageRef {
            uri: format!("{}{}", FILE_SCHEME, path.display()),
        }
    }

    pub fn as_uri(&self) -> &str {
        &self.uri
    }

    pub fn scheme(&self) -> Option<RefScheme> {
        if self.uri.starts_with(FILE_SCHEME) {
            Some(RefScheme::LocalFile)
        } else if self.uri.starts_with(CONTENT_SCHEME) {
            Some(RefScheme::OpaqueContent)
        } else {
            None
        }
    }

    /// Concrete path for `file://` references; `None` for everything else.
    pub fn to_local_path(&self) -> Option<PathBuf> {
        self.uri
            .strip_prefix(FILE_SCHEME)
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Final path segment, used to re-derive the scratch filename when a
    /// provider wrapped one of our scratch files in a `content://` URI.
    pub fn basename(&self) -> Option<&str> {
        let rest = self
            .uri
            .strip_prefix(FILE_SCHEME)
            .or_else(|| self.uri.strip_prefix(CONTENT_SCHEME))?;
        rest.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

/// The six states a single photo moves through. At most one reference is
/// in flight at a time; `owned` records whether the flow created the
/// underlying file (capture) or borrowed it (gallery selection).
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Home,
    Capturing,
    Selecting,
    Confirming {
        image: ImageRef,
        owned: bool,
    },
    Classifying {
        image: ImageRef,
        owned: bool,
        request: u64,
    },
    Result {
        image: ImageRef,
        owned: bool,
        material: Material,
    },
}

/// Everything that can drive the flow: user intents, adapter outcomes and
/// the classification completion signal.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    OpenCamera,
    OpenGallery,
    /// Camera adapter finished; `scratch` is the file the flow allocated
    /// for it, regardless of what URI the platform handed back.
    CaptureReturned {
        scratch: ImageRef,
        outcome: CaptureOutcome,
    },
    /// Scratch allocation failed before the camera was ever invoked.
    CaptureAborted,
    SelectionReturned(SelectionOutcome),
    Back,
    Send,
    ClassificationFinished {
        request: u64,
        material: Material,
    },
    NewScan,
    Shutdown,
}

/// Result of a camera invocation. On success the platform may hand back a
/// provider URI distinct from the scratch reference; both address the
/// same file.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Captured(ImageRef),
    Cancelled,
    PermissionDenied,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    Selected(ImageRef),
    Cancelled,
}

/// Side effects requested by a transition, executed by the session driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LaunchCapture,
    LaunchSelection,
    StartClassification { image: ImageRef, request: u64 },
    DeleteImage(ImageRef),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_file_round_trip() {
        let image = ImageRef::for_local_file(Path::new("/tmp/cache/images/photo_1.jpg"));
        assert_eq!(image.as_uri(), "file:///tmp/cache/images/photo_1.jpg");
        assert_eq!(image.scheme(), Some(RefScheme::LocalFile));
        assert_eq!(
            image.to_local_path(),
            Some(PathBuf::from("/tmp/cache/images/photo_1.jpg"))
        );
        assert_eq!(image.basename(), Some("photo_1.jpg"));
    }

    #[test]
    fn content_ref_has_no_local_path() {
        let image = ImageRef::from_uri("content://app.fileprovider/cache/images/photo_2.jpg");
        assert_eq!(image.scheme(), Some(RefScheme::OpaqueContent));
        assert_eq!(image.to_local_path(), None);
        assert_eq!(image.basename(), Some("photo_2.jpg"));
    }

    #[test]
    fn unknown_scheme_is_opaque() {
        let image = ImageRef::from_uri("https://example.com/cat.jpg");
        assert_eq!(image.scheme(), None);
        assert_eq!(image.to_local_path(), None);
    }

    #[test]
    fn basename_of_bare_authority_is_none() {
        let image = ImageRef::from_uri("content://media/");
        assert_eq!(image.basename(), None);
    }
}
