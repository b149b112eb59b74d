use crate::error::StorageError;
use crate::models::flow_types::{ImageRef, RefScheme};
use std::path::{Path, PathBuf};

const SCRATCH_SUBDIR: &str = "images";
const SCRATCH_PREFIX: &str = "photo_";
const SCRATCH_SUFFIX: &str = ".jpg";

/// Owns the lifecycle of transient captured images: a dedicated cache
/// subdirectory of uniquely-named scratch files the camera writes into.
/// Gallery selections never pass through here except as delete no-ops.
#[derive(Debug, Clone)]
pub struct ScratchStore {
    images_dir: PathBuf,
}

impl ScratchStore {
    pub fn new(cache_dir: &Path) -> Self {
        ScratchStore {
            images_dir: cache_dir.join(SCRATCH_SUBDIR),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Allocate a new empty scratch file and return an owned reference to
    /// it. Uniqueness comes from create-new file semantics; the file stays
    /// on disk until `delete`.
    pub fn create_scratch_file(&self) -> Result<ImageRef, StorageError> {
        std::fs::create_dir_all(&self.images_dir).map_err(|e| StorageError {
            message: format!(
                "Failed to create scratch directory {}: {}",
                self.images_dir.display(),
                e
            ),
        })?;

        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(SCRATCH_SUFFIX)
            .tempfile_in(&self.images_dir)
            .map_err(|e| StorageError {
                message: format!("Failed to allocate scratch file: {}", e),
            })?;

        let (_, path) = scratch.keep().map_err(|e| StorageError {
            message: format!("Failed to keep scratch file: {}", e),
        })?;

        Ok(ImageRef::for_local_file(&path))
    }

    /// Best-effort mapping back to a concrete file location. `file://`
    /// references parse directly; `content://` references re-derive the
    /// scratch path from the basename and resolve only if that file
    /// exists. Never errors; used for deletion targeting and diagnostics.
    pub fn resolve(&self, image: &ImageRef) -> Option<PathBuf> {
        match image.scheme()? {
            RefScheme::LocalFile => image.to_local_path(),
            RefScheme::OpaqueContent => {
                let candidate = self.images_dir.join(image.basename()?);
                candidate.exists().then_some(candidate)
            }
        }
    }

    /// Idempotent delete. Unresolvable and already-deleted references are
    /// silent no-ops; other failures are logged and swallowed so cleanup
    /// can never block the flow.
    pub fn delete(&self, image: &ImageRef) {
        let Some(path) = self.resolve(image) else {
            return;
        };
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                eprintln!("Failed to delete scratch file {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_allocates_unique_jpg_in_images_dir() {
        let cache = tempdir().unwrap();
        let store = ScratchStore::new(cache.path());

        let first = store.create_scratch_file().unwrap();
        let second = store.create_scratch_file().unwrap();
        assert_ne!(first, second);

        for image in [&first, &second] {
            let path = store.resolve(image).unwrap();
            assert!(path.exists());
            assert_eq!(path.parent().unwrap(), store.images_dir());
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("photo_"));
            assert!(name.ends_with(".jpg"));
        }
    }

    #[test]
    fn delete_removes_owned_file_and_is_idempotent() {
        let cache = tempdir().unwrap();
        let store = ScratchStore::new(cache.path());

        let image = store.create_scratch_file().unwrap();
        let path = store.resolve(&image).unwrap();
        assert!(path.exists());

        store.delete(&image);
        assert!(!path.exists());

        // Second delete must be a silent no-op.
        store.delete(&image);
    }

    #[test]
    fn content_ref_deletes_matching_scratch_file() {
        let cache = tempdir().unwrap();
        let store = ScratchStore::new(cache.path());

        let image = store.create_scratch_file().unwrap();
        let path = store.resolve(&image).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();

        // The platform hands back a provider URI wrapping the same file.
        let provider = ImageRef::from_uri(format!(
            "content://app.fileprovider/cache/images/{}",
            name
        ));
        assert_eq!(store.resolve(&provider), Some(path.clone()));

        store.delete(&provider);
        assert!(!path.exists());
    }

    #[test]
    fn foreign_content_ref_resolves_to_none_and_delete_noops() {
        let cache = tempdir().unwrap();
        let store = ScratchStore::new(cache.path());

        let picked = ImageRef::from_uri("content://media/external/12345");
        assert_eq!(store.resolve(&picked), None);
        store.delete(&picked);
    }

    #[test]
    fn unknown_scheme_never_resolves() {
        let cache = tempdir().unwrap();
        let store = ScratchStore::new(cache.path());
        assert_eq!(
            store.resolve(&ImageRef::from_uri("https://example.com/a.jpg")),
            None
        );
    }
}
