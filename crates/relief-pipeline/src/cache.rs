//! Distance-field caching.
//!
//! The distance field is recomputed only when the mask or grid resolution
//! changes; otherwise it is reused from memory or, when a backing path is
//! configured, from disk. The blob format carries only the resolution, so
//! identity keying (which scene/mask a blob belongs to) is the caller's job
//! via the choice of path. A stored blob whose dimensions disagree with the
//! current grid is rejected and the field recomputed.

use std::path::{Path, PathBuf};

use relief_grid::{CellMask, DistanceField};

/// How the last [`FieldCache::obtain`] call produced its field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    /// No stage needed the field this run.
    NotNeeded,
    /// Reused from memory.
    Memory,
    /// Loaded from the backing file.
    LoadedFromDisk,
    /// Computed fresh (and persisted when a backing path is set).
    Computed,
}

/// In-memory distance-field cache with optional disk persistence.
#[derive(Debug, Default)]
pub struct FieldCache {
    path: Option<PathBuf>,
    field: Option<DistanceField>,
}

impl FieldCache {
    /// A cache that lives only for this process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A cache backed by a blob file at `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            field: None,
        }
    }

    /// The currently cached field, if any.
    pub fn field(&self) -> Option<&DistanceField> {
        self.field.as_ref()
    }

    /// Drop the cached field and delete the backing file. Call when the
    /// mask changed under an unchanged resolution; the blob cannot tell.
    pub fn invalidate(&mut self) {
        self.field = None;
        if let Some(path) = &self.path
            && path.exists()
            && let Err(err) = std::fs::remove_file(path)
        {
            log::warn!("failed to delete cached distance field {path:?}: {err}");
        }
    }

    /// Get the distance field for the given grid, computing it only when no
    /// usable cached copy exists.
    pub fn obtain<M: CellMask + ?Sized>(
        &mut self,
        width: usize,
        height: usize,
        mask: &M,
    ) -> (&DistanceField, CacheStatus) {
        match self.field.take() {
            Some(field) if field.width() == width && field.height() == height => {
                (self.field.insert(field), CacheStatus::Memory)
            }
            _ => {
                let (field, status) =
                    load_or_compute(self.path.as_deref(), width, height, mask);
                (self.field.insert(field), status)
            }
        }
    }
}

fn load_or_compute<M: CellMask + ?Sized>(
    path: Option<&Path>,
    width: usize,
    height: usize,
    mask: &M,
) -> (DistanceField, CacheStatus) {
    if let Some(path) = path
        && let Ok(bytes) = std::fs::read(path)
    {
        match DistanceField::from_bytes(&bytes) {
            Ok(field) if field.width() == width && field.height() == height => {
                log::info!("distance field loaded from {path:?}");
                return (field, CacheStatus::LoadedFromDisk);
            }
            Ok(field) => {
                log::warn!(
                    "cached distance field is {}x{}, grid is {width}x{height}; recomputing",
                    field.width(),
                    field.height()
                );
            }
            Err(err) => {
                log::warn!("cached distance field at {path:?} is unreadable: {err}; recomputing");
            }
        }
    }

    let field = DistanceField::compute(width, height, mask);
    if let Some(path) = path {
        match std::fs::write(path, field.to_bytes()) {
            Ok(()) => log::info!("distance field persisted to {path:?}"),
            Err(err) => log::warn!("failed to persist distance field to {path:?}: {err}"),
        }
    }
    (field, CacheStatus::Computed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_grid::GridMask;

    fn masked(width: usize, height: usize) -> GridMask {
        let mut mask = GridMask::all_free(width, height);
        mask.protect(width / 2, height / 2);
        mask
    }

    #[test]
    fn test_memory_hit_after_compute() {
        let mask = masked(8, 8);
        let mut cache = FieldCache::in_memory();
        let (_, first) = cache.obtain(8, 8, &mask);
        assert_eq!(first, CacheStatus::Computed);
        let (_, second) = cache.obtain(8, 8, &mask);
        assert_eq!(second, CacheStatus::Memory);
    }

    #[test]
    fn test_resolution_change_recomputes() {
        let mut cache = FieldCache::in_memory();
        let (_, first) = cache.obtain(8, 8, &masked(8, 8));
        assert_eq!(first, CacheStatus::Computed);
        let (field, second) = cache.obtain(16, 16, &masked(16, 16));
        assert_eq!(second, CacheStatus::Computed);
        assert_eq!(field.width(), 16);
    }

    #[test]
    fn test_disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.bin");
        let mask = masked(8, 8);

        let mut writer = FieldCache::with_path(&path);
        let (computed, status) = writer.obtain(8, 8, &mask);
        assert_eq!(status, CacheStatus::Computed);
        let expected = computed.clone();

        let mut reader = FieldCache::with_path(&path);
        let (loaded, status) = reader.obtain(8, 8, &mask);
        assert_eq!(status, CacheStatus::LoadedFromDisk);
        assert_eq!(*loaded, expected);
    }

    #[test]
    fn test_dimension_mismatch_on_disk_recomputes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.bin");

        let mut writer = FieldCache::with_path(&path);
        writer.obtain(4, 4, &masked(4, 4));

        let mut reader = FieldCache::with_path(&path);
        let (field, status) = reader.obtain(8, 8, &masked(8, 8));
        assert_eq!(status, CacheStatus::Computed);
        assert_eq!(field.width(), 8);
    }

    #[test]
    fn test_corrupt_blob_recomputes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.bin");
        std::fs::write(&path, [1, 2, 3]).unwrap();

        let mut cache = FieldCache::with_path(&path);
        let (_, status) = cache.obtain(4, 4, &masked(4, 4));
        assert_eq!(status, CacheStatus::Computed);
    }

    #[test]
    fn test_invalidate_drops_memory_and_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.bin");
        let mask = masked(4, 4);

        let mut cache = FieldCache::with_path(&path);
        cache.obtain(4, 4, &mask);
        assert!(path.exists());

        cache.invalidate();
        assert!(cache.field().is_none());
        assert!(!path.exists());

        let (_, status) = cache.obtain(4, 4, &mask);
        assert_eq!(status, CacheStatus::Computed);
    }
}
