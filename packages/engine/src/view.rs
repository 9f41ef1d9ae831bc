//! Open sled databases and prefixed views over their key space.

use std::path::{Path, PathBuf};

use crate::EngineError;

/// An open sled database directory.
///
/// One `Engine` corresponds to one on-disk database. Prefixed sub-views
/// share the same files as their parent - a view is a logical key-range
/// partition, never a separate tree.
pub struct Engine {
    db: sled::Db,
    path: PathBuf,
}

impl Engine {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref().to_path_buf();
        let db = sled::open(&path)?;
        Ok(Self { db, path })
    }

    /// The root view over the whole key space.
    pub fn view(&self) -> View {
        View {
            db: self.db.clone(),
            prefix: Vec::new(),
        }
    }

    /// The filesystem path this engine was opened at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until all writes so far are durable on disk.
    pub fn flush(&self) -> Result<(), EngineError> {
        self.db.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("path", &self.path).finish()
    }
}

/// A restriction of an engine's key space to keys sharing a byte prefix.
///
/// Deriving a view is side-effect-free and read-only with respect to the
/// engine: it only narrows the key range used by subsequent operations.
/// Views are cheap to clone and may be derived freely from multiple threads.
#[derive(Clone)]
pub struct View {
    db: sled::Db,
    prefix: Vec<u8>,
}

impl View {
    /// Derive a narrower view by appending `segment` to this view's prefix.
    #[must_use]
    pub fn prefixed(&self, segment: &[u8]) -> View {
        let mut prefix = Vec::with_capacity(self.prefix.len() + segment.len());
        prefix.extend_from_slice(&self.prefix);
        prefix.extend_from_slice(segment);
        View {
            db: self.db.clone(),
            prefix,
        }
    }

    /// The accumulated byte prefix of this view.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    fn full_key(&self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.prefix.len() + key.len());
        full.extend_from_slice(&self.prefix);
        full.extend_from_slice(key);
        full
    }

    /// Point lookup. Returns `None` when the key is absent.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError> {
        Ok(self.db.get(self.full_key(key))?.map(|v| v.to_vec()))
    }

    /// Point write.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), EngineError> {
        self.db.insert(self.full_key(key), value)?;
        Ok(())
    }

    /// Point delete. Deleting a missing key is not an error.
    pub fn delete(&self, key: &[u8]) -> Result<(), EngineError> {
        self.db.remove(self.full_key(key))?;
        Ok(())
    }

    /// Ordered scan over keys starting with `starting_by` (relative to this
    /// view's prefix).
    ///
    /// Yielded keys have the view prefix stripped but keep `starting_by`,
    /// in byte-lexicographic order.
    pub fn scan(&self, starting_by: &[u8]) -> Scan {
        Scan {
            inner: self.db.scan_prefix(self.full_key(starting_by)),
            strip: self.prefix.len(),
        }
    }

    /// Block until all writes so far are durable on disk.
    pub fn flush(&self) -> Result<(), EngineError> {
        self.db.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View").field("prefix", &self.prefix).finish()
    }
}

/// Lazy ordered iteration over a view's key range.
pub struct Scan {
    inner: sled::Iter,
    strip: usize,
}

impl Iterator for Scan {
    type Item = Result<(Vec<u8>, Vec<u8>), EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        Some(match item {
            Ok((key, value)) => Ok((key[self.strip..].to_vec(), value.to_vec())),
            Err(e) => Err(EngineError::Backend(e)),
        })
    }
}
