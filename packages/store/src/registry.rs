//! Root-handle registry: one shared handle per database path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use opensled_engine::Engine;

use crate::{Error, StoreHandle};

/// Explicit registry of open root handles, keyed by the database path as
/// given.
///
/// The check-and-insert runs under one mutex, so two threads racing to open
/// the same path observe a single winner and share its handle. Keys are not
/// canonicalized (the directory may not exist before the first open), so a
/// database path must be spelled consistently; two spellings of one
/// directory fail at the engine's file lock, not here. Handles derived
/// through [`StoreHandle::sub_store`] never register.
#[derive(Default)]
pub struct Registry {
    handles: Mutex<HashMap<PathBuf, Arc<StoreHandle>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared root handle for a path, opening the engine on first use.
    ///
    /// Repeated calls with the same path return the same handle.
    pub fn get_instance(&self, path: impl AsRef<Path>) -> Result<Arc<StoreHandle>, Error> {
        let key = path.as_ref().to_path_buf();
        let mut handles = self.handles.lock().unwrap();
        if let Some(handle) = handles.get(&key) {
            return Ok(Arc::clone(handle));
        }
        let handle = Arc::new(open_root(path.as_ref())?);
        handles.insert(key, Arc::clone(&handle));
        Ok(handle)
    }

    /// Open a path that must not be registered yet. The companion of
    /// [`Registry::get_instance`] for callers that want a fresh handle or
    /// an error, never a cached one.
    pub(crate) fn open_exclusive(&self, path: &Path) -> Result<Arc<StoreHandle>, Error> {
        let key = path.to_path_buf();
        let mut handles = self.handles.lock().unwrap();
        if handles.contains_key(&key) {
            return Err(Error::AlreadyOpen { path: key });
        }
        let handle = Arc::new(open_root(path)?);
        handles.insert(key, Arc::clone(&handle));
        Ok(handle)
    }

    /// Whether a root handle is registered for a path.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.handles.lock().unwrap().contains_key(path.as_ref())
    }

    /// Flush and deregister the handle for a path. A later
    /// [`Registry::get_instance`] reopens the engine.
    ///
    /// Closing an unregistered path is not an error.
    pub fn close(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let removed = self.handles.lock().unwrap().remove(path.as_ref());
        if let Some(handle) = removed {
            handle.flush()?;
        }
        Ok(())
    }

    /// The paths currently registered.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.handles.lock().unwrap().keys().cloned().collect()
    }
}

fn open_root(path: &Path) -> Result<StoreHandle, Error> {
    let engine = Engine::open(path)?;
    Ok(StoreHandle::root(&engine))
}
