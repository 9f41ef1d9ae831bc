//! Store handles: typed operations over a root or prefixed engine view.

use std::path::PathBuf;

use opensled_codec::{decode, decode_key, encode, encode_key, Value};
use opensled_engine::{Engine, Scan, View};

use crate::key::{normalize, KeyPath};
use crate::Error;

/// What a shaped iteration yields per matching entry.
///
/// The shape follows the `include_key`/`include_value` selection of
/// [`IterOptions`]; `Empty` is yielded when neither side was requested
/// (the iteration still counts entries).
#[derive(Debug, Clone, PartialEq)]
pub enum IterItem {
    /// Key and decoded value.
    Pair(String, Value),
    /// Key only.
    Key(String),
    /// Decoded value only.
    Value(Value),
    /// Neither side requested.
    Empty,
}

/// Iteration filters and shaping flags.
///
/// `prefixes` derive the view for the scan and are consumed: they are NOT
/// reproduced in yielded keys. `starting_by` narrows the scan but IS
/// preserved in yielded keys. Both default to empty; both shaping flags
/// default to true.
#[derive(Debug, Clone)]
pub struct IterOptions {
    pub prefixes: Vec<String>,
    pub starting_by: Vec<String>,
    pub include_key: bool,
    pub include_value: bool,
}

impl Default for IterOptions {
    fn default() -> Self {
        Self {
            prefixes: Vec::new(),
            starting_by: Vec::new(),
            include_key: true,
            include_value: true,
        }
    }
}

impl IterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_starting_by<I, S>(mut self, starting_by: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.starting_by = starting_by.into_iter().map(Into::into).collect();
        self
    }

    /// Yield keys only.
    #[must_use]
    pub fn keys_only(mut self) -> Self {
        self.include_key = true;
        self.include_value = false;
        self
    }

    /// Yield decoded values only.
    #[must_use]
    pub fn values_only(mut self) -> Self {
        self.include_key = false;
        self.include_value = true;
        self
    }
}

/// One handle over an engine view, applying the tagged value codec and the
/// UTF-8 key codec.
///
/// Root handles (opened via [`crate::Registry`]) carry their database path;
/// handles derived through [`StoreHandle::sub_store`] do not and never
/// register as singletons. Derivation is side-effect-free: requesting the
/// same prefix twice yields two equivalent, independent handles.
pub struct StoreHandle {
    view: View,
    db_path: Option<PathBuf>,
}

impl StoreHandle {
    /// Direct root constructor. Fails fast with
    /// [`Error::AlreadyOpen`] when the path is already registered; the
    /// designated accessor returning the cached instance is
    /// [`crate::Registry::get_instance`].
    pub fn open(
        path: impl AsRef<std::path::Path>,
        registry: &crate::Registry,
    ) -> Result<std::sync::Arc<StoreHandle>, Error> {
        registry.open_exclusive(path.as_ref())
    }

    pub(crate) fn root(engine: &Engine) -> StoreHandle {
        StoreHandle {
            view: engine.view(),
            db_path: Some(engine.path().to_path_buf()),
        }
    }

    /// Wrap an existing engine view. Used for derived handles and tests;
    /// such handles never register as singletons.
    pub fn from_view(view: View) -> StoreHandle {
        StoreHandle {
            view,
            db_path: None,
        }
    }

    /// The database path, for root handles.
    pub fn db_path(&self) -> Option<&std::path::Path> {
        self.db_path.as_deref()
    }

    fn derive(&self, prefixes: &[String]) -> View {
        normalize(prefixes)
            .iter()
            .fold(self.view.clone(), |view, segment| view.prefixed(segment))
    }

    /// Point lookup. Returns `None` on miss, the decoded value on hit.
    ///
    /// Sub-store paths are a key-shape error here; use
    /// [`StoreHandle::sub_store`] to address a prefix.
    pub fn get(&self, key: &KeyPath) -> Result<Option<Value>, Error> {
        let (prefixes, leaf) = key.split_value()?;
        let view = self.derive(prefixes);
        match view.get(&encode_key(leaf))? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a value at a key.
    pub fn put(&self, key: &KeyPath, value: &Value) -> Result<(), Error> {
        let (prefixes, leaf) = key.split_value()?;
        let view = self.derive(prefixes);
        view.put(&encode_key(leaf), &encode(value)?)?;
        Ok(())
    }

    /// Point delete. Deleting a missing key is not an error.
    pub fn delete(&self, key: &KeyPath) -> Result<(), Error> {
        let (prefixes, leaf) = key.split_value()?;
        let view = self.derive(prefixes);
        view.delete(&encode_key(leaf))?;
        Ok(())
    }

    /// Factory for the sub-store at a prefix path: a new handle over the
    /// derived view. No I/O happens.
    pub fn sub_store(&self, key: &KeyPath) -> Result<StoreHandle, Error> {
        let prefixes = key.sub_store_prefixes()?;
        Ok(StoreHandle::from_view(self.derive(prefixes)))
    }

    /// Shaped, ordered iteration. Lazy: entries are decoded as the caller
    /// advances. Ordering follows the engine's byte-lexicographic key
    /// order.
    pub fn iter(&self, opts: &IterOptions) -> Result<Iter, Error> {
        let view = self.derive(&opts.prefixes);
        let starting_by = normalize(&opts.starting_by).concat();
        Ok(Iter {
            scan: view.scan(&starting_by),
            include_key: opts.include_key,
            include_value: opts.include_value,
        })
    }

    /// Count entries matching the filters.
    ///
    /// This exhausts a keys-only iteration: O(matching keys), a full scan,
    /// not an index lookup.
    pub fn count(&self, opts: &IterOptions) -> Result<usize, Error> {
        let opts = opts.clone().keys_only();
        let mut n = 0;
        for item in self.iter(&opts)? {
            item?;
            n += 1;
        }
        Ok(n)
    }

    /// Total number of entries in this handle's key range.
    pub fn len(&self) -> Result<usize, Error> {
        self.count(&IterOptions::default())
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()? == 0)
    }

    /// Debug representation of this handle.
    pub fn describe(&self) -> String {
        let path = self
            .db_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<derived>".to_string());
        format!(
            "StoreHandle(db_path='{}', prefix={:?})",
            path,
            String::from_utf8_lossy(self.view.prefix())
        )
    }

    /// Block until all writes so far are durable. Root handle lifecycle
    /// (release) goes through [`crate::Registry::close`].
    pub fn flush(&self) -> Result<(), Error> {
        self.view.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Lazy shaped iteration over a handle's key range.
pub struct Iter {
    scan: Scan,
    include_key: bool,
    include_value: bool,
}

impl Iter {
    fn shape(&self, key: Vec<u8>, value: Vec<u8>) -> Result<IterItem, Error> {
        Ok(match (self.include_key, self.include_value) {
            (true, true) => IterItem::Pair(decode_key(&key)?, decode(&value)?),
            (true, false) => IterItem::Key(decode_key(&key)?),
            (false, true) => IterItem::Value(decode(&value)?),
            (false, false) => IterItem::Empty,
        })
    }
}

impl Iterator for Iter {
    type Item = Result<IterItem, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.scan.next()?;
        Some(match entry {
            Ok((key, value)) => self.shape(key, value),
            Err(e) => Err(e.into()),
        })
    }
}
