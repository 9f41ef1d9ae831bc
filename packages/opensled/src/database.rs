//! The top-level database facade.
//!
//! One type, two transports: a [`Database`] either holds a local root
//! handle resolved through a [`Registry`] or a [`RemoteStore`] talking to
//! an opensled service. The typed surface is identical either way, so
//! callers switch transports by switching the constructor.

use std::sync::Arc;

use opensled_codec::Value;
use opensled_http::RemoteStore;
use opensled_store::{IterItem, IterOptions, KeyPath, Registry, StoreHandle};

use crate::DbError;

enum Connector {
    Local(Arc<StoreHandle>),
    Remote(RemoteStore),
}

/// A typed, prefix-addressable database.
///
/// Read-only handles reject every write locally, before the operation
/// reaches the engine or the wire. [`Database::sub_store`] derives a
/// facade scoped to a prefix; the derived facade inherits the transport
/// and the read-only flag.
pub struct Database {
    db_path: String,
    read_only: bool,
    connector: Connector,
}

impl Database {
    /// Open a local database, sharing the root handle through the
    /// registry.
    pub fn open(registry: &Registry, db_path: impl Into<String>) -> Result<Database, DbError> {
        let db_path = db_path.into();
        let handle = registry.get_instance(&db_path)?;
        Ok(Database {
            db_path,
            read_only: false,
            connector: Connector::Local(handle),
        })
    }

    /// Open a local database that rejects writes.
    pub fn open_read_only(
        registry: &Registry,
        db_path: impl Into<String>,
    ) -> Result<Database, DbError> {
        let mut db = Database::open(registry, db_path)?;
        db.read_only = true;
        Ok(db)
    }

    /// Address a database served by an opensled service.
    pub fn connect(
        server_address: &str,
        db_path: impl Into<String>,
    ) -> Result<Database, DbError> {
        let db_path = db_path.into();
        let remote = RemoteStore::connect(server_address, db_path.clone())?;
        Ok(Database {
            db_path,
            read_only: false,
            connector: Connector::Remote(remote),
        })
    }

    /// Address a served database, rejecting writes on this side of the
    /// wire.
    pub fn connect_read_only(
        server_address: &str,
        db_path: impl Into<String>,
    ) -> Result<Database, DbError> {
        let mut db = Database::connect(server_address, db_path)?;
        db.read_only = true;
        Ok(db)
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn writable(&self) -> Result<(), DbError> {
        if self.read_only {
            return Err(DbError::NotWritable {
                path: self.db_path.clone(),
            });
        }
        Ok(())
    }

    /// Point lookup. `None` on miss.
    pub fn get(&self, key: &KeyPath) -> Result<Option<Value>, DbError> {
        match &self.connector {
            Connector::Local(handle) => Ok(handle.get(key)?),
            Connector::Remote(remote) => Ok(remote.get(key)?),
        }
    }

    /// Encode and write a value at a key. Rejected on read-only handles.
    pub fn put(&self, key: &KeyPath, value: &Value) -> Result<(), DbError> {
        self.writable()?;
        match &self.connector {
            Connector::Local(handle) => Ok(handle.put(key, value)?),
            Connector::Remote(remote) => Ok(remote.put(key, value)?),
        }
    }

    /// Point delete. Rejected on read-only handles; deleting a missing key
    /// is not an error.
    pub fn delete(&self, key: &KeyPath) -> Result<(), DbError> {
        self.writable()?;
        match &self.connector {
            Connector::Local(handle) => Ok(handle.delete(key)?),
            Connector::Remote(remote) => Ok(remote.delete(key)?),
        }
    }

    /// Shaped, ordered iteration.
    ///
    /// Local iteration is lazy; remote iteration arrives materialized, so
    /// the returned iterator replays an already-buffered list.
    pub fn iter(
        &self,
        opts: &IterOptions,
    ) -> Result<Box<dyn Iterator<Item = Result<IterItem, DbError>> + '_>, DbError> {
        match &self.connector {
            Connector::Local(handle) => {
                let iter = handle.iter(opts)?;
                Ok(Box::new(iter.map(|item| item.map_err(DbError::from))))
            }
            Connector::Remote(remote) => {
                let items = remote.iter(opts)?;
                Ok(Box::new(items.into_iter().map(Ok)))
            }
        }
    }

    /// Count entries matching the filters.
    pub fn count(&self, opts: &IterOptions) -> Result<usize, DbError> {
        match &self.connector {
            Connector::Local(handle) => Ok(handle.count(opts)?),
            Connector::Remote(remote) => Ok(remote.count(opts)?),
        }
    }

    /// Total number of entries in this facade's key range.
    pub fn len(&self) -> Result<usize, DbError> {
        self.count(&IterOptions::default())
    }

    pub fn is_empty(&self) -> Result<bool, DbError> {
        Ok(self.len()? == 0)
    }

    /// The facade scoped to a sub-store prefix. Inherits transport and
    /// read-only flag; no I/O happens.
    pub fn sub_store(&self, key: &KeyPath) -> Result<Database, DbError> {
        let connector = match &self.connector {
            Connector::Local(handle) => Connector::Local(Arc::new(handle.sub_store(key)?)),
            Connector::Remote(remote) => Connector::Remote(remote.sub_store(key)?),
        };
        Ok(Database {
            db_path: self.db_path.clone(),
            read_only: self.read_only,
            connector,
        })
    }

    /// Debug representation of the underlying handle.
    pub fn describe(&self) -> Result<String, DbError> {
        match &self.connector {
            Connector::Local(handle) => Ok(handle.describe()),
            Connector::Remote(remote) => Ok(remote.describe()?),
        }
    }

    /// Block until all local writes so far are durable. A no-op for
    /// remote facades, where durability sits with the service.
    pub fn flush(&self) -> Result<(), DbError> {
        match &self.connector {
            Connector::Local(handle) => Ok(handle.flush()?),
            Connector::Remote(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(dir: &tempfile::TempDir) -> (Registry, Database) {
        let registry = Registry::new();
        let db = Database::open(&registry, dir.path().to_str().unwrap()).unwrap();
        (registry, db)
    }

    #[test]
    fn local_point_operations() {
        let dir = tempfile::tempdir().unwrap();
        let (_registry, db) = local(&dir);

        db.put(&KeyPath::from("k"), &Value::from(1i64)).unwrap();
        assert_eq!(db.get(&KeyPath::from("k")).unwrap(), Some(Value::Int(1)));
        db.delete(&KeyPath::from("k")).unwrap();
        assert!(db.is_empty().unwrap());
    }

    #[test]
    fn read_only_rejects_every_write() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new();

        {
            let writer = Database::open(&registry, dir.path().to_str().unwrap()).unwrap();
            writer.put(&KeyPath::from("k"), &Value::from(1i64)).unwrap();
        }

        let db = Database::open_read_only(&registry, dir.path().to_str().unwrap()).unwrap();
        assert!(db.is_read_only());
        assert_eq!(db.get(&KeyPath::from("k")).unwrap(), Some(Value::Int(1)));

        assert!(matches!(
            db.put(&KeyPath::from("k"), &Value::from(2i64)),
            Err(DbError::NotWritable { .. })
        ));
        assert!(matches!(
            db.delete(&KeyPath::from("k")),
            Err(DbError::NotWritable { .. })
        ));

        // The rejected write never reached the engine.
        assert_eq!(db.get(&KeyPath::from("k")).unwrap(), Some(Value::Int(1)));
    }

    #[test]
    fn sub_store_inherits_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new();
        let db = Database::open_read_only(&registry, dir.path().to_str().unwrap()).unwrap();

        let sub = db.sub_store(&KeyPath::sub_store(["p"])).unwrap();
        assert!(sub.is_read_only());
        assert!(matches!(
            sub.put(&KeyPath::from("k"), &Value::from(1i64)),
            Err(DbError::NotWritable { .. })
        ));
    }

    #[test]
    fn local_iteration_is_lazy_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let (_registry, db) = local(&dir);
        db.put(&KeyPath::value(["b", "k2"]), &Value::from("v2")).unwrap();
        db.put(&KeyPath::value(["b", "k1"]), &Value::from("v1")).unwrap();

        let items: Vec<IterItem> = db
            .iter(&IterOptions::new().with_prefixes(["b"]))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(
            items,
            vec![
                IterItem::Pair("k1".to_string(), Value::from("v1")),
                IterItem::Pair("k2".to_string(), Value::from("v2")),
            ]
        );
        assert_eq!(db.count(&IterOptions::new().with_prefixes(["b"])).unwrap(), 2);
    }

    #[test]
    fn two_opens_share_the_registered_handle() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new();
        let a = Database::open(&registry, dir.path().to_str().unwrap()).unwrap();
        let b = Database::open(&registry, dir.path().to_str().unwrap()).unwrap();

        a.put(&KeyPath::from("k"), &Value::from("v")).unwrap();
        assert_eq!(b.get(&KeyPath::from("k")).unwrap(), Some(Value::from("v")));
    }
}
