//! Blocking remote store client.
//!
//! Mirrors the local [`opensled_store::StoreHandle`] surface over the HTTP
//! facade: typed values are encoded to their tagged blob on this side of
//! the boundary and travel base64-encoded. Iteration is materialized: the
//! service answers with the complete item list in one response.

use reqwest::blocking::{Client, Response};
use url::Url;

use opensled_codec::{blob_from_base64, blob_to_base64, decode, encode, Value};
use opensled_store::{IterItem, IterOptions, KeyPath};

use crate::types::WireItem;
use crate::Error;

/// A store handle backed by an opensled HTTP service.
///
/// Each handle addresses one database path on the server, optionally under
/// a prefix chain. [`RemoteStore::sub_store`] extends the chain without any
/// request; the prefixes only travel with the operations that use them.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    server_address: Url,
    db_path: String,
    prefixes: Vec<String>,
}

impl RemoteStore {
    /// Connect to a service and address a database path on it.
    ///
    /// Probes the service once so an unreachable address or a bad database
    /// path fails here instead of on the first operation.
    pub fn connect(server_address: &str, db_path: impl Into<String>) -> Result<Self, Error> {
        let store = RemoteStore {
            client: Client::new(),
            server_address: Url::parse(server_address)?,
            db_path: db_path.into(),
            prefixes: Vec::new(),
        };
        store.describe()?;
        Ok(store)
    }

    /// The database path this handle addresses on the server.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// The prefix chain carried by this handle.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    fn endpoint(&self, name: &str) -> Result<Url, Error> {
        Ok(self.server_address.join(name)?)
    }

    /// Query pairs every operation carries: the database path and this
    /// handle's prefix chain, in order.
    fn base_query(&self, extra_prefixes: &[String]) -> Vec<(&'static str, String)> {
        let mut query = vec![("dbpath", self.db_path.clone())];
        for prefix in self.prefixes.iter().chain(extra_prefixes) {
            query.push(("prefixes", prefix.clone()));
        }
        query
    }

    fn check(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(Error::RemoteStatus {
            status: status.as_u16(),
            body,
        })
    }

    /// Point lookup. `None` on miss.
    pub fn get(&self, key: &KeyPath) -> Result<Option<Value>, Error> {
        let (prefixes, leaf) = key.split_value()?;
        let mut query = self.base_query(prefixes);
        query.push(("key", leaf.to_string()));

        let response = self
            .client
            .get(self.endpoint("getitem")?)
            .query(&query)
            .send()?;
        let body = Self::check(response)?.text()?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(decode(&blob_from_base64(&body)?)?))
    }

    /// Encode and write a value at a key.
    pub fn put(&self, key: &KeyPath, value: &Value) -> Result<(), Error> {
        let (prefixes, leaf) = key.split_value()?;
        let mut query = self.base_query(prefixes);
        query.push(("key", leaf.to_string()));

        let response = self
            .client
            .post(self.endpoint("setitem")?)
            .query(&query)
            .body(blob_to_base64(&encode(value)?))
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    /// Point delete. Deleting a missing key is not an error.
    pub fn delete(&self, key: &KeyPath) -> Result<(), Error> {
        let (prefixes, leaf) = key.split_value()?;
        let mut query = self.base_query(prefixes);
        query.push(("key", leaf.to_string()));

        let response = self
            .client
            .delete(self.endpoint("delitem")?)
            .query(&query)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    /// Shaped, ordered iteration.
    ///
    /// The service materializes the full item list before answering, so
    /// this buffers every matching entry in memory on both sides.
    pub fn iter(&self, opts: &IterOptions) -> Result<Vec<IterItem>, Error> {
        let mut query = self.base_query(&opts.prefixes);
        for segment in &opts.starting_by {
            query.push(("starting_by", segment.clone()));
        }
        query.push(("include_key", opts.include_key.to_string()));
        query.push(("include_value", opts.include_value.to_string()));

        let response = self
            .client
            .get(self.endpoint("iterator")?)
            .query(&query)
            .send()?;
        let items: Vec<WireItem> = Self::check(response)?
            .json()
            .map_err(|e| Error::response(e.to_string()))?;
        items.into_iter().map(WireItem::into_item).collect()
    }

    /// Count entries matching the filters, server-side.
    pub fn count(&self, opts: &IterOptions) -> Result<usize, Error> {
        let mut query = self.base_query(&opts.prefixes);
        for segment in &opts.starting_by {
            query.push(("starting_by", segment.clone()));
        }

        let response = self
            .client
            .get(self.endpoint("dblen")?)
            .query(&query)
            .send()?;
        let body = Self::check(response)?.text()?;
        body.trim()
            .parse()
            .map_err(|_| Error::response(format!("expected a count, got {body:?}")))
    }

    /// Total number of entries under this handle's prefix chain.
    pub fn len(&self) -> Result<usize, Error> {
        self.count(&IterOptions::default())
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()? == 0)
    }

    /// The handle at an extended prefix chain. No request happens.
    pub fn sub_store(&self, key: &KeyPath) -> Result<RemoteStore, Error> {
        let added = key.sub_store_prefixes()?;
        let mut prefixes = self.prefixes.clone();
        prefixes.extend(added.iter().cloned());
        Ok(RemoteStore {
            client: self.client.clone(),
            server_address: self.server_address.clone(),
            db_path: self.db_path.clone(),
            prefixes,
        })
    }

    /// The service's debug representation of this handle's view.
    pub fn describe(&self) -> Result<String, Error> {
        let response = self
            .client
            .get(self.endpoint("repr")?)
            .query(&self.base_query(&[]))
            .send()?;
        Ok(Self::check(response)?.text()?)
    }
}
