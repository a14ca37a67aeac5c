use std::path::PathBuf;

use serde_json::Value;

use crate::{
    api::{LogicalRequest, Operation, Requester},
    cache::{CacheKey, Store},
    prelude::*,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Source {
    #[display("cache")]
    Cache,

    #[display("network")]
    Network,
}

/// Fetched response together with where it came from and where it is stashed.
#[derive(Debug)]
pub struct Fetched {
    pub operation: String,
    pub key: CacheKey,
    pub path: PathBuf,
    pub source: Source,
    pub response: Value,
}

/// Serves responses from the [`Store`], calling the requester on a miss.
pub struct Fetcher<R> {
    requester: R,
    store: Store,
}

impl<R: Requester> Fetcher<R> {
    pub const fn new(requester: R, store: Store) -> Self {
        Self { requester, store }
    }

    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Fetch the response, reusing the stashed one if allowed.
    ///
    /// Live operations always go to the network. An unreadable cache entry counts as a miss.
    /// A successful network response overwrites the stashed one.
    #[instrument(skip_all, fields(operation = %request.operation(), use_cache = use_cache))]
    pub fn fetch(
        &self,
        request: &LogicalRequest<R::Operation>,
        use_cache: bool,
    ) -> Result<Fetched> {
        let operation = request.operation();
        let key = request.cache_key();

        if operation.is_live() {
            debug!("live reading, bypassing the cache");
        } else if use_cache && self.store.exists(&key) {
            match self.store.load(&key) {
                Ok(response) => {
                    info!(key = %key, "using the stashed response");
                    return Ok(Fetched {
                        operation: operation.to_string(),
                        path: self.store.path(&key),
                        key,
                        source: Source::Cache,
                        response,
                    });
                }
                Err(error) => {
                    warn!(key = %key, error = ?error, "ignoring the unreadable stashed response");
                }
            }
        }

        info!(key = %key, "fetching…");
        let response = self.requester.call(request)?;
        let path = self.store.save(&key, &response)?;
        Ok(Fetched { operation: operation.to_string(), key, path, source: Source::Network, response })
    }
}
