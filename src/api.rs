pub mod foxess;
pub mod myenergi;
mod transport;

use std::{fmt::Display, str::FromStr};

use http::Response;
use serde_json::Value;

#[cfg(test)]
pub use self::transport::testing;
pub use self::transport::{Transport, new_agent};
use crate::{
    cache::{CacheKey, KeyRule},
    prelude::*,
};

/// Request parameters: query string for `GET`, JSON body for `POST`.
pub type Params = serde_json::Map<String, Value>;

/// A remote operation of a vendor API.
pub trait Operation: Copy + Display + FromStr<Err = Error> {
    fn key_rule(self) -> KeyRule;

    /// Live readings are only meaningful in real time and always bypass the cache.
    fn is_live(self) -> bool;

    fn cache_key(self, params: &Params) -> CacheKey {
        self.key_rule().derive(&self.to_string(), params)
    }
}

#[derive(Clone, Debug)]
pub struct LogicalRequest<O> {
    operation: O,
    params: Params,
}

impl<O: Operation> LogicalRequest<O> {
    pub const fn new(operation: O, params: Params) -> Self {
        Self { operation, params }
    }

    pub fn without_params(operation: O) -> Self {
        Self::new(operation, Params::new())
    }

    pub const fn operation(&self) -> O {
        self.operation
    }

    pub const fn params(&self) -> &Params {
        &self.params
    }

    pub fn cache_key(&self) -> CacheKey {
        self.operation.cache_key(&self.params)
    }
}

/// Performs the actual remote call for a vendor.
pub trait Requester {
    type Operation: Operation;

    fn call(&self, request: &LogicalRequest<Self::Operation>) -> Result<Value>;
}

/// Fail on non-2xx, otherwise parse the body as is.
fn parse_response(url: String, response: Response<Vec<u8>>) -> Result<Value> {
    let status = response.status();
    let body = response.into_body();
    if !status.is_success() {
        return Err(Error::Api { url, status, body: String::from_utf8_lossy(&body).into_owned() });
    }
    serde_json::from_slice(&body).map_err(|source| Error::InvalidJson { url, source })
}
