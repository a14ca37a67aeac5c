mod operation;
pub mod signature;

use chrono::Utc;
use http::{
    Method,
    Request,
    header::{CONTENT_TYPE, USER_AGENT},
};
use serde_json::Value;

pub use self::operation::{Descriptor, Operation, key_for};
use crate::{
    api::{LogicalRequest, Requester, Transport, parse_response},
    prelude::*,
};

pub const DEFAULT_DOMAIN: &str = "https://www.foxesscloud.com";
pub const DEFAULT_API_PREFIX: &str = "/op/v0/";

/// FoxESS Cloud is picky about clients, so pretend to be a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

#[derive(Clone, bon::Builder)]
pub struct Config {
    #[builder(into)]
    pub api_key: String,

    #[builder(into, default = DEFAULT_DOMAIN.to_owned())]
    pub domain: String,

    #[builder(into, default = DEFAULT_API_PREFIX.to_owned())]
    pub api_prefix: String,
}

pub struct Api<T> {
    config: Config,
    transport: T,
}

impl<T: Transport> Api<T> {
    pub fn new(config: Config, transport: T) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("FOX_API_KEY"));
        }
        if config.domain.trim().is_empty() {
            return Err(Error::Config("FOX_API_DOMAIN"));
        }
        Ok(Self { config, transport })
    }

    fn build_request(
        &self,
        request: &LogicalRequest<Operation>,
        timestamp_millis: i64,
    ) -> Result<Request<Vec<u8>>> {
        let operation = request.operation();
        let descriptor = operation.descriptor();
        let path = format!("{}{}", self.config.api_prefix, descriptor.endpoint);
        let mut url = format!("{}{path}", self.config.domain.trim_end_matches('/'));
        let invalid_params = |reason: String| Error::InvalidParams {
            operation: operation.to_string(),
            reason,
        };

        let body = if descriptor.method == Method::GET {
            if !request.params().is_empty() {
                let query = serde_qs::to_string(request.params())
                    .map_err(|error| invalid_params(error.to_string()))?;
                url.push('?');
                url.push_str(&query);
            }
            Vec::new()
        } else {
            serde_json::to_vec(request.params()).map_err(|error| invalid_params(error.to_string()))?
        };

        let mut builder = Request::builder()
            .method(descriptor.method.clone())
            .uri(url)
            .header("token", self.config.api_key.as_str())
            .header("lang", "en")
            .header("timestamp", timestamp_millis.to_string())
            .header("signature", signature::sign(&self.config.api_key, &path, timestamp_millis))
            .header(USER_AGENT, BROWSER_USER_AGENT);
        if descriptor.method == Method::POST {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        Ok(builder.body(body)?)
    }
}

impl<T: Transport> Requester for Api<T> {
    type Operation = Operation;

    #[instrument(skip_all, fields(operation = %request.operation()))]
    fn call(&self, request: &LogicalRequest<Operation>) -> Result<Value> {
        let request = self.build_request(request, Utc::now().timestamp_millis())?;
        let url = request.uri().to_string();
        debug!(method = %request.method(), url = %url, "requesting…");
        let response = parse_response(url, self.transport.execute(request)?)?;

        if let Some(error_code) = response.get("errno").and_then(Value::as_i64)
            && error_code != 0
        {
            let error_message = response.get("msg").and_then(Value::as_str).unwrap_or_default();
            warn!(error_code, error_message, "FoxESS Cloud reported an error");
        }
        Ok(response)
    }
}
