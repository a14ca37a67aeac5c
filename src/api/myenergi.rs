use std::str::FromStr;

use digest_auth::AuthContext;
use enumset::EnumSet;
use http::{
    Request,
    Response,
    StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE},
};
use itertools::Itertools;
use serde_json::Value;

use crate::{
    api::{self, LogicalRequest, Requester, Transport, parse_response},
    cache::KeyRule,
    prelude::*,
};

pub const DEFAULT_DOMAIN: &str = "https://s18.myenergi.net";

/// myenergi cloud operation, displayed as its logical name.
#[derive(Debug, derive_more::Display, enumset::EnumSetType)]
pub enum Operation {
    /// Hourly energy totals of a single day.
    #[display("dayhour")]
    DayHour,

    /// Real-time status of all the devices behind the hub.
    #[display("status")]
    Status,
}

impl api::Operation for Operation {
    fn key_rule(self) -> KeyRule {
        match self {
            Self::DayHour => KeyRule::Date,
            Self::Status => KeyRule::Name,
        }
    }

    fn is_live(self) -> bool {
        matches!(self, Self::Status)
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        EnumSet::<Self>::all().iter().find(|operation| operation.to_string() == name).ok_or_else(
            || Error::InvalidName {
                name: name.to_owned(),
                valid: EnumSet::<Self>::all().iter().join(", "),
            },
        )
    }
}

#[derive(Clone, bon::Builder)]
pub struct Config {
    /// Hub serial number, doubles as the digest username.
    #[builder(into)]
    pub serial_number: String,

    /// Digest password.
    #[builder(into)]
    pub api_key: String,

    #[builder(into, default = DEFAULT_DOMAIN.to_owned())]
    pub domain: String,
}

pub struct Api<T> {
    config: Config,
    transport: T,
}

impl<T: Transport> Api<T> {
    pub fn new(config: Config, transport: T) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("MYENERGI_API_KEY"));
        }
        if config.serial_number.trim().is_empty() {
            return Err(Error::Config("MYENERGI_SERIAL_NUMBER"));
        }
        if config.domain.trim().is_empty() {
            return Err(Error::Config("MYENERGI_API_DOMAIN"));
        }
        Ok(Self { config, transport })
    }

    fn path(&self, request: &LogicalRequest<Operation>) -> Result<String> {
        match request.operation() {
            Operation::DayHour => {
                let date = request.params().get("date").and_then(Value::as_str).ok_or_else(|| {
                    Error::InvalidParams {
                        operation: Operation::DayHour.to_string(),
                        reason: "`date` is required".to_owned(),
                    }
                })?;
                Ok(format!("/cgi-jdayhour-Z{}-{date}", self.config.serial_number))
            }
            Operation::Status => Ok("/cgi-jstatus-Z".to_owned()),
        }
    }

    fn build_request(&self, url: &str, authorization: Option<&str>) -> Result<Request<Vec<u8>>> {
        let mut builder = Request::get(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(authorization) = authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        Ok(builder.body(Vec::new())?)
    }

    /// Answer the digest challenge of the unauthenticated response.
    fn authorize(&self, url: &str, path: &str, challenge: &Response<Vec<u8>>) -> Result<String> {
        let failed = |reason: String| Error::Authentication { url: url.to_owned(), reason };
        let www_authenticate = challenge
            .headers()
            .get(WWW_AUTHENTICATE)
            .ok_or_else(|| failed("no `WWW-Authenticate` in the response".to_owned()))?
            .to_str()
            .map_err(|error| failed(error.to_string()))?;
        let mut prompt =
            digest_auth::parse(www_authenticate).map_err(|error| failed(error.to_string()))?;
        let context = AuthContext::new(
            self.config.serial_number.as_str(),
            self.config.api_key.as_str(),
            path,
        );
        let answer = prompt.respond(&context).map_err(|error| failed(error.to_string()))?;
        Ok(answer.to_header_string())
    }
}

impl<T: Transport> Requester for Api<T> {
    type Operation = Operation;

    #[instrument(skip_all, fields(operation = %request.operation()))]
    fn call(&self, request: &LogicalRequest<Operation>) -> Result<Value> {
        let path = self.path(request)?;
        let url = format!("{}{path}", self.config.domain.trim_end_matches('/'));
        debug!(url = %url, "requesting…");

        let response = self.transport.execute(self.build_request(&url, None)?)?;
        let response = if response.status() == StatusCode::UNAUTHORIZED {
            debug!("answering the digest challenge…");
            let authorization = self.authorize(&url, &path, &response)?;
            self.transport.execute(self.build_request(&url, Some(&authorization))?)?
        } else {
            response
        };
        parse_response(url, response)
    }
}
