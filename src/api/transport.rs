use std::time::Duration;

use http::{Request, Response};
use ureq::Agent;

use crate::prelude::*;

/// Executes a single HTTP exchange.
///
/// Non-2xx responses are returned as-is, only the failure to get any response is an error.
pub trait Transport {
    fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        (**self).execute(request)
    }
}

/// Build the default blocking client.
pub fn new_agent() -> Agent {
    Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(15)))
        .http_status_as_error(false)
        .build()
        .into()
}

impl Transport for Agent {
    fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let url = request.uri().to_string();
        let response = if request.body().is_empty() {
            self.run(request.map(|_| ()))
        } else {
            self.run(request)
        };
        let (parts, mut body) = response
            .map_err(|error| Error::Transport { url: url.clone(), source: error.into() })?
            .into_parts();
        let body =
            body.read_to_vec().map_err(|error| Error::Transport { url, source: error.into() })?;
        Ok(Response::from_parts(parts, body))
    }
}

#[cfg(test)]
pub mod testing {
    use std::{
        cell::{Ref, RefCell},
        collections::VecDeque,
    };

    use http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE};

    use super::*;

    /// Replays canned responses in order and records every request it gets.
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: RefCell<VecDeque<Response<Vec<u8>>>>,
        requests: RefCell<Vec<Request<Vec<u8>>>>,
    }

    impl ScriptedTransport {
        #[must_use]
        pub fn respond(self, status: u16, body: &str) -> Self {
            let mut response = Response::new(body.as_bytes().to_vec());
            *response.status_mut() = StatusCode::from_u16(status).unwrap();
            self.responses.borrow_mut().push_back(response);
            self
        }

        #[must_use]
        pub fn challenge(self, www_authenticate: &str) -> Self {
            let mut response = Response::new(Vec::new());
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_str(www_authenticate).unwrap());
            self.responses.borrow_mut().push_back(response);
            self
        }

        pub fn requests(&self) -> Ref<'_, Vec<Request<Vec<u8>>>> {
            self.requests.borrow()
        }

        pub fn n_requests(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
            let url = request.uri().to_string();
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| Error::Transport { url, source: "connection reset".into() })
        }
    }
}
