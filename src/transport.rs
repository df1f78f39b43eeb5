use std::fmt;
use std::io::Read;

use indexmap::IndexMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully formed HTTP request, independent of any HTTP library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Response handed back by a [`Transport`]. Dropping it closes the body.
pub struct Response {
    pub status: u16,
    pub body: Box<dyn Read + Send>,
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// One HTTP round trip. Connection reuse, TLS and timeouts belong to the
/// implementation; the client never retries.
pub trait Transport {
    fn round_trip(&self, request: Request) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn round_trip(&self, request: Request) -> Result<Response> {
        (**self).round_trip(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn round_trip(&self, request: Request) -> Result<Response> {
        (**self).round_trip(request)
    }
}

/// [`Transport`] over a blocking `ureq` agent. Non-success statuses are
/// reported as [`Error::HttpStatus`].
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(ureq::AgentBuilder::new().build())
    }
}

impl Transport for UreqTransport {
    fn round_trip(&self, request: Request) -> Result<Response> {
        let mut call = self.agent.request(request.method.as_str(), &request.url);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }
        let result = match request.method {
            Method::Get => call.call(),
            Method::Post => call.send_bytes(&request.body),
        };
        match result {
            Ok(response) => Ok(Response {
                status: response.status(),
                body: Box::new(response.into_reader()),
            }),
            Err(ureq::Error::Status(code, _)) => Err(Error::HttpStatus(code)),
            Err(err) => Err(Error::Transport(Box::new(err))),
        }
    }
}
