//! The HTTP request model handed to the networking gateway.

use error_stack::ResultExt;
use masking::{Maskable, Secret};
use serde::{Deserialize, Serialize};

use crate::errors;

/// Header set carried by a [`Request`]; values that hold credentials or
/// tokens are masked.
pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

/// HTTP method, serialized in wire casing.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

/// A fully built request, ready for the gateway to perform.
#[derive(Debug)]
pub struct Request {
    /// Absolute URL.
    pub url: String,
    /// Header set, masked where sensitive.
    pub headers: Headers,
    /// HTTP method.
    pub method: Method,
    /// JSON body, if any; held masked so request logging cannot leak it.
    pub body: Option<RequestBody>,
}

impl Request {
    /// Create a request with no headers or body.
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: String::from(url),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    /// Add a single header.
    pub fn add_header(&mut self, header: &str, value: Maskable<String>) {
        self.headers.insert((String::from(header), value));
    }

    /// Set the request body.
    pub fn set_body(&mut self, body: RequestBody) {
        self.body.replace(body);
    }
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
    url: String,
    headers: Headers,
    method: Method,
    body: Option<RequestBody>,
}

impl RequestBuilder {
    /// Start building a GET request with an empty URL.
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::with_capacity(1024),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    /// Set the URL.
    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    /// Set the method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a single header.
    pub fn header(mut self, header: &str, value: &str) -> Self {
        self.headers.insert((header.into(), value.into()));
        self
    }

    /// Add a batch of headers.
    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Attach a body.
    pub fn set_body(mut self, body: RequestBody) -> Self {
        self.body.replace(body);
        self
    }

    /// Finish building.
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A JSON-encoded request body, masked in debug output.
#[derive(Clone, Debug)]
pub struct RequestBody(Secret<String>);

impl RequestBody {
    /// Serialize `body` to JSON. Failures surface as [`errors::ParsingError`]
    /// so the caller can refuse the request before anything leaves the
    /// process.
    pub fn from_json<T>(body: &T) -> errors::CustomResult<Self, errors::ParsingError>
    where
        T: Serialize + std::fmt::Debug,
    {
        let encoded = serde_json::to_string(body)
            .change_context(errors::ParsingError)
            .attach_printable("Unable to encode request body to JSON")?;
        Ok(Self(Secret::new(encoded)))
    }

    /// The encoded JSON text.
    pub fn get_inner(&self) -> &str {
        use masking::PeekInterface;

        self.0.peek()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_debug_is_masked() {
        #[derive(Debug, Serialize)]
        struct Payload {
            card_number: &'static str,
        }

        let body = RequestBody::from_json(&Payload {
            card_number: "4242424242424242",
        })
        .expect("encode");
        assert!(!format!("{body:?}").contains("4242"));
    }

    #[test]
    fn builder_collects_headers() {
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url("https://api.test.example.com/x")
            .header("Accept", "application/json")
            .build();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.headers.len(), 1);
    }
}
