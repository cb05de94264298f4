use std::collections::HashMap;

/// The only protocol version this server speaks.
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP request methods.
///
/// The server is read-only, so GET is the single accepted verb. Anything
/// else is rejected by the parser with `UnsupportedMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// Method tokens are case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use vhttpd::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
        }
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Header names are stored in canonical form (see [`canonical_header_key`]).
/// `host` and `close` are derived from the `Host` and `Connection` headers
/// while parsing; the raw values stay in `headers` as well.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The request target (e.g., "/index.html")
    pub target: String,
    /// HTTP version, always "HTTP/1.1" for a parsed request
    pub version: String,
    /// Request headers keyed by canonical name
    pub headers: HashMap<String, String>,
    /// Value of the Host header, empty when absent
    pub host: String,
    /// True iff the Connection header is exactly "close"
    pub close: bool,
}

impl Request {
    /// Retrieves a header value by name.
    ///
    /// The lookup name is canonicalized first, so `"content-type"` and
    /// `"Content-Type"` find the same entry.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&canonical_header_key(key))
            .map(|v| v.as_str())
    }

    /// Determines whether the connection should remain open after the response.
    pub fn keep_alive(&self) -> bool {
        !self.close
    }
}

/// Builder for constructing Request objects.
///
/// Goes through the same header handling as the parser, so `Host` and
/// `Connection` update the derived fields.
pub struct RequestBuilder {
    target: Option<String>,
    headers: HashMap<String, String>,
    host: String,
    close: bool,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            target: None,
            headers: HashMap::new(),
            host: String::new(),
            close: false,
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        let key = canonical_header_key(key.trim());
        let value = value.into();

        match key.as_str() {
            "Host" => self.host = value.clone(),
            "Connection" => self.close = value == "close",
            _ => {}
        }

        self.headers.insert(key, value);
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: Method::GET,
            target: self.target.ok_or("target missing")?,
            version: HTTP_VERSION.to_string(),
            headers: self.headers,
            host: self.host,
            close: self.close,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the canonical form of a header name.
///
/// The first letter and any letter following a hyphen are upper-cased, the
/// rest lower-cased: `content-type` becomes `Content-Type`. Names holding
/// bytes that are not valid in an HTTP token are returned unchanged.
pub fn canonical_header_key(key: &str) -> String {
    if !key.bytes().all(is_token_byte) {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    let mut upper = true;
    for c in key.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_mixed_case() {
        assert_eq!(canonical_header_key("cONTENT-tYPE"), "Content-Type");
        assert_eq!(canonical_header_key("host"), "Host");
        assert_eq!(canonical_header_key("x-forwarded-for"), "X-Forwarded-For");
    }

    #[test]
    fn leaves_non_token_keys_alone() {
        assert_eq!(canonical_header_key("bad key"), "bad key");
        assert_eq!(canonical_header_key("caf\u{e9}"), "caf\u{e9}");
    }
}
