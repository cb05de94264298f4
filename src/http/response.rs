use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::http::request::{HTTP_VERSION, Request};
use crate::http::vhost::Resolved;

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): file found, body follows
/// - `BadRequest` (400): request could not be parsed, connection closes
/// - `NotFound` (404): host or file could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use vhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use vhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// An HTTP response waiting to be written.
///
/// Headers live in a `BTreeMap`, so they always serialize in sorted order no
/// matter how they were inserted. The body is never held in memory here;
/// `file_path` names the file the writer streams for a 200.
#[derive(Debug)]
pub struct Response {
    /// Protocol version for the status line
    pub version: &'static str,
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers, sorted by name
    pub headers: BTreeMap<String, String>,
    /// The request this answers; `None` when the request never parsed
    pub request: Option<Request>,
    /// File to send as the body
    pub file_path: Option<PathBuf>,
}

impl Response {
    fn new(status: StatusCode) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Date".to_string(), httpdate::fmt_http_date(SystemTime::now()));

        Self {
            version: HTTP_VERSION,
            status,
            headers,
            request: None,
            file_path: None,
        }
    }

    /// Adds or replaces a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    fn for_request(mut self, request: Request) -> Self {
        if request.close {
            self.headers
                .insert("Connection".to_string(), "close".to_string());
        }
        self.request = Some(request);
        self
    }

    /// Creates a 200 OK response that serves `file`.
    pub fn ok(request: Request, file: Resolved) -> Self {
        let content_type = mime_guess::from_path(&file.path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        let mut response = Self::new(StatusCode::Ok)
            .with_header("Content-Length", file.size.to_string())
            .with_header("Content-Type", content_type)
            .with_header("Last-Modified", httpdate::fmt_http_date(file.modified))
            .for_request(request);
        response.file_path = Some(file.path);
        response
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(request: Request) -> Self {
        Self::new(StatusCode::NotFound).for_request(request)
    }

    /// Creates a 400 Bad Request response. Always closes the connection.
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BadRequest).with_header("Connection", "close")
    }

    /// Whether the connection must close once this response is written.
    pub fn closes_connection(&self) -> bool {
        self.headers.get("Connection").map(String::as_str) == Some("close")
    }

    /// Whether the writer sends `file_path` as the body.
    pub fn has_body(&self) -> bool {
        self.status == StatusCode::Ok && self.file_path.is_some()
    }
}
