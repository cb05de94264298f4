use std::collections::HashMap;
use std::io;

use thiserror::Error;
use tokio::io::AsyncBufRead;

use crate::http::line::read_line;
use crate::http::request::{HTTP_VERSION, Method, Request, canonical_header_key};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("stream ended before a complete line")]
    IncompleteLine,

    #[error("line longer than {0} bytes")]
    LineTooLong(usize),

    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("unsupported method: {0:?}")]
    UnsupportedMethod(String),

    #[error("invalid request target: {0:?}")]
    InvalidTarget(String),

    #[error("unsupported protocol: {0:?}")]
    UnsupportedProtocol(String),

    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// True when the error came from the byte stream itself rather than
    /// from bytes that failed validation. These end the connection without
    /// a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ParseError::IncompleteLine | ParseError::Io(_))
    }
}

/// Reads one request (request line plus header block) from `reader`.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let line = read_line(reader).await?;
    let (method, target, version) = parse_request_line(&line)?;

    let mut headers = HashMap::new();
    let mut host = String::new();
    let mut close = false;

    loop {
        let line = read_line(reader).await?;
        if line.is_empty() {
            break;
        }

        let (key, value) = parse_header_line(&line)?;
        match key.as_str() {
            "Host" => host = value.clone(),
            "Connection" => close = value == "close",
            _ => {}
        }
        headers.insert(key, value);
    }

    Ok(Request {
        method,
        target,
        version,
        headers,
        host,
        close,
    })
}

/// Splits `<METHOD> <target> <version>` and validates each token.
///
/// The line is split into at most three parts on single spaces and each part
/// is trimmed, so trailing whitespace after the version is tolerated. An
/// empty part (missing token or doubled space) makes the line malformed.
pub fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
    let parts: Vec<&str> = line.splitn(3, ' ').map(str::trim).collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    };
    if method.is_empty() || target.is_empty() || version.is_empty() {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    }

    let method =
        Method::from_str(method).ok_or_else(|| ParseError::UnsupportedMethod(method.to_string()))?;

    if !target.starts_with('/') {
        return Err(ParseError::InvalidTarget(target.to_string()));
    }

    if version != HTTP_VERSION {
        return Err(ParseError::UnsupportedProtocol(version.to_string()));
    }

    Ok((method, target.to_string(), version.to_string()))
}

/// Splits a header line on its first colon into a canonical key and a
/// trimmed value.
pub fn parse_header_line(line: &str) -> Result<(String, String), ParseError> {
    let (key, value) = line
        .split_once(':')
        .ok_or_else(|| ParseError::MalformedHeaderLine(line.to_string()))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::MalformedHeaderLine(line.to_string()));
    }

    Ok((canonical_header_key(key), value.trim().to_string()))
}
