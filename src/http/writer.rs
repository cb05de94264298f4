use std::io;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

fn serialize_head(resp: &Response) -> BytesMut {
    let mut buf = BytesMut::with_capacity(256);

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        resp.version,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.put_slice(status_line.as_bytes());

    // Headers, already sorted by the map
    for (k, v) in &resp.headers {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf
}

/// Writes one response to a stream: the head first, then the file body
/// for a 200. Every step is flushed and the first failure aborts.
pub struct ResponseWriter<'a> {
    response: &'a Response,
    head: BytesMut,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(response: &'a Response) -> Self {
        Self {
            response,
            head: serialize_head(response),
        }
    }

    /// The serialized status line, headers and blank line.
    pub fn head(&self) -> &[u8] {
        &self.head
    }

    pub async fn write_to_stream<W>(&self, stream: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        write_all(stream, &self.head).await?;
        stream.flush().await?;

        if !self.response.has_body() {
            return Ok(());
        }

        if let Some(path) = &self.response.file_path {
            // The handle is opened and closed inside `read`.
            let body = tokio::fs::read(path).await?;
            write_all(stream, &body).await?;
            stream.flush().await?;
        }

        Ok(())
    }
}

async fn write_all<W>(stream: &mut W, mut buf: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while !buf.is_empty() {
        let n = stream.write(buf).await?;

        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "connection closed while writing",
            ));
        }

        buf = &buf[n..];
    }

    Ok(())
}
