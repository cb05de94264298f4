use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::parser::ParseError;

/// Longest line accepted, not counting the CRLF.
pub const MAX_LINE_LEN: usize = 8 * 1024;

/// Reads one CRLF-terminated line, returning it without the terminator.
///
/// Bytes are accumulated across as many underlying reads as it takes to see
/// `\r\n`. A bare `\n` does not end the line; it is kept and reading
/// continues. If the stream ends first the result is
/// [`ParseError::IncompleteLine`]. A line longer than [`MAX_LINE_LEN`] fails
/// with [`ParseError::LineTooLong`] without buffering the rest of it. I/O
/// errors are passed through untouched.
pub async fn read_line<R>(reader: &mut R) -> Result<String, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let max = MAX_LINE_LEN + 2;
    let mut line = Vec::new();

    loop {
        // line.len() < max holds here, so the limit is never zero.
        let limit = (max - line.len()) as u64;
        let n = (&mut *reader)
            .take(limit)
            .read_until(b'\n', &mut line)
            .await?;

        if n == 0 {
            return Err(ParseError::IncompleteLine);
        }

        if line.ends_with(b"\r\n") {
            line.truncate(line.len() - 2);
            return Ok(String::from_utf8_lossy(&line).into_owned());
        }

        if line.len() >= max {
            return Err(ParseError::LineTooLong(MAX_LINE_LEN));
        }

        if !line.ends_with(b"\n") {
            return Err(ParseError::IncompleteLine);
        }
    }
}
