use crate::http::request::{Method, Request};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing was received
    Empty,
    /// Bytes were not valid UTF-8
    InvalidEncoding,
    /// Request line has fewer than two tokens
    MissingTarget,
    /// Method token is anything other than `GET`
    UnsupportedMethod,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::Empty => "empty request",
            ParseError::InvalidEncoding => "request is not valid UTF-8",
            ParseError::MissingTarget => "request line has no target",
            ParseError::UnsupportedMethod => "unsupported method",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Parses the request line out of one receive buffer.
///
/// Only the first line and its first two tokens are looked at. Whatever
/// follows (headers, a body, a second pipelined request) is ignored.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    let text = std::str::from_utf8(buf).map_err(|_| ParseError::InvalidEncoding)?;

    let request_line = text.split(is_line_break).next().ok_or(ParseError::MissingTarget)?;
    let mut parts = request_line
        .split(is_token_separator)
        .filter(|part| !part.is_empty());

    let method_str = parts.next().ok_or(ParseError::MissingTarget)?;
    let target = parts.next().ok_or(ParseError::MissingTarget)?;

    let method = Method::from_token(method_str).ok_or(ParseError::UnsupportedMethod)?;

    Ok(Request {
        method,
        path: target.trim_start_matches('/').to_string(),
    })
}

/// Any of these ends the request line, not only `\n`. A first line of
/// `GET\r/index.html` is therefore a single token.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Unicode whitespace plus the ASCII unit separator.
fn is_token_separator(c: char) -> bool {
    c.is_whitespace() || c == '\x1f'
}
