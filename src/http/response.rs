use bytes::Bytes;

use crate::static_files::ResourceOutcome;

const CONTENT_TYPE_HTML: &str = "text/html";
const BAD_REQUEST_BODY: &[u8] = b"<h1>400 Bad Request</h1>";
const NOT_FOUND_BODY: &[u8] = b"<h1>404 Not Found</h1>";

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): file found and returned
/// - `BadRequest` (400): request line could not be used
/// - `NotFound` (404): no readable regular file at the path
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
    /// # use docserve::http::response::StatusCode;
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
    /// # use docserve::http::response::StatusCode;
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

/// A complete HTTP response ready to be framed and sent.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in the order they are written
    pub headers: Vec<(String, String)>,
    /// Response body, sent verbatim
    pub body: Bytes,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// Unlike most builders this one adds nothing on its own: no
/// `Content-Length`, no `Date`. What you set is exactly what gets framed.
///
/// # Example
///
/// ```
/// # use docserve::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body("<p>hi</p>")
///     .build();
/// assert_eq!(response.headers.len(), 1);
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Adds or replaces a header. A replaced header keeps its position.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// 200 OK carrying file content as `text/html`.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", CONTENT_TYPE_HTML)
            .body(body)
            .build()
    }

    /// 404 Not Found with the fixed HTML body.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .body(Bytes::from_static(NOT_FOUND_BODY))
            .build()
    }

    /// 400 Bad Request with the fixed HTML body.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .body(Bytes::from_static(BAD_REQUEST_BODY))
            .build()
    }

    /// Maps a resolver result for a well-formed request to its response.
    pub fn from_outcome(outcome: ResourceOutcome) -> Self {
        match outcome {
            ResourceOutcome::Found(content) => Self::ok(content),
            ResourceOutcome::NotFound => Self::not_found(),
        }
    }
}
