/// HTTP request methods.
///
/// Only GET is served. Any other token in the method position is rejected
/// by the parser before a `Method` is ever built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    Get,
}

/// A request line reduced to what the server acts on.
///
/// Headers and any body that arrived in the same read are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// Request target with its leading '/' characters removed
    /// (e.g. "index.html" for `GET /index.html`)
    pub path: String,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Some(Method::Get));
    /// assert_eq!(Method::from_token("get"), None);
    /// assert_eq!(Method::from_token("POST"), None);
    /// ```
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::Get),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
        }
    }
}

impl Request {
    /// Builds a GET request for `target`, stripping leading '/' characters.
    pub fn get(target: &str) -> Self {
        Self {
            method: Method::Get,
            path: target.trim_start_matches('/').to_string(),
        }
    }
}
