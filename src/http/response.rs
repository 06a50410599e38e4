//! HTTP/1.1 response builder and serializer.

use bytes::{BufMut, BytesMut};

use super::{Headers, StatusCode};

/// An HTTP/1.1 response.
///
/// Built fluently by handlers, then decorated in place by middleware on the
/// way back up the chain: [`set_header`](Self::set_header) replaces a header
/// (the overwrite semantics caching policies need), while
/// [`append_header`](Self::append_header) adds another value.
///
/// # Examples
///
/// ```
/// use cdnify::http::{Response, StatusCode};
///
/// let mut response = Response::new(StatusCode::Ok)
///     .header("Content-Type", "application/javascript")
///     .body("console.log('hi')");
/// response.set_header("Cache-Control", "public, max-age=604800");
///
/// assert_eq!(response.headers().get("cache-control"), Some("public, max-age=604800"));
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Vec<u8>,
    keep_alive: bool,
}

impl Response {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
            keep_alive: true,
        }
    }

    /// Appends a header (builder style). Repeated names are additive.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets a header in place, replacing any existing values for that name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    /// Appends a header in place, keeping existing values.
    pub fn append_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.append(name, value);
    }

    /// Sets the body from a string.
    ///
    /// `Content-Length` is written automatically by [`into_bytes`](Self::into_bytes).
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().into_bytes();
        self
    }

    /// Sets the body from raw bytes.
    #[must_use]
    pub fn body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Controls the `Connection: keep-alive` / `Connection: close` header.
    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Serializes the response into HTTP/1.1 wire format.
    ///
    /// Adds automatically:
    /// - `Content-Type: text/plain; charset=utf-8` when the body is
    ///   non-empty and no `Content-Type` was set,
    /// - `Content-Length` (always),
    /// - `Connection: keep-alive` or `Connection: close`.
    pub fn into_bytes(mut self) -> BytesMut {
        let content_length = self.body.len();

        if !self.body.is_empty() && !self.headers.contains("content-type") {
            self.headers
                .append("Content-Type", "text/plain; charset=utf-8");
        }

        let connection = if self.keep_alive {
            "keep-alive"
        } else {
            "close"
        };
        self.headers.append("Connection", connection);

        let estimated = 128 + self.headers.len() * 64 + content_length;
        let mut buf = BytesMut::with_capacity(estimated);

        buf.put(
            format!(
                "HTTP/1.1 {} {}\r\n",
                self.status.as_u16(),
                self.status.canonical_reason()
            )
            .as_bytes(),
        );

        buf.put(self.headers.to_string().as_bytes());
        buf.put(format!("Content-Length: {content_length}\r\n\r\n").as_bytes());

        if !self.body.is_empty() {
            buf.put(self.body.as_slice());
        }

        buf
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string(bytes: BytesMut) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn simple_ok_response() {
        let r = Response::new(StatusCode::Ok).body("Hello");
        let s = to_string(r.into_bytes());
        assert!(s.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(s.contains("Content-Length: 5\r\n"));
        assert!(s.ends_with("\r\n\r\nHello"));
    }

    #[test]
    fn set_header_overwrites_on_the_wire() {
        let mut r = Response::new(StatusCode::Ok).header("Cache-Control", "no-store");
        r.set_header("Cache-Control", "public, max-age=60");
        let s = to_string(r.into_bytes());
        assert!(s.contains("Cache-Control: public, max-age=60\r\n"));
        assert!(!s.contains("no-store"));
    }

    #[test]
    fn append_header_is_additive() {
        let mut r = Response::new(StatusCode::Ok);
        r.append_header("Vary", "Origin");
        r.append_header("Vary", "Accept-Encoding");
        let s = to_string(r.into_bytes());
        assert!(s.contains("Vary: Origin\r\n"));
        assert!(s.contains("Vary: Accept-Encoding\r\n"));
    }

    #[test]
    fn no_body_no_content_type() {
        let r = Response::new(StatusCode::NoContent);
        let s = to_string(r.into_bytes());
        assert!(!s.contains("Content-Type"));
        assert!(s.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn connection_close() {
        let r = Response::new(StatusCode::Ok).keep_alive(false);
        let s = to_string(r.into_bytes());
        assert!(s.contains("Connection: close\r\n"));
    }
}
