use std::io::{self, Read};

use bytes::{Buf, Bytes};
use http::{Method, Version};
use url::Url;

use crate::{
    headers::{HeaderMap, HeaderName, HeaderValue},
    mapper::{map_subject, MappingError},
    InboundMessage,
};

/// The protocol version of every [`Request`]
///
/// Requests are a single, fully buffered exchange, never kept alive nor chunked.
pub const PROTOCOL_VERSION: Version = Version::HTTP_10;

/// The remote address of every [`Request`]
///
/// There's no network peer behind a NATS message. The value is informational only.
pub const REMOTE_ADDR: &str = "FROM_NATS";

/// An HTTP request built out of an [`InboundMessage`]
///
/// Obtained from [`Request::from_message`].
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: Url,
    version: Version,
    remote_addr: &'static str,
    headers: HeaderMap,
    body: Body,
}

/// The body of a [`Request`]
///
/// The body can be read only once: every read advances past the bytes it returned.
#[derive(Debug, Default)]
pub struct Body(Bytes);

/// An error encountered while building a [`Request`]
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The subject couldn't be mapped to an URL
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// The [`HeaderName::REQUEST_METHOD`] header isn't a valid HTTP method
    #[error("invalid request method {0:?}")]
    InvalidMethod(HeaderValue),
}

impl Request {
    /// Build the request for `message`
    ///
    /// The URL is obtained by mapping the subject below `base_url` (see [`map_subject`]).
    /// The method is `GET`, unless the message carries the [`HeaderName::REQUEST_METHOD`]
    /// header, whose value is upper-cased and used instead. Every header of the
    /// message, including the method override, is forwarded as is.
    ///
    /// # Errors
    ///
    /// It returns an error if the subject can't be mapped to an URL or if the
    /// method override isn't a valid HTTP method.
    pub fn from_message(message: &InboundMessage, base_url: &str) -> Result<Self, RequestError> {
        let url = map_subject(&message.subject, base_url)?;

        let method = match message.headers.get(&HeaderName::REQUEST_METHOD) {
            Some(value) => Method::from_bytes(value.to_ascii_uppercase().as_bytes())
                .map_err(|_| RequestError::InvalidMethod(value.clone()))?,
            None => Method::GET,
        };

        Ok(Self {
            method,
            url,
            version: PROTOCOL_VERSION,
            remote_addr: REMOTE_ADDR,
            headers: message.headers.clone(),
            body: Body(message.payload.clone()),
        })
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// Returns the first value of the query parameter called `name`
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub fn remote_addr(&self) -> &'static str {
        self.remote_addr
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    #[must_use]
    pub fn into_body(self) -> Body {
        self.body
    }
}

impl Body {
    /// Take the bytes that haven't been read yet
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Buf for Body {
    fn remaining(&self) -> usize {
        self.0.remaining()
    }

    fn chunk(&self) -> &[u8] {
        self.0.chunk()
    }

    fn advance(&mut self, cnt: usize) {
        self.0.advance(cnt);
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.0.len());
        self.0.copy_to_slice(&mut buf[..len]);
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use bytes::{Buf, Bytes};
    use claims::{assert_err, assert_matches, assert_ok};
    use http::{Method, Version};

    use crate::{
        headers::{HeaderName, HeaderValue},
        InboundMessage, Subject,
    };

    use super::{Request, RequestError, REMOTE_ADDR};

    fn message(subject: &'static str) -> InboundMessage {
        InboundMessage::new(Subject::from_static(subject))
    }

    fn with_method(mut message: InboundMessage, method: String) -> InboundMessage {
        message.headers.insert(
            HeaderName::REQUEST_METHOD,
            HeaderValue::try_from(method).unwrap(),
        );
        message
    }

    #[test]
    fn defaults() {
        let request = assert_ok!(Request::from_message(
            &message("hello.world"),
            "http://localhost"
        ));
        assert_eq!(Method::GET, *request.method());
        assert_eq!("/hello/world", request.path());
        assert_eq!(None, request.query());
        assert_eq!(Version::HTTP_10, request.version());
        assert_eq!(REMOTE_ADDR, request.remote_addr());
        assert!(request.headers().is_empty());
        assert!(request.into_body().is_empty());
    }

    #[test]
    fn method_override_is_upper_cased() {
        let methods = [
            ("get", Method::GET),
            ("post", Method::POST),
            ("PUT", Method::PUT),
            ("Put", Method::PUT),
            ("dElEtE", Method::DELETE),
            ("patch", Method::PATCH),
        ];
        for (raw, expected) in methods {
            let message = with_method(message("hello.world"), raw.to_owned());
            let request = assert_ok!(Request::from_message(&message, "http://localhost"));
            assert_eq!(expected, *request.method());
        }
    }

    #[test]
    fn method_override_name_is_case_insensitive() {
        let mut message = message("hello");
        message.headers.insert(
            HeaderName::from_static("requestmethod"),
            HeaderValue::from_static("post"),
        );
        let request = assert_ok!(Request::from_message(&message, "http://localhost"));
        assert_eq!(Method::POST, *request.method());
    }

    #[test]
    fn invalid_method_override() {
        let message = with_method(message("hello"), "GE T".to_owned());
        let err = assert_err!(Request::from_message(&message, "http://localhost"));
        assert_matches!(err, RequestError::InvalidMethod(_));
    }

    #[test]
    fn headers_forwarded_verbatim() {
        let mut message = with_method(message("hello"), "put".to_owned());
        message.headers.append(
            HeaderName::from_static("Accept"),
            HeaderValue::from_static("text/plain"),
        );
        message.headers.append(
            HeaderName::from_static("Accept"),
            HeaderValue::from_static("application/json"),
        );

        let request = assert_ok!(Request::from_message(&message, "http://localhost"));
        assert_eq!(&message.headers, request.headers());
        assert_eq!(
            Some(&HeaderValue::from_static("put")),
            request.headers().get(&HeaderName::REQUEST_METHOD)
        );
    }

    #[test]
    fn query_from_subject() {
        let request = assert_ok!(Request::from_message(
            &message("hello?name=Alberto"),
            "http://localhost"
        ));
        assert_eq!("/hello", request.path());
        assert_eq!(Some("name=Alberto"), request.query());
        assert_eq!(Some("Alberto".to_owned()), request.query_param("name"));
        assert_eq!(None, request.query_param("surname"));
    }

    #[test]
    fn mapping_error() {
        let err = assert_err!(Request::from_message(&message("hello"), "localhost"));
        assert_matches!(err, RequestError::Mapping(_));
    }

    #[test]
    fn body_reads_once() {
        let mut message = message("upload");
        message.payload = Bytes::from_static(b"some payload");
        let mut request = assert_ok!(Request::from_message(&message, "http://localhost"));

        let mut body = String::new();
        request.body_mut().read_to_string(&mut body).unwrap();
        assert_eq!("some payload", body);

        body.clear();
        request.body_mut().read_to_string(&mut body).unwrap();
        assert!(body.is_empty());
        assert!(request.into_body().into_bytes().is_empty());
    }

    #[test]
    fn body_as_buf() {
        let mut message = message("upload");
        message.payload = Bytes::from_static(b"chunked payload");
        let mut body = assert_ok!(Request::from_message(&message, "http://localhost")).into_body();

        assert_eq!(15, body.remaining());
        assert_eq!(b"chunked", &body.chunk()[..7]);
        body.advance(8);
        assert_eq!(7, body.remaining());
        assert_eq!(Bytes::from_static(b"payload"), body.copy_to_bytes(7));
        assert!(!body.has_remaining());
        assert!(body.is_empty());
    }
}
