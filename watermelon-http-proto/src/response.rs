use std::{
    fmt::Display,
    io::{self, Write},
};

use bytes::BytesMut;
use bytestring::ByteString;
use http::StatusCode;

use crate::{
    headers::{HeaderMap, HeaderName, HeaderValue},
    ReplyMessage, Subject,
};

/// The response side of a request handled over NATS
///
/// Handlers write their response through this trait. The only implementation
/// is [`ResponseCollector`], which turns the response into a [`ReplyMessage`].
pub trait ResponseSink {
    /// The headers of the response
    ///
    /// Every call returns the same map.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Append `buf` to the body, returning the number of bytes consumed
    ///
    /// If no status has been set yet, the status becomes `200 OK`.
    fn write(&mut self, buf: &[u8]) -> usize;

    /// Set the status of the response
    fn set_status(&mut self, status: StatusCode);
}

/// A [`ResponseSink`] buffering the whole response in memory
#[derive(Debug, Default)]
pub struct ResponseCollector {
    headers: HeaderMap,
    body: BytesMut,
    status_set: bool,
    // `Description` was written by `set_status`, not by the handler
    owns_description: bool,
}

impl ResponseCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A `400 Bad Request` response describing `err`
    ///
    /// The description is never empty.
    #[must_use]
    pub fn bad_request(err: &impl Display) -> Self {
        let mut this = Self::new();
        this.headers.insert(HeaderName::STATUS, status_value(StatusCode::BAD_REQUEST));
        let description = HeaderValue::sanitized(&err.to_string())
            .unwrap_or_else(|| description_value(StatusCode::BAD_REQUEST));
        this.headers.insert(HeaderName::DESCRIPTION, description);
        this.status_set = true;
        this.owns_description = true;
        this
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Turn the collected response into a reply published to `subject`
    #[must_use]
    pub fn into_reply(self, subject: Subject) -> ReplyMessage {
        ReplyMessage {
            subject,
            headers: self.headers,
            payload: self.body.freeze(),
        }
    }
}

impl ResponseSink for ResponseCollector {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write(&mut self, buf: &[u8]) -> usize {
        if !self.status_set {
            self.headers
                .insert(HeaderName::STATUS, status_value(StatusCode::OK));
            self.status_set = true;
        }

        self.body.extend_from_slice(buf);
        buf.len()
    }

    fn set_status(&mut self, status: StatusCode) {
        self.headers.insert(HeaderName::STATUS, status_value(status));
        if status == StatusCode::OK {
            if self.owns_description {
                self.headers.remove(&HeaderName::DESCRIPTION);
                self.owns_description = false;
            }
        } else {
            self.headers
                .insert(HeaderName::DESCRIPTION, description_value(status));
            self.owns_description = true;
        }
        self.status_set = true;
    }
}

impl Write for ResponseCollector {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(ResponseSink::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn status_value(status: StatusCode) -> HeaderValue {
    HeaderValue::from_dangerous_value(ByteString::from(status.as_str()))
}

fn description_value(status: StatusCode) -> HeaderValue {
    match status.canonical_reason() {
        Some(reason) => HeaderValue::from_dangerous_value(ByteString::from_static(reason)),
        None => HeaderValue::from_dangerous_value(
            format!("{} - Unknown Status", status.as_u16()).into(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use claims::{assert_none, assert_some_eq};
    use http::StatusCode;

    use crate::{
        headers::{HeaderName, HeaderValue},
        Subject,
    };

    use super::{ResponseCollector, ResponseSink};

    #[test]
    fn untouched() {
        let collector = ResponseCollector::new();
        let reply = collector.into_reply(Subject::from_static("_INBOX.abcd"));
        assert_eq!(Subject::from_static("_INBOX.abcd"), reply.subject);
        assert!(reply.headers.is_empty());
        assert!(reply.payload.is_empty());
    }

    #[test]
    fn write_defaults_to_ok() {
        let mut collector = ResponseCollector::new();
        assert_eq!(5, collector.write(b"Hello"));
        assert_eq!(1, collector.write(b" "));
        assert_eq!(7, collector.write(b"Alberto"));

        assert_eq!(b"Hello Alberto", collector.body());
        assert_some_eq!(
            collector.headers().get(&HeaderName::STATUS),
            &HeaderValue::from_static("200")
        );
        assert_none!(collector.headers().get(&HeaderName::DESCRIPTION));
    }

    #[test]
    fn write_keeps_explicit_status() {
        let mut collector = ResponseCollector::new();
        collector.set_status(StatusCode::CREATED);
        collector.write(b"{}");

        assert_eq!(
            [HeaderValue::from_static("201")].as_slice(),
            collector.headers().get_all(&HeaderName::STATUS)
        );
        assert_some_eq!(
            collector.headers().get(&HeaderName::DESCRIPTION),
            &HeaderValue::from_static("Created")
        );
    }

    #[test]
    fn not_found() {
        let mut collector = ResponseCollector::new();
        collector.set_status(StatusCode::NOT_FOUND);

        let reply = collector.into_reply(Subject::from_static("_INBOX.abcd"));
        assert_some_eq!(
            reply.headers.get(&HeaderName::STATUS),
            &HeaderValue::from_static("404")
        );
        assert_some_eq!(
            reply.headers.get(&HeaderName::DESCRIPTION),
            &HeaderValue::from_static("Not Found")
        );
        assert!(reply.payload.is_empty());
    }

    #[test]
    fn unknown_status() {
        let mut collector = ResponseCollector::new();
        collector.set_status(StatusCode::from_u16(599).unwrap());
        assert_some_eq!(
            collector.headers().get(&HeaderName::DESCRIPTION),
            &HeaderValue::from_static("599 - Unknown Status")
        );
    }

    #[test]
    fn ok_clears_description() {
        let mut collector = ResponseCollector::new();
        collector.set_status(StatusCode::NOT_FOUND);
        collector.set_status(StatusCode::OK);
        assert_some_eq!(
            collector.headers().get(&HeaderName::STATUS),
            &HeaderValue::from_static("200")
        );
        assert_none!(collector.headers().get(&HeaderName::DESCRIPTION));
    }

    #[test]
    fn write_keeps_handler_description() {
        let mut collector = ResponseCollector::new();
        collector.headers_mut().insert(
            HeaderName::DESCRIPTION,
            HeaderValue::from_static("custom"),
        );
        collector.write(b"hi");

        assert_some_eq!(
            collector.headers().get(&HeaderName::STATUS),
            &HeaderValue::from_static("200")
        );
        assert_some_eq!(
            collector.headers().get(&HeaderName::DESCRIPTION),
            &HeaderValue::from_static("custom")
        );

        collector.set_status(StatusCode::OK);
        assert_some_eq!(
            collector.headers().get(&HeaderName::DESCRIPTION),
            &HeaderValue::from_static("custom")
        );
    }

    #[test]
    fn headers_mut_is_stable() {
        let mut collector = ResponseCollector::new();
        collector.headers_mut().insert(
            HeaderName::from_static("Content-Type"),
            HeaderValue::from_static("text/plain"),
        );
        assert_some_eq!(
            collector
                .headers_mut()
                .get(&HeaderName::from_static("content-type")),
            &HeaderValue::from_static("text/plain")
        );
        assert_none!(collector.headers().get(&HeaderName::STATUS));
    }

    #[test]
    fn io_write() {
        use std::io::Write;

        let mut collector = ResponseCollector::new();
        write!(collector, "{} {}", "GET", "/hello/world").unwrap();
        collector.flush().unwrap();
        assert_eq!(b"GET /hello/world", collector.body());
        assert_some_eq!(
            collector.headers().get(&HeaderName::STATUS),
            &HeaderValue::from_static("200")
        );
    }

    #[test]
    fn bad_request() {
        let collector = ResponseCollector::bad_request(&"relative URL without a base");
        assert_some_eq!(
            collector.headers().get(&HeaderName::STATUS),
            &HeaderValue::from_static("400")
        );
        assert_some_eq!(
            collector.headers().get(&HeaderName::DESCRIPTION),
            &HeaderValue::from_static("relative URL without a base")
        );
        assert!(collector.body().is_empty());

        let collector = ResponseCollector::bad_request(&"");
        assert_some_eq!(
            collector.headers().get(&HeaderName::DESCRIPTION),
            &HeaderValue::from_static("Bad Request")
        );
    }
}
