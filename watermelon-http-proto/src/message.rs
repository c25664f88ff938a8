use bytes::Bytes;

use crate::{headers::HeaderMap, Subject};

/// A message delivered by the NATS subscription
///
/// An empty `headers` map stands for a message published without headers.
/// `reply_subject` is `None` when the publisher isn't waiting for a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub subject: Subject,
    pub reply_subject: Option<Subject>,
    pub headers: HeaderMap,
    pub payload: Bytes,
}

/// The response to an [`InboundMessage`], to be published on its reply subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyMessage {
    pub subject: Subject,
    pub headers: HeaderMap,
    pub payload: Bytes,
}

impl InboundMessage {
    /// Create a message with no reply subject, headers or payload
    #[must_use]
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            reply_subject: None,
            headers: HeaderMap::new(),
            payload: Bytes::new(),
        }
    }
}
