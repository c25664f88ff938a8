//! Sans-IO translation between NATS messages and HTTP exchanges
//!
//! An [`InboundMessage`] becomes a [`Request`] through [`Request::from_message`].
//! The handler answers into a [`ResponseCollector`], which is then turned
//! into the [`ReplyMessage`] for the requester.

pub use self::mapper::map_subject;
pub use self::message::{InboundMessage, ReplyMessage};
pub use self::request::{Body, Request, PROTOCOL_VERSION, REMOTE_ADDR};
pub use self::response::{ResponseCollector, ResponseSink};
pub use self::subject::Subject;
pub use http::{Method, StatusCode, Version};

pub mod headers;
mod mapper;
mod message;
mod request;
mod response;
mod subject;

pub mod error {
    pub use super::mapper::MappingError;
    pub use super::request::RequestError;
    pub use super::subject::SubjectValidateError;
}
