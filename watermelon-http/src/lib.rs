//! Serve HTTP-style request handlers to NATS requesters
//!
//! [`HttpServiceAdapter`] turns every NATS message into an HTTP [`Request`],
//! runs it through a [`RequestProcessor`] and publishes the response back
//! on the reply subject of the message through a [`Replier`].
//!
//! [`Request`]: proto::Request

pub use watermelon_http_proto as proto;

pub use self::adapter::HttpServiceAdapter;
pub use self::builder::HttpServiceAdapterBuilder;
pub use self::processor::RequestProcessor;
pub use self::replier::Replier;

mod adapter;
mod builder;
#[cfg(feature = "from-env")]
mod from_env;
mod processor;
mod replier;

pub mod error {
    //! Errors returned by the adapter

    #[cfg(feature = "from-env")]
    pub use crate::from_env::FromEnvError;
    pub use watermelon_http_proto::error::{MappingError, RequestError};
}
