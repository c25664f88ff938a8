use std::{
    fmt::{self, Debug, Display},
    pin::pin,
    sync::Arc,
};

use bytestring::ByteString;
use futures_core::Stream;
use futures_util::StreamExt;
use tokio::task::{JoinError, JoinSet};
use watermelon_http_proto::{InboundMessage, Request, ResponseCollector};

use crate::{HttpServiceAdapterBuilder, Replier, RequestProcessor};

/// Serves a [`RequestProcessor`] to NATS requesters
///
/// Every message is turned into an HTTP request: the subject becomes the path
/// and the `RequestMethod` header, if present, the method. The response written
/// by the processor is published back on the reply subject of the message.
/// Messages without a reply subject are processed, but their response is dropped.
///
/// The adapter holds no per-message state, so it can handle any number
/// of messages concurrently.
pub struct HttpServiceAdapter {
    base_url: ByteString,
    processor: Box<dyn RequestProcessor>,
}

impl HttpServiceAdapter {
    pub(crate) fn new(base_url: ByteString, processor: Box<dyn RequestProcessor>) -> Self {
        Self {
            base_url,
            processor,
        }
    }

    /// Construct a new adapter with the default configuration
    #[must_use]
    pub fn builder() -> HttpServiceAdapterBuilder {
        HttpServiceAdapterBuilder::new()
    }

    /// The URL every subject is mapped below
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run the processor for `message` and collect its response
    ///
    /// If the request can't be built the processor isn't called and
    /// the response is a `400 Bad Request` describing the error.
    ///
    /// Blocks for as long as the processor runs. A panic in the
    /// processor is propagated to the caller.
    #[must_use]
    pub fn respond(&self, message: &InboundMessage) -> ResponseCollector {
        match Request::from_message(message, &self.base_url) {
            Ok(request) => {
                tracing::debug!(
                    subject = %message.subject,
                    method = %request.method(),
                    path = request.path(),
                    "dispatching request"
                );

                let mut response = ResponseCollector::new();
                self.processor.process(request, &mut response);
                response
            }
            Err(err) => {
                tracing::warn!(subject = %message.subject, error = %err, "rejecting message");
                ResponseCollector::bad_request(&err)
            }
        }
    }

    /// Handle `message`, publishing the response through `replier`
    ///
    /// Nothing is published if the message has no reply subject.
    ///
    /// # Errors
    ///
    /// It returns an error if `replier` fails to publish the response.
    pub fn handle<R>(&self, message: InboundMessage, replier: &R) -> Result<(), R::Error>
    where
        R: Replier + ?Sized,
    {
        let response = self.respond(&message);

        let Some(reply_subject) = message.reply_subject else {
            tracing::debug!(subject = %message.subject, "no reply subject, dropping response");
            return Ok(());
        };

        replier.reply(response.into_reply(reply_subject))
    }

    /// Handle every message yielded by `messages`
    ///
    /// Each message is handled on its own blocking task, so slow processors
    /// don't hold back the following messages. Failures to publish a reply
    /// and processor panics are logged. Returns once `messages` is exhausted
    /// and every message has been handled.
    pub async fn serve<S, R>(self: Arc<Self>, messages: S, replier: Arc<R>)
    where
        S: Stream<Item = InboundMessage>,
        R: Replier + 'static,
    {
        let mut messages = pin!(messages);
        let mut tasks = JoinSet::new();

        while let Some(message) = messages.next().await {
            let adapter = Arc::clone(&self);
            let replier = Arc::clone(&replier);
            tasks.spawn_blocking(move || adapter.handle(message, &*replier));

            while let Some(outcome) = tasks.try_join_next() {
                log_outcome(outcome);
            }
        }

        while let Some(outcome) = tasks.join_next().await {
            log_outcome(outcome);
        }
    }
}

impl Debug for HttpServiceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpServiceAdapter")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn log_outcome<E: Display>(outcome: Result<Result<(), E>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::error!(error = %err, "failed to publish reply"),
        Err(err) if err.is_panic() => tracing::error!(error = %err, "request processor panicked"),
        Err(err) => tracing::error!(error = %err, "request task failed"),
    }
}
