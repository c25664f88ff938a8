use std::{error::Error, sync::Arc};

use tokio::sync::mpsc;
use watermelon_http_proto::ReplyMessage;

/// The transport side publishing replies
///
/// Delivery is up to the implementation: failures are reported back
/// to the caller and never retried by the adapter.
pub trait Replier: Send + Sync {
    type Error: Error + Send + Sync + 'static;

    /// Publish `reply` on [`ReplyMessage::subject`]
    ///
    /// # Errors
    ///
    /// It returns an error if the reply couldn't be handed over to the transport.
    fn reply(&self, reply: ReplyMessage) -> Result<(), Self::Error>;
}

impl<R: Replier + ?Sized> Replier for Arc<R> {
    type Error = R::Error;

    fn reply(&self, reply: ReplyMessage) -> Result<(), Self::Error> {
        (**self).reply(reply)
    }
}

/// Queues replies on an unbounded channel
///
/// The receiving end is expected to publish them.
impl Replier for mpsc::UnboundedSender<ReplyMessage> {
    type Error = mpsc::error::SendError<ReplyMessage>;

    fn reply(&self, reply: ReplyMessage) -> Result<(), Self::Error> {
        self.send(reply)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use claims::{assert_err, assert_ok};
    use tokio::sync::mpsc;
    use watermelon_http_proto::{headers::HeaderMap, ReplyMessage, Subject};

    use super::Replier;

    #[test]
    fn unbounded_channel() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let reply = ReplyMessage {
            subject: Subject::from_static("_INBOX.abcd"),
            headers: HeaderMap::new(),
            payload: Bytes::from_static(b"OK!"),
        };

        assert_ok!(sender.reply(reply.clone()));
        assert_eq!(reply, receiver.try_recv().unwrap());

        drop(receiver);
        assert_err!(sender.reply(reply));
    }
}
