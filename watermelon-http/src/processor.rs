use watermelon_http_proto::{Request, ResponseSink};

/// A synchronous HTTP request handler
///
/// The adapter calls [`RequestProcessor::process`] once per message, possibly
/// from many threads at the same time. The response is whatever the processor
/// writes to `response` before returning.
///
/// Any `Fn(Request, &mut dyn ResponseSink)` closure is a `RequestProcessor`.
pub trait RequestProcessor: Send + Sync {
    fn process(&self, request: Request, response: &mut dyn ResponseSink);
}

impl<F> RequestProcessor for F
where
    F: Fn(Request, &mut dyn ResponseSink) + Send + Sync,
{
    fn process(&self, request: Request, response: &mut dyn ResponseSink) {
        self(request, response);
    }
}
