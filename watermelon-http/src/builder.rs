use bytestring::ByteString;

#[cfg(feature = "from-env")]
use crate::from_env::{FromEnv, FromEnvError};
use crate::{HttpServiceAdapter, RequestProcessor};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// A builder for [`HttpServiceAdapter`]
///
/// Obtained from [`HttpServiceAdapter::builder`].
#[derive(Debug)]
pub struct HttpServiceAdapterBuilder {
    base_url: ByteString,
}

impl HttpServiceAdapterBuilder {
    pub(super) fn new() -> Self {
        Self {
            base_url: ByteString::from_static(DEFAULT_BASE_URL),
        }
    }

    /// Construct [`HttpServiceAdapterBuilder`] from environment variables
    ///
    /// Reads the following environment variables into [`HttpServiceAdapterBuilder`]:
    ///
    /// * `NATS_HTTP_BASE_URL`: see [`HttpServiceAdapterBuilder::base_url`]
    ///
    /// # Errors
    ///
    /// It returns an error if the environment variables can't be deserialized.
    #[cfg(feature = "from-env")]
    pub fn from_env() -> Result<Self, FromEnvError> {
        Self::from_vars(std::env::vars())
    }

    #[cfg(feature = "from-env")]
    fn from_vars<I>(vars: I) -> Result<Self, FromEnvError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env = FromEnv::from_vars(vars)?;

        let mut this = Self::new();
        if let Some(base_url) = env.base_url {
            this = this.base_url(base_url);
        }
        Ok(this)
    }

    /// The scheme, host and port requests are addressed to
    ///
    /// Subjects are mapped to paths below this URL. A trailing `/` is dropped.
    /// The value is only validated when the first message is handled:
    /// a malformed base URL makes every request fail with `400 Bad Request`.
    ///
    /// Default: `http://localhost:8080`
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<ByteString>) -> Self {
        let base_url = base_url.into();
        self.base_url = match base_url.strip_suffix('/') {
            Some(stripped) => ByteString::from(stripped),
            None => base_url,
        };
        self
    }

    /// Creates a new [`HttpServiceAdapter`] dispatching requests to `processor`
    #[must_use]
    pub fn build<P>(self, processor: P) -> HttpServiceAdapter
    where
        P: RequestProcessor + 'static,
    {
        HttpServiceAdapter::new(self.base_url, Box::new(processor))
    }
}

impl Default for HttpServiceAdapterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
