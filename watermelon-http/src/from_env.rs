use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct FromEnv {
    #[serde(rename = "nats_http_base_url")]
    pub(super) base_url: Option<String>,
}

/// An error encountered while reading the configuration from the environment
#[derive(Debug, thiserror::Error)]
#[error("invalid environment configuration")]
pub struct FromEnvError(#[source] envy::Error);

impl FromEnv {
    pub(super) fn from_vars<I>(vars: I) -> Result<Self, FromEnvError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).map_err(FromEnvError)
    }
}
