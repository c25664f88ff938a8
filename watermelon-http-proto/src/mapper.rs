use percent_encoding::percent_decode_str;
use url::Url;

use crate::Subject;

/// Map `subject` to an URL below `base_url`
///
/// Every `.` separating the subject tokens becomes a `/`, so `hello.world`
/// under `http://localhost:8080` maps to `http://localhost:8080/hello/world`.
/// A `?query` suffix carried by the subject is appended untouched.
///
/// # Errors
///
/// It returns an error if a token would be read as a `.` or `..` path segment,
/// or if the resulting string isn't a valid URL, most likely because
/// `base_url` is malformed.
pub fn map_subject(subject: &Subject, base_url: &str) -> Result<Url, MappingError> {
    let mut uri = String::with_capacity(base_url.len() + 1 + subject.len());
    uri.push_str(base_url);
    uri.push('/');
    for (i, token) in subject.tokens().split('.').enumerate() {
        if token.split(['/', '\\']).any(is_dot_segment) {
            return Err(MappingError::DotSegment {
                token: token.to_owned(),
            });
        }

        if i > 0 {
            uri.push('/');
        }
        uri.push_str(token);
    }
    if let Some(query) = subject.query() {
        uri.push('?');
        uri.push_str(query);
    }

    Url::parse(&uri).map_err(|source| MappingError::InvalidUrl { uri, source })
}

// URL parsing resolves these against the preceding segments
fn is_dot_segment(segment: &str) -> bool {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    decoded == "." || decoded == ".."
}

/// An error encountered while mapping a [`Subject`] to an URL
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// A subject token would be resolved as a `.` or `..` path segment
    #[error("subject token {token:?} is a relative path segment")]
    DotSegment { token: String },
    /// The mapped string isn't a valid URL
    #[error("invalid request URL {uri:?}: {source}")]
    InvalidUrl {
        uri: String,
        #[source]
        source: url::ParseError,
    },
}
