use std::{
    fmt::{self, Display},
    ops::Deref,
};

use bytestring::ByteString;
use unicase::UniCase;

/// A string that can be used to represent an header name
///
/// Header names compare case-insensitively, so `RequestMethod` and
/// `requestmethod` refer to the same header.
///
/// `HeaderName` contains a string that is guaranteed [^1] to
/// contain a valid header name that meets the following requirements:
///
/// * The value is not empty
/// * The value has a length less than or equal to 64
/// * The value does not contain any whitespace characters or `:`
///
/// [^1]: Because [`HeaderName::from_dangerous_value`] is safe to call,
///       code must not assume any of the above invariants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HeaderName(UniCase<ByteString>);

impl HeaderName {
    /// Overrides the HTTP method of the request built from the message
    ///
    /// The value is upper-cased before use. Absent this header requests are `GET`.
    pub const REQUEST_METHOD: Self = Self::new_internal("RequestMethod");
    /// Decimal HTTP status code of the reply
    pub const STATUS: Self = Self::new_internal("Status");
    /// Reason phrase accompanying any non-200 [`HeaderName::STATUS`]
    pub const DESCRIPTION: Self = Self::new_internal("Description");

    /// Construct `HeaderName` from a static string
    ///
    /// # Panics
    ///
    /// Will panic if `value` isn't a valid `HeaderName`
    #[must_use]
    pub fn from_static(value: &'static str) -> Self {
        Self::try_from(ByteString::from_static(value)).expect("invalid HeaderName")
    }

    /// Construct a `HeaderName` from a string, without checking invariants
    ///
    /// This method bypasses invariants checks implemented by [`HeaderName::from_static`]
    /// and all `TryFrom` implementations.
    #[expect(
        clippy::missing_panics_doc,
        reason = "The header validation is only made in debug"
    )]
    #[must_use]
    pub fn from_dangerous_value(value: ByteString) -> Self {
        if cfg!(debug_assertions) {
            if let Err(err) = validate_header_name(&value) {
                panic!("HeaderName {value:?} isn't valid {err:?}");
            }
        }
        Self(UniCase::new(value))
    }

    const fn new_internal(value: &'static str) -> Self {
        Self(UniCase::ascii(ByteString::from_static(value)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl TryFrom<ByteString> for HeaderName {
    type Error = HeaderNameValidateError;

    fn try_from(value: ByteString) -> Result<Self, Self::Error> {
        validate_header_name(&value)?;
        Ok(Self::from_dangerous_value(value))
    }
}

impl TryFrom<String> for HeaderName {
    type Error = HeaderNameValidateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_header_name(&value)?;
        Ok(Self::from_dangerous_value(value.into()))
    }
}

impl From<HeaderName> for ByteString {
    fn from(value: HeaderName) -> Self {
        value.0.into_inner()
    }
}

impl AsRef<str> for HeaderName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for HeaderName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

/// An error encountered while validating [`HeaderName`]
#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum HeaderNameValidateError {
    /// The value is empty
    #[error("HeaderName is empty")]
    Empty,
    /// The value has a length greater than 64
    #[error("HeaderName is too long")]
    TooLong,
    /// The value contains an Unicode whitespace character or `:`
    #[error("HeaderName contained an illegal character")]
    IllegalCharacter,
}

fn validate_header_name(header_name: &str) -> Result<(), HeaderNameValidateError> {
    if header_name.is_empty() {
        return Err(HeaderNameValidateError::Empty);
    }

    if header_name.len() > 64 {
        return Err(HeaderNameValidateError::TooLong);
    }

    if header_name.chars().any(|c| c.is_whitespace() || c == ':') {
        return Err(HeaderNameValidateError::IllegalCharacter);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use bytestring::ByteString;

    use super::{HeaderName, HeaderNameValidateError};

    #[test]
    fn case_insensitive() {
        for name in ["RequestMethod", "requestmethod", "REQUESTMETHOD", "requestMethod"] {
            let name = HeaderName::try_from(ByteString::from_static(name)).unwrap();
            assert_eq!(HeaderName::REQUEST_METHOD, name);
            assert_eq!(HeaderName::REQUEST_METHOD.cmp(&name), Ordering::Equal);
        }
    }

    #[test]
    fn invalid_names() {
        let names = [
            ("", HeaderNameValidateError::Empty),
            ("Request Method", HeaderNameValidateError::IllegalCharacter),
            ("Status:", HeaderNameValidateError::IllegalCharacter),
        ];
        for (name, expected_err) in names {
            let err = HeaderName::try_from(ByteString::from_static(name)).unwrap_err();
            assert_eq!(expected_err, err);
        }

        assert_eq!(
            HeaderNameValidateError::TooLong,
            HeaderName::try_from("X".repeat(65)).unwrap_err()
        );
    }
}
