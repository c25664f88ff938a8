use std::{
    fmt::{self, Display},
    ops::Deref,
};

use bytestring::ByteString;

/// A string that can be used to represent the subject of a published message
///
/// `Subject` contains a string that is guaranteed [^1] to
/// contain a valid subject that meets the following requirements:
///
/// * The value is not empty
/// * The value has a length less than or equal to 256
/// * The value does not contain any whitespace characters
/// * The part before an optional `?` has no empty tokens
/// * The part before an optional `?` does not contain `*` or `>` wildcards
///
/// Everything after the first `?` is an opaque query string, which is
/// handed to the HTTP side untouched.
///
/// `Subject` can be constructed from [`Subject::from_static`]
/// or any of the `TryFrom` implementations.
///
/// [^1]: Because [`Subject::from_dangerous_value`] is safe to call,
///       code must not assume any of the above invariants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subject(ByteString);

impl Subject {
    /// Construct `Subject` from a static string
    ///
    /// # Panics
    ///
    /// Will panic if `value` isn't a valid `Subject`
    #[must_use]
    pub fn from_static(value: &'static str) -> Self {
        Self::try_from(ByteString::from_static(value)).expect("invalid Subject")
    }

    /// Construct a `Subject` from a string, without checking invariants
    ///
    /// This method bypasses invariants checks implemented by [`Subject::from_static`]
    /// and all `TryFrom` implementations.
    #[expect(
        clippy::missing_panics_doc,
        reason = "The subject validation is only made in debug"
    )]
    #[must_use]
    pub fn from_dangerous_value(value: ByteString) -> Self {
        if cfg!(debug_assertions) {
            if let Err(err) = validate_subject(&value) {
                panic!("Subject {value:?} isn't valid {err:?}");
            }
        }
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dot-delimited tokens, without the query suffix
    #[must_use]
    pub fn tokens(&self) -> &str {
        self.split().0
    }

    /// The query suffix, without the leading `?`
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.split().1
    }

    fn split(&self) -> (&str, Option<&str>) {
        match self.as_str().split_once('?') {
            Some((tokens, query)) => (tokens, Some(query)),
            None => (self.as_str(), None),
        }
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl TryFrom<ByteString> for Subject {
    type Error = SubjectValidateError;

    fn try_from(value: ByteString) -> Result<Self, Self::Error> {
        validate_subject(&value)?;
        Ok(Self::from_dangerous_value(value))
    }
}

impl TryFrom<String> for Subject {
    type Error = SubjectValidateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_subject(&value)?;
        Ok(Self::from_dangerous_value(value.into()))
    }
}

impl From<Subject> for ByteString {
    fn from(value: Subject) -> Self {
        value.0
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Subject {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

/// An error encountered while validating [`Subject`]
#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum SubjectValidateError {
    /// The value is empty
    #[error("Subject is empty")]
    Empty,
    /// The value has a length greater than 256
    #[error("Subject is too long")]
    TooLong,
    /// The value contains an Unicode whitespace character
    #[error("Subject contained an illegal whitespace character")]
    IllegalCharacter,
    /// The tokens contain consecutive, leading or trailing `.` characters
    #[error("Subject contained a broken token")]
    BrokenToken,
    /// The tokens contain `*` or `>`, which can't be published to
    #[error("Subject contained a wildcard")]
    Wildcard,
}

fn validate_subject(subject: &str) -> Result<(), SubjectValidateError> {
    if subject.is_empty() {
        return Err(SubjectValidateError::Empty);
    }

    if subject.len() > 256 {
        return Err(SubjectValidateError::TooLong);
    }

    if subject.chars().any(char::is_whitespace) {
        return Err(SubjectValidateError::IllegalCharacter);
    }

    let tokens = subject.split_once('?').map_or(subject, |(tokens, _)| tokens);
    for token in tokens.split('.') {
        if token.is_empty() {
            return Err(SubjectValidateError::BrokenToken);
        }

        if token.contains(['*', '>']) {
            return Err(SubjectValidateError::Wildcard);
        }
    }

    Ok(())
}
