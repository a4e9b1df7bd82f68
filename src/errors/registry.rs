//! Ordered table mapping raised errors to response rules.

use axum::http::StatusCode;
use std::error::Error as StdError;
use std::fmt;

use super::codes::ErrorCode;
use super::kinds::{BadRequestError, InvalidArgument, UserError};
use super::response::INTERNAL_ERROR_MESSAGE;

/// Closed set of categories an error is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    UserDomain,
    InvalidArgument,
    Unclassified,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::UserDomain => "user_domain",
            Self::InvalidArgument => "invalid_argument",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the client-facing message of a rule comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    /// Reason fixed where the error type is declared
    Declared(&'static str),
    /// The matched error's own message
    Runtime,
    /// Literal that never reveals the error
    Fixed(&'static str),
}

type Matcher = fn(&anyhow::Error) -> Option<&(dyn StdError + 'static)>;

/// Finds a `T` either as the error itself, a context layer, or anywhere in the source chain
fn find_raised<T>(error: &anyhow::Error) -> Option<&(dyn StdError + 'static)>
where
    T: StdError + Send + Sync + 'static,
{
    if let Some(raised) = error.downcast_ref::<T>() {
        return Some(raised as &(dyn StdError + 'static));
    }
    error.chain().find(|cause| cause.is::<T>())
}

fn match_any(error: &anyhow::Error) -> Option<&(dyn StdError + 'static)> {
    error.chain().next()
}

/// One entry of the registry: which errors it takes and how they are answered
#[derive(Clone, Copy)]
pub struct ErrorRule {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: MessageSource,
    matcher: Matcher,
}

impl fmt::Debug for ErrorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorRule")
            .field("kind", &self.kind)
            .field("status", &self.status)
            .field("code", &self.code)
            .field("message", &self.message)
            .finish()
    }
}

impl ErrorRule {
    /// Rule matching errors of type `T`
    pub fn for_type<T>(
        kind: ErrorKind,
        status: StatusCode,
        code: ErrorCode,
        message: MessageSource,
    ) -> Self
    where
        T: StdError + Send + Sync + 'static,
    {
        Self {
            kind,
            status,
            code,
            message,
            matcher: find_raised::<T>,
        }
    }

    /// Rule matching every error
    pub fn catch_all(
        kind: ErrorKind,
        status: StatusCode,
        code: ErrorCode,
        message: MessageSource,
    ) -> Self {
        Self {
            kind,
            status,
            code,
            message,
            matcher: match_any,
        }
    }

    /// Returns the part of `error` this rule matched, if any
    pub fn matches<'a>(&self, error: &'a anyhow::Error) -> Option<&'a (dyn StdError + 'static)> {
        (self.matcher)(error)
    }

    /// Client-facing message for an error this rule matched
    pub fn message_for(&self, matched: &dyn StdError) -> String {
        match self.message {
            MessageSource::Declared(reason) | MessageSource::Fixed(reason) => reason.to_string(),
            MessageSource::Runtime => matched.to_string(),
        }
    }
}

/// Priority-ordered rules with a catch-all that is always consulted last
#[derive(Debug, Clone)]
pub struct ErrorRegistry {
    rules: Vec<ErrorRule>,
    fallback: ErrorRule,
}

impl ErrorRegistry {
    /// Empty registry answering everything with `fallback`
    pub fn new(fallback: ErrorRule) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Append a rule; earlier rules win
    pub fn with_rule(mut self, rule: ErrorRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &ErrorRule> {
        self.rules.iter().chain(std::iter::once(&self.fallback))
    }

    /// Select the first matching rule. Total: the fallback takes whatever is left.
    pub fn classify<'a>(
        &self,
        error: &'a anyhow::Error,
    ) -> (&ErrorRule, &'a (dyn StdError + 'static)) {
        for rule in &self.rules {
            if let Some(matched) = rule.matches(error) {
                return (rule, matched);
            }
        }
        let matched = self.fallback.matches(error).unwrap_or_else(|| error.root_cause());
        (&self.fallback, matched)
    }
}

impl Default for ErrorRegistry {
    fn default() -> Self {
        Self::new(ErrorRule::catch_all(
            ErrorKind::Unclassified,
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Ex,
            MessageSource::Fixed(INTERNAL_ERROR_MESSAGE),
        ))
        .with_rule(ErrorRule::for_type::<BadRequestError>(
            ErrorKind::BadRequest,
            StatusCode::BAD_REQUEST,
            ErrorCode::Bad,
            MessageSource::Declared(BadRequestError::REASON),
        ))
        .with_rule(ErrorRule::for_type::<UserError>(
            ErrorKind::UserDomain,
            StatusCode::BAD_REQUEST,
            ErrorCode::UserEx,
            MessageSource::Runtime,
        ))
        .with_rule(ErrorRule::for_type::<InvalidArgument>(
            ErrorKind::InvalidArgument,
            StatusCode::BAD_REQUEST,
            ErrorCode::Bad,
            MessageSource::Runtime,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[derive(Debug, thiserror::Error)]
    #[error("lookup failed")]
    struct LookupFailed(#[source] UserError);

    #[test]
    fn test_default_rule_order() {
        let registry = ErrorRegistry::default();
        let kinds: Vec<ErrorKind> = registry.rules().map(|rule| rule.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::BadRequest,
                ErrorKind::UserDomain,
                ErrorKind::InvalidArgument,
                ErrorKind::Unclassified,
            ]
        );
    }

    #[test]
    fn test_classify_direct_types() {
        let registry = ErrorRegistry::default();

        let err = anyhow::Error::new(BadRequestError::new());
        assert_eq!(registry.classify(&err).0.kind, ErrorKind::BadRequest);

        let err = anyhow::Error::new(UserError::new("invalid user id"));
        assert_eq!(registry.classify(&err).0.kind, ErrorKind::UserDomain);

        let err = anyhow::Error::new(InvalidArgument::new("must be positive"));
        assert_eq!(registry.classify(&err).0.kind, ErrorKind::InvalidArgument);

        let err = anyhow!("boom");
        assert_eq!(registry.classify(&err).0.kind, ErrorKind::Unclassified);
    }

    #[test]
    fn test_classify_through_source_chain() {
        let registry = ErrorRegistry::default();
        let err = anyhow::Error::new(LookupFailed(UserError::new("no such user")));

        let (rule, matched) = registry.classify(&err);
        assert_eq!(rule.kind, ErrorKind::UserDomain);
        assert_eq!(rule.message_for(matched), "no such user");
    }

    #[test]
    fn test_bad_request_outranks_invalid_argument() {
        let registry = ErrorRegistry::default();
        let err = anyhow::Error::new(InvalidArgument::new("must be positive"))
            .context(BadRequestError::new());

        let (rule, matched) = registry.classify(&err);
        assert_eq!(rule.kind, ErrorKind::BadRequest);
        assert_eq!(rule.message_for(matched), "error.bad");
    }

    #[test]
    fn test_declared_reason_wins_over_detail() {
        let registry = ErrorRegistry::default();
        let err = anyhow::Error::new(BadRequestError::with_detail("id was -1"));

        let (rule, matched) = registry.classify(&err);
        assert_eq!(rule.message_for(matched), "error.bad");
    }

    #[test]
    fn test_runtime_message_when_no_declared_reason() {
        let registry = ErrorRegistry::new(ErrorRegistry::default().fallback).with_rule(
            ErrorRule::for_type::<BadRequestError>(
                ErrorKind::BadRequest,
                StatusCode::BAD_REQUEST,
                ErrorCode::Bad,
                MessageSource::Runtime,
            ),
        );
        let err = anyhow::Error::new(BadRequestError::with_detail("id was -1"));

        let (rule, matched) = registry.classify(&err);
        assert_eq!(rule.message_for(matched), "id was -1");
    }

    #[test]
    fn test_fallback_message_is_fixed() {
        let registry = ErrorRegistry::default();
        let err = anyhow!("connection refused to 10.0.0.3");

        let (rule, matched) = registry.classify(&err);
        assert_eq!(rule.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rule.message_for(matched), "internal error");
    }
}
