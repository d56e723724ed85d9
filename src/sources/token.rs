use std::fmt;

use http::HeaderValue;

/// Opaque identity token as returned by the metadata service.
///
/// Never parsed and never stored beyond the request it was fetched for.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// `Bearer <token>` marked sensitive, `None` if the token is not a valid header value.
    pub fn bearer_header(&self) -> Option<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0)).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}

impl fmt::Debug for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IdentityToken").field(&"<redacted>").finish()
    }
}

/// Why no token was attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoTokenReason {
    NoAudience,
    Timeout,
    Status(u16),
    Transport,
    EmptyBody,
    InvalidHeaderValue,
}

impl NoTokenReason {
    pub fn as_label(&self) -> &'static str {
        match self {
            NoTokenReason::NoAudience => "no_audience",
            NoTokenReason::Timeout => "timeout",
            NoTokenReason::Status(_) => "status",
            NoTokenReason::Transport => "transport",
            NoTokenReason::EmptyBody => "empty_body",
            NoTokenReason::InvalidHeaderValue => "invalid_header_value",
        }
    }
}

impl fmt::Display for NoTokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoTokenReason::Status(code) => write!(f, "status {}", code),
            other => f.write_str(other.as_label()),
        }
    }
}

/// Result of a best-effort token acquisition. There is no error variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    Token(IdentityToken),
    NoToken(NoTokenReason),
}

impl TokenOutcome {
    pub fn token(&self) -> Option<&IdentityToken> {
        match self {
            TokenOutcome::Token(token) => Some(token),
            TokenOutcome::NoToken(_) => None,
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            TokenOutcome::Token(_) => "token",
            TokenOutcome::NoToken(reason) => reason.as_label(),
        }
    }
}
