//! Correlation ids for pipeline invocations.
//!
//! The id opens the `rest_request` span, is embedded in every error body the
//! error controller renders and is returned in `X-Request-Id` on responses
//! the pipeline builds itself. A caller that already has a ULID (a gateway,
//! a retrying client) can pass it in and see the same id in the logs.

use std::fmt;
use std::str::FromStr;

/// Request header read for a caller-supplied id, and response header the
/// pipeline echoes it in.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id of one `handle_request` call.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(pub ulid::Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Reuse the caller's `X-Request-Id` when it holds a ULID (surrounding
    /// whitespace ignored); any other value, or none, gets a fresh id so a
    /// malformed header never fails the request.
    #[must_use]
    pub fn from_header_or_new(header_value: Option<&str>) -> Self {
        match header_value.map(str::trim).map(str::parse::<RequestId>) {
            Some(Ok(id)) => id,
            _ => Self::new(),
        }
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ulid::Ulid::from_string(s).map(Self)
    }
}
