//! HTTP Basic credential extraction.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use std::fmt;

/// Standard alphabet decoder that accepts payloads with or without `=`
/// padding; clients disagree on whether to pad Basic credentials.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Scheme marker an `Authorization` header must start with.
pub const BASIC_SCHEME: &str = "Basic ";

/// Username/password pair decoded from an `Authorization: Basic` header.
///
/// Lives only for the duration of the authentication check. The password is
/// never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl Credentials {
    /// Decode credentials from a raw `Authorization` header value.
    ///
    /// Returns `None` when the header does not use the Basic scheme, the
    /// payload is not valid base64/UTF-8, or the username is empty. The
    /// payload is split on the first colon only, so passwords may contain
    /// colons; a payload without any colon is a username with an empty
    /// password.
    #[must_use]
    pub fn from_authorization(header: &str) -> Option<Self> {
        let encoded = header.strip_prefix(BASIC_SCHEME)?.trim();
        let decoded = LENIENT.decode(encoded).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = match decoded.split_once(':') {
            Some((user, pass)) => (user, pass),
            None => (decoded.as_str(), ""),
        };
        if username.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Encode a header value for these credentials. Used by clients and tests.
    #[must_use]
    pub fn to_authorization(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("{BASIC_SCHEME}{}", STANDARD.encode(raw))
    }
}
