use super::{Filter, FilterOutcome, PreActionEvent};
use crate::credentials::Credentials;
use crate::error::RestError;
use crate::response::RestResponse;
use crate::users::{PasswordVerifier, UserLookup};
use std::sync::Arc;
use tracing::{debug, warn};

/// Realm announced in the `WWW-Authenticate` challenge.
pub const DEFAULT_REALM: &str = "Provide your credentials.";

/// Priority of the authentication filter; it runs before everything else.
pub const AUTH_PRIORITY: i32 = 100;

/// HTTP Basic authentication filter.
///
/// Every request must carry `Authorization: Basic <base64(user:pass)>` naming
/// an existing user whose password verifies. Otherwise the chain stops with a
/// 401 and a `WWW-Authenticate` challenge that does not pass through error
/// translation. On success the user is attached to the controller.
pub struct BasicAuthFilter {
    users: Arc<dyn UserLookup>,
    verifier: Arc<dyn PasswordVerifier>,
    realm: String,
}

impl BasicAuthFilter {
    pub fn new(users: Arc<dyn UserLookup>, verifier: Arc<dyn PasswordVerifier>) -> Self {
        Self {
            users,
            verifier,
            realm: DEFAULT_REALM.to_string(),
        }
    }

    /// Override the challenge realm.
    #[must_use]
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    /// The 401 response every failed authentication ends with.
    #[must_use]
    pub fn challenge(&self) -> RestResponse {
        let mut response = RestResponse::error(401, "Unauthorized");
        response.set_header(
            "www-authenticate",
            format!("Basic realm=\"{}\"", self.realm),
        );
        response
    }

    fn deny(&self, event: &PreActionEvent<'_>, reason: &'static str) -> FilterOutcome {
        warn!(
            request_id = %event.request_id(),
            resource = %event.request().controller,
            reason = reason,
            "Authentication failed"
        );
        FilterOutcome::ShortCircuit(self.challenge())
    }
}

impl Filter for BasicAuthFilter {
    fn name(&self) -> &'static str {
        "basic_auth"
    }

    fn priority(&self) -> i32 {
        AUTH_PRIORITY
    }

    fn before_action(&self, event: &mut PreActionEvent<'_>) -> Result<FilterOutcome, RestError> {
        let Some(header) = event.request().header("authorization") else {
            return Ok(self.deny(event, "missing authorization header"));
        };
        let Some(credentials) = Credentials::from_authorization(header) else {
            return Ok(self.deny(event, "malformed basic credentials"));
        };

        let Some(user) = self.users.find_by_username(&credentials.username)? else {
            return Ok(self.deny(event, "unknown user"));
        };

        if !self
            .verifier
            .verify(&credentials.username, &credentials.password)?
        {
            return Ok(self.deny(event, "password mismatch"));
        }

        debug!(
            request_id = %event.request_id(),
            username = %user.username,
            "User authenticated"
        );
        event.attach_user(user);
        Ok(FilterOutcome::Proceed)
    }
}
