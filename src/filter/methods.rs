use super::{Filter, FilterOutcome, PreActionEvent};
use crate::controller::COLLECTION_METHODS;
use crate::error::RestError;
use http::Method;
use tracing::warn;

/// Priority of the method allowlist filter; runs after authentication.
pub const METHODS_PRIORITY: i32 = 10;

/// Whether `method` passes the allowlist for a request with or without an id.
///
/// A method must be declared by the controller, and requests without an
/// identifier are limited to GET, HEAD, OPTIONS and POST.
#[must_use]
pub fn method_permitted(method: &str, has_id: bool, allowed: &[Method]) -> bool {
    let method = method.to_ascii_uppercase();
    let declared = allowed.iter().any(|m| m.as_str() == method);
    let collection_ok = has_id || COLLECTION_METHODS.iter().any(|m| m.as_str() == method);
    declared && collection_ok
}

/// Rejects methods the controller does not declare, and mutating methods on
/// collections, with a 405.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowedMethodsFilter;

impl Filter for AllowedMethodsFilter {
    fn name(&self) -> &'static str {
        "allowed_methods"
    }

    fn priority(&self) -> i32 {
        METHODS_PRIORITY
    }

    fn before_action(&self, event: &mut PreActionEvent<'_>) -> Result<FilterOutcome, RestError> {
        let request = event.request();
        let method = request.method.as_str().to_ascii_uppercase();
        let allowed = event.controller().allowed_methods();

        if method_permitted(&method, request.has_id(), allowed) {
            return Ok(FilterOutcome::Proceed);
        }

        warn!(
            request_id = %event.request_id(),
            resource = %event.controller().resource(),
            method = %method,
            has_id = request.has_id(),
            "Method not allowed"
        );
        Err(RestError::MethodNotAllowed {
            method,
            allowed: allowed.iter().map(|m| m.as_str().to_string()).collect(),
        })
    }
}
