//! Failure taxonomy of the dispatch pipeline.
//!
//! Every failure raised while resolving, filtering or dispatching a request is
//! a [`RestError`]. The pipeline never lets one escape: the error translator in
//! [`crate::service`] turns it into a structured response. Authentication
//! failures are deliberately absent here because they never travel as errors;
//! the authentication filter short-circuits with a finished 401 response
//! instead (see [`crate::filter::FilterOutcome`]).

use std::fmt;

/// Error raised anywhere between controller resolution and action execution.
#[derive(Debug)]
pub enum RestError {
    /// The request method is not allowed for the resource, or a mutating
    /// method was used on a collection.
    MethodNotAllowed {
        /// Upper-cased method of the rejected request
        method: String,
        /// Methods the controller declares, for the `Allow` header
        allowed: Vec<String>,
    },
    /// The derived action name has no handler on the resolved controller.
    ActionNotFound {
        /// Resource name of the controller the action was looked up on
        controller: String,
        /// Derived action name (e.g. `get_collection`)
        action: String,
    },
    /// A controller-raised HTTP failure with an explicit status code.
    Http {
        /// HTTP status to respond with
        status: u16,
        /// Client-facing message
        message: String,
    },
    /// Any other failure from controller logic or collaborators.
    ///
    /// Rendered as a generic 500; the inner error is logged only.
    Unexpected(anyhow::Error),
}

impl RestError {
    /// Build a generic HTTP failure.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        RestError::Http {
            status,
            message: message.into(),
        }
    }

    /// Build an action lookup failure.
    pub fn action_not_found(controller: impl Into<String>, action: impl Into<String>) -> Self {
        RestError::ActionNotFound {
            controller: controller.into(),
            action: action.into(),
        }
    }

    /// HTTP status this failure is presented with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            RestError::MethodNotAllowed { .. } => 405,
            RestError::ActionNotFound { .. } => 404,
            RestError::Http { status, .. } => *status,
            RestError::Unexpected(_) => 500,
        }
    }

    /// Message that is safe to show to the client.
    ///
    /// Unexpected failures never leak their inner message.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            RestError::MethodNotAllowed { .. } => "Method Not Allowed".to_string(),
            RestError::ActionNotFound { .. } => "Not Found".to_string(),
            RestError::Http { message, .. } => message.clone(),
            RestError::Unexpected(_) => "Internal Server Error".to_string(),
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::MethodNotAllowed { method, .. } => {
                write!(f, "Method Not Allowed: {method}")
            }
            RestError::ActionNotFound { controller, action } => {
                write!(f, "action '{action}' not found on controller '{controller}'")
            }
            RestError::Http { status, message } => write!(f, "HTTP {status}: {message}"),
            RestError::Unexpected(err) => write!(f, "unexpected failure: {err:#}"),
        }
    }
}

impl std::error::Error for RestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RestError::Unexpected(err) => {
                let source: &(dyn std::error::Error + 'static) = err.as_ref();
                Some(source)
            }
            _ => None,
        }
    }
}

impl From<anyhow::Error> for RestError {
    fn from(err: anyhow::Error) -> Self {
        RestError::Unexpected(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let method = RestError::MethodNotAllowed {
            method: "DELETE".into(),
            allowed: vec!["GET".into()],
        };
        assert_eq!(method.status(), 405);
        assert_eq!(method.public_message(), "Method Not Allowed");
        assert_eq!(RestError::action_not_found("User", "get_email").status(), 404);
        assert_eq!(RestError::http(409, "conflict").status(), 409);
        assert_eq!(RestError::from(anyhow::anyhow!("db down")).status(), 500);
    }

    #[test]
    fn test_unexpected_message_is_not_public() {
        let err = RestError::from(anyhow::anyhow!("password column missing"));
        assert_eq!(err.public_message(), "Internal Server Error");
        assert!(err.to_string().contains("password column missing"));
    }
}
