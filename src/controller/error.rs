use crate::error::RestError;
use crate::ids::RequestId;
use crate::request::RestRequest;
use crate::response::{status_reason, RestResponse};
use http::Method;
use serde_json::json;

/// Controller dedicated to presenting failures.
///
/// Bound to the request that failed; the cause is attached with
/// [`ErrorController::set_error`] and rendered by [`ErrorController::show`].
/// `show` cannot fail, so there is no fallback below it.
#[derive(Debug)]
pub struct ErrorController {
    request_id: RequestId,
    method: Method,
    resource: String,
    error: Option<RestError>,
}

impl ErrorController {
    pub fn new(request: &RestRequest, request_id: RequestId) -> Self {
        Self {
            request_id,
            method: request.method.clone(),
            resource: request.controller.clone(),
            error: None,
        }
    }

    pub fn set_error(&mut self, error: RestError) {
        self.error = Some(error);
    }

    #[must_use]
    pub fn error(&self) -> Option<&RestError> {
        self.error.as_ref()
    }

    /// Render the attached failure as a JSON error response.
    ///
    /// The body carries the status, its reason phrase, the client-safe message
    /// and the request id. A 405 also gets an `Allow` header listing the
    /// methods the resource declares; resources declaring none (the sentinel)
    /// get no `Allow` header at all. Without an attached error the response
    /// is a plain 500.
    #[must_use]
    pub fn show(&self) -> RestResponse {
        let (status, message) = match &self.error {
            Some(err) => (err.status(), err.public_message()),
            None => (500, status_reason(500).to_string()),
        };
        let mut response = RestResponse::json(
            status,
            json!({
                "error": message,
                "status": status,
                "reason": status_reason(status),
                "request_id": self.request_id.to_string(),
                "method": self.method.as_str(),
                "resource": self.resource,
            }),
        );
        if let Some(RestError::MethodNotAllowed { allowed, .. }) = &self.error {
            if !allowed.is_empty() {
                response.set_header("allow", allowed.join(", "));
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ErrorController {
        let req = RestRequest::new(Method::DELETE, "user");
        ErrorController::new(&req, RequestId::new())
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let mut ctrl = controller();
        ctrl.set_error(RestError::MethodNotAllowed {
            method: "DELETE".into(),
            allowed: vec!["GET".into(), "PUT".into()],
        });
        let res = ctrl.show();
        assert_eq!(res.status, 405);
        assert_eq!(res.body["error"], "Method Not Allowed");
        assert_eq!(res.get_header("allow"), Some("GET, PUT"));
    }

    #[test]
    fn test_no_allow_header_when_nothing_is_allowed() {
        let mut ctrl = controller();
        ctrl.set_error(RestError::MethodNotAllowed {
            method: "GET".into(),
            allowed: Vec::new(),
        });
        let res = ctrl.show();
        assert_eq!(res.status, 405);
        assert!(res.get_header("allow").is_none());
    }

    #[test]
    fn test_unexpected_failure_hides_details() {
        let mut ctrl = controller();
        ctrl.set_error(anyhow::anyhow!("connection refused on 10.0.0.3").into());
        let res = ctrl.show();
        assert_eq!(res.status, 500);
        assert_eq!(res.body["error"], "Internal Server Error");
        assert!(!res.body.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_show_without_error_is_500() {
        let res = controller().show();
        assert_eq!(res.status, 500);
        assert_eq!(res.body["resource"], "user");
    }
}
