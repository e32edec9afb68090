use super::{ActionParams, Controller, ALL_METHODS};
use crate::error::RestError;
use crate::request::RestRequest;
use crate::response::RestResponse;
use crate::users::User;
use http::Method;
use serde_json::json;

/// Diagnostic controller: echoes back whatever it was asked to do.
///
/// Accepts every action whose name starts with one of its allowed methods
/// (lower-cased), e.g. `get_collection`, `put` or `get_email`, and answers
/// with the action, route parameters, data and authenticated user.
pub struct EchoController {
    resource: String,
    id: Option<String>,
    property: Option<String>,
    allowed: Vec<Method>,
    user: Option<User>,
    response: RestResponse,
}

impl EchoController {
    pub fn new(resource: impl Into<String>, request: &RestRequest) -> Self {
        Self {
            resource: resource.into(),
            id: request.id.clone(),
            property: request.property.clone(),
            allowed: ALL_METHODS.to_vec(),
            user: None,
            response: RestResponse::default(),
        }
    }

    /// Restrict the methods this echo resource accepts.
    #[must_use]
    pub fn with_methods(mut self, methods: &[Method]) -> Self {
        self.allowed = methods.to_vec();
        self
    }

    fn handles(&self, action: &str) -> bool {
        self.allowed.iter().any(|m| {
            let verb = m.as_str().to_ascii_lowercase();
            action == verb
                || action
                    .strip_prefix(verb.as_str())
                    .is_some_and(|rest| rest.starts_with('_') && rest.len() > 1)
        })
    }
}

impl Controller for EchoController {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn allowed_methods(&self) -> &[Method] {
        &self.allowed
    }

    fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    fn run(&mut self, action: &str, params: ActionParams) -> Result<(), RestError> {
        if !self.handles(action) {
            return Err(RestError::action_not_found(&self.resource, action));
        }
        let status = if action == "post" { 201 } else { 200 };
        self.response = RestResponse::json(
            status,
            json!({
                "resource": self.resource,
                "action": action,
                "id": self.id,
                "property": self.property,
                "data": params.data,
                "user": self.user.as_ref().map(|u| u.username.as_str()),
            }),
        );
        Ok(())
    }

    fn take_response(&mut self) -> RestResponse {
        std::mem::take(&mut self.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echoes_action_and_user() {
        let req = RestRequest::new(Method::GET, "user").with_id("7").with_property("email");
        let mut echo = EchoController::new("User", &req);
        echo.set_user(User::new("alice"));
        echo.run("get_email", ActionParams::default()).unwrap();
        let res = echo.take_response();
        assert_eq!(res.status, 200);
        assert_eq!(res.body["action"], "get_email");
        assert_eq!(res.body["id"], "7");
        assert_eq!(res.body["user"], "alice");
    }

    #[test]
    fn test_rejects_actions_outside_allowed_methods() {
        let req = RestRequest::new(Method::DELETE, "user").with_id("7");
        let mut echo = EchoController::new("User", &req).with_methods(&[Method::GET]);
        assert!(echo.handles("get_collection"));
        assert!(!echo.handles("getaway"));
        assert!(!echo.handles("get_"));
        let err = echo.run("delete", ActionParams::default()).unwrap_err();
        assert_eq!(err.status(), 404);
    }
}
