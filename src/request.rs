//! Per-call request view consumed by the pipeline.
//!
//! A [`RestRequest`] is built once by the routing layer from the route
//! parameters it extracted (`controller`, `id`, `property`), the request
//! headers and the raw body. The pipeline only reads it.

use crate::error::RestError;
use crate::response::HeaderVec;
use http::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Request body materialized as a key → value mapping.
pub type Payload = Map<String, Value>;

/// Immutable request data for one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    /// HTTP method, always upper-cased
    pub method: Method,
    /// Resource name as it appeared in the URL (underscore_case)
    pub controller: String,
    /// Resource identifier, absent for collection requests
    pub id: Option<String>,
    /// Sub-property name, only meaningful together with `id`
    pub property: Option<String>,
    /// HTTP headers
    pub headers: HeaderVec,
    /// Parsed body payload
    pub body: Payload,
}

/// Parse an HTTP verb of any case into an upper-cased [`Method`].
///
/// # Errors
///
/// Returns a 400 [`RestError::Http`] if the string is not a valid method token.
pub fn parse_method(method: &str) -> Result<Method, RestError> {
    Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| RestError::http(400, format!("Invalid HTTP method '{method}'")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl RestRequest {
    /// Create a request for the given method and resource name.
    pub fn new(method: Method, controller: impl Into<String>) -> Self {
        let method = Method::from_bytes(method.as_str().to_ascii_uppercase().as_bytes())
            .unwrap_or(method);
        Self {
            method,
            controller: controller.into(),
            id: None,
            property: None,
            headers: HeaderVec::new(),
            body: Payload::new(),
        }
    }

    /// Build a request from the parameter map produced by the routing layer.
    ///
    /// Reads the `controller`, `id` and `property` keys; empty values count as
    /// absent. Only the empty string is absent: an `id` of `"0"` is a real
    /// identifier, so `GET /user/0` derives `get`, not `get_collection`.
    /// Routing layers that treat falsy values as missing must drop such keys
    /// before calling this.
    ///
    /// # Errors
    ///
    /// Returns a 400 failure for an invalid method string or a missing
    /// `controller` parameter.
    pub fn from_route(method: &str, params: &HashMap<String, String>) -> Result<Self, RestError> {
        let method = parse_method(method)?;
        let controller = params
            .get("controller")
            .filter(|c| !c.is_empty())
            .ok_or_else(|| RestError::http(400, "Missing 'controller' route parameter"))?;
        let mut req = Self::new(method, controller.clone());
        req.id = non_empty(params.get("id").cloned());
        req.property = non_empty(params.get("property").cloned());
        Ok(req)
    }

    /// Set the resource identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = non_empty(Some(id.into()));
        self
    }

    /// Set the sub-property name.
    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = non_empty(Some(property.into()));
        self
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    /// Replace the body payload with already-parsed data.
    #[must_use]
    pub fn with_data(mut self, data: Payload) -> Self {
        self.body = data;
        self
    }

    /// Parse a raw body according to its content type and attach it.
    ///
    /// JSON objects become the payload as-is. Anything that is not
    /// `application/json` is treated as `application/x-www-form-urlencoded`.
    /// Bodies that cannot be materialized as a mapping yield an empty payload.
    #[must_use]
    pub fn with_body(mut self, content_type: Option<&str>, raw: &[u8]) -> Self {
        self.body = parse_body(content_type, raw);
        self
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a resource identifier is present.
    #[inline]
    #[must_use]
    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    /// Body data of a POST request; empty for every other method.
    #[must_use]
    pub fn post_data(&self) -> Payload {
        if self.method == Method::POST {
            self.body.clone()
        } else {
            Payload::new()
        }
    }

    /// Body data of a PUT or PATCH request; empty for every other method.
    #[must_use]
    pub fn put_data(&self) -> Payload {
        if self.method == Method::PUT || self.method == Method::PATCH {
            self.body.clone()
        } else {
            Payload::new()
        }
    }
}

/// Materialize a raw request body as a key → value mapping.
#[must_use]
pub fn parse_body(content_type: Option<&str>, raw: &[u8]) -> Payload {
    if raw.is_empty() {
        return Payload::new();
    }
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if mime == "application/json" || mime.ends_with("+json") {
        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                debug!(kind = %json_kind(&other), "JSON body is not an object, ignoring");
                Payload::new()
            }
            Err(err) => {
                debug!(error = %err, "JSON body parse failed");
                Payload::new()
            }
        }
    } else {
        url::form_urlencoded::parse(raw)
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_is_upper_cased() {
        assert_eq!(parse_method("patch").unwrap(), Method::PATCH);
        assert_eq!(parse_method(" Get ").unwrap(), Method::GET);
        assert!(parse_method("BAD METHOD").is_err());
    }

    #[test]
    fn test_from_route_treats_empty_values_as_absent() {
        let mut params = HashMap::new();
        params.insert("controller".to_string(), "user_profile".to_string());
        params.insert("id".to_string(), String::new());
        params.insert("property".to_string(), "email".to_string());
        let req = RestRequest::from_route("get", &params).unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.controller, "user_profile");
        assert_eq!(req.id, None);
        assert_eq!(req.property.as_deref(), Some("email"));
    }

    #[test]
    fn test_zero_id_is_present() {
        let mut params = HashMap::new();
        params.insert("controller".to_string(), "user".to_string());
        params.insert("id".to_string(), "0".to_string());
        let req = RestRequest::from_route("GET", &params).unwrap();
        assert!(req.has_id());
        assert_eq!(req.id.as_deref(), Some("0"));
    }

    #[test]
    fn test_from_route_requires_controller() {
        let err = RestRequest::from_route("GET", &HashMap::new()).unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_json_body() {
        let req = RestRequest::new(Method::PUT, "user")
            .with_body(Some("application/json; charset=utf-8"), br#"{"name":"neo","age":3}"#);
        assert_eq!(req.body.get("name"), Some(&json!("neo")));
        assert_eq!(req.put_data().len(), 2);
        assert!(req.post_data().is_empty());
    }

    #[test]
    fn test_form_body() {
        let req = RestRequest::new(Method::POST, "user")
            .with_body(Some("application/x-www-form-urlencoded"), b"name=John+Doe&city=Z%C3%BCrich");
        assert_eq!(req.post_data().get("name"), Some(&json!("John Doe")));
        assert_eq!(req.post_data().get("city"), Some(&json!("Zürich")));
    }

    #[test]
    fn test_non_object_json_yields_empty_payload() {
        assert!(parse_body(Some("application/json"), b"[1,2,3]").is_empty());
        assert!(parse_body(Some("application/json"), b"{broken").is_empty());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = RestRequest::new(Method::GET, "user").with_header("Authorization", "Basic abc");
        assert_eq!(req.header("authorization"), Some("Basic abc"));
    }
}
