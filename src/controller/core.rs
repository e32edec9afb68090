use crate::error::RestError;
use crate::request::Payload;
use crate::response::RestResponse;
use crate::users::User;
use http::Method;
use std::collections::HashMap;
use tracing::debug;

/// Every method a controller can declare.
pub static ALL_METHODS: [Method; 7] = [
    Method::GET,
    Method::HEAD,
    Method::OPTIONS,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// Methods that may be used without a resource identifier.
pub static COLLECTION_METHODS: [Method; 4] =
    [Method::GET, Method::HEAD, Method::OPTIONS, Method::POST];

/// Parameter bag handed to a controller action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionParams {
    /// Request payload: POST data for POST, PUT data for PUT/PATCH, empty otherwise
    pub data: Payload,
}

/// Contract every resource controller implements.
///
/// One instance is created per request by the factory registered for its
/// resource, receives the authenticated user through [`Controller::set_user`],
/// runs exactly one action and then hands its response to the pipeline.
pub trait Controller {
    /// PascalCase resource name this controller serves.
    fn resource(&self) -> &str;

    /// Methods this resource accepts. Defaults to every method.
    fn allowed_methods(&self) -> &[Method] {
        &ALL_METHODS
    }

    /// Receive the authenticated user. Controllers without per-user
    /// authorization may ignore it.
    fn set_user(&mut self, _user: User) {}

    /// Run the named action.
    ///
    /// # Errors
    ///
    /// Unknown action names must fail with [`RestError::ActionNotFound`];
    /// anything else the action raises is translated by the pipeline.
    fn run(&mut self, action: &str, params: ActionParams) -> Result<(), RestError>;

    /// Move the response produced by the last action out of the controller.
    fn take_response(&mut self) -> RestResponse;
}

/// Signature of an action registered in an [`ActionTable`].
pub type Action<C> = fn(&mut C, &ActionParams) -> Result<RestResponse, RestError>;

/// Name → action map a controller uses to implement [`Controller::run`].
///
/// Looking up a name that was never registered yields
/// [`RestError::ActionNotFound`] instead of silently doing nothing.
pub struct ActionTable<C> {
    actions: HashMap<&'static str, Action<C>>,
}

impl<C> Default for ActionTable<C> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<C> ActionTable<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under `name`, replacing any previous one.
    #[must_use]
    pub fn on(mut self, name: &'static str, action: Action<C>) -> Self {
        self.actions.insert(name, action);
        self
    }

    /// Whether an action with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered action names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.actions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Invoke `action` on `controller`.
    ///
    /// # Errors
    ///
    /// [`RestError::ActionNotFound`] for unknown names, otherwise whatever the
    /// action returns.
    pub fn call(
        &self,
        resource: &str,
        controller: &mut C,
        action: &str,
        params: &ActionParams,
    ) -> Result<RestResponse, RestError> {
        let Some(handler) = self.actions.get(action) else {
            debug!(resource = %resource, action = %action, "No such action");
            return Err(RestError::action_not_found(resource, action));
        };
        handler(controller, params)
    }
}

/// Placeholder controller used when no concrete resource matches.
///
/// It keeps the filter chain uniform for unknown resources: by default it
/// allows no method at all, so every authenticated request to an unknown
/// resource ends in the same 405 a known resource would produce. Actions on
/// the sentinel are never suffixed with `_collection` or `_<property>`.
#[derive(Debug, Clone)]
pub struct NoneController {
    requested: String,
    allowed: Vec<Method>,
    response: RestResponse,
}

impl NoneController {
    /// Sentinel for the (unknown) resource name that was requested.
    pub fn new(requested: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            allowed: Vec::new(),
            response: RestResponse::default(),
        }
    }

    /// Let the sentinel accept some methods, e.g. to answer `OPTIONS` on
    /// unknown paths.
    #[must_use]
    pub fn with_methods(mut self, methods: &[Method]) -> Self {
        self.allowed = methods.to_vec();
        self
    }

    /// The resource name that failed to resolve.
    #[must_use]
    pub fn requested(&self) -> &str {
        &self.requested
    }
}

impl Controller for NoneController {
    fn resource(&self) -> &str {
        &self.requested
    }

    fn allowed_methods(&self) -> &[Method] {
        &self.allowed
    }

    fn run(&mut self, action: &str, _params: ActionParams) -> Result<(), RestError> {
        match action {
            "options" | "head" => {
                let allow = self
                    .allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut response = RestResponse::empty(204);
                response.set_header("allow", allow);
                self.response = response;
                Ok(())
            }
            _ => Err(RestError::action_not_found(&self.requested, action)),
        }
    }

    fn take_response(&mut self) -> RestResponse {
        std::mem::take(&mut self.response)
    }
}

/// Result of controller resolution.
///
/// The sentinel is an explicit variant so the dispatcher can tell it apart
/// without downcasting.
pub enum ResolvedController {
    /// A registered resource controller
    Resource(Box<dyn Controller>),
    /// No resource matched the requested name
    Sentinel(NoneController),
}

impl ResolvedController {
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, ResolvedController::Sentinel(_))
    }

    #[must_use]
    pub fn controller(&self) -> &dyn Controller {
        match self {
            ResolvedController::Resource(c) => &**c,
            ResolvedController::Sentinel(c) => c,
        }
    }

    pub fn controller_mut(&mut self) -> &mut dyn Controller {
        match self {
            ResolvedController::Resource(c) => &mut **c,
            ResolvedController::Sentinel(c) => c,
        }
    }
}

impl std::fmt::Debug for ResolvedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedController::Resource(c) => {
                f.debug_tuple("Resource").field(&c.resource()).finish()
            }
            ResolvedController::Sentinel(c) => {
                f.debug_tuple("Sentinel").field(&c.requested()).finish()
            }
        }
    }
}
