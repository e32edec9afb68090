use crate::controller::Controller;
use crate::error::RestError;
use crate::ids::RequestId;
use crate::request::RestRequest;
use crate::response::RestResponse;
use crate::users::User;
use std::sync::Arc;
use tracing::debug;

/// What a filter decided about the request.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// Continue with the next filter, then the action
    Proceed,
    /// Stop here and return this response as-is, bypassing error translation
    ShortCircuit(RestResponse),
}

/// Data available to filters before the action runs.
///
/// Filters may only change the controller through
/// [`PreActionEvent::attach_user`].
pub struct PreActionEvent<'a> {
    request_id: RequestId,
    request: &'a RestRequest,
    controller: &'a mut dyn Controller,
}

impl<'a> PreActionEvent<'a> {
    pub fn new(
        request_id: RequestId,
        request: &'a RestRequest,
        controller: &'a mut dyn Controller,
    ) -> Self {
        Self {
            request_id,
            request,
            controller,
        }
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn request(&self) -> &'a RestRequest {
        self.request
    }

    #[must_use]
    pub fn controller(&self) -> &dyn Controller {
        &*self.controller
    }

    /// Hand the authenticated user to the controller.
    pub fn attach_user(&mut self, user: User) {
        self.controller.set_user(user);
    }
}

/// A pre-action check.
pub trait Filter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Higher priorities run first.
    fn priority(&self) -> i32;

    /// Inspect the request before the action runs.
    ///
    /// # Errors
    ///
    /// Failures are translated into error responses by the pipeline.
    fn before_action(&self, event: &mut PreActionEvent<'_>) -> Result<FilterOutcome, RestError>;
}

/// Filters ordered by descending priority.
///
/// Assembled once when the service is built; filters with equal priority keep
/// their insertion order.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<Arc<dyn Filter>>,
}

impl FilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a filter at the position its priority dictates.
    pub fn add(&mut self, filter: Arc<dyn Filter>) {
        let pos = self
            .filters
            .iter()
            .position(|f| f.priority() < filter.priority())
            .unwrap_or(self.filters.len());
        debug!(
            filter = filter.name(),
            priority = filter.priority(),
            position = pos,
            "Filter registered"
        );
        self.filters.insert(pos, filter);
    }

    /// Builder-style variant of [`FilterChain::add`].
    #[must_use]
    pub fn with(mut self, filter: Arc<dyn Filter>) -> Self {
        self.add(filter);
        self
    }

    /// Filter names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every filter in order until one short-circuits or fails.
    ///
    /// # Errors
    ///
    /// The first filter failure, unchanged.
    pub fn run(&self, event: &mut PreActionEvent<'_>) -> Result<FilterOutcome, RestError> {
        for filter in &self.filters {
            match filter.before_action(event)? {
                FilterOutcome::Proceed => {}
                outcome @ FilterOutcome::ShortCircuit(_) => {
                    debug!(
                        request_id = %event.request_id(),
                        filter = filter.name(),
                        "Filter chain short-circuited"
                    );
                    return Ok(outcome);
                }
            }
        }
        Ok(FilterOutcome::Proceed)
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.names())
            .finish()
    }
}
