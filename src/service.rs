//! The request pipeline: resolve → filter → dispatch, with every failure
//! translated into a structured response.

use crate::config::ServiceConfig;
use crate::controller::ErrorController;
use crate::dispatcher::dispatch;
use crate::error::RestError;
use crate::filter::{
    AllowedMethodsFilter, BasicAuthFilter, Filter, FilterChain, FilterOutcome, PreActionEvent,
};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::registry::ControllerRegistry;
use crate::request::RestRequest;
use crate::response::RestResponse;
use crate::users::{PasswordVerifier, UserLookup};
use std::sync::Arc;
use tracing::{error, info_span, warn};

/// How a request left the pipeline without failing.
enum Handled {
    /// The action ran; its response is returned as-is
    Dispatched(RestResponse),
    /// A filter stopped the request with its own response
    Stopped(RestResponse),
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// REST dispatch service.
///
/// Built once at startup and read-only afterwards; share it across request
/// threads behind an `Arc`.
#[derive(Debug)]
pub struct RestService {
    registry: ControllerRegistry,
    filters: FilterChain,
}

impl RestService {
    /// Build a service with the default filter chain: Basic authentication
    /// (realm from `config`) followed by the method allowlist. Excluded
    /// models from `config` are added to the registry's exclusions.
    pub fn new(
        config: &ServiceConfig,
        mut registry: ControllerRegistry,
        users: Arc<dyn UserLookup>,
        verifier: Arc<dyn PasswordVerifier>,
    ) -> Self {
        registry
            .exclusions_mut()
            .exclude_models(config.rest.excluded_models.iter().cloned());
        let filters = FilterChain::new()
            .with(Arc::new(
                BasicAuthFilter::new(users, verifier).realm(config.rest.realm.clone()),
            ))
            .with(Arc::new(AllowedMethodsFilter));
        Self { registry, filters }
    }

    /// Replace the filter chain.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterChain) -> Self {
        self.filters = filters;
        self
    }

    /// Add one filter to the chain at its priority.
    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.add(filter);
        self
    }

    #[must_use]
    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    #[must_use]
    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    /// Exclude a resource from REST exposure.
    pub fn exclude_model(&mut self, name: impl Into<String>) {
        self.registry.exclusions_mut().exclude_model(name);
    }

    /// Exclude several resources; duplicates are ignored.
    pub fn exclude_models<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.exclusions_mut().exclude_models(names);
    }

    /// Current exclusions in insertion order.
    #[must_use]
    pub fn excluded_models(&self) -> &[String] {
        self.registry.exclusions().excluded_models()
    }

    /// Run one request through the pipeline.
    ///
    /// Always produces a response. A dispatched controller's response is
    /// returned untouched. Responses the pipeline builds itself (filter
    /// short-circuits and translated failures) carry the request id in
    /// `X-Request-Id`. Panics in factories, filters or actions are caught and
    /// translated like any other unexpected failure.
    #[must_use]
    pub fn handle_request(&self, request: &RestRequest) -> RestResponse {
        let request_id = RequestId::from_header_or_new(request.header(REQUEST_ID_HEADER));
        let span = info_span!(
            "rest_request",
            request_id = %request_id,
            method = %request.method,
            controller = %request.controller,
        );
        let _enter = span.enter();

        let handled = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.process(request_id, request)
        }))
        .unwrap_or_else(|panic| {
            let panic_message = panic_message(panic.as_ref());
            let backtrace = std::backtrace::Backtrace::capture();
            error!(
                request_id = %request_id,
                panic_message = %panic_message,
                backtrace = %backtrace,
                "Controller panicked"
            );
            Err(RestError::Unexpected(anyhow::anyhow!(
                "controller panicked: {panic_message}"
            )))
        });

        match handled {
            Ok(Handled::Dispatched(response)) => response,
            Ok(Handled::Stopped(mut response)) => {
                response.set_header(REQUEST_ID_HEADER, request_id.to_string());
                response
            }
            Err(err) => {
                let mut response = Self::handle_exception(request, request_id, err);
                response.set_header(REQUEST_ID_HEADER, request_id.to_string());
                response
            }
        }
    }

    fn process(&self, request_id: RequestId, request: &RestRequest) -> Result<Handled, RestError> {
        let mut resolved = self.registry.resolve(request);

        let outcome = {
            let mut event = PreActionEvent::new(request_id, request, resolved.controller_mut());
            self.filters.run(&mut event)?
        };
        if let FilterOutcome::ShortCircuit(response) = outcome {
            return Ok(Handled::Stopped(response));
        }

        let (_action, response) = dispatch(request, &mut resolved)?;
        Ok(Handled::Dispatched(response))
    }

    /// Translate a failure into the error controller's `show` response.
    ///
    /// Client errors log at `warn`, server errors at `error` with the full
    /// cause chain, which never reaches the response body.
    #[must_use]
    pub fn handle_exception(
        request: &RestRequest,
        request_id: RequestId,
        err: RestError,
    ) -> RestResponse {
        let status = err.status();
        if status >= 500 {
            error!(request_id = %request_id, status, error = ?err, "Request failed");
        } else {
            warn!(request_id = %request_id, status, error = %err, "Request rejected");
        }
        let mut controller = ErrorController::new(request, request_id);
        controller.set_error(err);
        controller.show()
    }
}
