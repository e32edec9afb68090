//! # restgate
//!
//! **restgate** is the dispatch core of a REST service: it takes a request
//! whose route parameters (`controller`, `id`, `property`) have already been
//! extracted, authenticates it with HTTP Basic, checks the method against
//! the resource's allowlist, derives the controller action from REST
//! conventions and runs it. Every failure ends as a structured JSON error
//! response.
//!
//! ## Architecture
//!
//! - **[`request`]** / **[`response`]** - per-call request view and the
//!   response handed back to the transport
//! - **[`registry`]** - resource name → controller factory, with the
//!   sentinel for unknown and excluded resources
//! - **[`filter`]** - priority-ordered pre-action checks (Basic auth, method
//!   allowlist)
//! - **[`dispatcher`]** - action naming and invocation
//! - **[`controller`]** - the controller contract, the sentinel, the error
//!   controller and a diagnostic echo controller
//! - **[`service`]** - the pipeline tying everything together
//! - **[`config`]** / **[`logging`]** - startup configuration and tracing
//!
//! ### Request flow
//!
//! ```text
//! RestRequest
//!   → ControllerRegistry::resolve     (UserProfile | sentinel)
//!   → FilterChain::run                (401 short-circuit | 405 error)
//!   → dispatch                        (get_collection, put, get_email, ...)
//!   → Controller::take_response
//!   ↘ on any failure: ErrorController::show
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use restgate::controller::{Controller, EchoController};
//! use restgate::config::ServiceConfig;
//! use restgate::credentials::Credentials;
//! use restgate::registry::ControllerRegistry;
//! use restgate::users::InMemoryUserStore;
//! use restgate::{RestRequest, RestService};
//! use std::sync::Arc;
//!
//! let registry = ControllerRegistry::new()
//!     .with("UserProfile", |req: &RestRequest| -> Box<dyn Controller> {
//!         Box::new(EchoController::new("UserProfile", req))
//!     })
//!     .unwrap();
//! let users = Arc::new(InMemoryUserStore::new().with_user("neo", "matrix"));
//! let service = RestService::new(&ServiceConfig::default(), registry, users.clone(), users);
//!
//! let auth = Credentials { username: "neo".into(), password: "matrix".into() };
//! let request = RestRequest::new(http::Method::GET, "user_profile")
//!     .with_header("Authorization", auth.to_authorization());
//!
//! let response = service.handle_request(&request);
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body["action"], "get_collection");
//! ```

pub mod cli;
pub mod config;
pub mod controller;
pub mod credentials;
pub mod dispatcher;
pub mod error;
pub mod exclusions;
pub mod filter;
pub mod ids;
pub mod logging;
pub mod registry;
pub mod request;
pub mod response;
pub mod service;
pub mod users;

pub use config::{load_config, RestConfig, ServiceConfig};
pub use controller::{Controller, ResolvedController};
pub use error::RestError;
pub use exclusions::ExcludedModels;
pub use filter::{Filter, FilterChain, FilterOutcome};
pub use ids::RequestId;
pub use registry::{ControllerRegistry, RegistrationError};
pub use request::{Payload, RestRequest};
pub use response::RestResponse;
pub use service::RestService;
pub use users::{PasswordVerifier, User, UserLookup};
