//! # Dispatcher Module
//!
//! Turns a filtered request into a controller action call.
//!
//! ## Action naming
//!
//! The action name is a pure function of the HTTP method, whether an
//! identifier and a sub-property are present, and whether the controller is
//! the sentinel. It is the compatibility contract between URLs and controller
//! actions:
//!
//! ```text
//! GET    /user            → get_collection
//! POST   /user            → post
//! GET    /user/42         → get
//! PUT    /user/42         → put
//! GET    /user/42/email   → get_email
//! DELETE /user/42         → delete
//! ```
//!
//! ## Parameters
//!
//! Actions receive an [`crate::controller::ActionParams`] whose `data` is the
//! request body for POST, PUT and PATCH and empty for every other method.

mod core;

pub use core::{action_params, derive_action, dispatch};
