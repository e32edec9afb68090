//! # Controller Module
//!
//! Controllers are the pluggable business-logic handlers the pipeline
//! dispatches to. Each one implements the [`Controller`] contract:
//!
//! - [`Controller::allowed_methods`] - methods the resource accepts
//! - [`Controller::set_user`] - receives the authenticated user
//! - [`Controller::run`] - executes one derived action
//! - [`Controller::take_response`] - hands the produced response back
//!
//! Two variants are not resource controllers:
//!
//! - [`NoneController`] - the sentinel returned for unknown resources
//! - [`ErrorController`] - renders failures, never dispatched to
//!
//! [`ActionTable`] is a small helper for implementing `run` as a
//! name → function map so unknown actions reliably fail with
//! [`crate::error::RestError::ActionNotFound`].
//!
//! ## Example
//!
//! ```rust
//! use restgate::controller::{ActionParams, ActionTable, Controller};
//! use restgate::{RestError, RestResponse};
//!
//! struct Notes {
//!     actions: ActionTable<Notes>,
//!     response: RestResponse,
//! }
//!
//! fn list(_n: &mut Notes, _p: &ActionParams) -> Result<RestResponse, RestError> {
//!     Ok(RestResponse::json(200, serde_json::json!([])))
//! }
//!
//! impl Controller for Notes {
//!     fn resource(&self) -> &str { "Note" }
//!     fn run(&mut self, action: &str, params: ActionParams) -> Result<(), RestError> {
//!         let actions = std::mem::take(&mut self.actions);
//!         let result = actions.call("Note", self, action, &params);
//!         self.actions = actions;
//!         self.response = result?;
//!         Ok(())
//!     }
//!     fn take_response(&mut self) -> RestResponse {
//!         std::mem::take(&mut self.response)
//!     }
//! }
//!
//! let mut notes = Notes {
//!     actions: ActionTable::new().on("get_collection", list),
//!     response: RestResponse::default(),
//! };
//! notes.run("get_collection", ActionParams::default()).unwrap();
//! assert_eq!(notes.take_response().status, 200);
//! ```

mod core;
mod echo;
mod error;

pub use core::{
    Action, ActionParams, ActionTable, Controller, NoneController, ResolvedController,
    ALL_METHODS, COLLECTION_METHODS,
};
pub use echo::EchoController;
pub use error::ErrorController;
