//! # CLI Module
//!
//! Command-line front end for exercising the pipeline without an HTTP
//! server. It builds a [`crate::RestService`] from a config file, registers
//! echo controllers for the requested resources, seeds an in-memory user
//! store and runs a single request through it.
//!
//! ```bash
//! restgate --config restgate.yaml --resource user --user neo:matrix \
//!     --auth neo:matrix PUT user 42 --data '{"name":"Neo"}'
//! ```
//!
//! The status line, headers and JSON body are printed to stdout. The process
//! exits with 0 for a 2xx status and 1 otherwise.

mod commands;

pub use commands::{build_request, build_service, parse_user_pair, run_cli, Cli};
