//! # Filter Module
//!
//! Pre-action filters run between controller resolution and action
//! dispatch. Each filter sees a [`PreActionEvent`] and decides whether the
//! request may continue:
//!
//! - [`FilterOutcome::Proceed`] hands the request to the next filter
//! - [`FilterOutcome::ShortCircuit`] returns a response immediately
//! - `Err(RestError)` goes through error translation
//!
//! The default chain, ordered by priority:
//!
//! | priority | filter                   | failure                        |
//! |----------|--------------------------|--------------------------------|
//! | 100      | [`BasicAuthFilter`]      | 401 + `WWW-Authenticate`       |
//! | 10       | [`AllowedMethodsFilter`] | 405 `Method Not Allowed`       |

mod auth;
mod core;
mod methods;

pub use auth::{BasicAuthFilter, AUTH_PRIORITY, DEFAULT_REALM};
pub use core::{Filter, FilterChain, FilterOutcome, PreActionEvent};
pub use methods::{method_permitted, AllowedMethodsFilter, METHODS_PRIORITY};
