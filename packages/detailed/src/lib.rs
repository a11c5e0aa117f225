//! Diagnostic decoration for ordinary Rust errors
//!
//! This crate attaches structural context to an error value:
//! - the call site that created the decoration (file, line, and with the
//!   macros the enclosing function)
//! - optionally a bounded call stack
//! - an annotation, a single cause and an ordered list of related errors
//!
//! and renders it at the verbosity a consumer asks for:
//!
//! | hook              | [`Verbosity`] | output |
//! |-------------------|---------------|--------|
//! | `{}`              | `Terse`       | `annotation: origin caused by cause` |
//! | `{:+}`            | `Located`     | `annotation: origin @ file:line caused by cause @ file:line` |
//! | `{:#}`, `{:?}`    | `Full`        | located text naming the function when known, then the captured call stack |
//! | `render(Quoted)`  | `Quoted`      | terse text as an escaped string literal |
//!
//! ```
//! use detailed::{origin, Detailed, Message};
//!
//! let err = Detailed::new("base").caused_by(Detailed::new("inner"));
//! assert_eq!(err.to_string(), "base caused by inner");
//! assert!(origin(&err).is::<Message>());
//! ```
//!
//! Values are immutable once built. Builder methods return a new value that
//! shares the unchanged parts, so a `Detailed` can be cloned into other
//! threads and extended there freely.

mod capture;
mod constructors;
mod display;
mod extensions;
pub mod logging;
#[doc(hidden)]
pub mod macros;
pub mod paths;
mod report;
mod types;

pub use capture::{Frame, Location, Stack, DEFAULT_STACK_DEPTH, UNKNOWN_FUNCTION};
pub use constructors::{base, origin};
pub use display::{render, InvalidVerb, Rendered, Verbosity, VERBOSITY_ENV};
pub use extensions::{OptionExt, ResultExt};
pub use logging::ErrorLogger;
pub use report::Report;
pub use types::{Detailed, Message, Result, SharedError};
