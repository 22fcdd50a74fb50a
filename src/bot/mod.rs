//! Bot logic: routing updates to handlers and turning the outcome into a
//! transport response.

pub mod dispatcher;
pub mod handlers;
pub mod messages;
pub mod trace;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{DispatchError, Dispatcher};
pub use handlers::{combine_caption, Bot, HandlerError, Route};
pub use trace::{DiagnosticTrace, Stage};
