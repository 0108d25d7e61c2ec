//! submit-compare-core: Content model, submission controller, and host ports.
//!
//! This crate holds everything the submit-and-compare block does on its own:
//! parsing the question XML, scoring and limiting submissions, deriving the
//! progress strings, and answering the browser's JSON handlers. The course
//! platform is reached only through the traits in [`traits`].

pub mod block;
pub mod error;
pub mod handlers;
pub mod model;
pub mod parser;
pub mod progress;
pub mod traits;

pub use block::{BlockServices, SubmitAndCompareBlock};
pub use error::{BlockError, ContentError, HandlerError, StoreError};
