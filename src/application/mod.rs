//! Application layer containing the mapping resolution and editing logic.
//!
//! `ResolutionEngine` answers "which screens, in which order" for an
//! application context. `DraftEditor` wraps one editing session over a
//! context and writes the result back through the repository port.

pub mod draft;
pub mod resolver;

pub use draft::{Draft, DraftEditor};
pub use resolver::ResolutionEngine;
