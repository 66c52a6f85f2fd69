//! Command handlers.
//!
//! Handlers are thin: they call core services through [`crate::CliContext`]
//! and hand the results to [`crate::presentation`]. They return the process
//! exit code.

pub mod check;
pub mod requests;
