//! Console messages and the results file.
//!
//! Console text is written to whatever sink the caller hands in, so the
//! binary passes stdout and tests pass a `Vec<u8>`.

mod console;
mod results;

pub use console::{print_checking, print_finished, print_report};
pub use results::ResultSink;
