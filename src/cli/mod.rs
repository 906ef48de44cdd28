//! Command line front end for the `rt` binary.
//!
//! This module contains the clap argument types and the runner that maps
//! each command onto an `RtClient` operation.

mod args;
mod runner;

pub use args::*;
pub use runner::*;
