//! sample-check: runs a program against paired fixture files and diffs its
//! sorted output against the reference output.

pub use crate::errors::{CheckError, CheckResult};

pub mod cli;
pub mod compare;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod index;
pub mod program;
pub mod runner;
