//! CLI module for queryshape
//!
//! Provides command-line interface for:
//! - shape: shape and fingerprint of each query
//! - compare: whether two queries share a shape
//! - group: queries grouped by shape

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{compare, group, run, run_command, shape};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_query, read_queries, write_error, write_response, QueryLine};
