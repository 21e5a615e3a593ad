//! Backends module - command implementations for the CLI driver
//!
//! Provides:
//! - session: file cache, header maps and search list for one run
//! - resolve: names from the command line
//! - list: the effective search list
//! - deps: include directives of a source file

pub mod deps;
pub mod list;
pub mod resolve;
pub mod session;
