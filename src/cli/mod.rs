//! Command-line front end: argument parsing, terminal rendering and the
//! interactive loop.
//!
//! ```ignore
//! use genie::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     CliCommand::Chat(options) => { /* build a client and call repl::run */ }
//!     other => { /* version, help or invalid arguments */ }
//! }
//! ```

pub mod args;
pub mod render;
pub mod repl;
pub mod version;

pub use args::{parse_args, CliCommand, CliOptions, USAGE};
pub use render::TerminalRenderer;
pub use repl::{run, ReplCommand};
pub use version::{version_line, VERSION};
