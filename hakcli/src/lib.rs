//! Declarative command-line trees and line-oriented configuration files.
//!
//! A program describes its command line as a tree of [`CliNode`]s. Each node
//! holds switch-triggered commands, positional argument handlers, literal
//! subcommands, post-parse checks and extra help text. [`CliNode::process`]
//! walks an argument vector, coerces tokens with [`coerce::Coercion`]s and
//! invokes the matching [`handler::Handler`]s. The same handlers can be
//! registered in a [`config::ConfigTable`] and driven by config files instead.
//!
//! ```
//! use hakcli::CliNode;
//! use hakcli::coerce::Coercion;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut root = CliNode::root("fetch", Some("Download things"));
//! let verbose = root.counted_flag(Some("v"), "verbose", Some("More output"))?;
//! let retries = root.variable(Coercion::<u32>::parse(), 1, Some("r"), "retries", None)?;
//! let urls = root.arg_list_variable(Coercion::<String>::parse(), "urls", None, true)?;
//!
//! let mut help: Vec<u8> = Vec::new();
//! root.try_process(["fetch", "-vv", "-r", "3", "a", "b"], &mut help)?;
//! assert_eq!(verbose.count(), 2);
//! assert_eq!(retries.value(), 3);
//! assert_eq!(urls.values(), ["a", "b"]);
//! assert_eq!(root.property::<u32>("retries"), Some(3));
//! # Ok(())
//! # }
//! ```

pub mod builders;
pub mod coerce;
pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
mod node;
pub mod text;

pub use builders::{ArgListVariable, ArgVariable, CountedFlag, Flag, Variable, VariableList};
pub use error::{CoerceError, DefinitionError, HandlerError, LineError, LoadError, ParseError};
pub use node::{Activation, CliNode, ParseOutcome};
