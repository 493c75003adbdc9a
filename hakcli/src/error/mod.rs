//! Error types for tree definition, command-line parsing and config loading.
//!
//! The three taxonomies never convert into one another: a
//! [`DefinitionError`] is a programming mistake surfaced while a tree or
//! table is being declared, a [`ParseError`] is a user mistake on the command
//! line, and a [`LoadError`] is a user mistake in a configuration file.

mod types;

pub use types::{
    CoerceError, DefinitionError, HandlerError, LineError, LoadError, ParseError,
};
