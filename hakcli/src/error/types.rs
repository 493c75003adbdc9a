//! Error enums and message carriers.

use std::path::PathBuf;

use camino::Utf8PathBuf;
use thiserror::Error;

/// A token could not be converted into the type a parameter declares.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CoerceError {
    message: String,
}

impl CoerceError {
    /// Creates a conversion failure carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure raised by a handler or a post-parse check.
///
/// Handlers signal user-facing problems (for example "files not set") by
/// returning this type; the parser and the config loader wrap it with the
/// context they own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a handler failure carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Mistakes made while declaring a command tree or a config table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DefinitionError {
    /// A short identifier was not exactly one character long.
    #[error("invalid command shortname ({0}) - must be a single character")]
    MalformedShort(String),

    /// The short identifier is already registered in scope.
    #[error("command shorthand {0} redefined")]
    DuplicateShort(char),

    /// The long identifier is already registered in scope.
    #[error("command switch {0} redefined")]
    DuplicateLong(String),

    /// Neither identifier was supplied and the handler has no name.
    #[error("command needs a short id, a long id or a named handler")]
    MissingIdentifier,

    /// A positional handler followed a repeated one.
    #[error("argument {0} added after repeated argument")]
    ArgumentAfterRepeated(String),

    /// A positional handler declared no parameters.
    #[error("argument handler {0} must take at least one parameter")]
    ArgumentWithoutParameters(String),

    /// The subcommand name is already taken by a sibling.
    #[error("subcommand {0} redefined")]
    DuplicateSubcommand(String),

    /// Two builders exposed a property under the same name.
    #[error("property {0} redefined")]
    DuplicateProperty(String),

    /// Command-line handlers bind a fixed number of tokens.
    #[error("handler {handler} declares variadic parameter {param}; only config options may")]
    VariadicCommandParameter {
        /// Name of the offending handler.
        handler: String,
        /// Name of the variadic parameter.
        param: String,
    },

    /// A variadic parameter must close the signature.
    #[error("variadic parameter {param} of {handler} must be the last parameter")]
    VariadicNotLast {
        /// Name of the offending handler.
        handler: String,
        /// Name of the misplaced parameter.
        param: String,
    },

    /// The config option name is already registered.
    #[error("config option {0} redefined")]
    DuplicateOption(String),
}

/// User mistakes found while consuming an argument vector.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A `-x` or `--xyz` token matched no registered command.
    #[error("unknown switch: {0}")]
    UnknownSwitch(String),

    /// A value arrived with no positional handler left to take it.
    #[error("stray argument: {0}")]
    StrayArgument(String),

    /// A token failed its parameter's coercion.
    #[error("invalid argument for {handler}'s '{param}' param: {source}")]
    InvalidArgument {
        /// Identifier of the handler the token was bound to.
        handler: String,
        /// Parameter being filled.
        param: String,
        /// Underlying conversion failure.
        source: CoerceError,
    },

    /// The argument vector ended while a handler still awaited tokens.
    #[error("missing argument(s) for {handler}: {}", .params.join(", "))]
    MissingArguments {
        /// Identifier of the starved handler.
        handler: String,
        /// Parameters that never received a token.
        params: Vec<String>,
    },

    /// A handler or check rejected the input.
    #[error(transparent)]
    Failed(#[from] HandlerError),

    /// Help or completion output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Problems with a single config line, reported with file and line context.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LineError {
    /// The first token named no registered option.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// A fixed parameter without default had no token left.
    #[error("missing {param} argument for {command}")]
    MissingArgument {
        /// Option being invoked.
        command: String,
        /// Parameter left unfilled.
        param: String,
    },

    /// A token failed its parameter's coercion.
    #[error("invalid {param} argument for {command}: {source}")]
    InvalidArgument {
        /// Option being invoked.
        command: String,
        /// Parameter being filled.
        param: String,
        /// Underlying conversion failure.
        source: CoerceError,
    },

    /// Tokens remained after every parameter was bound.
    #[error("too many arguments for {command}: expected {expected}, got {got}")]
    TooManyArguments {
        /// Option being invoked.
        command: String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of parameters plus leftover tokens.
        got: usize,
    },

    /// The line ended inside a quoted string or after a dangling escape.
    #[error("unbalanced quoting")]
    Quoting,

    /// The option handler rejected its arguments.
    #[error("{command} failed: {source}")]
    Failed {
        /// Option being invoked.
        command: String,
        /// Failure reported by the handler.
        source: HandlerError,
    },
}

/// Fatal problems while loading configuration files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// Reading a config file or directory failed.
    #[error("config {path}: {source}")]
    Io {
        /// File or directory being read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A line of a config file could not be applied.
    #[error("config {path}:{line}: {kind}")]
    Line {
        /// File containing the line.
        path: Utf8PathBuf,
        /// One-based line number.
        line: usize,
        /// What went wrong on that line.
        kind: LineError,
    },

    /// The ascending workdir search exceeded its bound.
    #[error("failed to ascend workdir from {start}")]
    WorkdirAscent {
        /// Directory the search started from.
        start: Utf8PathBuf,
    },

    /// A path involved in discovery is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

impl LoadError {
    /// Line-level failure, if this error is tied to a specific line.
    #[must_use]
    pub const fn line_error(&self) -> Option<&LineError> {
        match self {
            Self::Line { kind, .. } => Some(kind),
            _ => None,
        }
    }
}
