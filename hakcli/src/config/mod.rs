//! Line-oriented configuration files.
//!
//! Every non-empty line of a config file invokes one registered option: the
//! first shell-style token names the option, the remaining tokens fill its
//! parameters. Fixed parameters take one token each and fall back to their
//! default when the line runs short; a trailing variadic parameter takes the
//! rest.
//!
//! ```text
//! # ~/.config/tool/main.cfg
//! name "Ada Lovelace"
//! retries 3
//! include src docs "release notes"
//! ```
//!
//! [`ConfigSources`] decides which files are read and in which order.

use std::collections::HashMap;
use std::io::{self, Write};

use camino::Utf8Path;
use tracing::subscriber::NoSubscriber;

use crate::error::{DefinitionError, LineError, LoadError};
use crate::handler::{Args, Handler, ParamKind};

mod sources;
mod tokenize;

pub use sources::{
    ConfigSources, MAX_WORKDIR_ASCENT, WorkdirMatch, config_home, enumerate_config_dir,
    find_workdir_file,
};

/// Registry of config options keyed by the name written at the start of a
/// line.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use hakcli::coerce::Coercion;
/// use hakcli::config::ConfigTable;
/// use hakcli::handler::Handler;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let retries = Rc::new(Cell::new(0_u32));
/// let sink = Rc::clone(&retries);
/// let mut table = ConfigTable::new();
/// table.option(
///     "retries",
///     Handler::unary("retries", "count", Coercion::<u32>::parse(), move |n| sink.set(n)),
/// )?;
/// table.load_line("retries 3 # three is plenty")?;
/// assert_eq!(retries.get(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigTable {
    options: HashMap<String, Handler>,
}

impl ConfigTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateOption`] if `name` is taken and
    /// [`DefinitionError::VariadicNotLast`] if a variadic parameter is
    /// followed by another parameter.
    pub fn option(&mut self, name: &str, handler: Handler) -> Result<(), DefinitionError> {
        handler.require_variadic_tail()?;
        if self.options.contains_key(name) {
            return Err(DefinitionError::DuplicateOption(name.to_owned()));
        }
        self.options.insert(name.to_owned(), handler);
        Ok(())
    }

    /// Whether an option is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Applies a single config line. Blank and comment-only lines do nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`LineError`] for unbalanced quoting, unknown options,
    /// missing, surplus or invalid arguments, and handler failures.
    pub fn load_line(&mut self, line: &str) -> Result<(), LineError> {
        let tokens = tokenize::split(line)?;
        let Some((command, mut rest)) = tokens.split_first() else {
            return Ok(());
        };
        let handler = self
            .options
            .get_mut(command)
            .ok_or_else(|| LineError::UnknownCommand(command.clone()))?;

        let mut args = Args::default();
        for param in handler.parameters() {
            let invalid = |source| LineError::InvalidArgument {
                command: command.clone(),
                param: param.name().to_owned(),
                source,
            };
            match param.kind() {
                ParamKind::Fixed => match rest.split_first() {
                    Some((token, tail)) => {
                        args.push(param.coerce(token).map_err(invalid)?);
                        rest = tail;
                    }
                    None => {
                        let value =
                            param
                                .default_value()
                                .ok_or_else(|| LineError::MissingArgument {
                                    command: command.clone(),
                                    param: param.name().to_owned(),
                                })?;
                        args.push(value);
                    }
                },
                ParamKind::Variadic => {
                    for token in rest {
                        args.push(param.coerce(token).map_err(invalid)?);
                    }
                    rest = &[];
                }
            }
        }

        if !rest.is_empty() {
            let expected = handler.arity();
            return Err(LineError::TooManyArguments {
                command: command.clone(),
                expected,
                got: expected + rest.len(),
            });
        }

        handler
            .invoke(&mut args)
            .map(|_invocation| ())
            .map_err(|source| LineError::Failed {
                command: command.clone(),
                source,
            })
    }

    /// Applies every line of `contents`, reporting failures against `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Line`] for the first line that fails.
    pub fn load_str(&mut self, path: &Utf8Path, contents: &str) -> Result<(), LoadError> {
        for (index, line) in contents.lines().enumerate() {
            self.load_line(line).map_err(|kind| LoadError::Line {
                path: path.to_path_buf(),
                line: index + 1,
                kind,
            })?;
        }
        Ok(())
    }

    /// Reads and applies the file at `path`. A missing file is skipped and
    /// reported as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file exists but cannot be read, or
    /// [`LoadError::Line`] for the first line that fails.
    pub fn load_file(&mut self, path: &Utf8Path) -> Result<bool, LoadError> {
        tracing::info!(%path, "processing config");
        if !path.exists() {
            tracing::debug!(%path, "config file absent, skipping");
            return Ok(false);
        }
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(path, &contents)?;
        Ok(true)
    }

    /// Applies every file `sources` resolves to, in order.
    ///
    /// # Errors
    ///
    /// Returns the first discovery or load failure.
    pub fn load(&mut self, sources: &ConfigSources) -> Result<(), LoadError> {
        for path in sources.resolve()? {
            self.load_file(&path)?;
        }
        Ok(())
    }

    /// [`ConfigTable::load`], reporting the failure and exiting with status 1.
    ///
    /// The failure is logged as an error event. Without a `tracing`
    /// subscriber it is written to stderr instead.
    pub fn load_or_exit(&mut self, sources: &ConfigSources) {
        if let Err(err) = self.load(sources) {
            // Exiting regardless; a closed stderr leaves nowhere to report.
            let _unused = report_fatal(&err, &mut io::stderr().lock());
            std::process::exit(1);
        }
    }
}

/// Logs `err` at error level, or writes it to `fallback` when no subscriber
/// would record the event.
pub(crate) fn report_fatal(err: &LoadError, fallback: &mut dyn Write) -> io::Result<()> {
    let subscribed =
        tracing::dispatcher::get_default(|dispatch| !dispatch.is::<NoSubscriber>());
    if subscribed {
        tracing::error!("{err}");
        Ok(())
    } else {
        writeln!(fallback, "{err}")
    }
}

#[cfg(test)]
mod tests;
