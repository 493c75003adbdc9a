//! Command tree nodes.
//!
//! A [`CliNode`] owns the commands, positional arguments, subcommands, checks
//! and help printers registered on it. Registration validates identifiers
//! against the node's identifier scope, which a subcommand may chain to its
//! parent's.

use std::any::Any;
use std::cell::Cell;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use crate::error::{DefinitionError, HandlerError};
use crate::handler::Handler;

mod help;
mod parse;
mod scope;

pub use parse::ParseOutcome;

use scope::IdScope;

/// Produces the current value of a builder-backed property.
pub(crate) type Accessor = Rc<dyn Fn() -> Box<dyn Any>>;
type Check = Box<dyn FnMut() -> Result<(), HandlerError>>;
type HelpPrinter = Box<dyn Fn(&mut dyn Write) -> io::Result<()>>;

/// Cloneable view of whether a node's parser has run.
///
/// Hosts keep a handle while the tree is mutably borrowed by
/// [`CliNode::process`] and consult it afterwards to learn which subcommand
/// was selected.
#[derive(Debug, Clone, Default)]
pub struct Activation(Rc<Cell<bool>>);

impl Activation {
    /// Whether the node started processing an argument vector.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn set(&self) {
        self.0.set(true);
    }
}

struct Command {
    short: Option<char>,
    long: Option<String>,
    handler: Handler,
}

impl Command {
    fn ident(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => self.handler.name().to_owned(),
        }
    }
}

struct Positional {
    ident: String,
    repeated: bool,
    handler: Handler,
}

/// One level of a command tree.
///
/// # Examples
///
/// ```
/// use hakcli::CliNode;
/// use hakcli::handler::Handler;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut root = CliNode::root("tool", Some("Does things"));
/// let verbose = root.flag(Some("v"), "verbose", Some("Talk more"))?;
/// root.command(None, Some("dry-run"), Handler::unit("dry-run", || ()))?;
///
/// let mut sink: Vec<u8> = Vec::new();
/// root.try_process(["tool", "-v"], &mut sink)?;
/// assert!(verbose.value());
/// assert!(root.is_instantiated());
/// # Ok(())
/// # }
/// ```
pub struct CliNode {
    name: String,
    description: Option<String>,
    scope: Rc<IdScope>,
    commands: Vec<Command>,
    by_short: HashMap<char, usize>,
    by_long: HashMap<String, usize>,
    arguments: Vec<Positional>,
    subcommands: HashMap<String, CliNode>,
    subcommand_order: Vec<String>,
    checks: Vec<Check>,
    help_printers: Vec<HelpPrinter>,
    activation: Activation,
    properties: BTreeMap<String, Accessor>,
}

impl CliNode {
    /// Creates a node without any commands.
    #[must_use]
    pub fn new(name: impl Into<String>, description: Option<&str>) -> Self {
        Self::with_scope(name.into(), description, IdScope::root())
    }

    /// Creates a top-level node carrying the built-in `-h|--help` command.
    #[must_use]
    pub fn root(name: impl Into<String>, description: Option<&str>) -> Self {
        let mut node = Self::new(name, description);
        node.scope.reserve(Some('h'), Some("help"));
        node.insert_command(Some('h'), Some(String::from("help")), Handler::help());
        node
    }

    fn with_scope(name: String, description: Option<&str>, scope: Rc<IdScope>) -> Self {
        Self {
            name,
            description: description.map(str::to_owned),
            scope,
            commands: Vec::new(),
            by_short: HashMap::new(),
            by_long: HashMap::new(),
            arguments: Vec::new(),
            subcommands: HashMap::new(),
            subcommand_order: Vec::new(),
            checks: Vec::new(),
            help_printers: Vec::new(),
            activation: Activation::default(),
            properties: BTreeMap::new(),
        }
    }

    /// Node name as shown on the usage line.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a switch-triggered command.
    ///
    /// Without either identifier the handler's name becomes the long id. The
    /// handler fires as soon as its switch is seen if it has no parameters,
    /// otherwise once the following tokens have filled its signature.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] if `short` is not one character, an
    /// identifier is already used in scope, no identifier can be derived, or
    /// the handler declares a variadic parameter.
    pub fn command(
        &mut self,
        short: Option<&str>,
        long: Option<&str>,
        handler: Handler,
    ) -> Result<(), DefinitionError> {
        let short = short.map(single_char).transpose()?;
        let long = match (short, long) {
            (None, None) if handler.name().is_empty() => {
                return Err(DefinitionError::MissingIdentifier);
            }
            (None, None) => Some(handler.name().to_owned()),
            (_, long) => long.map(str::to_owned),
        };
        handler.reject_variadic()?;
        self.scope.claim(short, long.as_deref())?;
        self.insert_command(short, long, handler);
        Ok(())
    }

    fn insert_command(&mut self, short: Option<char>, long: Option<String>, handler: Handler) {
        let index = self.commands.len();
        if let Some(id) = short {
            self.by_short.insert(id, index);
        }
        if let Some(id) = &long {
            self.by_long.insert(id.clone(), index);
        }
        self.commands.push(Command {
            short,
            long,
            handler,
        });
    }

    /// Registers a positional argument handler.
    ///
    /// Positional handlers are filled in registration order. A `repeated`
    /// handler must come last and is reused for every surplus token. The
    /// identifier shown in help and errors is `name`, or the handler's name.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] if a repeated argument was already
    /// registered, the handler takes no parameters, or it declares a variadic
    /// parameter.
    pub fn argument(
        &mut self,
        handler: Handler,
        repeated: bool,
        name: Option<&str>,
    ) -> Result<(), DefinitionError> {
        let ident = name.map_or_else(|| handler.name().to_owned(), str::to_owned);
        if self.arguments.last().is_some_and(|arg| arg.repeated) {
            return Err(DefinitionError::ArgumentAfterRepeated(ident));
        }
        if handler.arity() == 0 {
            return Err(DefinitionError::ArgumentWithoutParameters(ident));
        }
        handler.reject_variadic()?;
        self.arguments.push(Positional {
            ident,
            repeated,
            handler,
        });
        Ok(())
    }

    /// Creates a child node selected by the literal token `name`.
    ///
    /// With `inherit_scope` the child may not reuse identifiers registered on
    /// this node or its own inherited scopes. Parsing never falls back to the
    /// parent's commands either way.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateSubcommand`] if `name` is taken.
    pub fn subcommand(
        &mut self,
        name: &str,
        description: Option<&str>,
        inherit_scope: bool,
    ) -> Result<&mut Self, DefinitionError> {
        let scope = if inherit_scope {
            IdScope::child(&self.scope)
        } else {
            IdScope::root()
        };
        match self.subcommands.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(DefinitionError::DuplicateSubcommand(name.to_owned())),
            Entry::Vacant(slot) => {
                self.subcommand_order.push(name.to_owned());
                Ok(slot.insert(Self::with_scope(name.to_owned(), description, scope)))
            }
        }
    }

    /// Registers a validation run after a parse that consumed the whole
    /// argument vector.
    pub fn check<F>(&mut self, check: F)
    where
        F: FnMut() -> Result<(), HandlerError> + 'static,
    {
        self.checks.push(Box::new(check));
    }

    /// Registers a printer whose output is appended to this node's help.
    pub fn help_printer<F>(&mut self, printer: F)
    where
        F: Fn(&mut dyn Write) -> io::Result<()> + 'static,
    {
        self.help_printers.push(Box::new(printer));
    }

    /// Whether this node's parser has run.
    #[must_use]
    pub fn is_instantiated(&self) -> bool {
        self.activation.is_set()
    }

    /// Handle reporting [`CliNode::is_instantiated`] without borrowing the
    /// tree.
    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation.clone()
    }

    /// Direct child registered under `name`.
    #[must_use]
    pub fn find_subcommand(&self, name: &str) -> Option<&Self> {
        self.subcommands.get(name)
    }

    /// Mutable access to the direct child registered under `name`.
    pub fn find_subcommand_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.subcommands.get_mut(name)
    }

    /// Current value of the builder property `name`, if it exists and holds
    /// a `T`.
    #[must_use]
    pub fn property<T: 'static>(&self, name: &str) -> Option<T> {
        let accessor = self.properties.get(name)?;
        accessor().downcast::<T>().ok().map(|value| *value)
    }

    /// Names of all builder properties in lexical order.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }

    pub(crate) fn ensure_property_free(&self, name: &str) -> Result<(), DefinitionError> {
        if self.properties.contains_key(name) {
            Err(DefinitionError::DuplicateProperty(name.to_owned()))
        } else {
            Ok(())
        }
    }

    pub(crate) fn insert_property(&mut self, name: &str, accessor: Accessor) {
        self.properties.insert(name.to_owned(), accessor);
    }

    fn ordered_subcommands(&self) -> impl Iterator<Item = &Self> {
        self.subcommand_order
            .iter()
            .filter_map(|name| self.subcommands.get(name))
    }
}

impl fmt::Debug for CliNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliNode")
            .field("name", &self.name)
            .field(
                "commands",
                &self.commands.iter().map(Command::ident).collect::<Vec<_>>(),
            )
            .field(
                "arguments",
                &self.arguments.iter().map(|a| &a.ident).collect::<Vec<_>>(),
            )
            .field("subcommands", &self.subcommand_order)
            .field("instantiated", &self.activation.is_set())
            .finish_non_exhaustive()
    }
}

fn single_char(short: &str) -> Result<char, DefinitionError> {
    let mut chars = short.chars();
    match (chars.next(), chars.next()) {
        (Some(id), None) => Ok(id),
        _ => Err(DefinitionError::MalformedShort(short.to_owned())),
    }
}

#[cfg(test)]
mod tests;
