//! Handler descriptors: the callable plus everything the parser and the config
//! loader need to bind tokens to it.
//!
//! A [`Handler`] records its name, an ordered [`Param`] signature, optional
//! documentation and completion hooks, and the action itself. Registration
//! tables store the descriptor as-is; nothing is attached to the closure.

use std::fmt;
use std::rc::Rc;

use crate::coerce::{Coercion, ErasedCoercion, Value};
use crate::error::{CoerceError, DefinitionError, HandlerError};

mod args;

pub use args::Args;

/// How many tokens a parameter consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Exactly one token, or the default when the config line runs short.
    Fixed,
    /// Every remaining token on a config line, each coerced independently.
    Variadic,
}

/// One entry of a handler's parameter signature.
#[derive(Clone)]
pub struct Param {
    name: String,
    coercion: Option<ErasedCoercion>,
    default: Option<Rc<dyn Fn() -> Value>>,
    kind: ParamKind,
}

impl Param {
    /// Parameter receiving the raw token as a `String`.
    #[must_use]
    pub fn raw(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coercion: None,
            default: None,
            kind: ParamKind::Fixed,
        }
    }

    /// Parameter whose token is converted by `coercion`.
    #[must_use]
    pub fn typed<T: 'static>(name: impl Into<String>, coercion: Coercion<T>) -> Self {
        Self {
            coercion: Some(coercion.erase()),
            ..Self::raw(name)
        }
    }

    /// Value bound when a config line omits this parameter.
    ///
    /// The value must have the type the parameter produces (`String` for raw
    /// parameters). Defaults are not consulted on the command line.
    #[must_use]
    pub fn with_default<T: Clone + 'static>(mut self, value: T) -> Self {
        self.default = Some(Rc::new(move || Box::new(value.clone()) as Value));
        self
    }

    /// Turns this into a variadic tail parameter.
    #[must_use]
    pub const fn variadic(mut self) -> Self {
        self.kind = ParamKind::Variadic;
        self
    }

    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixed or variadic.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Display name of the coercion, `None` for raw parameters.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.coercion.as_ref().map(ErasedCoercion::type_name)
    }

    /// Whether a default was declared.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Completion candidates offered by the coercion.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        self.coercion
            .as_ref()
            .map_or(&[][..], ErasedCoercion::candidates)
    }

    pub(crate) fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        match &self.coercion {
            Some(coercion) => coercion.coerce(raw),
            None => Ok(Box::new(raw.to_owned())),
        }
    }

    pub(crate) fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(|make| make())
    }

    /// `name:type` as rendered in help output.
    pub(crate) fn signature(&self) -> String {
        match self.type_name() {
            Some(type_name) => format!("{}:{type_name}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("type", &self.type_name())
            .field("default", &self.default.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}

type Action = Box<dyn FnMut(&mut Args) -> Result<(), HandlerError>>;
type Completer = Box<dyn Fn(&Args) -> Vec<String>>;

enum Behaviour {
    Call(Action),
    Help,
}

/// What happened when a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Invocation {
    Done,
    ShowHelp,
}

/// A registered action together with its parameter signature.
///
/// # Examples
///
/// ```
/// use hakcli::coerce::Coercion;
/// use hakcli::handler::{Handler, Param};
///
/// let copy = Handler::new("copy", |args| {
///     let from: String = args.take(0)?;
///     let times: u32 = args.take(1)?;
///     let _ = (from, times);
///     Ok(())
/// })
/// .param(Param::raw("from"))
/// .param(Param::typed("times", Coercion::<u32>::parse()))
/// .doc("Copy a file several times");
/// assert_eq!(copy.parameters().len(), 2);
/// ```
pub struct Handler {
    name: String,
    params: Vec<Param>,
    doc: Option<String>,
    completer: Option<Completer>,
    behaviour: Behaviour,
}

impl Handler {
    /// Handler running `action` with the bound arguments.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut Args) -> Result<(), HandlerError> + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            doc: None,
            completer: None,
            behaviour: Behaviour::Call(Box::new(action)),
        }
    }

    /// Parameterless handler that cannot fail.
    #[must_use]
    pub fn unit<F>(name: impl Into<String>, mut action: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self::new(name, move |_| {
            action();
            Ok(())
        })
    }

    /// Single-parameter handler receiving the coerced value directly.
    #[must_use]
    pub fn unary<T, F>(
        name: impl Into<String>,
        param: impl Into<String>,
        coercion: Coercion<T>,
        mut action: F,
    ) -> Self
    where
        T: 'static,
        F: FnMut(T) + 'static,
    {
        Self::new(name, move |args| {
            action(args.take::<T>(0)?);
            Ok(())
        })
        .param(Param::typed(param, coercion))
    }

    /// The built-in help command of a root node.
    pub(crate) fn help() -> Self {
        Self {
            name: String::from("help"),
            params: Vec::new(),
            doc: Some(String::from("Print this help text and exit normally")),
            completer: None,
            behaviour: Behaviour::Help,
        }
    }

    /// Appends a parameter to the signature.
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Attaches documentation rendered in help output.
    #[must_use]
    pub fn doc(mut self, text: impl Into<String>) -> Self {
        self.doc = Some(text.into());
        self
    }

    /// Attaches a completion hook consulted by `--options` while this handler
    /// awaits tokens. It receives the arguments bound so far.
    #[must_use]
    pub fn completions<F>(mut self, completer: F) -> Self
    where
        F: Fn(&Args) -> Vec<String> + 'static,
    {
        self.completer = Some(Box::new(completer));
        self
    }

    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered parameter signature.
    #[must_use]
    pub fn parameters(&self) -> &[Param] {
        &self.params
    }

    /// Documentation text, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub(crate) fn arity(&self) -> usize {
        self.params.len()
    }

    pub(crate) fn completion_candidates(&self, bound: &Args) -> Option<Vec<String>> {
        self.completer.as_ref().map(|complete| complete(bound))
    }

    pub(crate) fn invoke(&mut self, args: &mut Args) -> Result<Invocation, HandlerError> {
        match &mut self.behaviour {
            Behaviour::Call(action) => action(args).map(|()| Invocation::Done),
            Behaviour::Help => Ok(Invocation::ShowHelp),
        }
    }

    /// Command-line handlers bind exactly one token per parameter.
    pub(crate) fn reject_variadic(&self) -> Result<(), DefinitionError> {
        match self.params.iter().find(|p| p.kind() == ParamKind::Variadic) {
            Some(param) => Err(DefinitionError::VariadicCommandParameter {
                handler: self.name.clone(),
                param: param.name().to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Config handlers may end with a single variadic parameter.
    pub(crate) fn require_variadic_tail(&self) -> Result<(), DefinitionError> {
        let head = self.params.split_last().map_or(&[][..], |(_, head)| head);
        match head.iter().find(|p| p.kind() == ParamKind::Variadic) {
            Some(param) => Err(DefinitionError::VariadicNotLast {
                handler: self.name.clone(),
                param: param.name().to_owned(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("doc", &self.doc)
            .field("builtin_help", &matches!(self.behaviour, Behaviour::Help))
            .finish_non_exhaustive()
    }
}
