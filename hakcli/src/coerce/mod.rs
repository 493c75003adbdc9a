//! Single-token conversions shared by the command tree and the config loader.
//!
//! A [`Coercion`] turns one raw token into a typed value or a
//! [`CoerceError`]. Both consumers treat a parameter without a coercion as a
//! plain `String` parameter that receives the token verbatim.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::CoerceError;

mod builtin;

pub use builtin::{boolean, dir_path, file_path, new_dir_path, new_file_path, regex};

/// Type-erased value flowing from a coercion into a handler's argument buffer.
pub(crate) type Value = Box<dyn Any>;

type Convert<T> = Rc<dyn Fn(&str) -> Result<T, CoerceError>>;

/// Named conversion from a raw token into `T`.
///
/// # Examples
///
/// ```
/// use hakcli::coerce::Coercion;
///
/// let port = Coercion::<u16>::parse();
/// assert_eq!(port.coerce("8080").ok(), Some(8080));
/// assert!(port.coerce("http").is_err());
/// assert_eq!(port.type_name(), "u16");
/// ```
pub struct Coercion<T> {
    type_name: Cow<'static, str>,
    convert: Convert<T>,
    candidates: Vec<String>,
}

impl<T: 'static> Coercion<T> {
    /// Wraps a custom conversion displayed as `type_name` in help output.
    #[must_use]
    pub fn new<F>(type_name: impl Into<Cow<'static, str>>, convert: F) -> Self
    where
        F: Fn(&str) -> Result<T, CoerceError> + 'static,
    {
        Self {
            type_name: type_name.into(),
            convert: Rc::new(convert),
            candidates: Vec::new(),
        }
    }

    /// Attaches the values offered when completion candidates are requested.
    #[must_use]
    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Name rendered after a parameter in help output.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Completion candidates, empty when none were declared.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Converts `raw`.
    ///
    /// # Errors
    ///
    /// Returns the conversion's [`CoerceError`] when `raw` is not a valid `T`.
    pub fn coerce(&self, raw: &str) -> Result<T, CoerceError> {
        (self.convert)(raw)
    }

    pub(crate) fn erase(self) -> ErasedCoercion {
        let convert = self.convert;
        ErasedCoercion {
            type_name: self.type_name,
            convert: Rc::new(move |raw: &str| convert(raw).map(|value| Box::new(value) as Value)),
            candidates: self.candidates,
        }
    }
}

impl<T> Coercion<T>
where
    T: FromStr + 'static,
    T::Err: fmt::Display,
{
    /// Coercion backed by `T`'s [`FromStr`] implementation.
    #[must_use]
    pub fn parse() -> Self {
        Self::new(short_type_name::<T>(), |raw: &str| {
            raw.parse::<T>()
                .map_err(|err| CoerceError::new(err.to_string()))
        })
    }
}

impl<T> Clone for Coercion<T> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name.clone(),
            convert: Rc::clone(&self.convert),
            candidates: self.candidates.clone(),
        }
    }
}

impl<T> fmt::Debug for Coercion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coercion")
            .field("type_name", &self.type_name)
            .field("candidates", &self.candidates)
            .finish_non_exhaustive()
    }
}

/// A [`Coercion`] whose output type has been erased for storage in a
/// parameter descriptor.
#[derive(Clone)]
pub(crate) struct ErasedCoercion {
    type_name: Cow<'static, str>,
    convert: Rc<dyn Fn(&str) -> Result<Value, CoerceError>>,
    candidates: Vec<String>,
}

impl ErasedCoercion {
    pub(crate) fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub(crate) fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        (self.convert)(raw)
    }
}

impl fmt::Debug for ErasedCoercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedCoercion")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Last path segment of `T`'s name, without generic arguments.
fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_owned()
}
