//! Buffer of coerced arguments handed to a handler.

use std::any::type_name;

use crate::coerce::Value;
use crate::error::HandlerError;

/// Arguments bound to a handler, in parameter order.
///
/// Values are taken out by index with the type their parameter's coercion
/// produces; raw parameters produce `String`.
#[derive(Default)]
pub struct Args {
    values: Vec<Option<Value>>,
}

impl Args {
    pub(crate) fn push(&mut self, value: Value) {
        self.values.push(Some(value));
    }

    /// Number of bound values, including ones already taken.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrows the value at `index` if it is present and a `T`.
    #[must_use]
    pub fn get<T: 'static>(&self, index: usize) -> Option<&T> {
        self.values
            .get(index)
            .and_then(Option::as_ref)
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Moves the value at `index` out of the buffer.
    ///
    /// # Errors
    ///
    /// Fails when nothing is bound at `index`, the value was already taken, or
    /// it is not a `T`. A mismatched value stays in place.
    pub fn take<T: 'static>(&mut self, index: usize) -> Result<T, HandlerError> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or_else(|| HandlerError::new(format!("no argument bound at position {index}")))?;
        let value = slot
            .take()
            .ok_or_else(|| HandlerError::new(format!("argument {index} was already taken")))?;
        match value.downcast::<T>() {
            Ok(typed) => Ok(*typed),
            Err(original) => {
                *slot = Some(original);
                Err(HandlerError::new(format!(
                    "argument {index} is not a {}",
                    type_name::<T>()
                )))
            }
        }
    }

    /// Moves every value from `from` onwards out of the buffer, as bound by a
    /// variadic parameter.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`Args::take`] for any position.
    pub fn take_rest<T: 'static>(&mut self, from: usize) -> Result<Vec<T>, HandlerError> {
        (from..self.values.len())
            .map(|index| self.take::<T>(index))
            .collect()
    }
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("len", &self.values.len())
            .finish_non_exhaustive()
    }
}
