//! Builders that register a command or positional argument together with the
//! state it writes to.
//!
//! Each builder returns a handle sharing that state and publishes a property
//! on the node, readable through [`CliNode::property`]. Command builders use
//! the long identifier as the property name, positional builders the
//! argument name.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::coerce::Coercion;
use crate::error::{DefinitionError, HandlerError};
use crate::handler::{Handler, Param};
use crate::node::{Accessor, CliNode};

const VALUE_PARAM: &str = "value";

/// Boolean switch set when its command appears.
#[derive(Debug, Clone, Default)]
pub struct Flag {
    value: Rc<Cell<bool>>,
}

impl Flag {
    /// Whether the switch was given.
    #[must_use]
    pub fn value(&self) -> bool {
        self.value.get()
    }
}

/// Switch counting its occurrences, as in `-vvv`.
#[derive(Debug, Clone, Default)]
pub struct CountedFlag {
    count: Rc<Cell<u32>>,
}

impl CountedFlag {
    /// Number of times the switch was given.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count.get()
    }
}

/// Option holding the last value it was given.
#[derive(Debug)]
pub struct Variable<T> {
    value: Rc<RefCell<T>>,
}

impl<T: Clone> Variable<T> {
    /// Current value, the default until the option appears.
    #[must_use]
    pub fn value(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T> Clone for Variable<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
        }
    }
}

/// Option collecting every value it was given, in order.
#[derive(Debug)]
pub struct VariableList<T> {
    values: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone> VariableList<T> {
    /// Collected values.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.values.borrow().clone()
    }
}

impl<T> Clone for VariableList<T> {
    fn clone(&self) -> Self {
        Self {
            values: Rc::clone(&self.values),
        }
    }
}

/// Single positional argument.
#[derive(Debug)]
pub struct ArgVariable<T> {
    value: Rc<RefCell<T>>,
    seen: Rc<Cell<bool>>,
}

impl<T: Clone> ArgVariable<T> {
    /// Current value, the default until the argument is given.
    #[must_use]
    pub fn value(&self) -> T {
        self.value.borrow().clone()
    }

    /// Whether the argument was given.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.seen.get()
    }
}

impl<T> Clone for ArgVariable<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
            seen: Rc::clone(&self.seen),
        }
    }
}

/// Repeated positional argument.
#[derive(Debug)]
pub struct ArgListVariable<T> {
    values: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone> ArgListVariable<T> {
    /// Collected values in command-line order.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.values.borrow().clone()
    }

    /// Whether at least one value was given.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.values.borrow().is_empty()
    }
}

impl<T> Clone for ArgListVariable<T> {
    fn clone(&self) -> Self {
        Self {
            values: Rc::clone(&self.values),
        }
    }
}

impl CliNode {
    /// Registers `-short|--long` setting a [`Flag`].
    ///
    /// # Errors
    ///
    /// Fails like [`CliNode::command`], or if the property `long` exists.
    pub fn flag(
        &mut self,
        short: Option<&str>,
        long: &str,
        description: Option<&str>,
    ) -> Result<Flag, DefinitionError> {
        self.ensure_property_free(long)?;
        let flag = Flag::default();
        let cell = Rc::clone(&flag.value);
        let handler = Handler::unit(long, move || cell.set(true));
        self.command(short, Some(long), documented(handler, description))?;
        let cell = Rc::clone(&flag.value);
        self.insert_property(long, accessor(move || cell.get()));
        Ok(flag)
    }

    /// Registers `-short|--long` incrementing a [`CountedFlag`].
    ///
    /// # Errors
    ///
    /// Fails like [`CliNode::command`], or if the property `long` exists.
    pub fn counted_flag(
        &mut self,
        short: Option<&str>,
        long: &str,
        description: Option<&str>,
    ) -> Result<CountedFlag, DefinitionError> {
        self.ensure_property_free(long)?;
        let flag = CountedFlag::default();
        let cell = Rc::clone(&flag.count);
        let handler = Handler::unit(long, move || cell.set(cell.get().saturating_add(1)));
        self.command(short, Some(long), documented(handler, description))?;
        let cell = Rc::clone(&flag.count);
        self.insert_property(long, accessor(move || cell.get()));
        Ok(flag)
    }

    /// Registers `-short|--long value` storing into a [`Variable`] that starts
    /// out as `default`.
    ///
    /// # Errors
    ///
    /// Fails like [`CliNode::command`], or if the property `long` exists.
    pub fn variable<T: Clone + 'static>(
        &mut self,
        coercion: Coercion<T>,
        default: T,
        short: Option<&str>,
        long: &str,
        description: Option<&str>,
    ) -> Result<Variable<T>, DefinitionError> {
        self.ensure_property_free(long)?;
        let variable = Variable {
            value: Rc::new(RefCell::new(default)),
        };
        let cell = Rc::clone(&variable.value);
        let handler = Handler::unary(long, VALUE_PARAM, coercion, move |value| {
            *cell.borrow_mut() = value;
        });
        self.command(short, Some(long), documented(handler, description))?;
        let cell = Rc::clone(&variable.value);
        self.insert_property(long, accessor(move || cell.borrow().clone()));
        Ok(variable)
    }

    /// Registers `-short|--long value` appending to a [`VariableList`].
    ///
    /// # Errors
    ///
    /// Fails like [`CliNode::command`], or if the property `long` exists.
    pub fn variable_list<T: Clone + 'static>(
        &mut self,
        coercion: Coercion<T>,
        short: Option<&str>,
        long: &str,
        description: Option<&str>,
    ) -> Result<VariableList<T>, DefinitionError> {
        self.ensure_property_free(long)?;
        let list = VariableList {
            values: Rc::new(RefCell::new(Vec::new())),
        };
        let cell = Rc::clone(&list.values);
        let handler = Handler::unary(long, VALUE_PARAM, coercion, move |value| {
            cell.borrow_mut().push(value);
        });
        self.command(short, Some(long), documented(handler, description))?;
        let cell = Rc::clone(&list.values);
        self.insert_property(long, accessor(move || cell.borrow().clone()));
        Ok(list)
    }

    /// Registers the positional argument `name` storing into an
    /// [`ArgVariable`]. A `required` argument adds the check `<name> not set`.
    ///
    /// # Errors
    ///
    /// Fails like [`CliNode::argument`], or if the property `name` exists.
    pub fn arg_variable<T: Clone + 'static>(
        &mut self,
        coercion: Coercion<T>,
        default: T,
        name: &str,
        description: Option<&str>,
        required: bool,
    ) -> Result<ArgVariable<T>, DefinitionError> {
        self.ensure_property_free(name)?;
        let variable = ArgVariable {
            value: Rc::new(RefCell::new(default)),
            seen: Rc::new(Cell::new(false)),
        };
        let (cell, seen) = (Rc::clone(&variable.value), Rc::clone(&variable.seen));
        let handler = Handler::unary(name, VALUE_PARAM, coercion, move |value| {
            *cell.borrow_mut() = value;
            seen.set(true);
        });
        self.argument(documented(handler, description), false, Some(name))?;
        if required {
            let seen = Rc::clone(&variable.seen);
            let message = format!("{name} not set");
            self.check(move || {
                if seen.get() {
                    Ok(())
                } else {
                    Err(HandlerError::new(message.clone()))
                }
            });
        }
        let cell = Rc::clone(&variable.value);
        self.insert_property(name, accessor(move || cell.borrow().clone()));
        Ok(variable)
    }

    /// Registers the repeated positional argument `name` collecting into an
    /// [`ArgListVariable`]. A `required` argument adds the check
    /// `<name> not set`, failing when no value was given.
    ///
    /// # Errors
    ///
    /// Fails like [`CliNode::argument`], or if the property `name` exists.
    pub fn arg_list_variable<T: Clone + 'static>(
        &mut self,
        coercion: Coercion<T>,
        name: &str,
        description: Option<&str>,
        required: bool,
    ) -> Result<ArgListVariable<T>, DefinitionError> {
        self.ensure_property_free(name)?;
        let list = ArgListVariable {
            values: Rc::new(RefCell::new(Vec::new())),
        };
        let cell = Rc::clone(&list.values);
        let handler = Handler::new(name, move |args| {
            cell.borrow_mut().push(args.take::<T>(0)?);
            Ok(())
        })
        .param(Param::typed(VALUE_PARAM, coercion));
        self.argument(documented(handler, description), true, Some(name))?;
        if required {
            let handle = list.clone();
            let message = format!("{name} not set");
            self.check(move || {
                if handle.is_set() {
                    Ok(())
                } else {
                    Err(HandlerError::new(message.clone()))
                }
            });
        }
        let cell = Rc::clone(&list.values);
        self.insert_property(name, accessor(move || cell.borrow().clone()));
        Ok(list)
    }
}

fn documented(handler: Handler, description: Option<&str>) -> Handler {
    match description {
        Some(text) => handler.doc(text),
        None => handler,
    }
}

fn accessor<T, F>(read: F) -> Accessor
where
    T: 'static,
    F: Fn() -> T + 'static,
{
    Rc::new(move || Box::new(read()) as Box<dyn Any>)
}

#[cfg(test)]
mod tests;
