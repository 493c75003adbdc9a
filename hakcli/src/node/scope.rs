//! Identifier scopes shared between a node and the subcommands that inherit it.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::error::DefinitionError;

/// Short and long identifiers claimed by one node, chained to the scope it
/// inherits from.
///
/// Only registration consults the chain. Parsing looks identifiers up in the
/// node's own tables.
#[derive(Debug, Default)]
pub(crate) struct IdScope {
    short: RefCell<HashSet<char>>,
    long: RefCell<HashSet<String>>,
    parent: Option<Rc<IdScope>>,
}

impl IdScope {
    pub(crate) fn root() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn child(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            parent: Some(Rc::clone(parent)),
            ..Self::default()
        })
    }

    pub(crate) fn has_short(&self, id: char) -> bool {
        self.short.borrow().contains(&id)
            || self.parent.as_ref().is_some_and(|parent| parent.has_short(id))
    }

    pub(crate) fn has_long(&self, id: &str) -> bool {
        self.long.borrow().contains(id)
            || self.parent.as_ref().is_some_and(|parent| parent.has_long(id))
    }

    /// Claims both identifiers or neither.
    pub(crate) fn claim(&self, short: Option<char>, long: Option<&str>) -> Result<(), DefinitionError> {
        if let Some(id) = short.filter(|id| self.has_short(*id)) {
            return Err(DefinitionError::DuplicateShort(id));
        }
        if let Some(id) = long.filter(|id| self.has_long(id)) {
            return Err(DefinitionError::DuplicateLong(id.to_owned()));
        }
        self.reserve(short, long);
        Ok(())
    }

    /// Records identifiers without checking for collisions.
    pub(crate) fn reserve(&self, short: Option<char>, long: Option<&str>) {
        if let Some(id) = short {
            self.short.borrow_mut().insert(id);
        }
        if let Some(id) = long {
            self.long.borrow_mut().insert(id.to_owned());
        }
    }
}
