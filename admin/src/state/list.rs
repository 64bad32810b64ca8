//! [`List`] and [`Selection`] state.

use std::slice;

use crate::domain::{record::Id, Message, Record};

/// Item of a [`List`] carrying a server-assigned [`Id`].
pub trait Identified {
    /// Returns the [`Id`] of this item.
    fn id(&self) -> &Id;
}

impl Identified for Record {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Identified for Message {
    fn id(&self) -> &Id {
        &self.id
    }
}

/// Last successfully fetched collection, in server order.
#[derive(Clone, Debug)]
pub struct List<T>(Vec<T>);

impl<T> Default for List<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: Identified> List<T> {
    /// Replaces every item of this [`List`] at once.
    pub fn replace(&mut self, items: Vec<T>) {
        self.0 = items;
    }

    /// Removes the item with the provided [`Id`], returning it if present.
    pub fn exclude(&mut self, id: &Id) -> Option<T> {
        let pos = self.0.iter().position(|i| i.id() == id)?;
        Some(self.0.remove(pos))
    }

    /// Returns the item with the provided [`Id`], if any.
    #[must_use]
    pub fn get(&self, id: &Id) -> Option<&T> {
        self.0.iter().find(|i| i.id() == id)
    }

    /// Indicates whether this [`List`] contains an item with the provided
    /// [`Id`].
    #[must_use]
    pub fn contains(&self, id: &Id) -> bool {
        self.get(id).is_some()
    }
}

impl<T> List<T> {
    /// Iterates over the items of this [`List`].
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Returns the number of items in this [`List`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether this [`List`] has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Optional pointer into a [`List`].
///
/// Holds an [`Id`] rather than an item, so it never outlives the data it
/// points to: resolving it against a [`List`] missing that [`Id`] yields
/// nothing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection(Option<Id>);

impl Selection {
    /// Points this [`Selection`] at the provided [`Id`].
    pub fn select(&mut self, id: Id) {
        self.0 = Some(id);
    }

    /// Returns the selected [`Id`], if any.
    #[must_use]
    pub fn id(&self) -> Option<&Id> {
        self.0.as_ref()
    }

    /// Resolves this [`Selection`] against the provided [`List`].
    #[must_use]
    pub fn resolve<'l, T: Identified>(&self, list: &'l List<T>) -> Option<&'l T> {
        list.get(self.0.as_ref()?)
    }

    /// Clears this [`Selection`] if the provided [`List`] no longer contains
    /// the selected item.
    pub fn retain<T: Identified>(&mut self, list: &List<T>) {
        if self.0.as_ref().is_some_and(|id| !list.contains(id)) {
            self.0 = None;
        }
    }
}
