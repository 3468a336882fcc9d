//! Set types.

use std::cell::RefCell;
use std::collections::HashSet as StdHashSet;

use indexmap::IndexSet;

use crate::capability::Collection;
use crate::map::check_comparator;
use crate::sorted::search;
use crate::value::{hash_unordered, settled};
use crate::{Obj, Object, RuntimeError, Value};

/// Sets are equal to any other set holding the same members.
pub(crate) fn set_equals(items: &[Value], other: &dyn Object) -> bool {
    other.as_collection().is_some_and(|c| {
        c.is_set() && c.len() == items.len() && items.iter().all(|item| c.contains(item))
    })
}

/// Unordered hash set.
#[derive(Debug, Default)]
pub struct HashSet {
    items: RefCell<StdHashSet<Value>>,
}

impl HashSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, value: Value) -> bool {
        self.items.borrow_mut().insert(value)
    }
}

impl FromIterator<Value> for HashSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: RefCell::new(iter.into_iter().collect()),
        }
    }
}

impl Object for HashSet {
    fn equals(&self, other: &dyn Object) -> bool {
        set_equals(&self.to_vec(), other)
    }

    fn hash_code(&self) -> u64 {
        settled(&self.items).map_or(0, |items| hash_unordered(items.iter()))
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }
}

impl Collection for HashSet {
    fn len(&self) -> usize {
        settled(&self.items).map_or(0, |items| items.len())
    }

    fn to_vec(&self) -> Vec<Value> {
        settled(&self.items)
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn contains(&self, value: &Value) -> bool {
        settled(&self.items).is_some_and(|items| items.contains(value))
    }

    fn add(&self, value: Value) -> Result<bool, RuntimeError> {
        Ok(self.insert(value))
    }

    fn is_set(&self) -> bool {
        true
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        self.items.borrow_mut().clear();
        Ok(())
    }
}

/// Hash set iterating in insertion order.
#[derive(Debug, Default)]
pub struct LinkedHashSet {
    items: RefCell<IndexSet<Value>>,
}

impl LinkedHashSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, value: Value) -> bool {
        self.items.borrow_mut().insert(value)
    }
}

impl FromIterator<Value> for LinkedHashSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: RefCell::new(iter.into_iter().collect()),
        }
    }
}

impl Object for LinkedHashSet {
    fn equals(&self, other: &dyn Object) -> bool {
        set_equals(&self.to_vec(), other)
    }

    fn hash_code(&self) -> u64 {
        settled(&self.items).map_or(0, |items| hash_unordered(items.iter()))
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }
}

impl Collection for LinkedHashSet {
    fn len(&self) -> usize {
        settled(&self.items).map_or(0, |items| items.len())
    }

    fn to_vec(&self) -> Vec<Value> {
        settled(&self.items)
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn contains(&self, value: &Value) -> bool {
        settled(&self.items).is_some_and(|items| items.contains(value))
    }

    fn add(&self, value: Value) -> Result<bool, RuntimeError> {
        Ok(self.insert(value))
    }

    fn is_set(&self) -> bool {
        true
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        self.items.borrow_mut().clear();
        Ok(())
    }
}

/// Set ordered by a comparator, or by natural ordering when none is set.
///
/// Membership is decided by the comparator, not by equality.
#[derive(Debug, Default)]
pub struct TreeSet {
    comparator: Option<Obj>,
    items: RefCell<Vec<Value>>,
}

impl TreeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comparator(comparator: Option<Obj>) -> Result<Self, RuntimeError> {
        check_comparator(&comparator)?;
        Ok(Self {
            comparator,
            items: RefCell::default(),
        })
    }

    pub fn comparator(&self) -> Option<&Obj> {
        self.comparator.as_ref()
    }

    pub fn insert(&self, value: Value) -> bool {
        let mut items = self.items.borrow_mut();
        match search(&items[..], self.comparator.as_ref(), &value, |v| v) {
            Ok(_) => false,
            Err(i) => {
                items.insert(i, value);
                true
            }
        }
    }

    pub fn first(&self) -> Option<Value> {
        self.items.borrow().first().cloned()
    }
}

impl Object for TreeSet {
    fn equals(&self, other: &dyn Object) -> bool {
        set_equals(&self.to_vec(), other)
    }

    fn hash_code(&self) -> u64 {
        settled(&self.items).map_or(0, |items| hash_unordered(items.iter()))
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }
}

impl Collection for TreeSet {
    fn len(&self) -> usize {
        settled(&self.items).map_or(0, |items| items.len())
    }

    fn to_vec(&self) -> Vec<Value> {
        settled(&self.items)
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    fn contains(&self, value: &Value) -> bool {
        settled(&self.items).is_some_and(|items| {
            search(&items[..], self.comparator.as_ref(), value, |v| v).is_ok()
        })
    }

    fn add(&self, value: Value) -> Result<bool, RuntimeError> {
        Ok(self.insert(value))
    }

    fn is_set(&self) -> bool {
        true
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        self.items.borrow_mut().clear();
        Ok(())
    }

    fn is_sorted(&self) -> bool {
        true
    }
}
