//! Map types.

use std::cell::RefCell;
use std::collections::HashMap as StdHashMap;

use indexmap::IndexMap;

use crate::access::{Field, FieldDescriptor, Introspect};
use crate::capability::Map;
use crate::sorted::search;
use crate::value::{hash_entries, same_type, settled};
use crate::{Obj, Object, RuntimeError, Value};

fn map_equals(entries: &[(Value, Value)], other: &dyn Object) -> bool {
    other.as_map().is_some_and(|map| {
        map.len() == entries.len() && entries.iter().all(|(k, v)| map.get(k).as_ref() == Some(v))
    })
}

pub(crate) fn check_comparator(comparator: &Option<Obj>) -> Result<(), RuntimeError> {
    match comparator {
        Some(c) if c.get().as_comparator().is_none() => {
            Err(RuntimeError::MissingCapability(c.type_name(), "comparator"))
        }
        _ => Ok(()),
    }
}

/// Unordered hash map.
#[derive(Debug, Default)]
pub struct HashMap {
    entries: RefCell<StdHashMap<Value, Value>>,
}

impl HashMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: Value, value: Value) -> Option<Value> {
        self.entries.borrow_mut().insert(key, value)
    }
}

impl FromIterator<(Value, Value)> for HashMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Self {
            entries: RefCell::new(iter.into_iter().collect()),
        }
    }
}

impl Object for HashMap {
    fn equals(&self, other: &dyn Object) -> bool {
        map_equals(&self.entries(), other)
    }

    fn hash_code(&self) -> u64 {
        settled(&self.entries).map_or(0, |entries| hash_entries(entries.iter()))
    }

    fn as_map(&self) -> Option<&dyn Map> {
        Some(self)
    }
}

impl Map for HashMap {
    fn len(&self) -> usize {
        settled(&self.entries).map_or(0, |entries| entries.len())
    }

    fn get(&self, key: &Value) -> Option<Value> {
        settled(&self.entries).and_then(|entries| entries.get(key).cloned())
    }

    fn put(&self, key: Value, value: Value) -> Result<Option<Value>, RuntimeError> {
        Ok(self.insert(key, value))
    }

    fn remove(&self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        Ok(self.entries.borrow_mut().remove(key))
    }

    fn entries(&self) -> Vec<(Value, Value)> {
        settled(&self.entries)
            .map(|entries| entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }
}

/// Hash map iterating in insertion order.
#[derive(Debug, Default)]
pub struct LinkedHashMap {
    entries: RefCell<IndexMap<Value, Value>>,
}

impl LinkedHashMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: Value, value: Value) -> Option<Value> {
        self.entries.borrow_mut().insert(key, value)
    }
}

impl FromIterator<(Value, Value)> for LinkedHashMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Self {
            entries: RefCell::new(iter.into_iter().collect()),
        }
    }
}

impl Object for LinkedHashMap {
    fn equals(&self, other: &dyn Object) -> bool {
        map_equals(&self.entries(), other)
    }

    fn hash_code(&self) -> u64 {
        settled(&self.entries).map_or(0, |entries| hash_entries(entries.iter()))
    }

    fn as_map(&self) -> Option<&dyn Map> {
        Some(self)
    }
}

impl Map for LinkedHashMap {
    fn len(&self) -> usize {
        settled(&self.entries).map_or(0, |entries| entries.len())
    }

    fn get(&self, key: &Value) -> Option<Value> {
        settled(&self.entries).and_then(|entries| entries.get(key).cloned())
    }

    fn put(&self, key: Value, value: Value) -> Result<Option<Value>, RuntimeError> {
        Ok(self.insert(key, value))
    }

    fn remove(&self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        Ok(self.entries.borrow_mut().shift_remove(key))
    }

    fn entries(&self) -> Vec<(Value, Value)> {
        settled(&self.entries)
            .map(|entries| entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }
}

/// Map ordered by a comparator, or by natural ordering when none is set.
#[derive(Debug, Default)]
pub struct TreeMap {
    comparator: Option<Obj>,
    entries: RefCell<Vec<(Value, Value)>>,
}

impl TreeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when `comparator` is not a [`Comparator`].
    pub fn with_comparator(comparator: Option<Obj>) -> Result<Self, RuntimeError> {
        check_comparator(&comparator)?;
        Ok(Self {
            comparator,
            entries: RefCell::default(),
        })
    }

    pub fn comparator(&self) -> Option<&Obj> {
        self.comparator.as_ref()
    }

    pub fn insert(&self, key: Value, value: Value) -> Option<Value> {
        let mut entries = self.entries.borrow_mut();
        match search(&entries[..], self.comparator.as_ref(), &key, |(k, _)| k) {
            Ok(i) => Some(std::mem::replace(&mut entries[i].1, value)),
            Err(i) => {
                entries.insert(i, (key, value));
                None
            }
        }
    }

    pub fn first_key(&self) -> Option<Value> {
        self.entries.borrow().first().map(|(k, _)| k.clone())
    }
}

impl Object for TreeMap {
    fn equals(&self, other: &dyn Object) -> bool {
        map_equals(&self.entries(), other)
    }

    fn hash_code(&self) -> u64 {
        settled(&self.entries).map_or(0, |entries| {
            hash_entries(entries.iter().map(|(k, v)| (k, v)))
        })
    }

    fn as_map(&self) -> Option<&dyn Map> {
        Some(self)
    }
}

impl Map for TreeMap {
    fn len(&self) -> usize {
        settled(&self.entries).map_or(0, |entries| entries.len())
    }

    fn get(&self, key: &Value) -> Option<Value> {
        let entries = settled(&self.entries)?;
        search(&entries[..], self.comparator.as_ref(), key, |(k, _)| k)
            .ok()
            .map(|i| entries[i].1.clone())
    }

    fn put(&self, key: Value, value: Value) -> Result<Option<Value>, RuntimeError> {
        Ok(self.insert(key, value))
    }

    fn remove(&self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        let mut entries = self.entries.borrow_mut();
        Ok(search(&entries[..], self.comparator.as_ref(), key, |(k, _)| k)
            .ok()
            .map(|i| entries.remove(i).1))
    }

    fn entries(&self) -> Vec<(Value, Value)> {
        settled(&self.entries)
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    fn is_sorted(&self) -> bool {
        true
    }
}

/// Insertion-ordered map with a fixed capacity.
///
/// Only the current size is observable; the capacity chosen at
/// construction is internal.
#[derive(Debug)]
pub struct BoundedMap {
    capacity: usize,
    entries: RefCell<IndexMap<Value, Value>>,
}

impl BoundedMap {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RefCell::new(IndexMap::with_capacity(capacity.min(1024))),
        }
    }

    pub fn is_full(&self) -> bool {
        settled(&self.entries).map_or(0, |entries| entries.len()) >= self.capacity
    }
}

static BOUNDED_CAPACITY: Field<BoundedMap, usize> = Field::new("capacity", |m| &m.capacity);
static BOUNDED_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new("capacity", &BOUNDED_CAPACITY)];

impl Introspect for BoundedMap {
    fn fields() -> &'static [FieldDescriptor] {
        &BOUNDED_FIELDS
    }
}

impl Object for BoundedMap {
    fn equals(&self, other: &dyn Object) -> bool {
        same_type::<BoundedMap>(other).is_some_and(|o| o.capacity == self.capacity)
            && map_equals(&self.entries(), other)
    }

    fn hash_code(&self) -> u64 {
        settled(&self.entries).map_or(0, |entries| hash_entries(entries.iter()))
    }

    fn as_map(&self) -> Option<&dyn Map> {
        Some(self)
    }
}

impl Map for BoundedMap {
    fn len(&self) -> usize {
        settled(&self.entries).map_or(0, |entries| entries.len())
    }

    fn get(&self, key: &Value) -> Option<Value> {
        settled(&self.entries).and_then(|entries| entries.get(key).cloned())
    }

    fn put(&self, key: Value, value: Value) -> Result<Option<Value>, RuntimeError> {
        let mut entries = self.entries.borrow_mut();
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            return Err(RuntimeError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        Ok(entries.insert(key, value))
    }

    fn remove(&self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        Ok(self.entries.borrow_mut().shift_remove(key))
    }

    fn entries(&self) -> Vec<(Value, Value)> {
        settled(&self.entries)
            .map(|entries| entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }
}
