//! Immutable containers, built once through a builder or `copy_of`.

use indexmap::{IndexMap, IndexSet};

use crate::capability::{Collection, List, Map};
use crate::map::check_comparator;
use crate::set::set_equals;
use crate::sorted::{search, sort_dedup_last};
use crate::value::{hash_entries, hash_ordered, hash_unordered};
use crate::{Obj, Object, RuntimeError, Value};

const IMMUTABLE: RuntimeError = RuntimeError::UnsupportedOperation("modify an immutable container");

#[derive(Debug, Default)]
pub struct ImmutableList {
    items: Box<[Value]>,
}

impl ImmutableList {
    pub fn copy_of(items: impl IntoIterator<Item = Value>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

impl Object for ImmutableList {
    fn equals(&self, other: &dyn Object) -> bool {
        other
            .as_list()
            .is_some_and(|l| l.len() == self.items.len() && l.to_vec()[..] == self.items[..])
    }

    fn hash_code(&self) -> u64 {
        hash_ordered(self.items.iter())
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }

    fn as_list(&self) -> Option<&dyn List> {
        Some(self)
    }
}

impl Collection for ImmutableList {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn to_vec(&self) -> Vec<Value> {
        self.items.to_vec()
    }

    fn add(&self, _value: Value) -> Result<bool, RuntimeError> {
        Err(IMMUTABLE)
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        Err(IMMUTABLE)
    }
}

impl List for ImmutableList {
    fn get(&self, index: usize) -> Option<Value> {
        self.items.get(index).cloned()
    }

    fn set(&self, _index: usize, _value: Value) -> Result<Value, RuntimeError> {
        Err(IMMUTABLE)
    }

    fn insert(&self, _index: usize, _value: Value) -> Result<(), RuntimeError> {
        Err(IMMUTABLE)
    }

    fn remove(&self, _index: usize) -> Result<Value, RuntimeError> {
        Err(IMMUTABLE)
    }
}

/// Insertion-ordered immutable set; later duplicates are dropped.
#[derive(Debug, Default)]
pub struct ImmutableSet {
    items: IndexSet<Value>,
}

impl ImmutableSet {
    pub fn copy_of(items: impl IntoIterator<Item = Value>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

impl Object for ImmutableSet {
    fn equals(&self, other: &dyn Object) -> bool {
        set_equals(&self.to_vec(), other)
    }

    fn hash_code(&self) -> u64 {
        hash_unordered(self.items.iter())
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }
}

impl Collection for ImmutableSet {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn to_vec(&self) -> Vec<Value> {
        self.items.iter().cloned().collect()
    }

    fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    fn add(&self, _value: Value) -> Result<bool, RuntimeError> {
        Err(IMMUTABLE)
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        Err(IMMUTABLE)
    }

    fn is_set(&self) -> bool {
        true
    }
}

/// Comparator-ordered immutable set.
#[derive(Debug, Default)]
pub struct ImmutableSortedSet {
    comparator: Option<Obj>,
    items: Vec<Value>,
}

impl ImmutableSortedSet {
    /// Sorts `items` with `comparator`; comparator-equal elements collapse.
    pub fn copy_of_sorted(
        comparator: Option<Obj>,
        items: impl IntoIterator<Item = Value>,
    ) -> Result<Self, RuntimeError> {
        check_comparator(&comparator)?;
        let mut items: Vec<Value> = items.into_iter().collect();
        sort_dedup_last(&mut items, comparator.as_ref(), |v| v);
        Ok(Self { comparator, items })
    }

    pub fn comparator(&self) -> Option<&Obj> {
        self.comparator.as_ref()
    }
}

impl Object for ImmutableSortedSet {
    fn equals(&self, other: &dyn Object) -> bool {
        set_equals(&self.items, other)
    }

    fn hash_code(&self) -> u64 {
        hash_unordered(self.items.iter())
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }
}

impl Collection for ImmutableSortedSet {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn to_vec(&self) -> Vec<Value> {
        self.items.clone()
    }

    fn contains(&self, value: &Value) -> bool {
        search(&self.items[..], self.comparator.as_ref(), value, |v| v).is_ok()
    }

    fn add(&self, _value: Value) -> Result<bool, RuntimeError> {
        Err(IMMUTABLE)
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        Err(IMMUTABLE)
    }

    fn is_set(&self) -> bool {
        true
    }

    fn is_sorted(&self) -> bool {
        true
    }
}

fn immutable_map_equals(entries: &[(Value, Value)], other: &dyn Object) -> bool {
    other.as_map().is_some_and(|m| {
        m.len() == entries.len() && entries.iter().all(|(k, v)| m.get(k).as_ref() == Some(v))
    })
}

/// Insertion-ordered immutable map; a repeated key keeps its first position
/// and its last value.
#[derive(Debug, Default)]
pub struct ImmutableMap {
    entries: IndexMap<Value, Value>,
}

impl ImmutableMap {
    pub fn copy_of(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl Object for ImmutableMap {
    fn equals(&self, other: &dyn Object) -> bool {
        immutable_map_equals(&Map::entries(self), other)
    }

    fn hash_code(&self) -> u64 {
        hash_entries(self.entries.iter())
    }

    fn as_map(&self) -> Option<&dyn Map> {
        Some(self)
    }
}

impl Map for ImmutableMap {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &Value) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn put(&self, _key: Value, _value: Value) -> Result<Option<Value>, RuntimeError> {
        Err(IMMUTABLE)
    }

    fn remove(&self, _key: &Value) -> Result<Option<Value>, RuntimeError> {
        Err(IMMUTABLE)
    }

    fn entries(&self) -> Vec<(Value, Value)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Comparator-ordered immutable map.
#[derive(Debug, Default)]
pub struct ImmutableSortedMap {
    comparator: Option<Obj>,
    entries: Vec<(Value, Value)>,
}

impl ImmutableSortedMap {
    pub fn copy_of_sorted(
        comparator: Option<Obj>,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Result<Self, RuntimeError> {
        check_comparator(&comparator)?;
        let mut entries: Vec<(Value, Value)> = entries.into_iter().collect();
        sort_dedup_last(&mut entries, comparator.as_ref(), |(k, _)| k);
        Ok(Self {
            comparator,
            entries,
        })
    }

    pub fn comparator(&self) -> Option<&Obj> {
        self.comparator.as_ref()
    }
}

impl Object for ImmutableSortedMap {
    fn equals(&self, other: &dyn Object) -> bool {
        immutable_map_equals(&self.entries, other)
    }

    fn hash_code(&self) -> u64 {
        hash_entries(self.entries.iter().map(|(k, v)| (k, v)))
    }

    fn as_map(&self) -> Option<&dyn Map> {
        Some(self)
    }
}

impl Map for ImmutableSortedMap {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &Value) -> Option<Value> {
        search(&self.entries[..], self.comparator.as_ref(), key, |(k, _)| k)
            .ok()
            .map(|i| self.entries[i].1.clone())
    }

    fn put(&self, _key: Value, _value: Value) -> Result<Option<Value>, RuntimeError> {
        Err(IMMUTABLE)
    }

    fn remove(&self, _key: &Value) -> Result<Option<Value>, RuntimeError> {
        Err(IMMUTABLE)
    }

    fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.clone()
    }

    fn is_sorted(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReverseOrder;

    #[test]
    fn immutable_list_rejects_writes() {
        let list = ImmutableList::copy_of([1, 2].map(Value::from));
        assert_eq!(list.add(Value::from(3)), Err(IMMUTABLE));
        assert_eq!(list.as_slice(), &[Value::from(1), Value::from(2)]);
    }

    #[test]
    fn sorted_set_uses_comparator() {
        let set = ImmutableSortedSet::copy_of_sorted(
            Some(ReverseOrder::natural()),
            [1, 3, 2, 3].map(Value::from),
        )
        .unwrap();
        assert_eq!(
            set.to_vec(),
            vec![Value::from(3), Value::from(2), Value::from(1)]
        );
        assert!(set.contains(&Value::from(2)));
    }

    #[test]
    fn immutable_map_keeps_first_position() {
        let map = ImmutableMap::copy_of([
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::from(2)),
            (Value::from("a"), Value::from(3)),
        ]);
        assert_eq!(
            Map::entries(&map),
            vec![
                (Value::from("a"), Value::from(3)),
                (Value::from("b"), Value::from(2)),
            ]
        );
    }
}
