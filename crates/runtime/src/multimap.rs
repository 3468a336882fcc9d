//! Key to many-values maps.

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::map::check_comparator;
use crate::value::{compare_values, hash_entries, settled};
use crate::{Obj, Object, RuntimeError, Value};

/// Storage strategy of a [`Multimap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultimapKind {
    /// Insertion-ordered keys, value lists that keep duplicates.
    ArrayList,
    /// Unordered keys, value sets.
    Hash,
    /// Insertion-ordered keys and value sets.
    LinkedHash,
    /// Comparator-ordered keys and value sets.
    Tree,
}

#[derive(Debug)]
pub struct Multimap {
    kind: MultimapKind,
    key_comparator: Option<Obj>,
    value_comparator: Option<Obj>,
    entries: RefCell<IndexMap<Value, Vec<Value>>>,
}

impl Multimap {
    fn with_kind(kind: MultimapKind) -> Self {
        Self {
            kind,
            key_comparator: None,
            value_comparator: None,
            entries: RefCell::default(),
        }
    }

    pub fn array_list() -> Self {
        Self::with_kind(MultimapKind::ArrayList)
    }

    pub fn hash() -> Self {
        Self::with_kind(MultimapKind::Hash)
    }

    pub fn linked_hash() -> Self {
        Self::with_kind(MultimapKind::LinkedHash)
    }

    pub fn tree(
        key_comparator: Option<Obj>,
        value_comparator: Option<Obj>,
    ) -> Result<Self, RuntimeError> {
        check_comparator(&key_comparator)?;
        check_comparator(&value_comparator)?;
        Ok(Self {
            key_comparator,
            value_comparator,
            ..Self::with_kind(MultimapKind::Tree)
        })
    }

    pub fn kind(&self) -> MultimapKind {
        self.kind
    }

    pub fn key_comparator(&self) -> Option<&Obj> {
        self.key_comparator.as_ref()
    }

    pub fn value_comparator(&self) -> Option<&Obj> {
        self.value_comparator.as_ref()
    }

    /// Adds one key/value pair; `false` when a set-valued flavor already
    /// held it.
    pub fn put(&self, key: Value, value: Value) -> bool {
        let mut entries = self.entries.borrow_mut();
        let values = match self.kind {
            MultimapKind::Tree => {
                let cmp = self.key_comparator.as_ref();
                let index = match entries.binary_search_by(|k, _| compare_values(cmp, k, &key)) {
                    Ok(i) => i,
                    Err(i) => {
                        entries.shift_insert(i, key, Vec::new());
                        i
                    }
                };
                match entries.get_index_mut(index) {
                    Some((_, values)) => values,
                    None => return false,
                }
            }
            _ => entries.entry(key).or_default(),
        };
        match self.kind {
            MultimapKind::ArrayList => {
                values.push(value);
                true
            }
            MultimapKind::Hash | MultimapKind::LinkedHash => {
                if values.contains(&value) {
                    false
                } else {
                    values.push(value);
                    true
                }
            }
            MultimapKind::Tree => {
                let cmp = self.value_comparator.as_ref();
                match values.binary_search_by(|v| compare_values(cmp, v, &value)) {
                    Ok(_) => false,
                    Err(i) => {
                        values.insert(i, value);
                        true
                    }
                }
            }
        }
    }

    pub fn get(&self, key: &Value) -> Vec<Value> {
        let Some(entries) = settled(&self.entries) else {
            return Vec::new();
        };
        let found = match self.kind {
            MultimapKind::Tree => entries
                .binary_search_by(|k, _| compare_values(self.key_comparator.as_ref(), k, key))
                .ok()
                .and_then(|i| entries.get_index(i))
                .map(|(_, values)| values),
            _ => entries.get(key),
        };
        found.cloned().unwrap_or_default()
    }

    /// Total number of key/value pairs.
    pub fn len(&self) -> usize {
        settled(&self.entries).map_or(0, |entries| entries.values().map(Vec::len).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.key_count() == 0
    }

    pub fn key_count(&self) -> usize {
        settled(&self.entries).map_or(0, |entries| entries.len())
    }

    /// Every pair, grouped by key in key order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        settled(&self.entries)
            .map(|entries| {
                entries
                    .iter()
                    .flat_map(|(k, values)| values.iter().map(move |v| (k.clone(), v.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Object for Multimap {
    fn equals(&self, other: &dyn Object) -> bool {
        let Some(other) = other.as_any().downcast_ref::<Multimap>() else {
            return false;
        };
        let (Some(mine), Some(theirs)) = (settled(&self.entries), settled(&other.entries)) else {
            return false;
        };
        mine.len() == theirs.len()
            && mine.iter().all(|(k, values)| {
                theirs.get(k).is_some_and(|other_values| {
                    if self.kind == MultimapKind::ArrayList {
                        values == other_values
                    } else {
                        values.len() == other_values.len()
                            && values.iter().all(|v| other_values.contains(v))
                    }
                })
            })
    }

    fn hash_code(&self) -> u64 {
        let entries = self.entries();
        hash_entries(entries.iter().map(|(k, v)| (k, v)))
    }
}
