//! Capability traits exposed through the [`Object`](crate::Object) hooks.
//!
//! Containers use interior mutability, so every mutator takes `&self`.
//! Read-only and fixed-shape containers reject mutation with
//! [`RuntimeError::UnsupportedOperation`].

use std::cmp::Ordering;

use crate::{RuntimeError, Value};

pub trait Collection {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the elements in iteration order.
    fn to_vec(&self) -> Vec<Value>;

    fn contains(&self, value: &Value) -> bool {
        self.to_vec().contains(value)
    }

    /// Adds an element; `false` when a set already held it.
    fn add(&self, value: Value) -> Result<bool, RuntimeError>;

    fn clear(&self) -> Result<(), RuntimeError>;

    /// `true` when duplicates are rejected.
    fn is_set(&self) -> bool {
        false
    }

    /// `true` when iteration order is governed by a comparator.
    fn is_sorted(&self) -> bool {
        false
    }
}

pub trait List: Collection {
    fn get(&self, index: usize) -> Option<Value>;

    fn set(&self, index: usize, value: Value) -> Result<Value, RuntimeError>;

    fn insert(&self, index: usize, value: Value) -> Result<(), RuntimeError>;

    fn remove(&self, index: usize) -> Result<Value, RuntimeError>;

    fn is_random_access(&self) -> bool {
        true
    }
}

pub trait Map {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &Value) -> Option<Value>;

    fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    fn put(&self, key: Value, value: Value) -> Result<Option<Value>, RuntimeError>;

    fn remove(&self, key: &Value) -> Result<Option<Value>, RuntimeError>;

    /// Snapshot of the entries in iteration order.
    fn entries(&self) -> Vec<(Value, Value)>;

    fn is_sorted(&self) -> bool {
        false
    }
}

pub trait Comparator {
    fn compare(&self, a: &Value, b: &Value) -> Ordering;
}

/// Receives every call made through a [`Proxy`](crate::Proxy).
pub trait InvocationHandler {
    fn invoke(&self, interface: &str, method: &str, args: &[Value]) -> Result<Value, RuntimeError>;
}
