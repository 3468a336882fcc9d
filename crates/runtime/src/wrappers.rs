//! Synchronized and read-only views over another container.
//!
//! Both wrappers keep their delegate private. The factories pick a
//! [`WrapperKind`] matching the capability the caller asked for, and the
//! wrapper then exposes exactly that capability.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use crate::access::{Field, FieldDescriptor, Introspect};
use crate::capability::{Collection, List, Map};
use crate::{Obj, Object, RuntimeError, Value};

/// Wrapper category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    Collection,
    List,
    RandomAccessList,
    Set,
    SortedSet,
    Map,
    SortedMap,
}

impl WrapperKind {
    fn is_collection(self) -> bool {
        !matches!(self, WrapperKind::Map | WrapperKind::SortedMap)
    }

    fn is_list(self) -> bool {
        matches!(self, WrapperKind::List | WrapperKind::RandomAccessList)
    }

    fn is_set(self) -> bool {
        matches!(self, WrapperKind::Set | WrapperKind::SortedSet)
    }
}

fn collection_of(obj: &Obj) -> Result<&dyn Collection, RuntimeError> {
    obj.get()
        .as_collection()
        .ok_or(RuntimeError::MissingCapability(obj.type_name(), "collection"))
}

fn list_of(obj: &Obj) -> Result<&dyn List, RuntimeError> {
    obj.get()
        .as_list()
        .ok_or(RuntimeError::MissingCapability(obj.type_name(), "list"))
}

fn map_of(obj: &Obj) -> Result<&dyn Map, RuntimeError> {
    obj.get()
        .as_map()
        .ok_or(RuntimeError::MissingCapability(obj.type_name(), "map"))
}

fn check_kind(kind: WrapperKind, delegate: &Obj) -> Result<(), RuntimeError> {
    match kind {
        WrapperKind::Collection => collection_of(delegate).map(drop),
        WrapperKind::List | WrapperKind::RandomAccessList => list_of(delegate).map(drop),
        WrapperKind::Set => {
            let c = collection_of(delegate)?;
            if c.is_set() {
                Ok(())
            } else {
                Err(RuntimeError::MissingCapability(delegate.type_name(), "set"))
            }
        }
        WrapperKind::SortedSet => {
            let c = collection_of(delegate)?;
            if c.is_set() && c.is_sorted() {
                Ok(())
            } else {
                Err(RuntimeError::MissingCapability(delegate.type_name(), "sorted set"))
            }
        }
        WrapperKind::Map => map_of(delegate).map(drop),
        WrapperKind::SortedMap => {
            if map_of(delegate)?.is_sorted() {
                Ok(())
            } else {
                Err(RuntimeError::MissingCapability(delegate.type_name(), "sorted map"))
            }
        }
    }
}

fn list_kind(delegate: &Obj) -> Result<WrapperKind, RuntimeError> {
    Ok(if list_of(delegate)?.is_random_access() {
        WrapperKind::RandomAccessList
    } else {
        WrapperKind::List
    })
}

macro_rules! wrapper_factories {
    ($ty:ident) => {
        impl $ty {
            pub fn collection(delegate: Obj) -> Result<Obj, RuntimeError> {
                Self::wrap(WrapperKind::Collection, delegate)
            }

            /// Random-access delegates yield a random-access wrapper.
            pub fn list(delegate: Obj) -> Result<Obj, RuntimeError> {
                let kind = list_kind(&delegate)?;
                Self::wrap(kind, delegate)
            }

            pub fn set(delegate: Obj) -> Result<Obj, RuntimeError> {
                Self::wrap(WrapperKind::Set, delegate)
            }

            pub fn sorted_set(delegate: Obj) -> Result<Obj, RuntimeError> {
                Self::wrap(WrapperKind::SortedSet, delegate)
            }

            pub fn map(delegate: Obj) -> Result<Obj, RuntimeError> {
                Self::wrap(WrapperKind::Map, delegate)
            }

            pub fn sorted_map(delegate: Obj) -> Result<Obj, RuntimeError> {
                Self::wrap(WrapperKind::SortedMap, delegate)
            }

            pub fn kind(&self) -> WrapperKind {
                self.kind
            }
        }

        impl Introspect for $ty {
            fn fields() -> &'static [FieldDescriptor] {
                static DELEGATE: Field<$ty, Obj> = Field::new("delegate", |w| &w.delegate);
                static FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new("delegate", &DELEGATE)];
                &FIELDS
            }
        }

        impl Object for $ty {
            fn equals(&self, other: &dyn Object) -> bool {
                match other.as_any().downcast_ref::<$ty>() {
                    Some(o) => self.delegate == o.delegate,
                    None => self.delegate.get().equals(other),
                }
            }

            fn hash_code(&self) -> u64 {
                self.delegate.get().hash_code()
            }

            fn as_collection(&self) -> Option<&dyn Collection> {
                self.kind.is_collection().then_some(self as &dyn Collection)
            }

            fn as_list(&self) -> Option<&dyn List> {
                self.kind.is_list().then_some(self as &dyn List)
            }

            fn as_map(&self) -> Option<&dyn Map> {
                (!self.kind.is_collection()).then_some(self as &dyn Map)
            }
        }
    };
}

/// Serializes every access to the delegate through a re-entrant lock.
#[derive(Debug)]
pub struct Synchronized {
    kind: WrapperKind,
    delegate: Obj,
    monitor: ReentrantMutex<()>,
}

impl Synchronized {
    pub fn wrap(kind: WrapperKind, delegate: Obj) -> Result<Obj, RuntimeError> {
        check_kind(kind, &delegate)?;
        Ok(Obj::new(Synchronized {
            kind,
            delegate,
            monitor: ReentrantMutex::new(()),
        }))
    }

    /// Holds the monitor; iteration over the wrapper should happen under it.
    pub fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.monitor.lock()
    }
}

wrapper_factories!(Synchronized);

impl Collection for Synchronized {
    fn len(&self) -> usize {
        let _guard = self.lock();
        collection_of(&self.delegate).map_or(0, |c| c.len())
    }

    fn to_vec(&self) -> Vec<Value> {
        let _guard = self.lock();
        collection_of(&self.delegate).map(|c| c.to_vec()).unwrap_or_default()
    }

    fn contains(&self, value: &Value) -> bool {
        let _guard = self.lock();
        collection_of(&self.delegate).is_ok_and(|c| c.contains(value))
    }

    fn add(&self, value: Value) -> Result<bool, RuntimeError> {
        let _guard = self.lock();
        collection_of(&self.delegate)?.add(value)
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        let _guard = self.lock();
        collection_of(&self.delegate)?.clear()
    }

    fn is_set(&self) -> bool {
        self.kind.is_set()
    }

    fn is_sorted(&self) -> bool {
        self.kind == WrapperKind::SortedSet
    }
}

impl List for Synchronized {
    fn get(&self, index: usize) -> Option<Value> {
        let _guard = self.lock();
        list_of(&self.delegate).ok()?.get(index)
    }

    fn set(&self, index: usize, value: Value) -> Result<Value, RuntimeError> {
        let _guard = self.lock();
        list_of(&self.delegate)?.set(index, value)
    }

    fn insert(&self, index: usize, value: Value) -> Result<(), RuntimeError> {
        let _guard = self.lock();
        list_of(&self.delegate)?.insert(index, value)
    }

    fn remove(&self, index: usize) -> Result<Value, RuntimeError> {
        let _guard = self.lock();
        list_of(&self.delegate)?.remove(index)
    }

    fn is_random_access(&self) -> bool {
        self.kind == WrapperKind::RandomAccessList
    }
}

impl Map for Synchronized {
    fn len(&self) -> usize {
        let _guard = self.lock();
        map_of(&self.delegate).map_or(0, |m| m.len())
    }

    fn get(&self, key: &Value) -> Option<Value> {
        let _guard = self.lock();
        map_of(&self.delegate).ok()?.get(key)
    }

    fn put(&self, key: Value, value: Value) -> Result<Option<Value>, RuntimeError> {
        let _guard = self.lock();
        map_of(&self.delegate)?.put(key, value)
    }

    fn remove(&self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        let _guard = self.lock();
        map_of(&self.delegate)?.remove(key)
    }

    fn entries(&self) -> Vec<(Value, Value)> {
        let _guard = self.lock();
        map_of(&self.delegate).map(|m| m.entries()).unwrap_or_default()
    }

    fn is_sorted(&self) -> bool {
        self.kind == WrapperKind::SortedMap
    }
}

/// Read-only view: reads pass through, every mutator fails.
#[derive(Debug)]
pub struct Unmodifiable {
    kind: WrapperKind,
    delegate: Obj,
}

impl Unmodifiable {
    pub fn wrap(kind: WrapperKind, delegate: Obj) -> Result<Obj, RuntimeError> {
        check_kind(kind, &delegate)?;
        Ok(Obj::new(Unmodifiable { kind, delegate }))
    }
}

wrapper_factories!(Unmodifiable);

const READ_ONLY: RuntimeError = RuntimeError::UnsupportedOperation("modify an unmodifiable view");

impl Collection for Unmodifiable {
    fn len(&self) -> usize {
        collection_of(&self.delegate).map_or(0, |c| c.len())
    }

    fn to_vec(&self) -> Vec<Value> {
        collection_of(&self.delegate)
            .map(|c| c.to_vec())
            .unwrap_or_default()
    }

    fn contains(&self, value: &Value) -> bool {
        collection_of(&self.delegate).is_ok_and(|c| c.contains(value))
    }

    fn add(&self, _value: Value) -> Result<bool, RuntimeError> {
        Err(READ_ONLY)
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        Err(READ_ONLY)
    }

    fn is_set(&self) -> bool {
        self.kind.is_set()
    }

    fn is_sorted(&self) -> bool {
        self.kind == WrapperKind::SortedSet
    }
}

impl List for Unmodifiable {
    fn get(&self, index: usize) -> Option<Value> {
        list_of(&self.delegate).ok()?.get(index)
    }

    fn set(&self, _index: usize, _value: Value) -> Result<Value, RuntimeError> {
        Err(READ_ONLY)
    }

    fn insert(&self, _index: usize, _value: Value) -> Result<(), RuntimeError> {
        Err(READ_ONLY)
    }

    fn remove(&self, _index: usize) -> Result<Value, RuntimeError> {
        Err(READ_ONLY)
    }

    fn is_random_access(&self) -> bool {
        self.kind == WrapperKind::RandomAccessList
    }
}

impl Map for Unmodifiable {
    fn len(&self) -> usize {
        map_of(&self.delegate).map_or(0, |m| m.len())
    }

    fn get(&self, key: &Value) -> Option<Value> {
        map_of(&self.delegate).ok()?.get(key)
    }

    fn put(&self, _key: Value, _value: Value) -> Result<Option<Value>, RuntimeError> {
        Err(READ_ONLY)
    }

    fn remove(&self, _key: &Value) -> Result<Option<Value>, RuntimeError> {
        Err(READ_ONLY)
    }

    fn entries(&self) -> Vec<(Value, Value)> {
        map_of(&self.delegate)
            .map(|m| m.entries())
            .unwrap_or_default()
    }

    fn is_sorted(&self) -> bool {
        self.kind == WrapperKind::SortedMap
    }
}
