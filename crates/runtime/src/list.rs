//! List types: growable, linked, fixed-size and sub-range views.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::access::{Field, FieldDescriptor, Introspect};
use crate::capability::{Collection, List};
use crate::value::hash_ordered;
use crate::{Obj, Object, RuntimeError, Value};

fn check_index(index: usize, len: usize) -> Result<(), RuntimeError> {
    if index < len {
        Ok(())
    } else {
        Err(RuntimeError::IndexOutOfBounds { index, len })
    }
}

fn list_equals(items: &[Value], other: &dyn Object) -> bool {
    other
        .as_list()
        .is_some_and(|list| list.len() == items.len() && list.to_vec() == items)
}

/// Growable random-access list.
#[derive(Debug, Default)]
pub struct ArrayList {
    items: RefCell<Vec<Value>>,
}

impl ArrayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: RefCell::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn push(&self, value: Value) {
        self.items.borrow_mut().push(value);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }
}

impl FromIterator<Value> for ArrayList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: RefCell::new(iter.into_iter().collect()),
        }
    }
}

impl Object for ArrayList {
    fn equals(&self, other: &dyn Object) -> bool {
        list_equals(&self.items.borrow(), other)
    }

    fn hash_code(&self) -> u64 {
        hash_ordered(self.items.borrow().iter())
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }

    fn as_list(&self) -> Option<&dyn List> {
        Some(self)
    }
}

impl Collection for ArrayList {
    fn len(&self) -> usize {
        ArrayList::len(self)
    }

    fn to_vec(&self) -> Vec<Value> {
        ArrayList::to_vec(self)
    }

    fn add(&self, value: Value) -> Result<bool, RuntimeError> {
        self.push(value);
        Ok(true)
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        self.items.borrow_mut().clear();
        Ok(())
    }
}

impl List for ArrayList {
    fn get(&self, index: usize) -> Option<Value> {
        ArrayList::get(self, index)
    }

    fn set(&self, index: usize, value: Value) -> Result<Value, RuntimeError> {
        let mut items = self.items.borrow_mut();
        check_index(index, items.len())?;
        Ok(std::mem::replace(&mut items[index], value))
    }

    fn insert(&self, index: usize, value: Value) -> Result<(), RuntimeError> {
        let mut items = self.items.borrow_mut();
        if index > items.len() {
            return Err(RuntimeError::IndexOutOfBounds {
                index,
                len: items.len(),
            });
        }
        items.insert(index, value);
        Ok(())
    }

    fn remove(&self, index: usize) -> Result<Value, RuntimeError> {
        let mut items = self.items.borrow_mut();
        check_index(index, items.len())?;
        Ok(items.remove(index))
    }
}

/// Sequential-access list.
#[derive(Debug, Default)]
pub struct LinkedList {
    items: RefCell<VecDeque<Value>>,
}

impl LinkedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_front(&self, value: Value) {
        self.items.borrow_mut().push_front(value);
    }

    pub fn push_back(&self, value: Value) {
        self.items.borrow_mut().push_back(value);
    }
}

impl FromIterator<Value> for LinkedList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: RefCell::new(iter.into_iter().collect()),
        }
    }
}

impl Object for LinkedList {
    fn equals(&self, other: &dyn Object) -> bool {
        let items: Vec<Value> = self.items.borrow().iter().cloned().collect();
        list_equals(&items, other)
    }

    fn hash_code(&self) -> u64 {
        hash_ordered(self.items.borrow().iter())
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }

    fn as_list(&self) -> Option<&dyn List> {
        Some(self)
    }
}

impl Collection for LinkedList {
    fn len(&self) -> usize {
        self.items.borrow().len()
    }

    fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().iter().cloned().collect()
    }

    fn add(&self, value: Value) -> Result<bool, RuntimeError> {
        self.push_back(value);
        Ok(true)
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        self.items.borrow_mut().clear();
        Ok(())
    }
}

impl List for LinkedList {
    fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    fn set(&self, index: usize, value: Value) -> Result<Value, RuntimeError> {
        let mut items = self.items.borrow_mut();
        check_index(index, items.len())?;
        Ok(std::mem::replace(&mut items[index], value))
    }

    fn insert(&self, index: usize, value: Value) -> Result<(), RuntimeError> {
        let mut items = self.items.borrow_mut();
        if index > items.len() {
            return Err(RuntimeError::IndexOutOfBounds {
                index,
                len: items.len(),
            });
        }
        items.insert(index, value);
        Ok(())
    }

    fn remove(&self, index: usize) -> Result<Value, RuntimeError> {
        let mut items = self.items.borrow_mut();
        check_index(index, items.len())?;
        items
            .remove(index)
            .ok_or(RuntimeError::IndexOutOfBounds { index, len: 0 })
    }

    fn is_random_access(&self) -> bool {
        false
    }
}

/// List over a fixed array: elements may be replaced, never added or removed.
#[derive(Debug)]
pub struct FixedSizeList {
    array: RefCell<Box<[Value]>>,
}

impl FixedSizeList {
    pub fn from_array(array: Vec<Value>) -> Self {
        Self {
            array: RefCell::new(array.into_boxed_slice()),
        }
    }
}

static FIXED_ARRAY: Field<FixedSizeList, RefCell<Box<[Value]>>> = Field::new("array", |l| &l.array);
static FIXED_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new("array", &FIXED_ARRAY)];

impl Introspect for FixedSizeList {
    fn fields() -> &'static [FieldDescriptor] {
        &FIXED_FIELDS
    }
}

impl Object for FixedSizeList {
    fn equals(&self, other: &dyn Object) -> bool {
        list_equals(&self.array.borrow(), other)
    }

    fn hash_code(&self) -> u64 {
        hash_ordered(self.array.borrow().iter())
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }

    fn as_list(&self) -> Option<&dyn List> {
        Some(self)
    }
}

impl Collection for FixedSizeList {
    fn len(&self) -> usize {
        self.array.borrow().len()
    }

    fn to_vec(&self) -> Vec<Value> {
        self.array.borrow().to_vec()
    }

    fn add(&self, _value: Value) -> Result<bool, RuntimeError> {
        Err(RuntimeError::UnsupportedOperation("add to a fixed-size list"))
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        Err(RuntimeError::UnsupportedOperation("clear a fixed-size list"))
    }
}

impl List for FixedSizeList {
    fn get(&self, index: usize) -> Option<Value> {
        self.array.borrow().get(index).cloned()
    }

    fn set(&self, index: usize, value: Value) -> Result<Value, RuntimeError> {
        let mut array = self.array.borrow_mut();
        check_index(index, array.len())?;
        Ok(std::mem::replace(&mut array[index], value))
    }

    fn insert(&self, _index: usize, _value: Value) -> Result<(), RuntimeError> {
        Err(RuntimeError::UnsupportedOperation("insert into a fixed-size list"))
    }

    fn remove(&self, _index: usize) -> Result<Value, RuntimeError> {
        Err(RuntimeError::UnsupportedOperation("remove from a fixed-size list"))
    }
}

#[derive(Debug)]
struct ViewState {
    parent: Obj,
    offset: usize,
    size: Cell<usize>,
}

impl ViewState {
    fn parent(&self) -> Result<&dyn List, RuntimeError> {
        self.parent
            .get()
            .as_list()
            .ok_or(RuntimeError::MissingCapability(self.parent.type_name(), "list"))
    }

    fn to_vec(&self) -> Vec<Value> {
        let Ok(parent) = self.parent() else {
            return Vec::new();
        };
        (self.offset..self.offset + self.size.get())
            .filter_map(|i| parent.get(i))
            .collect()
    }

    fn get(&self, index: usize) -> Option<Value> {
        if index >= self.size.get() {
            return None;
        }
        self.parent().ok()?.get(self.offset + index)
    }

    fn set(&self, index: usize, value: Value) -> Result<Value, RuntimeError> {
        check_index(index, self.size.get())?;
        self.parent()?.set(self.offset + index, value)
    }

    fn insert(&self, index: usize, value: Value) -> Result<(), RuntimeError> {
        if index > self.size.get() {
            return Err(RuntimeError::IndexOutOfBounds {
                index,
                len: self.size.get(),
            });
        }
        self.parent()?.insert(self.offset + index, value)?;
        self.size.set(self.size.get() + 1);
        Ok(())
    }

    fn remove(&self, index: usize) -> Result<Value, RuntimeError> {
        check_index(index, self.size.get())?;
        let removed = self.parent()?.remove(self.offset + index)?;
        self.size.set(self.size.get() - 1);
        Ok(removed)
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        let parent = self.parent()?;
        for _ in 0..self.size.get() {
            parent.remove(self.offset)?;
        }
        self.size.set(0);
        Ok(())
    }
}

macro_rules! sub_list_view {
    ($(#[$meta:meta])* $name:ident, $random:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            state: ViewState,
        }

        impl Introspect for $name {
            fn fields() -> &'static [FieldDescriptor] {
                static PARENT: Field<$name, Obj> = Field::new("parent", |v| &v.state.parent);
                static OFFSET: Field<$name, usize> = Field::new("offset", |v| &v.state.offset);
                static SIZE: Field<$name, Cell<usize>> = Field::new("size", |v| &v.state.size);
                static FIELDS: [FieldDescriptor; 3] = [
                    FieldDescriptor::new("parent", &PARENT),
                    FieldDescriptor::new("offset", &OFFSET),
                    FieldDescriptor::new("size", &SIZE),
                ];
                &FIELDS
            }
        }

        impl Object for $name {
            fn equals(&self, other: &dyn Object) -> bool {
                list_equals(&self.state.to_vec(), other)
            }

            fn hash_code(&self) -> u64 {
                hash_ordered(self.state.to_vec().iter())
            }

            fn as_collection(&self) -> Option<&dyn Collection> {
                Some(self)
            }

            fn as_list(&self) -> Option<&dyn List> {
                Some(self)
            }
        }

        impl Collection for $name {
            fn len(&self) -> usize {
                self.state.size.get()
            }

            fn to_vec(&self) -> Vec<Value> {
                self.state.to_vec()
            }

            fn add(&self, value: Value) -> Result<bool, RuntimeError> {
                self.state.insert(self.state.size.get(), value)?;
                Ok(true)
            }

            fn clear(&self) -> Result<(), RuntimeError> {
                self.state.clear()
            }
        }

        impl List for $name {
            fn get(&self, index: usize) -> Option<Value> {
                self.state.get(index)
            }

            fn set(&self, index: usize, value: Value) -> Result<Value, RuntimeError> {
                self.state.set(index, value)
            }

            fn insert(&self, index: usize, value: Value) -> Result<(), RuntimeError> {
                self.state.insert(index, value)
            }

            fn remove(&self, index: usize) -> Result<Value, RuntimeError> {
                self.state.remove(index)
            }

            fn is_random_access(&self) -> bool {
                $random
            }
        }
    };
}

sub_list_view!(
    /// Live view over a range of a sequential-access list.
    SubList,
    false
);

sub_list_view!(
    /// Live view over a range of a random-access list.
    RandomAccessSubList,
    true
);

/// Creates a live view over `from..to` of `list`.
///
/// Writes through the view land in the backing list. The view type follows
/// the backing list's access pattern.
pub fn sub_list(list: &Obj, from: usize, to: usize) -> Result<Obj, RuntimeError> {
    let backing = list
        .get()
        .as_list()
        .ok_or(RuntimeError::MissingCapability(list.type_name(), "list"))?;
    let len = backing.len();
    if from > to || to > len {
        return Err(RuntimeError::InvalidRange { from, to, len });
    }
    let state = ViewState {
        parent: list.clone(),
        offset: from,
        size: Cell::new(to - from),
    };
    Ok(if backing.is_random_access() {
        Obj::new(RandomAccessSubList { state })
    } else {
        Obj::new(SubList { state })
    })
}
