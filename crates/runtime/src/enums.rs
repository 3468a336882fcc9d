//! Enumerated constants and the containers keyed by them.
//!
//! Every constant of an [`EnumConstant`] type lives in a static slice, so
//! its [`Obj::canonical`] handle has one identity for the whole process.

use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::fmt;

use crate::access::{Field, FieldDescriptor, Introspect};
use crate::capability::{Collection, Map};
use crate::set::set_equals;
use crate::value::{hash_entries, hash_unordered};
use crate::{Obj, Object, RuntimeError, Value};

/// A fieldless enum whose constants are canonical objects.
pub trait EnumConstant: Object + Sync + Sized {
    /// All constants in ordinal order; `constants()[c.ordinal()]` is `c`.
    fn constants() -> &'static [Self];

    fn ordinal(&self) -> usize;

    fn name(&self) -> &'static str;

    fn by_name(name: &str) -> Option<&'static Self> {
        Self::constants().iter().find(|c| c.name() == name)
    }

    /// The canonical handle for this constant.
    fn canonical(&self) -> Obj {
        Obj::canonical(&Self::constants()[self.ordinal()])
    }
}

/// Implements [`Object`] and [`EnumConstant`] for a fieldless enum.
///
/// ```
/// use graphpack_runtime::{enum_constants, EnumConstant};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Suit { Clubs, Hearts }
/// enum_constants!(Suit { Clubs, Hearts });
///
/// assert_eq!(Suit::Hearts.ordinal(), 1);
/// assert!(Suit::Clubs.canonical().ptr_eq(&Suit::Clubs.canonical()));
/// ```
#[macro_export]
macro_rules! enum_constants {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::Object for $ty {}

        impl $crate::EnumConstant for $ty {
            fn constants() -> &'static [Self] {
                static CONSTANTS: &[$ty] = &[$($ty::$variant),+];
                CONSTANTS
            }

            fn ordinal(&self) -> usize {
                Self::constants()
                    .iter()
                    .position(|c| ::core::mem::discriminant(c) == ::core::mem::discriminant(self))
                    .unwrap_or_default()
            }

            fn name(&self) -> &'static str {
                match self {
                    $($ty::$variant => stringify!($variant)),+
                }
            }
        }
    };
}

/// Runtime descriptor of an [`EnumConstant`] type.
#[derive(Clone, Copy)]
pub struct EnumType {
    type_id: TypeId,
    name: &'static str,
    len: fn() -> usize,
    constant: fn(usize) -> Option<Obj>,
    ordinal: fn(&Obj) -> Option<usize>,
    by_name: fn(&str) -> Option<Obj>,
}

fn len_of<E: EnumConstant>() -> usize {
    E::constants().len()
}

fn constant_at<E: EnumConstant>(ordinal: usize) -> Option<Obj> {
    E::constants().get(ordinal).map(|c| Obj::canonical(c))
}

fn ordinal_of<E: EnumConstant>(obj: &Obj) -> Option<usize> {
    obj.downcast_ref::<E>().map(E::ordinal)
}

fn named<E: EnumConstant>(name: &str) -> Option<Obj> {
    E::by_name(name).map(|c| Obj::canonical(c))
}

impl EnumType {
    pub fn of<E: EnumConstant>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
            len: len_of::<E>,
            constant: constant_at::<E>,
            ordinal: ordinal_of::<E>,
            by_name: named::<E>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        (self.len)()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn constant(&self, ordinal: usize) -> Option<Obj> {
        (self.constant)(ordinal)
    }

    /// Ordinal of `obj`, or `None` when it is not one of this type's constants.
    pub fn ordinal(&self, obj: &Obj) -> Option<usize> {
        (self.ordinal)(obj)
    }

    pub fn by_name(&self, name: &str) -> Option<Obj> {
        (self.by_name)(name)
    }

    fn ordinal_of_value(&self, value: &Value) -> Result<usize, RuntimeError> {
        value
            .as_obj()
            .and_then(|obj| self.ordinal(obj))
            .ok_or(RuntimeError::WrongElementType {
                expected: self.name,
                found: value.kind_name(),
            })
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EnumType {}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumType").field(&self.name).finish()
    }
}

trait OrdinalBits {
    fn contains(&self, ordinal: usize) -> bool;
    fn insert(&self, ordinal: usize) -> bool;
    fn ordinals(&self) -> Vec<usize>;
    fn clear(&self);
}

impl OrdinalBits for Cell<u64> {
    fn contains(&self, ordinal: usize) -> bool {
        ordinal < 64 && self.get() & (1 << ordinal) != 0
    }

    fn insert(&self, ordinal: usize) -> bool {
        let bits = self.get();
        self.set(bits | (1 << ordinal));
        bits & (1 << ordinal) == 0
    }

    fn ordinals(&self) -> Vec<usize> {
        let bits = self.get();
        (0..64).filter(|i| bits & (1 << i) != 0).collect()
    }

    fn clear(&self) {
        self.set(0);
    }
}

impl OrdinalBits for RefCell<Vec<u64>> {
    fn contains(&self, ordinal: usize) -> bool {
        self.borrow()
            .get(ordinal / 64)
            .is_some_and(|word| word & (1 << (ordinal % 64)) != 0)
    }

    fn insert(&self, ordinal: usize) -> bool {
        let mut words = self.borrow_mut();
        let index = ordinal / 64;
        if words.len() <= index {
            words.resize(index + 1, 0);
        }
        let mask = 1 << (ordinal % 64);
        let fresh = words[index] & mask == 0;
        words[index] |= mask;
        fresh
    }

    fn ordinals(&self) -> Vec<usize> {
        self.borrow()
            .iter()
            .enumerate()
            .flat_map(|(w, word)| {
                let word = *word;
                (0..64)
                    .filter(move |i| word & (1 << i) != 0)
                    .map(move |i| w * 64 + i)
            })
            .collect()
    }

    fn clear(&self) {
        self.borrow_mut().iter_mut().for_each(|w| *w = 0);
    }
}

macro_rules! enum_set {
    ($(#[$meta:meta])* $name:ident, $bits:ty) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            element_type: EnumType,
            bits: $bits,
        }

        impl $name {
            fn members(&self) -> Vec<Value> {
                self.bits
                    .ordinals()
                    .into_iter()
                    .filter_map(|i| self.element_type.constant(i))
                    .map(Value::Obj)
                    .collect()
            }
        }

        impl Introspect for $name {
            fn fields() -> &'static [FieldDescriptor] {
                static ELEMENT_TYPE: Field<$name, EnumType> =
                    Field::new("element_type", |s| &s.element_type);
                static FIELDS: [FieldDescriptor; 1] =
                    [FieldDescriptor::new("element_type", &ELEMENT_TYPE)];
                &FIELDS
            }
        }

        impl Object for $name {
            fn equals(&self, other: &dyn Object) -> bool {
                set_equals(&self.members(), other)
            }

            fn hash_code(&self) -> u64 {
                hash_unordered(self.members().iter())
            }

            fn as_collection(&self) -> Option<&dyn Collection> {
                Some(self)
            }
        }

        impl Collection for $name {
            fn len(&self) -> usize {
                self.bits.ordinals().len()
            }

            fn to_vec(&self) -> Vec<Value> {
                self.members()
            }

            fn contains(&self, value: &Value) -> bool {
                self.element_type
                    .ordinal_of_value(value)
                    .is_ok_and(|i| self.bits.contains(i))
            }

            fn add(&self, value: Value) -> Result<bool, RuntimeError> {
                let ordinal = self.element_type.ordinal_of_value(&value)?;
                Ok(self.bits.insert(ordinal))
            }

            fn clear(&self) -> Result<(), RuntimeError> {
                self.bits.clear();
                Ok(())
            }

            fn is_set(&self) -> bool {
                true
            }
        }
    };
}

enum_set!(
    /// Enum set for types with at most 64 constants, one bit per ordinal.
    RegularEnumSet,
    Cell<u64>
);

enum_set!(
    /// Enum set for larger enum types.
    JumboEnumSet,
    RefCell<Vec<u64>>
);

/// An empty enum set of the representation suited to `element_type`.
pub fn none_of(element_type: EnumType) -> Obj {
    if element_type.len() <= 64 {
        Obj::new(RegularEnumSet {
            element_type,
            bits: Cell::new(0),
        })
    } else {
        Obj::new(JumboEnumSet {
            element_type,
            bits: RefCell::new(vec![0; element_type.len().div_ceil(64)]),
        })
    }
}

/// An enum set holding every constant of `element_type`.
pub fn all_of(element_type: EnumType) -> Obj {
    let set = none_of(element_type);
    if let Some(collection) = set.get().as_collection() {
        for ordinal in 0..element_type.len() {
            if let Some(c) = element_type.constant(ordinal) {
                let _ = collection.add(Value::Obj(c));
            }
        }
    }
    set
}

pub fn enum_set_of<E: EnumConstant>(items: &[E]) -> Obj {
    let set = none_of(EnumType::of::<E>());
    if let Some(collection) = set.get().as_collection() {
        for item in items {
            let _ = collection.add(Value::Obj(item.canonical()));
        }
    }
    set
}

/// Map keyed by the constants of one enum type, iterating in ordinal order.
#[derive(Debug)]
pub struct EnumMap {
    key_type: EnumType,
    values: RefCell<Vec<Option<Value>>>,
}

impl EnumMap {
    pub fn new(key_type: EnumType) -> Self {
        Self {
            key_type,
            values: RefCell::new(vec![None; key_type.len()]),
        }
    }

    pub fn key_type(&self) -> EnumType {
        self.key_type
    }
}

impl Object for EnumMap {
    fn equals(&self, other: &dyn Object) -> bool {
        let entries = Map::entries(self);
        other.as_map().is_some_and(|m| {
            m.len() == entries.len() && entries.iter().all(|(k, v)| m.get(k).as_ref() == Some(v))
        })
    }

    fn hash_code(&self) -> u64 {
        let entries = Map::entries(self);
        hash_entries(entries.iter().map(|(k, v)| (k, v)))
    }

    fn as_map(&self) -> Option<&dyn Map> {
        Some(self)
    }
}

impl Map for EnumMap {
    fn len(&self) -> usize {
        self.values.borrow().iter().filter(|v| v.is_some()).count()
    }

    fn get(&self, key: &Value) -> Option<Value> {
        let ordinal = self.key_type.ordinal_of_value(key).ok()?;
        self.values.borrow().get(ordinal).cloned().flatten()
    }

    fn put(&self, key: Value, value: Value) -> Result<Option<Value>, RuntimeError> {
        let ordinal = self.key_type.ordinal_of_value(&key)?;
        let mut values = self.values.borrow_mut();
        let len = values.len();
        let slot = values
            .get_mut(ordinal)
            .ok_or(RuntimeError::IndexOutOfBounds { index: ordinal, len })?;
        Ok(slot.replace(value))
    }

    fn remove(&self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        let ordinal = self.key_type.ordinal_of_value(key)?;
        Ok(self
            .values
            .borrow_mut()
            .get_mut(ordinal)
            .and_then(Option::take))
    }

    fn entries(&self) -> Vec<(Value, Value)> {
        self.values
            .borrow()
            .iter()
            .enumerate()
            .filter_map(|(i, v)| {
                let value = v.clone()?;
                Some((Value::Obj(self.key_type.constant(i)?), value))
            })
            .collect()
    }
}
