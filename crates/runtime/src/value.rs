//! The dynamic object model.
//!
//! A [`Value`] is either a scalar or an [`Obj`], a reference-counted handle
//! to something implementing [`Object`]. Two handles are the *same object*
//! when they point at the same allocation; that identity is what graph
//! encoding tracks to preserve sharing and cycles.

use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::capability::{Collection, Comparator, InvocationHandler, List, Map};

/// Upcast to [`Any`] for concrete-type recovery.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Anything that can live inside an object graph.
///
/// Equality, hashing and ordering default to identity. Container types
/// override them with structural versions and expose their capabilities
/// through the `as_*` hooks.
pub trait Object: AsAny + fmt::Debug + 'static {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn equals(&self, other: &dyn Object) -> bool {
        address_of(self.as_any()) == address_of(other.as_any())
    }

    fn hash_code(&self) -> u64 {
        address_of(self.as_any()) as u64
    }

    /// Natural ordering against another object, if one exists.
    fn compare(&self, _other: &dyn Object) -> Option<Ordering> {
        None
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        None
    }

    fn as_list(&self) -> Option<&dyn List> {
        None
    }

    fn as_map(&self) -> Option<&dyn Map> {
        None
    }

    fn as_comparator(&self) -> Option<&dyn Comparator> {
        None
    }

    fn as_invocation_handler(&self) -> Option<&dyn InvocationHandler> {
        None
    }
}

fn address_of(any: &dyn Any) -> usize {
    (any as *const dyn Any).cast::<()>() as usize
}

/// Identity of an object: its address plus its concrete type.
///
/// The type disambiguates distinct zero-sized statics that may share an
/// address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    address: usize,
    type_id: TypeId,
}

#[derive(Clone)]
enum Repr {
    Shared(Rc<dyn Object>),
    Canonical(&'static dyn Object),
}

/// Handle to an object.
///
/// Shared objects are reference counted; canonical objects are statics
/// (enum constants, catalog entries, singletons) whose identity is fixed
/// for the life of the process.
#[derive(Clone)]
pub struct Obj(Repr);

impl Obj {
    pub fn new<T: Object>(value: T) -> Self {
        Obj(Repr::Shared(Rc::new(value)))
    }

    pub fn from_rc(rc: Rc<dyn Object>) -> Self {
        Obj(Repr::Shared(rc))
    }

    pub fn canonical(value: &'static dyn Object) -> Self {
        Obj(Repr::Canonical(value))
    }

    pub fn get(&self) -> &dyn Object {
        match &self.0 {
            Repr::Shared(rc) => &**rc,
            Repr::Canonical(value) => *value,
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self.0, Repr::Canonical(_))
    }

    pub fn identity(&self) -> Identity {
        let any = self.get().as_any();
        Identity {
            address: address_of(any),
            type_id: any.type_id(),
        }
    }

    pub fn ptr_eq(&self, other: &Obj) -> bool {
        self.identity() == other.identity()
    }

    pub fn concrete_type_id(&self) -> TypeId {
        self.get().as_any().type_id()
    }

    pub fn type_name(&self) -> &'static str {
        self.get().type_name()
    }

    pub fn is<T: Object>(&self) -> bool {
        self.get().as_any().is::<T>()
    }

    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.get().as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.get().fmt(f)
    }
}

impl PartialEq for Obj {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.get().equals(other.get())
    }
}

impl Eq for Obj {}

impl Hash for Obj {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.get().hash_code());
    }
}

impl Ord for Obj {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        if let Some(ordering) = self.get().compare(other.get()) {
            return ordering;
        }
        self.type_name()
            .cmp(other.type_name())
            .then_with(|| address_of(self.get().as_any()).cmp(&address_of(other.get().as_any())))
    }
}

impl PartialOrd for Obj {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A node in an object graph.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Obj(Obj),
}

impl Value {
    pub fn obj<T: Object>(value: T) -> Self {
        Value::Obj(Obj::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_obj(&self) -> Option<&Obj> {
        match self {
            Value::Obj(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_obj().and_then(Obj::downcast_ref)
    }

    /// Identity comparison for objects, equality for scalars.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Obj(a), Value::Obj(b)) => a.ptr_eq(b),
            (Value::Obj(_), _) | (_, Value::Obj(_)) => false,
            _ => self == other,
        }
    }

    /// Short description used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Obj(obj) => obj.type_name(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Str(_) => 4,
            Value::Obj(_) => 5,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Obj(a), Value::Obj(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.rank());
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Obj(obj) => obj.hash(state),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Obj(a), Value::Obj(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<Obj> for Value {
    fn from(value: Obj) -> Self {
        Value::Obj(value)
    }
}

/// Orders two values with an optional comparator object.
///
/// Without a comparator, or when the object cannot compare, the natural
/// [`Value`] ordering applies.
pub fn compare_values(comparator: Option<&Obj>, a: &Value, b: &Value) -> Ordering {
    match comparator.and_then(|c| c.get().as_comparator()) {
        Some(c) => c.compare(a, b),
        None => a.cmp(b),
    }
}

/// Stable hash of a single value.
pub fn hash_value(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

pub(crate) fn hash_ordered<'a>(items: impl IntoIterator<Item = &'a Value>) -> u64 {
    let mut hasher = DefaultHasher::new();
    for item in items {
        item.hash(&mut hasher);
    }
    hasher.finish()
}

pub(crate) fn hash_unordered<'a>(items: impl IntoIterator<Item = &'a Value>) -> u64 {
    items
        .into_iter()
        .fold(0u64, |acc, item| acc.wrapping_add(hash_value(item)))
}

pub(crate) fn hash_entries<'a>(entries: impl IntoIterator<Item = (&'a Value, &'a Value)>) -> u64 {
    entries.into_iter().fold(0u64, |acc, (k, v)| {
        acc.wrapping_add(hash_value(k) ^ hash_value(v).rotate_left(17))
    })
}

/// Read access to a container's contents for hashing, equality and
/// snapshots.
///
/// `None` while the same container is borrowed for mutation further up the
/// stack, as when an insert hashes a value that reaches back into the
/// container. Callers treat that as empty.
pub(crate) fn settled<T>(cell: &RefCell<T>) -> Option<Ref<'_, T>> {
    cell.try_borrow().ok()
}

/// Recovers `T` from another object for structural equality checks.
pub(crate) fn same_type<T: Object>(other: &dyn Object) -> Option<&T> {
    other.as_any().downcast_ref::<T>()
}
