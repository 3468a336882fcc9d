//! Runtime object model for graphpack.
//!
//! Everything an object graph can hold is a [`Value`]. Objects are shared
//! through [`Obj`] handles and expose what they can do through the
//! capability hooks on [`Object`]: [`Collection`], [`List`], [`Map`],
//! [`Comparator`] and [`InvocationHandler`].
//!
//! The container types here mirror a typical collections library: growable
//! and linked lists, hash/linked/tree sets and maps, synchronized and
//! read-only wrappers, immutable containers, multimaps, tables and enum
//! sets. Some of them keep state private that a faithful copy still needs;
//! those implement [`Introspect`].
//!
//! # Example
//!
//! ```
//! use graphpack_runtime::{sub_list, ArrayList, Obj, Value};
//!
//! let list: ArrayList = (1..=4).map(Value::from).collect();
//! let list = Obj::new(list);
//! let view = sub_list(&list, 1, 3).unwrap();
//! view.get().as_list().unwrap().set(0, Value::from(20)).unwrap();
//! assert_eq!(list.get().as_list().unwrap().get(1), Some(Value::from(20)));
//! ```

pub mod access;
mod calendar;
mod capability;
mod comparators;
pub mod enums;
mod error;
mod foreign;
mod immutable;
mod list;
mod map;
mod multimap;
mod proxy;
mod set;
mod sorted;
mod table;
pub mod tokens;
mod value;
mod wrappers;

pub use access::{Field, FieldDescriptor, Introspect, StaticField};
pub use calendar::{Calendar, TimeZone};
pub use capability::{Collection, Comparator, InvocationHandler, List, Map};
pub use comparators::{NaturalOrder, ReverseNaturalOrder, ReverseOrder};
pub use enums::{EnumConstant, EnumMap, EnumType, JumboEnumSet, RegularEnumSet};
pub use error::RuntimeError;
pub use immutable::{ImmutableList, ImmutableMap, ImmutableSet, ImmutableSortedMap, ImmutableSortedSet};
pub use list::{sub_list, ArrayList, FixedSizeList, LinkedList, RandomAccessSubList, SubList};
pub use map::{BoundedMap, HashMap, LinkedHashMap, TreeMap};
pub use multimap::{Multimap, MultimapKind};
pub use proxy::{Interface, Proxy};
pub use set::{HashSet, LinkedHashSet, TreeSet};
pub use table::{Table, TableKind};
pub use tokens::{Currency, Locale, UnicodeBlock};
pub use value::{compare_values, hash_value, AsAny, Identity, Obj, Object, Value};
pub use wrappers::{Synchronized, Unmodifiable, WrapperKind};
