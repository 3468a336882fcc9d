//! Pluggable serialization adapters for object graphs.
//!
//! An [`Engine`] walks a graph of [`Value`]s and hands every object to the
//! [`Adapter`] registered for its concrete type. Adapters write a compact,
//! self-delimiting record, read it back and deep-copy the object; the
//! engine supplies the value tags, class ids and back-references that keep
//! shared and cyclic objects intact.
//!
//! ```
//! use graphpack::Engine;
//! use graphpack_runtime::{sub_list, ArrayList, Obj, Value};
//!
//! let engine = Engine::with_defaults().unwrap();
//! let list = Obj::new((1..=4).map(Value::from).collect::<ArrayList>());
//! let view = sub_list(&list, 1, 3).unwrap();
//! let pair: ArrayList = vec![Value::Obj(list), Value::Obj(view)].into_iter().collect();
//!
//! let bytes = engine.encode(&Value::obj(pair)).unwrap();
//! let decoded = engine.decode(&bytes).unwrap();
//! let items = decoded.as_obj().unwrap().get().as_collection().unwrap().to_vec();
//!
//! // The decoded view still writes through to the decoded list.
//! let view = items[1].as_obj().unwrap().get().as_list().unwrap();
//! view.set(0, Value::from(20)).unwrap();
//! let list = items[0].as_obj().unwrap().get().as_list().unwrap();
//! assert_eq!(list.get(1), Some(Value::from(20)));
//! ```

mod access;
mod adapter;
mod catalog;
mod config;
mod constants;
mod engine;
mod error;
mod variants;

pub mod adapters;

pub use access::{FieldHandle, LazyField};
pub use adapter::{
    collection_of, comparator_of, downcast, downcast_obj, expect_obj, list_of, map_of,
    read_comparator, read_entries, read_values, write_comparator, write_entries, write_values,
    Adapter,
};
pub use catalog::ConstantCatalog;
pub use config::EngineConfig;
pub use constants::{Tag, DEFAULT_MAX_DEPTH};
pub use engine::{
    CopyContext, Engine, Placeholder, ReadContext, Registration, Registry, TypeKey, WriteContext,
};
pub use error::{GraphError, Result};
pub use variants::VariantTable;

pub use graphpack_runtime::{Obj, Value};
