//! Reflective-access adapters.
//!
//! These types keep state their public API does not expose: a map's
//! capacity, a wrapper's delegate, a view's parent and bounds. Each
//! adapter resolves typed [`FieldHandle`](crate::FieldHandle)s for that
//! state when it is built, so a layout change fails registration instead
//! of producing a lossy record.

mod bounded_map;
mod calendar;
mod lists;
mod wrappers;

pub use bounded_map::BoundedMapAdapter;
pub use calendar::CalendarAdapter;
pub use lists::{FixedSizeListAdapter, SubListAdapter};
pub use wrappers::{SynchronizedAdapter, UnmodifiableAdapter, Wrapper, WrapperAdapter};

use std::sync::Arc;

use graphpack_runtime::{
    BoundedMap, Calendar, FixedSizeList, RandomAccessSubList, SubList, Synchronized, Unmodifiable,
};

use crate::engine::{Registry, TypeKey};
use crate::Result;

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register::<BoundedMap>(BoundedMapAdapter::try_new()?)?;
    registry.register::<Calendar>(CalendarAdapter)?;
    registry.register::<Synchronized>(SynchronizedAdapter::try_new()?)?;
    registry.register::<Unmodifiable>(UnmodifiableAdapter::try_new()?)?;
    registry.register_all(
        &[TypeKey::of::<SubList>(), TypeKey::of::<RandomAccessSubList>()],
        Arc::new(SubListAdapter::try_new()?),
    )?;
    registry.register::<FixedSizeList>(FixedSizeListAdapter::try_new()?)?;
    Ok(())
}
