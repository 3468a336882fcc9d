//! Structural-rebuild adapters.
//!
//! Each record holds only what the public API needs to build an equal
//! instance: comparators first, then the elements in iteration order.
//! Decoding calls the same concrete variant's constructor or factory.

mod collections;
mod enums;
mod immutable;
mod multimap;

pub(crate) use collections::{copy_entries, fill_map};
pub use collections::{CollectionAdapter, MapAdapter, TreeMapAdapter, TreeSetAdapter};
pub use enums::{EnumMapAdapter, EnumSetAdapter};
pub use immutable::{
    ImmutableListAdapter, ImmutableMapAdapter, ImmutableSetAdapter, ImmutableSortedMapAdapter,
    ImmutableSortedSetAdapter,
};
pub use multimap::{MultimapAdapter, TableAdapter};

use std::sync::Arc;

use graphpack_runtime::{
    ArrayList, EnumMap, HashMap, HashSet, ImmutableList, ImmutableMap, ImmutableSet,
    ImmutableSortedMap, ImmutableSortedSet, JumboEnumSet, LinkedHashMap, LinkedHashSet,
    LinkedList, Multimap, RegularEnumSet, Table, TreeMap, TreeSet,
};

use crate::engine::{Registry, TypeKey};
use crate::Result;

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register::<ArrayList>(CollectionAdapter::array_list())?;
    registry.register::<LinkedList>(CollectionAdapter::linked_list())?;
    registry.register::<HashSet>(CollectionAdapter::hash_set())?;
    registry.register::<LinkedHashSet>(CollectionAdapter::linked_hash_set())?;
    registry.register::<TreeSet>(TreeSetAdapter)?;
    registry.register::<HashMap>(MapAdapter::hash_map())?;
    registry.register::<LinkedHashMap>(MapAdapter::linked_hash_map())?;
    registry.register::<TreeMap>(TreeMapAdapter)?;
    registry.register::<ImmutableList>(ImmutableListAdapter)?;
    registry.register::<ImmutableSet>(ImmutableSetAdapter)?;
    registry.register::<ImmutableSortedSet>(ImmutableSortedSetAdapter)?;
    registry.register::<ImmutableMap>(ImmutableMapAdapter)?;
    registry.register::<ImmutableSortedMap>(ImmutableSortedMapAdapter)?;
    registry.register::<Multimap>(MultimapAdapter::new())?;
    registry.register::<Table>(TableAdapter::new())?;
    registry.register_all(
        &[TypeKey::of::<RegularEnumSet>(), TypeKey::of::<JumboEnumSet>()],
        Arc::new(EnumSetAdapter::try_new()?),
    )?;
    registry.register::<EnumMap>(EnumMapAdapter)?;
    Ok(())
}
