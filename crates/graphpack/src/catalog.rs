//! Name tables over a type's published static constants.

use std::fmt;

use graphpack_runtime::{Introspect, Obj, Object};
use indexmap::IndexMap;

use crate::{GraphError, Result};

/// Maps constant names to the statics of `T` listed by
/// [`Introspect::static_fields`], and back by identity.
pub struct ConstantCatalog<T: 'static> {
    constants: IndexMap<&'static str, &'static T>,
}

impl<T: Introspect + Sync> ConstantCatalog<T> {
    /// Statics of other types are skipped; a repeated name is an error.
    pub fn build() -> Result<Self> {
        let mut constants = IndexMap::new();
        for field in T::static_fields() {
            let Some(value) = field.value::<T>() else {
                continue;
            };
            if constants.insert(field.name(), value).is_some() {
                return Err(GraphError::DuplicateConstant(field.name()));
            }
        }
        Ok(Self { constants })
    }

    pub fn name_of(&self, constant: &T) -> Option<&'static str> {
        self.constants
            .iter()
            .find(|(_, c)| std::ptr::eq(**c, constant))
            .map(|(name, _)| *name)
    }

    /// The canonical handle for `name`.
    pub fn get(&self, name: &str) -> Option<Obj> {
        self.constants
            .get(name)
            .map(|c| Obj::canonical(*c as &'static dyn Object))
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

impl<T: 'static> fmt::Debug for ConstantCatalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.constants.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphpack_runtime::tokens::{GREEK, KATAKANA};
    use graphpack_runtime::UnicodeBlock;

    #[test]
    fn names_round_trip_by_identity() {
        let catalog = ConstantCatalog::<UnicodeBlock>::build().unwrap();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.name_of(&GREEK), Some("GREEK"));
        assert!(catalog.get("KATAKANA").unwrap().ptr_eq(&Obj::canonical(&KATAKANA)));
        assert!(catalog.get("KLINGON").is_none());
    }
}
