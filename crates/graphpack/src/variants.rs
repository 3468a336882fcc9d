//! Fixed tables mapping concrete variants to wire discriminators.

use std::fmt;

use crate::{GraphError, Result};

/// Variants of one family in a fixed order; a variant's index is its
/// discriminator on the wire.
///
/// Each entry carries a payload, typically an accessor or factory for that
/// variant.
pub struct VariantTable<K, R> {
    family: &'static str,
    variants: Vec<(K, R)>,
}

impl<K: PartialEq + fmt::Debug, R> VariantTable<K, R> {
    pub fn build(family: &'static str, variants: impl IntoIterator<Item = (K, R)>) -> Self {
        Self {
            family,
            variants: variants.into_iter().collect(),
        }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn discriminator(&self, key: &K) -> Result<usize> {
        self.variants
            .iter()
            .position(|(k, _)| k == key)
            .ok_or_else(|| GraphError::UnknownVariant {
                family: self.family,
                variant: format!("{key:?}"),
            })
    }

    pub fn get(&self, key: &K) -> Result<&R> {
        let index = self.discriminator(key)?;
        Ok(&self.variants[index].1)
    }

    pub fn by_discriminator(&self, index: usize) -> Result<(&K, &R)> {
        self.variants
            .get(index)
            .map(|(k, r)| (k, r))
            .ok_or(GraphError::UnknownDiscriminator {
                family: self.family,
                index,
            })
    }
}

impl<K: PartialEq + fmt::Debug> VariantTable<K, ()> {
    /// A table whose variants carry no payload.
    pub fn of_keys(family: &'static str, keys: impl IntoIterator<Item = K>) -> Self {
        Self::build(family, keys.into_iter().map(|k| (k, ())))
    }
}

impl<K: fmt::Debug, R> fmt::Debug for VariantTable<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantTable")
            .field("family", &self.family)
            .field("variants", &self.variants.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}
