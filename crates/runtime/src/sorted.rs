use crate::value::compare_values;
use crate::{Obj, Value};

/// Binary search over a comparator-ordered slice.
pub(crate) fn search<E>(
    items: &[E],
    comparator: Option<&Obj>,
    key: &Value,
    key_of: impl Fn(&E) -> &Value,
) -> Result<usize, usize> {
    items.binary_search_by(|item| compare_values(comparator, key_of(item), key))
}

/// Sorts and drops comparator-equal duplicates, keeping the last one seen.
pub(crate) fn sort_dedup_last<E>(
    items: &mut Vec<E>,
    comparator: Option<&Obj>,
    key_of: impl Fn(&E) -> &Value,
) {
    let mut out: Vec<E> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        match search(&out[..], comparator, key_of(&item), &key_of) {
            Ok(i) => out[i] = item,
            Err(i) => out.insert(i, item),
        }
    }
    *items = out;
}
