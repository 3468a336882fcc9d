//! Two-key tables: `(row, column) -> value`.

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::map::check_comparator;
use crate::value::{compare_values, hash_ordered, settled};
use crate::{Obj, Object, RuntimeError, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Insertion-ordered rows and columns.
    Hash,
    /// Comparator-ordered rows and columns.
    Tree,
}

type Row = IndexMap<Value, Value>;

#[derive(Debug)]
pub struct Table {
    kind: TableKind,
    row_comparator: Option<Obj>,
    column_comparator: Option<Obj>,
    rows: RefCell<IndexMap<Value, Row>>,
}

/// Finds or inserts `key`; the flag is `true` when it was inserted.
fn sorted_slot<V: Default>(
    map: &mut IndexMap<Value, V>,
    comparator: Option<&Obj>,
    key: Value,
) -> (usize, bool) {
    match map.binary_search_by(|k, _| compare_values(comparator, k, &key)) {
        Ok(i) => (i, false),
        Err(i) => {
            map.shift_insert(i, key, V::default());
            (i, true)
        }
    }
}

impl Table {
    pub fn hash() -> Self {
        Self {
            kind: TableKind::Hash,
            row_comparator: None,
            column_comparator: None,
            rows: RefCell::default(),
        }
    }

    pub fn tree(
        row_comparator: Option<Obj>,
        column_comparator: Option<Obj>,
    ) -> Result<Self, RuntimeError> {
        check_comparator(&row_comparator)?;
        check_comparator(&column_comparator)?;
        Ok(Self {
            kind: TableKind::Tree,
            row_comparator,
            column_comparator,
            rows: RefCell::default(),
        })
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn row_comparator(&self) -> Option<&Obj> {
        self.row_comparator.as_ref()
    }

    pub fn column_comparator(&self) -> Option<&Obj> {
        self.column_comparator.as_ref()
    }

    pub fn put(&self, row: Value, column: Value, value: Value) -> Option<Value> {
        let mut rows = self.rows.borrow_mut();
        match self.kind {
            TableKind::Hash => rows.entry(row).or_default().insert(column, value),
            TableKind::Tree => {
                let (r, _) = sorted_slot(&mut *rows, self.row_comparator.as_ref(), row);
                let (_, cells) = rows.get_index_mut(r)?;
                let (c, inserted) = sorted_slot(cells, self.column_comparator.as_ref(), column);
                let (_, slot) = cells.get_index_mut(c)?;
                let previous = std::mem::replace(slot, value);
                (!inserted).then_some(previous)
            }
        }
    }

    pub fn get(&self, row: &Value, column: &Value) -> Option<Value> {
        let rows = settled(&self.rows)?;
        let cells = match self.kind {
            TableKind::Hash => rows.get(row)?,
            TableKind::Tree => {
                let cmp = self.row_comparator.as_ref();
                let i = rows.binary_search_by(|k, _| compare_values(cmp, k, row)).ok()?;
                rows.get_index(i)?.1
            }
        };
        match self.kind {
            TableKind::Hash => cells.get(column).cloned(),
            TableKind::Tree => {
                let cmp = self.column_comparator.as_ref();
                let i = cells.binary_search_by(|k, _| compare_values(cmp, k, column)).ok()?;
                cells.get_index(i).map(|(_, v)| v.clone())
            }
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        settled(&self.rows).map_or(0, |rows| rows.values().map(IndexMap::len).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row_keys(&self) -> Vec<Value> {
        settled(&self.rows)
            .map(|rows| rows.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Every `(row, column, value)` cell in row then column order.
    pub fn cells(&self) -> Vec<(Value, Value, Value)> {
        settled(&self.rows)
            .map(|rows| {
                rows.iter()
                    .flat_map(|(r, cells)| {
                        cells
                            .iter()
                            .map(move |(c, v)| (r.clone(), c.clone(), v.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Object for Table {
    fn equals(&self, other: &dyn Object) -> bool {
        other
            .as_any()
            .downcast_ref::<Table>()
            .is_some_and(|o| {
                let theirs = o.cells();
                self.len() == theirs.len()
                    && theirs
                        .iter()
                        .all(|(r, c, v)| self.get(r, c).as_ref() == Some(v))
            })
    }

    fn hash_code(&self) -> u64 {
        let mut cells = self.cells();
        cells.sort();
        let flat: Vec<Value> = cells
            .into_iter()
            .flat_map(|(r, c, v)| [r, c, v])
            .collect();
        hash_ordered(flat.iter())
    }
}
