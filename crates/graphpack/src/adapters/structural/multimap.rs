//! Multimaps and two-key tables.

use graphpack_runtime::{Multimap, MultimapKind, Obj, Table, TableKind, Value};

use crate::adapter::{downcast, downcast_obj, read_comparator, write_comparator, Adapter};
use crate::engine::{CopyContext, ReadContext, TypeKey, WriteContext};
use crate::variants::VariantTable;
use crate::Result;

/// `[var flavor]([key cmp][value cmp] if tree)[var size]([key][value])*`
///
/// Every pair is re-inserted with `put`, so duplicate keys accumulate
/// values instead of replacing them.
pub struct MultimapAdapter {
    flavors: VariantTable<MultimapKind, ()>,
}

impl MultimapAdapter {
    pub fn new() -> Self {
        Self {
            flavors: VariantTable::of_keys(
                "multimap",
                [
                    MultimapKind::ArrayList,
                    MultimapKind::Hash,
                    MultimapKind::LinkedHash,
                    MultimapKind::Tree,
                ],
            ),
        }
    }
}

impl Default for MultimapAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_like(kind: MultimapKind, key_cmp: Option<Obj>, value_cmp: Option<Obj>) -> Result<Multimap> {
    Ok(match kind {
        MultimapKind::ArrayList => Multimap::array_list(),
        MultimapKind::Hash => Multimap::hash(),
        MultimapKind::LinkedHash => Multimap::linked_hash(),
        MultimapKind::Tree => Multimap::tree(key_cmp, value_cmp)?,
    })
}

impl Adapter for MultimapAdapter {
    fn name(&self) -> &'static str {
        "multimap"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let multimap = downcast::<Multimap>(value)?;
        let flavor = self.flavors.discriminator(&multimap.kind())?;
        ctx.output().var_usize(flavor);
        if multimap.kind() == MultimapKind::Tree {
            write_comparator(ctx, multimap.key_comparator())?;
            write_comparator(ctx, multimap.value_comparator())?;
        }
        let entries = multimap.entries();
        ctx.output().var_usize(entries.len());
        for (key, value) in &entries {
            ctx.write_value(key)?;
            ctx.write_value(value)?;
        }
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let flavor = ctx.input().var_usize()?;
        let (&kind, _) = self.flavors.by_discriminator(flavor)?;
        let (key_cmp, value_cmp) = match kind {
            MultimapKind::Tree => (read_comparator(ctx)?, read_comparator(ctx)?),
            _ => (None, None),
        };
        let len = ctx.read_len(self.name())?;
        let obj = Obj::new(empty_like(kind, key_cmp, value_cmp)?);
        ctx.reference(&obj);
        let multimap = downcast_obj::<Multimap>(&obj)?;
        for _ in 0..len {
            let key = ctx.read_value()?;
            let value = ctx.read_value()?;
            multimap.put(key, value);
        }
        Ok(Value::Obj(obj))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let original = downcast_obj::<Multimap>(value)?;
        let copy = Obj::new(empty_like(
            original.kind(),
            original.key_comparator().cloned(),
            original.value_comparator().cloned(),
        )?);
        ctx.reference(&copy);
        let multimap = downcast_obj::<Multimap>(&copy)?;
        for (key, value) in original.entries() {
            multimap.put(ctx.copy(&key)?, ctx.copy(&value)?);
        }
        Ok(Value::Obj(copy))
    }
}

/// `[var flavor]([row cmp][col cmp] if tree)[var size]([row][column][value])*`
pub struct TableAdapter {
    flavors: VariantTable<TableKind, ()>,
}

impl TableAdapter {
    pub fn new() -> Self {
        Self {
            flavors: VariantTable::of_keys("table", [TableKind::Hash, TableKind::Tree]),
        }
    }
}

impl Default for TableAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_table(kind: TableKind, row_cmp: Option<Obj>, column_cmp: Option<Obj>) -> Result<Table> {
    Ok(match kind {
        TableKind::Hash => Table::hash(),
        TableKind::Tree => Table::tree(row_cmp, column_cmp)?,
    })
}

impl Adapter for TableAdapter {
    fn name(&self) -> &'static str {
        "table"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let table = downcast::<Table>(value)?;
        ctx.output().var_usize(self.flavors.discriminator(&table.kind())?);
        if table.kind() == TableKind::Tree {
            write_comparator(ctx, table.row_comparator())?;
            write_comparator(ctx, table.column_comparator())?;
        }
        let cells = table.cells();
        ctx.output().var_usize(cells.len());
        for (row, column, value) in &cells {
            ctx.write_value(row)?;
            ctx.write_value(column)?;
            ctx.write_value(value)?;
        }
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let flavor = ctx.input().var_usize()?;
        let (&kind, _) = self.flavors.by_discriminator(flavor)?;
        let (row_cmp, column_cmp) = match kind {
            TableKind::Tree => (read_comparator(ctx)?, read_comparator(ctx)?),
            TableKind::Hash => (None, None),
        };
        let len = ctx.read_len(self.name())?;
        let obj = Obj::new(empty_table(kind, row_cmp, column_cmp)?);
        ctx.reference(&obj);
        let table = downcast_obj::<Table>(&obj)?;
        for _ in 0..len {
            let row = ctx.read_value()?;
            let column = ctx.read_value()?;
            let value = ctx.read_value()?;
            table.put(row, column, value);
        }
        Ok(Value::Obj(obj))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let original = downcast_obj::<Table>(value)?;
        let copy = Obj::new(empty_table(
            original.kind(),
            original.row_comparator().cloned(),
            original.column_comparator().cloned(),
        )?);
        ctx.reference(&copy);
        let table = downcast_obj::<Table>(&copy)?;
        for (row, column, value) in original.cells() {
            table.put(ctx.copy(&row)?, ctx.copy(&column)?, ctx.copy(&value)?);
        }
        Ok(Value::Obj(copy))
    }
}
