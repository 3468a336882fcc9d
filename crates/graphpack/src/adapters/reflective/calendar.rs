use std::cell::RefCell;

use graphpack_runtime::{Calendar, Obj, TimeZone, Value};

use crate::access::LazyField;
use crate::adapter::{downcast, downcast_obj, Adapter};
use crate::engine::{CopyContext, ReadContext, TypeKey, WriteContext};
use crate::{GraphError, Result};

static ZONE: LazyField<Calendar, RefCell<Obj>> = LazyField::new("zone");

/// `[zone id][var_i64 millis][bool lenient][u8 first day][u8 min days]`
///
/// The zone is read through a field handle: the public accessor hands out
/// a copy of it.
pub struct CalendarAdapter;

impl CalendarAdapter {
    fn zone_of(calendar: &Calendar) -> Result<Obj> {
        Ok(ZONE.get(calendar)?.borrow().clone())
    }

    fn configure(calendar: &Calendar, from: &Calendar) {
        calendar.set_time_millis(from.time_millis());
        calendar.set_lenient(from.is_lenient());
        calendar.set_first_day_of_week(from.first_day_of_week());
        calendar.set_minimal_days_in_first_week(from.minimal_days_in_first_week());
    }
}

impl Adapter for CalendarAdapter {
    fn name(&self) -> &'static str {
        "calendar"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let calendar = downcast::<Calendar>(value)?;
        let zone = Self::zone_of(calendar)?;
        let out = ctx.output();
        out.str(downcast_obj::<TimeZone>(&zone)?.id());
        out.var_i64(calendar.time_millis());
        out.bool(calendar.is_lenient());
        out.u8(calendar.first_day_of_week());
        out.u8(calendar.minimal_days_in_first_week());
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let input = ctx.input();
        let id = input.str()?;
        let zone = TimeZone::for_id(id).ok_or_else(|| {
            GraphError::invalid_record(self.name(), format!("unknown time zone `{id}`"))
        })?;
        let calendar = Calendar::new(zone)?;
        calendar.set_time_millis(input.var_i64()?);
        calendar.set_lenient(input.bool()?);
        calendar.set_first_day_of_week(input.u8()?);
        calendar.set_minimal_days_in_first_week(input.u8()?);
        Ok(Value::obj(calendar))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let original = downcast_obj::<Calendar>(value)?;
        let calendar = Calendar::new(Self::zone_of(original)?)?;
        Self::configure(&calendar, original);
        let copy = Obj::new(calendar);
        ctx.reference(&copy);
        Ok(Value::Obj(copy))
    }
}
