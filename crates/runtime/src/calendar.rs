//! Time zones and a calendar instant.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};

use crate::access::{Field, FieldDescriptor, Introspect};
use crate::value::same_type;
use crate::{Obj, Object, RuntimeError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeZone {
    id: Cow<'static, str>,
    offset_minutes: i32,
}

impl TimeZone {
    const fn fixed(id: &'static str, offset_minutes: i32) -> Self {
        Self {
            id: Cow::Borrowed(id),
            offset_minutes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// Looks up a zone by id.
    ///
    /// Catalog zones come back canonical; custom `GMT+hh:mm` ids build a
    /// fresh zone. Unknown ids return `None`.
    pub fn for_id(id: &str) -> Option<Obj> {
        if let Some(zone) = ZONES.iter().find(|z| z.id == id) {
            return Some(Obj::canonical(zone));
        }
        parse_custom(id).map(Obj::new)
    }

    pub fn utc() -> Obj {
        Obj::canonical(&ZONES[0])
    }
}

static ZONES: [TimeZone; 9] = [
    TimeZone::fixed("UTC", 0),
    TimeZone::fixed("GMT", 0),
    TimeZone::fixed("Europe/London", 0),
    TimeZone::fixed("Europe/Paris", 60),
    TimeZone::fixed("Europe/Moscow", 180),
    TimeZone::fixed("Asia/Kolkata", 330),
    TimeZone::fixed("Asia/Tokyo", 540),
    TimeZone::fixed("America/New_York", -300),
    TimeZone::fixed("America/Los_Angeles", -480),
];

fn parse_custom(id: &str) -> Option<TimeZone> {
    let rest = id.strip_prefix("GMT")?;
    let (sign, rest) = match rest.as_bytes().first()? {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(TimeZone {
        id: Cow::Owned(id.to_string()),
        offset_minutes: sign * (hours * 60 + minutes),
    })
}

impl Object for TimeZone {
    fn equals(&self, other: &dyn Object) -> bool {
        same_type::<TimeZone>(other).is_some_and(|o| o == self)
    }

    fn hash_code(&self) -> u64 {
        crate::hash_value(&crate::Value::from(self.id()))
    }
}

/// An instant plus the zone and week rules used to interpret it.
///
/// [`Calendar::zone`] hands out a copy; the zone object the calendar holds
/// is not reachable through the public surface.
#[derive(Debug)]
pub struct Calendar {
    millis: Cell<i64>,
    zone: RefCell<Obj>,
    lenient: Cell<bool>,
    first_day_of_week: Cell<u8>,
    minimal_days_in_first_week: Cell<u8>,
}

impl Calendar {
    /// Fails unless `zone` is a [`TimeZone`].
    pub fn new(zone: Obj) -> Result<Self, RuntimeError> {
        if !zone.is::<TimeZone>() {
            return Err(RuntimeError::MissingCapability(zone.type_name(), "time zone"));
        }
        Ok(Self {
            millis: Cell::new(0),
            zone: RefCell::new(zone),
            lenient: Cell::new(true),
            first_day_of_week: Cell::new(1),
            minimal_days_in_first_week: Cell::new(1),
        })
    }

    pub fn time_millis(&self) -> i64 {
        self.millis.get()
    }

    pub fn set_time_millis(&self, millis: i64) {
        self.millis.set(millis);
    }

    pub fn zone(&self) -> Option<TimeZone> {
        self.zone.borrow().downcast_ref::<TimeZone>().cloned()
    }

    pub fn set_zone(&self, zone: Obj) -> Result<(), RuntimeError> {
        if !zone.is::<TimeZone>() {
            return Err(RuntimeError::MissingCapability(zone.type_name(), "time zone"));
        }
        *self.zone.borrow_mut() = zone;
        Ok(())
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient.get()
    }

    pub fn set_lenient(&self, lenient: bool) {
        self.lenient.set(lenient);
    }

    pub fn first_day_of_week(&self) -> u8 {
        self.first_day_of_week.get()
    }

    pub fn set_first_day_of_week(&self, day: u8) {
        self.first_day_of_week.set(day);
    }

    pub fn minimal_days_in_first_week(&self) -> u8 {
        self.minimal_days_in_first_week.get()
    }

    pub fn set_minimal_days_in_first_week(&self, days: u8) {
        self.minimal_days_in_first_week.set(days);
    }
}

static CALENDAR_ZONE: Field<Calendar, RefCell<Obj>> = Field::new("zone", |c| &c.zone);
static CALENDAR_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new("zone", &CALENDAR_ZONE)];

impl Introspect for Calendar {
    fn fields() -> &'static [FieldDescriptor] {
        &CALENDAR_FIELDS
    }
}

impl Object for Calendar {
    fn equals(&self, other: &dyn Object) -> bool {
        same_type::<Calendar>(other).is_some_and(|o| {
            self.millis == o.millis
                && self.lenient == o.lenient
                && self.first_day_of_week == o.first_day_of_week
                && self.minimal_days_in_first_week == o.minimal_days_in_first_week
                && *self.zone.borrow() == *o.zone.borrow()
        })
    }

    fn hash_code(&self) -> u64 {
        self.millis.get() as u64 ^ u64::from(self.first_day_of_week.get())
    }
}
