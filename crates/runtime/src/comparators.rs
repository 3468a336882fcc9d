//! Stateless comparator objects.

use std::cmp::Ordering;

use crate::capability::Comparator;
use crate::value::{compare_values, same_type};
use crate::{Obj, Object, RuntimeError, Value};

/// Natural [`Value`] ordering.
#[derive(Debug)]
pub struct NaturalOrder;

static NATURAL_ORDER: NaturalOrder = NaturalOrder;

impl NaturalOrder {
    pub fn instance() -> Obj {
        Obj::canonical(&NATURAL_ORDER)
    }
}

impl Object for NaturalOrder {
    fn as_comparator(&self) -> Option<&dyn Comparator> {
        Some(self)
    }
}

impl Comparator for NaturalOrder {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        a.cmp(b)
    }
}

/// Reverse of the natural ordering.
#[derive(Debug)]
pub struct ReverseNaturalOrder;

static REVERSE_NATURAL_ORDER: ReverseNaturalOrder = ReverseNaturalOrder;

impl Object for ReverseNaturalOrder {
    fn as_comparator(&self) -> Option<&dyn Comparator> {
        Some(self)
    }
}

impl Comparator for ReverseNaturalOrder {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        b.cmp(a)
    }
}

/// Reverse of another comparator.
#[derive(Debug)]
pub struct ReverseOrder {
    inner: Obj,
}

impl ReverseOrder {
    /// The shared reverse-natural comparator.
    pub fn natural() -> Obj {
        Obj::canonical(&REVERSE_NATURAL_ORDER)
    }

    /// Reverses `inner`; `None` yields [`ReverseOrder::natural`].
    pub fn of(inner: Option<Obj>) -> Result<Obj, RuntimeError> {
        match inner {
            None => Ok(Self::natural()),
            Some(inner) if inner.get().as_comparator().is_none() => Err(
                RuntimeError::MissingCapability(inner.type_name(), "comparator"),
            ),
            Some(inner) => Ok(Obj::new(ReverseOrder { inner })),
        }
    }

    pub fn inner(&self) -> &Obj {
        &self.inner
    }
}

impl Object for ReverseOrder {
    fn equals(&self, other: &dyn Object) -> bool {
        same_type::<ReverseOrder>(other).is_some_and(|o| o.inner == self.inner)
    }

    fn hash_code(&self) -> u64 {
        !self.inner.get().hash_code()
    }

    fn as_comparator(&self) -> Option<&dyn Comparator> {
        Some(self)
    }
}

impl Comparator for ReverseOrder {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        compare_values(Some(&self.inner), b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_of_reverse_is_natural() {
        let twice = ReverseOrder::of(Some(ReverseOrder::natural())).unwrap();
        let cmp = twice.get().as_comparator().unwrap();
        assert_eq!(cmp.compare(&Value::from(1), &Value::from(2)), Ordering::Less);
    }

    #[test]
    fn singletons_keep_identity() {
        assert!(NaturalOrder::instance().ptr_eq(&NaturalOrder::instance()));
        assert!(ReverseOrder::of(None).unwrap().ptr_eq(&ReverseOrder::natural()));
    }
}
