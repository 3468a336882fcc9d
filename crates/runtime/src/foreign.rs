//! [`Object`] for value types from std and the ecosystem.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::time::SystemTime;

use encoding_rs::Encoding;
use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::value::same_type;
use crate::Object;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

macro_rules! value_object {
    ($($ty:ty),+) => {$(
        impl Object for $ty {
            fn equals(&self, other: &dyn Object) -> bool {
                same_type::<$ty>(other).is_some_and(|o| o == self)
            }

            fn hash_code(&self) -> u64 {
                hash_of(self)
            }

            fn compare(&self, other: &dyn Object) -> Option<Ordering> {
                same_type::<$ty>(other).map(|o| self.cmp(o))
            }
        }
    )+};
}

value_object!(Uuid, SystemTime, IpAddr, Url);

/// Encodings are statics, held through [`Obj::canonical`](crate::Obj::canonical)
/// and compared by identity.
impl Object for Encoding {}

/// Patterns compare by source text.
impl Object for Regex {
    fn equals(&self, other: &dyn Object) -> bool {
        same_type::<Regex>(other).is_some_and(|o| o.as_str() == self.as_str())
    }

    fn hash_code(&self) -> u64 {
        hash_of(&self.as_str())
    }
}
