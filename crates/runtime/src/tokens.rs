//! Canonical token objects: currencies, locales and Unicode blocks.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use crate::access::{Introspect, StaticField};
use crate::{Obj, Object};

#[derive(Debug, PartialEq, Eq)]
pub struct Currency {
    code: &'static str,
    numeric: u16,
    fraction_digits: u8,
}

static CURRENCIES: [Currency; 8] = [
    Currency::new("USD", 840, 2),
    Currency::new("EUR", 978, 2),
    Currency::new("GBP", 826, 2),
    Currency::new("JPY", 392, 0),
    Currency::new("CHF", 756, 2),
    Currency::new("CNY", 156, 2),
    Currency::new("INR", 356, 2),
    Currency::new("KWD", 414, 3),
];

impl Currency {
    const fn new(code: &'static str, numeric: u16, fraction_digits: u8) -> Self {
        Self {
            code,
            numeric,
            fraction_digits,
        }
    }

    /// The canonical instance for an ISO 4217 code.
    pub fn get_instance(code: &str) -> Option<Obj> {
        CURRENCIES
            .iter()
            .find(|c| c.code == code)
            .map(|c| Obj::canonical(c))
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn numeric_code(&self) -> u16 {
        self.numeric
    }

    pub fn fraction_digits(&self) -> u8 {
        self.fraction_digits
    }
}

impl Object for Currency {}

/// Language, country and variant triple.
///
/// Locales are interned per thread: equal triples share one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

thread_local! {
    static LOCALES: RefCell<HashMap<Locale, Obj>> = RefCell::new(HashMap::new());
}

impl Locale {
    pub fn new(language: &str, country: &str, variant: &str) -> Obj {
        let key = Locale {
            language: language.to_ascii_lowercase(),
            country: country.to_ascii_uppercase(),
            variant: variant.to_string(),
        };
        LOCALES.with(|cache| {
            cache
                .borrow_mut()
                .entry(key.clone())
                .or_insert_with(|| Obj::new(key))
                .clone()
        })
    }

    /// Parses a `language[-COUNTRY[-variant]]` tag.
    pub fn for_tag(tag: &str) -> Obj {
        let mut parts = tag.splitn(3, ['-', '_']);
        let language = parts.next().unwrap_or_default();
        let country = parts.next().unwrap_or_default();
        let variant = parts.next().unwrap_or_default();
        Locale::new(language, country, variant)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

impl Object for Locale {
    fn equals(&self, other: &dyn Object) -> bool {
        other.as_any().downcast_ref::<Locale>() == Some(self)
    }

    fn hash_code(&self) -> u64 {
        crate::hash_value(&crate::Value::from(self.to_string()))
    }
}

/// A named range of Unicode code points.
///
/// Blocks are statics; the set of names is discoverable only through
/// [`Introspect::static_fields`].
#[derive(Debug, PartialEq, Eq)]
pub struct UnicodeBlock {
    start: u32,
    end: u32,
}

impl UnicodeBlock {
    const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// The block containing `ch`.
    pub fn of(ch: char) -> Option<Obj> {
        let cp = u32::from(ch);
        BLOCKS
            .iter()
            .filter_map(|f| f.value::<UnicodeBlock>())
            .find(|b| (b.start..=b.end).contains(&cp))
            .map(|b| Obj::canonical(b))
    }

    pub fn contains(&self, ch: char) -> bool {
        (self.start..=self.end).contains(&u32::from(ch))
    }
}

pub static BASIC_LATIN: UnicodeBlock = UnicodeBlock::new(0x0000, 0x007F);
pub static LATIN_1_SUPPLEMENT: UnicodeBlock = UnicodeBlock::new(0x0080, 0x00FF);
pub static GREEK: UnicodeBlock = UnicodeBlock::new(0x0370, 0x03FF);
pub static CYRILLIC: UnicodeBlock = UnicodeBlock::new(0x0400, 0x04FF);
pub static HEBREW: UnicodeBlock = UnicodeBlock::new(0x0590, 0x05FF);
pub static ARABIC: UnicodeBlock = UnicodeBlock::new(0x0600, 0x06FF);
pub static HIRAGANA: UnicodeBlock = UnicodeBlock::new(0x3040, 0x309F);
pub static KATAKANA: UnicodeBlock = UnicodeBlock::new(0x30A0, 0x30FF);
pub static CJK_UNIFIED_IDEOGRAPHS: UnicodeBlock = UnicodeBlock::new(0x4E00, 0x9FFF);

static BLOCKS: [StaticField; 9] = [
    StaticField::new("BASIC_LATIN", &BASIC_LATIN),
    StaticField::new("LATIN_1_SUPPLEMENT", &LATIN_1_SUPPLEMENT),
    StaticField::new("GREEK", &GREEK),
    StaticField::new("CYRILLIC", &CYRILLIC),
    StaticField::new("HEBREW", &HEBREW),
    StaticField::new("ARABIC", &ARABIC),
    StaticField::new("HIRAGANA", &HIRAGANA),
    StaticField::new("KATAKANA", &KATAKANA),
    StaticField::new("CJK_UNIFIED_IDEOGRAPHS", &CJK_UNIFIED_IDEOGRAPHS),
];

impl Object for UnicodeBlock {}

impl Introspect for UnicodeBlock {
    fn fields() -> &'static [crate::FieldDescriptor] {
        &[]
    }

    fn static_fields() -> &'static [StaticField] {
        &BLOCKS
    }
}
