//! Domain types for the published name list.
//!
//! The wire format is a compact JSON array. Field order on [`Entry`] and the
//! order of [`Language::ALL`] are part of that format: serializing a parsed
//! file must reproduce it byte for byte, otherwise an unchanged dataset
//! would look like a difference.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A supported language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    De,
    Es,
    Fr,
    It,
    JaHrkt,
    ZhHans,
}

impl Language {
    /// Every language in published order.
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::De,
        Language::Es,
        Language::Fr,
        Language::It,
        Language::JaHrkt,
        Language::ZhHans,
    ];

    /// Key used in the published JSON (`ja-hrkt`).
    pub fn wire_key(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::It => "it",
            Language::JaHrkt => "ja-hrkt",
            Language::ZhHans => "zh-hans",
        }
    }

    /// Column name in the database table (`ja_hrkt`).
    pub fn column(self) -> &'static str {
        match self {
            Language::JaHrkt => "ja_hrkt",
            Language::ZhHans => "zh_hans",
            other => other.wire_key(),
        }
    }

    /// Inverse of [`Language::wire_key`].
    pub fn from_wire_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.wire_key() == key)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// One localized name, serialized as a single-key object: `{"en":"Bulbasaur"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedName {
    pub language: Language,
    pub name: Option<String>,
}

impl LocalizedName {
    pub fn new(language: Language, name: Option<impl Into<String>>) -> Self {
        Self {
            language,
            name: name.map(Into::into),
        }
    }
}

impl Serialize for LocalizedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.language.wire_key(), &self.name)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for LocalizedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SingleKey;

        impl<'de> Visitor<'de> for SingleKey {
            type Value = LocalizedName;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object with exactly one language key")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let Some(key) = map.next_key::<String>()? else {
                    return Err(de::Error::custom("empty name object"));
                };
                let language = Language::from_wire_key(&key)
                    .ok_or_else(|| de::Error::custom(format!("unknown language '{key}'")))?;
                let name = map.next_value::<Option<String>>()?;
                if map.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom(format!(
                        "name object for '{key}' has more than one key"
                    )));
                }
                Ok(LocalizedName { language, name })
            }
        }

        deserializer.deserialize_map(SingleKey)
    }
}

/// The ordered name list of an entry.
///
/// Equality is order sensitive: the same names in a different order are a
/// different value, exactly as their serialized text differs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Names(pub Vec<LocalizedName>);

impl Names {
    /// Build names in [`Language::ALL`] order from a per-language lookup.
    pub fn from_fn<F>(mut lookup: F) -> Self
    where
        F: FnMut(Language) -> Option<String>,
    {
        Self(
            Language::ALL
                .into_iter()
                .map(|lang| LocalizedName {
                    language: lang,
                    name: lookup(lang),
                })
                .collect(),
        )
    }

    pub fn get(&self, language: Language) -> Option<&str> {
        self.0
            .iter()
            .find(|n| n.language == language)
            .and_then(|n| n.name.as_deref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact JSON text, the form used in difference records.
    pub fn to_json(&self) -> String {
        // A Vec of string-keyed maps with string values cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// National dex number.
pub type DexNumber = i64;

/// One species as published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: DexNumber,
    #[serde(default)]
    pub generation: Option<i64>,
    pub names: Names,
}

/// One element of a published file.
///
/// A file written by another tool may hold elements that do not decode as an
/// [`Entry`], for example `{}` where a name was undefined. Such an element
/// keeps its place and its raw names text so that only its own position is
/// reported as different.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishedEntry {
    Valid(Entry),
    Malformed {
        /// The element's `id` when it is an integer.
        id: Option<DexNumber>,
        /// Compact JSON of the element's `names` field, if it has one.
        names: Option<String>,
    },
}

impl PublishedEntry {
    /// Decode one array element, falling back to [`PublishedEntry::Malformed`].
    pub fn from_value(value: &serde_json::Value) -> Self {
        match Entry::deserialize(value) {
            Ok(entry) => PublishedEntry::Valid(entry),
            Err(_) => PublishedEntry::Malformed {
                id: value.get("id").and_then(serde_json::Value::as_i64),
                names: value.get("names").map(serde_json::Value::to_string),
            },
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, PublishedEntry::Malformed { .. })
    }
}

impl From<Entry> for PublishedEntry {
    fn from(entry: Entry) -> Self {
        PublishedEntry::Valid(entry)
    }
}

/// What the reconciler needs from either side of a comparison.
pub trait DexSlot {
    /// Dex number, `None` when unreadable.
    fn dex_id(&self) -> Option<DexNumber>;

    /// Names as compact JSON, `None` when the element has no names field.
    fn names_json(&self) -> Option<String>;
}

impl DexSlot for Entry {
    fn dex_id(&self) -> Option<DexNumber> {
        Some(self.id)
    }

    fn names_json(&self) -> Option<String> {
        Some(self.names.to_json())
    }
}

impl DexSlot for PublishedEntry {
    fn dex_id(&self) -> Option<DexNumber> {
        match self {
            PublishedEntry::Valid(entry) => Some(entry.id),
            PublishedEntry::Malformed { id, .. } => *id,
        }
    }

    fn names_json(&self) -> Option<String> {
        match self {
            PublishedEntry::Valid(entry) => entry.names_json(),
            PublishedEntry::Malformed { names, .. } => names.clone(),
        }
    }
}

/// Stable ascending sort by dex number. Entries sharing an id keep their
/// relative order; elements without a readable id go last.
pub fn sort_by_dex<T: DexSlot>(entries: &mut [T]) {
    entries.sort_by_key(|entry| entry.dex_id().unwrap_or(DexNumber::MAX));
}

// ---------------------------------------------------------------------------
// Database row
// ---------------------------------------------------------------------------

/// One row of the names table as the database returns it.
///
/// Unknown columns (record ids, timestamps) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DexRecord {
    pub national_dex: DexNumber,
    #[serde(default)]
    pub generation: Option<i64>,
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub de: Option<String>,
    #[serde(default)]
    pub es: Option<String>,
    #[serde(default)]
    pub fr: Option<String>,
    #[serde(default)]
    pub it: Option<String>,
    #[serde(default)]
    pub ja_hrkt: Option<String>,
    #[serde(default)]
    pub zh_hans: Option<String>,
}

impl DexRecord {
    /// Value of the column backing `language`.
    pub fn column(&self, language: Language) -> Option<&str> {
        let value = match language {
            Language::En => &self.en,
            Language::De => &self.de,
            Language::Es => &self.es,
            Language::Fr => &self.fr,
            Language::It => &self.it,
            Language::JaHrkt => &self.ja_hrkt,
            Language::ZhHans => &self.zh_hans,
        };
        value.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
