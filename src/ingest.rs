//! Reading share sets from JSON documents.
//!
//! The accepted layout carries the share count and threshold under `keys`
//! and one object per share, keyed by its index:
//!
//! ```json
//! {
//!     "keys": { "n": 4, "k": 3 },
//!     "1": { "base": "10", "value": "4" },
//!     "2": { "base": "2", "value": "111" },
//!     "3": { "base": "10", "value": "12" },
//!     "6": { "base": "4", "value": "213" }
//! }
//! ```
//!
//! Digit strings are not decoded here; malformed values surface from the
//! engine as [`ReconstructionError::InvalidDigit`](crate::ReconstructionError::InvalidDigit).

use std::collections::HashSet;
use std::fmt;
use std::io::Read;

use crate::share::{Share, ShareSet};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed share document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("share key {key:?} is not a positive integer index")]
    InvalidIndex { key: String },

    #[error("share {index} appears more than once")]
    DuplicateIndex { index: u32 },

    #[error("share {index} has non-numeric base {base:?}")]
    InvalidBase { index: u32, base: String },

    #[error("document declares {declared} shares but contains {found}")]
    ShareCountMismatch { declared: usize, found: usize },

    #[error("threshold {threshold} is not within 1..={available}")]
    InvalidThreshold { threshold: usize, available: usize },
}

#[derive(Debug)]
struct Document {
    keys: Keys,
    /// Share entries in document order, repeated keys included.
    shares: Vec<(String, RawShare)>,
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = Document;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a share document with a `keys` object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
                let mut keys = None;
                let mut shares = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key == "keys" {
                        if keys.is_some() {
                            return Err(de::Error::duplicate_field("keys"));
                        }
                        keys = Some(map.next_value()?);
                    } else {
                        let raw = map.next_value::<RawShare>()?;
                        shares.push((key, raw));
                    }
                }
                let keys = keys.ok_or_else(|| de::Error::missing_field("keys"))?;
                Ok(Document { keys, shares })
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

#[derive(Debug, Deserialize)]
struct Keys {
    n: usize,
    k: usize,
}

#[derive(Debug, Deserialize)]
struct RawShare {
    base: Base,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Base {
    Number(u32),
    Text(String),
}

impl ShareSet {
    /// Parse a share document; shares come back ordered by ascending index.
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        build(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, IngestError> {
        build(serde_json::from_reader(reader)?)
    }
}

fn build(doc: Document) -> Result<ShareSet, IngestError> {
    let Keys { n, k } = doc.keys;
    let found = doc.shares.len();

    let mut seen = HashSet::with_capacity(found);
    let mut shares = Vec::with_capacity(found);
    for (key, raw) in doc.shares {
        let parsed = key.trim().parse::<u32>();
        let index = match parsed {
            Ok(i) if i > 0 => i,
            _ => return Err(IngestError::InvalidIndex { key }),
        };
        // catches a repeated literal key as well as aliases like "01"
        if !seen.insert(index) {
            return Err(IngestError::DuplicateIndex { index });
        }
        let radix = match raw.base {
            Base::Number(b) => b,
            Base::Text(text) => match text.trim().parse::<u32>() {
                Ok(b) => b,
                Err(_) => return Err(IngestError::InvalidBase { index, base: text }),
            },
        };
        shares.push(Share::new(index, radix, raw.value));
    }

    if found != n {
        return Err(IngestError::ShareCountMismatch { declared: n, found });
    }
    if k == 0 || k > n {
        return Err(IngestError::InvalidThreshold {
            threshold: k,
            available: n,
        });
    }
    // entries arrive in document order
    shares.sort_by_key(|s| s.index);
    Ok(ShareSet::new(k, shares))
}
