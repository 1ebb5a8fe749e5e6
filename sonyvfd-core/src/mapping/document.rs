//! Persisted mapping document (JSON)
//!
//! Two on-disk shapes exist and both are accepted:
//!
//! ```text
//! Nested (canonical):                 Flat (earlier tool versions):
//! {                                   {
//!   "mappings": {                       "icons": { "icon_play": [2, 5] },
//!     "icon": { "play": [2, 5] },       "char_positions": [
//!     "d0":   { "a": [0, 1] }             { "a": [0, 1] }
//!   }                                   ]
//! }                                   }
//! ```
//!
//! Every leaf is a `[grid, bit]` pair. Loading normalises either shape into
//! [`MappingData`]; saving always writes the nested shape.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use super::{position_index, LogicalName, MappingData};
use crate::geometry::Coordinate;

/// Category used for flat-schema icon names that carry no category
const DEFAULT_ICON_CATEGORY: &str = "icon";

/// Errors from reading or writing a mapping document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DocumentError {
    /// Not valid JSON (or truncated)
    Syntax,
    /// Valid JSON but a value has the wrong shape (e.g. not a `[grid, bit]` pair)
    InvalidCoordinate,
    /// Serialisation failed
    Serialize,
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            Category::Data => DocumentError::InvalidCoordinate,
            _ => DocumentError::Syntax,
        }
    }
}

type NameTable = BTreeMap<String, Coordinate>;

/// Union of both schemas; absent sections default to empty
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    mappings: BTreeMap<String, NameTable>,
    #[serde(default)]
    icons: BTreeMap<String, Coordinate>,
    #[serde(default)]
    char_positions: Vec<NameTable>,
}

#[derive(Serialize)]
struct CanonicalDocument<'a> {
    mappings: BTreeMap<String, BTreeMap<&'a str, Coordinate>>,
}

impl MappingData {
    /// Parse a mapping document in either schema
    ///
    /// The position table is padded to at least `min_positions` entries.
    /// When both schemas appear in one document, the flat entries are
    /// applied after the nested ones.
    pub fn from_json(bytes: &[u8], min_positions: usize) -> Result<Self, DocumentError> {
        let raw: RawDocument = serde_json::from_slice(bytes)?;
        let mut data = MappingData::with_positions(min_positions);

        for (category, items) in &raw.mappings {
            match position_index(category) {
                Some(Some(position)) => {
                    for (segment, coord) in items {
                        data.insert_segment(position, segment, *coord);
                    }
                }
                // d<huge>: unreachable position, drop it
                Some(None) => {}
                None => {
                    for (identifier, coord) in items {
                        data.insert_icon(&format!("{}_{}", category, identifier), *coord);
                    }
                }
            }
        }

        for (name, coord) in &raw.icons {
            match LogicalName::parse(name) {
                Ok(LogicalName::Segment { position, segment }) => {
                    data.insert_segment(position, segment, *coord)
                }
                Ok(LogicalName::Icon { name, .. }) => data.insert_icon(name, *coord),
                Err(_) => {
                    data.insert_icon(&format!("{}_{}", DEFAULT_ICON_CATEGORY, name), *coord)
                }
            }
        }

        for (position, segments) in raw.char_positions.iter().enumerate() {
            for (segment, coord) in segments {
                data.insert_segment(position, segment, *coord);
            }
        }

        Ok(data)
    }

    /// Serialise to the nested document shape
    pub fn to_json(&self) -> Result<Vec<u8>, DocumentError> {
        serde_json::to_vec(&self.canonical()).map_err(|_| DocumentError::Serialize)
    }

    /// Serialise to the nested document shape as a string
    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string(&self.canonical()).map_err(|_| DocumentError::Serialize)
    }

    fn canonical(&self) -> CanonicalDocument<'_> {
        let mut mappings: BTreeMap<String, BTreeMap<&str, Coordinate>> = BTreeMap::new();

        for (name, coord) in self.icons() {
            // Stored icon names always contain '_' (bind and from_json guarantee it)
            let (category, identifier) = name
                .split_once('_')
                .unwrap_or((DEFAULT_ICON_CATEGORY, name));
            mappings
                .entry(String::from(category))
                .or_default()
                .insert(identifier, coord);
        }

        for (position, segments) in self.positions().iter().enumerate() {
            if segments.is_empty() {
                continue;
            }
            let entry = mappings.entry(format!("d{}", position)).or_default();
            for (segment, coord) in segments {
                entry.insert(segment.as_str(), *coord);
            }
        }

        CanonicalDocument { mappings }
    }
}
