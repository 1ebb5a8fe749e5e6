//! Logical-to-physical mapping model
//!
//! Two tables translate logical names into panel coordinates:
//!
//! - **Icons**: full icon name (`icon_play`, `red-icon_rec`) to one coordinate
//! - **Character positions**: for each logical position (0 = rightmost), a
//!   segment name (`a`, `g1`, `h`...) to one coordinate
//!
//! Logical names given to the editor have the form `category_identifier`.
//! A category of `d` followed by digits (`d1_a`) addresses a character
//! position segment; anything else (`icon_play`) is an icon.
//!
//! At most one name may reference a coordinate. [`MappingData::bind`]
//! enforces that by unbinding the coordinate everywhere first.

pub mod document;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::geometry::Coordinate;

pub use document::DocumentError;

/// Upper bound on character positions (keeps `d999_a` from allocating)
pub const MAX_POSITIONS: usize = 32;

/// Segment name to coordinate, for one character position
pub type SegmentMap = BTreeMap<String, Coordinate>;

/// Errors from parsing a logical name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MapNameError {
    /// No `_` between category and identifier
    MissingSeparator,
    /// Nothing before the `_`
    EmptyCategory,
    /// Nothing after the `_`
    EmptyIdentifier,
    /// Character position index beyond [`MAX_POSITIONS`]
    PositionOutOfRange,
}

/// A parsed logical name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalName<'a> {
    /// Icon, stored under its full name
    Icon {
        /// Full name as given (`icon_play`)
        name: &'a str,
        /// Part before the first `_` (`icon`)
        category: &'a str,
        /// Part after the first `_` (`play`)
        identifier: &'a str,
    },
    /// Segment of a character position
    Segment {
        /// Position index (0 = rightmost)
        position: usize,
        /// Segment name (`a`, `g1`...)
        segment: &'a str,
    },
}

impl<'a> LogicalName<'a> {
    /// Parse a `category_identifier` name
    pub fn parse(name: &'a str) -> Result<Self, MapNameError> {
        let (category, identifier) = name
            .split_once('_')
            .ok_or(MapNameError::MissingSeparator)?;
        if category.is_empty() {
            return Err(MapNameError::EmptyCategory);
        }
        if identifier.is_empty() {
            return Err(MapNameError::EmptyIdentifier);
        }

        match position_index(category) {
            Some(Some(position)) => Ok(LogicalName::Segment {
                position,
                segment: identifier,
            }),
            Some(None) => Err(MapNameError::PositionOutOfRange),
            None => Ok(LogicalName::Icon {
                name,
                category,
                identifier,
            }),
        }
    }
}

/// Position index of a `d<digits>` category
///
/// `None` if the category is not of that form, `Some(None)` if it is but
/// the index is out of range.
pub(crate) fn position_index(category: &str) -> Option<Option<usize>> {
    let digits = category.strip_prefix('d')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(
        digits
            .parse::<usize>()
            .ok()
            .filter(|&index| index < MAX_POSITIONS),
    )
}

/// In-memory mapping tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingData {
    icons: BTreeMap<String, Coordinate>,
    positions: Vec<SegmentMap>,
}

impl MappingData {
    /// Empty mapping with no positions
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mapping with `count` (empty) character positions
    pub fn with_positions(count: usize) -> Self {
        let mut data = Self::new();
        data.ensure_positions(count);
        data
    }

    /// Grow the position table to at least `count` entries
    pub fn ensure_positions(&mut self, count: usize) {
        let count = count.min(MAX_POSITIONS);
        while self.positions.len() < count {
            self.positions.push(SegmentMap::new());
        }
    }

    /// Number of character positions
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Segment map of a position
    pub fn position(&self, index: usize) -> Option<&SegmentMap> {
        self.positions.get(index)
    }

    /// All position maps, rightmost first
    pub fn positions(&self) -> &[SegmentMap] {
        &self.positions
    }

    /// Coordinate of an icon
    pub fn icon(&self, name: &str) -> Option<Coordinate> {
        self.icons.get(name).copied()
    }

    /// All icons by full name
    pub fn icons(&self) -> impl Iterator<Item = (&str, Coordinate)> {
        self.icons.iter().map(|(name, coord)| (name.as_str(), *coord))
    }

    /// Number of icons
    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }

    /// True if nothing is mapped
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty() && self.positions.iter().all(|p| p.is_empty())
    }

    /// Insert an icon without touching other bindings
    pub fn insert_icon(&mut self, name: &str, coord: Coordinate) {
        self.icons.insert(name.to_string(), coord);
    }

    /// Insert a segment without touching other bindings
    ///
    /// Grows the position table as needed; positions beyond
    /// [`MAX_POSITIONS`] are ignored.
    pub fn insert_segment(&mut self, position: usize, segment: &str, coord: Coordinate) {
        if position >= MAX_POSITIONS {
            return;
        }
        self.ensure_positions(position + 1);
        self.positions[position].insert(segment.to_string(), coord);
    }

    /// Name bound to a coordinate, if any
    ///
    /// Icons are searched first, then positions from the rightmost.
    pub fn name_at(&self, coord: Coordinate) -> Option<String> {
        if let Some((name, _)) = self.icons.iter().find(|(_, c)| **c == coord) {
            return Some(name.clone());
        }
        self.positions
            .iter()
            .enumerate()
            .find_map(|(index, segments)| {
                segments
                    .iter()
                    .find(|(_, c)| **c == coord)
                    .map(|(segment, _)| format!("d{}_{}", index, segment))
            })
    }

    /// Remove every binding to a coordinate
    ///
    /// Returns the number of bindings removed.
    pub fn unbind(&mut self, coord: Coordinate) -> usize {
        let before = self.binding_count();
        self.icons.retain(|_, c| *c != coord);
        for segments in &mut self.positions {
            segments.retain(|_, c| *c != coord);
        }
        before - self.binding_count()
    }

    /// Bind a logical name to a coordinate
    ///
    /// The name is validated first; on error nothing changes. Otherwise any
    /// existing binding of `coord` is removed from both tables before the
    /// new one is inserted.
    pub fn bind(&mut self, name: &str, coord: Coordinate) -> Result<(), MapNameError> {
        let parsed = LogicalName::parse(name)?;
        self.unbind(coord);
        match parsed {
            LogicalName::Icon { name, .. } => self.insert_icon(name, coord),
            LogicalName::Segment { position, segment } => {
                self.insert_segment(position, segment, coord)
            }
        }
        Ok(())
    }

    /// Total number of bindings in both tables
    pub fn binding_count(&self) -> usize {
        self.icons.len() + self.positions.iter().map(|p| p.len()).sum::<usize>()
    }
}
