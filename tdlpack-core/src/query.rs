//! Record lookup by date, identifier and lead time
//!
//! Each supplied criterion contributes candidate position lists: one for a
//! date, one for a lead time, and four for an identifier (one per slot, a
//! wildcard slot contributing every position). The lists are concatenated
//! and a position matches when it occurs exactly once per contributed list.

use crate::constants::ID_WILDCARD;
use crate::error::TdlpackError;
use crate::types::{FileIndex, Identifier, IndexEntry};
use hashbrown::HashMap;
use std::str::FromStr;

/// One identifier slot in a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdSlot {
    /// Matches any value
    Any,
    /// Matches exactly this value
    Exact(i32),
}

impl From<i32> for IdSlot {
    /// `-1` is the wildcard
    fn from(word: i32) -> Self {
        if word == ID_WILDCARD {
            IdSlot::Any
        } else {
            IdSlot::Exact(word)
        }
    }
}

/// A 4-part identifier pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdPattern(pub [IdSlot; 4]);

impl IdPattern {
    /// Pattern with every slot a wildcard
    pub const ANY: IdPattern = IdPattern([IdSlot::Any; 4]);

    /// Create a pattern from four slots
    pub const fn new(slots: [IdSlot; 4]) -> Self {
        Self(slots)
    }

    /// Get the slots
    pub fn slots(&self) -> &[IdSlot; 4] {
        &self.0
    }
}

impl From<[i32; 4]> for IdPattern {
    fn from(words: [i32; 4]) -> Self {
        Self(words.map(IdSlot::from))
    }
}

impl From<Identifier> for IdPattern {
    fn from(id: Identifier) -> Self {
        Self(id.words().map(IdSlot::Exact))
    }
}

impl FromStr for IdPattern {
    type Err = TdlpackError;

    /// Parse four whitespace-separated words, e.g. `"204320008 -1 1234006 0"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words = s
            .split_whitespace()
            .map(|w| w.parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| TdlpackError::InvalidIdentifier(format!("{:?}: {}", s, e)))?;

        let words: [i32; 4] = words.try_into().map_err(|w: Vec<i32>| {
            TdlpackError::InvalidIdentifier(format!("{:?}: expected 4 words, got {}", s, w.len()))
        })?;

        Ok(Self::from(words))
    }
}

/// Lookup criteria; unset criteria are ignored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Query {
    /// Reference date to match
    pub date: Option<i32>,

    /// Identifier pattern to match
    pub id: Option<IdPattern>,

    /// Lead time to match
    pub lead: Option<i32>,
}

impl Query {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Match a reference date
    pub fn date(mut self, date: i32) -> Self {
        self.date = Some(date);
        self
    }

    /// Match an identifier pattern
    pub fn id(mut self, id: impl Into<IdPattern>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Match a lead time
    pub fn lead(mut self, lead: i32) -> Self {
        self.lead = Some(lead);
        self
    }

    /// Check if no criterion is set
    pub fn is_empty(&self) -> bool {
        self.match_count() == 0
    }

    /// Number of candidate lists this query contributes
    pub fn match_count(&self) -> usize {
        let id_lists = if self.id.is_some() { 4 } else { 0 };
        usize::from(self.date.is_some()) + id_lists + usize::from(self.lead.is_some())
    }

    /// 1-based numbers of matching records, ascending
    ///
    /// An empty query matches nothing.
    pub fn matching_records(&self, index: &FileIndex) -> Vec<usize> {
        let match_count = self.match_count();
        if match_count == 0 {
            return Vec::new();
        }

        let entries = index.entries();
        let mut combined: Vec<usize> = Vec::new();

        if let Some(date) = self.date {
            combined.extend(positions(entries, move |e| e.date == Some(date)));
        }

        if let Some(pattern) = &self.id {
            for (slot, want) in pattern.slots().iter().enumerate() {
                match *want {
                    IdSlot::Any => combined.extend(0..entries.len()),
                    IdSlot::Exact(value) => combined.extend(positions(entries, move |e| {
                        e.id.and_then(|id| id.slot(slot)) == Some(value)
                    })),
                }
            }
        }

        if let Some(lead) = self.lead {
            combined.extend(positions(entries, move |e| e.lead == Some(lead)));
        }

        let mut counts: HashMap<usize, usize> = HashMap::new();
        for position in combined {
            *counts.entry(position).or_insert(0) += 1;
        }

        let mut matched: Vec<usize> = counts
            .into_iter()
            .filter(|&(_, count)| count == match_count)
            .map(|(position, _)| position + 1)
            .collect();
        matched.sort_unstable();
        matched
    }
}

/// Positions of the entries satisfying `pred`
fn positions<'a, F>(entries: &'a [IndexEntry], pred: F) -> impl Iterator<Item = usize> + 'a
where
    F: Fn(&IndexEntry) -> bool + 'a,
{
    entries
        .iter()
        .enumerate()
        .filter(move |(_, e)| pred(*e))
        .map(|(i, _)| i)
}
