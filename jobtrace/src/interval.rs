//! Occupancy of the time axis by possibly overlapping intervals
//!
//! Intervals are half-open: an interval added with start `s` and length `l`
//! covers `[s, s + l)`. Sweeping the map in time order yields a partition of
//! the covered time span into chunks, each tagged with the exact set of
//! intervals that are active throughout the chunk.

use crate::record::{Duration, Timestamp};
use log::trace;
use std::{
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
};
use thiserror::Error;

/// Handle to an interval from an [`IntervalMap`]
///
/// Unlike interval names, which are caller data and may repeat, handles are
/// unique within a given map.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ItemId(pub usize);
//
impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map of intervals over a linear time axis
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalMap<N> {
    /// Intervals, in order of insertion
    items: Vec<Item<N>>,

    /// Two boundaries per interval, in order of insertion
    boundaries: Vec<Boundary>,

    /// Handle of the first interval
    first_id: usize,
}
//
impl<N> IntervalMap<N> {
    /// Set up an empty map whose handles start at 0
    pub fn new() -> Self {
        Self::with_first_id(0)
    }

    /// Set up an empty map whose handles start at `first_id`
    pub fn with_first_id(first_id: usize) -> Self {
        Self {
            items: Vec::new(),
            boundaries: Vec::new(),
            first_id,
        }
    }

    /// Record an interval covering `[start, start + length)`
    ///
    /// `name` is caller data and may be shared by several intervals, the
    /// returned handle is what occupancy chunks refer to.
    pub fn add(
        &mut self,
        start: Timestamp,
        length: Duration,
        name: N,
        comment: Option<Box<str>>,
    ) -> Result<ItemId, IntervalError> {
        let end = start + length;
        if !(start.is_finite() && length.is_finite() && end.is_finite()) {
            return Err(IntervalError::NonFinite { start, length });
        }
        if length < 0.0 {
            return Err(IntervalError::NegativeLength(length));
        }

        let id = ItemId(self.first_id + self.items.len());
        self.items.push(Item {
            name,
            comment,
            start,
            end,
        });
        self.boundaries.push(Boundary {
            time: start,
            kind: BoundaryKind::Open,
            id,
        });
        self.boundaries.push(Boundary {
            time: end,
            kind: BoundaryKind::Close,
            id,
        });
        Ok(id)
    }

    /// Number of intervals in the map
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Truth that no interval was added yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Access an interval by handle
    ///
    /// Will return None if the handle does not come from this map.
    pub fn get(&self, id: ItemId) -> Option<IntervalItem<'_, N>> {
        let item = self.items.get(id.0.checked_sub(self.first_id)?)?;
        Some(IntervalItem { id, item })
    }

    /// Name of an interval
    ///
    /// # Panics
    ///
    /// If the handle does not come from this map.
    pub fn name(&self, id: ItemId) -> &N {
        &self.items[self.index(id)].name
    }

    /// Comment attached to an interval, if any
    ///
    /// # Panics
    ///
    /// If the handle does not come from this map.
    pub fn comment(&self, id: ItemId) -> Option<&str> {
        self.items[self.index(id)].comment.as_deref()
    }

    /// Iterate over intervals in order of insertion
    pub fn items(&self) -> impl Iterator<Item = IntervalItem<'_, N>> + Clone {
        self.items.iter().enumerate().map(|(idx, item)| IntervalItem {
            id: ItemId(self.first_id + idx),
            item,
        })
    }

    /// Partition the time span covered by the intervals into chunks where the
    /// set of active intervals stays constant, in time order
    ///
    /// Boundaries sharing a timestamp are applied together, opening intervals
    /// before closing them, so zero-length intervals never show up in any
    /// chunk and back-to-back intervals do not produce empty chunks.
    ///
    /// This does not modify the map and can be called as many times as needed.
    pub fn sweep(&self) -> Box<[Chunk]> {
        // Sort boundaries by time, stable sorting keeps insertion order
        let mut boundaries = self.boundaries.clone();
        boundaries.sort_by(|b1, b2| b1.time.total_cmp(&b2.time));

        // Walk boundaries by group of equal timestamps
        let mut chunks = Vec::with_capacity(boundaries.len().saturating_sub(1));
        let mut active = BTreeSet::new();
        let mut last_time = None;
        let mut remaining = &boundaries[..];
        while let Some(first) = remaining.first() {
            let time = first.time;
            let group_len = remaining.iter().take_while(|b| b.time == time).count();
            let (group, rest) = remaining.split_at(group_len);
            remaining = rest;

            // The chunk that ends here uses the active set before this group
            if let Some(start) = last_time {
                chunks.push(Chunk {
                    start,
                    end: time,
                    ids: active.iter().copied().collect(),
                });
            }

            for boundary in group {
                if boundary.kind == BoundaryKind::Open {
                    active.insert(boundary.id);
                }
            }
            for boundary in group {
                if boundary.kind == BoundaryKind::Close {
                    active.remove(&boundary.id);
                }
            }
            last_time = Some(time);
        }
        debug_assert!(active.is_empty(), "Some intervals were never closed");

        trace!(
            "Swept {} boundaries into {} chunks",
            boundaries.len(),
            chunks.len()
        );
        chunks.into_boxed_slice()
    }

    /// Index of an item in self.items
    fn index(&self, id: ItemId) -> usize {
        assert!(id.0 >= self.first_id, "{id} does not belong to this map");
        id.0 - self.first_id
    }
}
//
impl<N> Default for IntervalMap<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Interval as recorded by the map
#[derive(Clone, Debug, PartialEq)]
struct Item<N> {
    /// Caller-provided name
    name: N,

    /// Optional comment
    comment: Option<Box<str>>,

    /// Start of the interval
    start: Timestamp,

    /// End of the interval
    end: Timestamp,
}

/// View of an interval from an [`IntervalMap`]
#[derive(Debug, PartialEq)]
pub struct IntervalItem<'map, N> {
    /// Handle of this interval
    id: ItemId,

    /// Interval data
    item: &'map Item<N>,
}
//
impl<'map, N> IntervalItem<'map, N> {
    /// Handle of this interval
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Name that this interval was added with
    pub fn name(&self) -> &'map N {
        &self.item.name
    }

    /// Comment that this interval was added with, if any
    pub fn comment(&self) -> Option<&'map str> {
        self.item.comment.as_deref()
    }

    /// Start of the interval
    pub fn start(&self) -> Timestamp {
        self.item.start
    }

    /// End of the interval (excluded)
    pub fn end(&self) -> Timestamp {
        self.item.end
    }

    /// Length of the interval
    pub fn length(&self) -> Duration {
        self.item.end - self.item.start
    }
}
//
impl<N> Clone for IntervalItem<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}
//
impl<N> Copy for IntervalItem<'_, N> {}

/// Start or end of an interval
#[derive(Clone, Copy, Debug, PartialEq)]
struct Boundary {
    /// Where the boundary lies on the time axis
    time: Timestamp,

    /// Whether the interval starts or ends here
    kind: BoundaryKind,

    /// Interval which this boundary belongs to
    id: ItemId,
}

/// Nature of a [`Boundary`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum BoundaryKind {
    Open,
    Close,
}

/// Span of time during which the set of active intervals does not change
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    /// Start of the chunk
    start: Timestamp,

    /// End of the chunk (excluded)
    end: Timestamp,

    /// Intervals that are active during this chunk, in ascending handle order
    ids: Box<[ItemId]>,
}
//
impl Chunk {
    /// Start of the chunk
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// End of the chunk (excluded)
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Length of the chunk
    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// Intervals that are active during this chunk, in ascending handle order
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    /// Truth that a point in time falls within this chunk
    pub fn contains(&self, time: Timestamp) -> bool {
        self.start <= time && time < self.end
    }
}

/// What can go wrong while adding an interval to an [`IntervalMap`]
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum IntervalError {
    /// Interval length was negative
    #[error("interval length {0} is negative")]
    NegativeLength(Duration),

    /// Interval start, length or end was infinite or NaN
    #[error("interval bounds are not finite (start {start}, length {length})")]
    NonFinite {
        /// Requested start
        start: Timestamp,

        /// Requested length
        length: Duration,
    },
}
