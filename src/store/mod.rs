// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

//! The ordered, read-only collection of entries

use std::num::NonZeroUsize;

use itertools::Itertools as _;
use time::Date;
use tracing::{debug, trace, warn};

use crate::{Error, Malformed, NewsEntry, date};

/// Entries ordered newest first
///
/// The store is validated once when loaded and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    entries: Vec<NewsEntry>,
}

impl Store {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Validate and load a batch of entries.
    ///
    /// The entries must already be ordered newest first. Entries with
    /// the same date may follow each other.
    ///
    /// Entries are [normalized](NewsEntry::normalize) before they are
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEntry`] for the first entry that violates
    /// an invariant. The whole batch is rejected.
    pub fn load(entries: Vec<NewsEntry>) -> Result<Self, Error> {
        let entries = entries
            .into_iter()
            .map(NewsEntry::normalize)
            .collect::<Vec<_>>();
        if let Err(err) = check_batch(&entries) {
            warn!(%err, count = entries.len(), "Rejecting batch of news entries");
            return Err(err);
        }
        debug!(
            count = entries.len(),
            newest = ?entries.first().map(|entry| entry.date),
            oldest = ?entries.last().map(|entry| entry.date),
            "Loaded news entries"
        );
        Ok(Self { entries })
    }

    /// All entries, newest first.
    #[must_use]
    pub fn all_entries(&self) -> &[NewsEntry] {
        &self.entries
    }

    /// Entries strictly older than the given date, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `date` is not a calendar
    /// date `YYYY-MM-DD`.
    pub fn entries_before(&self, date: &str) -> Result<&[NewsEntry], Error> {
        let Some(date) = date::parse(date) else {
            return Err(Error::InvalidArgument {
                input: date.to_owned(),
            });
        };
        Ok(self.entries_before_date(date))
    }

    /// Entries strictly older than `date`, newest first.
    #[must_use]
    pub fn entries_before_date(&self, date: Date) -> &[NewsEntry] {
        // Ordered newest first, i.e. all older entries form a suffix.
        let start = self.entries.partition_point(|entry| entry.date >= date);
        &self.entries[start..]
    }

    /// A bounded window of entries starting at `offset`.
    ///
    /// An `offset` beyond the last entry results in an empty page.
    #[must_use]
    pub fn page(&self, offset: usize, size: NonZeroUsize) -> Page<'_> {
        let start = offset.min(self.entries.len());
        let end = start.saturating_add(size.get()).min(self.entries.len());
        let page = Page {
            offset: start,
            entries: &self.entries[start..end],
            has_older: end < self.entries.len(),
        };
        trace!(
            offset = page.offset,
            len = page.entries.len(),
            has_older = page.has_older,
            "Paged news entries"
        );
        page
    }

    /// A page with all entries.
    #[must_use]
    pub fn single_page(&self) -> Page<'_> {
        Page {
            offset: 0,
            entries: &self.entries,
            has_older: false,
        }
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check for an empty store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_batch(entries: &[NewsEntry]) -> Result<(), Error> {
    for (index, entry) in entries.iter().enumerate() {
        entry
            .validate()
            .map_err(|reason| Error::MalformedEntry { index, reason })?;
    }
    let out_of_order = entries
        .iter()
        .tuple_windows()
        .position(|(previous, next)| previous.date < next.date);
    if let Some(position) = out_of_order {
        return Err(Error::MalformedEntry {
            index: position + 1,
            reason: Malformed::OutOfOrder {
                previous: entries[position].date,
            },
        });
    }
    Ok(())
}

/// A bounded window of consecutive entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a> {
    /// Position of the first entry in the store
    pub offset: usize,

    /// The entries, newest first
    pub entries: &'a [NewsEntry],

    /// Whether older entries follow this page
    pub has_older: bool,
}

impl Page<'_> {
    /// The offset of the next older page, if any.
    #[must_use]
    pub const fn next_offset(&self) -> Option<usize> {
        if self.has_older {
            Some(self.offset + self.entries.len())
        } else {
            None
        }
    }
}
