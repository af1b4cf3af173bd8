// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

//! A typed, newest-first store of dated news entries.
//!
//! Entries are authored out-of-band, validated once when loaded and
//! immutable afterwards. They are rendered to and decoded from the
//! `newsbox` markup dialect of a project's news page.
//!
//! Refer to [`docs`] for more information about the markup and the
//! feed file format.

pub mod date;
pub mod docs;
pub mod feed;
pub mod markup;
pub mod render;
pub mod store;
pub mod text;

use derive_more::Display;
use itertools::Itertools as _;
use time::Date;

pub use self::{
    feed::Feed,
    render::RenderOptions,
    store::{Page, Store},
    text::{Block, Body, Inline, Link},
};

/// A dated announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsEntry {
    /// The publication date
    pub date: Date,

    /// The title
    ///
    /// A [`Inline::LineBreak`] splits the title into multiple lines.
    pub title: Vec<Inline>,

    /// The content
    pub body: Body,
}

impl NewsEntry {
    /// Check the entry for a visible title, a non-empty body and
    /// well-formed rich text.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), Malformed> {
        if !text::has_visible_text(&self.title) {
            return Err(Malformed::EmptyTitle);
        }
        text::validate_inlines(&self.title)?;
        text::validate_body(&self.body)
    }

    /// Check if the entry is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Bring title and body into normal form.
    ///
    /// Whitespace is collapsed and trimmed the same way as when decoding
    /// markup, so that encoding a normalized entry and decoding it again
    /// yields the same entry.
    #[must_use]
    pub fn normalize(self) -> Self {
        let Self { date, title, body } = self;
        Self {
            date,
            title: text::normalize_inlines(title),
            body: text::normalize_body(body),
        }
    }

    /// The lines of the title.
    pub fn title_lines(&self) -> impl Iterator<Item = &[Inline]> + '_ {
        self.title
            .split(|inline| matches!(inline, Inline::LineBreak))
            .filter(|line| !line.is_empty())
    }

    /// The title as a single line of plain text.
    #[must_use]
    pub fn title_text(&self) -> String {
        self.title_lines().map(text::plain_text).join(" ")
    }
}

/// Reasons for rejecting an entry
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Malformed {
    /// The date is not a calendar date `YYYY-MM-DD`.
    #[display("invalid date {_0:?}")]
    InvalidDate(String),

    /// The title has no visible text.
    #[display("empty title")]
    EmptyTitle,

    /// The body has no blocks.
    #[display("empty body")]
    EmptyBody,

    /// A paragraph has no visible text.
    #[display("empty paragraph")]
    EmptyParagraph,

    /// A list has no items.
    #[display("list without items")]
    EmptyList,

    /// A list item has no content.
    #[display("empty list item")]
    EmptyListItem,

    /// A nested list is not contained in an item of its parent list.
    #[display("nested list outside of a list item")]
    DanglingList,

    /// A link has no target.
    #[display("link without href")]
    EmptyHref,

    /// A link has no display text.
    #[display("link without text")]
    EmptyLinkText,

    /// A link target is not a URL reference.
    #[display("invalid href {_0:?}")]
    InvalidHref(String),

    /// The entry is newer than its predecessor.
    #[display("not ordered newest first, preceded by an entry dated {previous}")]
    OutOfOrder {
        /// The date of the preceding entry
        previous: Date,
    },

    /// The markup could not be decoded.
    #[display("{_0}")]
    Syntax(String),
}

/// Errors of loading and querying news entries
#[derive(Debug, Clone, PartialEq, Eq, Display, derive_more::Error)]
pub enum Error {
    /// A query argument is not well-formed.
    #[display("invalid argument {input:?}, expected a calendar date YYYY-MM-DD")]
    InvalidArgument {
        /// The rejected input
        input: String,
    },

    /// An entry violates the invariants and the whole batch was rejected.
    #[display("malformed entry #{index}: {reason}")]
    MalformedEntry {
        /// Position of the entry in the batch
        index: usize,

        /// What is wrong with it
        reason: Malformed,
    },

    /// The configured link to older posts is not a valid link.
    #[display("invalid older posts link: {reason}")]
    InvalidOlderPostsLink {
        /// What is wrong with it
        reason: Malformed,
    },
}
