// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

//! The newsbox markup dialect
//!
//! Each entry is encoded as a `<div class="newsbox">` block with a date
//! label, an `<h4>` title and the body:
//!
//! ```html
//! <div class="newsbox">
//!     <div class="date">2014-12-07</div>
//!     <h4>0.50.0 Released</h4>
//!     <p>The following changes are included in 0.50.0:</p>
//!     <ul>
//!         <li>Added support for 'g_' motion</li>
//!     </ul>
//! </div>
//! ```
//!
//! Decoding accepts this dialect only. It is not an HTML parser.

use std::{fmt, str::FromStr};

use derive_more::Display;
use tracing::debug;

use crate::{Block, Body, Error, Inline, Link, Malformed, NewsEntry};

mod decode;
mod encode;
mod lexer;

/// A decoding error
#[derive(Debug, Clone, PartialEq, Eq, Display, derive_more::Error)]
#[display("entry #{entry} at byte {offset}: {reason}")]
pub struct DecodeError {
    /// Index of the entry being decoded
    ///
    /// Errors detected before any entry could be located are
    /// attributed to the first entry.
    pub entry: usize,

    /// Byte offset in the input
    pub offset: usize,

    /// What went wrong
    pub reason: Malformed,
}

impl From<DecodeError> for Error {
    fn from(from: DecodeError) -> Self {
        let DecodeError { entry, reason, .. } = from;
        Self::MalformedEntry {
            index: entry,
            reason,
        }
    }
}

/// Entries decoded from a whole page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFeed {
    /// The entries in document order
    pub entries: Vec<NewsEntry>,

    /// The trailing link to older posts, if present
    pub older_posts: Option<Link>,
}

/// Decode a sequence of newsboxes, optionally followed by a link
/// to older posts.
///
/// Every decoded entry is valid. The order of entries is not checked.
///
/// # Errors
///
/// Returns a [`DecodeError`] for the first entry that cannot be decoded.
pub fn decode_feed(input: &str) -> Result<DecodedFeed, DecodeError> {
    let decoded = decode::Parser::new(input)?.decode_feed()?;
    debug!(
        entries = decoded.entries.len(),
        has_older_posts = decoded.older_posts.is_some(),
        "Decoded newsbox markup"
    );
    Ok(decoded)
}

/// Decode an inline fragment, e.g. a title.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the fragment contains block content or
/// is malformed.
pub fn decode_inlines(input: &str) -> Result<Vec<Inline>, DecodeError> {
    let inlines = decode::Parser::new(input)?.decode_inlines(None)?;
    Ok(crate::text::normalize_inlines(inlines))
}

/// Decode a block fragment, e.g. a body.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the fragment is malformed.
pub fn decode_body(input: &str) -> Result<Body, DecodeError> {
    decode::Parser::new(input)?.decode_blocks(None)
}

#[derive(Debug)]
struct EncodedInlines<'a>(&'a [Inline]);

impl fmt::Display for EncodedInlines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        encode::write_inlines(f, self.0)
    }
}

#[derive(Debug)]
struct EncodedBody<'a>(&'a [Block]);

impl fmt::Display for EncodedBody<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        encode::write_blocks(f, self.0, 0)
    }
}

/// Encode inline content.
#[must_use]
pub fn encode_inlines(inlines: &[Inline]) -> String {
    EncodedInlines(inlines).to_string()
}

/// Encode block content, one block per line.
#[must_use]
pub fn encode_body(body: &[Block]) -> String {
    EncodedBody(body).to_string()
}

/// Encode a link.
///
/// # Errors
///
/// Returns an [`fmt::Error`] if writing into the buffer fails.
pub fn encode_link_into<W: fmt::Write>(link: &Link, write: &mut W) -> fmt::Result {
    encode::write_link(write, link)
}

impl NewsEntry {
    /// Encode the entry as a newsbox.
    ///
    /// The entry is encoded as is. Decoding the result only succeeds
    /// for [valid](Self::is_valid) entries, and only yields the same
    /// entry if it is in [normal form](Self::normalize). Entries of a
    /// [`Store`](crate::Store) are both.
    ///
    /// # Errors
    ///
    /// Returns an [`fmt::Error`] if writing into the buffer fails.
    pub fn encode_into<W: fmt::Write>(&self, write: &mut W) -> fmt::Result {
        encode::write_entry(write, self)
    }

    /// Encode the entry as a newsbox.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a single newsbox.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input is not exactly one valid newsbox.
    pub fn decode_str(encoded: &str) -> Result<Self, DecodeError> {
        let mut parser = decode::Parser::new(encoded)?;
        parser.skip_whitespace();
        let entry = parser.decode_entry()?;
        parser.finish()?;
        Ok(entry)
    }
}

impl fmt::Display for NewsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.encode_into(f)
    }
}

impl FromStr for NewsEntry {
    type Err = DecodeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::decode_str(input)
    }
}

#[cfg(test)]
mod tests;
