// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

//! Loading whole feeds from markup or TOML

use anyhow::Context as _;
use serde::Deserialize;
use tracing::debug;

use crate::{
    Error, Malformed, NewsEntry, RenderOptions, Store, date, markup,
    render::{self, render_page},
};

/// A loaded store together with its presentation settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    /// The entries
    pub store: Store,

    /// How to render them
    pub options: RenderOptions,
}

impl Feed {
    /// Load a feed from a page of newsbox markup.
    ///
    /// A trailing older posts link in the markup overrides the
    /// link of the given `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEntry`] if an entry cannot be decoded
    /// or the entries violate an invariant. No entries are loaded then.
    ///
    /// Returns [`Error::InvalidOlderPostsLink`] if the markup has no
    /// older posts link and the link of `options` is invalid.
    pub fn from_markup_str(input: &str, mut options: RenderOptions) -> Result<Self, Error> {
        let markup::DecodedFeed {
            entries,
            older_posts,
        } = markup::decode_feed(input)?;
        if let Some(link) = older_posts {
            options.older_posts_href = link.href;
            options.older_posts_text = link.text;
        }
        options.validate()?;
        let store = Store::load(entries)?;
        Ok(Self { store, options })
    }

    /// Load a feed from a TOML document.
    ///
    /// ```toml
    /// [render]
    /// page_size = 10
    ///
    /// [[entry]]
    /// date = "2014-12-07"
    /// title = "0.50.0 Released"
    /// body = """
    /// <p>The following changes are included in 0.50.0:</p>
    /// <ul><li>Added support for 'g_' motion</li></ul>
    /// """
    /// ```
    ///
    /// The `title` and `body` of each entry are markup fragments.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a feed. Invalid entries
    /// and an invalid older posts link are reported as [`Error`] that can
    /// be retrieved by downcasting.
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let FeedFile { render, entries } =
            toml::from_str(input).context("parsing TOML feed document")?;
        debug!(count = entries.len(), "Parsed TOML feed document");
        render.validate()?;
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_entry(index))
            .collect::<Result<Vec<_>, _>>()?;
        let store = Store::load(entries)?;
        Ok(Self {
            store,
            options: render,
        })
    }

    /// Render the first page.
    #[must_use]
    pub fn render_first_page(&self) -> String {
        self.render_page(0)
    }

    /// Render the page starting at `offset`.
    #[must_use]
    pub fn render_page(&self, offset: usize) -> String {
        let page = self.options.page(&self.store, offset);
        render_page(&page, &self.options)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeedFile {
    #[serde(default)]
    render: render::RenderOptions,

    #[serde(default, rename = "entry")]
    entries: Vec<EntryRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryRecord {
    date: String,
    title: String,
    body: String,
}

impl EntryRecord {
    fn into_entry(self, index: usize) -> Result<NewsEntry, Error> {
        let Self { date, title, body } = self;
        let malformed = |reason| Error::MalformedEntry { index, reason };
        let Some(date) = date::parse(date.trim()) else {
            return Err(malformed(Malformed::InvalidDate(date)));
        };
        let title = markup::decode_inlines(&title).map_err(|err| malformed(err.reason))?;
        let body = markup::decode_body(&body).map_err(|err| malformed(err.reason))?;
        Ok(NewsEntry { date, title, body })
    }
}
