// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

//! Rendering pages of entries

use std::{fmt, num::NonZeroUsize};

use serde::Deserialize;

use crate::{Error, Link, Page, Store, markup};

/// Default target of the older posts link.
pub const DEFAULT_OLDER_POSTS_HREF: &str = "old_index.php";

/// Default text of the older posts link.
pub const DEFAULT_OLDER_POSTS_TEXT: &str = "Older Posts >>";

/// Presentation settings
///
/// Deserialized from the `[render]` table of a feed file. All fields
/// are optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Maximum number of entries per page
    ///
    /// All entries are rendered on a single page if unset.
    pub page_size: Option<NonZeroUsize>,

    /// Target of the link to older posts
    pub older_posts_href: String,

    /// Display text of the link to older posts
    pub older_posts_text: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: None,
            older_posts_href: DEFAULT_OLDER_POSTS_HREF.to_owned(),
            older_posts_text: DEFAULT_OLDER_POSTS_TEXT.to_owned(),
        }
    }
}

impl RenderOptions {
    /// The link to older posts.
    #[must_use]
    pub fn older_posts_link(&self) -> Link {
        Link {
            href: self.older_posts_href.clone(),
            text: self.older_posts_text.clone(),
        }
    }

    /// Check the link to older posts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOlderPostsLink`] if the target or the text
    /// of the link is empty, or if the target is not a URL reference.
    pub fn validate(&self) -> Result<(), Error> {
        self.older_posts_link()
            .validate()
            .map_err(|reason| Error::InvalidOlderPostsLink { reason })
    }

    /// Check if the options are valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Select the page starting at `offset` according to
    /// [`page_size`](Self::page_size).
    #[must_use]
    pub fn page<'a>(&self, store: &'a Store, offset: usize) -> Page<'a> {
        match self.page_size {
            Some(size) => store.page(offset, size),
            None if offset == 0 => store.single_page(),
            None => store.page(offset, NonZeroUsize::MAX),
        }
    }
}

/// Render the entries of a page, newest first, followed by the link
/// to older posts if more entries exist beyond the page.
///
/// # Errors
///
/// Returns an [`fmt::Error`] if writing into the buffer fails.
pub fn render_page_into<W: fmt::Write>(
    page: &Page<'_>,
    options: &RenderOptions,
    write: &mut W,
) -> fmt::Result {
    for entry in page.entries {
        entry.encode_into(write)?;
    }
    if page.has_older {
        markup::encode_link_into(&options.older_posts_link(), write)?;
        write.write_str("<br/>\n")?;
    }
    Ok(())
}

#[derive(Debug)]
struct RenderedPage<'a> {
    page: &'a Page<'a>,
    options: &'a RenderOptions,
}

impl fmt::Display for RenderedPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_page_into(self.page, self.options, f)
    }
}

/// Render the entries of a page.
///
/// See [`render_page_into()`].
#[must_use]
pub fn render_page(page: &Page<'_>, options: &RenderOptions) -> String {
    RenderedPage { page, options }.to_string()
}
