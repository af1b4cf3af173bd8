// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

//! Rich text of titles and bodies
//!
//! Titles are sequences of [`Inline`] elements. Bodies are sequences of
//! [`Block`] elements. A list item is a [`Body`] of its own, so a nested
//! list can only ever live inside exactly one item of its parent list.

use std::sync::LazyLock;

use url::Url;

use crate::Malformed;

/// An inline hyperlink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    /// The link target
    pub href: String,

    /// The display text
    pub text: String,
}

impl Link {
    /// Check the link for a non-empty, parseable target and non-empty text.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), Malformed> {
        if self.href.trim().is_empty() {
            return Err(Malformed::EmptyHref);
        }
        if self.text.trim().is_empty() {
            return Err(Malformed::EmptyLinkText);
        }
        if !is_valid_href(&self.href) {
            return Err(Malformed::InvalidHref(self.href.clone()));
        }
        Ok(())
    }

    /// Check if the link is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

static DUMMY_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    // Relative targets like `old_index.php` or `#anchor` need a base
    // to be resolved against.
    "dummy:///".parse().expect("valid base URL")
});

/// Check if `href` parses as an absolute or relative URL reference.
#[must_use]
pub fn is_valid_href(href: &str) -> bool {
    let parse_options = Url::options().base_url(Some(&DUMMY_BASE_URL));
    parse_options.parse(href).is_ok()
}

/// Inline rich text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text
    Text(String),

    /// Emphasized content
    Emphasis(Vec<Inline>),

    /// A hyperlink
    Link(Link),

    /// A forced line break
    LineBreak,
}

impl Inline {
    /// Create a text element.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a link element.
    #[must_use]
    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Link(Link {
            href: href.into(),
            text: text.into(),
        })
    }

    /// Create an emphasis element.
    #[must_use]
    pub const fn emphasis(content: Vec<Self>) -> Self {
        Self::Emphasis(content)
    }
}

/// A sequence of blocks
pub type Body = Vec<Block>;

/// Block-level rich text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A paragraph of inline content
    Paragraph(Vec<Inline>),

    /// An ordered or unordered list
    ///
    /// Each item is a body of its own and may contain further lists.
    List {
        /// Numbered or bulleted
        ordered: bool,

        /// The items
        items: Vec<Body>,
    },
}

impl Block {
    /// Create a paragraph.
    #[must_use]
    pub const fn paragraph(content: Vec<Inline>) -> Self {
        Self::Paragraph(content)
    }

    /// Create an unordered list.
    #[must_use]
    pub const fn bullets(items: Vec<Body>) -> Self {
        Self::List {
            ordered: false,
            items,
        }
    }

    /// Create an ordered list.
    #[must_use]
    pub const fn numbered(items: Vec<Body>) -> Self {
        Self::List {
            ordered: true,
            items,
        }
    }
}

/// Check if any inline element carries visible text.
#[must_use]
pub fn has_visible_text(inlines: &[Inline]) -> bool {
    inlines.iter().any(|inline| match inline {
        Inline::Text(text) => !text.trim().is_empty(),
        Inline::Emphasis(content) => has_visible_text(content),
        Inline::Link(link) => !link.text.trim().is_empty(),
        Inline::LineBreak => false,
    })
}

/// Validate inline content recursively.
///
/// # Errors
///
/// Returns the first violated constraint.
pub fn validate_inlines(inlines: &[Inline]) -> Result<(), Malformed> {
    for inline in inlines {
        match inline {
            Inline::Text(_) | Inline::LineBreak => (),
            Inline::Emphasis(content) => validate_inlines(content)?,
            Inline::Link(link) => link.validate()?,
        }
    }
    Ok(())
}

/// Validate a body recursively.
///
/// Bodies, paragraphs, lists and list items must not be empty.
///
/// # Errors
///
/// Returns the first violated constraint.
pub fn validate_body(body: &[Block]) -> Result<(), Malformed> {
    if body.is_empty() {
        return Err(Malformed::EmptyBody);
    }
    validate_blocks(body)
}

fn validate_blocks(blocks: &[Block]) -> Result<(), Malformed> {
    for block in blocks {
        match block {
            Block::Paragraph(content) => {
                if !has_visible_text(content) {
                    return Err(Malformed::EmptyParagraph);
                }
                validate_inlines(content)?;
            }
            Block::List { items, .. } => {
                if items.is_empty() {
                    return Err(Malformed::EmptyList);
                }
                for item in items {
                    if item.is_empty() {
                        return Err(Malformed::EmptyListItem);
                    }
                    validate_blocks(item)?;
                }
            }
        }
    }
    Ok(())
}

/// Append the plain text of inline content.
///
/// Line breaks are replaced by a single space.
pub fn push_plain_text(inlines: &[Inline], plain: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => plain.push_str(text),
            Inline::Emphasis(content) => push_plain_text(content, plain),
            Inline::Link(link) => plain.push_str(&link.text),
            Inline::LineBreak => plain.push(' '),
        }
    }
}

/// The plain text of inline content.
#[must_use]
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut plain = String::new();
    push_plain_text(inlines, &mut plain);
    plain
}

/// Collapse every run of ASCII whitespace into a single space.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            collapsed.push(' ');
            pending_space = false;
        }
        collapsed.push(c);
    }
    if pending_space {
        collapsed.push(' ');
    }
    collapsed
}

/// Bring inline content into normal form.
///
/// Adjacent text is merged, whitespace runs are collapsed and empty text
/// is dropped, recursively. Whitespace at both ends of the sequence and
/// around line breaks is trimmed. The content of emphasis is merged but
/// never trimmed. Links are normalized with [`normalize_link()`].
///
/// Decoded markup is always in normal form.
#[must_use]
pub fn normalize_inlines(inlines: Vec<Inline>) -> Vec<Inline> {
    let mut merged = merge_text(inlines);
    let len = merged.len();
    for i in 0..len {
        let at_start = i == 0 || matches!(merged[i - 1], Inline::LineBreak);
        let at_end = i + 1 == len || matches!(merged[i + 1], Inline::LineBreak);
        if let Inline::Text(text) = &mut merged[i] {
            let trimmed = match (at_start, at_end) {
                (true, true) => text.trim_matches(' '),
                (true, false) => text.trim_start_matches(' '),
                (false, true) => text.trim_end_matches(' '),
                (false, false) => continue,
            };
            if trimmed.len() != text.len() {
                *text = trimmed.to_owned();
            }
        }
    }
    merged.retain(|inline| !matches!(inline, Inline::Text(text) if text.is_empty()));
    merged
}

/// Bring a link into normal form.
///
/// The target is trimmed. Whitespace runs of the text are collapsed
/// and trimmed.
#[must_use]
pub fn normalize_link(link: Link) -> Link {
    let Link { href, text } = link;
    Link {
        href: href.trim().to_owned(),
        text: collapse_whitespace(&text).trim_matches(' ').to_owned(),
    }
}

/// Bring a body into normal form.
///
/// The content of all paragraphs is normalized with
/// [`normalize_inlines()`], recursing into list items.
#[must_use]
pub fn normalize_body(body: Body) -> Body {
    body.into_iter()
        .map(|block| match block {
            Block::Paragraph(content) => Block::Paragraph(normalize_inlines(content)),
            Block::List { ordered, items } => Block::List {
                ordered,
                items: items.into_iter().map(normalize_body).collect(),
            },
        })
        .collect()
}

fn merge_text(inlines: Vec<Inline>) -> Vec<Inline> {
    let mut merged: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines {
        match inline {
            Inline::Text(text) if text.is_empty() => (),
            Inline::Text(text) => {
                if let Some(Inline::Text(last)) = merged.last_mut() {
                    last.push_str(&text);
                    *last = collapse_whitespace(last);
                } else {
                    merged.push(Inline::Text(collapse_whitespace(&text)));
                }
            }
            Inline::Emphasis(content) => merged.push(Inline::Emphasis(merge_text(content))),
            Inline::Link(link) => merged.push(Inline::Link(normalize_link(link))),
            Inline::LineBreak => merged.push(Inline::LineBreak),
        }
    }
    merged
}
