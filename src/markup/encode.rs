// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

use std::fmt::{self, Write};

use crate::{Block, Body, Inline, Link, NewsEntry, date};

const INDENT: &str = "    ";

fn write_indent<W: Write>(write: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        write.write_str(INDENT)?;
    }
    Ok(())
}

fn write_escaped<W: Write>(write: &mut W, text: &str, in_attr: bool) -> fmt::Result {
    let mut rest = text;
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>') || (in_attr && c == '"');
    while let Some(pos) = rest.find(needs_escape) {
        write.write_str(&rest[..pos])?;
        let escaped = match rest.as_bytes()[pos] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => "&quot;",
        };
        write.write_str(escaped)?;
        rest = &rest[pos + 1..];
    }
    write.write_str(rest)
}

pub(super) fn write_text<W: Write>(write: &mut W, text: &str) -> fmt::Result {
    write_escaped(write, text, false)
}

pub(super) fn write_link<W: Write>(write: &mut W, link: &Link) -> fmt::Result {
    let Link { href, text } = link;
    write.write_str("<a href=\"")?;
    write_escaped(write, href, true)?;
    write.write_str("\">")?;
    write_text(write, text)?;
    write.write_str("</a>")
}

pub(super) fn write_inlines<W: Write>(write: &mut W, inlines: &[Inline]) -> fmt::Result {
    for inline in inlines {
        match inline {
            Inline::Text(text) => write_text(write, text)?,
            Inline::Emphasis(content) => {
                write.write_str("<b>")?;
                write_inlines(write, content)?;
                write.write_str("</b>")?;
            }
            Inline::Link(link) => write_link(write, link)?,
            Inline::LineBreak => write.write_str("<br/>")?,
        }
    }
    Ok(())
}

pub(super) fn write_blocks<W: Write>(
    write: &mut W,
    blocks: &[Block],
    depth: usize,
) -> fmt::Result {
    for block in blocks {
        match block {
            Block::Paragraph(content) => {
                write_indent(write, depth)?;
                write.write_str("<p>")?;
                write_inlines(write, content)?;
                write.write_str("</p>\n")?;
            }
            Block::List { ordered, items } => write_list(write, *ordered, items, depth)?,
        }
    }
    Ok(())
}

fn write_list<W: Write>(
    write: &mut W,
    ordered: bool,
    items: &[Body],
    depth: usize,
) -> fmt::Result {
    let tag = if ordered { "ol" } else { "ul" };
    write_indent(write, depth)?;
    writeln!(write, "<{tag}>")?;
    for item in items {
        write_indent(write, depth + 1)?;
        write.write_str("<li>")?;
        // A leading paragraph is written without <p> tags.
        let rest = match item.split_first() {
            Some((Block::Paragraph(content), rest)) => {
                write_inlines(write, content)?;
                rest
            }
            _ => item.as_slice(),
        };
        if rest.is_empty() {
            write.write_str("</li>\n")?;
            continue;
        }
        write.write_char('\n')?;
        write_blocks(write, rest, depth + 2)?;
        write_indent(write, depth + 1)?;
        write.write_str("</li>\n")?;
    }
    write_indent(write, depth)?;
    writeln!(write, "</{tag}>")
}

pub(super) fn write_entry<W: Write>(write: &mut W, entry: &NewsEntry) -> fmt::Result {
    let NewsEntry { date, title, body } = entry;
    let date = date::format(*date).map_err(|_| fmt::Error)?;
    write.write_str("<div class=\"newsbox\">\n")?;
    write_indent(write, 1)?;
    writeln!(write, "<div class=\"date\">{date}</div>")?;
    write_indent(write, 1)?;
    write.write_str("<h4>")?;
    write_inlines(write, title)?;
    write.write_str("</h4>\n")?;
    write_blocks(write, body, 1)?;
    write.write_str("</div>\n")
}
