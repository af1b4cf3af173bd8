// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

use std::mem;

use super::{
    DecodeError, DecodedFeed,
    lexer::{self, Spanned, Token},
};
use crate::{
    Block, Body, Inline, Link, Malformed, NewsEntry, date,
    text::{collapse_whitespace, normalize_inlines, normalize_link},
};

const NEWSBOX_CLASS: &str = "newsbox";
const DATE_CLASS: &str = "date";

fn is_emphasis_tag(name: &str) -> bool {
    matches!(name, "b" | "strong" | "em" | "i")
}

fn is_list_tag(name: &str) -> bool {
    matches!(name, "ul" | "ol")
}

fn has_class(attrs: &[(String, String)], class: &str) -> bool {
    attrs
        .iter()
        .filter(|(name, _)| name == "class")
        .any(|(_, value)| value.split_ascii_whitespace().any(|c| c == class))
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn describe(token: Option<&Token>) -> String {
    match token {
        None => "end of input".to_owned(),
        Some(Token::Start { name, .. }) => format!("<{name}>"),
        Some(Token::End { name }) => format!("</{name}>"),
        Some(Token::Text(_)) => "text".to_owned(),
    }
}

pub(super) struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    input_len: usize,
    /// Index of the entry that is currently decoded.
    entry: usize,
}

impl Parser {
    pub(super) fn new(input: &str) -> Result<Self, DecodeError> {
        let tokens = lexer::tokenize(input).map_err(|err| DecodeError {
            entry: 0,
            offset: err.offset,
            reason: Malformed::Syntax(err.message),
        })?;
        Ok(Self {
            tokens,
            pos: 0,
            input_len: input.len(),
            entry: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|spanned| &spanned.token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.input_len, |spanned| spanned.offset)
    }

    fn error_at(&self, offset: usize, reason: Malformed) -> DecodeError {
        DecodeError {
            entry: self.entry,
            offset,
            reason,
        }
    }

    fn syntax(&self, message: impl Into<String>) -> DecodeError {
        self.error_at(self.offset(), Malformed::Syntax(message.into()))
    }

    fn unexpected(&self, context: &str) -> DecodeError {
        self.syntax(format!(
            "unexpected {found} {context}",
            found = describe(self.peek())
        ))
    }

    pub(super) fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(Token::is_whitespace) {
            self.pos += 1;
        }
    }

    fn at_end_tag(&self, name: &str) -> bool {
        matches!(self.peek(), Some(Token::End { name: end }) if end == name)
    }

    fn expect_start(&mut self, name: &str) -> Result<Vec<(String, String)>, DecodeError> {
        match self.peek() {
            Some(Token::Start {
                name: start, attrs, ..
            }) if start == name => {
                let attrs = attrs.clone();
                self.pos += 1;
                Ok(attrs)
            }
            _ => Err(self.unexpected(&format!("where <{name}> was expected"))),
        }
    }

    fn expect_end(&mut self, name: &str) -> Result<(), DecodeError> {
        if !self.at_end_tag(name) {
            return Err(self.unexpected(&format!("where </{name}> was expected")));
        }
        self.pos += 1;
        Ok(())
    }

    /// Decode a sequence of newsboxes with an optional trailing
    /// older-posts link.
    pub(super) fn decode_feed(mut self) -> Result<DecodedFeed, DecodeError> {
        let mut entries = Vec::new();
        let mut older_posts = None;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some(Token::Start { name, .. }) if name == "div" => {
                    let entry = self.decode_entry()?;
                    entries.push(entry);
                    self.entry += 1;
                }
                Some(Token::Start { name, .. }) if name == "a" => {
                    older_posts = Some(self.decode_older_posts_link()?);
                }
                _ => return Err(self.unexpected("between entries")),
            }
        }
        Ok(DecodedFeed {
            entries,
            older_posts,
        })
    }

    fn decode_older_posts_link(&mut self) -> Result<Link, DecodeError> {
        let offset = self.offset();
        let link = self.decode_link()?;
        link.validate()
            .map_err(|reason| self.error_at(offset, reason))?;
        // Nothing but an optional line break may follow.
        self.skip_whitespace();
        if matches!(self.peek(), Some(Token::Start { name, .. }) if name == "br") {
            self.decode_line_break();
            self.skip_whitespace();
        }
        if self.peek().is_some() {
            return Err(self.unexpected("after the older posts link"));
        }
        Ok(link)
    }

    /// Decode a single `<div class="newsbox">` element.
    pub(super) fn decode_entry(&mut self) -> Result<NewsEntry, DecodeError> {
        let offset = self.offset();
        let attrs = self.expect_start("div")?;
        if !has_class(&attrs, NEWSBOX_CLASS) {
            return Err(self.error_at(
                offset,
                Malformed::Syntax(format!("<div> without class \"{NEWSBOX_CLASS}\"")),
            ));
        }
        self.skip_whitespace();
        let date = self.decode_date()?;
        self.skip_whitespace();
        self.expect_start("h4")?;
        let title = normalize_inlines(self.decode_inlines(Some("h4"))?);
        self.expect_end("h4")?;
        let body = self.decode_blocks(Some("div"))?;
        self.expect_end("div")?;
        let entry = NewsEntry { date, title, body };
        entry
            .validate()
            .map_err(|reason| self.error_at(offset, reason))?;
        Ok(entry)
    }

    fn decode_date(&mut self) -> Result<time::Date, DecodeError> {
        let offset = self.offset();
        let attrs = self.expect_start("div")?;
        if !has_class(&attrs, DATE_CLASS) {
            return Err(self.error_at(
                offset,
                Malformed::Syntax(format!("<div> without class \"{DATE_CLASS}\"")),
            ));
        }
        let mut label = String::new();
        while let Some(Token::Text(text)) = self.peek() {
            label.push_str(text);
            self.pos += 1;
        }
        self.expect_end("div")?;
        let label = label.trim();
        date::parse(label)
            .ok_or_else(|| self.error_at(offset, Malformed::InvalidDate(label.to_owned())))
    }

    /// Decode inline content up to the end tag `closing`, which is not
    /// consumed, or up to the end of input.
    pub(super) fn decode_inlines(
        &mut self,
        closing: Option<&str>,
    ) -> Result<Vec<Inline>, DecodeError> {
        let mut inlines = Vec::new();
        loop {
            if self.decode_inline(&mut inlines)? {
                continue;
            }
            match (self.peek(), closing) {
                (None, None) => break,
                (Some(Token::End { name }), Some(closing)) if name == closing => break,
                (None, Some(closing)) => {
                    return Err(self.syntax(format!("unclosed <{closing}>")));
                }
                _ => return Err(self.unexpected("in inline content")),
            }
        }
        Ok(inlines)
    }

    /// Decode the next token if it starts inline content.
    fn decode_inline(&mut self, inlines: &mut Vec<Inline>) -> Result<bool, DecodeError> {
        match self.peek() {
            Some(Token::Text(text)) => {
                inlines.push(Inline::Text(collapse_whitespace(text)));
                self.pos += 1;
            }
            Some(Token::Start { name, .. }) if is_emphasis_tag(name) => {
                let name = name.clone();
                self.pos += 1;
                let content = self.decode_inlines(Some(&name))?;
                self.expect_end(&name)?;
                inlines.push(Inline::Emphasis(content));
            }
            Some(Token::Start { name, .. }) if name == "a" => {
                inlines.push(Inline::Link(self.decode_link()?));
            }
            Some(Token::Start { name, .. }) if name == "br" => {
                self.decode_line_break();
                inlines.push(Inline::LineBreak);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Skip `<br/>`, `<br>` or `<br></br>`.
    fn decode_line_break(&mut self) {
        let self_closing = matches!(
            self.peek(),
            Some(Token::Start {
                self_closing: true,
                ..
            })
        );
        self.pos += 1;
        if !self_closing && self.at_end_tag("br") {
            self.pos += 1;
        }
    }

    fn decode_link(&mut self) -> Result<Link, DecodeError> {
        let attrs = self.expect_start("a")?;
        let href = attr(&attrs, "href").unwrap_or_default().to_owned();
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(Token::Text(chunk)) => {
                    text.push_str(chunk);
                    self.pos += 1;
                }
                Some(Token::End { name }) if name == "a" => break,
                None => return Err(self.syntax("unclosed <a>")),
                _ => return Err(self.unexpected("inside <a>, only text is allowed")),
            }
        }
        self.expect_end("a")?;
        Ok(normalize_link(Link { href, text }))
    }

    /// Decode block content up to the end tag `closing`, which is not
    /// consumed, or up to the end of input.
    ///
    /// Inline content outside of `<p>` forms a paragraph of its own.
    pub(super) fn decode_blocks(&mut self, closing: Option<&str>) -> Result<Body, DecodeError> {
        let mut blocks = Vec::new();
        let mut loose = Vec::new();
        loop {
            if self.decode_inline(&mut loose)? {
                continue;
            }
            flush_loose(&mut loose, &mut blocks);
            match (self.peek(), closing) {
                (None, None) => break,
                (Some(Token::End { name }), Some(closing)) if name == closing => break,
                (None, Some(closing)) => {
                    return Err(self.syntax(format!("unclosed <{closing}>")));
                }
                (Some(Token::Start { name, .. }), _) if name == "p" => {
                    self.pos += 1;
                    let content = normalize_inlines(self.decode_inlines(Some("p"))?);
                    self.expect_end("p")?;
                    blocks.push(Block::Paragraph(content));
                }
                (Some(Token::Start { name, .. }), _) if is_list_tag(name) => {
                    blocks.push(self.decode_list()?);
                }
                _ => return Err(self.unexpected("in block content")),
            }
        }
        Ok(blocks)
    }

    /// Decode a `<ul>` or `<ol>` element.
    ///
    /// A nested list that directly follows an item is adopted by that item.
    fn decode_list(&mut self) -> Result<Block, DecodeError> {
        let name = match self.peek() {
            Some(Token::Start { name, .. }) if is_list_tag(name) => name.clone(),
            _ => return Err(self.unexpected("where a list was expected")),
        };
        self.pos += 1;
        let ordered = name == "ol";
        let mut items: Vec<Body> = Vec::new();
        loop {
            self.skip_whitespace();
            let offset = self.offset();
            match self.peek() {
                Some(Token::Start { name: start, .. }) if start == "li" => {
                    self.pos += 1;
                    let item = self.decode_blocks(Some("li"))?;
                    self.expect_end("li")?;
                    items.push(item);
                }
                Some(Token::Start { name: start, .. }) if is_list_tag(start) => {
                    let nested = self.decode_list()?;
                    let Some(item) = items.last_mut() else {
                        return Err(self.error_at(offset, Malformed::DanglingList));
                    };
                    item.push(nested);
                }
                Some(Token::End { name: end }) if *end == name => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.syntax(format!("unclosed <{name}>"))),
                _ => return Err(self.unexpected(&format!("inside <{name}>, outside of <li>"))),
            }
        }
        Ok(Block::List { ordered, items })
    }

    pub(super) fn finish(&mut self) -> Result<(), DecodeError> {
        self.skip_whitespace();
        if self.peek().is_some() {
            return Err(self.unexpected("after the entry"));
        }
        Ok(())
    }
}

fn flush_loose(loose: &mut Vec<Inline>, blocks: &mut Body) {
    if loose.is_empty() {
        return;
    }
    let content = normalize_inlines(mem::take(loose));
    if !content.is_empty() {
        blocks.push(Block::Paragraph(content));
    }
}
