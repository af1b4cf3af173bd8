// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    End {
        name: String,
    },
    /// Character data with entities already decoded.
    Text(String),
}

impl Token {
    pub(super) fn is_whitespace(&self) -> bool {
        matches!(self, Self::Text(text) if text.chars().all(|c| c.is_ascii_whitespace()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Spanned {
    /// Byte offset of the token in the input.
    pub(super) offset: usize,
    pub(super) token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SyntaxError {
    pub(super) offset: usize,
    pub(super) message: String,
}

const TAG_REGEX_STR: &str = r#"^<(/?)([A-Za-z][A-Za-z0-9]*)((?:\s+[^\s"'<>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/?)>"#;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| TAG_REGEX_STR.parse().expect("valid tag regex"));

const ATTR_REGEX_STR: &str =
    r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#;

static ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| ATTR_REGEX_STR.parse().expect("valid attribute regex"));

const ENTITY_REGEX_STR: &str = r"&(?:#([0-9]{1,7})|#[xX]([0-9A-Fa-f]{1,6})|([A-Za-z][A-Za-z0-9]*));";

static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| ENTITY_REGEX_STR.parse().expect("valid entity regex"));

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

/// Replace character references with the characters they denote.
///
/// Unknown named references and a bare `&` are kept verbatim.
pub(super) fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }
    ENTITY_REGEX.replace_all(input, |captures: &Captures<'_>| {
        let decoded = if let Some(decimal) = captures.get(1) {
            decimal.as_str().parse().ok().and_then(char::from_u32)
        } else if let Some(hex) = captures.get(2) {
            u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            captures.get(3).and_then(|name| named_entity(name.as_str()))
        };
        decoded.map_or_else(|| captures[0].to_owned(), String::from)
    })
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => return None,
    };
    Some(c)
}

/// Split the input into tags and character data.
///
/// Comments are dropped. Character data on both sides of a comment
/// ends up in a single text token.
pub(super) fn tokenize(input: &str) -> Result<Vec<Spanned>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut text_offset = 0;
    let mut pos = 0;
    while pos < input.len() {
        let Some(lt) = input[pos..].find('<').map(|lt| pos + lt) else {
            push_text(&mut text, &mut text_offset, pos, &input[pos..]);
            break;
        };
        push_text(&mut text, &mut text_offset, pos, &input[pos..lt]);
        let rest = &input[lt..];
        if rest.starts_with(COMMENT_START) {
            let Some(end) = rest[COMMENT_START.len()..].find(COMMENT_END) else {
                return Err(SyntaxError {
                    offset: lt,
                    message: "unterminated comment".to_owned(),
                });
            };
            pos = lt + COMMENT_START.len() + end + COMMENT_END.len();
            continue;
        }
        let Some(captures) = TAG_REGEX.captures(rest) else {
            return Err(SyntaxError {
                offset: lt,
                message: "stray '<' that does not start a tag".to_owned(),
            });
        };
        flush_text(&mut tokens, &mut text, text_offset);
        let is_end = !captures[1].is_empty();
        let self_closing = !captures[4].is_empty();
        let name = captures[2].to_ascii_lowercase();
        let token = if is_end {
            if self_closing || !captures[3].trim().is_empty() {
                return Err(SyntaxError {
                    offset: lt,
                    message: format!("malformed closing tag </{name}>"),
                });
            }
            Token::End { name }
        } else {
            Token::Start {
                name,
                attrs: parse_attrs(&captures[3]),
                self_closing,
            }
        };
        tokens.push(Spanned { offset: lt, token });
        pos = lt + captures[0].len();
    }
    flush_text(&mut tokens, &mut text, text_offset);
    Ok(tokens)
}

fn push_text(text: &mut String, text_offset: &mut usize, offset: usize, raw: &str) {
    if raw.is_empty() {
        return;
    }
    if text.is_empty() {
        *text_offset = offset;
    }
    text.push_str(raw);
}

fn flush_text(tokens: &mut Vec<Spanned>, text: &mut String, text_offset: usize) {
    if text.is_empty() {
        return;
    }
    let decoded = decode_entities(text).into_owned();
    text.clear();
    tokens.push(Spanned {
        offset: text_offset,
        token: Token::Text(decoded),
    });
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    ATTR_REGEX
        .captures_iter(raw)
        .map(|captures| {
            let name = captures[1].to_ascii_lowercase();
            let value = captures
                .get(2)
                .or_else(|| captures.get(3))
                .or_else(|| captures.get(4))
                .map(|value| decode_entities(value.as_str()).into_owned())
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}
