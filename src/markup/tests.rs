// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

use super::*;
use crate::date;

fn item(text: &str) -> Body {
    vec![Block::paragraph(vec![Inline::text(text)])]
}

fn nested_entry() -> NewsEntry {
    NewsEntry {
        date: date::parse("2014-11-05").unwrap(),
        title: vec![
            Inline::text("Updates to unstable update site"),
            Inline::LineBreak,
            Inline::text("(plus a minor rant)"),
        ],
        body: vec![
            Block::paragraph(vec![Inline::text(
                "We've made the following changes on the unstable update site:",
            )]),
            Block::bullets(vec![
                vec![
                    Block::paragraph(vec![Inline::text("Added new \"line\" text object plugin")]),
                    Block::bullets(vec![
                        item("'al' for column 0 to end-of-line"),
                        vec![Block::paragraph(vec![
                            Inline::text("Port of "),
                            Inline::link(
                                "http://www.vim.org/scripts/script.php?script_id=3886&x=\"y\"",
                                "script #3886",
                            ),
                        ])],
                    ]),
                ],
                item("Fixed issue with '>' indent command & counts in <visual> mode"),
                vec![
                    Block::numbered(vec![item("first"), item("second")]),
                    Block::paragraph(vec![Inline::text("after a list")]),
                ],
                vec![
                    Block::paragraph(vec![Inline::text("two")]),
                    Block::paragraph(vec![Inline::text("paragraphs")]),
                ],
            ]),
            Block::paragraph(vec![
                Inline::emphasis(vec![Inline::text("**Changes in behavior**")]),
                Inline::LineBreak,
                Inline::text("We had support for "),
                Inline::emphasis(vec![Inline::text("\"saney\"")]),
                Inline::text(" and non\u{a0}breaking spaces."),
            ]),
        ],
    }
}

#[test]
fn encode_entry() {
    let entry = NewsEntry {
        date: date::parse("2014-12-07").unwrap(),
        title: vec![Inline::text("0.50.0 Released")],
        body: vec![
            Block::paragraph(vec![Inline::text(
                "The following changes are included in 0.50.0:",
            )]),
            Block::bullets(vec![
                item("Added support for 'p'aste in visual block mode"),
                vec![
                    Block::paragraph(vec![Inline::text("Added support for 'g_' motion")]),
                    Block::bullets(vec![item("nested")]),
                ],
            ]),
        ],
    };
    let expected = r#"<div class="newsbox">
    <div class="date">2014-12-07</div>
    <h4>0.50.0 Released</h4>
    <p>The following changes are included in 0.50.0:</p>
    <ul>
        <li>Added support for 'p'aste in visual block mode</li>
        <li>Added support for 'g_' motion
            <ul>
                <li>nested</li>
            </ul>
        </li>
    </ul>
</div>
"#;
    assert_eq!(expected, entry.encode());
    assert_eq!(entry, NewsEntry::decode_str(expected).unwrap());
}

#[test]
fn display_invalid_entry_as_is() {
    let entry = NewsEntry {
        date: date::parse("2014-12-07").unwrap(),
        title: vec![],
        body: vec![],
    };
    assert!(!entry.is_valid());
    let encoded = format!("{entry}");
    assert_eq!(
        "<div class=\"newsbox\">\n    <div class=\"date\">2014-12-07</div>\n    <h4></h4>\n</div>\n",
        encoded
    );
    assert_eq!(
        Malformed::EmptyTitle,
        NewsEntry::decode_str(&encoded).unwrap_err().reason
    );
}

#[test]
fn encode_escapes_text_and_attributes() {
    assert_eq!(
        "a &lt;C-R&gt; &amp; \"b\"",
        encode_inlines(&[Inline::text("a <C-R> & \"b\"")])
    );
    assert_eq!(
        "<a href=\"x?a=1&amp;b=&quot;2&quot;\">&lt;3</a>",
        encode_inlines(&[Inline::link("x?a=1&b=\"2\"", "<3")])
    );
}

#[test]
fn encode_decode_roundtrip() {
    let entry = nested_entry();
    assert!(entry.is_valid());
    let encoded = entry.encode();
    let decoded = NewsEntry::decode_str(&encoded).unwrap();
    assert_eq!(entry, decoded);
    assert_eq!(encoded, decoded.encode());
}

#[test]
fn reencode_body() {
    fn reencode(encoded: &str) {
        let decoded = decode_body(encoded).unwrap();
        assert_eq!(encoded, encode_body(&decoded));
    }
    reencode("<p>text</p>\n");
    reencode("<ul>\n    <li>item</li>\n</ul>\n");
    reencode("<ol>\n    <li>one</li>\n    <li>two</li>\n</ol>\n");
    reencode(
        "<ul>\n    <li>a\n        <p>b</p>\n        <ul>\n            <li>c</li>\n        </ul>\n    </li>\n</ul>\n",
    );
    reencode("<p><b>x</b> <a href=\"#top\">top</a><br/>y</p>\n");
}

#[test]
fn decode_adopts_nested_list_following_an_item() {
    let body = decode_body(
        r"<ul>
            <li>Added support for 'c_&lt;C-R&gt;_&lt;C-W&gt;'</li>
            <ul>
            	<li>Insert word under cursor into command-line</li>
            </ul>
            <li>Added support for 'n' flag in substitutions</li>
        </ul>",
    )
    .unwrap();
    assert_eq!(
        vec![Block::bullets(vec![
            vec![
                Block::paragraph(vec![Inline::text("Added support for 'c_<C-R>_<C-W>'")]),
                Block::bullets(vec![item("Insert word under cursor into command-line")]),
            ],
            item("Added support for 'n' flag in substitutions"),
        ])],
        body
    );
}

#[test]
fn decode_rejects_dangling_nested_list() {
    let err = decode_body("<ul>\n    <ul>\n        <li>orphan</li>\n    </ul>\n</ul>").unwrap_err();
    assert_eq!(Malformed::DanglingList, err.reason);
    assert_eq!(9, err.offset);
}

#[test]
fn decode_rejects_text_outside_of_items() {
    let err = decode_body("<ul>stray<li>item</li></ul>").unwrap_err();
    assert!(matches!(err.reason, Malformed::Syntax(_)));
}

#[test]
fn decode_loose_inline_content_as_paragraph() {
    let body = decode_body(
        "<b>**Changes in behavior**</b><br/>\n    The following changes modify existing behavior:\n    <ul><li>x</li></ul>",
    )
    .unwrap();
    assert_eq!(
        vec![
            Block::paragraph(vec![
                Inline::emphasis(vec![Inline::text("**Changes in behavior**")]),
                Inline::LineBreak,
                Inline::text("The following changes modify existing behavior:"),
            ]),
            Block::bullets(vec![item("x")]),
        ],
        body
    );
}

#[test]
fn decode_collapses_whitespace() {
    let inlines = decode_inlines("  au \"XML\"  surround\tc &lt;!--\\r--&gt;\n ").unwrap();
    assert_eq!(vec![Inline::text("au \"XML\" surround c <!--\\r-->")], inlines);
}

#[test]
fn decode_entities() {
    let inlines = decode_inlines("&lt;3 &amp;amp; &#65;&#x42; &nbsp;&unknown; & done").unwrap();
    assert_eq!(
        vec![Inline::text("<3 &amp; AB \u{a0}&unknown; & done")],
        inlines
    );
}

#[test]
fn decode_skips_comments() {
    let inlines = decode_inlines("before <!-- <b>hidden</b> --> after").unwrap();
    assert_eq!(vec![Inline::text("before after")], inlines);
    assert!(decode_inlines("before <!-- unterminated").is_err());
}

#[test]
fn decode_emphasis_variants() {
    let inlines = decode_inlines("<strong>a</strong><em>b</em><i>c</i><B>d</B>").unwrap();
    assert_eq!(
        vec![
            Inline::emphasis(vec![Inline::text("a")]),
            Inline::emphasis(vec![Inline::text("b")]),
            Inline::emphasis(vec![Inline::text("c")]),
            Inline::emphasis(vec![Inline::text("d")]),
        ],
        inlines
    );
}

#[test]
fn decode_line_break_variants() {
    let expected = vec![Inline::text("a"), Inline::LineBreak, Inline::text("b")];
    assert_eq!(expected, decode_inlines("a<br/>b").unwrap());
    assert_eq!(expected, decode_inlines("a <br> b").unwrap());
    assert_eq!(expected, decode_inlines("a<br />b").unwrap());
    assert_eq!(expected, decode_inlines("a<br></br>b").unwrap());
}

#[test]
fn decode_link_with_single_quoted_href() {
    let inlines = decode_inlines("based on <a href='https://github.com/tommcdo/vim-exchange'>\n vim-exchange </a>").unwrap();
    assert_eq!(
        vec![
            Inline::text("based on "),
            Inline::link("https://github.com/tommcdo/vim-exchange", "vim-exchange"),
        ],
        inlines
    );
}

#[test]
fn decode_rejects_markup_inside_links() {
    assert!(decode_inlines("<a href=\"x\"><b>bold</b></a>").is_err());
}

#[test]
fn decode_rejects_unknown_and_unbalanced_tags() {
    assert!(decode_body("<table></table>").is_err());
    assert!(decode_body("<p>unclosed").is_err());
    assert!(decode_body("<p>mismatched</li>").is_err());
    assert!(decode_body("a < b").is_err());
    assert!(decode_inlines("<p>block</p>").is_err());
}

#[test]
fn decode_rejects_invalid_entries() {
    let empty_body = r#"<div class="newsbox">
    <div class="date">2014-12-07</div>
    <h4>0.50.0 Released</h4>
</div>"#;
    assert_eq!(
        Malformed::EmptyBody,
        NewsEntry::decode_str(empty_body).unwrap_err().reason
    );

    let invalid_date = r#"<div class="newsbox">
    <div class="date">2014-12-32</div>
    <h4>0.50.0 Released</h4>
    <p>body</p>
</div>"#;
    assert_eq!(
        Malformed::InvalidDate("2014-12-32".into()),
        NewsEntry::decode_str(invalid_date).unwrap_err().reason
    );

    let empty_href = r#"<div class="newsbox">
    <div class="date">2014-12-07</div>
    <h4>0.50.0 Released</h4>
    <p>see <a href="">here</a></p>
</div>"#;
    assert_eq!(
        Malformed::EmptyHref,
        NewsEntry::decode_str(empty_href).unwrap_err().reason
    );

    let missing_class = r#"<div>
    <div class="date">2014-12-07</div>
    <h4>0.50.0 Released</h4>
    <p>body</p>
</div>"#;
    assert!(matches!(
        NewsEntry::decode_str(missing_class).unwrap_err().reason,
        Malformed::Syntax(_)
    ));
}

#[test]
fn decode_str_rejects_trailing_content() {
    let encoded = format!("{}<p>trailing</p>", nested_entry().encode());
    assert!(NewsEntry::decode_str(&encoded).is_err());
    assert!(format!("\n  {}  \n", nested_entry().encode())
        .parse::<NewsEntry>()
        .is_ok());
}

const AUTHORED_PAGE: &str = r#"<div class="newsbox">
    <div class="date">2015-01-04</div>
    <h4>(Lack of) Status Update</h4>
    <p>It's been a month since 0.50.0 was released so I figured I should stick
    with my monthly status updates and tell you about the recent changes.</p>
    <p>I hope you all enjoy Vrapper 0.50.0!</p>
</div>
<div class="newsbox">
    <div class="date">2014-11-05</div>
    <h4>Updates to unstable update site</h4>

    <p>It's been another month, time for your monthly status update with Vrapper.
    We've made the following changes on the unstable update site:</p>

    <ul>
        <li>Added new "line" text object plugin</li>
            <ul>
            <li>'al' for column 0 to end-of-line</li>
            <li>Port of <a href="http://www.vim.org/scripts/script.php?script_id=3886">http://www.vim.org/scripts/script.php?script_id=3886</a></li>
            </ul>
        <li>Fixed issue where '\t' in substituion text couldn't be escaped</li>
        <li>Fixed issue with cursor location in a new split </li>
    </ul>
</div>

<a href="old_index.php">Older Posts &gt;&gt;</a><br/>"#;

#[test]
fn decode_authored_page() {
    let DecodedFeed {
        entries,
        older_posts,
    } = decode_feed(AUTHORED_PAGE).unwrap();
    assert_eq!(
        Some(Link {
            href: "old_index.php".into(),
            text: "Older Posts >>".into(),
        }),
        older_posts
    );
    assert_eq!(2, entries.len());
    assert_eq!("(Lack of) Status Update", entries[0].title_text());
    assert_eq!(
        vec![
            Block::paragraph(vec![Inline::text(
                "It's been a month since 0.50.0 was released so I figured I should stick with my monthly status updates and tell you about the recent changes."
            )]),
            Block::paragraph(vec![Inline::text("I hope you all enjoy Vrapper 0.50.0!")]),
        ],
        entries[0].body
    );
    assert_eq!(
        vec![
            Block::paragraph(vec![Inline::text(
                "It's been another month, time for your monthly status update with Vrapper. We've made the following changes on the unstable update site:"
            )]),
            Block::bullets(vec![
                vec![
                    Block::paragraph(vec![Inline::text("Added new \"line\" text object plugin")]),
                    Block::bullets(vec![
                        item("'al' for column 0 to end-of-line"),
                        vec![Block::paragraph(vec![
                            Inline::text("Port of "),
                            Inline::link(
                                "http://www.vim.org/scripts/script.php?script_id=3886",
                                "http://www.vim.org/scripts/script.php?script_id=3886",
                            ),
                        ])],
                    ]),
                ],
                item("Fixed issue where '\\t' in substituion text couldn't be escaped"),
                item("Fixed issue with cursor location in a new split"),
            ]),
        ],
        entries[1].body
    );
}

#[test]
fn decoded_authored_page_reencodes_stably() {
    let DecodedFeed { entries, .. } = decode_feed(AUTHORED_PAGE).unwrap();
    for entry in entries {
        let reencoded = entry.encode();
        assert_eq!(entry, NewsEntry::decode_str(&reencoded).unwrap());
    }
}

#[test]
fn decode_feed_reports_index_of_failing_entry() {
    let input = format!(
        "{}\n<div class=\"newsbox\"><div class=\"date\">2014-10-05</div><h4>t</h4></div>",
        nested_entry().encode()
    );
    let err = decode_feed(&input).unwrap_err();
    assert_eq!(1, err.entry);
    assert_eq!(Malformed::EmptyBody, err.reason);
    assert_eq!(
        Error::MalformedEntry {
            index: 1,
            reason: Malformed::EmptyBody,
        },
        Error::from(err)
    );
}

#[test]
fn decode_feed_rejects_content_after_older_posts_link() {
    let input = "<a href=\"old_index.php\">Older</a><br/>\n<p>more</p>";
    assert!(decode_feed(input).is_err());
    let input = "<a href=\"old_index.php\">Older</a>";
    assert!(decode_feed(input).unwrap().entries.is_empty());
}

#[test]
fn decode_empty_feed() {
    assert_eq!(DecodedFeed::default(), decode_feed("").unwrap());
    assert_eq!(DecodedFeed::default(), decode_feed(" \n\t").unwrap());
}
