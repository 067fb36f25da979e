//! Whole-document scenarios from the spec's testable-properties section,
//! run end to end through [`soldown::render`] rather than against the
//! individual block/inline parsers.

mod common;

use common::{html4, xhtml};

#[test]
fn atx_header() {
    assert_eq!(xhtml("# Hello\n"), "<h1>Hello</h1>\n");
}

#[test]
fn emphasis_inside_a_paragraph() {
    assert_eq!(xhtml("foo *bar* baz\n"), "<p>foo <em>bar</em> baz</p>\n");
}

#[test]
fn indented_code_block() {
    assert_eq!(xhtml("    code\n"), "<pre><code>code\n</code></pre>\n");
}

#[test]
fn reference_style_link() {
    assert_eq!(
        xhtml("[x][id]\n\n[id]: http://e \"t\"\n"),
        "<p><a href=\"http://e\" title=\"t\">x</a></p>\n"
    );
}

#[test]
fn blockquote() {
    assert_eq!(
        xhtml("> quoted\n"),
        "<blockquote>\n<p>quoted</p>\n</blockquote>\n"
    );
}

#[test]
fn entity_escaping_in_a_paragraph() {
    assert_eq!(
        xhtml("a & b < c > d\n"),
        "<p>a &amp; b &lt; c &gt; d</p>\n"
    );
}

#[test]
fn empty_input_is_a_no_op() {
    assert_eq!(xhtml(""), "");
}

#[test]
fn reference_only_document_is_a_no_op() {
    assert_eq!(xhtml("[id]: http://example.com\n[other]: /x \"t\"\n"), "");
}

#[test]
fn blockquote_of_only_blank_lines_is_empty() {
    assert_eq!(xhtml("> \n> \n"), "<blockquote>\n</blockquote>\n");
}

#[test]
fn list_item_followed_by_a_blank_line_and_another_marker_nests() {
    // A blank line between items that is itself followed by a line
    // starting with a list marker flips the whole list to block-level
    // content, so the sub-marker is recursively block-parsed as a nested
    // list rather than treated as inline text.
    let out = xhtml("* outer\n\n    * inner\n");
    assert!(out.contains("<ul>\n<li>inner</li>\n</ul>"));
}

#[test]
fn xhtml_rendering_is_idempotent() {
    let input = "# Title\n\nSome *text* with a [link](http://example.com \"t\").\n\n> quoted\n\n* a\n* b\n";
    assert_eq!(xhtml(input), xhtml(input));
}

#[test]
fn html4_omits_self_closing_slashes() {
    let out = html4("foo\n\n---\n\n![alt](/a.png)\n");
    assert!(out.contains("<hr>\n"));
    assert!(out.contains("<img src=\"/a.png\" alt=\"alt\">"));
}

#[test]
fn setext_header_level_one() {
    assert_eq!(xhtml("Title\n=====\n"), "<h1>Title</h1>\n");
}

#[test]
fn horizontal_rule_requires_at_least_three_marks() {
    assert_eq!(xhtml("??\n"), "<p>??</p>\n");
    assert!(xhtml("---\n").contains("<hr />\n"));
}

#[test]
fn ordered_list_renders_as_ol() {
    let out = xhtml("1. one\n2. two\n");
    assert_eq!(out, "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n");
}
