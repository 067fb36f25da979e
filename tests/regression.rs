//! Regression tests pinning down the ambiguities the spec calls out as
//! resolved (triple-abutting emphasis delimiters, the linebreak guard,
//! reference-table duplicate policy, mixed CR/LF handling), a handful of
//! error-handling contract checks (§7), and a few parser totality/fidelity
//! fixes (escaping a multi-byte character after `\`, falling back to
//! literal `<`/`>` escaping for renderers with neither autolink nor raw-tag
//! support, and headers never being inline-parsed).

mod common;

use common::{man, xhtml};

#[test]
fn triple_abutting_emphasis_closes_as_a_triple() {
    assert_eq!(xhtml("***x***\n"), "<p><strong><em>x</em></strong></p>\n");
}

#[test]
fn two_trailing_spaces_before_newline_force_a_line_break() {
    // Only one of the two spaces is dropped; the linebreak replaces the
    // newline itself, not the whole run of trailing whitespace.
    let out = xhtml("line one  \nline two\n");
    assert_eq!(out, "<p>line one <br />\nline two</p>\n");
}

#[test]
fn a_single_trailing_space_does_not_force_a_line_break() {
    let out = xhtml("line one \nline two\n");
    assert_eq!(out, "<p>line one \nline two</p>\n");
}

#[test]
fn first_definition_of_a_duplicate_reference_id_wins() {
    let out = xhtml("[x][id]\n\n[id]: /first\n[id]: /second\n");
    assert_eq!(out, "<p><a href=\"/first\">x</a></p>\n");
}

#[test]
fn crlf_and_lone_cr_line_endings_normalize() {
    assert_eq!(xhtml("foo\r\nbar\rbaz\n"), "<p>foo\nbar\nbaz</p>\n");
}

#[test]
fn unresolved_reference_link_is_emitted_literally() {
    assert_eq!(xhtml("[x][missing]\n"), "<p>[x][missing]</p>\n");
}

#[test]
fn unclosed_code_span_backticks_are_literal() {
    assert_eq!(xhtml("`abc\n"), "<p>`abc</p>\n");
}

#[test]
fn unclosed_emphasis_delimiter_is_literal() {
    assert_eq!(xhtml("*abc\n"), "<p>*abc</p>\n");
}

#[test]
fn malformed_entity_escapes_the_ampersand_only() {
    assert_eq!(xhtml("a & b\n"), "<p>a &amp; b</p>\n");
    assert_eq!(xhtml("a &amp; b\n"), "<p>a &amp; b</p>\n");
}

#[test]
fn emphasis_does_not_straddle_a_code_span() {
    // The `*` before the code span never finds a matching closer because
    // the search for one skips straight over the backtick-delimited run.
    assert_eq!(xhtml("*a `b*c` d\n"), "<p>*a <code>b*c</code> d</p>\n");
}

#[test]
fn image_marker_consumes_the_preceding_bang() {
    assert_eq!(
        xhtml("![alt text](/a.png)\n"),
        "<p><img src=\"/a.png\" alt=\"alt text\" /></p>\n"
    );
}

#[test]
fn angle_bracketed_url_autolink() {
    assert_eq!(
        xhtml("<http://example.com>\n"),
        "<p><a href=\"http://example.com\">http://example.com</a></p>\n"
    );
}

#[test]
fn implicit_email_autolink_gets_a_mailto_prefix() {
    assert_eq!(
        xhtml("<user@example.com>\n"),
        "<p><a href=\"mailto:user@example.com\">user@example.com</a></p>\n"
    );
}

#[test]
fn escaped_multibyte_character_does_not_panic() {
    assert_eq!(xhtml("a \\\u{a3} b\n"), "<p>a \u{a3} b</p>\n");
}

#[test]
fn a_tag_is_escaped_by_a_renderer_with_no_tag_support() {
    assert!(man("<b>\n").ends_with(".Pp\n&lt;b&gt;\n"));
}

#[test]
fn atx_header_content_is_not_inline_parsed() {
    assert_eq!(xhtml("# a *b* c\n"), "<h1>a *b* c</h1>\n");
}

#[test]
fn setext_header_content_is_not_inline_parsed() {
    assert_eq!(xhtml("a *b* c\n=====\n"), "<h1>a *b* c</h1>\n");
}
