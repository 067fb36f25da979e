use crate::render::{AutolinkKind, ListFlags, Renderer};

/// Before writing most block-level output, this prepends a blank line iff
/// something has already been written, so consecutive top-level blocks end
/// up separated by exactly one blank line without the renderer needing to
/// track its own "is this the first block" state.
fn separate(out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
}

/// XHTML 1.0 output: self-closing void elements (`<hr />`, `<br />`,
/// `<img .../>`).
#[derive(Default)]
pub struct XhtmlRenderer;

impl Renderer for XhtmlRenderer {
    fn supports_emphasis(&self) -> bool {
        true
    }

    fn supports_double_emphasis(&self) -> bool {
        true
    }

    fn supports_triple_emphasis(&self) -> bool {
        true
    }

    fn supports_codespan(&self) -> bool {
        true
    }

    fn supports_linebreak(&self) -> bool {
        true
    }

    fn supports_link(&self) -> bool {
        true
    }

    fn supports_image(&self) -> bool {
        true
    }

    fn supports_autolink(&self) -> bool {
        true
    }

    fn supports_raw_html_tag(&self) -> bool {
        true
    }

    fn block_code(&mut self, out: &mut String, text: &str) {
        separate(out);
        out.push_str("<pre><code>");
        out.push_str(text);
        out.push_str("</code></pre>\n");
    }

    fn block_quote(&mut self, out: &mut String, text: &str) {
        separate(out);
        out.push_str("<blockquote>\n");
        out.push_str(text);
        out.push_str("</blockquote>\n");
    }

    fn block_html(&mut self, out: &mut String, text: &str) {
        let trimmed_end = text.trim_end_matches('\n');
        let trimmed = trimmed_end.trim_start_matches('\n');
        if trimmed.is_empty() {
            return;
        }
        separate(out);
        out.push_str(trimmed);
        out.push('\n');
    }

    fn header(&mut self, out: &mut String, text: &str, level: u8) {
        separate(out);
        out.push_str(&format!("<h{level}>"));
        out.push_str(text);
        out.push_str(&format!("</h{level}>\n"));
    }

    fn hrule(&mut self, out: &mut String) {
        separate(out);
        out.push_str("<hr />\n");
    }

    fn list(&mut self, out: &mut String, text: &str, flags: ListFlags) {
        separate(out);
        let ordered = flags.contains(ListFlags::ORDERED);
        out.push_str(if ordered { "<ol>\n" } else { "<ul>\n" });
        out.push_str(text);
        out.push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
    }

    fn list_item(&mut self, out: &mut String, text: &str, _flags: ListFlags) {
        out.push_str("<li>");
        out.push_str(text.trim_end_matches('\n'));
        out.push_str("</li>\n");
    }

    fn paragraph(&mut self, out: &mut String, text: &str) {
        separate(out);
        out.push_str("<p>");
        out.push_str(text);
        out.push_str("</p>\n");
    }

    fn autolink(&mut self, out: &mut String, link: &str, kind: AutolinkKind) -> bool {
        if link.is_empty() {
            return false;
        }
        out.push_str("<a href=\"");
        if kind == AutolinkKind::ImplicitEmail {
            out.push_str("mailto:");
        }
        out.push_str(link);
        out.push_str("\">");
        if kind == AutolinkKind::Email && link.len() > 7 {
            out.push_str(&link[7..]);
        } else {
            out.push_str(link);
        }
        out.push_str("</a>");
        true
    }

    fn code_span(&mut self, out: &mut String, text: &str) -> bool {
        out.push_str("<code>");
        out.push_str(text);
        out.push_str("</code>");
        true
    }

    fn emphasis(&mut self, out: &mut String, text: &str, _delimiter: u8) -> bool {
        if text.is_empty() {
            return false;
        }
        out.push_str("<em>");
        out.push_str(text);
        out.push_str("</em>");
        true
    }

    fn double_emphasis(&mut self, out: &mut String, text: &str, _delimiter: u8) -> bool {
        if text.is_empty() {
            return false;
        }
        out.push_str("<strong>");
        out.push_str(text);
        out.push_str("</strong>");
        true
    }

    fn triple_emphasis(&mut self, out: &mut String, text: &str, _delimiter: u8) -> bool {
        if text.is_empty() {
            return false;
        }
        out.push_str("<strong><em>");
        out.push_str(text);
        out.push_str("</em></strong>");
        true
    }

    fn image(&mut self, out: &mut String, link: &str, title: Option<&str>, alt: &str) -> bool {
        if link.is_empty() {
            return false;
        }
        out.push_str("<img src=\"");
        out.push_str(link);
        out.push_str("\" alt=\"");
        out.push_str(alt);
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            out.push_str("\" title=\"");
            out.push_str(title);
        }
        out.push_str("\" />");
        true
    }

    fn linebreak(&mut self, out: &mut String) -> bool {
        out.push_str("<br />\n");
        true
    }

    fn link(&mut self, out: &mut String, link: &str, title: Option<&str>, content: &str) -> bool {
        out.push_str("<a href=\"");
        out.push_str(link);
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            out.push_str("\" title=\"");
            out.push_str(title);
        }
        out.push_str("\">");
        out.push_str(content);
        out.push_str("</a>");
        true
    }

    fn raw_html_tag(&mut self, out: &mut String, tag_text: &str) -> bool {
        out.push_str(tag_text);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceTable;

    #[test]
    fn paragraph_and_header_are_blank_line_separated() {
        let mut renderer = XhtmlRenderer;
        let mut out = String::new();
        renderer.paragraph(&mut out, "one");
        renderer.header(&mut out, "two", 2);
        assert_eq!(out, "<p>one</p>\n\n<h2>two</h2>\n");
    }

    #[test]
    fn image_without_title() {
        let mut renderer = XhtmlRenderer;
        let mut out = String::new();
        assert!(renderer.image(&mut out, "/a.png", None, "alt text"));
        assert_eq!(out, "<img src=\"/a.png\" alt=\"alt text\" />");
    }

    #[test]
    fn full_document_round_trip() {
        let mut renderer = XhtmlRenderer;
        let (text, refs) = crate::reference::collect_references("# Title\n\nSome *text*.\n");
        let mut out = String::new();
        crate::block::parse_block(&mut out, &mut renderer, &refs, &text);
        assert_eq!(out, "<h1>Title</h1>\n\n<p>Some <em>text</em>.</p>\n");
    }
}
