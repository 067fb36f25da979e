use crate::inline::parse_inline;
use crate::reference::ReferenceTable;
use crate::render::{ListFlags, Renderer};

/// A `[beg, end)` line span within the block being scanned, including its
/// trailing `\n` if any.
#[derive(Clone, Copy)]
struct Line {
    beg: usize,
    end: usize,
}

impl Line {
    fn text<'a>(&self, data: &'a str) -> &'a str {
        &data[self.beg..self.end]
    }
}

/// Returns the `[beg, end)` span of the next line starting at `beg`,
/// including its trailing `\n` when present.
fn next_line(data: &str, beg: usize) -> Line {
    let bytes = data.as_bytes();
    let end = match memchr::memchr(b'\n', &bytes[beg..]) {
        Some(offset) => beg + offset + 1,
        None => bytes.len(),
    };
    Line { beg, end }
}

fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b == b' ' || b == b'\t' || b == b'\n')
}

/// Horizontal rule: up to 3 leading spaces, then >=3 of the same one of
/// `*`, `-`, `_`, with only spaces/tabs interspersed for the rest of the line.
fn is_hrule(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 3 {
        return false;
    }
    let mut i = 0;
    while i < 3 && i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    if i + 2 >= bytes.len() || !matches!(bytes[i], b'*' | b'-' | b'_') {
        return false;
    }
    let c = bytes[i];
    let mut count = 0;
    while i < bytes.len() && bytes[i] != b'\n' {
        if bytes[i] == c {
            count += 1;
        } else if bytes[i] != b' ' && bytes[i] != b'\t' {
            return false;
        }
        i += 1;
    }
    count >= 3
}

/// Setext underline: a run of `=` (level 1) or `-` (level 2), then only
/// whitespace to end of line.
fn headerline_level(line: &str) -> Option<u8> {
    let bytes = line.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let (marker, level) = match bytes[0] {
        b'=' => (b'=', 1),
        b'-' => (b'-', 2),
        _ => return None,
    };
    let mut i = 1;
    while i < bytes.len() && bytes[i] == marker {
        i += 1;
    }
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] == b'\n' {
        Some(level)
    } else {
        None
    }
}

fn blockquote_prefix_len(line: &str) -> usize {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < 3 && i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'>' {
        if i + 1 < bytes.len() && (bytes[i + 1] == b' ' || bytes[i + 1] == b'\t') {
            i + 2
        } else {
            i + 1
        }
    } else {
        0
    }
}

fn code_prefix_len(line: &str) -> usize {
    let bytes = line.as_bytes();
    if !bytes.is_empty() && bytes[0] == b'\t' {
        return 1;
    }
    if bytes.len() > 3 && bytes[0] == b' ' && bytes[1] == b' ' && bytes[2] == b' ' && bytes[3] == b' ' {
        return 4;
    }
    0
}

/// Blank-line continuation prefix inside a list item: a tab, or up to 4 spaces.
fn li_prefix_len(line: &str) -> usize {
    let bytes = line.as_bytes();
    if !bytes.is_empty() && bytes[0] == b'\t' {
        return 1;
    }
    let mut i = 0;
    while i < 4 && i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    i
}

fn unordered_marker_len(line: &str) -> usize {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < 3 && i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    if i + 1 >= bytes.len() {
        return 0;
    }
    if !matches!(bytes[i], b'*' | b'+' | b'-') || !matches!(bytes[i + 1], b' ' | b'\t') {
        return 0;
    }
    i + 1
}

fn ordered_marker_len(line: &str) -> usize {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < 3 && i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    if i >= bytes.len() || !bytes[i].is_ascii_digit() {
        return 0;
    }
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i + 1 >= bytes.len() || bytes[i] != b'.' || !matches!(bytes[i + 1], b' ' | b'\t') {
        return 0;
    }
    i + 1
}

/// Drives block-level recognition over `data`, invoking `renderer`'s
/// block-level callbacks and appending rendered output to `out`.
pub fn parse_block(out: &mut String, renderer: &mut dyn Renderer, refs: &ReferenceTable, data: &str) {
    let mut beg = 0;
    let end = data.len();
    while beg < end {
        let rest = &data[beg..];
        if rest.as_bytes()[0] == b'#' {
            beg += parse_atx_header(out, renderer, refs, rest);
        } else if is_blank(next_line(rest, 0).text(rest)) {
            beg += next_line(rest, 0).end;
        } else if is_hrule(next_line(rest, 0).text(rest)) {
            renderer.hrule(out);
            beg += next_line(rest, 0).end;
        } else if blockquote_prefix_len(rest) > 0 {
            beg += parse_blockquote(out, renderer, refs, rest);
        } else if code_prefix_len(rest) > 0 {
            beg += parse_block_code(out, renderer, rest);
        } else if unordered_marker_len(rest) > 0 {
            beg += parse_list(out, renderer, refs, rest, ListFlags::empty());
        } else if ordered_marker_len(rest) > 0 {
            beg += parse_list(out, renderer, refs, rest, ListFlags::ORDERED);
        } else {
            beg += parse_paragraph(out, renderer, refs, rest);
        }
    }
}

fn parse_atx_header(out: &mut String, renderer: &mut dyn Renderer, _refs: &ReferenceTable, data: &str) -> usize {
    let bytes = data.as_bytes();
    let mut level = 0u8;
    while (level as usize) < bytes.len() && level < 6 && bytes[level as usize] == b'#' {
        level += 1;
    }
    let mut i = level as usize;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    let content_start = i;
    let mut line_end = i;
    while line_end < bytes.len() && bytes[line_end] != b'\n' {
        line_end += 1;
    }
    let skip = if line_end < bytes.len() { line_end + 1 } else { line_end };
    let mut content_end = line_end;
    while content_end > content_start && bytes[content_end - 1] == b'#' {
        content_end -= 1;
    }
    while content_end > content_start && matches!(bytes[content_end - 1], b' ' | b'\t') {
        content_end -= 1;
    }
    renderer.header(out, &data[content_start..content_end], level);
    skip
}

fn parse_blockquote(out: &mut String, renderer: &mut dyn Renderer, refs: &ReferenceTable, data: &str) -> usize {
    let mut beg = 0;
    let size = data.len();
    let mut inner = String::new();
    let mut consumed = 0;

    while beg < size {
        let line = next_line(data, beg);
        let text = line.text(data);
        let pre = blockquote_prefix_len(text);
        if pre > 0 {
            inner.push_str(&text[pre..]);
            beg = line.end;
        } else if is_blank(text) {
            let next = next_line(data, line.end);
            let next_text = next.text(data);
            if line.end >= size
                || (blockquote_prefix_len(next_text) == 0 && !is_blank(next_text) && !next_text.is_empty())
            {
                consumed = beg;
                break;
            }
            inner.push_str(text);
            beg = line.end;
        } else {
            inner.push_str(text);
            beg = line.end;
        }
        consumed = beg;
    }

    let mut body = String::new();
    parse_block(&mut body, renderer, refs, &inner);
    renderer.block_quote(out, &body);
    consumed
}

fn parse_block_code(out: &mut String, renderer: &mut dyn Renderer, data: &str) -> usize {
    let mut beg = 0;
    let size = data.len();
    let mut work = String::new();

    while beg < size {
        let line = next_line(data, beg);
        let text = line.text(data);
        let pre = code_prefix_len(text);
        if pre > 0 {
            crate::escape::escape_html(&mut work, &text[pre..]);
            beg = line.end;
        } else if is_blank(text) {
            crate::escape::escape_html(&mut work, text);
            beg = line.end;
        } else {
            break;
        }
    }

    while work.ends_with('\n') {
        work.pop();
    }
    work.push('\n');
    renderer.block_code(out, &work);
    beg
}

fn parse_list(
    out: &mut String,
    renderer: &mut dyn Renderer,
    refs: &ReferenceTable,
    data: &str,
    mut flags: ListFlags,
) -> usize {
    let mut i = 0;
    let size = data.len();
    let mut body = String::new();

    while i < size {
        let rest = &data[i..];
        let mut pre = ordered_marker_len(rest);
        if pre == 0 {
            pre = unordered_marker_len(rest);
        }
        if pre == 0 {
            break;
        }
        i += pre;
        i += parse_list_item(&mut body, renderer, refs, &data[i..], &mut flags);
    }

    renderer.list(out, &body, flags);
    i
}

fn parse_list_item(
    out: &mut String,
    renderer: &mut dyn Renderer,
    refs: &ReferenceTable,
    data: &str,
    flags: &mut ListFlags,
) -> usize {
    let mut beg = 0;
    let size = data.len();
    let mut work = String::new();

    while beg < size {
        let line = next_line(data, beg);
        let end = line.end;
        let text = line.text(data);

        if is_blank(text) && end < size {
            let next = next_line(data, end);
            let next_text = next.text(data);
            if !is_blank(next_text) {
                if ordered_marker_len(next_text) > 0 || unordered_marker_len(next_text) > 0 {
                    flags.insert(ListFlags::BLOCK_CONTENT);
                }
                if li_prefix_len(next_text) == 0 {
                    beg = end;
                    break;
                } else {
                    flags.insert(ListFlags::BLOCK_CONTENT);
                }
            }
        }

        let pre = li_prefix_len(text);
        let copy_beg = if pre > 0 {
            beg + pre
        } else if ordered_marker_len(text) > 0 || unordered_marker_len(text) > 0 {
            break;
        } else {
            beg
        };
        if copy_beg < end {
            work.push_str(&data[copy_beg..end]);
        }
        beg = end;
    }

    if flags.contains(ListFlags::BLOCK_CONTENT) {
        let mut rendered = String::new();
        parse_block(&mut rendered, renderer, refs, &work);
        renderer.list_item(out, &rendered, *flags);
    } else {
        let mut inline = String::new();
        parse_inline(&mut inline, renderer, refs, work.trim_end_matches('\n'));
        renderer.list_item(out, &inline, *flags);
    }
    beg
}

fn parse_paragraph(out: &mut String, renderer: &mut dyn Renderer, refs: &ReferenceTable, data: &str) -> usize {
    let size = data.len();
    let mut i = 0;
    let mut end = 0;
    let mut level = 0u8;

    while i < size {
        let line = next_line(data, i);
        end = line.end;
        let text = line.text(data);
        if is_blank(text) {
            break;
        }
        if let Some(found_level) = headerline_level(text) {
            level = found_level;
            break;
        }
        if data.as_bytes()[i] == b'#' || is_hrule(text) {
            end = i;
            break;
        }
        i = end;
    }

    let bytes = data.as_bytes();
    let mut body_end = i;
    while body_end > 0 && bytes[body_end - 1] == b'\n' {
        body_end -= 1;
    }

    if level == 0 {
        let mut text = String::new();
        parse_inline(&mut text, renderer, refs, &data[..body_end]);
        renderer.paragraph(out, &text);
    } else if body_end > 0 {
        let total = body_end;
        let mut pos = total - 1;
        while pos > 0 && bytes[pos] != b'\n' {
            pos -= 1;
        }
        let header_start = pos + 1;
        let mut preceding_end = pos;
        while preceding_end > 0 && bytes[preceding_end - 1] == b'\n' {
            preceding_end -= 1;
        }
        if preceding_end > 0 {
            let mut text = String::new();
            parse_inline(&mut text, renderer, refs, &data[..preceding_end]);
            renderer.paragraph(out, &text);
            renderer.header(out, &data[header_start..total], level);
        } else {
            renderer.header(out, &data[..total], level);
        }
    } else {
        renderer.header(out, "", level);
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xhtml::XhtmlRenderer;

    fn render(input: &str) -> String {
        let (text, refs) = crate::reference::collect_references(input);
        let mut renderer = XhtmlRenderer::default();
        let mut out = String::new();
        renderer.prolog(&mut out);
        parse_block(&mut out, &mut renderer, &refs, &text);
        renderer.epilog(&mut out);
        out
    }

    #[test]
    fn atx_header() {
        assert_eq!(render("# Hello\n"), "<h1>Hello</h1>\n");
    }

    #[test]
    fn hrule_between_paragraphs() {
        let out = render("foo\n\n---\n\nbar\n");
        assert!(out.contains("<hr />\n"));
    }

    #[test]
    fn setext_header_level_two() {
        assert_eq!(render("Title\n---\n"), "<h2>Title</h2>\n");
    }

    #[test]
    fn blockquote_of_blank_lines_is_empty() {
        assert_eq!(render("> \n> \n"), "<blockquote>\n</blockquote>\n");
    }

    #[test]
    fn indented_code_block() {
        assert_eq!(render("    code\n"), "<pre><code>code\n</code></pre>\n");
    }
}
