use crate::escape::{escape_attribute, escape_html};
use crate::reference::ReferenceTable;
use crate::render::{AutolinkKind, Renderer};

/// Local mirror of [`AutolinkKind`] plus a "not an autolink" state, used only
/// while classifying a `<...>` tag before it's known to be one at all.
#[derive(Clone, Copy, PartialEq, Eq)]
enum TagKind {
    NotAutolink,
    Normal,
    Email,
    ImplicitEmail,
}

/// Which ASCII bytes the inline scanner should stop the plain-text run for
/// and dispatch to a handler, derived once per render from the renderer's
/// declared capabilities.
pub(crate) struct ActiveBytes([bool; 256]);

impl ActiveBytes {
    pub(crate) fn for_renderer(renderer: &dyn Renderer) -> Self {
        let mut table = [false; 256];
        if renderer.supports_emphasis()
            || renderer.supports_double_emphasis()
            || renderer.supports_triple_emphasis()
        {
            for &b in renderer.emphasis_chars() {
                table[b as usize] = true;
            }
        }
        if renderer.supports_codespan() {
            table[b'`' as usize] = true;
        }
        if renderer.supports_linebreak() {
            table[b'\n' as usize] = true;
        }
        if renderer.supports_link() || renderer.supports_image() {
            table[b'[' as usize] = true;
        }
        table[b'<' as usize] = true;
        table[b'>' as usize] = true;
        table[b'&' as usize] = true;
        table[b'\\' as usize] = true;
        ActiveBytes(table)
    }

    fn is_active(&self, byte: u8) -> bool {
        self.0[byte as usize]
    }
}

/// Parses `data` as an inline span, appending rendered output to `out`.
pub fn parse_inline(out: &mut String, renderer: &mut dyn Renderer, refs: &ReferenceTable, data: &str) {
    let table = ActiveBytes::for_renderer(renderer);
    parse_inline_with_table(out, renderer, refs, data, &table);
}

fn parse_inline_with_table(
    out: &mut String,
    renderer: &mut dyn Renderer,
    refs: &ReferenceTable,
    data: &str,
    table: &ActiveBytes,
) {
    let bytes = data.as_bytes();
    let size = bytes.len();
    let mut i = 0;

    while i < size {
        let mut end = i;
        while end < size && !table.is_active(bytes[end]) {
            end += 1;
        }
        if end > i {
            renderer.normal_text(out, &data[i..end]);
        }
        if end >= size {
            break;
        }
        i = end;

        let consumed = dispatch(out, renderer, refs, data, i, table);
        if consumed == 0 {
            // No handler matched; emit the byte verbatim and move on. The
            // byte is plain ASCII punctuation, so pushing it as a char is
            // always a valid UTF-8 boundary.
            out.push(bytes[i] as char);
            i += 1;
        } else {
            i += consumed;
        }
    }
}

/// Dispatches the active byte at `data[pos]` to its handler, returning the
/// number of bytes consumed (0 meaning "not actually a match here").
fn dispatch(
    out: &mut String,
    renderer: &mut dyn Renderer,
    refs: &ReferenceTable,
    data: &str,
    pos: usize,
    table: &ActiveBytes,
) -> usize {
    let bytes = data.as_bytes();
    match bytes[pos] {
        b'\\' => char_escape(out, &data[pos..]),
        b'&' => char_entity(out, &data[pos..]),
        b'<' => char_langle(out, renderer, &data[pos..]),
        b'>' => {
            out.push_str("&gt;");
            1
        }
        b'`' if renderer.supports_codespan() => char_codespan(out, renderer, &data[pos..]),
        b'\n' if renderer.supports_linebreak() => char_linebreak(out, renderer, data, pos),
        b'[' if renderer.supports_link() || renderer.supports_image() => {
            char_link(out, renderer, refs, data, pos, table)
        }
        c if renderer.emphasis_chars().contains(&c)
            && (renderer.supports_emphasis()
                || renderer.supports_double_emphasis()
                || renderer.supports_triple_emphasis()) =>
        {
            char_emphasis(out, renderer, refs, &data[pos..], c, table)
        }
        _ => 0,
    }
}

fn char_escape(out: &mut String, data: &str) -> usize {
    match data[1..].chars().next() {
        Some(c) => {
            let mut buf = [0u8; 4];
            escape_html(out, c.encode_utf8(&mut buf));
            1 + c.len_utf8()
        }
        None => 1,
    }
}

/// `&#?[A-Za-z0-9]+;` is trusted verbatim; anything else gets `&` escaped.
fn char_entity(out: &mut String, data: &str) -> usize {
    let bytes = data.as_bytes();
    let mut end = 1;
    if end < bytes.len() && bytes[end] == b'#' {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
        end += 1;
    }
    out.push('&');
    if end >= bytes.len() || bytes[end] != b';' {
        out.push_str("amp;");
    }
    1
}

fn char_langle(out: &mut String, renderer: &mut dyn Renderer, data: &str) -> usize {
    if !renderer.supports_autolink() && !renderer.supports_raw_html_tag() {
        out.push_str("&lt;");
        return 1;
    }

    let (end, kind) = tag_length(data);
    if end == 0 {
        out.push_str("&lt;");
        return 1;
    }
    if renderer.supports_autolink() && kind != TagKind::NotAutolink {
        let mut link = String::new();
        escape_attribute(&mut link, &data[1..end - 1]);
        let kind = match kind {
            TagKind::NotAutolink => unreachable!(),
            TagKind::Normal => AutolinkKind::Normal,
            TagKind::Email => AutolinkKind::Email,
            TagKind::ImplicitEmail => AutolinkKind::ImplicitEmail,
        };
        if renderer.autolink(out, &link, kind) {
            return end;
        }
    }
    if renderer.supports_raw_html_tag() && renderer.raw_html_tag(out, &data[..end]) {
        return end;
    }
    end
}

/// Returns the length of the tag starting at `data[0]` (0 if invalid), and
/// what kind of autolink it is, if any.
fn tag_length(data: &str) -> (usize, TagKind) {
    let bytes = data.as_bytes();
    let size = bytes.len();
    if size < 3 || bytes[0] != b'<' {
        return (0, TagKind::NotAutolink);
    }
    let mut i = if bytes[1] == b'/' { 2 } else { 1 };
    if i >= size || !bytes[i].is_ascii_alphabetic() {
        return (0, TagKind::NotAutolink);
    }

    let mut autolink = TagKind::NotAutolink;
    if size > 6
        && data[1..].to_ascii_lowercase().starts_with("http")
        && (bytes[5] == b':' || ((bytes[5] == b's' || bytes[5] == b'S') && bytes[6] == b':'))
    {
        i = if bytes[5] == b':' { 6 } else { 7 };
        autolink = TagKind::Normal;
    } else if size > 5 && data[1..5].eq_ignore_ascii_case("ftp:") {
        i = 5;
        autolink = TagKind::Normal;
    } else if size > 7 && data[1..8].eq_ignore_ascii_case("mailto:") {
        i = 8;
    }

    if i >= size || bytes[i] == b'>' {
        autolink = TagKind::NotAutolink;
    } else if autolink != TagKind::NotAutolink {
        let j = i;
        while i < size && !matches!(bytes[i], b'>' | b'\'' | b'"' | b' ' | b'\t') {
            i += 1;
        }
        if i >= size {
            return (0, TagKind::NotAutolink);
        }
        if i > j && bytes[i] == b'>' {
            return (i + 1, autolink);
        }
        autolink = TagKind::NotAutolink;
    } else if let Some(mail_len) = is_mail_autolink(&data[i..]) {
        let kind = if i == 8 {
            TagKind::Email
        } else {
            TagKind::ImplicitEmail
        };
        return (i + mail_len, kind);
    }

    while i < size && bytes[i] != b'>' {
        i += 1;
    }
    if i >= size {
        (0, TagKind::NotAutolink)
    } else {
        (i + 1, TagKind::NotAutolink)
    }
}

/// address is assumed to be `[-@._a-zA-Z0-9]+` with exactly one `@`.
fn is_mail_autolink(data: &str) -> Option<usize> {
    let bytes = data.as_bytes();
    let mut i = 0;
    let mut at_count = 0;
    while i < bytes.len()
        && matches!(bytes[i], b'-' | b'.' | b'_' | b'@' | b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9')
    {
        if bytes[i] == b'@' {
            at_count += 1;
        }
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'>' || at_count != 1 {
        None
    } else {
        Some(i + 1)
    }
}

fn char_codespan(out: &mut String, renderer: &mut dyn Renderer, data: &str) -> usize {
    let bytes = data.as_bytes();
    let size = bytes.len();
    let mut nb = 0;
    while nb < size && bytes[nb] == b'`' {
        nb += 1;
    }

    let mut end = nb;
    let mut run = 0;
    while end < size && run < nb {
        if bytes[end] == b'`' {
            run += 1;
        } else {
            run = 0;
        }
        end += 1;
    }
    if run < nb {
        return 0; // no matching closing delimiter
    }

    let mut f_begin = nb;
    while f_begin < end && matches!(bytes[f_begin], b' ' | b'\t') {
        f_begin += 1;
    }
    let mut f_end = end - nb;
    while f_end > nb && matches!(bytes[f_end - 1], b' ' | b'\t') {
        f_end -= 1;
    }

    let mut content = String::new();
    if f_begin < f_end {
        escape_html(&mut content, &data[f_begin..f_end]);
    }
    if renderer.code_span(out, &content) {
        end
    } else {
        0
    }
}

fn char_linebreak(out: &mut String, renderer: &mut dyn Renderer, data: &str, pos: usize) -> usize {
    let bytes = data.as_bytes();
    if pos < 2 || bytes[pos - 1] != b' ' || bytes[pos - 2] != b' ' {
        return 0;
    }
    if out.ends_with(' ') {
        out.pop();
    }
    renderer.linebreak(out);
    1
}

fn char_emphasis(
    out: &mut String,
    renderer: &mut dyn Renderer,
    refs: &ReferenceTable,
    data: &str,
    c: u8,
    table: &ActiveBytes,
) -> usize {
    let bytes = data.as_bytes();
    let size = bytes.len();

    if size > 2 && bytes[1] != c {
        if matches!(bytes[1], b' ' | b'\t' | b'\n') {
            return 0;
        }
        let ret = parse_emph1(out, renderer, refs, &data[1..], c, table);
        if ret == 0 {
            return 0;
        }
        return ret + 1;
    }
    if size > 3 && bytes[1] == c && bytes[2] != c {
        if matches!(bytes[2], b' ' | b'\t' | b'\n') {
            return 0;
        }
        let ret = parse_emph2(out, renderer, refs, &data[2..], c, table);
        if ret == 0 {
            return 0;
        }
        return ret + 2;
    }
    if size > 4 && bytes[1] == c && bytes[2] == c && bytes[3] != c {
        if matches!(bytes[3], b' ' | b'\t' | b'\n') {
            return 0;
        }
        let ret = parse_emph3(out, renderer, refs, &data[3..], c, table);
        if ret == 0 {
            return 0;
        }
        return ret + 3;
    }
    0
}

/// Looks for the next occurrence of `c`, skipping over code spans and link
/// constructs so emphasis never straddles them. Mirrors the source
/// algorithm's pointer arithmetic directly: the search always starts one
/// byte in, since callers have already established that byte 0 isn't the
/// closer being looked for.
fn find_emph_char(data: &[u8], c: u8) -> usize {
    let size = data.len();
    let mut i = 1;

    while i < size {
        while i < size && data[i] != c && data[i] != b'`' && data[i] != b'[' {
            i += 1;
        }
        if i >= size {
            return 0;
        }
        if data[i] == c {
            return i;
        }

        if data[i - 1] == b'\\' {
            i += 1;
            continue;
        }

        if data[i] == b'`' {
            let mut tmp_i = 0;
            i += 1;
            while i < size && data[i] != b'`' {
                if tmp_i == 0 && data[i] == c {
                    tmp_i = i;
                }
                i += 1;
            }
            if i >= size {
                return tmp_i;
            }
            i += 1;
        } else if data[i] == b'[' {
            let mut tmp_i = 0;
            i += 1;
            while i < size && data[i] != b']' {
                if tmp_i == 0 && data[i] == c {
                    tmp_i = i;
                }
                i += 1;
            }
            i += 1;
            while i < size && matches!(data[i], b' ' | b'\t' | b'\n') {
                i += 1;
            }
            if i >= size {
                return tmp_i;
            }
            if data[i] != b'[' && data[i] != b'(' {
                if tmp_i != 0 {
                    return tmp_i;
                } else {
                    continue;
                }
            }
            let cc = data[i];
            i += 1;
            while i < size && data[i] != cc {
                if tmp_i == 0 && data[i] == c {
                    tmp_i = i;
                }
                i += 1;
            }
            if i >= size {
                return tmp_i;
            }
            i += 1;
        }
    }
    0
}

fn parse_emph1(
    out: &mut String,
    renderer: &mut dyn Renderer,
    refs: &ReferenceTable,
    data: &str,
    c: u8,
    table: &ActiveBytes,
) -> usize {
    if !renderer.supports_emphasis() {
        return 0;
    }
    let bytes = data.as_bytes();
    let size = bytes.len();
    let mut i = 0;
    // Skipping one symbol if coming from emph3.
    if size > 1 && bytes[0] == c && bytes[1] == c {
        i = 1;
    }

    while i < size {
        let len = find_emph_char(&bytes[i..], c);
        if len == 0 {
            return 0;
        }
        i += len;
        if i >= size {
            return 0;
        }

        if i + 1 < size && bytes[i + 1] == c {
            i += 1;
            continue;
        }
        if bytes[i] == c && !matches!(bytes[i - 1], b' ' | b'\t' | b'\n') {
            let mut work = String::new();
            parse_inline_with_table(&mut work, renderer, refs, &data[..i], table);
            if renderer.emphasis(out, &work, c) {
                return i + 1;
            }
            return 0;
        }
    }
    0
}

fn parse_emph2(
    out: &mut String,
    renderer: &mut dyn Renderer,
    refs: &ReferenceTable,
    data: &str,
    c: u8,
    table: &ActiveBytes,
) -> usize {
    if !renderer.supports_double_emphasis() {
        return 0;
    }
    let bytes = data.as_bytes();
    let size = bytes.len();
    let mut i = 0;

    while i < size {
        let len = find_emph_char(&bytes[i..], c);
        if len == 0 {
            return 0;
        }
        i += len;
        if i + 1 < size
            && bytes[i] == c
            && bytes[i + 1] == c
            && i > 0
            && !matches!(bytes[i - 1], b' ' | b'\t' | b'\n')
        {
            let mut work = String::new();
            parse_inline_with_table(&mut work, renderer, refs, &data[..i], table);
            if renderer.double_emphasis(out, &work, c) {
                return i + 2;
            }
            return 0;
        }
        i += 1;
    }
    0
}

fn parse_emph3(
    out: &mut String,
    renderer: &mut dyn Renderer,
    refs: &ReferenceTable,
    data: &str,
    c: u8,
    table: &ActiveBytes,
) -> usize {
    let bytes = data.as_bytes();
    let size = bytes.len();
    let mut i = 0;

    while i < size {
        let len = find_emph_char(&bytes[i..], c);
        if len == 0 {
            return 0;
        }
        i += len;

        if bytes[i] != c || matches!(bytes[i - 1], b' ' | b'\t' | b'\n') {
            continue;
        }

        if i + 2 < size && bytes[i + 1] == c && bytes[i + 2] == c && renderer.supports_triple_emphasis() {
            let mut work = String::new();
            parse_inline_with_table(&mut work, renderer, refs, &data[..i], table);
            if renderer.triple_emphasis(out, &work, c) {
                return i + 3;
            }
            return 0;
        } else if i + 1 < size && bytes[i + 1] == c {
            // Double symbol found, handing over to emph1 on a widened span
            // that includes the two bytes just consumed as the opener.
            return parse_emph1_widened(out, renderer, refs, data, c, table, 2);
        } else {
            // Single symbol found, handing over to emph2, widened by one.
            return parse_emph1_widened(out, renderer, refs, data, c, table, 1);
        }
    }
    0
}

/// `parse_emph3`'s delegation re-parses from `widen` bytes before the
/// current position (mirroring the source's `data - 2`/`data - 1` pointer
/// rewinds) and, on success, reports a length relative to the original
/// (non-widened) start.
fn parse_emph1_widened(
    out: &mut String,
    renderer: &mut dyn Renderer,
    refs: &ReferenceTable,
    data: &str,
    c: u8,
    table: &ActiveBytes,
    widen: usize,
) -> usize {
    // `data` already begins exactly `widen` bytes after the two/one
    // already-consumed opening symbols that emph3 peeled off before calling
    // char_emphasis; reconstructing that earlier window requires the
    // original full span, which the caller (char_emphasis) sliced starting
    // after the outer delimiter run. We rebuild it by walking back `widen`
    // bytes into the delimiter run itself, which is always the same byte.
    let mut rewound = String::with_capacity(widen + data.len());
    for _ in 0..widen {
        rewound.push(c as char);
    }
    rewound.push_str(data);
    let len = if widen == 2 {
        parse_emph1(out, renderer, refs, &rewound, c, table)
    } else {
        parse_emph2(out, renderer, refs, &rewound, c, table)
    };
    if len == 0 {
        0
    } else {
        len - widen
    }
}

fn char_link(
    out: &mut String,
    renderer: &mut dyn Renderer,
    refs: &ReferenceTable,
    data: &str,
    pos: usize,
    table: &ActiveBytes,
) -> usize {
    let is_img = pos > 0 && data.as_bytes()[pos - 1] == b'!';
    if (is_img && !renderer.supports_image()) || (!is_img && !renderer.supports_link()) {
        return 0;
    }

    let span = &data[pos..];
    let bytes = span.as_bytes();
    let size = bytes.len();
    let mut i = 1;

    while i < size && (bytes[i] != b']' || bytes[i - 1] == b'\\') {
        i += 1;
    }
    if i >= size {
        return 0;
    }
    let txt_e = i;
    i += 1;

    while i < size && matches!(bytes[i], b' ' | b'\t' | b'\n') {
        i += 1;
    }
    if i >= size {
        return 0;
    }

    let mut link: Option<String> = None;
    let mut title: Option<String> = None;

    if bytes[i] == b'(' {
        i += 1;
        while i < size && matches!(bytes[i], b' ' | b'\t') {
            i += 1;
        }
        let link_b = i;
        let mut link_e;

        while i < size && !matches!(bytes[i], b'\'' | b'"' | b')') {
            i += 1;
        }
        if i >= size {
            return 0;
        }
        link_e = i;

        let mut title_b = 0;
        let mut title_e = 0;
        if matches!(bytes[i], b'\'' | b'"') {
            i += 1;
            title_b = i;
            while i < size && !matches!(bytes[i], b'\'' | b'"' | b')') {
                i += 1;
            }
            if i >= size {
                return 0;
            }
            if bytes[i] == b')' {
                title_b = 0;
                link_e = i;
            } else {
                title_e = i;
                i += 1;
                while i < size && matches!(bytes[i], b' ' | b'\t') {
                    i += 1;
                }
                if i >= size || bytes[i] != b')' {
                    return 0;
                }
            }
        }

        let mut link_e_trimmed = link_e;
        while link_e_trimmed > link_b && matches!(bytes[link_e_trimmed - 1], b' ' | b'\t') {
            link_e_trimmed -= 1;
        }

        if link_e_trimmed > link_b {
            let mut escaped = String::new();
            escape_attribute(&mut escaped, &span[link_b..link_e_trimmed]);
            link = Some(escaped);
        }
        if title_e > title_b {
            let mut escaped = String::new();
            escape_attribute(&mut escaped, &span[title_b..title_e]);
            title = Some(escaped);
        }
        i += 1;
    } else if bytes[i] == b'[' {
        i += 1;
        let link_b = i;
        while i < size && bytes[i] != b']' {
            i += 1;
        }
        if i >= size {
            return 0;
        }
        let link_e = i;

        let id = if link_b == link_e {
            &span[1..txt_e]
        } else {
            &span[link_b..link_e]
        };
        let Some(reference) = refs.lookup(id) else {
            return 0;
        };
        link = Some(reference.link.as_str().to_string());
        title = reference.title.as_ref().map(|t| t.as_str().to_string());
        i += 1;
    } else {
        return 0;
    }

    let mut content = String::new();
    if txt_e > 1 {
        if is_img {
            escape_attribute(&mut content, &span[1..txt_e]);
        } else {
            parse_inline_with_table(&mut content, renderer, refs, &span[1..txt_e], table);
        }
    }

    if is_img {
        if out.ends_with('!') {
            out.pop();
        }
        renderer.image(out, link.as_deref().unwrap_or(""), title.as_deref(), &content);
    } else {
        renderer.link(out, link.as_deref().unwrap_or(""), title.as_deref(), &content);
    }

    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xhtml::XhtmlRenderer;

    fn render(input: &str) -> String {
        let (text, refs) = crate::reference::collect_references(input);
        let mut renderer = XhtmlRenderer::default();
        let mut out = String::new();
        parse_inline(&mut out, &mut renderer, &refs, text.trim_end_matches('\n'));
        out
    }

    #[test]
    fn simple_emphasis() {
        assert_eq!(render("foo *bar* baz"), "foo <em>bar</em> baz");
    }

    #[test]
    fn double_emphasis() {
        assert_eq!(render("**bold**"), "<strong>bold</strong>");
    }

    #[test]
    fn triple_emphasis() {
        assert_eq!(render("***x***"), "<strong><em>x</em></strong>");
    }

    #[test]
    fn emphasis_with_leading_space_is_literal() {
        assert_eq!(render("* bar*"), "* bar*");
    }

    #[test]
    fn code_span_trims_and_escapes() {
        assert_eq!(render("` <b> `"), "<code>&lt;b&gt;</code>");
    }

    #[test]
    fn unmatched_code_span_is_literal() {
        assert_eq!(render("`abc"), "`abc");
    }

    #[test]
    fn entity_passthrough() {
        assert_eq!(render("&amp;"), "&amp;");
    }

    #[test]
    fn bare_ampersand_is_escaped() {
        assert_eq!(render("a & b"), "a &amp; b");
    }

    #[test]
    fn autolink_url() {
        assert_eq!(
            render("<http://example.com>"),
            "<a href=\"http://example.com\">http://example.com</a>"
        );
    }

    #[test]
    fn unclosed_link_bracket_is_literal() {
        assert_eq!(render("[no closing"), "[no closing");
    }
}
