use crate::text::SharedText;
use crate::escape::escape_attribute;

/// A single `[id]: link "title"` definition.
#[derive(Clone, Debug)]
pub struct LinkReference {
    pub id: SharedText,
    pub link: SharedText,
    pub title: Option<SharedText>,
}

/// The table of link references collected from a document's first pass.
///
/// Kept sorted by `id` (case-insensitive) so lookups are a binary search.
/// Insertion is first-wins: a later definition of an id already present is
/// recognized (and its line consumed) but does not replace the stored entry.
#[derive(Clone, Debug, Default)]
pub struct ReferenceTable {
    entries: Vec<LinkReference>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        ReferenceTable { entries: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, id: &str) -> Option<&LinkReference> {
        self.entries
            .binary_search_by(|entry| ascii_casecmp(&entry.id, id))
            .ok()
            .map(|index| &self.entries[index])
    }

    fn insert(&mut self, id: &str, link: &str, title: Option<&str>) {
        if id.is_empty() {
            return;
        }
        match self
            .entries
            .binary_search_by(|entry| ascii_casecmp(&entry.id, id))
        {
            Ok(_) => {} // first-wins: keep the existing entry
            Err(pos) => {
                let mut escaped_link = String::with_capacity(link.len());
                escape_attribute(&mut escaped_link, link);
                let escaped_title = title.map(|title| {
                    let mut buf = String::with_capacity(title.len());
                    escape_attribute(&mut buf, title);
                    SharedText::from(buf)
                });
                self.entries.insert(
                    pos,
                    LinkReference {
                        id: SharedText::from(id),
                        link: SharedText::from(escaped_link),
                        title: escaped_title,
                    },
                );
            }
        }
    }
}

fn ascii_casecmp(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase())
}

/// Splits `input` into a cleaned text buffer (line endings normalized to a
/// single `\n`, link-reference definition lines removed) and the table of
/// references those lines defined.
///
/// Mixed CR, LF, and CRLF terminators are all accepted: CRLF collapses to one
/// `\n`; a lone CR or LF each produce one `\n`; a CR immediately following an
/// LF is treated as belonging to the same terminator and does not produce an
/// extra blank line.
pub fn collect_references(input: &str) -> (String, ReferenceTable) {
    let bytes = input.as_bytes();
    let end = bytes.len();
    let mut refs = ReferenceTable::new();
    let mut text = String::with_capacity(input.len());

    let mut beg = 0;
    while beg < end {
        if let Some(consumed) = try_parse_reference(bytes, beg, end, &mut refs) {
            beg = consumed;
            continue;
        }

        let mut line_end = beg;
        while line_end < end && bytes[line_end] != b'\n' && bytes[line_end] != b'\r' {
            line_end += 1;
        }
        if line_end > beg {
            text.push_str(&input[beg..line_end]);
        }

        let mut terminator_end = line_end;
        while terminator_end < end
            && (bytes[terminator_end] == b'\n' || bytes[terminator_end] == b'\r')
        {
            if bytes[terminator_end] == b'\n'
                || (terminator_end + 1 < end && bytes[terminator_end + 1] != b'\n')
            {
                text.push('\n');
            }
            terminator_end += 1;
        }
        beg = terminator_end;
    }

    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }

    (text, refs)
}

/// Attempts to recognize a link-reference definition starting at `beg`.
/// Returns the offset just past the definition (and records it into `refs`)
/// on success, or `None` if `beg` does not start one.
fn try_parse_reference(
    data: &[u8],
    beg: usize,
    end: usize,
    refs: &mut ReferenceTable,
) -> Option<usize> {
    let mut i = beg;

    // Up to 3 optional leading spaces.
    while i < beg + 3 && i < end && data[i] == b' ' {
        i += 1;
    }
    if i >= end || i >= beg + 3 || data[i] != b'[' {
        return None;
    }
    i += 1;
    let id_offset = i;
    while i < end && data[i] != b'\n' && data[i] != b'\r' && data[i] != b']' {
        i += 1;
    }
    if i >= end || data[i] != b']' {
        return None;
    }
    let id_end = i;

    i += 1;
    if i >= end || data[i] != b':' {
        return None;
    }
    i += 1;
    while i < end && (data[i] == b' ' || data[i] == b'\t') {
        i += 1;
    }
    if i < end && (data[i] == b'\n' || data[i] == b'\r') {
        i += 1;
        if i < end && data[i] == b'\r' && data[i - 1] == b'\n' {
            i += 1;
        }
    }
    while i < end && (data[i] == b' ' || data[i] == b'\t') {
        i += 1;
    }
    if i >= end {
        return None;
    }

    // Link: whitespace-free, optionally angle-bracketed.
    if data[i] == b'<' {
        i += 1;
    }
    let link_offset = i;
    while i < end && data[i] != b' ' && data[i] != b'\t' && data[i] != b'\n' && data[i] != b'\r' {
        i += 1;
    }
    let link_end = if i > link_offset && data[i - 1] == b'>' {
        i - 1
    } else {
        i
    };

    while i < end && (data[i] == b' ' || data[i] == b'\t') {
        i += 1;
    }
    if i < end
        && data[i] != b'\n'
        && data[i] != b'\r'
        && data[i] != b'\''
        && data[i] != b'"'
        && data[i] != b'('
    {
        return None;
    }

    let mut line_end = 0;
    if i >= end || data[i] == b'\r' || data[i] == b'\n' {
        line_end = i;
    }
    if i + 1 < end && data[i] == b'\n' && data[i + 1] == b'\r' {
        line_end = i + 1;
    }

    if line_end != 0 {
        i = line_end + 1;
        while i < end && (data[i] == b' ' || data[i] == b'\t') {
            i += 1;
        }
    }

    let mut title_offset = 0;
    let mut title_end = 0;
    if i + 1 < end && matches!(data[i], b'\'' | b'"' | b'(') {
        i += 1;
        title_offset = i;
        while i < end && data[i] != b'\n' && data[i] != b'\r' {
            i += 1;
        }
        if i + 1 < end && data[i] == b'\n' && data[i + 1] == b'\r' {
            title_end = i + 1;
        } else {
            title_end = i;
        }
        // Step back over trailing whitespace looking for the closing delimiter.
        if i > 0 {
            i -= 1;
        }
        while i > title_offset && (data[i] == b' ' || data[i] == b'\t') {
            i -= 1;
        }
        if i > title_offset && matches!(data[i], b'\'' | b'"' | b')') {
            line_end = title_end;
            title_end = i;
        }
    }
    if line_end == 0 {
        return None; // garbage after the link
    }

    let id = std::str::from_utf8(&data[id_offset..id_end]).ok()?;
    let link = std::str::from_utf8(&data[link_offset..link_end]).ok()?;
    let title = if title_end > title_offset {
        std::str::from_utf8(&data[title_offset..title_end]).ok()
    } else {
        None
    };

    refs.insert(id, link, title);
    Some(line_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_a_simple_reference() {
        let (text, refs) = collect_references("[x][id]\n\n[id]: http://example.com \"t\"\n");
        assert_eq!(text, "[x][id]\n\n");
        let entry = refs.lookup("id").expect("reference should be collected");
        assert_eq!(entry.link.as_str(), "http://example.com");
        assert_eq!(entry.title.as_deref(), Some("t"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let (_, refs) = collect_references("[Foo]: /bar\n");
        assert!(refs.lookup("foo").is_some());
        assert!(refs.lookup("FOO").is_some());
    }

    #[test]
    fn first_definition_wins() {
        let (_, refs) = collect_references("[id]: /first\n[id]: /second\n");
        assert_eq!(refs.lookup("id").unwrap().link.as_str(), "/first");
    }

    #[test]
    fn crlf_and_lone_cr_normalize_to_single_newlines() {
        let (text, _) = collect_references("a\r\nb\rc\nd");
        assert_eq!(text, "a\nb\nc\nd\n");
    }

    #[test]
    fn angle_bracketed_link_strips_brackets() {
        let (_, refs) = collect_references("[id]: <http://example.com>\n");
        assert_eq!(refs.lookup("id").unwrap().link.as_str(), "http://example.com");
    }
}
