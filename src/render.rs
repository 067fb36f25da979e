use bitflags::bitflags;

bitflags! {
    /// Flags describing how a list or list item was recognized.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ListFlags: u8 {
        /// The list uses ordered (`1.`) markers rather than bullet markers.
        const ORDERED = 0b01;
        /// At least one item in the list is separated from its siblings by
        /// a blank line followed by another list marker, so every item's
        /// body is block-parsed rather than treated as a single inline run.
        const BLOCK_CONTENT = 0b10;
    }
}

/// What kind of autolink an inline `<...>` span resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutolinkKind {
    /// A `scheme:...` URL, e.g. `<http://example.com>`.
    Normal,
    /// An explicit `<mailto:user@host>` address.
    Email,
    /// A bare `<user@host>` address with no `mailto:` prefix.
    ImplicitEmail,
}

/// The capability table a parse is driven against.
///
/// Every method has a default "not supported" body: returning `false` from a
/// span-level method means the construct was declined and the parser falls
/// back to emitting it literally; block-level methods default to doing
/// nothing ahead of rendering their content (which is already correct for
/// constructs this dialect never recognizes, like raw HTML blocks).
///
/// `emphasis_chars` is the one piece of renderer-level configuration the
/// parser itself needs; anything else a concrete renderer wants to track
/// (document metadata, accumulated state) it simply holds as its own fields,
/// since there is no need for an opaque user-data parameter in a language
/// with closures and owned structs.
pub trait Renderer {
    /// Bytes that act as emphasis delimiters. An empty slice disables
    /// emphasis parsing entirely.
    fn emphasis_chars(&self) -> &[u8] {
        b"*_"
    }

    fn supports_emphasis(&self) -> bool {
        false
    }

    fn supports_double_emphasis(&self) -> bool {
        false
    }

    fn supports_triple_emphasis(&self) -> bool {
        false
    }

    fn supports_codespan(&self) -> bool {
        false
    }

    fn supports_linebreak(&self) -> bool {
        false
    }

    fn supports_link(&self) -> bool {
        false
    }

    fn supports_image(&self) -> bool {
        false
    }

    fn supports_autolink(&self) -> bool {
        false
    }

    fn supports_raw_html_tag(&self) -> bool {
        false
    }

    fn prolog(&mut self, _out: &mut String) {}

    fn epilog(&mut self, _out: &mut String) {}

    fn block_code(&mut self, _out: &mut String, _text: &str) {}

    fn block_quote(&mut self, _out: &mut String, _text: &str) {}

    fn block_html(&mut self, _out: &mut String, _text: &str) {}

    fn header(&mut self, _out: &mut String, _text: &str, _level: u8) {}

    fn hrule(&mut self, _out: &mut String) {}

    fn list(&mut self, _out: &mut String, _text: &str, _flags: ListFlags) {}

    fn list_item(&mut self, _out: &mut String, _text: &str, _flags: ListFlags) {}

    fn paragraph(&mut self, _out: &mut String, _text: &str) {}

    fn autolink(&mut self, _out: &mut String, _link: &str, _kind: AutolinkKind) -> bool {
        false
    }

    fn code_span(&mut self, _out: &mut String, _text: &str) -> bool {
        false
    }

    fn emphasis(&mut self, _out: &mut String, _text: &str, _delimiter: u8) -> bool {
        false
    }

    fn double_emphasis(&mut self, _out: &mut String, _text: &str, _delimiter: u8) -> bool {
        false
    }

    fn triple_emphasis(&mut self, _out: &mut String, _text: &str, _delimiter: u8) -> bool {
        false
    }

    fn image(&mut self, _out: &mut String, _link: &str, _title: Option<&str>, _alt: &str) -> bool {
        false
    }

    fn linebreak(&mut self, _out: &mut String) -> bool {
        false
    }

    fn link(&mut self, _out: &mut String, _link: &str, _title: Option<&str>, _content: &str) -> bool {
        false
    }

    fn raw_html_tag(&mut self, _out: &mut String, _tag_text: &str) -> bool {
        false
    }

    /// Called for runs of plain text instead of a direct append, letting a
    /// renderer apply its own text escaping (e.g. manpage hyphen escaping).
    /// The default escapes nothing beyond what the caller already did.
    fn normal_text(&mut self, out: &mut String, text: &str) {
        out.push_str(text);
    }
}
