use crate::render::{AutolinkKind, ListFlags, Renderer};

/// Document metadata a manpage needs that HTML renderers have no use for:
/// title (`.Dt`), date (`.Dd`), and section number. Carried as owned fields
/// on the renderer itself rather than threaded through an opaque pointer,
/// since every callback here is already a method with `&mut self`.
pub struct ManRenderer {
    pub title: String,
    pub date: String,
    pub section: u32,
}

fn separate(out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
}

/// Escapes `-` as `\-`, the only substitution mandoc needs from plain text;
/// everything else is passed through untouched.
fn man_text_escape(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == '-' {
            out.push_str("\\-");
        } else {
            out.push(c);
        }
    }
}

impl Renderer for ManRenderer {
    fn supports_double_emphasis(&self) -> bool {
        true
    }

    fn supports_emphasis(&self) -> bool {
        true
    }

    fn supports_codespan(&self) -> bool {
        true
    }

    fn supports_linebreak(&self) -> bool {
        true
    }

    fn prolog(&mut self, out: &mut String) {
        out.push_str(".\\\" Generated by soldown-man\n");
        out.push_str(".Dd ");
        out.push_str(&self.date);
        out.push_str("\n.Dt ");
        out.push_str(&self.title);
        out.push(' ');
        out.push_str(&self.section.to_string());
        out.push_str("\n.Os");
    }

    fn epilog(&mut self, out: &mut String) {
        out.push('\n');
    }

    fn block_code(&mut self, out: &mut String, text: &str) {
        separate(out);
        out.push_str(".Bd -literal\n");
        man_text_escape(out, text);
        out.push_str(".Ed");
    }

    fn block_quote(&mut self, out: &mut String, text: &str) {
        separate(out);
        out.push_str(".Eo\n");
        man_text_escape(out, text);
        out.push_str("\n.Ec");
    }

    fn header(&mut self, out: &mut String, text: &str, level: u8) {
        separate(out);
        match level {
            1 => out.push_str(".Sh "),
            2 => out.push_str(".Ss "),
            3 => out.push_str(".Pp\n.Em "),
            _ => {}
        }
        out.push_str(text);
    }

    fn list(&mut self, out: &mut String, text: &str, flags: ListFlags) {
        separate(out);
        out.push_str(if flags.contains(ListFlags::ORDERED) {
            ".Bl -enum\n"
        } else {
            ".Bl -bullet\n"
        });
        out.push_str(text);
        out.push_str(".El");
    }

    fn list_item(&mut self, out: &mut String, text: &str, _flags: ListFlags) {
        out.push_str(".It\n");
        out.push_str(text.trim_end_matches('\n'));
        out.push('\n');
    }

    fn paragraph(&mut self, out: &mut String, text: &str) {
        separate(out);
        out.push_str(".Pp\n");
        out.push_str(text);
    }

    fn autolink(&mut self, _out: &mut String, _link: &str, _kind: AutolinkKind) -> bool {
        false
    }

    fn code_span(&mut self, out: &mut String, text: &str) -> bool {
        separate(out);
        out.push_str(".Bd -literal\n");
        man_text_escape(out, text);
        out.push_str(".Ed");
        true
    }

    fn double_emphasis(&mut self, out: &mut String, text: &str, _delimiter: u8) -> bool {
        if text.is_empty() {
            return false;
        }
        out.push_str("\\fB");
        out.push_str(text);
        out.push_str("\\fP");
        true
    }

    fn emphasis(&mut self, out: &mut String, text: &str, _delimiter: u8) -> bool {
        if text.is_empty() {
            return false;
        }
        out.push_str("\\fI");
        out.push_str(text);
        out.push_str("\\fP");
        true
    }

    fn linebreak(&mut self, out: &mut String) -> bool {
        out.push_str(".br");
        true
    }

    fn normal_text(&mut self, out: &mut String, text: &str) {
        man_text_escape(out, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> ManRenderer {
        ManRenderer {
            title: "SOLDOWN".into(),
            date: "July 29, 2026".into(),
            section: 1,
        }
    }

    #[test]
    fn prolog_emits_doc_header() {
        let mut renderer = renderer();
        let mut out = String::new();
        renderer.prolog(&mut out);
        assert_eq!(
            out,
            ".\\\" Generated by soldown-man\n.Dd July 29, 2026\n.Dt SOLDOWN 1\n.Os"
        );
    }

    #[test]
    fn plain_text_escapes_hyphens() {
        let mut renderer = renderer();
        let mut out = String::new();
        renderer.normal_text(&mut out, "well-known");
        assert_eq!(out, "well\\-known");
    }

    #[test]
    fn header_level_one_uses_sh() {
        let mut renderer = renderer();
        let mut out = String::new();
        renderer.header(&mut out, "NAME", 1);
        assert_eq!(out, ".Sh NAME");
    }
}
