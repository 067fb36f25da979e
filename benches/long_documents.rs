use criterion::{Criterion, criterion_group, criterion_main};

use soldown::render;
use soldown::xhtml::XhtmlRenderer;

const SHORT_INLINE: &str = "*this ***has some* various things* that** [a link](http://example.com \"title\") taking _too_ much ![alt](http://example.com/x.png) to parse, and should `be a decent` test` ``of ``whether this works quickly.";

/// A single paragraph repeated many times to exercise the block recognizer
/// over a document long enough to show its O(n) outer loop (as opposed to
/// the O(n^2) worst case the inline emphasis search can hit within one
/// span, which `short_inlines` below targets instead).
fn long_document() -> String {
    let mut doc = String::new();
    for i in 0..2000 {
        doc.push_str(&format!(
            "## Section {i}\n\nSome *text* with a [link][ref] and `code`.\n\n"
        ));
    }
    doc.push_str("[ref]: http://example.com \"a title\"\n");
    doc
}

fn long_documents(c: &mut Criterion) {
    let doc = long_document();
    c.bench_function("long document", |b| {
        b.iter(|| render(&doc, &mut XhtmlRenderer))
    });
}

fn short_inlines(c: &mut Criterion) {
    c.bench_function("short inline span", |b| {
        b.iter(|| render(SHORT_INLINE, &mut XhtmlRenderer))
    });
}

criterion_group!(benches, long_documents, short_inlines);
criterion_main!(benches);
