use soldown::html4::Html4Renderer;
use soldown::man::ManRenderer;
use soldown::render;
use soldown::xhtml::XhtmlRenderer;

pub fn xhtml(input: &str) -> String {
    render(input, &mut XhtmlRenderer)
}

pub fn html4(input: &str) -> String {
    render(input, &mut Html4Renderer)
}

pub fn man(input: &str) -> String {
    let mut renderer = ManRenderer {
        title: "TEST".into(),
        date: "January 1, 2026".into(),
        section: 1,
    };
    render(input, &mut renderer)
}
