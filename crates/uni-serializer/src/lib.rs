//! Uni Serializer
//!
//! Renders a forest back into canonical Uni text: one line per element,
//! tab indentation, single spaces between attributes, CRLF line endings,
//! and back-quotes wherever a name or value needs quoting.
//!
//! ```text
//! Forest → serialize() → "name a=1 b=(x y)\r\n\tchild\r\n"
//! ```
//!
//! Rendering cannot fail, and `serialize(parse(serialize(f)))` equals
//! `serialize(f)`.

pub mod quote;

pub use quote::quote;

use uni_parser::ast::{Attribute, AttributeValue, Element};

/// Line terminator of the canonical form.
pub const LINE_END: &str = "\r\n";

/// Render a forest in canonical form.
pub fn serialize(forest: &[Element]) -> String {
    let mut out = String::new();
    for element in forest {
        write_element(element, 0, &mut out);
    }
    out
}

/// Render one element and its subtree, starting at `depth` tabs.
pub fn render_element(element: &Element, depth: usize) -> String {
    let mut out = String::new();
    write_element(element, depth, &mut out);
    out
}

/// Render an attribute list as it appears on an element's line.
pub fn render_attributes(attributes: &[Attribute]) -> String {
    let mut out = String::new();
    write_attributes(attributes, &mut out);
    out
}

fn write_element(element: &Element, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push('\t');
    }
    write_attributes(&element.attributes, out);
    out.push_str(LINE_END);

    for child in &element.children {
        write_element(child, depth + 1, out);
    }
}

fn write_attributes(attributes: &[Attribute], out: &mut String) {
    for (i, attribute) in attributes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_attribute(attribute, out);
    }
}

fn write_attribute(attribute: &Attribute, out: &mut String) {
    out.push_str(&quote(&attribute.name));
    match &attribute.value {
        AttributeValue::Missing => {}
        AttributeValue::Scalar(value) => {
            out.push('=');
            out.push_str(&quote(value));
        }
        AttributeValue::List(items) => {
            out.push_str("=(");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(&quote(item));
            }
            out.push(')');
        }
    }
}
