//! NCL serializer.
//!
//! Renders an element subtree as indented NCL text: one tab per nesting
//! level, `id` first, then every present attribute in the kind's fixed
//! order, single-quoted.

use std::fmt::Display;

use log::warn;

use crate::config::WriterConfig;
use crate::document::NclDocument;
use crate::reference::{Reference, Target};
use crate::registry::ElementId;

/// Attribute collector handed to each payload while it renders.
pub(crate) struct Attributes<'d> {
    doc: &'d NclDocument,
    owner: ElementId,
    items: Vec<(&'static str, String)>,
}

impl<'d> Attributes<'d> {
    fn new(doc: &'d NclDocument, owner: ElementId) -> Self {
        Attributes {
            doc,
            owner,
            items: Vec::new(),
        }
    }

    pub(crate) fn text(&mut self, name: &'static str, value: Option<&str>) {
        if let Some(value) = value {
            self.items.push((name, value.to_string()));
        }
    }

    pub(crate) fn value<T: Display>(&mut self, name: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.items.push((name, value.to_string()));
        }
    }

    /// Push a resolved reference. Unresolvable references are left out.
    pub(crate) fn reference<K: Target>(&mut self, name: &'static str, value: Option<&Reference<K>>) {
        let Some(reference) = value else {
            return;
        };
        match reference.resolve(self.doc) {
            Ok(resolved) => self.items.push((name, resolved)),
            Err(err) => warn!(
                "omitting attribute '{}' of element {}: {}",
                name, self.owner, err
            ),
        }
    }
}

/// Escape a value for a single-quoted attribute.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render `element` and its subtree at the given depth.
pub(crate) fn render(doc: &NclDocument, element: ElementId, indent: usize, out: &mut String) {
    let Some(payload) = doc.element(element) else {
        warn!("cannot render unknown element {}", element);
        return;
    };
    let tag = payload.tag();
    let markup = payload.markup();

    let mut attrs = Attributes::new(doc, element);
    attrs.text("id", doc.id(element));
    markup.attributes(&mut attrs);

    push_indent(out, indent);
    out.push('<');
    out.push_str(tag.name());
    for (name, value) in &attrs.items {
        out.push(' ');
        out.push_str(name);
        out.push_str("='");
        out.push_str(&escape(value));
        out.push('\'');
    }

    let children = markup.children();
    if children.is_empty() {
        out.push_str(tag.self_closing());
        out.push('\n');
        return;
    }

    out.push_str(">\n");
    for child in children {
        render(doc, child, indent + 1, out);
    }
    push_indent(out, indent);
    out.push_str("</");
    out.push_str(tag.name());
    out.push_str(">\n");
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push('\t');
    }
}

/// The XML declaration and generator comment preceding the root element.
pub(crate) fn header(config: &WriterConfig) -> String {
    format!(
        "<?xml version='1.0' encoding='{}'?>\n<!-- Generated with {} -->\n\n",
        escape(&config.encoding),
        comment_text(&config.generator)
    )
}

/// Make `text` legal inside `<!-- -->`: no `--` and no trailing `-`.
fn comment_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '-' && out.ends_with('-') {
            out.push(' ');
        }
        out.push(ch);
    }
    if out.ends_with('-') {
        out.push(' ');
    }
    out
}
