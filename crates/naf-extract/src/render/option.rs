//! `<option>` entries

use naf_common::NodeKind;

use crate::tree::ClassificationNode;

/// Disabled, preselected first entry of every fragment
pub fn placeholder(kind: NodeKind) -> String {
    format!(
        "<option disabled selected>Sélectionnez votre {}</option>",
        kind.label()
    )
}

/// Entry for one node
///
/// Class nodes also carry `data-regulated` and, when present, their
/// registration identifiers.
pub fn option_entry(node: &ClassificationNode) -> String {
    let mut attributes = format!(
        r#"value="{}" data-nomenclature="{}" data-type="{}""#,
        escape(&node.code),
        node.source,
        node.kind
    );

    if let Some(extras) = node.extras() {
        attributes.push_str(&format!(r#" data-regulated="{}""#, extras.regulated));
        let registrations = [
            ("data-registration", extras.registration.as_deref()),
            ("data-registration-alt", extras.registration_alt.as_deref()),
        ];
        for (name, value) in registrations {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                attributes.push_str(&format!(r#" {}="{}""#, name, escape(value)));
            }
        }
    }

    format!("<option {}>{}</option>", attributes, escape(&title_case(&node.title)))
}

/// Lower-case a label, then upper-case the first letter of every word
///
/// Words are separated by whitespace and ASCII punctuation, so
/// `MÉTIERS D'ART` becomes `Métiers D'Art`.
pub fn title_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut at_word_start = true;

    for c in label.trim().chars().flat_map(char::to_lowercase) {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace() || (c.is_ascii() && !c.is_ascii_alphanumeric() && c != '_');
    }

    out
}

/// Escape text for use in element content and double-quoted attributes
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
