//! Qualifying the `html` type selector in place.

use crate::rewrite::alternatives;
use css_parser::split_components;

/// Appends the namespace to every bare `html` type selector in `selector`.
///
/// Returns `None` if the selector has no such component. `html` inside a
/// functional pseudo-class argument is not touched.
pub(crate) fn qualify_html(selector: &str, namespace: &str) -> Option<String> {
    let components = split_components(selector);
    if !components.iter().any(|c| c.is_type_named(selector, "html")) {
        return None;
    }

    let variants: Vec<String> = alternatives(namespace)
        .map(|ns| {
            let mut out = String::with_capacity(selector.len() + ns.len());
            for component in &components {
                out.push_str(component.text(selector));
                if component.is_type_named(selector, "html") {
                    out.push_str(ns.trim());
                }
            }
            out
        })
        .collect();
    Some(variants.join(","))
}
