//! `{placeholder}` templates for SKU formats.

use crate::error::TemplateError;

/// Substitute `{name}` placeholders from `values`.
///
/// Every placeholder must be provided; there is no escape syntax.
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| TemplateError::UnclosedPlaceholder(template.to_string()))?;

        let name = after[..close].trim();
        let value = values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;

        out.push_str(value);
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Collapse runs of `-` and strip leading and trailing hyphens.
///
/// Empty placeholders leave stray separators behind (`"-B30--"` -> `"B30"`).
pub fn clean_hyphens(sku: &str) -> String {
    let mut out = String::with_capacity(sku.len());
    for c in sku.trim().chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('-').to_string()
}
