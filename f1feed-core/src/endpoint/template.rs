//! Placeholder substitution for URL templates.

use super::ConfigurationError;

pub const YEAR_PLACEHOLDER: &str = "{year}";
pub const RACE_ROUND_PLACEHOLDER: &str = "{race_round}";

/// Substitute every `(placeholder, value)` pair into `template`.
///
/// Each placeholder must occur at least once. After substitution no other
/// `{identifier}` token may remain.
pub fn substitute(
    template: &str,
    values: &[(&'static str, i64)],
) -> Result<String, ConfigurationError> {
    let mut out = template.to_string();
    for &(placeholder, value) in values {
        if !out.contains(placeholder) {
            return Err(ConfigurationError::MissingPlaceholder { placeholder });
        }
        out = out.replace(placeholder, &value.to_string());
    }

    if let Some(name) = first_placeholder(&out) {
        return Err(ConfigurationError::UnresolvedPlaceholder(name.to_string()));
    }
    Ok(out)
}

/// Find the first `{identifier}` token in `s`, returning the identifier.
pub fn first_placeholder(s: &str) -> Option<&str> {
    let mut rest = s;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            return None;
        };
        let name = &after[..close];
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Some(name);
        }
        rest = after;
    }
    None
}
