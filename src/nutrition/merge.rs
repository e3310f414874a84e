//! Localized vs canonical text field merging.

use super::domain::{LocalizedField, TextVariants};

/// Merge a canonical value with its localized translation.
///
/// A non-empty localized value becomes primary, and the canonical value is
/// kept as secondary only when it says something different. Without a
/// localized value the canonical one is primary. Blank strings count as
/// missing.
pub fn merge(canonical: Option<&str>, localized: Option<&str>) -> LocalizedField {
    let canonical = non_blank(canonical);
    let localized = non_blank(localized);

    match (localized, canonical) {
        (Some(localized), canonical) => LocalizedField {
            primary: Some(localized.to_string()),
            secondary: canonical
                .filter(|c| *c != localized)
                .map(String::from),
        },
        (None, canonical) => LocalizedField {
            primary: canonical.map(String::from),
            secondary: None,
        },
    }
}

pub fn merge_variants(variants: &TextVariants) -> LocalizedField {
    merge(variants.canonical.as_deref(), variants.localized.as_deref())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
