//! Case variants of a username.

use std::collections::BTreeSet;

/// Derive the case variants probed for a username.
///
/// The set holds the original, all-lowercase, all-uppercase and capitalized
/// forms, plus a lowercase-first/uppercase-rest form (`eREN`) for names longer
/// than two characters. Duplicates collapse; the result is sorted.
#[must_use]
pub fn username_variants(username: &str) -> Vec<String> {
    let mut variants = BTreeSet::new();

    variants.insert(username.to_string());
    variants.insert(username.to_lowercase());
    variants.insert(username.to_uppercase());
    variants.insert(capitalize(username));

    if username.chars().count() > 2 {
        variants.insert(lower_first_upper_rest(username));
    }

    variants.into_iter().collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out: String = first.to_uppercase().collect();
    out.push_str(&chars.as_str().to_lowercase());
    out
}

fn lower_first_upper_rest(s: &str) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out: String = first.to_lowercase().collect();
    out.push_str(&chars.as_str().to_uppercase());
    out
}
