/// Lower-case kebab slug used for discipline and tag identity.
///
/// `"Computer Science"`, `"computer-science"` and `" COMPUTER_science "` all collapse to
/// `computer-science`; `&` is spelled out so `"Arts & Humanities"` stays readable.
pub(crate) fn slugify(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "").replace('&', " and ");
    let mut slug = String::with_capacity(cleaned.len());
    let mut pending_dash = false;

    for ch in cleaned.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Collapse internal whitespace and trim, keeping the original casing.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Alphanumeric-only lower-case form used to compare free-form labels.
pub(crate) fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split a list cell such as `"programming; software, web"`.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split([';', ',', '|'])
        .map(normalize_label)
        .filter(|item| !item.is_empty())
        .collect()
}
