//! URL slugs for synergy pages.

use crate::models::front_face_name;

fn slugify(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    for c in kept.chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}

/// Slug of a commander page, built from the front face only.
pub fn commander_slug(name: &str) -> String {
    slugify(front_face_name(name))
}

/// Slug of a card page. Split cards keep both halves.
pub fn card_slug(name: &str, layout: Option<&str>) -> String {
    if layout == Some("split") {
        slugify(name.trim())
    } else {
        slugify(front_face_name(name))
    }
}

/// Slug of a partner-pair page: both commander slugs, sorted, hyphen-joined.
pub fn pair_slug(first: &str, second: &str) -> String {
    let mut slugs = [commander_slug(first), commander_slug(second)];
    slugs.sort();
    slugs.join("-")
}
