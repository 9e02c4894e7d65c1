use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::validation::MAX_SLUG_LENGTH;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid regex"));
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s-]+").expect("valid regex"));

/// URL-safe identifier from a title: lowercase, drop anything outside
/// `[a-z0-9 -]`, collapse whitespace/hyphen runs into one hyphen, trim
/// hyphens at both ends. `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let collapsed = SEPARATORS.replace_all(&stripped, "-");
    truncate_slug(collapsed.trim_matches('-'))
}

fn truncate_slug(slug: &str) -> String {
    if slug.len() <= MAX_SLUG_LENGTH {
        return slug.to_string();
    }
    slug[..MAX_SLUG_LENGTH].trim_end_matches('-').to_string()
}

/// Slug for a new item: the supplied one when non-blank, otherwise derived
/// from the title.
pub fn slug_for_create(supplied: Option<&str>, title: &str) -> Option<String> {
    match supplied.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => Some(slug.to_string()),
        None => Some(slugify(title)).filter(|s| !s.is_empty()),
    }
}

/// Slug while editing: never re-derived from a changed title; only an
/// explicit non-blank slug replaces the current one.
pub fn slug_for_update(supplied: Option<&str>, current: &str) -> String {
    supplied
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(current)
        .to_string()
}

/// First of `base-copy`, `base-copy-2`, `base-copy-3`... not taken. The
/// base is shortened so the suffix always fits within `MAX_SLUG_LENGTH`.
pub fn duplicate_slug<F>(base: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let stem = base.trim_end_matches("-copy");
    let first = with_suffix(stem, "-copy");
    if !is_taken(&first) {
        return first;
    }
    (2..)
        .map(|n| with_suffix(stem, &format!("-copy-{}", n)))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or(first)
}

fn with_suffix(stem: &str, suffix: &str) -> String {
    let mut end = stem.len().min(MAX_SLUG_LENGTH.saturating_sub(suffix.len()));
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", stem[..end].trim_end_matches('-'), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust   &  Actix -- API "), "rust-actix-api");
        assert_eq!(slugify("Café déjà vu"), "caf-dj-vu");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_is_idempotent() {
        for input in ["Hello, World!", "a  -  b", "--x--", "Ünïcode Tïtle 2024", "already-a-slug"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "input: {input}");
        }
    }

    #[test]
    fn slugify_truncates_long_titles() {
        let slug = slugify(&"word ".repeat(40));
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn create_derives_only_when_blank() {
        assert_eq!(slug_for_create(None, "My Post").as_deref(), Some("my-post"));
        assert_eq!(slug_for_create(Some("  "), "My Post").as_deref(), Some("my-post"));
        assert_eq!(slug_for_create(Some("custom"), "My Post").as_deref(), Some("custom"));
        assert_eq!(slug_for_create(None, "???"), None);
    }

    #[test]
    fn update_keeps_current_slug_unless_given() {
        assert_eq!(slug_for_update(None, "original"), "original");
        assert_eq!(slug_for_update(Some(""), "original"), "original");
        assert_eq!(slug_for_update(Some("renamed"), "original"), "renamed");
    }

    #[test]
    fn duplicate_slug_finds_free_suffix() {
        let taken = ["post-copy", "post-copy-2"];
        assert_eq!(duplicate_slug("post", |s| taken.contains(&s)), "post-copy-3");
        assert_eq!(duplicate_slug("post-copy", |s| taken.contains(&s)), "post-copy-3");
        assert_eq!(duplicate_slug("fresh", |_| false), "fresh-copy");
    }

    #[test]
    fn duplicate_slug_of_max_length_base_keeps_suffix() {
        let base = slugify(&"a".repeat(100));
        assert_eq!(base.len(), MAX_SLUG_LENGTH);

        let first = duplicate_slug(&base, |s| s == base);
        assert!(first.ends_with("-copy"));
        assert_eq!(first.len(), MAX_SLUG_LENGTH);

        let taken = [base.clone(), first.clone()];
        let second = duplicate_slug(&base, |s| taken.iter().any(|t| t == s));
        assert!(second.ends_with("-copy-2"));
        assert!(second.len() <= MAX_SLUG_LENGTH);
    }

    #[test]
    fn duplicate_slug_trims_hyphen_at_cut() {
        let base = format!("{}-{}", "a".repeat(74), "b".repeat(5));
        let copy = duplicate_slug(&base, |_| false);
        assert_eq!(copy, format!("{}-copy", "a".repeat(74)));
    }
}
