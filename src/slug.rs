//! Derived URL slugs and the save-time hooks that keep them in sync.
//!
//! Categories, fundraisers and static pages never accept a slug from the
//! outside: every write recomputes it from the record's name or title.

use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::ActiveValue;
use unicode_normalization::UnicodeNormalization;

// Anything that is not a word character, whitespace or a hyphen is dropped
static STRIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid strip regex"));
// Runs of whitespace and hyphens collapse into a single hyphen
static DASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").expect("valid dash regex"));

/// Lowercase, hyphen-separated ASCII form of `value`.
///
/// `"Foo Bar"` becomes `"foo-bar"`, `"  Hello,  World! "` becomes
/// `"hello-world"`. Accented letters lose their marks after NFKD
/// decomposition; anything still outside ASCII is removed.
pub fn slugify(value: &str) -> String {
    let ascii: String = value.nfkd().filter(|c| c.is_ascii()).collect();
    let lowered = ascii.to_lowercase();
    let stripped = STRIP_RE.replace_all(&lowered, "");
    let dashed = DASH_RE.replace_all(stripped.trim(), "-");
    dashed.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Recompute `slug` from `source` at the start of a save.
///
/// When the source column is not part of the write, the slug is dropped from
/// it too, so a slug can never be written on its own.
pub fn refresh(source: &ActiveValue<String>, slug: &mut ActiveValue<String>) {
    *slug = match source {
        ActiveValue::Set(value) | ActiveValue::Unchanged(value) => ActiveValue::Set(slugify(value)),
        ActiveValue::NotSet => ActiveValue::NotSet,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Foo Bar"), "foo-bar");
        assert_eq!(slugify("Foo Bar 2"), "foo-bar-2");
    }

    #[test]
    fn slugify_strips_punctuation_and_collapses_separators() {
        assert_eq!(slugify("  Hello,  World! "), "hello-world");
        assert_eq!(slugify("a -- b"), "a-b");
    }

    #[test]
    fn slugify_keeps_the_base_letter_of_accented_characters() {
        assert_eq!(slugify("Zażółć gęślą"), "zazoc-gesla");
        assert_eq!(slugify("Zbiórka na leczenie Łucji"), "zbiorka-na-leczenie-ucji");
        assert_eq!(slugify("Café ﬁnale"), "cafe-finale");
    }

    #[test]
    fn slugify_of_numbers_is_the_number() {
        assert_eq!(slugify("7"), "7");
    }

    #[test]
    fn refresh_follows_the_source_column() {
        let mut slug = ActiveValue::Set("hand-written".to_string());
        refresh(&ActiveValue::Set("Foo Bar".to_string()), &mut slug);
        assert_eq!(slug, ActiveValue::Set("foo-bar".to_string()));

        let mut slug = ActiveValue::Set("hand-written".to_string());
        refresh(&ActiveValue::Unchanged("Foo Bar 2".to_string()), &mut slug);
        assert_eq!(slug, ActiveValue::Set("foo-bar-2".to_string()));
    }

    #[test]
    fn refresh_refuses_a_standalone_slug() {
        let mut slug = ActiveValue::Set("hand-written".to_string());
        refresh(&ActiveValue::NotSet, &mut slug);
        assert!(slug.is_not_set());
    }
}
