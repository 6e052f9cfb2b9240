use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// URL slug for a category or brand name.
///
/// Lowercases, then collapses every run of characters outside `[a-z0-9]`
/// into one `-`. Leading and trailing dashes are kept, so the mapping is
/// idempotent but not injective.
#[must_use]
pub fn slugify(name: &str) -> String {
    NON_SLUG_RUN
        .replace_all(&name.to_lowercase(), "-")
        .into_owned()
}

/// Human-readable name derived from a slug when no canonical name matches:
/// dashes become spaces and every word is capitalized.
#[must_use]
pub fn display_name_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First name whose slug equals the slug of `slug`.
///
/// Several names may share a slug (`"TV & Audio"`, `"TV-Audio"`); the first
/// one in `names` wins.
pub fn resolve_by_slug<'a, I>(slug: &str, names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted = slugify(slug);
    names.into_iter().find(|name| slugify(name) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_runs() {
        assert_eq!(slugify("TV & Audio"), "tv-audio");
        assert_eq!(slugify("Haushalt/Küche"), "haushalt-k-che");
        assert_eq!(slugify(" Apple "), "-apple-");
    }

    #[test]
    fn slugify_is_idempotent() {
        for name in ["TV & Audio", "Smartphones", "  Weiße Ware!! ", "", "---", "PC/Gaming 2024"] {
            let once = slugify(name);
            assert_eq!(slugify(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn slugify_is_case_insensitive() {
        assert_eq!(slugify("ASUS"), slugify("asus"));
        assert_eq!(slugify("Asus"), "asus");
    }

    #[test]
    fn display_name_title_cases_words() {
        assert_eq!(display_name_from_slug("tv-audio"), "Tv Audio");
        assert_eq!(display_name_from_slug("smartphones"), "Smartphones");
        assert_eq!(display_name_from_slug("-apple-"), "Apple");
    }

    #[test]
    fn resolve_by_slug_first_match_wins() {
        let names = ["TV-Audio", "TV & Audio", "Laptops"];
        assert_eq!(resolve_by_slug("tv-audio", names), Some("TV-Audio"));
        assert_eq!(resolve_by_slug("LAPTOPS", names), Some("Laptops"));
        assert_eq!(resolve_by_slug("kameras", names), None);
    }
}
