use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("slug pattern must compile"));

/// Filesystem-safe preset key: lowercased, trimmed, every character outside
/// `[A-Za-z0-9_-]` replaced with `_`. Never empty.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = UNSAFE_CHARS.replace_all(lowered.trim(), "_").into_owned();
    if slug.is_empty() {
        return "_".to_string();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_lowercases_and_replaces_unsafe_chars() {
        assert_eq!(slugify("  Code Reviewer  "), "code_reviewer");
        assert_eq!(slugify("Deep-Dive_v2"), "deep-dive_v2");
        assert_eq!(slugify("a/b\\c.md"), "a_b_c_md");
        assert_eq!(slugify("Café"), "caf_");
    }

    #[test]
    fn slugify_is_total_and_non_empty() {
        for input in ["", "   ", "\n\t", "!!!", "日本語"] {
            let slug = slugify(input);
            assert!(!slug.is_empty(), "slug for {:?} must not be empty", input);
            assert!(slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        }
    }

    #[test]
    fn slugify_is_idempotent() {
        for input in ["Oracle", " Summarizer!! ", "İstanbul Guide", "", "x y z"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn distinct_names_may_collide() {
        assert_eq!(slugify("My Agent"), slugify("my_agent"));
    }
}
