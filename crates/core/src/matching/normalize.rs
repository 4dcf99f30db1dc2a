//! Title canonicalization for cache keys and fuzzy comparison.

/// Normalize a raw article title into its comparison key.
///
/// Lowercases, replaces every character that is not a letter, digit, or
/// whitespace with a space, collapses whitespace runs, and trims. The result
/// is the only form ever used as a cache key or fed to the similarity
/// scorer - raw titles are never compared directly.
///
/// Idempotent: `normalize_title(normalize_title(s)) == normalize_title(s)`.
pub fn normalize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_space = false;

    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            // Whitespace and punctuation both collapse into a single space.
            pending_space = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases() {
        assert_eq!(normalize_title("Deep Learning"), "deep learning");
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(normalize_title("Foo, Bar!"), "foo bar");
        assert_eq!(normalize_title("a:b(c)d"), "a b c d");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_title("  foo \t bar\n baz  "), "foo bar baz");
    }

    #[test]
    fn test_punctuation_insensitive_equality() {
        assert_eq!(normalize_title("Foo, Bar!"), normalize_title("foo bar"));
        assert_eq!(
            normalize_title("Attention Is All You Need."),
            normalize_title("attention is all you need"),
        );
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Deep Learning: A Survey (2nd ed.)",
            "  spaced   out  ",
            "ALL CAPS!!!",
            "",
        ];
        for s in samples {
            let once = normalize_title(s);
            assert_eq!(normalize_title(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_unicode_letters_kept() {
        assert_eq!(normalize_title("Über-Netze"), "über netze");
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("?!...---"), "");
    }
}
