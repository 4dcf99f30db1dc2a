//! DOI extraction and cleanup helpers.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Prefix OpenAlex and friends use when returning DOIs in URL form.
const DOI_URL_PREFIX: &str = "https://doi.org/";

static DOI_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"10\.\d{4,}/[^\s"<>?&#]+"#).expect("valid DOI regex"));

/// Extract the first DOI found in a blob of text (link hrefs, citation
/// metadata, visible page text). Trailing punctuation that commonly clings
/// to DOIs in running text is stripped.
pub fn extract_doi(text: &str) -> Option<String> {
    let m = DOI_PATTERN.find(text)?;
    let doi = m.as_str().trim_end_matches(['.', ',', ';', ':', ')', ']']);
    if doi.is_empty() {
        None
    } else {
        Some(doi.to_string())
    }
}

/// Rewrite a URL-form DOI (`https://doi.org/10.x/y`) to its bare form.
/// Bare DOIs pass through unchanged.
pub fn strip_doi_url_prefix(doi: &str) -> &str {
    doi.strip_prefix(DOI_URL_PREFIX).unwrap_or(doi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_href() {
        let href = "https://doi.org/10.1038/s41586-020-2649-2";
        assert_eq!(
            extract_doi(href).as_deref(),
            Some("10.1038/s41586-020-2649-2")
        );
    }

    #[test]
    fn test_extract_from_running_text() {
        let text = "See the paper (doi: 10.1145/3292500.3330701).";
        assert_eq!(
            extract_doi(text).as_deref(),
            Some("10.1145/3292500.3330701")
        );
    }

    #[test]
    fn test_trailing_punctuation_stripped() {
        assert_eq!(extract_doi("10.1234/abc,").as_deref(), Some("10.1234/abc"));
        assert_eq!(extract_doi("(10.1234/abc)").as_deref(), Some("10.1234/abc"));
    }

    #[test]
    fn test_short_registrant_rejected() {
        // Registrant code must be at least four digits.
        assert_eq!(extract_doi("10.99/abc"), None);
    }

    #[test]
    fn test_no_doi() {
        assert_eq!(extract_doi("https://example.com/article/42"), None);
        assert_eq!(extract_doi(""), None);
    }

    #[test]
    fn test_query_string_terminates_match() {
        let href = "https://link.example/10.1016/j.cell.2021.01.001?via=ihub";
        assert_eq!(
            extract_doi(href).as_deref(),
            Some("10.1016/j.cell.2021.01.001")
        );
    }

    #[test]
    fn test_strip_url_prefix() {
        assert_eq!(
            strip_doi_url_prefix("https://doi.org/10.1234/abc"),
            "10.1234/abc"
        );
        assert_eq!(strip_doi_url_prefix("10.1234/abc"), "10.1234/abc");
    }
}
