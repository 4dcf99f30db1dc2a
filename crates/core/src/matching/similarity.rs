//! Normalized edit-distance similarity between titles.

/// Calculate a similarity score between two strings in `[0.0, 1.0]`.
///
/// Score is `1 - levenshtein(a, b) / max(len(a), len(b))`, so `1.0` means
/// identical and `0.0` means nothing in common. Two empty strings score
/// `1.0`. Symmetric: `similarity(a, b) == similarity(b, a)`.
///
/// Lengths and distance are measured in Unicode scalar values, not bytes.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    let longer = a_len.max(b_len);
    if longer == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / longer as f64)
}

/// Levenshtein edit distance with unit-cost insert/delete/substitute.
///
/// Single-row dynamic programming: O(len(a) * len(b)) time, O(len(b)) space.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, a_char) in a_chars.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;

        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            let next = (prev_diag + cost).min(row[j] + 1).min(row[j + 1] + 1);
            prev_diag = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b_chars.len()]
}
