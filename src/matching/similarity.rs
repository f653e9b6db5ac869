/// Minimum normalized similarity for a typed answer to count as correct.
pub const MATCH_THRESHOLD: f64 = 0.7;

/// Classic single-character insert/delete/substitute edit distance, computed
/// over chars so multi-byte letters count as one edit. Case- and
/// accent-sensitive; callers normalize first.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut matrix = vec![vec![0usize; a_chars.len() + 1]; b_chars.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b_chars.len() {
        for j in 1..=a_chars.len() {
            if b_chars[i - 1] == a_chars[j - 1] {
                matrix[i][j] = matrix[i - 1][j - 1];
            } else {
                let substitution = matrix[i - 1][j - 1];
                let insertion = matrix[i][j - 1];
                let deletion = matrix[i - 1][j];
                matrix[i][j] = substitution.min(insertion).min(deletion) + 1;
            }
        }
    }

    matrix[b_chars.len()][a_chars.len()]
}

/// Edit distance expressed as a score in `[0, 1]`: `(max_len - distance) /
/// max_len`. Two empty strings score `1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = edit_distance(a, b);
    (max_len - distance) as f64 / max_len as f64
}
