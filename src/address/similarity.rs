//! String similarity via Levenshtein distance.

/// Minimum number of single-character inserts, deletes, and substitutions
/// turning `a` into `b`. Operates on chars, not bytes.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // table[i][j]: distance between the first j chars of `a` and the first i of `b`
    let mut table = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            table[i][j] = if b[i - 1] == a[j - 1] {
                table[i - 1][j - 1]
            } else {
                1 + table[i - 1][j - 1]
                    .min(table[i][j - 1])
                    .min(table[i - 1][j])
            };
        }
    }
    table[b.len()][a.len()]
}

/// `1 - distance / max_len`, in `[0, 1]`. Two empty strings score `1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / max_len as f64
}
