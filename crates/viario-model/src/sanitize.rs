/// Sanitizes free-text user input before it reaches a query parameter.
///
/// Strips the characters the registry never uses in names (`<`, `>`, `"`,
/// `'`), truncates to `max_len` characters and trims surrounding
/// whitespace. Total: empty input maps to an empty string.
#[must_use]
pub fn sanitize_input(raw: &str, max_len: usize) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .take(max_len)
        .collect();
    stripped.trim().to_string()
}
