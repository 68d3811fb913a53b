//! Quoting for values embedded in an `sh -c` command line.

/// Characters that keep their meaning inside double quotes.
const SPECIAL_IN_DOUBLE_QUOTES: &[char] = &['\\', '"', '$', '`'];

/// Wrap `value` in double quotes so the shell hands it to the program unchanged.
///
/// An empty value becomes `""`, which is still one (empty) argument.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if SPECIAL_IN_DOUBLE_QUOTES.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Leave values made only of path-safe characters bare, quote anything else.
/// Used for paths from configuration, which are almost always plain.
pub fn quote_if_needed(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+:@,=%".contains(c));
    if plain { value.to_string() } else { escape(value) }
}
