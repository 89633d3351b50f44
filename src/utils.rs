/// Returns at most the last `n` characters of `s`
pub fn last_chars(s: &str, n: usize) -> &str {
    let start = s
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[start..]
}

/// Returns at most the first `n` characters of `s`
pub fn first_chars(s: &str, n: usize) -> &str {
    let end = s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len());
    &s[..end]
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert a URL to a sanitized filename
pub fn sanitize_filename(url: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let mut name = url.replace("http://", "").replace("https://", "");
    name = name.replace(['/', ':', '?', '&', '=', '#', '%', '\\'], "_");

    // Limit filename length on a character boundary
    first_chars(&name, 100).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_respect_char_boundaries() {
        assert_eq!(last_chars("héllo", 3), "llo");
        assert_eq!(last_chars("héllo", 4), "éllo");
        assert_eq!(last_chars("ab", 10), "ab");
        assert_eq!(last_chars("ab", 0), "");
        assert_eq!(first_chars("héllo", 2), "hé");
        assert_eq!(first_chars("ab", 10), "ab");
        assert_eq!(first_chars("ab", 0), "");
    }

    #[test]
    fn sanitize_strips_scheme_and_separators() {
        assert_eq!(
            sanitize_filename("https://example.com/a/b?c=d#e"),
            "example.com_a_b_c_d_e"
        );
        let long = format!("https://example.com/{}", "é".repeat(200));
        assert_eq!(sanitize_filename(&long).chars().count(), 100);
    }
}
