//! Whitelist filename sanitization.

/// Keeps alphanumeric characters (any script), `.`, `_`, `-` and space; drops everything else.
pub fn sanitize_strict(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_allowed() {
        assert_eq!(sanitize_strict("Report 2024_v1-final.pdf"), "Report 2024_v1-final.pdf");
    }

    #[test]
    fn strips_separators_and_punctuation() {
        assert_eq!(sanitize_strict("../etc/passwd"), "..etcpasswd");
        assert_eq!(sanitize_strict("a\\b:c*d?.txt"), "abcd.txt");
        assert_eq!(sanitize_strict("my%20report.pdf"), "my20report.pdf");
    }

    #[test]
    fn unicode_letters_survive() {
        assert_eq!(sanitize_strict("café.txt"), "café.txt");
    }

    #[test]
    fn control_chars() {
        assert_eq!(sanitize_strict("file\x00name\t.txt"), "filename.txt");
    }
}
