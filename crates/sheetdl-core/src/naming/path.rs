//! Filename hint from a URL path.

/// Returns the basename of the URL path: everything after the last `/`.
///
/// Works on the text as written in the spreadsheet, so spaces and non-ASCII
/// characters are kept and percent-escapes are left as they are. Scheme and
/// authority are dropped; query and fragment are not part of the path. A path
/// ending in `/` (or no path at all) yields an empty string.
pub fn basename_from_url(url: &str) -> String {
    let url = url.trim();
    let path = match url.split_once("://") {
        Some((_, rest)) => rest.find(['/', '?', '#']).map_or("", |i| &rest[i..]),
        None => url,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    last_segment(path).to_string()
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(basename_from_url("https://example.com/a/b/file.pdf"), "file.pdf");
        assert_eq!(basename_from_url("https://x/a.pdf"), "a.pdf");
        assert_eq!(basename_from_url("https://example.com/single"), "single");
    }

    #[test]
    fn root_or_trailing_slash() {
        assert_eq!(basename_from_url("https://example.com/"), "");
        assert_eq!(basename_from_url("https://example.com"), "");
        assert_eq!(basename_from_url("https://example.com/reports/"), "");
    }

    #[test]
    fn query_and_fragment_ignored() {
        assert_eq!(
            basename_from_url("https://example.com/file.zip?token=abc#top"),
            "file.zip"
        );
    }

    #[test]
    fn percent_encoding_kept() {
        assert_eq!(
            basename_from_url("https://example.com/my%20report.pdf"),
            "my%20report.pdf"
        );
    }

    #[test]
    fn spaces_and_unicode_kept() {
        assert_eq!(basename_from_url("https://host/docs/my file.pdf"), "my file.pdf");
        assert_eq!(basename_from_url("https://x/résumé.pdf"), "résumé.pdf");
        assert_eq!(basename_from_url("https://user:pw@host:8080/a b.txt?q=1 2"), "a b.txt");
        assert_eq!(basename_from_url("https://host?x=/y.pdf"), "");
    }

    #[test]
    fn unparsable_url() {
        assert_eq!(basename_from_url("files/report.csv?x=1"), "report.csv");
        assert_eq!(basename_from_url("plainname"), "plainname");
    }
}
