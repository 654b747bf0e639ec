//! MIME type from file extension, for data-URI links.

pub const DEFAULT_MIME: &str = "application/octet-stream";

/// MIME type for `filename` by its extension (case-insensitive).
pub fn mime_for_filename(filename: &str) -> &'static str {
    let ext = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => return DEFAULT_MIME,
    };
    match ext.as_str() {
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "json" => "application/json",
        "xml" => "application/xml",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        _ => DEFAULT_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(mime_for_filename("a.pdf"), "application/pdf");
        assert_eq!(mime_for_filename("photo.JPG"), "image/jpeg");
        assert_eq!(mime_for_filename("archive.tar.gz"), "application/gzip");
        assert_eq!(
            mime_for_filename("book.xlsx"),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn unknown_or_missing_extension() {
        assert_eq!(mime_for_filename("data.bin"), DEFAULT_MIME);
        assert_eq!(mime_for_filename("README"), DEFAULT_MIME);
        assert_eq!(mime_for_filename(".bashrc"), DEFAULT_MIME);
        assert_eq!(mime_for_filename("downloaded_file_1700000000"), DEFAULT_MIME);
    }
}
