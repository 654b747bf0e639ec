//! Self-contained HTML page with data-URI download links.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::mime::mime_for_filename;

/// `data:` URI embedding `bytes` with the MIME type of `filename`.
pub fn data_uri(filename: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_for_filename(filename),
        STANDARD.encode(bytes)
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a page with one download link per `(filename, bytes)` entry.
pub fn render_links_page<'a, I>(title: &str, files: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut body = String::new();
    for (name, bytes) in files {
        let href = data_uri(name, bytes);
        let name = escape(name);
        body.push_str(&format!(
            "    <li><a href=\"{}\" download=\"{}\">{}</a> ({} bytes)</li>\n",
            href,
            name,
            name,
            bytes.len()
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{title}</title>\n</head>\n<body>\n  <h1>{title}</h1>\n  <ul>\n{body}  </ul>\n</body>\n</html>\n",
        title = escape(title),
        body = body
    )
}
