//! Minimal xlsx writer for the expected-format template workbook.
//!
//! Cells are written as inline strings; empty strings are left out so they
//! read back as missing.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Example rows written by `sheetdl template`.
pub const EXAMPLE_ROWS: [[&str; 2]; 4] = [
    ["URL", "Filename"],
    ["https://example.com/file1.pdf", "document1.pdf"],
    ["https://example.com/file2.jpg", "image2.jpg"],
    ["https://example.com/file3.zip", "archive3.zip"],
];

/// One worksheet: name plus rows of cell text (first row = header).
pub struct TemplateSheet<'a> {
    pub name: &'a str,
    pub rows: Vec<Vec<&'a str>>,
}

impl<'a> TemplateSheet<'a> {
    pub fn new<R: AsRef<[&'a str]>>(name: &'a str, rows: &[R]) -> Self {
        Self {
            name,
            rows: rows.iter().map(|r| r.as_ref().to_vec()).collect(),
        }
    }
}

/// The expected-format example sheet.
pub fn example_sheet() -> TemplateSheet<'static> {
    TemplateSheet::new("Sheet1", &EXAMPLE_ROWS)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `0 → A`, `25 → Z`, `26 → AA`.
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

fn sheet_xml(sheet: &TemplateSheet<'_>) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><sheetData>",
    );
    for (r, row) in sheet.rows.iter().enumerate() {
        xml.push_str(&format!("<row r=\"{}\">", r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            xml.push_str(&format!(
                "<c r=\"{}{}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                column_letters(c),
                r + 1,
                xml_escape(value)
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Write an xlsx workbook with the given sheets to `path`.
pub fn write_workbook(path: &Path, sheets: &[TemplateSheet<'_>]) -> Result<()> {
    if sheets.is_empty() {
        anyhow::bail!("a workbook needs at least one sheet");
    }
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut content_types = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>",
    );
    let mut workbook = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\"><sheets>",
    );
    let mut rels = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    for (i, sheet) in sheets.iter().enumerate() {
        let n = i + 1;
        content_types.push_str(&format!(
            "<Override PartName=\"/xl/worksheets/sheet{n}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>"
        ));
        workbook.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{n}\" r:id=\"rId{n}\"/>",
            xml_escape(sheet.name)
        ));
        rels.push_str(&format!(
            "<Relationship Id=\"rId{n}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet{n}.xml\"/>"
        ));
    }
    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");

    let root_rels = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
        <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
        <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>\
        </Relationships>";

    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".to_string(), content_types),
        ("_rels/.rels".to_string(), root_rels.to_string()),
        ("xl/workbook.xml".to_string(), workbook),
        ("xl/_rels/workbook.xml.rels".to_string(), rels),
    ];
    for (i, sheet) in sheets.iter().enumerate() {
        parts.push((format!("xl/worksheets/sheet{}.xml", i + 1), sheet_xml(sheet)));
    }

    for (name, body) in parts {
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("failed to start {name}"))?;
        zip.write_all(body.as_bytes())?;
    }
    zip.finish().context("failed to finish workbook")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_sequence() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(1), "B");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn sheet_xml_skips_empty_cells_and_escapes() {
        let sheet = TemplateSheet::new("S", &[["URL", ""], ["a&b", "<x>"]]);
        let xml = sheet_xml(&sheet);
        assert!(xml.contains("<c r=\"A1\" t=\"inlineStr\">"));
        assert!(!xml.contains("r=\"B1\""));
        assert!(xml.contains("a&amp;b"));
        assert!(xml.contains("&lt;x&gt;"));
    }

    #[test]
    fn no_sheets_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(write_workbook(&tmp.path().join("x.xlsx"), &[]).is_err());
    }
}
