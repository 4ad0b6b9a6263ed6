/*!
 * Common test utilities for the docx-checkbox-fix test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;
use docx_checkbox_fix::docx::{DocxPackage, MAIN_DOCUMENT_PART};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults/></w:styles>"#;

/// Routes library log output through the test harness
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Wraps body XML into a complete `word/document.xml`
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#,
        body
    )
}

/// A paragraph with one run per text
pub fn paragraph(runs: &[&str]) -> String {
    let runs: String = runs
        .iter()
        .map(|text| format!(r#"<w:r><w:rPr><w:rFonts w:ascii="MS Gothic"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#, text))
        .collect();
    format!("<w:p>{}</w:p>", runs)
}

/// A one-row table whose cells hold the given paragraph XML
pub fn table(cells: &[&str]) -> String {
    let cells: String = cells
        .iter()
        .map(|content| format!("<w:tc><w:tcPr/>{}</w:tc>", content))
        .collect();
    format!("<w:tbl><w:tblPr/><w:tr>{}</w:tr></w:tbl>", cells)
}

/// Builds the bytes of a minimal `.docx` around the given body XML
pub fn docx_bytes(body: &str) -> Result<Vec<u8>> {
    let package = DocxPackage::from_parts(vec![
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels", ROOT_RELS.as_bytes().to_vec()),
        (MAIN_DOCUMENT_PART, document_xml(body).into_bytes()),
        ("word/styles.xml", STYLES.as_bytes().to_vec()),
    ]);
    Ok(package.to_bytes()?)
}

/// Creates a `.docx` file with the given body XML in the specified directory
pub fn create_test_docx(dir: &Path, filename: &str, body: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, docx_bytes(body)?)?;
    Ok(file_path)
}

/// Reads the main document XML of a `.docx` file
pub fn read_document_xml(path: &Path) -> Result<String> {
    let package = DocxPackage::from_bytes(&fs::read(path)?)?;
    Ok(package.main_document_xml()?.to_string())
}
