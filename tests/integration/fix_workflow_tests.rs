/*!
 * Integration tests for the load, fix, back up and save workflow
 */

use std::fs;
use anyhow::Result;
use docx_checkbox_fix::app_config::Config;
use docx_checkbox_fix::app_controller::Controller;
use docx_checkbox_fix::docx::{Document, DocxPackage};
use crate::common;

fn controller_for(path: &std::path::Path) -> Result<Controller> {
    common::init_test_logging();
    let config = Config {
        template_path: path.to_path_buf(),
        ..Config::default()
    };
    Controller::with_config(config)
}

/// Test the single-paragraph scenario end to end
#[test]
fn test_run_withCheckedPersonBox_shouldBackupAndOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_docx(
        temp_dir.path(),
        "certificate-template.docx",
        &common::paragraph(&["Ich bin eine geeignete Person ☑"]),
    )?;
    let original_bytes = fs::read(&path)?;

    let outcome = controller_for(&path)?.run()?;

    assert_eq!(outcome.changes(), 1);
    assert!(outcome.saved);

    let backup_path = temp_dir.path().join("certificate-template.backup.docx");
    assert_eq!(outcome.backup_path.as_deref(), Some(backup_path.as_path()));
    assert_eq!(fs::read(&backup_path)?, original_bytes);

    let xml = common::read_document_xml(&path)?;
    let document = Document::parse(&xml)?;
    assert_eq!(document.paragraphs[0].text(), "Ich bin eine geeignete Person ☐");

    Ok(())
}

/// Test that nothing is written when no glyph needs replacing
#[test]
fn test_run_withoutMarkers_shouldWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_docx(temp_dir.path(), "plain.docx", &common::paragraph(&["Nur Text ☑"]))?;
    let original_bytes = fs::read(&path)?;

    let outcome = controller_for(&path)?.run()?;

    assert_eq!(outcome.changes(), 0);
    assert!(!outcome.saved);
    assert!(outcome.backup_path.is_none());
    assert_eq!(fs::read(&path)?, original_bytes);
    assert!(!temp_dir.path().join("plain.backup.docx").exists());

    Ok(())
}

/// Test the Stelle-only table cell scenario writes nothing
#[test]
fn test_run_withStelleOnlyTableCell_shouldWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = common::table(&[&common::paragraph(&["geeignete Stelle ☑"])]);
    let path = common::create_test_docx(temp_dir.path(), "stelle.docx", &body)?;
    let original_bytes = fs::read(&path)?;

    let outcome = controller_for(&path)?.run()?;

    assert_eq!(outcome.changes(), 0);
    assert_eq!(outcome.report.marked_paragraphs, 1);
    assert_eq!(fs::read(&path)?, original_bytes);
    assert!(!temp_dir.path().join("stelle.backup.docx").exists());

    Ok(())
}

/// Test that a second run finds nothing left to change
#[test]
fn test_run_twice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = format!(
        "{}{}",
        common::paragraph(&["geeignete Person ✓"]),
        common::table(&[&common::paragraph(&["geeignete Person", " ✔"])])
    );
    let path = common::create_test_docx(temp_dir.path(), "twice.docx", &body)?;
    let controller = controller_for(&path)?;

    let first = controller.run()?;
    let after_first = fs::read(&path)?;
    let backup_after_first = fs::read(temp_dir.path().join("twice.backup.docx"))?;
    let second = controller.run()?;

    assert_eq!(first.changes(), 2);
    assert_eq!(second.changes(), 0);
    assert_eq!(fs::read(&path)?, after_first);
    assert_eq!(fs::read(temp_dir.path().join("twice.backup.docx"))?, backup_after_first);

    Ok(())
}

/// Test that parts other than the main document survive unchanged
#[test]
fn test_run_withChanges_shouldPreserveOtherPackageParts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_docx(temp_dir.path(), "parts.docx", &common::paragraph(&["geeignete Person ☑"]))?;
    let before = DocxPackage::from_bytes(&fs::read(&path)?)?;

    controller_for(&path)?.run()?;
    let after = DocxPackage::from_bytes(&fs::read(&path)?)?;

    let names = |p: &DocxPackage| p.entries().iter().map(|e| e.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&before), names(&after));
    assert_eq!(before.part("word/styles.xml"), after.part("word/styles.xml"));
    assert_eq!(before.part("_rels/.rels"), after.part("_rels/.rels"));

    let xml_before = before.main_document_xml()?;
    assert_eq!(after.main_document_xml()?, xml_before.replace('☑', "☐"));

    Ok(())
}

/// Test that dry-run mode reports changes without touching the disk
#[test]
fn test_run_withDryRun_shouldNotWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_docx(temp_dir.path(), "dry.docx", &common::paragraph(&["geeignete Person ☑"]))?;
    let original_bytes = fs::read(&path)?;

    let outcome = controller_for(&path)?.with_dry_run(true).run()?;

    assert_eq!(outcome.changes(), 1);
    assert!(!outcome.saved);
    assert_eq!(fs::read(&path)?, original_bytes);
    assert!(!temp_dir.path().join("dry.backup.docx").exists());

    Ok(())
}

/// Test that a failing backup write leaves the original untouched
#[test]
fn test_run_withUnwritableBackupLocation_shouldNotOverwriteOriginal() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_docx(temp_dir.path(), "blocked.docx", &common::paragraph(&["geeignete Person ☑"]))?;
    let original_bytes = fs::read(&path)?;

    // A directory occupying the backup name makes the rename fail
    fs::create_dir(temp_dir.path().join("blocked.backup.docx"))?;

    let result = controller_for(&path)?.run();

    assert!(result.is_err());
    assert_eq!(fs::read(&path)?, original_bytes);

    Ok(())
}

/// Test that missing and corrupt documents are reported as errors
#[test]
fn test_run_withMissingOrCorruptFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let missing = temp_dir.path().join("missing.docx");
    assert!(controller_for(&missing)?.run().is_err());

    let corrupt = temp_dir.path().join("corrupt.docx");
    fs::write(&corrupt, b"not a zip file")?;
    assert!(controller_for(&corrupt)?.run().is_err());
    assert!(!temp_dir.path().join("corrupt.backup.docx").exists());

    Ok(())
}

/// Test that the controller refuses paths without the .docx suffix
#[test]
fn test_controller_withNonDocxPath_shouldRejectConfiguration() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(controller_for(&temp_dir.path().join("form.doc")).is_err());
    Ok(())
}

/// Test that the fixed document and its backup stay readable for other users
#[cfg(unix)]
#[test]
fn test_run_withWorldReadableTemplate_shouldKeepPermissions() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_docx(temp_dir.path(), "shared.docx", &common::paragraph(&["geeignete Person ☑"]))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;

    let outcome = controller_for(&path)?.run()?;

    assert!(outcome.saved);
    assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o644);
    let backup = temp_dir.path().join("shared.backup.docx");
    assert_eq!(fs::metadata(&backup)?.permissions().mode() & 0o777, 0o644);

    Ok(())
}

/// Test that a symlinked template is fixed at its target and the link survives
#[cfg(unix)]
#[test]
fn test_run_withSymlinkedTemplate_shouldFixLinkTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let real = common::create_test_docx(temp_dir.path(), "real.docx", &common::paragraph(&["geeignete Person ☑"]))?;
    let original_bytes = fs::read(&real)?;
    let link = temp_dir.path().join("link.docx");
    std::os::unix::fs::symlink(&real, &link)?;

    let outcome = controller_for(&link)?.run()?;

    assert_eq!(outcome.changes(), 1);
    assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());

    let document = Document::parse(&common::read_document_xml(&real)?)?;
    assert_eq!(document.paragraphs[0].text(), "geeignete Person ☐");
    assert_eq!(fs::read(temp_dir.path().join("link.backup.docx"))?, original_bytes);

    Ok(())
}
