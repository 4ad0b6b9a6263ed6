use anyhow::{Result, Context, anyhow};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::checkbox_fixer::{self, FixEvent, FixReport, UNCHECKED_GLYPH};
use crate::docx::{Document, DocxPackage, MAIN_DOCUMENT_PART};
use crate::errors::AppError;
use crate::file_utils::FileManager;

// @module: Application controller for checkbox fixing

/// Result of processing one document
#[derive(Debug, Clone)]
pub struct FixOutcome {
    /// Scan report
    pub report: FixReport,

    /// Backup written before overwriting, if any
    pub backup_path: Option<PathBuf>,

    /// Whether the original document was overwritten
    pub saved: bool,
}

impl FixOutcome {
    /// Number of replacements performed
    pub fn changes(&self) -> usize {
        self.report.changes
    }
}

// @struct: A document read from disk, ready to be fixed
struct LoadedDocument {
    original: Vec<u8>,
    package: DocxPackage,
    document: Document,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Scan and report without writing
    dry_run: bool,
}

impl Controller {
    /// Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        Ok(Self {
            config,
            dry_run: false,
        })
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Document this controller works on
    pub fn template_path(&self) -> &Path {
        &self.config.template_path
    }

    /// Run the main workflow on the configured document
    pub fn run(&self) -> Result<FixOutcome> {
        let path = self.config.template_path.clone();

        println!("🔧 Fixing checkboxes in Word template...");
        println!("📄 File: {}\n", path.display());

        let outcome = self.fix_document(&path)?;

        if outcome.changes() == 0 {
            println!("\nℹ️  The document likely uses Word's native checkbox content controls.");
            println!("   You'll need to open it in Word/LibreOffice and manually uncheck the box.");
        }

        Ok(outcome)
    }

    /// Load, scan and, if anything changed, back up and overwrite one document
    pub fn fix_document(&self, path: &Path) -> Result<FixOutcome> {
        let LoadedDocument { original, mut package, mut document } = Self::load_document(path)
            .with_context(|| format!("Failed to open document: {:?}", path))?;

        info!("Loaded {:?} ({} bytes, {} package entries)", path, original.len(), package.entries().len());

        let report = checkbox_fixer::fix_checkboxes(&mut document);
        Self::print_events(&report);

        if !report.has_changes() {
            warn!("No checked glyphs replaced in {:?}", path);
            println!("\n⚠️  No checkboxes found to change. The document may use Word's native checkbox controls.");
            println!("   Please open the document in Word and manually uncheck the 'geeignete Person' box.");
            return Ok(FixOutcome { report, backup_path: None, saved: false });
        }

        if self.dry_run {
            println!("\n🔍 Dry run: {} change(s) found, nothing written.", report.changes);
            return Ok(FixOutcome { report, backup_path: None, saved: false });
        }

        let backup_path = FileManager::backup_path(path)?;
        println!("\n📦 Creating backup: {}", backup_path.display());
        Self::write_verified_backup(&backup_path, &original, path)?;

        let xml = document.to_xml()?;
        package.replace_part(MAIN_DOCUMENT_PART, xml.into_bytes())?;
        let updated = package.to_bytes()
            .with_context(|| format!("Failed to serialize document: {:?}", path))?;

        println!("💾 Saving changes to: {}", path.display());
        FileManager::write_bytes_atomic(path, &updated)?;
        info!("Wrote {} bytes to {:?}", updated.len(), path);

        println!(
            "\n✅ Successfully made {} change(s)! ({} marked paragraph(s))",
            report.changes, report.marked_paragraphs
        );

        Ok(FixOutcome { report, backup_path: Some(backup_path), saved: true })
    }

    // @parses: Package and main document part of `path`
    fn load_document(path: &Path) -> Result<LoadedDocument, AppError> {
        let original = FileManager::read_bytes(path)?;
        let package = DocxPackage::from_bytes(&original)?;
        let document = Document::parse(package.main_document_xml()?)?;
        debug!("Parsed {} of {:?}", MAIN_DOCUMENT_PART, path);

        Ok(LoadedDocument { original, package, document })
    }

    /// Write the backup with the document's permissions and make sure it holds exactly the original bytes
    fn write_verified_backup(backup_path: &Path, original: &[u8], document_path: &Path) -> Result<()> {
        FileManager::write_bytes_atomic_like(backup_path, original, document_path)
            .with_context(|| format!("Failed to write backup: {:?}", backup_path))?;

        let written = FileManager::read_bytes(backup_path)?;
        if written != original {
            error!("Backup {:?} does not match the original document", backup_path);
            return Err(anyhow!(
                "Backup verification failed for {:?}: content differs from the original ({} vs {} bytes)",
                backup_path, written.len(), original.len()
            ));
        }

        debug!("Backup {:?} verified ({} bytes)", backup_path, written.len());
        Ok(())
    }

    /// Print one console line per finding
    fn print_events(report: &FixReport) {
        for event in &report.events {
            match event {
                FixEvent::MarkerFound { location, text } => {
                    debug!("Marker found at {}", location);
                    if location.in_table() {
                        println!("Found in table: {}", text);
                    } else {
                        println!("Found: {}", text);
                    }
                }
                FixEvent::GlyphReplaced { location, glyph, run_text } => {
                    let scope = if location.in_table() { " table" } else { "" };
                    println!("  ✓ Changed {} to {} in{}: {}", glyph, UNCHECKED_GLYPH, scope, run_text);
                }
            }
        }
    }
}
