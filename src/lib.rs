/*!
 * # docx-checkbox-fix
 *
 * Unchecks the "geeignete Person" checkbox of a Word template by rewriting
 * checkbox glyphs that are stored as plain text.
 *
 * ## Features
 *
 * - Finds paragraphs containing "geeignete Person" or "geeignete Stelle",
 *   both at top level and inside table cells
 * - Replaces `☑`, `✓` and `✔` with `☐` in the runs of paragraphs that
 *   contain "geeignete Person"
 * - Writes a verified backup (`*.backup.docx`) before overwriting the
 *   original, and writes nothing when nothing changed
 * - Leaves every other part of the package byte-for-byte untouched
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Load, scan, back up and save one document
 * - `checkbox_fixer`: Marker detection and glyph replacement
 * - `docx`: Document support:
 *   - `docx::package`: Zip container I/O
 *   - `docx::model`: Paragraph, table and run model of `word/document.xml`
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod checkbox_fixer;
pub mod docx;
pub mod errors;
pub mod file_utils;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FixOutcome};
pub use checkbox_fixer::{fix_checkboxes, FixEvent, FixReport};
pub use docx::{Document, DocxPackage};
pub use errors::{AppError, DocxError};
