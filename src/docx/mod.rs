/*!
 * Word-processing document support.
 *
 * - `package`: zip container I/O
 * - `model`: paragraphs, tables and runs of the main document part
 */

pub mod model;
pub mod package;

pub use model::{Cell, Document, Paragraph, Row, Run, Table};
pub use package::{DocxPackage, PackageEntry, MAIN_DOCUMENT_PART};
