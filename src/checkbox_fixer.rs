/*!
 * Marker scanner and glyph replacer.
 *
 * Finds paragraphs whose text contains one of the marker phrases and, inside
 * those paragraphs, turns checked checkbox glyphs into the unchecked glyph.
 * Top-level paragraphs and the paragraphs of every table cell go through the
 * same traversal.
 */

use std::fmt;
use log::debug;

use crate::docx::{Document, Paragraph, Run};

// @module: Checkbox glyph replacement

/// Phrases that mark a paragraph as relevant
pub const MARKER_PHRASES: [&str; 2] = ["geeignete Person", "geeignete Stelle"];

/// Only paragraphs containing this phrase get their glyphs replaced.
///
/// Detection accepts either marker phrase, replacement requires this one.
/// A paragraph reading only "geeignete Stelle ☑" is reported but left as is.
pub const REPLACEMENT_PHRASE: &str = "geeignete Person";

/// Glyphs representing a checked box, in replacement order
pub const CHECKED_GLYPHS: [char; 3] = ['☑', '✓', '✔'];

/// Glyph representing an unchecked box
pub const UNCHECKED_GLYPH: char = '☐';

/// Position of a paragraph inside the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLocation {
    /// Top-level paragraph
    Body { paragraph: usize },
    /// Paragraph of a table cell
    TableCell {
        table: usize,
        row: usize,
        cell: usize,
        paragraph: usize,
    },
}

impl BlockLocation {
    /// True for paragraphs inside a table
    pub fn in_table(&self) -> bool {
        matches!(self, Self::TableCell { .. })
    }
}

impl fmt::Display for BlockLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body { paragraph } => write!(f, "paragraph {}", paragraph + 1),
            Self::TableCell { table, row, cell, paragraph } => write!(
                f,
                "table {} row {} cell {} paragraph {}",
                table + 1,
                row + 1,
                cell + 1,
                paragraph + 1
            ),
        }
    }
}

/// Something the scanner found or changed
#[derive(Debug, Clone, PartialEq)]
pub enum FixEvent {
    /// A paragraph contains a marker phrase
    MarkerFound {
        location: BlockLocation,
        text: String,
    },
    /// Every occurrence of `glyph` in one run was replaced
    GlyphReplaced {
        location: BlockLocation,
        glyph: char,
        run_text: String,
    },
}

/// Outcome of one scan over a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixReport {
    /// Number of (run, glyph kind) pairs replaced
    pub changes: usize,

    /// Number of paragraphs containing a marker phrase
    pub marked_paragraphs: usize,

    /// Findings and edits in document order
    pub events: Vec<FixEvent>,
}

impl FixReport {
    /// True if the document was modified
    pub fn has_changes(&self) -> bool {
        self.changes > 0
    }
}

/// Returns true if the text contains any marker phrase
pub fn contains_marker(text: &str) -> bool {
    MARKER_PHRASES.iter().any(|phrase| text.contains(phrase))
}

/// Scan the whole document and replace checked glyphs in marked paragraphs
pub fn fix_checkboxes(document: &mut Document) -> FixReport {
    let mut report = FixReport::default();

    fix_paragraphs(&mut document.paragraphs, |paragraph| BlockLocation::Body { paragraph }, &mut report);

    for (t, table) in document.tables.iter_mut().enumerate() {
        for (r, row) in table.rows.iter_mut().enumerate() {
            for (c, cell) in row.cells.iter_mut().enumerate() {
                fix_paragraphs(
                    &mut cell.paragraphs,
                    |paragraph| BlockLocation::TableCell { table: t, row: r, cell: c, paragraph },
                    &mut report,
                );
            }
        }
    }

    debug!(
        "Scan finished: {} marked paragraph(s), {} change(s)",
        report.marked_paragraphs, report.changes
    );

    report
}

/// Scan one sequence of paragraphs, top-level or from a single cell
pub fn fix_paragraphs<F>(paragraphs: &mut [Paragraph], locate: F, report: &mut FixReport)
where
    F: Fn(usize) -> BlockLocation,
{
    for (index, paragraph) in paragraphs.iter_mut().enumerate() {
        let text = paragraph.text();
        if !contains_marker(&text) {
            continue;
        }

        let location = locate(index);
        report.marked_paragraphs += 1;

        let replace = text.contains(REPLACEMENT_PHRASE);
        report.events.push(FixEvent::MarkerFound { location, text });

        replace_glyphs(&mut paragraph.runs, replace, location, report);
    }
}

/// Replace checked glyphs run by run.
///
/// `replace` carries the paragraph-level decision; a run's own text never
/// decides whether it is edited.
fn replace_glyphs(runs: &mut [Run], replace: bool, location: BlockLocation, report: &mut FixReport) {
    if !replace {
        return;
    }

    for run in runs.iter_mut() {
        for glyph in CHECKED_GLYPHS {
            if run.replace_char(glyph, UNCHECKED_GLYPH) {
                report.changes += 1;
                report.events.push(FixEvent::GlyphReplaced {
                    location,
                    glyph,
                    run_text: run.text(),
                });
            }
        }
    }
}
