/*!
 * Text model of the main document part.
 *
 * The XML of `word/document.xml` is kept as an owned event stream. The
 * model only records where run text lives in that stream, so writing the
 * document back touches nothing except run text that was edited.
 *
 * Modelled structure:
 * - `w:body/w:p` - top-level paragraphs
 * - `w:body/w:tbl/w:tr/w:tc/w:p` - paragraphs of top-level table cells
 * - `w:p/w:r` - runs, whose text is built from `w:t`, `w:tab`, `w:br` and `w:cr`
 *
 * Paragraphs inside nested tables, content controls or hyperlinks are not
 * part of the model.
 */

use log::debug;
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::errors::DocxError;
use super::package::MAIN_DOCUMENT_PART;

// @enum: Piece of run content
#[derive(Debug, Clone, PartialEq)]
enum RunPiece {
    // @variant: Content of a `w:t` element; `event` indexes the source Text event
    Text { event: Option<usize>, text: String },
    // @variant: `w:tab`
    Tab,
    // @variant: `w:br` / `w:cr`
    Break,
}

/// The smallest independently formatted text fragment of a paragraph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pieces: Vec<RunPiece>,
}

impl Run {
    /// Create a detached run holding plain text
    pub fn new(text: &str) -> Self {
        Self {
            pieces: vec![RunPiece::Text { event: None, text: text.to_string() }],
        }
    }

    /// Full text of the run
    pub fn text(&self) -> String {
        let mut text = String::new();
        for piece in &self.pieces {
            match piece {
                RunPiece::Text { text: t, .. } => text.push_str(t),
                RunPiece::Tab => text.push('\t'),
                RunPiece::Break => text.push('\n'),
            }
        }
        text
    }

    /// Replace every occurrence of `from` with `to`.
    ///
    /// Returns true if at least one character was replaced.
    pub fn replace_char(&mut self, from: char, to: char) -> bool {
        let mut replaced = false;
        for piece in &mut self.pieces {
            if let RunPiece::Text { text, .. } = piece {
                if text.contains(from) {
                    *text = text.replace(from, to.encode_utf8(&mut [0; 4]));
                    replaced = true;
                }
            }
        }
        replaced
    }
}

/// A text block: top-level paragraph or paragraph of a table cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Create a detached paragraph from runs
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }
}

/// A table cell holding its paragraphs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
}

/// A table row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

/// A top-level table; nested tables are not modelled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Row>,
}

/// Main document: top-level paragraphs and top-level tables
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
    pub tables: Vec<Table>,
    events: Vec<Event<'static>>,
}

// @enum: What an open element stands for in the model
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scope {
    Body,
    Table,
    Row,
    Cell,
    Paragraph,
    Run,
    RunText,
    Other,
}

// @enum: Where a finished paragraph is attached
#[derive(Debug, Clone, Copy, PartialEq)]
enum ParagraphOwner {
    Body,
    Cell,
}

// @struct: Mutable state while walking the event stream
struct ModelBuilder {
    scopes: Vec<Scope>,
    paragraphs: Vec<Paragraph>,
    tables: Vec<Table>,
    paragraph: Option<(Paragraph, ParagraphOwner)>,
    run: Option<Run>,
}

impl ModelBuilder {
    fn new() -> Self {
        Self {
            scopes: Vec::new(),
            paragraphs: Vec::new(),
            tables: Vec::new(),
            paragraph: None,
            run: None,
        }
    }

    fn parent(&self) -> Option<Scope> {
        self.scopes.last().copied()
    }

    /// Decide the scope of an element from its name and its parent
    fn classify(&self, name: &[u8]) -> Scope {
        match (name, self.parent()) {
            (b"w:body", _) => Scope::Body,
            (b"w:tbl", Some(Scope::Body)) => Scope::Table,
            (b"w:tr", Some(Scope::Table)) => Scope::Row,
            (b"w:tc", Some(Scope::Row)) => Scope::Cell,
            (b"w:p", Some(Scope::Body | Scope::Cell)) => Scope::Paragraph,
            (b"w:r", Some(Scope::Paragraph)) => Scope::Run,
            (b"w:t", Some(Scope::Run)) => Scope::RunText,
            _ => Scope::Other,
        }
    }

    fn open(&mut self, scope: Scope) {
        match scope {
            Scope::Table => self.tables.push(Table::default()),
            Scope::Row => {
                if let Some(table) = self.tables.last_mut() {
                    table.rows.push(Row::default());
                }
            }
            Scope::Cell => {
                if let Some(row) = self.tables.last_mut().and_then(|t| t.rows.last_mut()) {
                    row.cells.push(Cell::default());
                }
            }
            Scope::Paragraph => {
                let owner = if self.parent() == Some(Scope::Cell) {
                    ParagraphOwner::Cell
                } else {
                    ParagraphOwner::Body
                };
                self.paragraph = Some((Paragraph::default(), owner));
            }
            Scope::Run => self.run = Some(Run::default()),
            _ => {}
        }
    }

    fn close(&mut self, scope: Scope) {
        match scope {
            Scope::Run => {
                if let (Some(run), Some((paragraph, _))) = (self.run.take(), self.paragraph.as_mut()) {
                    paragraph.runs.push(run);
                }
            }
            Scope::Paragraph => {
                if let Some((paragraph, owner)) = self.paragraph.take() {
                    match owner {
                        ParagraphOwner::Body => self.paragraphs.push(paragraph),
                        ParagraphOwner::Cell => {
                            if let Some(cell) = self
                                .tables
                                .last_mut()
                                .and_then(|t| t.rows.last_mut())
                                .and_then(|r| r.cells.last_mut())
                            {
                                cell.paragraphs.push(paragraph);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn start(&mut self, name: &[u8]) {
        let scope = self.classify(name);
        self.open(scope);
        self.scopes.push(scope);
    }

    fn end(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            self.close(scope);
        }
    }

    fn empty(&mut self, name: &[u8]) {
        if self.parent() == Some(Scope::Run) {
            if let Some(run) = self.run.as_mut() {
                match name {
                    b"w:tab" => run.pieces.push(RunPiece::Tab),
                    b"w:br" | b"w:cr" => run.pieces.push(RunPiece::Break),
                    _ => {}
                }
            }
            return;
        }

        // Self-closing structural elements still occupy a slot in the model
        let scope = self.classify(name);
        self.open(scope);
        self.close(scope);
    }

    fn text(&mut self, event_index: usize, text: String) {
        if self.parent() == Some(Scope::RunText) {
            if let Some(run) = self.run.as_mut() {
                run.pieces.push(RunPiece::Text { event: Some(event_index), text });
            }
        }
    }
}

fn xml_error(err: impl std::fmt::Display) -> DocxError {
    DocxError::Xml {
        part: MAIN_DOCUMENT_PART.to_string(),
        message: err.to_string(),
    }
}

impl Document {
    /// Create a detached document, mostly useful for tests
    pub fn from_parts(paragraphs: Vec<Paragraph>, tables: Vec<Table>) -> Self {
        Self { paragraphs, tables, events: Vec::new() }
    }

    /// Parse the main document XML
    pub fn parse(xml: &str) -> Result<Self, DocxError> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = Reader::from_str(xml);
        // Whitespace inside w:t is significant
        reader.trim_text(false);

        let mut builder = ModelBuilder::new();
        let mut events = Vec::new();

        loop {
            let event = reader.read_event().map_err(xml_error)?;
            let index = events.len();
            match &event {
                Event::Start(e) => builder.start(e.name().as_ref()),
                Event::End(_) => builder.end(),
                Event::Empty(e) => builder.empty(e.name().as_ref()),
                Event::Text(e) => {
                    let text = e.unescape().map_err(xml_error)?;
                    builder.text(index, text.into_owned());
                }
                Event::Eof => break,
                _ => {}
            }
            events.push(event.into_owned());
        }

        debug!(
            "Parsed {} XML events: {} top-level paragraphs, {} tables",
            events.len(),
            builder.paragraphs.len(),
            builder.tables.len()
        );

        Ok(Self {
            paragraphs: builder.paragraphs,
            tables: builder.tables,
            events,
        })
    }

    /// Serialize the document back to XML, applying edited run text
    pub fn to_xml(&self) -> Result<String, DocxError> {
        let mut patched: Vec<Option<&str>> = vec![None; self.events.len()];
        for run in self.runs() {
            for piece in &run.pieces {
                if let RunPiece::Text { event: Some(index), text } = piece {
                    if let Some(slot) = patched.get_mut(*index) {
                        *slot = Some(text.as_str());
                    }
                }
            }
        }

        let mut writer = Writer::new(Vec::new());
        for (event, replacement) in self.events.iter().zip(patched) {
            match (event, replacement) {
                (Event::Text(original), Some(text)) => {
                    // Untouched text keeps its original escaping
                    let unchanged = original.unescape().map(|t| t == text).unwrap_or(false);
                    if unchanged {
                        writer.write_event(event).map_err(xml_error)?;
                    } else {
                        writer.write_event(Event::Text(BytesText::new(text))).map_err(xml_error)?;
                    }
                }
                _ => writer.write_event(event).map_err(xml_error)?,
            }
        }

        String::from_utf8(writer.into_inner()).map_err(|_| DocxError::Encoding(MAIN_DOCUMENT_PART.to_string()))
    }

    /// Every run of the model, top-level paragraphs first
    fn runs(&self) -> impl Iterator<Item = &Run> {
        let body = self.paragraphs.iter();
        let cells = self
            .tables
            .iter()
            .flat_map(|t| &t.rows)
            .flat_map(|r| &r.cells)
            .flat_map(|c| &c.paragraphs);
        body.chain(cells).flat_map(|p| &p.runs)
    }
}
