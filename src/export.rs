//! Export of the whole diary as a tabular PDF document.
//!
//! Export is split in two: `TableDocument::from_notes` turns the collection into
//! a title, a header row and body rows, and a `TabularRenderer` turns that table
//! into file bytes. `PdfRenderer` is the printpdf-backed renderer used by the CLI.
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};
use tempfile::NamedTempFile;

use crate::{DiaryError, Note, Result};

/// Title printed above the table
pub const EXPORT_TITLE: &str = "My Personal Diary";

/// File name used when no output path is given
pub const DEFAULT_EXPORT_FILE: &str = "diary.pdf";

/// Column headings, in body cell order
pub const EXPORT_HEADER: [&str; 3] = ["Date", "Category", "Content"];

/// A titled table ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDocument {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableDocument {
    /// One `[date, category, text]` row per note, in collection order
    pub fn from_notes(notes: &[Note]) -> Self {
        Self {
            title: EXPORT_TITLE.to_string(),
            header: EXPORT_HEADER.iter().map(|h| h.to_string()).collect(),
            rows: notes
                .iter()
                .map(|note| {
                    vec![
                        note.date.clone(),
                        note.category.to_string(),
                        note.text.clone(),
                    ]
                })
                .collect(),
        }
    }
}

/// Turns a `TableDocument` into the bytes of a file
pub trait TabularRenderer {
    fn render(&self, table: &TableDocument) -> Result<Vec<u8>>;
}

/// Writes the full collection (not a filtered view) to `path`.
///
/// An empty collection returns `NothingToExport` and writes nothing. Any failure
/// while rendering or writing returns `ExportFailed`; the file is written through
/// a temporary sibling, so a failed export never leaves a partial document.
pub fn export_document<R: TabularRenderer>(
    notes: &[Note],
    renderer: &R,
    path: &Path,
) -> Result<PathBuf> {
    if notes.is_empty() {
        warn!("Export requested with no notes");
        return Err(DiaryError::NothingToExport);
    }

    let table = TableDocument::from_notes(notes);
    let bytes = renderer.render(&table).map_err(|e| {
        error!("PDF Logic Error: {}", e);
        export_failed(e)
    })?;

    write_atomically(path, &bytes).map_err(|e| {
        error!("Failed to write export to {}: {}", path.display(), e);
        export_failed(e)
    })?;

    info!("Exported {} notes to {}", notes.len(), path.display());
    Ok(path.to_path_buf())
}

fn export_failed(e: DiaryError) -> DiaryError {
    match e {
        DiaryError::ExportFailed { .. } => e,
        other => DiaryError::ExportFailed {
            message: other.to_string(),
        },
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|_| DiaryError::DirectoryError { path: dir.clone() })?;
    }

    let mut temp_file = NamedTempFile::new_in(&dir)?;
    temp_file.write_all(bytes)?;
    temp_file.flush()?;
    temp_file
        .persist(path)
        .map_err(|e| DiaryError::Io(e.error))?;
    Ok(())
}

/// Page and table geometry for `PdfRenderer`, in millimetres and points
#[derive(Debug, Clone)]
pub struct PdfLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Distance from the top edge to the table on the first page
    pub table_start: f32,
    /// Distance from the top edge to the title baseline
    pub title_top: f32,
    pub title_size: f32,
    pub body_size: f32,
    pub cell_padding: f32,
    /// Widths of the columns; when the count does not match the header the
    /// usable width is split evenly
    pub column_widths: Vec<f32>,
}

impl Default for PdfLayout {
    fn default() -> Self {
        // A4 portrait
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 14.0,
            table_start: 30.0,
            title_top: 20.0,
            title_size: 18.0,
            body_size: 10.0,
            cell_padding: 1.8,
            column_widths: vec![45.0, 28.0, 109.0],
        }
    }
}

impl PdfLayout {
    fn widths_for(&self, columns: usize) -> Vec<f32> {
        if self.column_widths.len() == columns {
            return self.column_widths.clone();
        }
        let usable = self.page_width - 2.0 * self.margin;
        vec![usable / columns.max(1) as f32; columns]
    }

    /// Height of one text line in mm
    fn line_height(&self) -> f32 {
        self.body_size * PT_TO_MM * 1.25
    }

    /// Height of a row holding `lines` lines of text
    fn row_height(&self, lines: usize) -> f32 {
        lines as f32 * self.line_height() + 2.0 * self.cell_padding
    }

    /// Room for text inside a cell of `width` mm
    pub fn text_width(&self, width: f32) -> f32 {
        (width - 2.0 * self.cell_padding).max(0.0)
    }

    /// Lines of text that fit in a row whose top is `cursor` mm from the top edge
    fn lines_fitting(&self, cursor: f32) -> usize {
        let room = self.page_height - self.margin - cursor - 2.0 * self.cell_padding;
        if room <= 0.0 {
            return 0;
        }
        (room / self.line_height()).floor() as usize
    }
}

const PT_TO_MM: f32 = 0.352_778;

/// Advance widths of Helvetica for ASCII 0x20..=0x7E, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold runs at most this much wider than Helvetica for ASCII
const BOLD_ALLOWANCE: f32 = 1.26;

/// Drawn width of `text` in mm at `font_size` points. Characters outside the
/// ASCII table are counted as a full em.
pub fn helvetica_width_mm(text: &str, font_size: f32, bold: bool) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 0x20..=0x7E => u32::from(HELVETICA_WIDTHS[(code - 0x20) as usize]),
            _ => 1000,
        })
        .sum();
    let width = units as f32 / 1000.0 * font_size * PT_TO_MM;
    if bold {
        width * BOLD_ALLOWANCE
    } else {
        width
    }
}

/// Grid-themed PDF table renderer using printpdf's built-in Helvetica
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    layout: PdfLayout,
}

/// A row, or the slice of a row that continues on another page, with its position
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    /// Zero-based page index
    pub page: usize,
    /// Distance from the top edge to the row's top border, in mm
    pub top: f32,
    pub height: f32,
    pub is_header: bool,
    /// Text lines of each cell, in column order
    pub cells: Vec<Vec<String>>,
}

impl PdfRenderer {
    pub fn new(layout: PdfLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &PdfLayout {
        &self.layout
    }

    /// Positions every row of `table` on pages. Rows that would cross the
    /// bottom margin move to the next page; rows taller than a page are split
    /// line-wise. The header row is repeated at the top of every page.
    pub fn plan(&self, table: &TableDocument) -> Vec<PlacedRow> {
        let mut planner = TablePlanner {
            layout: &self.layout,
            widths: self.layout.widths_for(table.header.len()),
            page: 0,
            cursor: self.layout.table_start,
            fresh: false,
            rows: Vec::new(),
        };

        let header = planner.wrap_cells(&table.header, true);
        planner.place(&header, true, 0, line_count(&header));
        for row in &table.rows {
            let cells = planner.wrap_cells(row, false);
            planner.place_splitting(&cells, &header);
        }
        planner.rows
    }
}

fn line_count(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(1).max(1)
}

struct TablePlanner<'a> {
    layout: &'a PdfLayout,
    widths: Vec<f32>,
    page: usize,
    /// Current distance from the top edge, in mm
    cursor: f32,
    /// Nothing but the repeated header has been placed on this page yet
    fresh: bool,
    rows: Vec<PlacedRow>,
}

impl<'a> TablePlanner<'a> {
    fn wrap_cells(&self, cells: &[String], bold: bool) -> Vec<Vec<String>> {
        let size = self.layout.body_size;
        cells
            .iter()
            .zip(&self.widths)
            .map(|(text, width)| {
                wrap_text(text, self.layout.text_width(*width), |s| {
                    helvetica_width_mm(s, size, bold)
                })
            })
            .collect()
    }

    fn place(&mut self, cells: &[Vec<String>], is_header: bool, from: usize, to: usize) {
        let height = self.layout.row_height(to - from);
        let slice = cells
            .iter()
            .map(|lines| {
                let start = from.min(lines.len());
                let end = to.min(lines.len());
                lines[start..end].to_vec()
            })
            .collect();

        self.rows.push(PlacedRow {
            page: self.page,
            top: self.cursor,
            height,
            is_header,
            cells: slice,
        });
        self.cursor += height;
        self.fresh = is_header && self.fresh;
    }

    fn new_page(&mut self, header: &[Vec<String>]) {
        self.page += 1;
        self.cursor = self.layout.margin;
        self.place(header, true, 0, line_count(header));
        self.fresh = true;
    }

    fn place_splitting(&mut self, cells: &[Vec<String>], header: &[Vec<String>]) {
        let total = line_count(cells);
        let fresh_room = self
            .layout
            .lines_fitting(self.layout.margin + self.layout.row_height(line_count(header)));
        let mut offset = 0;

        while offset < total {
            let remaining = total - offset;
            let room = self.layout.lines_fitting(self.cursor);

            if remaining <= room {
                self.place(cells, false, offset, total);
                return;
            }

            if room == 0 || (offset == 0 && remaining <= fresh_room) {
                if self.fresh {
                    // not even one line fits below the header; place one to make progress
                    self.place(cells, false, offset, offset + 1);
                    offset += 1;
                }
                self.new_page(header);
                continue;
            }

            self.place(cells, false, offset, offset + room);
            offset += room;
            self.new_page(header);
        }
    }
}

impl TabularRenderer for PdfRenderer {
    fn render(&self, table: &TableDocument) -> Result<Vec<u8>> {
        let layout = &self.layout;
        debug!("Rendering PDF table with {} rows", table.rows.len());

        let (doc, page, layer) = PdfDocument::new(
            table.title.as_str(),
            Mm(layout.page_width),
            Mm(layout.page_height),
            "Table",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let first_layer = doc.get_page(page).get_layer(layer);
        first_layer.use_text(
            table.title.as_str(),
            layout.title_size,
            Mm(layout.margin),
            Mm(layout.page_height - layout.title_top),
            &font,
        );
        apply_grid_style(&first_layer);

        let widths = layout.widths_for(table.header.len());
        let mut layers = vec![first_layer];

        for row in self.plan(table) {
            while layers.len() <= row.page {
                let (page, layer) =
                    doc.add_page(Mm(layout.page_width), Mm(layout.page_height), "Table");
                let layer = doc.get_page(page).get_layer(layer);
                apply_grid_style(&layer);
                layers.push(layer);
            }
            let font = if row.is_header { &bold } else { &font };
            draw_row(&layers[row.page], layout, &widths, &row, font);
        }
        drop(layers);

        doc.save_to_bytes().map_err(pdf_error)
    }
}

fn draw_row(
    layer: &PdfLayerReference,
    layout: &PdfLayout,
    widths: &[f32],
    row: &PlacedRow,
    font: &IndirectFontRef,
) {
    let top = layout.page_height - row.top;
    let bottom = top - row.height;
    let mut x = layout.margin;

    for (lines, width) in row.cells.iter().zip(widths) {
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x), Mm(top)), false),
                (Point::new(Mm(x + width), Mm(top)), false),
                (Point::new(Mm(x + width), Mm(bottom)), false),
                (Point::new(Mm(x), Mm(bottom)), false),
            ],
            is_closed: true,
        });

        for (i, line) in lines.iter().enumerate() {
            let baseline = top - layout.cell_padding - (i as f32 + 0.8) * layout.line_height();
            layer.use_text(
                line.clone(),
                layout.body_size,
                Mm(x + layout.cell_padding),
                Mm(baseline),
                font,
            );
        }
        x += width;
    }
}

fn apply_grid_style(layer: &PdfLayerReference) {
    layer.set_outline_thickness(0.3);
    layer.set_outline_color(Color::Rgb(Rgb::new(0.4, 0.4, 0.4, None)));
}

fn pdf_error(e: printpdf::Error) -> DiaryError {
    DiaryError::ExportFailed {
        message: e.to_string(),
    }
}

/// Word-wraps `text` so that `measure` of every line stays within `max_width`.
/// Words wider than a line are split between characters; explicit newlines
/// are kept.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut rest = word;
            while measure(rest) > max_width {
                let cut = split_point(rest, max_width, &measure);
                lines.push(rest[..cut].to_string());
                rest = &rest[cut..];
            }
            current = rest.to_string();
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Byte index of the longest prefix of `word` that fits, never less than one character
fn split_point<F>(word: &str, max_width: f32, measure: &F) -> usize
where
    F: Fn(&str) -> f32,
{
    let mut end = 0;
    for (idx, ch) in word.char_indices() {
        let next = idx + ch.len_utf8();
        if end > 0 && measure(&word[..next]) > max_width {
            break;
        }
        end = next;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Keeps the last table it was asked to render
    #[derive(Default)]
    struct RecordingRenderer {
        seen: RefCell<Option<TableDocument>>,
    }

    impl TabularRenderer for RecordingRenderer {
        fn render(&self, table: &TableDocument) -> Result<Vec<u8>> {
            *self.seen.borrow_mut() = Some(table.clone());
            Ok(b"table".to_vec())
        }
    }

    struct FailingRenderer;

    impl TabularRenderer for FailingRenderer {
        fn render(&self, _table: &TableDocument) -> Result<Vec<u8>> {
            Err(DiaryError::ExportFailed {
                message: "font missing".to_string(),
            })
        }
    }

    fn two_notes() -> Vec<Note> {
        vec![
            Note::new(2, "Call mom".to_string(), "1/2/2024 8:00:00 PM".to_string(), Category::Love),
            Note::new(1, "Ship release".to_string(), "1/1/2024 9:30:00 AM".to_string(), Category::Work),
        ]
    }

    #[test]
    fn test_empty_collection_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("diary.pdf");
        let renderer = RecordingRenderer::default();

        let err = export_document(&[], &renderer, &path).unwrap_err();
        assert!(matches!(err, DiaryError::NothingToExport));
        assert!(!path.exists());
        assert!(renderer.seen.borrow().is_none());
    }

    #[test]
    fn test_rows_follow_collection_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("diary.pdf");
        let renderer = RecordingRenderer::default();

        export_document(&two_notes(), &renderer, &path).unwrap();

        let table = renderer.seen.borrow().clone().unwrap();
        assert_eq!(table.title, "My Personal Diary");
        assert_eq!(table.header, vec!["Date", "Category", "Content"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["1/2/2024 8:00:00 PM", "Love", "Call mom"],
                vec!["1/1/2024 9:30:00 AM", "Work", "Ship release"],
            ]
        );
        assert_eq!(fs::read(&path).unwrap(), b"table");
    }

    #[test]
    fn test_render_failure_is_reported_without_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("diary.pdf");

        let err = export_document(&two_notes(), &FailingRenderer, &path).unwrap_err();
        match err {
            DiaryError::ExportFailed { message } => assert_eq!(message, "font missing"),
            other => panic!("expected ExportFailed, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_pdf_renderer_produces_pdf_bytes() {
        let mut notes = two_notes();
        // enough rows to force a second page
        for i in 0..80 {
            notes.push(Note::new(
                100 + i,
                format!("entry number {} with a longer body that has to wrap inside the content column", i),
                "1/1/2024 9:30:00 AM".to_string(),
                Category::General,
            ));
        }

        let bytes = PdfRenderer::default()
            .render(&TableDocument::from_notes(&notes))
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_wrap_text() {
        let chars = |s: &str| s.chars().count() as f32;
        assert_eq!(wrap_text("", 10.0, chars), vec![""]);
        assert_eq!(wrap_text("short", 10.0, chars), vec!["short"]);
        assert_eq!(wrap_text("one two three", 7.0, chars), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefghij", 4.0, chars), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\nb", 10.0, chars), vec!["a", "b"]);
    }

    #[test]
    fn test_helvetica_widths() {
        // 'W' is 944 units, 'i' 222 units
        let w = helvetica_width_mm("W", 10.0, false);
        assert!((w - 0.944 * 10.0 * PT_TO_MM).abs() < 1e-4);
        assert!(helvetica_width_mm("i", 10.0, false) < w);
        assert!(helvetica_width_mm("W", 10.0, true) > w);
        assert!((helvetica_width_mm("မ", 10.0, false) - 10.0 * PT_TO_MM).abs() < 1e-4);
    }

    #[test]
    fn test_wide_capitals_stay_inside_cells() {
        let renderer = PdfRenderer::default();
        let layout = renderer.layout().clone();
        let notes = vec![
            Note::new(2, "W".repeat(300), "12/31/2024 11:59:59 PM".to_string(), Category::Health),
            Note::new(
                1,
                "MOW THE WWW LAWN AND WASH THE MMMM WINDOWS ".repeat(20),
                "1/1/2024 9:30:00 AM".to_string(),
                Category::General,
            ),
        ];

        let widths = layout.widths_for(3);
        for row in renderer.plan(&TableDocument::from_notes(&notes)) {
            for (lines, width) in row.cells.iter().zip(&widths) {
                for line in lines {
                    let drawn = helvetica_width_mm(line, layout.body_size, row.is_header);
                    assert!(
                        drawn <= layout.text_width(*width) + 1e-3,
                        "line {:?} is {} mm wide in a {} mm column",
                        line,
                        drawn,
                        width
                    );
                }
            }
        }
    }

    #[test]
    fn test_note_taller_than_a_page_is_split_across_pages() {
        let renderer = PdfRenderer::default();
        let layout = renderer.layout().clone();
        let text = "word ".repeat(1200);
        let notes = vec![Note::new(1, text.clone(), "1/1/2024 9:30:00 AM".to_string(), Category::Work)];

        let rows = renderer.plan(&TableDocument::from_notes(&notes));

        let expected = wrap_text(&text, layout.text_width(layout.column_widths[2]), |s| {
            helvetica_width_mm(s, layout.body_size, false)
        });
        let placed: Vec<String> = rows
            .iter()
            .filter(|r| !r.is_header)
            .flat_map(|r| r.cells[2].clone())
            .collect();
        assert_eq!(placed, expected);

        let pages = rows.iter().map(|r| r.page).max().unwrap() + 1;
        assert!(pages > 1);
        for row in &rows {
            assert!(row.top >= 0.0);
            assert!(
                row.top + row.height <= layout.page_height - layout.margin + 1e-3,
                "row on page {} ends at {} mm",
                row.page,
                row.top + row.height
            );
        }
        // every page opens with the header
        for page in 0..pages {
            let first = rows.iter().find(|r| r.page == page).unwrap();
            assert!(first.is_header);
        }

        let bytes = renderer.render(&TableDocument::from_notes(&notes)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_short_rows_move_whole_to_next_page() {
        let renderer = PdfRenderer::default();
        let notes: Vec<Note> = (0..120)
            .map(|i| {
                Note::new(
                    i,
                    format!("entry {} that wraps once the content column fills up with a fair bit of text", i),
                    "1/1/2024 9:30:00 AM".to_string(),
                    Category::Love,
                )
            })
            .collect();

        let rows = renderer.plan(&TableDocument::from_notes(&notes));
        let body: Vec<&PlacedRow> = rows.iter().filter(|r| !r.is_header).collect();
        // no row was split
        assert_eq!(body.len(), notes.len());
        assert!(body.last().unwrap().page > 0);
    }
}
