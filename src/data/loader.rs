use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::data::table::{Cell, Table};

/// Most sheets the ingestion controls offer to concatenate.
pub const MAX_SHEETS: usize = 5;

/// Declared format of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FileKind {
    /// Tab separated text (`.txt`, `.tsv`).
    #[default]
    TabSeparated,
    /// Comma separated text (`.csv`).
    CommaSeparated,
    /// Excel or OpenDocument workbook.
    Spreadsheet,
}

impl FileKind {
    pub const ALL: [FileKind; 3] = [
        FileKind::TabSeparated,
        FileKind::CommaSeparated,
        FileKind::Spreadsheet,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::TabSeparated => "Tab separated .txt",
            FileKind::CommaSeparated => "Comma separated .csv",
            FileKind::Spreadsheet => ".xlsx / .xls",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "tsv" | "tab" => Some(FileKind::TabSeparated),
            "csv" => Some(FileKind::CommaSeparated),
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(FileKind::Spreadsheet),
            _ => None,
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "text/plain" | "text/tab-separated-values" => Some(FileKind::TabSeparated),
            "text/csv" | "application/csv" => Some(FileKind::CommaSeparated),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.oasis.opendocument.spreadsheet" => Some(FileKind::Spreadsheet),
            _ => None,
        }
    }

    fn delimiter(&self) -> Option<u8> {
        match self {
            FileKind::TabSeparated => Some(b'\t'),
            FileKind::CommaSeparated => Some(b','),
            FileKind::Spreadsheet => None,
        }
    }
}

/// Zero-based indices of the workbook sheets to stack, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSelection(Vec<usize>);

impl SheetSelection {
    /// The first `count` sheets, where `count` is in `1..=MAX_SHEETS`.
    pub fn first(count: usize) -> Result<Self, LoadError> {
        if !(1..=MAX_SHEETS).contains(&count) {
            return Err(LoadError::SheetCount(count));
        }
        Ok(Self((0..count).collect()))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl Default for SheetSelection {
    fn default() -> Self {
        Self(vec![0])
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("file is not valid UTF-8 text (byte {offset})")]
    Encoding { offset: usize },
    #[error("cannot parse delimited text: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row} has {found} fields, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("cannot read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("sheet {0} does not exist in the workbook")]
    MissingSheet(usize),
    #[error("no sheets selected")]
    NoSheetsSelected,
    #[error("can stack 1 to {max} sheets, not {0}", max = MAX_SHEETS)]
    SheetCount(usize),
    #[error("no data rows found")]
    Empty,
}

/// Parse an in-memory upload into a header-less table.
///
/// `sheets` is only consulted for spreadsheets.
pub fn load_table(bytes: &[u8], kind: FileKind, sheets: &SheetSelection) -> Result<Table, LoadError> {
    let table = match kind.delimiter() {
        Some(delimiter) => load_delimited(bytes, delimiter)?,
        None => load_spreadsheet(bytes, sheets)?,
    };

    if table.row_count() == 0 {
        return Err(LoadError::Empty);
    }
    tracing::info!(
        "Loaded {:?} table: {} rows x {} columns",
        kind,
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

fn load_delimited(bytes: &[u8], delimiter: u8) -> Result<Table, LoadError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| LoadError::Encoding { offset: e.valid_up_to() })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        if let Some(first) = rows.first() {
            if record.len() != first.len() {
                return Err(LoadError::Ragged { row, expected: first.len(), found: record.len() });
            }
        }
        rows.push(record.iter().map(Cell::parse).collect());
    }

    Ok(Table::from_rows(rows))
}

fn load_spreadsheet(bytes: &[u8], sheets: &SheetSelection) -> Result<Table, LoadError> {
    use calamine::{open_workbook_auto_from_rs, Data, Reader};

    if sheets.indices().is_empty() {
        return Err(LoadError::NoSheetsSelected);
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for &sheet in sheets.indices() {
        let range = workbook
            .worksheet_range_at(sheet)
            .ok_or(LoadError::MissingSheet(sheet))??;

        // Ranges start at the first used cell; keep columns at their sheet position.
        let col_offset = range.start().map_or(0, |(_, col)| col as usize);
        tracing::debug!("Sheet {sheet}: {} rows, column offset {col_offset}", range.height());

        for row in range.rows() {
            let mut cells = vec![Cell::Empty; col_offset];
            cells.extend(row.iter().map(|cell| match cell {
                Data::Empty => Cell::Empty,
                Data::Int(i) => Cell::Number(*i as f64),
                Data::Float(f) => Cell::Number(*f),
                Data::String(s) => Cell::parse(s),
                Data::Bool(b) => Cell::Text(b.to_string()),
                Data::DateTime(dt) => Cell::Text(dt.to_string()),
                Data::DateTimeIso(s) => Cell::Text(s.clone()),
                Data::DurationIso(s) => Cell::Text(s.clone()),
                Data::Error(e) => Cell::Text(format!("{e:?}")),
            }));
            rows.push(cells);
        }
    }

    // Sheets of different widths are padded on the right.
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, Cell::Empty);
    }

    Ok(Table::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SHEETS: &[u8] = include_bytes!("../../tests/fixtures/two_sheets.xlsx");

    #[test]
    fn parses_tab_separated_without_header() {
        let table = load_table(b"x\ty\n1\t2\n3\t4\n", FileKind::TabSeparated, &SheetSelection::default())
            .unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows()[0][0], Cell::Text("x".into()));
        assert_eq!(table.rows()[2][1], Cell::Number(4.0));
    }

    #[test]
    fn comma_flavor_does_not_split_on_tabs() {
        let table = load_table(b"1\t2,3\n4\t5,6\n", FileKind::CommaSeparated, &SheetSelection::default())
            .unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows()[0][0], Cell::Text("1\t2".into()));
    }

    #[test]
    fn skips_blank_lines_and_bom() {
        let table = load_table(
            "\u{feff}1,2\n\n3,4\n".as_bytes(),
            FileKind::CommaSeparated,
            &SheetSelection::default(),
        )
        .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0][0], Cell::Number(1.0));
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let err = load_table(b"1,2\n3,4,5\n", FileKind::CommaSeparated, &SheetSelection::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Ragged { row: 1, expected: 2, found: 3 }));
    }

    #[test]
    fn non_utf8_text_is_malformed() {
        let err = load_table(b"1,2\n\xff,4\n", FileKind::CommaSeparated, &SheetSelection::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Encoding { offset: 4 }));
    }

    #[test]
    fn empty_upload_is_malformed() {
        let err = load_table(b"", FileKind::TabSeparated, &SheetSelection::default()).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn corrupt_workbook_is_malformed() {
        let err = load_table(b"not a workbook", FileKind::Spreadsheet, &SheetSelection::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet(_)));
    }

    #[test]
    fn reads_first_sheet_only_by_default() {
        let table = load_table(TWO_SHEETS, FileKind::Spreadsheet, &SheetSelection::default()).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.rows()[0][2], Cell::Text("a".into()));
    }

    #[test]
    fn stacks_selected_sheets() {
        let table = load_table(TWO_SHEETS, FileKind::Spreadsheet, &SheetSelection::first(2).unwrap()).unwrap();
        assert_eq!(table.row_count(), 5);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.rows()[3][0], Cell::Number(10.0));
        assert_eq!(table.rows()[4][2], Cell::Text("c".into()));
    }

    #[test]
    fn missing_sheet_is_reported() {
        let err = load_table(TWO_SHEETS, FileKind::Spreadsheet, &SheetSelection(vec![0, 7]))
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingSheet(7)));
        let err = load_table(TWO_SHEETS, FileKind::Spreadsheet, &SheetSelection(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, LoadError::NoSheetsSelected));
    }

    #[test]
    fn sheet_count_outside_the_allowed_range() {
        assert_eq!(SheetSelection::first(MAX_SHEETS).unwrap().indices(), &[0, 1, 2, 3, 4]);
        assert!(matches!(SheetSelection::first(0), Err(LoadError::SheetCount(0))));
        assert!(matches!(SheetSelection::first(usize::MAX), Err(LoadError::SheetCount(usize::MAX))));
    }

    #[test]
    fn kind_lookup() {
        assert_eq!(FileKind::from_extension("TSV"), Some(FileKind::TabSeparated));
        assert_eq!(FileKind::from_extension("json"), None);
        assert_eq!(FileKind::from_mime("application/vnd.ms-excel"), Some(FileKind::Spreadsheet));
    }
}
