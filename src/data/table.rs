use std::fmt;

/// A single scalar value from an uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify a raw text field: blank, numeric, or text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else if let Ok(v) = trimmed.parse::<f64>() {
            Cell::Number(v)
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    /// Numeric value, or NaN for blanks and text.
    pub fn as_f64(&self) -> f64 {
        match self {
            Cell::Number(v) => *v,
            Cell::Empty | Cell::Text(_) => f64::NAN,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("column {index} does not exist, the table has {columns} columns")]
    ColumnOutOfRange { index: usize, columns: usize },
}

/// Rectangular, header-less table parsed from one upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
    column_count: usize,
}

impl Table {
    /// Build a table from rows that the caller has already made rectangular.
    pub(crate) fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let column_count = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == column_count));
        Self { rows, column_count }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Slice one column out of the table.
    pub fn column(&self, index: usize) -> Result<Series, SelectionError> {
        if index >= self.column_count {
            return Err(SelectionError::ColumnOutOfRange { index, columns: self.column_count });
        }
        let values = self.rows.iter().map(|row| row[index].clone()).collect();
        Ok(Series { index, values })
    }
}

/// One column of a table, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub index: usize,
    pub values: Vec<Cell>,
}

impl Series {
    /// Numeric view of the column; non-numeric cells become NaN.
    pub fn to_f64(&self) -> Vec<f64> {
        self.values.iter().map(Cell::as_f64).collect()
    }

    pub fn to_text(&self) -> Vec<String> {
        self.values.iter().map(Cell::to_string).collect()
    }
}

/// "Column 1", "Column 2", ... for zero-based indices.
pub fn column_name(index: usize) -> String {
    format!("Column {}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(vec![
            vec![Cell::Number(1.0), Cell::Text("a".into())],
            vec![Cell::Number(2.5), Cell::Empty],
        ])
    }

    #[test]
    fn parses_cells() {
        assert_eq!(Cell::parse(" 42 "), Cell::Number(42.0));
        assert_eq!(Cell::parse("-1e3"), Cell::Number(-1000.0));
        assert_eq!(Cell::parse("  "), Cell::Empty);
        assert_eq!(Cell::parse("abc"), Cell::Text("abc".into()));
    }

    #[test]
    fn numbers_display_in_shortest_form() {
        assert_eq!(Cell::Number(3.0).to_string(), "3");
        assert_eq!(Cell::Number(0.5).to_string(), "0.5");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn slices_columns() {
        let table = sample();
        let col = table.column(1).unwrap();
        assert_eq!(column_name(col.index), "Column 2");
        assert_eq!(col.to_text(), vec!["a".to_string(), String::new()]);
        let nums = table.column(0).unwrap().to_f64();
        assert_eq!(nums, vec![1.0, 2.5]);
        assert!(table.column(1).unwrap().to_f64().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn out_of_range_column_is_an_error() {
        assert_eq!(
            sample().column(2),
            Err(SelectionError::ColumnOutOfRange { index: 2, columns: 2 })
        );
    }
}
