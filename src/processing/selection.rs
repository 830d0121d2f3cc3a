use serde::{Deserialize, Serialize};

use crate::data::table::{SelectionError, Table};
use crate::processing::label_encoding::{encode_labels, LabelEncoding};

/// Label given to every row when no label column is chosen.
pub const PLACEHOLDER_LABEL: &str = "0";

/// Which column, if any, colors the markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LabelColumn {
    #[default]
    None,
    Column(usize),
}

/// Zero-based column indices for each plot axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSelection {
    pub x: usize,
    pub y: usize,
    /// Only used by 3-D plots.
    pub z: Option<usize>,
    pub label: LabelColumn,
}

impl AxisSelection {
    pub fn planar() -> Self {
        Self { x: 0, y: 1, z: None, label: LabelColumn::None }
    }

    pub fn spatial() -> Self {
        Self { x: 0, y: 1, z: Some(2), label: LabelColumn::None }
    }
}

/// Parallel arrays handed to the scatter renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Option<Vec<f64>>,
    pub label_text: Vec<String>,
    pub labels: LabelEncoding,
}

impl ScatterData {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Rows whose selected coordinates are all finite, i.e. the drawable points.
    pub fn plotted_count(&self) -> usize {
        (0..self.len())
            .filter(|&i| {
                self.x[i].is_finite()
                    && self.y[i].is_finite()
                    && self.z.as_ref().map_or(true, |z| z[i].is_finite())
            })
            .count()
    }
}

/// Slice the selected axis and label columns out of `table`.
pub fn select_scatter(table: &Table, selection: &AxisSelection) -> Result<ScatterData, SelectionError> {
    let x = table.column(selection.x)?.to_f64();
    let y = table.column(selection.y)?.to_f64();
    let z = match selection.z {
        Some(index) => Some(table.column(index)?.to_f64()),
        None => None,
    };

    let label_text = match selection.label {
        LabelColumn::None => vec![PLACEHOLDER_LABEL.to_string(); table.row_count()],
        LabelColumn::Column(index) => table.column(index)?.to_text(),
    };
    let labels = encode_labels(&label_text);

    tracing::debug!(
        "Selected {} points ({} label classes) with {:?}",
        x.len(),
        labels.class_count(),
        selection
    );
    Ok(ScatterData { x, y, z, label_text, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_table, FileKind, SheetSelection};

    fn table() -> Table {
        load_table(
            b"1,10,100,b\n2,20,200,a\n3,30,300,b\n4,40,400,c\n",
            FileKind::CommaSeparated,
            &SheetSelection::default(),
        )
        .unwrap()
    }

    #[test]
    fn planar_without_labels_uses_placeholder() {
        let data = select_scatter(&table(), &AxisSelection::planar()).unwrap();
        assert_eq!(data.x, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(data.y, vec![10.0, 20.0, 30.0, 40.0]);
        assert!(data.z.is_none());
        assert_eq!(data.label_text, vec!["0"; 4]);
        assert_eq!(data.labels.codes, vec![0; 4]);
    }

    #[test]
    fn label_column_is_encoded() {
        let selection = AxisSelection { x: 2, y: 0, z: Some(1), label: LabelColumn::Column(3) };
        let data = select_scatter(&table(), &selection).unwrap();
        assert_eq!(data.x, vec![100.0, 200.0, 300.0, 400.0]);
        assert_eq!(data.z, Some(vec![10.0, 20.0, 30.0, 40.0]));
        assert_eq!(data.label_text, vec!["b", "a", "b", "c"]);
        assert_eq!(data.labels.codes, vec![0, 1, 0, 2]);
    }

    #[test]
    fn numeric_label_column_is_categorical() {
        let selection = AxisSelection { label: LabelColumn::Column(1), ..AxisSelection::planar() };
        let data = select_scatter(&table(), &selection).unwrap();
        assert_eq!(data.label_text, vec!["10", "20", "30", "40"]);
        assert_eq!(data.labels.codes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn text_axis_values_become_nan() {
        let selection = AxisSelection { x: 3, ..AxisSelection::planar() };
        let data = select_scatter(&table(), &selection).unwrap();
        assert!(data.x.iter().all(|v| v.is_nan()));
        assert_eq!(data.plotted_count(), 0);
    }

    #[test]
    fn plotted_count_checks_every_selected_axis() {
        let t = load_table(
            b"1,10,100\n2,x,200\n3,30,y\n4,40,400\n",
            FileKind::CommaSeparated,
            &SheetSelection::default(),
        )
        .unwrap();
        let planar = select_scatter(&t, &AxisSelection::planar()).unwrap();
        assert_eq!(planar.plotted_count(), 3);
        let spatial = select_scatter(&t, &AxisSelection::spatial()).unwrap();
        assert_eq!(spatial.plotted_count(), 2);
    }

    #[test]
    fn out_of_range_columns_fail() {
        let t = table();
        for selection in [
            AxisSelection { x: 4, ..AxisSelection::planar() },
            AxisSelection { z: Some(9), ..AxisSelection::spatial() },
            AxisSelection { label: LabelColumn::Column(4), ..AxisSelection::planar() },
        ] {
            assert!(matches!(
                select_scatter(&t, &selection),
                Err(SelectionError::ColumnOutOfRange { columns: 4, .. })
            ));
        }
    }
}
