use serde::Serialize;
use std::fmt;

/// A single typed cell of the record table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Kind inferred for a whole column at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Categorical,
    /// No cell in the column carries a value
    Empty,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// A named, typed column. Cells are stored column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_empty()).count()
    }

    /// Numeric cells in row order, skipping empties
    pub fn numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }

    /// Boolean cells in row order, skipping empties
    pub fn booleans(&self) -> Vec<bool> {
        self.values.iter().filter_map(CellValue::as_bool).collect()
    }

    /// Display labels of every non-empty cell, used for frequency counts
    pub fn labels(&self) -> Vec<String> {
        self.values
            .iter()
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .collect()
    }
}

/// Borrowed view of one row of a [`RecordTable`]
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a RecordTable,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.table
            .column(column)
            .and_then(|c| c.values.get(self.index))
    }

    /// Cells in header order
    pub fn cells(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        let index = self.index;
        let table = self.table;
        table
            .columns
            .iter()
            .map(move |c| (c.name.as_str(), &c.values[index]))
    }
}

/// Ordered record table with the column set fixed by the CSV header
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    columns: Vec<Column>,
    row_count: usize,
}

impl RecordTable {
    /// Build a table from columns that must all have the same length
    pub fn new(columns: Vec<Column>) -> Result<Self, String> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(format!(
                "column '{}' has {} values, expected {}",
                bad.name,
                bad.len(),
                row_count
            ));
        }
        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Capability check: the column if it was present in the header
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The column only if it was inferred as `kind`
    pub fn column_of_kind(&self, name: &str, kind: ColumnKind) -> Option<&Column> {
        self.column(name).filter(|c| c.kind == kind)
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.row_count).then_some(Row { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.row_count).map(move |index| Row { table: self, index })
    }
}
