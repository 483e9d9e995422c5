//! The local sheet of record.
//!
//! `SheetStore` is a positional row/column oracle with no transactional
//! guarantees: reads see whatever the grid currently holds, writes land
//! cell by cell. `CsvSheet` backs it with an in-memory grid loaded from
//! and saved to a CSV file.

use std::fmt;
use std::path::Path;

/// Error type for sheet IO.
#[derive(Debug)]
pub enum SheetError {
    Io(String),
    Csv(String),
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "sheet I/O error: {msg}"),
            Self::Csv(msg) => write!(f, "sheet CSV error: {msg}"),
        }
    }
}

impl std::error::Error for SheetError {}

/// Positional cell access. Rows and columns are 1-based.
pub trait SheetStore {
    /// Read a column from `start_row` down to the last populated row.
    /// Ragged rows yield empty strings for missing cells.
    fn read_column(&self, start_row: usize, column: u32) -> Vec<String>;

    /// Write one cell, growing the grid as needed. An empty `value`
    /// blanks the cell.
    fn write_cell(&mut self, row: usize, column: u32, value: &str);
}

/// In-memory grid backed by a CSV file.
#[derive(Debug, Default)]
pub struct CsvSheet {
    grid: Vec<Vec<String>>,
}

impl CsvSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a sheet from a CSV file. Rows may be ragged.
    pub fn open(path: &Path) -> Result<Self, SheetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| SheetError::Io(format!("cannot read {}: {e}", path.display())))?;

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| SheetError::Csv(e.to_string()))?;
            grid.push(record.iter().map(|s| s.to_string()).collect());
        }
        Ok(Self { grid })
    }

    /// Save the grid back to disk as a rectangular CSV (short rows are
    /// padded with empty cells so every record has the same width).
    pub fn save(&self, path: &Path) -> Result<(), SheetError> {
        let width = self.grid.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(path)
            .map_err(|e| SheetError::Io(format!("cannot write {}: {e}", path.display())))?;

        for row in &self.grid {
            let mut record: Vec<&str> = row.iter().map(|s| s.as_str()).collect();
            record.resize(width, "");
            writer
                .write_record(&record)
                .map_err(|e| SheetError::Csv(e.to_string()))?;
        }
        writer.flush().map_err(|e| SheetError::Io(e.to_string()))?;
        Ok(())
    }

    /// Number of rows currently in the grid.
    pub fn row_count(&self) -> usize {
        self.grid.len()
    }

    /// Read a single cell (empty string when out of range).
    pub fn cell(&self, row: usize, column: u32) -> &str {
        debug_assert!(row >= 1 && column >= 1);
        self.grid
            .get(row - 1)
            .and_then(|r| r.get(column as usize - 1))
            .map(|s| s.as_str())
            .unwrap_or("")
    }
}

impl SheetStore for CsvSheet {
    fn read_column(&self, start_row: usize, column: u32) -> Vec<String> {
        debug_assert!(start_row >= 1 && column >= 1);
        let col = column as usize - 1;
        self.grid
            .iter()
            .skip(start_row - 1)
            .map(|row| row.get(col).cloned().unwrap_or_default())
            .collect()
    }

    fn write_cell(&mut self, row: usize, column: u32, value: &str) {
        debug_assert!(row >= 1 && column >= 1);
        if self.grid.len() < row {
            self.grid.resize_with(row, Vec::new);
        }
        let r = &mut self.grid[row - 1];
        let col = column as usize - 1;
        if r.len() <= col {
            r.resize_with(col + 1, String::new);
        }
        r[col] = value.to_string();
    }
}
