use serde::Serialize;

// ---------------------------------------------------------------------------
// Write plan values
// ---------------------------------------------------------------------------

/// What a reconciled row should receive: a value, or a blank cell.
///
/// `Clear` is the clear-sentinel ("remove this cell's contents"), which
/// is distinct from writing `0` or an empty-looking value. A remote score
/// of `null` and an absent score field both map here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellWrite {
    Clear,
    Value(String),
}

impl CellWrite {
    /// Build from an optional JSON field: `None`/`null` clear the cell,
    /// scalars become their text form.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value {
            None | Some(serde_json::Value::Null) => Self::Clear,
            Some(serde_json::Value::String(s)) => Self::Value(s.clone()),
            Some(serde_json::Value::Number(n)) => Self::Value(n.to_string()),
            Some(serde_json::Value::Bool(b)) => Self::Value(b.to_string()),
            Some(other) => Self::Value(other.to_string()),
        }
    }

    /// The text to place in a sheet cell (`Clear` blanks it).
    pub fn as_cell_text(&self) -> &str {
        match self {
            Self::Clear => "",
            Self::Value(s) => s,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One write instruction: `row` is the caller's row index, passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconEntry {
    pub row: usize,
    pub value: CellWrite,
}

/// Result of one reconciliation pass.
///
/// Misses are counts, not errors: a roster sheet naturally contains rows
/// the remote course does not know about and vice versa.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconReport {
    /// Write instructions, in local row order.
    pub entries: Vec<ReconEntry>,
    /// Non-empty local keys with no matching remote record.
    pub local_misses: usize,
    /// Distinct remote keys that matched no local row.
    pub unmatched_remote: usize,
    /// Remote records whose key extractor yielded nothing.
    pub keyless_remote: usize,
    /// Local rows whose key was empty after trimming (excluded entirely).
    pub empty_local_keys: usize,
}

impl ReconReport {
    pub fn matched(&self) -> usize {
        self.entries.len()
    }
}
