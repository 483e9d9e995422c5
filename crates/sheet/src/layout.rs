//! Sheet layout configuration.
//!
//! Loaded from `marksync.toml` in the working directory when present.
//! Every sync operation receives a [`SheetLayout`] at call time; there is
//! no module-level layout state.

use serde::Deserialize;

use crate::addr::{parse_column, AddrError};

/// Resolved cell addressing for one sheet: which column holds the SIS
/// ids, where names and grades go, and how many header rows to skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    /// 1-based column holding SIS ids (the join key).
    pub sis_column: u32,
    /// 1-based column receiving student names on roster pull.
    pub name_column: u32,
    /// 1-based column read on push / written on single-assignment pull.
    pub grade_column: u32,
    /// Rows above the first data row.
    pub header_rows: usize,
}

impl SheetLayout {
    /// First 1-based row that carries data.
    pub fn first_data_row(&self) -> usize {
        self.header_rows + 1
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            sis_column: 1,   // A
            name_column: 2,  // B
            grade_column: 3, // C
            header_rows: 1,
        }
    }
}

// ── Project config file ─────────────────────────────────────────────

/// `marksync.toml` contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub sheet: SheetSection,
    pub course: CourseSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetSection {
    /// Column references as letters or 1-based numbers ("A" or "1").
    pub sis_column: String,
    pub name_column: String,
    pub grade_column: String,
    pub header_rows: usize,
}

impl Default for SheetSection {
    fn default() -> Self {
        Self {
            sis_column: "A".into(),
            name_column: "B".into(),
            grade_column: "C".into(),
            header_rows: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CourseSection {
    /// Default course id, so commands can omit `--course`.
    pub id: Option<String>,
}

impl ProjectConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Resolve the `[sheet]` section into a validated layout.
    pub fn layout(&self) -> Result<SheetLayout, AddrError> {
        Ok(SheetLayout {
            sis_column: parse_column(&self.sheet.sis_column)?,
            name_column: parse_column(&self.sheet.name_column)?,
            grade_column: parse_column(&self.sheet.grade_column)?,
            header_rows: self.sheet.header_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let layout = SheetLayout::default();
        assert_eq!(layout.sis_column, 1);
        assert_eq!(layout.grade_column, 3);
        assert_eq!(layout.first_data_row(), 2);
    }

    #[test]
    fn config_roundtrip() {
        let cfg = ProjectConfig::from_toml(
            r#"
[sheet]
sis_column = "B"
name_column = "C"
grade_column = "E"
header_rows = 2

[course]
id = "1042"
"#,
        )
        .unwrap();

        let layout = cfg.layout().unwrap();
        assert_eq!(layout.sis_column, 2);
        assert_eq!(layout.grade_column, 5);
        assert_eq!(layout.first_data_row(), 3);
        assert_eq!(cfg.course.id.as_deref(), Some("1042"));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = ProjectConfig::from_toml("").unwrap();
        assert_eq!(cfg.layout().unwrap(), SheetLayout::default());
        assert!(cfg.course.id.is_none());
    }

    #[test]
    fn numeric_columns_accepted() {
        let cfg = ProjectConfig::from_toml(
            r#"
[sheet]
sis_column = "1"
grade_column = "27"
"#,
        )
        .unwrap();
        let layout = cfg.layout().unwrap();
        assert_eq!(layout.sis_column, 1);
        assert_eq!(layout.grade_column, 27);
        // unspecified fields keep defaults
        assert_eq!(layout.name_column, 2);
    }

    #[test]
    fn bad_column_is_an_error() {
        let cfg = ProjectConfig::from_toml(
            r#"
[sheet]
sis_column = "A1"
"#,
        )
        .unwrap();
        assert!(cfg.layout().is_err());
    }
}
