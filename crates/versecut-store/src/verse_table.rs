//! Tab-delimited verse table access.
//!
//! A verse table is the working document of a run: one row per verse or
//! continuation fragment, with named columns for verse numbers, verse text,
//! optional translations, and timing boundaries. Columns the assembly does
//! not know about are preserved verbatim across edits.

use std::path::Path;

use tracing::debug;

use versecut_models::{TableColumns, TimingBoundary, VerseRow};

use crate::error::{StoreError, StoreResult};

/// An in-memory verse table with stable column order.
#[derive(Debug, Clone)]
pub struct VerseTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    columns: TableColumns,
}

impl VerseTable {
    /// Create an empty table with verse number and verse text columns.
    pub fn new(columns: TableColumns) -> Self {
        let header = vec![columns.verse_number.clone(), columns.verse_text.clone()];
        Self {
            header,
            rows: Vec::new(),
            columns,
        }
    }

    /// Parse tab-delimited text. The first line is the header; short rows
    /// are padded with empty cells up to the header width.
    pub fn parse(text: &str, columns: TableColumns) -> StoreResult<Self> {
        let mut lines = text.lines();
        let header: Vec<String> = match lines.next() {
            Some(line) => line.split('\t').map(str::to_string).collect(),
            None => return Err(StoreError::table("verse table is empty")),
        };

        let width = header.len();
        let rows = lines
            .map(|line| {
                let mut cells: Vec<String> = line.split('\t').map(str::to_string).collect();
                while cells.len() < width {
                    cells.push(String::new());
                }
                cells
            })
            .collect();

        Ok(Self {
            header,
            rows,
            columns,
        })
    }

    /// Serialize back to tab-delimited text with a trailing newline.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.header.join("\t"));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.join("\t"));
            out.push('\n');
        }
        out
    }

    pub async fn load(path: &Path, columns: TableColumns) -> StoreResult<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        let table = Self::parse(&text, columns)?;
        debug!(
            path = %path.display(),
            rows = table.rows.len(),
            "Loaded verse table"
        );
        Ok(table)
    }

    pub async fn save(&self, path: &Path) -> StoreResult<()> {
        tokio::fs::write(path, self.to_tsv()).await?;
        debug!(path = %path.display(), rows = self.rows.len(), "Saved verse table");
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append a row carrying a verse number and its text.
    pub fn push_verse(
        &mut self,
        number: impl Into<String>,
        text: impl Into<String>,
    ) -> StoreResult<()> {
        let number_column = self.require_column(&self.columns.verse_number)?;
        let text_column = self.require_column(&self.columns.verse_text)?;

        let mut cells = vec![String::new(); self.header.len()];
        cells[number_column] = number.into();
        cells[text_column] = text.into();
        self.rows.push(cells);
        Ok(())
    }

    /// Write timing boundaries into the timestamp column, one per row in
    /// order. Rows are appended when there are more boundaries than rows.
    pub fn write_timestamps(&mut self, boundaries: &[TimingBoundary]) {
        let title = self.columns.timestamp.clone();
        let column = self.ensure_column(&title);

        while self.rows.len() < boundaries.len() {
            self.rows.push(vec![String::new(); self.header.len()]);
        }

        for (cells, boundary) in self.rows.iter_mut().zip(boundaries) {
            cells[column] = boundary.to_cell();
        }
    }

    /// Insert a translation column and fill it row by row.
    ///
    /// The column is placed directly before the timestamp column when one
    /// exists, otherwise appended. A table that already carries the column
    /// is left unchanged.
    pub fn write_translations(&mut self, title: &str, translations: &[String]) {
        if self.column_index(title).is_some() {
            debug!(column = title, "Translation column already present");
            return;
        }

        let column = match self.column_index(&self.columns.timestamp) {
            Some(timestamp_column) => {
                self.header.insert(timestamp_column, title.to_string());
                for cells in &mut self.rows {
                    cells.insert(timestamp_column, String::new());
                }
                timestamp_column
            }
            None => {
                self.header.push(title.to_string());
                for cells in &mut self.rows {
                    cells.push(String::new());
                }
                self.header.len() - 1
            }
        };

        for (cells, translation) in self.rows.iter_mut().zip(translations) {
            cells[column] = translation.clone();
        }
    }

    /// Drop rows whose cells are all blank.
    pub fn remove_empty_rows(&mut self) {
        self.rows
            .retain(|cells| cells.iter().any(|cell| !cell.trim().is_empty()));
    }

    /// View the table as verse rows in table order.
    pub fn verse_rows(&self, translation_column: Option<&str>) -> StoreResult<Vec<VerseRow>> {
        let number = self.require_column(&self.columns.verse_number)?;
        let text = self.require_column(&self.columns.verse_text)?;
        let timestamp = self.require_column(&self.columns.timestamp)?;
        let translation = match translation_column {
            Some(title) => Some(self.require_column(title)?),
            None => None,
        };

        Ok(self
            .rows
            .iter()
            .map(|cells| VerseRow {
                verse_number: cells[number].clone(),
                verse_text: cells[text].clone(),
                verse_translation: translation.map(|column| cells[column].clone()),
                timestamp: cells[timestamp].clone(),
            })
            .collect())
    }

    /// Write verse numbers from the given rows back into the table, in
    /// order. Extra rows on either side are ignored.
    pub fn apply_verse_numbers(&mut self, rows: &[VerseRow]) -> StoreResult<()> {
        let column = self.require_column(&self.columns.verse_number)?;
        for (cells, row) in self.rows.iter_mut().zip(rows) {
            cells[column] = row.verse_number.clone();
        }
        Ok(())
    }

    /// Resolve the 1-based row range `[start, end)` covering a verse span.
    ///
    /// `start_label` and `end_label` are verse numbers like `"112:1"`. The
    /// resolved end row is the boundary row after the last rendered one;
    /// rows with blank verse numbers after the end row belong to the verse
    /// before them and extend the range. Explicit overrides bypass the
    /// lookup: the start row is used as given, the end row becomes the
    /// boundary.
    pub fn loop_range(
        &self,
        start_label: &str,
        end_label: &str,
        start_override: Option<usize>,
        end_override: Option<usize>,
    ) -> StoreResult<(usize, usize)> {
        let numbers = self.verse_number_cells()?;

        let start_line = match start_override {
            Some(line) => line,
            None => Self::position_of(&numbers, start_label)? + 1,
        };

        let end_line = match end_override {
            Some(line) => line + 1,
            None => {
                let mut line = Self::position_of(&numbers, end_label)? + 1;
                while line < numbers.len() && numbers[line].is_empty() {
                    line += 1;
                }
                (line + 1).min(numbers.len())
            }
        };

        Ok((start_line, end_line))
    }

    fn verse_number_cells(&self) -> StoreResult<Vec<&str>> {
        let column = self.require_column(&self.columns.verse_number)?;
        Ok(self.rows.iter().map(|cells| cells[column].as_str()).collect())
    }

    fn position_of(numbers: &[&str], label: &str) -> StoreResult<usize> {
        numbers
            .iter()
            .position(|cell| *cell == label)
            .ok_or_else(|| StoreError::VerseNotFound(label.to_string()))
    }

    fn column_index(&self, title: &str) -> Option<usize> {
        self.header.iter().position(|h| h == title)
    }

    fn require_column(&self, title: &str) -> StoreResult<usize> {
        self.column_index(title)
            .ok_or_else(|| StoreError::ColumnNotFound(title.to_string()))
    }

    /// Append a column when it is missing. Existing rows gain an empty cell.
    fn ensure_column(&mut self, title: &str) -> usize {
        if let Some(index) = self.column_index(title) {
            return index;
        }
        self.header.push(title.to_string());
        for cells in &mut self.rows {
            cells.push(String::new());
        }
        self.header.len() - 1
    }
}
