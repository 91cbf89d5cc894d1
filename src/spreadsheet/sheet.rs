use crate::spreadsheet::cell::{cell_position, Cell};
use crate::spreadsheet::SpreadsheetError;
use calamine::{Data, Range};
use std::collections::HashMap;

/// One data row of a sheet, rendered as text and aligned with the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based line number in the spreadsheet
    pub line: usize,
    /// One value per header column, missing cells as empty strings
    pub values: Vec<String>,
}

/// A sheet loaded in memory: its non-empty cells and the bounds they occupy.
#[derive(Debug)]
pub struct Sheet {
    /// Sheet name
    pub name: String,
    /// All non-empty cells in row-major order
    pub cells: Vec<Cell>,
    /// Position lookup from (row, column) to the cells vector
    indexes: HashMap<(usize, usize), usize>,
    pub row_lower_bound: usize,
    pub row_upper_bound: usize,
    pub col_lower_bound: usize,
    pub col_upper_bound: usize,
}

impl Sheet {
    fn new(name: &str, cells: Vec<Cell>) -> Result<Self, SpreadsheetError> {
        if cells.is_empty() {
            return Err(SpreadsheetError::EmptySheet {
                name: name.to_owned(),
            });
        }
        let mut sheet = Sheet {
            name: name.to_owned(),
            indexes: HashMap::with_capacity(cells.len()),
            row_lower_bound: usize::MAX,
            row_upper_bound: 0,
            col_lower_bound: usize::MAX,
            col_upper_bound: 0,
            cells: Vec::with_capacity(cells.len()),
        };
        for cell in cells {
            sheet.row_lower_bound = sheet.row_lower_bound.min(cell.row);
            sheet.row_upper_bound = sheet.row_upper_bound.max(cell.row);
            sheet.col_lower_bound = sheet.col_lower_bound.min(cell.column);
            sheet.col_upper_bound = sheet.col_upper_bound.max(cell.column);
            sheet.indexes.insert((cell.row, cell.column), sheet.cells.len());
            sheet.cells.push(cell);
        }
        Ok(sheet)
    }

    /// Builds a sheet from a calamine range, keeping only non-empty cells.
    pub fn from_range(name: &str, range: &Range<Data>) -> Result<Self, SpreadsheetError> {
        let (row_start, col_start) = range.start().ok_or(SpreadsheetError::EmptySheet {
            name: name.to_owned(),
        })?;
        let cells = range
            .used_cells()
            .filter(|(_, _, value)| !matches!(value, Data::Empty))
            .map(|(row, column, value)| Cell {
                row: row_start as usize + row,
                column: col_start as usize + column,
                value: value.to_owned(),
            })
            .collect();
        Self::new(name, cells)
    }

    /// Builds a sheet from rows of text, first row being the header.
    /// Empty strings are treated as missing cells.
    pub fn from_rows<R, S>(name: &str, rows: R) -> Result<Self, SpreadsheetError>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells = Vec::new();
        for (row, values) in rows.into_iter().enumerate() {
            for (column, value) in values.into_iter().enumerate() {
                let value: String = value.into();
                if !value.is_empty() {
                    cells.push(Cell {
                        row,
                        column,
                        value: Data::String(value),
                    });
                }
            }
        }
        Self::new(name, cells)
    }

    /// Gets the cell at the specified position, if any.
    pub fn get(&self, row: usize, column: usize) -> Option<&Cell> {
        self.indexes
            .get(&(row, column))
            .and_then(|index| self.cells.get(*index))
    }

    /// Reads the cell at a position as text. Missing cells are empty,
    /// error cells are logged and treated as empty.
    fn text_at(&self, row: usize, column: usize) -> String {
        match self.get(row, column) {
            None => String::new(),
            Some(cell) => cell.to_text().unwrap_or_else(|| {
                log::warn!(
                    "Sheet '{}' cell {} holds an error value {:?}, read as empty",
                    self.name,
                    cell.position(),
                    cell.value
                );
                String::new()
            }),
        }
    }

    /// Header names taken from the first non-empty row, trimmed.
    pub fn header(&self) -> Vec<String> {
        (self.col_lower_bound..=self.col_upper_bound)
            .map(|column| self.text_at(self.row_lower_bound, column).trim().to_owned())
            .collect()
    }

    /// Data rows below the header as text records, in source order.
    pub fn records(&self, skip_empty_rows: bool) -> Vec<Record> {
        ((self.row_lower_bound + 1)..=self.row_upper_bound)
            .filter_map(|row| {
                let values: Vec<String> = (self.col_lower_bound..=self.col_upper_bound)
                    .map(|column| self.text_at(row, column))
                    .collect();
                if skip_empty_rows && values.iter().all(|value| value.trim().is_empty()) {
                    log::debug!("Skip empty row {} in sheet '{}'", row + 1, self.name);
                    None
                } else {
                    Some(Record {
                        line: row + 1,
                        values,
                    })
                }
            })
            .collect()
    }

    /// Excel-style reference of the used area, e.g. `B2:F30`.
    pub fn dimension(&self) -> String {
        format!(
            "{}:{}",
            cell_position(self.row_lower_bound, self.col_lower_bound),
            cell_position(self.row_upper_bound, self.col_upper_bound)
        )
    }
}
