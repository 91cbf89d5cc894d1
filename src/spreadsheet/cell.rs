use calamine::{Data, ExcelDateTime};
use chrono::NaiveDateTime;

/// Convert 0-based row & column indexes to Excel-style cell position.
///
/// # Arguments
///
/// * `row` - The 0-based row index
/// * `column` - The 0-based column index
///
/// # Returns
///
/// * `String` - Excel-style cell position in upper case, e.g. `B3`
pub fn cell_position(row: usize, column: usize) -> String {
    let row = (row + 1).to_string();
    let mut column = column + 1;
    let mut position = String::new();
    while column > 0 {
        column -= 1;
        position.insert(0, (b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    position.push_str(row.as_str());
    position
}

/// A single non-empty cell with its position and raw value.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub column: usize,
    /// The raw cell data from the spreadsheet
    pub value: Data,
}

impl Cell {
    /// Get Excel-style cell position.
    pub fn position(&self) -> String {
        cell_position(self.row, self.column)
    }

    /// Renders the cell as text the way an operator sees it in the sheet.
    ///
    /// Returns `None` for error cells (`#N/A`, `#DIV/0!`, ...).
    pub fn to_text(&self) -> Option<String> {
        match &self.value {
            Data::Empty => Some(String::new()),
            Data::String(value) => Some(value.to_owned()),
            Data::Int(value) => Some(value.to_string()),
            Data::Float(value) => Some(float_to_text(*value)),
            Data::Bool(value) => Some(value.to_string()),
            Data::DateTime(value) => datetime_to_text(value),
            Data::DateTimeIso(value) => Some(value.to_owned()),
            Data::DurationIso(value) => Some(value.to_owned()),
            Data::Error(_) => None,
        }
    }
}

/// Whole numbers drop the fractional part so `12.0` reads as `12`.
fn float_to_text(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn datetime_to_text(value: &ExcelDateTime) -> Option<String> {
    let serial = value.as_f64();
    let datetime: NaiveDateTime = value.as_datetime()?;
    if serial < 1.0 {
        Some(datetime.time().format("%H:%M:%S").to_string())
    } else if serial.fract() == 0.0 {
        Some(datetime.date().format("%Y-%m-%d").to_string())
    } else {
        Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(value: Data) -> Cell {
        Cell { row: 0, column: 0, value }
    }

    #[test]
    fn position_letters() {
        assert_eq!(cell_position(0, 0), "A1");
        assert_eq!(cell_position(2, 1), "B3");
        assert_eq!(cell_position(9, 25), "Z10");
        assert_eq!(cell_position(0, 26), "AA1");
        assert_eq!(cell_position(0, 701), "ZZ1");
        assert_eq!(cell_position(0, 702), "AAA1");
    }

    #[test]
    fn numbers_as_text() {
        assert_eq!(cell(Data::Int(42)).to_text().unwrap(), "42");
        assert_eq!(cell(Data::Float(12.0)).to_text().unwrap(), "12");
        assert_eq!(cell(Data::Float(123.45)).to_text().unwrap(), "123.45");
        assert_eq!(cell(Data::Float(-0.5)).to_text().unwrap(), "-0.5");
    }

    #[test]
    fn plain_values_as_text() {
        assert_eq!(cell(Data::Empty).to_text().unwrap(), "");
        assert_eq!(cell(Data::Bool(true)).to_text().unwrap(), "true");
        assert_eq!(
            cell(Data::String("面议".to_owned())).to_text().unwrap(),
            "面议"
        );
        assert_eq!(
            cell(Data::DateTimeIso("2024-01-02T03:04:05".to_owned()))
                .to_text()
                .unwrap(),
            "2024-01-02T03:04:05"
        );
    }

    #[test]
    fn error_cells_have_no_text() {
        let error = cell(Data::Error(calamine::CellErrorType::NA));
        assert!(error.to_text().is_none());
    }
}
