//! # Spreadsheet Reading Module
//!
//! Opens Excel (.xlsx, .xlsm, .xlam, .xlsb, .xls, .xla) and OpenDocument (.ods)
//! files, selects one sheet and exposes its rows as text records under a header.
pub mod cell;
pub mod criteria;
pub mod sheet;

pub use crate::spreadsheet::cell::{cell_position, Cell};
pub use crate::spreadsheet::criteria::Criteria;
pub use crate::spreadsheet::sheet::{Record, Sheet};

use calamine::{open_workbook, Ods, OdsError, Reader, Xls, XlsError, Xlsb, XlsbError, Xlsx, XlsxError};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Errors raised while opening or reading a spreadsheet.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Error in Excel 2007+ format (.xlsx, .xlsm, .xlam)
    #[error("Invalid xlsx file format: {0}")]
    InvalidXlsxFileFormat(#[from] XlsxError),

    /// Error in Excel Binary format (.xlsb)
    #[error("Invalid xlsb file format: {0}")]
    InvalidXlsbFileFormat(#[from] XlsbError),

    /// Error in legacy Excel format (.xls, .xla)
    #[error("Invalid xls file format: {0}")]
    InvalidXlsFileFormat(#[from] XlsError),

    /// Error in OpenDocument format (.ods)
    #[error("Invalid ods file format: {0}")]
    InvalidOdsFileFormat(#[from] OdsError),

    #[error("File '{name}' not found")]
    FileNotFound { name: String },

    /// Unsupported or unrecognized file format
    #[error("Cannot detect file format for '{name}'")]
    InvalidFileFormat { name: String },

    /// No sheet name matched the selection criteria
    #[error("No sheet matches '{patterns}' in '{name}'")]
    SheetNotFound { name: String, patterns: String },

    /// Sheet exists but contains no data
    #[error("Sheet '{name}' is empty")]
    EmptySheet { name: String },
}

/// Type alias for buffered file reader
pub type FileReader = BufReader<File>;

/// Wrapper over the calamine readers for each supported format.
pub enum Spreadsheet {
    /// Excel 2007+ format reader (.xlsx, .xlsm, .xlam)
    Xlsx(Xlsx<FileReader>),
    /// Excel Binary format reader (.xlsb)
    Xlsb(Xlsb<FileReader>),
    /// Legacy Excel format reader (.xls, .xla)
    Xls(Xls<FileReader>),
    /// OpenDocument format reader (.ods)
    Ods(Ods<FileReader>),
}

impl Spreadsheet {
    /// Opens a spreadsheet file, picking the reader from the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, the extension is not supported,
    /// or the file content is not a valid workbook of that format.
    pub fn open<P>(path: P) -> Result<Spreadsheet, SpreadsheetError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SpreadsheetError::FileNotFound {
                name: path.to_string_lossy().to_string(),
            });
        }
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(|extension| extension.to_ascii_lowercase());
        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Self::Xlsx(open_workbook(path)?)),
            Some("xlsb") => Ok(Self::Xlsb(open_workbook(path)?)),
            Some("xls") | Some("xla") => Ok(Self::Xls(open_workbook(path)?)),
            Some("ods") => Ok(Self::Ods(open_workbook(path)?)),
            _ => Err(SpreadsheetError::InvalidFileFormat {
                name: path.to_string_lossy().to_string(),
            }),
        }
    }

    /// Returns the names of all sheets in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xlsb(xlsb) => xlsb.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
            Self::Ods(ods) => ods.sheet_names(),
        }
    }

    /// Returns the first sheet name accepted by the criteria.
    pub fn select_sheet(&self, file_name: &str, criteria: &Criteria) -> Result<String, SpreadsheetError> {
        self.sheet_names()
            .into_iter()
            .find(|name| criteria.accept(name))
            .ok_or_else(|| SpreadsheetError::SheetNotFound {
                name: file_name.to_owned(),
                patterns: criteria.describe(),
            })
    }

    /// Reads a whole sheet into memory.
    pub fn open_sheet(&mut self, sheet_name: &str) -> Result<Sheet, SpreadsheetError> {
        match self {
            Self::Xlsx(xlsx) => Sheet::from_range(sheet_name, &xlsx.worksheet_range(sheet_name)?),
            Self::Xlsb(xlsb) => Sheet::from_range(sheet_name, &xlsb.worksheet_range(sheet_name)?),
            Self::Xls(xls) => Sheet::from_range(sheet_name, &xls.worksheet_range(sheet_name)?),
            Self::Ods(ods) => Sheet::from_range(sheet_name, &ods.worksheet_range(sheet_name)?),
        }
    }
}

/// Opens a spreadsheet and loads the sheet selected by the criteria.
pub fn load_sheet<P>(path: P, criteria: &Criteria) -> Result<Sheet, SpreadsheetError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file_name = path.to_string_lossy();
    let mut spreadsheet = Spreadsheet::open(path)?;
    let sheet_name = spreadsheet.select_sheet(&file_name, criteria)?;
    let sheet = spreadsheet.open_sheet(&sheet_name)?;
    log::info!(
        "Loaded sheet '{}' from '{}' ({}, {} cells)",
        sheet.name,
        file_name,
        sheet.dimension(),
        sheet.cells.len()
    );
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glob::Pattern;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_workbook(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("book.xlsx");
        let mut workbook = Workbook::new();
        let notes = workbook.add_worksheet();
        notes.set_name("说明").unwrap();
        notes.write_string(0, 0, "readme").unwrap();
        let data = workbook.add_worksheet();
        data.set_name("诊疗项目").unwrap();
        data.write_string(0, 0, "项目编码").unwrap();
        data.write_string(0, 1, "价格").unwrap();
        data.write_string(1, 0, "110100001").unwrap();
        data.write_number(1, 1, 12.0).unwrap();
        data.write_string(2, 0, "110100002").unwrap();
        data.write_string(2, 1, "面议").unwrap();
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn open_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "not a workbook").unwrap();
        let error = Spreadsheet::open(&path).err().unwrap();
        assert!(matches!(error, SpreadsheetError::InvalidFileFormat { .. }));
    }

    #[test]
    fn open_missing_file() {
        let error = Spreadsheet::open("no_such_file.xlsx").err().unwrap();
        assert!(matches!(error, SpreadsheetError::FileNotFound { .. }));
    }

    #[test]
    fn open_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, "not a zip archive").unwrap();
        let error = Spreadsheet::open(&path).err().unwrap();
        assert!(matches!(error, SpreadsheetError::InvalidXlsxFileFormat(_)));
    }

    #[test]
    fn load_first_sheet_by_default() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir);
        let sheet = load_sheet(&path, &Criteria::default()).unwrap();
        assert_eq!(sheet.name, "说明");
        assert_eq!(sheet.header(), vec!["readme"]);
    }

    #[test]
    fn load_sheet_by_pattern() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir);
        let criteria = Criteria::default().with_sheet_pattern(Pattern::new("诊疗*").unwrap());
        let sheet = load_sheet(&path, &criteria).unwrap();

        assert_eq!(sheet.name, "诊疗项目");
        assert_eq!(sheet.header(), vec!["项目编码", "价格"]);
        let records = sheet.records(true);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 2);
        assert_eq!(records[0].values, vec!["110100001", "12"]);
        assert_eq!(records[1].values, vec!["110100002", "面议"]);
    }

    #[test]
    fn load_date_and_time_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dates.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "日期").unwrap();
        sheet.write_string(0, 1, "时间").unwrap();
        sheet.write_string(0, 2, "生效时间").unwrap();
        let date = ExcelDateTime::from_ymd(2024, 1, 2).unwrap();
        let time = ExcelDateTime::from_hms(12, 0, 0).unwrap();
        let datetime = ExcelDateTime::from_ymd(2024, 3, 4).unwrap().and_hms(18, 0, 0).unwrap();
        sheet
            .write_datetime_with_format(1, 0, &date, &Format::new().set_num_format("yyyy-mm-dd"))
            .unwrap();
        sheet
            .write_datetime_with_format(1, 1, &time, &Format::new().set_num_format("hh:mm:ss"))
            .unwrap();
        sheet
            .write_datetime_with_format(1, 2, &datetime, &Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"))
            .unwrap();
        workbook.save(&path).unwrap();

        let sheet = load_sheet(&path, &Criteria::default()).unwrap();
        let records = sheet.records(true);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].values, vec!["2024-01-02", "12:00:00", "2024-03-04 18:00:00"]);
    }

    #[test]
    fn load_sheet_not_found() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir);
        let criteria = Criteria::default().with_sheet_pattern(Pattern::new("drugs").unwrap());
        let error = load_sheet(&path, &criteria).unwrap_err();
        assert!(matches!(error, SpreadsheetError::SheetNotFound { .. }));
    }
}
