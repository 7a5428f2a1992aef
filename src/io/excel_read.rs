use std::path::Path;

use calamine::{DataType, Range, Reader, Xls, Xlsx, open_workbook};

use crate::error::{ConvertError, Result};
use crate::model::{CellValue, Table};

/// Reads the named worksheet of a spreadsheet file into a [`Table`].
///
/// Dispatch is by extension only: `.xlsx` goes through the modern reader,
/// `.xls` through the legacy one. Content sniffing is deliberately not
/// attempted.
pub fn read_table(path: &Path, sheet: &str) -> Result<Table> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);

    let range = match extension.as_deref() {
        Some("xlsx") => {
            let mut workbook: Xlsx<_> = open_workbook(path).map_err(calamine::Error::from)?;
            sheet_range(&mut workbook, sheet, path)?
        }
        Some("xls") => {
            let mut workbook: Xls<_> = open_workbook(path).map_err(calamine::Error::from)?;
            sheet_range(&mut workbook, sheet, path)?
        }
        _ => return Err(ConvertError::UnsupportedFormat(path.to_path_buf())),
    };

    Ok(table_from_range(&range))
}

fn sheet_range<R>(workbook: &mut R, sheet: &str, path: &Path) -> Result<Range<DataType>>
where
    R: Reader,
    calamine::Error: From<R::Error>,
{
    let range = workbook
        .worksheet_range(sheet)
        .ok_or_else(|| ConvertError::MissingSheet {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
        })?
        .map_err(|error| ConvertError::Sheet(calamine::Error::from(error)))?;
    Ok(range)
}

/// Builds the table abstraction from a cell range: the first row is the
/// header, the rest become data rows aligned with the kept columns. Columns
/// with a blank header cell cannot be addressed by name and are dropped.
fn table_from_range(range: &Range<DataType>) -> Table {
    let mut rows_iter = range.rows();

    let header = match rows_iter.next() {
        Some(row) => row,
        None => {
            return Table {
                columns: Vec::new(),
                rows: Vec::new(),
            };
        }
    };

    let mut columns = Vec::new();
    let mut kept = Vec::new();
    for (index, cell) in header.iter().enumerate() {
        let name = header_name(cell);
        if name.is_empty() {
            continue;
        }
        kept.push(index);
        columns.push(name);
    }

    let rows = rows_iter
        .map(|row| {
            kept.iter()
                .map(|&index| row.get(index).map(cell_value).unwrap_or(CellValue::Missing))
                .collect()
        })
        .collect();

    Table { columns, rows }
}

fn header_name(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.trim().to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::Str(value.clone()),
        DataType::Float(value) => CellValue::Float(*value),
        DataType::Int(value) => CellValue::Int(*value),
        DataType::Bool(value) => CellValue::Str(value.to_string()),
        DataType::Empty | DataType::Error(_) => CellValue::Missing,
        other => CellValue::Str(other.to_string()),
    }
}
