use crate::model::{CellValue, Table};
use crate::schema::ColumnSchema;

/// Normalizes the typed columns of a table in place.
///
/// Columns outside the three typed sets keep their original values. Running
/// the normalizer twice is a no-op: canonical values are fixed points of
/// every rule below.
pub fn normalize_table(table: &mut Table, schema: &ColumnSchema) {
    for (index, column) in table.columns.iter().enumerate() {
        let column = column.as_str();
        if schema.string_columns.contains(column) {
            for row in &mut table.rows {
                row[index] = trim_string(&row[index]);
            }
        } else if schema.float_columns.contains(column) {
            for row in &mut table.rows {
                row[index] = clean_float(&row[index]);
            }
        } else if schema.int_columns.contains(column) {
            for row in &mut table.rows {
                row[index] = coerce_int(&row[index]);
            }
        }
    }
}

fn trim_string(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Missing => CellValue::Missing,
        other => CellValue::Str(other.to_display_string().trim().to_string()),
    }
}

/// Locale cleanup for decimal columns: strip `%`, turn the decimal comma
/// into a dot and drop dash characters, so `"3,5-"` parses as `3.5`. Values
/// that still do not parse to a finite number become [`CellValue::Missing`].
fn clean_float(cell: &CellValue) -> CellValue {
    let text: String = cell
        .to_display_string()
        .trim()
        .chars()
        .filter(|c| !matches!(c, '%' | '\u{2013}' | '-'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => CellValue::Float(round2(value)),
        _ => CellValue::Missing,
    }
}

/// Integer columns take the original value through plain numeric coercion:
/// no locale cleanup, truncation toward zero, and both missing and
/// unparsable cells default to 0 (unlike decimals, which become missing).
fn coerce_int(cell: &CellValue) -> CellValue {
    let value = match cell {
        CellValue::Int(value) => return CellValue::Int(*value),
        CellValue::Float(value) => *value,
        CellValue::Str(text) => text.trim().parse::<f64>().unwrap_or(f64::NAN),
        CellValue::Missing => f64::NAN,
    };
    if value.is_finite() {
        CellValue::Int(value as i64)
    } else {
        CellValue::Int(0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
