use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::model::Table;

/// Name of the single worksheet the exporter writes.
pub const SHEET_NAME: &str = "Tutti i dati";

/// The 34 columns every season export must carry, in the order the exporter
/// writes them. Validation messages list missing columns in this order.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Nome", "Sq", "R", "COD", "FMld", "T", "P", "Aff%",
    "MVC", "MVF", "MVT", "MVDSt", "MVDlt", "MVAnd", "MVRnd",
    "FMC", "FMF", "FMT", "FMDSt", "FMDlt", "FMAnd", "FMRnd",
    "GF", "GFR", "GS", "GSR", "AG", "AS", "RP", "RS", "A", "E", "TIn", "ID",
];

/// Column contract of the exporter's table: required names plus the three
/// disjoint sets designating normalization treatment.
#[derive(Debug)]
pub struct ColumnSchema {
    /// Columns every source table must carry, in canonical order.
    pub required: &'static [&'static str],
    /// Columns normalized as decimals (locale cleanup, 2-digit rounding).
    pub float_columns: HashSet<&'static str>,
    /// Columns normalized as integers (missing or unparsable become 0).
    pub int_columns: HashSet<&'static str>,
    /// Columns normalized as trimmed strings.
    pub string_columns: HashSet<&'static str>,
}

/// Process-wide column schema, immutable after construction. Passed by
/// reference into the validator and normalizer.
pub static COLUMN_SCHEMA: Lazy<ColumnSchema> = Lazy::new(|| ColumnSchema {
    required: REQUIRED_COLUMNS,
    float_columns: [
        "FMld", "Aff%", "MVC", "MVF", "MVT", "MVDSt", "MVDlt", "MVAnd",
        "MVRnd", "FMC", "FMF", "FMT", "FMDSt", "FMDlt", "FMAnd", "FMRnd",
    ]
    .into_iter()
    .collect(),
    int_columns: [
        "T", "P", "GF", "GFR", "GS", "GSR", "AG", "AS", "RP", "RS", "A", "E",
        "TIn",
    ]
    .into_iter()
    .collect(),
    // ID stays a string: downstream consumers compare it verbatim.
    string_columns: ["Nome", "Sq", "R", "COD", "ID"].into_iter().collect(),
});

/// Returns the required columns absent from the table, in canonical order.
///
/// Pure check: the table is never mutated and extra columns are ignored.
pub fn missing_columns(table: &Table, schema: &ColumnSchema) -> Vec<String> {
    let present: HashSet<&str> = table.columns.iter().map(String::as_str).collect();
    schema
        .required
        .iter()
        .filter(|column| !present.contains(*column))
        .map(|column| column.to_string())
        .collect()
}
