use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version stamped into every emitted document and manifest.
pub const SCHEMA_VERSION: u32 = 1;

/// A single spreadsheet cell after reading.
///
/// The reader collapses everything the underlying workbook can contain into
/// this closed set so the rest of the pipeline never deals with
/// reader-specific cell kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Plain text cell.
    Str(String),
    /// Integer cell.
    Int(i64),
    /// Floating point cell.
    Float(f64),
    /// Empty or unreadable cell.
    Missing,
}

impl CellValue {
    /// Converts the cell into the JSON representation used in the emitted
    /// documents. `Missing` becomes `null`.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Str(value) => Value::String(value.clone()),
            CellValue::Int(value) => Value::Number((*value).into()),
            CellValue::Float(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Missing => Value::Null,
        }
    }

    /// Renders the cell the way it would appear in a text export. The
    /// normalizer runs its locale cleanup over this form.
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Str(value) => value.clone(),
            CellValue::Int(value) => value.to_string(),
            CellValue::Float(value) => value.to_string(),
            CellValue::Missing => String::new(),
        }
    }
}

/// Rectangular table extracted from a worksheet: ordered column names plus
/// rows aligned positionally with those columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Season identity derived from a filename stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    /// Human-readable form, e.g. `2021/2022`. Display only.
    pub label: String,
    /// Filesystem and URL safe form, e.g. `2021_2022`. Canonical identity of
    /// the emitted document.
    pub key: String,
}

impl Season {
    /// Name of the JSON document emitted for this season.
    pub fn document_name(&self) -> String {
        format!("{}.json", self.key)
    }
}

/// Per-season output document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonDocument {
    pub schema_version: u32,
    pub season_label: String,
    pub season_key: String,
    pub generated_at: String,
    pub columns: Vec<String>,
    pub players: Vec<Map<String, Value>>,
}

/// Manifest entry describing one successfully converted season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub label: String,
    pub key: String,
    pub file: String,
    pub n_players: usize,
    pub last_updated: String,
}

/// Aggregate document listing every season produced by a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: u32,
    pub seasons: Vec<SeasonSummary>,
}
