use serde_json::Map;

use crate::model::{SCHEMA_VERSION, Season, SeasonDocument, Table};

/// Assembles the per-season output document.
///
/// Column order follows the table, extra columns included; one player record
/// per row, keyed by column name. Validation is the caller's job.
pub fn build_document(table: &Table, season: &Season, generated_at: &str) -> SeasonDocument {
    let players = table
        .rows
        .iter()
        .map(|row| {
            let mut record = Map::new();
            for (column, cell) in table.columns.iter().zip(row) {
                record.insert(column.clone(), cell.to_json());
            }
            record
        })
        .collect();

    SeasonDocument {
        schema_version: SCHEMA_VERSION,
        season_label: season.label.clone(),
        season_key: season.key.clone(),
        generated_at: generated_at.to_string(),
        columns: table.columns.clone(),
        players,
    }
}
