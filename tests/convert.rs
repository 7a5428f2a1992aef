use std::fs;
use std::path::Path;

use fcm_export::convert::{self, RunOptions};
use fcm_export::schema::{COLUMN_SCHEMA, REQUIRED_COLUMNS, SHEET_NAME};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use tempfile::tempdir;

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

fn write_season_workbook(path: &Path, sheet: &str, columns: &[&str], rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).expect("sheet renamed");
    for (col, name) in columns.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *name)
            .expect("header written");
    }
    for (row_index, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(value) => worksheet
                    .write_string((row_index + 1) as u32, col as u16, *value)
                    .expect("cell written"),
                Cell::Number(value) => worksheet
                    .write_number((row_index + 1) as u32, col as u16, *value)
                    .expect("cell written"),
            };
        }
    }
    workbook.save(path).expect("workbook saved");
}

/// One plausible export row for the given columns: locale-formatted decimals,
/// numeric counters, and identifying strings.
fn player_row<'a>(columns: &[&'a str], name: &'a str) -> Vec<Cell<'a>> {
    columns
        .iter()
        .map(|column| {
            if COLUMN_SCHEMA.float_columns.contains(column) {
                Cell::Text("6,50")
            } else if COLUMN_SCHEMA.int_columns.contains(column) {
                Cell::Number(2.0)
            } else {
                match *column {
                    "Nome" => Cell::Text(name),
                    "Sq" => Cell::Text("Roma"),
                    "R" => Cell::Text("D"),
                    "COD" => Cell::Text("R123"),
                    "ID" => Cell::Text("8821"),
                    _ => Cell::Text(""),
                }
            }
        })
        .collect()
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).expect("JSON file read");
    serde_json::from_str(&text).expect("JSON parsed")
}

#[test]
fn converts_a_well_formed_workbook_end_to_end() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("export_2020_2021.xlsx");
    let rows: Vec<Vec<Cell>> = ["Rossi", "Bianchi", "Verdi", "Russo", "Ferrari"]
        .iter()
        .map(|name| player_row(REQUIRED_COLUMNS, name))
        .collect();
    write_season_workbook(&input, SHEET_NAME, REQUIRED_COLUMNS, &rows);

    let output_dir = dir.path().join("out");
    let report = convert::convert_batch(
        &[input],
        &RunOptions {
            output_dir: output_dir.clone(),
            raw_mode: false,
        },
    )
    .expect("batch converted");

    assert_eq!(report.summaries.len(), 1);
    assert_eq!(report.skipped, 0);

    let document = read_json(&output_dir.join("2020_2021.json"));
    assert_eq!(document["schema_version"], 1);
    assert_eq!(document["season_label"], "2020/2021");
    assert_eq!(document["season_key"], "2020_2021");
    assert_eq!(
        document["columns"].as_array().expect("columns array").len(),
        REQUIRED_COLUMNS.len()
    );
    let players = document["players"].as_array().expect("players array");
    assert_eq!(players.len(), 5);
    assert_eq!(players[0]["Nome"], "Rossi");
    assert_eq!(players[0]["MVC"], 6.5);
    assert_eq!(players[0]["GF"], 2);

    let manifest = read_json(&output_dir.join("seasons.json"));
    assert_eq!(manifest["schema_version"], 1);
    let seasons = manifest["seasons"].as_array().expect("seasons array");
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0]["key"], "2020_2021");
    assert_eq!(seasons[0]["label"], "2020/2021");
    assert_eq!(seasons[0]["file"], "2020_2021.json");
    assert_eq!(seasons[0]["n_players"], 5);
    let last_updated = seasons[0]["last_updated"].as_str().expect("timestamp");
    assert!(last_updated.ends_with('Z'));

    let log = fs::read_to_string(output_dir.join("conversion.log")).expect("log file");
    assert!(log.contains("[OK] wrote 2020_2021.json (5 rows)"));
    assert!(log.contains("[OK] updated seasons.json (1 seasons)"));
}

#[test]
fn missing_required_column_skips_only_that_file() {
    let dir = tempdir().expect("temp dir");
    let first = dir.path().join("a_2020_2021.xlsx");
    let broken = dir.path().join("b_2021_2022.xlsx");
    let second = dir.path().join("c_2022_2023.xlsx");

    write_season_workbook(
        &first,
        SHEET_NAME,
        REQUIRED_COLUMNS,
        &[player_row(REQUIRED_COLUMNS, "Rossi")],
    );
    let truncated: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| *column != "COD")
        .collect();
    write_season_workbook(
        &broken,
        SHEET_NAME,
        &truncated,
        &[player_row(&truncated, "Bianchi")],
    );
    write_season_workbook(
        &second,
        SHEET_NAME,
        REQUIRED_COLUMNS,
        &[player_row(REQUIRED_COLUMNS, "Verdi")],
    );

    let output_dir = dir.path().join("out");
    let report = convert::convert_batch(
        &[first, broken, second],
        &RunOptions {
            output_dir: output_dir.clone(),
            raw_mode: false,
        },
    )
    .expect("batch converted");

    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.skipped, 1);
    assert!(output_dir.join("2020_2021.json").is_file());
    assert!(!output_dir.join("2021_2022.json").exists());
    assert!(output_dir.join("2022_2023.json").is_file());

    let manifest = read_json(&output_dir.join("seasons.json"));
    let keys: Vec<&str> = manifest["seasons"]
        .as_array()
        .expect("seasons array")
        .iter()
        .map(|season| season["key"].as_str().expect("key"))
        .collect();
    assert_eq!(keys, vec!["2020_2021", "2022_2023"]);

    let log = fs::read_to_string(output_dir.join("conversion.log")).expect("log file");
    assert!(log.contains(r#"missing columns: ["COD"]"#));
}

#[test]
fn raw_mode_emits_cells_as_read() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("export_2020_2021.xlsx");
    write_season_workbook(
        &input,
        SHEET_NAME,
        REQUIRED_COLUMNS,
        &[player_row(REQUIRED_COLUMNS, "Rossi")],
    );

    let output_dir = dir.path().join("out");
    convert::convert_batch(
        &[input],
        &RunOptions {
            output_dir: output_dir.clone(),
            raw_mode: true,
        },
    )
    .expect("batch converted");

    let document = read_json(&output_dir.join("2020_2021.json"));
    let players = document["players"].as_array().expect("players array");
    assert_eq!(players[0]["MVC"], "6,50");
    assert_eq!(players[0]["GF"], 2.0);
}

#[test]
fn duplicate_season_keys_are_last_write_wins() {
    let dir = tempdir().expect("temp dir");
    let earlier = dir.path().join("a_2021_2022.xlsx");
    let later = dir.path().join("b_2021_2022.xlsx");

    write_season_workbook(
        &earlier,
        SHEET_NAME,
        REQUIRED_COLUMNS,
        &[player_row(REQUIRED_COLUMNS, "First")],
    );
    write_season_workbook(
        &later,
        SHEET_NAME,
        REQUIRED_COLUMNS,
        &[
            player_row(REQUIRED_COLUMNS, "Second"),
            player_row(REQUIRED_COLUMNS, "Third"),
        ],
    );

    let output_dir = dir.path().join("out");
    let report = convert::convert_batch(
        &[later.clone(), earlier.clone()],
        &RunOptions {
            output_dir: output_dir.clone(),
            raw_mode: false,
        },
    )
    .expect("batch converted");

    // Both files convert; the later one in sorted order owns the document.
    assert_eq!(report.summaries.len(), 2);

    let document = read_json(&output_dir.join("2021_2022.json"));
    let players = document["players"].as_array().expect("players array");
    assert_eq!(players.len(), 2);
    assert_eq!(players[0]["Nome"], "Second");

    let manifest = read_json(&output_dir.join("seasons.json"));
    let seasons = manifest["seasons"].as_array().expect("seasons array");
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0]["n_players"], 2);

    let log = fs::read_to_string(output_dir.join("conversion.log")).expect("log file");
    assert!(log.contains("duplicate season '2021_2022'"));
}

#[test]
fn empty_selection_is_informational_and_writes_no_manifest() {
    let dir = tempdir().expect("temp dir");
    let notes = dir.path().join("notes_2020_2021.txt");
    fs::write(&notes, "not a spreadsheet").expect("notes written");

    let output_dir = dir.path().join("out");
    let report = convert::convert_batch(
        &[notes, dir.path().join("absent_2020_2021.xlsx")],
        &RunOptions {
            output_dir: output_dir.clone(),
            raw_mode: false,
        },
    )
    .expect("batch converted");

    assert!(report.summaries.is_empty());
    assert!(report.manifest_path.is_none());
    assert!(!output_dir.join("seasons.json").exists());

    let log = fs::read_to_string(output_dir.join("conversion.log")).expect("log file");
    assert!(log.contains("no valid .xls/.xlsx files selected"));
}

#[test]
fn file_without_season_pattern_is_skipped_with_warning() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("report_finale.xlsx");
    write_season_workbook(
        &input,
        SHEET_NAME,
        REQUIRED_COLUMNS,
        &[player_row(REQUIRED_COLUMNS, "Rossi")],
    );

    let output_dir = dir.path().join("out");
    let report = convert::convert_batch(
        &[input],
        &RunOptions {
            output_dir: output_dir.clone(),
            raw_mode: false,
        },
    )
    .expect("batch converted");

    assert!(report.summaries.is_empty());
    assert_eq!(report.skipped, 1);
    assert!(!output_dir.join("seasons.json").exists());

    let log = fs::read_to_string(output_dir.join("conversion.log")).expect("log file");
    assert!(log.contains("[WARN]"));
    assert!(log.contains("report_finale"));
    assert!(log.contains("[DONE] no JSON generated"));
}

#[test]
fn wrong_sheet_name_is_a_per_file_error() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("export_2020_2021.xlsx");
    write_season_workbook(
        &input,
        "Sheet1",
        REQUIRED_COLUMNS,
        &[player_row(REQUIRED_COLUMNS, "Rossi")],
    );

    let output_dir = dir.path().join("out");
    let report = convert::convert_batch(
        &[input],
        &RunOptions {
            output_dir: output_dir.clone(),
            raw_mode: false,
        },
    )
    .expect("batch converted");

    assert!(report.summaries.is_empty());
    assert_eq!(report.skipped, 1);

    let log = fs::read_to_string(output_dir.join("conversion.log")).expect("log file");
    assert!(log.contains("[ERROR]"));
    assert!(log.contains("Tutti i dati"));
}

#[test]
fn directory_selection_globs_spreadsheets_and_file_list_wins() {
    let dir = tempdir().expect("temp dir");
    let workbook = dir.path().join("export_2020_2021.xlsx");
    write_season_workbook(
        &workbook,
        SHEET_NAME,
        REQUIRED_COLUMNS,
        &[player_row(REQUIRED_COLUMNS, "Rossi")],
    );
    fs::write(dir.path().join("notes.txt"), "ignored").expect("notes written");

    let globbed =
        convert::collect_candidates(&[], Some(dir.path())).expect("directory globbed");
    assert_eq!(globbed, vec![workbook.clone()]);

    let explicit = vec![dir.path().join("explicit_2021_2022.xlsx")];
    let chosen =
        convert::collect_candidates(&explicit, Some(dir.path())).expect("file list wins");
    assert_eq!(chosen, explicit);

    let missing = dir.path().join("does_not_exist");
    let error = convert::collect_candidates(&[], Some(&missing)).expect_err("missing dir");
    assert!(matches!(error, fcm_export::ConvertError::MissingInput(_)));
}
