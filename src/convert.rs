use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::document::build_document;
use crate::error::{ConvertError, Result};
use crate::io::{excel_read, json_write};
use crate::manifest::merge_summaries;
use crate::model::{Season, SeasonSummary};
use crate::normalize::normalize_table;
use crate::schema::{self, COLUMN_SCHEMA, SHEET_NAME};
use crate::season::extract_season;

/// Name of the aggregate manifest document.
pub const MANIFEST_NAME: &str = "seasons.json";
/// Name of the plain-text run log kept next to the output documents.
pub const LOG_NAME: &str = "conversion.log";

/// Caller-supplied settings for one conversion run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory receiving the JSON documents, the manifest, and the log.
    pub output_dir: PathBuf,
    /// Skip the value normalizer, emitting cells as read.
    pub raw_mode: bool,
}

/// Outcome of a conversion run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One summary per successfully converted file, in processing order.
    pub summaries: Vec<SeasonSummary>,
    /// Files skipped because a pipeline stage failed.
    pub skipped: usize,
    /// Path of the manifest, when one was written.
    pub manifest_path: Option<PathBuf>,
}

/// Append-only sink for the per-run log lines.
///
/// Lines go verbatim into `conversion.log` and are mirrored to the tracing
/// subscriber. Failures touching the log file never affect processing.
struct RunLog {
    file: Option<fs::File>,
}

impl RunLog {
    fn open(output_dir: &Path) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(output_dir.join(LOG_NAME))
            .ok();
        Self { file }
    }

    fn append(&mut self, line: &str) {
        if let Some(file) = &mut self.file {
            let _ = writeln!(file, "{line}");
        }
    }

    fn info(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        info!("{line}");
        self.append(line);
    }

    fn warn(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        warn!("{line}");
        self.append(line);
    }

    fn error(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        error!("{line}");
        self.append(line);
    }
}

/// Expands the caller's input selection into candidate paths.
///
/// An explicit file list takes priority; otherwise the input directory is
/// globbed for `*.xls*`. Filtering down to readable spreadsheet files
/// happens later, inside the run itself.
pub fn collect_candidates(files: &[PathBuf], input_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }
    let Some(dir) = input_dir else {
        return Ok(Vec::new());
    };
    if !dir.is_dir() {
        return Err(ConvertError::MissingInput(dir.to_path_buf()));
    }
    let pattern = dir.join("*.xls*");
    let paths = glob::glob(&pattern.to_string_lossy())?
        .filter_map(|entry| entry.ok())
        .collect();
    Ok(paths)
}

/// Runs the full conversion pipeline over the candidate files.
///
/// Every per-file failure is converted into a log line and a skip; one bad
/// file never aborts the rest of the batch. The only hard failure is an
/// output directory that cannot be created.
#[instrument(
    level = "info",
    skip_all,
    fields(output = %options.output_dir.display(), raw = options.raw_mode)
)]
pub fn convert_batch(candidates: &[PathBuf], options: &RunOptions) -> Result<RunReport> {
    fs::create_dir_all(&options.output_dir).map_err(|source| ConvertError::OutputDir {
        path: options.output_dir.clone(),
        source,
    })?;

    let mut log = RunLog::open(&options.output_dir);
    let mut report = RunReport::default();
    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let files = filter_spreadsheets(candidates);
    if files.is_empty() {
        log.info("[INFO] no valid .xls/.xlsx files selected");
        return Ok(report);
    }

    debug!(file_count = files.len(), "processing batch");
    let mut seen_keys: HashSet<String> = HashSet::new();

    for path in &files {
        log.info(format!("reading: {}", file_name(path)));

        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let season = match extract_season(&stem) {
            Ok(season) => season,
            Err(error) => {
                log.warn(format!("  [WARN] {error} -> file skipped"));
                report.skipped += 1;
                continue;
            }
        };

        if !seen_keys.insert(season.key.clone()) {
            log.warn(format!(
                "  [WARN] duplicate season '{}': this file supersedes the earlier one",
                season.key
            ));
        }

        match process_file(path, &season, options, &generated_at) {
            Ok(summary) => {
                log.info(format!(
                    "  [OK] wrote {} ({} rows)",
                    summary.file, summary.n_players
                ));
                report.summaries.push(summary);
            }
            Err(error) => {
                log.error(format!("  [ERROR] {error} -> file skipped"));
                report.skipped += 1;
            }
        }
    }

    if report.summaries.is_empty() {
        log.info("[DONE] no JSON generated (no convertible files)");
        return Ok(report);
    }

    let manifest = merge_summaries(&report.summaries);
    let manifest_path = options.output_dir.join(MANIFEST_NAME);
    match json_write::write_pretty(&manifest_path, &manifest) {
        Ok(()) => {
            log.info(format!(
                "[OK] updated {MANIFEST_NAME} ({} seasons)",
                manifest.seasons.len()
            ));
            report.manifest_path = Some(manifest_path);
        }
        Err(error) => {
            // Documents written so far stay valid; only the aggregate view
            // is stale.
            log.error(format!("[ERROR] writing {MANIFEST_NAME}: {error}"));
        }
    }

    Ok(report)
}

/// Pipeline for one file: read, validate, normalize, build, persist.
#[instrument(level = "debug", skip_all, fields(file = %path.display(), season = %season.key))]
fn process_file(
    path: &Path,
    season: &Season,
    options: &RunOptions,
    generated_at: &str,
) -> Result<SeasonSummary> {
    let mut table = excel_read::read_table(path, SHEET_NAME)?;

    let missing = schema::missing_columns(&table, &COLUMN_SCHEMA);
    if !missing.is_empty() {
        return Err(ConvertError::MissingColumns(missing));
    }

    if !options.raw_mode {
        normalize_table(&mut table, &COLUMN_SCHEMA);
    }

    let document = build_document(&table, season, generated_at);
    let document_path = options.output_dir.join(season.document_name());
    json_write::write_pretty(&document_path, &document)?;
    debug!(rows = table.rows.len(), "document written");

    Ok(SeasonSummary {
        label: season.label.clone(),
        key: season.key.clone(),
        file: season.document_name(),
        n_players: table.rows.len(),
        last_updated: generated_at.to_string(),
    })
}

/// Keeps candidates that exist and carry a supported spreadsheet extension,
/// sorted case-insensitively by filename.
fn filter_spreadsheets(candidates: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = candidates
        .iter()
        .filter(|path| path.is_file() && has_spreadsheet_extension(path))
        .cloned()
        .collect();
    files.sort_by_key(|path| file_name(path).to_lowercase());
    files
}

fn has_spreadsheet_extension(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    matches!(extension.as_deref(), Some("xls") | Some("xlsx"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
