use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ConvertError, Result};
use crate::model::Season;

/// Two 4-digit years starting with 20, separated by `_`, `-` or `/`,
/// optionally padded with whitespace. The first match in the stem wins.
static SEASON_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(20\d{2})\s*[_/\-]\s*(20\d{2})").expect("season pattern compiles"));

/// Derives the season identity from a filename stem.
///
/// `"Dati_2021_2022_v2"` yields label `2021/2022` and key `2021_2022`. The
/// two years are not required to be consecutive; the filename is the only
/// source of truth for the season.
pub fn extract_season(stem: &str) -> Result<Season> {
    let captures = SEASON_PATTERN
        .captures(stem)
        .ok_or_else(|| ConvertError::SeasonPattern {
            stem: stem.to_string(),
        })?;
    let first = &captures[1];
    let second = &captures[2];
    Ok(Season {
        label: format!("{first}/{second}"),
        key: format!("{first}_{second}"),
    })
}
