use std::collections::BTreeMap;

use crate::model::{Manifest, SCHEMA_VERSION, SeasonSummary};

/// Folds the run's summaries into the aggregate manifest.
///
/// Entries are deduplicated by season key, the later summary winning, and
/// emitted in ascending key order. Pure function of its input.
pub fn merge_summaries(summaries: &[SeasonSummary]) -> Manifest {
    let mut by_key: BTreeMap<String, SeasonSummary> = BTreeMap::new();
    for summary in summaries {
        by_key.insert(summary.key.clone(), summary.clone());
    }

    Manifest {
        schema_version: SCHEMA_VERSION,
        seasons: by_key.into_values().collect(),
    }
}
