//! Composition of aggregated series across result tables.
//!
//! The composer runs the aggregator once per input table and merges the
//! results into a single insertion-ordered collection of labeled series.
//! Insertion order defines legend and plot order, so it must be
//! preserved exactly as the caller supplied the tables.

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::debug;

use crate::analysis::aggregator::{aggregate, AggregatedSeries, Statistic};
use crate::error::ChartError;
use crate::table::ResultTable;

/// Labeled series in insertion order. Labels are unique.
pub type NamedSeriesCollection = IndexMap<String, AggregatedSeries>;

/// Shared aggregation configuration applied to every input table.
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    /// Column holding the metric to aggregate.
    pub metric_column: String,
    /// Column holding the group key.
    pub group_column: String,
    /// Statistics computed per table, in label order.
    pub statistics: Vec<Statistic>,
    /// Ordinal domain entries dropped from the front of every series.
    pub start_index: usize,
}

/// The default label: `"<name> - <statistic>"`, e.g. `"run a - max"` or
/// `"run a - 0.75 quantile"`.
pub fn default_label(name: &str, statistic: &Statistic) -> String {
    format!("{} - {}", name, statistic.label())
}

/// Pair every trace path with a display name.
///
/// An empty name list derives names from the file stems; a non-empty
/// list must match the trace count exactly. Checked before any file
/// I/O so a mismatch leaves no side effect behind.
pub fn resolve_names(traces: &[PathBuf], names: &[String]) -> Result<Vec<String>, ChartError> {
    if names.is_empty() {
        return Ok(traces
            .iter()
            .map(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            })
            .collect());
    }
    if names.len() != traces.len() {
        return Err(ChartError::ConfigurationMismatch {
            traces: traces.len(),
            names: names.len(),
        });
    }
    Ok(names.to_vec())
}

/// Compose one labeled collection from `(name, table)` pairs.
///
/// For every pair and every requested statistic, inserts one aggregated,
/// ordinally-truncated series under a label produced by `label_builder`.
/// Any label collision (including duplicate table names) aborts with
/// [`ChartError::DuplicateLabel`], since downstream rendering cannot
/// disambiguate two series under one legend entry. The first failing
/// table aborts the whole composition.
pub fn compose<F>(
    inputs: &[(String, ResultTable)],
    request: &ComposeRequest,
    label_builder: F,
) -> Result<NamedSeriesCollection, ChartError>
where
    F: Fn(&str, &Statistic) -> String,
{
    let mut collection = NamedSeriesCollection::new();

    for (name, table) in inputs {
        let metric = table
            .column_id(&request.metric_column)
            .ok_or_else(|| ChartError::MalformedTable {
                path: PathBuf::from(name),
                reason: format!("missing column `{}`", request.metric_column),
            })?;
        let group = table
            .column_id(&request.group_column)
            .ok_or_else(|| ChartError::MalformedTable {
                path: PathBuf::from(name),
                reason: format!("missing column `{}`", request.group_column),
            })?;

        for (statistic, series) in aggregate(table, metric, group, &request.statistics)? {
            let label = label_builder(name, &statistic);
            let truncated = series.from_ordinal(request.start_index);
            debug!(label = %label, points = truncated.len(), "composed series");
            if collection.insert(label.clone(), truncated).is_some() {
                return Err(ChartError::DuplicateLabel { label });
            }
        }
    }

    Ok(collection)
}
