//! Per-group order statistics over a metric column.
//!
//! Rows are bucketed by the value of a group column (the generation
//! index) and each bucket is reduced to the requested statistics. The
//! resulting series domain is exactly the distinct keys present in the
//! source table, sorted ascending; nothing is interpolated or filled in.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::error::ChartError;
use crate::table::{ColumnId, ResultTable};

/// One scalar statistic computed per group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    Max,
    Min,
    /// p-quantile with linear interpolation between order statistics
    /// (interpolate at position p·(n−1) over the sorted sample).
    Quantile(f64),
}

impl Statistic {
    /// Reject quantiles outside [0, 1].
    pub fn validate(&self) -> Result<(), ChartError> {
        match *self {
            Statistic::Quantile(p) if !(0.0..=1.0).contains(&p) => {
                Err(ChartError::InvalidStatistic { quantile: p })
            }
            _ => Ok(()),
        }
    }

    /// The statistic descriptor used in series labels.
    pub fn label(&self) -> String {
        match *self {
            Statistic::Max => "max".to_string(),
            Statistic::Min => "min".to_string(),
            Statistic::Quantile(p) => format!("{p} quantile"),
        }
    }

    /// Apply the statistic to a sorted, non-empty sample.
    fn apply(&self, sorted: &[f64]) -> f64 {
        match *self {
            Statistic::Max => sorted[sorted.len() - 1],
            Statistic::Min => sorted[0],
            Statistic::Quantile(p) => quantile_sorted(sorted, p),
        }
    }
}

/// An ordered (group key, value) sequence for one statistic of one table.
///
/// Keys are strictly ascending; the emitter relies on this for a
/// monotonic x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    points: Vec<(f64, f64)>,
}

impl AggregatedSeries {
    /// The (key, value) points in ascending key order.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Number of domain entries.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series has no domain entries.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A copy with the first `start_index` ordinal entries dropped.
    ///
    /// Truncation is by ordinal position in the domain, never by key
    /// value, so overlaid series with different domains truncate to
    /// different starting generations.
    pub fn from_ordinal(&self, start_index: usize) -> AggregatedSeries {
        let start = start_index.min(self.points.len());
        AggregatedSeries {
            points: self.points[start..].to_vec(),
        }
    }
}

/// Aggregate `metric` per distinct value of `group`.
///
/// Returns one series per requested statistic, in request order. An
/// empty table yields an empty series for every statistic. Missing
/// values (NaN) are excluded from a bucket's sample; a bucket left
/// empty after exclusion is dropped from the domain.
pub fn aggregate(
    table: &ResultTable,
    metric: ColumnId,
    group: ColumnId,
    statistics: &[Statistic],
) -> Result<Vec<(Statistic, AggregatedSeries)>, ChartError> {
    for statistic in statistics {
        statistic.validate()?;
    }

    let keys = table.column(group);
    let values = table.column(metric);

    let mut buckets: BTreeMap<OrderedFloat<f64>, Vec<f64>> = BTreeMap::new();
    for (&key, &value) in keys.iter().zip(values) {
        if key.is_nan() {
            continue;
        }
        let bucket = buckets.entry(OrderedFloat(key)).or_default();
        if !value.is_nan() {
            bucket.push(value);
        }
    }

    for bucket in buckets.values_mut() {
        bucket.sort_unstable_by(f64::total_cmp);
    }

    let mut series = Vec::with_capacity(statistics.len());
    for statistic in statistics {
        let points = buckets
            .iter()
            .filter(|(_, sample)| !sample.is_empty())
            .map(|(key, sample)| (key.into_inner(), statistic.apply(sample)))
            .collect();
        series.push((*statistic, AggregatedSeries { points }));
    }

    Ok(series)
}

/// The p-quantile of a sorted, non-empty sample, by linear interpolation
/// between order statistics (the R-7 / NumPy default).
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();
    if j + 1 >= n {
        sorted[n - 1]
    } else {
        (1.0 - g) * sorted[j] + g * sorted[j + 1]
    }
}
