//! Tabular result-file loading.
//!
//! This module reads a CSV result file into an in-memory [`ResultTable`]
//! against a declared schema. The required columns are validated once at
//! load time; afterwards row access goes through a typed [`ColumnId`]
//! accessor instead of ad-hoc string lookups.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::ChartError;

/// Declared set of required columns for one chart kind.
///
/// Column names are exact-match and case-sensitive. Extra columns in the
/// input file are ignored.
#[derive(Debug, Clone)]
pub struct TableSchema {
    columns: Vec<String>,
}

impl TableSchema {
    /// Create a schema from the required column names, in order.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// The required column names, in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Typed handle into one schema column of a [`ResultTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnId(usize);

/// How to treat infinite values found in a numeric column.
///
/// The explicit per-load replacement for a process-wide
/// "treat infinities as missing" toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfinityHandling {
    /// Infinite values participate in aggregation unchanged.
    #[default]
    Keep,
    /// Infinite values become missing and are skipped by the aggregator.
    TreatAsMissing,
}

/// Options controlling value normalization during a load.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Infinity normalization for every numeric column.
    pub infinity: InfinityHandling,
}

/// An immutable, column-major table of numeric values.
///
/// Invariant: every schema column holds the same number of rows. Missing
/// values (only produced by [`InfinityHandling::TreatAsMissing`]) are
/// stored as NaN.
#[derive(Debug, Clone)]
pub struct ResultTable {
    schema: TableSchema,
    columns: Vec<Vec<f64>>,
}

impl ResultTable {
    /// Resolve a column name against the schema.
    pub fn column_id(&self, name: &str) -> Option<ColumnId> {
        self.schema
            .columns
            .iter()
            .position(|c| c == name)
            .map(ColumnId)
    }

    /// The values of one schema column, in row order.
    pub fn column(&self, id: ColumnId) -> &[f64] {
        &self.columns[id.0]
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// True when the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// Load a CSV result file against `schema`.
///
/// Fails with [`ChartError::MissingFile`] when the path does not exist or
/// cannot be read, and with [`ChartError::MalformedTable`] when the
/// content is not parseable, a required column is absent from the header,
/// or a required cell is not numeric.
pub fn load(
    path: &Path,
    schema: &TableSchema,
    options: &LoadOptions,
) -> Result<ResultTable, ChartError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| match err.kind() {
            csv::ErrorKind::Io(_) => ChartError::MissingFile {
                path: path.to_path_buf(),
            },
            _ => ChartError::malformed(path, err.to_string()),
        })?;

    let headers = reader
        .headers()
        .map_err(|err| ChartError::malformed(path, err.to_string()))?
        .clone();

    // Map each schema column onto its position in the header row.
    let mut indices = Vec::with_capacity(schema.columns.len());
    for name in schema.columns() {
        let index = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ChartError::malformed(path, format!("missing column `{name}`")))?;
        indices.push(index);
    }

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); schema.columns.len()];
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|err| ChartError::malformed(path, err.to_string()))?;

        for (slot, (&index, name)) in indices.iter().zip(schema.columns()).enumerate() {
            let cell = record.get(index).unwrap_or("");
            let value: f64 = cell.trim().parse().map_err(|_| {
                ChartError::malformed(
                    path,
                    format!("non-numeric value {cell:?} in column `{name}` (row {})", row + 2),
                )
            })?;
            columns[slot].push(normalize(value, options.infinity));
        }
    }

    debug!(
        path = %path.display(),
        rows = columns.first().map_or(0, Vec::len),
        "loaded result table"
    );

    Ok(ResultTable {
        schema: schema.clone(),
        columns,
    })
}

fn normalize(value: f64, infinity: InfinityHandling) -> f64 {
    match infinity {
        InfinityHandling::Keep => value,
        InfinityHandling::TreatAsMissing if value.is_infinite() => f64::NAN,
        InfinityHandling::TreatAsMissing => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");
        file
    }

    fn fitness_schema() -> TableSchema {
        TableSchema::new(["generation", "fitness"])
    }

    #[test]
    fn test_load_resolves_schema_columns() {
        let file = write_csv("generation,extra,fitness\n0,9,1.5\n1,9,2.5\n");
        let table = load(file.path(), &fitness_schema(), &LoadOptions::default()).unwrap();

        assert_eq!(table.row_count(), 2);
        let fitness = table.column_id("fitness").unwrap();
        assert_eq!(table.column(fitness), &[1.5, 2.5]);
        let generation = table.column_id("generation").unwrap();
        assert_eq!(table.column(generation), &[0.0, 1.0]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(
            Path::new("does/not/exist.csv"),
            &fitness_schema(),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::MissingFile { .. }));
    }

    #[test]
    fn test_load_missing_column() {
        let file = write_csv("generation,score\n0,1.0\n");
        let err = load(file.path(), &fitness_schema(), &LoadOptions::default()).unwrap_err();
        match err {
            ChartError::MalformedTable { reason, .. } => {
                assert!(reason.contains("fitness"), "reason was: {reason}");
            }
            other => panic!("expected MalformedTable, got {other:?}"),
        }
    }

    #[test]
    fn test_load_non_numeric_cell() {
        let file = write_csv("generation,fitness\n0,1.0\n1,n/a\n");
        let err = load(file.path(), &fitness_schema(), &LoadOptions::default()).unwrap_err();
        match err {
            ChartError::MalformedTable { reason, .. } => {
                assert!(reason.contains("n/a"), "reason was: {reason}");
                assert!(reason.contains("fitness"), "reason was: {reason}");
            }
            other => panic!("expected MalformedTable, got {other:?}"),
        }
    }

    #[test]
    fn test_load_header_only_table_is_empty() {
        let file = write_csv("generation,fitness\n");
        let table = load(file.path(), &fitness_schema(), &LoadOptions::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_infinity_kept_by_default() {
        let file = write_csv("generation,fitness\n0,inf\n");
        let table = load(file.path(), &fitness_schema(), &LoadOptions::default()).unwrap();
        let fitness = table.column_id("fitness").unwrap();
        assert!(table.column(fitness)[0].is_infinite());
    }

    #[test]
    fn test_infinity_treated_as_missing() {
        let file = write_csv("generation,fitness\n0,inf\n0,-inf\n0,2.0\n");
        let options = LoadOptions {
            infinity: InfinityHandling::TreatAsMissing,
        };
        let table = load(file.path(), &fitness_schema(), &options).unwrap();
        let fitness = table.column_id("fitness").unwrap();
        let values = table.column(fitness);
        assert!(values[0].is_nan());
        assert!(values[1].is_nan());
        assert_eq!(values[2], 2.0);
    }
}
