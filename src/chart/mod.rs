//! Chart emission: thin adapters over the plotters backend.
//!
//! The core pipeline produces well-formed series and point sets; this
//! module only maps them onto a drawing backend. The backend is chosen
//! from the destination extension (`.svg` is vector, anything else goes
//! through the bitmap backend).

pub mod scatter;
pub mod series;

pub use scatter::render_scatter;
pub use series::render_series;

use plotters::style::RGBColor;

use crate::error::ChartError;
use crate::table::{ColumnId, ResultTable};

/// One bound of an axis range; `None` means derive from the data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisBounds {
    /// Final (min, max) for the axis: explicit bounds win, the data
    /// range fills the rest, and a degenerate range is widened so the
    /// backend always receives a non-empty axis.
    pub fn resolve(&self, data_min: f64, data_max: f64) -> (f64, f64) {
        let min = self.min.unwrap_or(data_min);
        let max = self.max.unwrap_or(data_max);
        if min < max {
            (min, max)
        } else {
            (min - 0.5, min + 0.5)
        }
    }
}

/// Display configuration consumed by both chart kinds.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: Option<String>,
    pub x_bounds: AxisBounds,
    pub y_bounds: AxisBounds,
    /// Logarithmic y axis (series charts only).
    pub log_y: bool,
    /// Figure size in pixels.
    pub size: (u32, u32),
    /// Marker radius for membership points.
    pub point_size: u32,
    /// Marker radius for the centroid overlay.
    pub centroid_size: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: None,
            x_bounds: AxisBounds::default(),
            y_bounds: AxisBounds::default(),
            log_y: false,
            size: (2000, 1000),
            point_size: 3,
            centroid_size: 6,
        }
    }
}

/// A single 2D point with an optional cluster id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub cluster: Option<f64>,
}

/// Raw (x, y) points plotted as-is, with no grouping or aggregation.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    /// Pass table rows through unchanged as a point set. This is the
    /// scatter path that bypasses the aggregator entirely.
    pub fn from_table(
        table: &ResultTable,
        x: ColumnId,
        y: ColumnId,
        cluster: Option<ColumnId>,
    ) -> PointSet {
        let xs = table.column(x);
        let ys = table.column(y);
        let clusters = cluster.map(|id| table.column(id));

        let mut set = PointSet::default();
        for (row, (&x, &y)) in xs.iter().zip(ys).enumerate() {
            set.push(Point {
                x,
                y,
                cluster: clusters.map(|c| c[row]),
            });
        }
        set
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Fixed series palette, cycled in insertion order so legend colors are
/// reproducible run to run.
pub(crate) const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub(crate) fn palette_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Map any backend failure into the run-aborting render error.
pub(crate) fn render_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

/// The finite (min, max) over an iterator of values, if any exist.
pub(crate) fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for value in values.filter(|v| v.is_finite()) {
        range = Some(match range {
            None => (value, value),
            Some((min, max)) => (min.min(value), max.max(value)),
        });
    }
    range
}

/// Widen a data range by 5% on each side so points never sit on the
/// plot border. Explicit axis bounds are applied after padding and are
/// therefore exact.
pub(crate) fn padded(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span > 0.0 {
        (min - 0.05 * span, max + 0.05 * span)
    } else {
        (min - 0.5, max + 0.5)
    }
}
