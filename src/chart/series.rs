//! Line-overlay rendering for a named series collection.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::analysis::NamedSeriesCollection;
use crate::chart::{finite_range, padded, palette_color, render_err, ChartOptions};
use crate::error::ChartError;

/// Render the collection as overlaid line series, one legend entry per
/// label, in insertion order.
pub fn render_series(
    collection: &NamedSeriesCollection,
    options: &ChartOptions,
    destination: &Path,
) -> Result<(), ChartError> {
    match destination.extension().and_then(|e| e.to_str()) {
        Some("svg") => {
            let root = SVGBackend::new(destination, options.size).into_drawing_area();
            draw(root, collection, options)?;
        }
        _ => {
            let root = BitMapBackend::new(destination, options.size).into_drawing_area();
            draw(root, collection, options)?;
        }
    }
    debug!(destination = %destination.display(), series = collection.len(), "rendered series chart");
    Ok(())
}

fn draw<DB>(
    root: DrawingArea<DB, Shift>,
    collection: &NamedSeriesCollection,
    options: &ChartOptions,
) -> Result<(), ChartError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(render_err)?;

    let xs = collection
        .values()
        .flat_map(|s| s.points().iter().map(|(x, _)| *x));
    let ys = collection
        .values()
        .flat_map(|s| s.points().iter().map(|(_, y)| *y));
    let (x_lo, x_hi) = finite_range(xs)
        .map(|(a, b)| padded(a, b))
        .unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = finite_range(ys)
        .map(|(a, b)| padded(a, b))
        .unwrap_or((0.0, 1.0));

    let (x_min, x_max) = options.x_bounds.resolve(x_lo, x_hi);
    let (y_min, y_max) = options.y_bounds.resolve(y_lo, y_hi);

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70);
    if let Some(title) = &options.title {
        builder.caption(title, ("sans-serif", 30));
    }

    if options.log_y {
        // A log axis needs a strictly positive range.
        let mut y_floor = collection
            .values()
            .flat_map(|s| s.points().iter().map(|(_, y)| *y))
            .filter(|y| *y > 0.0 && y.is_finite())
            .fold(f64::INFINITY, f64::min);
        if !y_floor.is_finite() {
            y_floor = 1e-2;
        }
        let y_ceil = if y_max > y_floor { y_max } else { y_floor * 10.0 };

        let mut chart = builder
            .build_cartesian_2d(x_min..x_max, (y_floor..y_ceil).log_scale())
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .x_desc("Generation")
            .draw()
            .map_err(render_err)?;

        for (index, (label, series)) in collection.iter().enumerate() {
            let color = palette_color(index);
            chart
                .draw_series(LineSeries::new(series.points().iter().copied(), &color))
                .map_err(render_err)?
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()
            .map_err(render_err)?;
    } else {
        let mut chart = builder
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .x_desc("Generation")
            .draw()
            .map_err(render_err)?;

        for (index, (label, series)) in collection.iter().enumerate() {
            let color = palette_color(index);
            chart
                .draw_series(LineSeries::new(series.points().iter().copied(), &color))
                .map_err(render_err)?
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}
