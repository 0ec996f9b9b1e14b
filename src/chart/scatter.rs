//! Scatter rendering for cluster membership with an optional centroid
//! overlay.

use std::path::Path;

use ordered_float::OrderedFloat;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::chart::{finite_range, padded, palette_color, render_err, ChartOptions, PointSet};
use crate::error::ChartError;

/// Render membership points colored per cluster id, plus an optional
/// fixed-style centroid overlay.
pub fn render_scatter(
    points: &PointSet,
    overlay: Option<&PointSet>,
    options: &ChartOptions,
    destination: &Path,
) -> Result<(), ChartError> {
    match destination.extension().and_then(|e| e.to_str()) {
        Some("svg") => {
            let root = SVGBackend::new(destination, options.size).into_drawing_area();
            draw(root, points, overlay, options)?;
        }
        _ => {
            let root = BitMapBackend::new(destination, options.size).into_drawing_area();
            draw(root, points, overlay, options)?;
        }
    }
    debug!(
        destination = %destination.display(),
        points = points.points().len(),
        centroids = overlay.map_or(0, |o| o.points().len()),
        "rendered scatter chart"
    );
    Ok(())
}

fn draw<DB>(
    root: DrawingArea<DB, Shift>,
    points: &PointSet,
    overlay: Option<&PointSet>,
    options: &ChartOptions,
) -> Result<(), ChartError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(render_err)?;

    let all = points
        .points()
        .iter()
        .chain(overlay.into_iter().flat_map(|o| o.points()));
    let (x_lo, x_hi) = finite_range(all.clone().map(|p| p.x))
        .map(|(a, b)| padded(a, b))
        .unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = finite_range(all.map(|p| p.y))
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

    let mut chart = builder
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .draw()
        .map_err(render_err)?;

    // One series per distinct cluster id, in ascending id order, so
    // colors and legend entries are reproducible.
    let mut clusters: Vec<OrderedFloat<f64>> = points
        .points()
        .iter()
        .filter_map(|p| p.cluster)
        .filter(|c| !c.is_nan())
        .map(OrderedFloat)
        .collect();
    clusters.sort_unstable();
    clusters.dedup();

    let point_size = options.point_size as i32;
    for (index, cluster) in clusters.iter().enumerate() {
        let color = palette_color(index);
        let id = cluster.into_inner();
        chart
            .draw_series(
                points
                    .points()
                    .iter()
                    .filter(move |p| p.cluster == Some(id))
                    .map(|p| Circle::new((p.x, p.y), point_size, color.filled())),
            )
            .map_err(render_err)?
            .label(format!("cluster {id}"))
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    // Points with no cluster attribute (possible when the membership
    // column was normalized away) fall back to the first palette color.
    if points.points().iter().any(|p| p.cluster.is_none() || p.cluster.is_some_and(f64::is_nan)) {
        let color = palette_color(clusters.len());
        chart
            .draw_series(
                points
                    .points()
                    .iter()
                    .filter(|p| p.cluster.is_none() || p.cluster.is_some_and(f64::is_nan))
                    .map(|p| Circle::new((p.x, p.y), point_size, color.filled())),
            )
            .map_err(render_err)?;
    }

    if let Some(centroids) = overlay {
        let size = options.centroid_size as i32;
        chart
            .draw_series(
                centroids
                    .points()
                    .iter()
                    .map(|p| Circle::new((p.x, p.y), size, RED.filled())),
            )
            .map_err(render_err)?
            .label("centroids")
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, RED.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Point;
    use tempfile::tempdir;

    fn membership() -> PointSet {
        let mut points = PointSet::default();
        for (x, y, cluster) in [
            (1.0, 1.0, 0.0),
            (2.0, 1.5, 0.0),
            (-4.0, -3.0, 1.0),
            (-5.0, -2.0, 1.0),
            (10.0, 10.0, 2.0),
        ] {
            points.push(Point {
                x,
                y,
                cluster: Some(cluster),
            });
        }
        points
    }

    fn centroids() -> PointSet {
        let mut points = PointSet::default();
        points.push(Point {
            x: 1.5,
            y: 1.25,
            cluster: None,
        });
        points.push(Point {
            x: -4.5,
            y: -2.5,
            cluster: None,
        });
        points
    }

    #[test]
    fn test_render_scatter_with_overlay() {
        let dir = tempdir().expect("temp dir");
        let dest = dir.path().join("clusters.svg");

        let options = ChartOptions {
            size: (800, 400),
            ..ChartOptions::default()
        };
        render_scatter(&membership(), Some(&centroids()), &options, &dest).unwrap();
        assert!(std::fs::metadata(&dest).expect("output file").len() > 0);
    }

    #[test]
    fn test_render_scatter_without_overlay() {
        let dir = tempdir().expect("temp dir");
        let dest = dir.path().join("clusters.svg");

        render_scatter(&membership(), None, &ChartOptions::default(), &dest).unwrap();
        assert!(dest.exists());
    }

    #[test]
    fn test_render_scatter_with_fixed_bounds() {
        let dir = tempdir().expect("temp dir");
        let dest = dir.path().join("bounded.svg");

        let options = ChartOptions {
            x_bounds: crate::chart::AxisBounds {
                min: Some(-150.0),
                max: Some(150.0),
            },
            y_bounds: crate::chart::AxisBounds {
                min: Some(-150.0),
                max: Some(150.0),
            },
            ..ChartOptions::default()
        };
        render_scatter(&membership(), None, &options, &dest).unwrap();
        assert!(dest.exists());
    }
}
