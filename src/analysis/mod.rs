//! Series construction: aggregation and composition.
//!
//! This module turns raw result tables into the named, ordered numeric
//! series that the chart emitter draws.

pub mod aggregator;
pub mod composer;

pub use aggregator::{aggregate, AggregatedSeries, Statistic};
pub use composer::{compose, default_label, resolve_names, ComposeRequest, NamedSeriesCollection};
