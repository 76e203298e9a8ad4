//! streamgraph-rs: stacked area, percentage area and streamgraph views over
//! tabular data.
//!
//! `core` turns tables into stacked series, `api` holds the view, its
//! settings and their reconciliation, and `render` turns scenes into frames
//! or SVG documents.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, ChartSettings, ChartType, StreamgraphView, ViewOptions, ViewRepresentation};
pub use error::{ChartError, ChartResult};
