pub mod color;
pub mod curve;
pub mod filter;
pub mod scale;
pub mod series;
pub mod stack;
pub mod table;
pub mod types;

pub use color::{CATEGORY10, CATEGORY20, Color, ColorAssigner, ColorTable, FALLBACK_SERIES_COLOR};
pub use curve::{Interpolation, interpolate};
pub use filter::{FilterElement, RowFilter};
pub use scale::LinearScale;
pub use series::{SeriesBuilder, SeriesSet, SeriesSpec, XAxisSource};
pub use stack::{BandPoint, StackLayout, StackOffset, StackOrder, StackedBand, stack_series};
pub use table::{CellValue, ColumnSpec, ColumnType, DataTable, TableRow};
pub use types::{DataPoint, PlotRect, Viewport};
