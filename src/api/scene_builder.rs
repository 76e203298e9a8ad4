use tracing::trace;

use crate::core::{
    Color, LinearScale, PlotRect, SeriesSet, StackLayout, StackOffset, Viewport, interpolate,
    stack_series,
};
use crate::error::ChartResult;
use crate::render::{
    AreaPrimitive, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};

use super::axis_formatter::AxisFormatter;
use super::chart_state::ChartState;
use super::margins::ChartMargins;

pub const TITLE_ELEMENT_ID: &str = "title";
pub const SUBTITLE_ELEMENT_ID: &str = "subtitle";

/// Row reserved for the legend above the plot when it is shown.
pub const LEGEND_ROW_PX: f64 = 30.0;
const TITLE_FONT_PX: f64 = 18.0;
const SUBTITLE_FONT_PX: f64 = 12.0;
const AXIS_FONT_PX: f64 = 12.0;
const TICK_FONT_PX: f64 = 11.0;
const TICK_LENGTH_PX: f64 = 5.0;
const X_TICK_COUNT: usize = 8;
const Y_TICK_COUNT: usize = 6;
const LEGEND_SWATCH_PX: f64 = 10.0;
const LEGEND_GAP_PX: f64 = 20.0;
const LEGEND_CHAR_PX: f64 = 7.0;

const BACKGROUND: Color = Color::rgb(1.0, 1.0, 1.0);
const FOREGROUND: Color = Color::rgb8(0x33, 0x33, 0x33);
const AXIS_COLOR: Color = Color::rgb8(0x88, 0x88, 0x88);
const GRID_COLOR: Color = Color::rgb8(0xe5, 0xe5, 0xe5);

/// Everything a scene depends on.
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub state: &'a ChartState,
    pub series: &'a SeriesSet,
    /// One color per series, in series order.
    pub colors: &'a [Color],
    pub x_formatter: &'a AxisFormatter,
    pub y_formatter: &'a AxisFormatter,
    pub viewport: Viewport,
}

/// Turns chart state and series into a `RenderFrame`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneBuilder;

impl SceneBuilder {
    /// Plot area left after margins and the legend row.
    #[must_use]
    pub fn plot_rect(margins: ChartMargins, legend_visible: bool, viewport: Viewport) -> PlotRect {
        let top = margins.top + if legend_visible { LEGEND_ROW_PX } else { 0.0 };
        let width = f64::from(viewport.width) - margins.left - margins.right;
        let height = f64::from(viewport.height) - top - margins.bottom;
        PlotRect {
            x: margins.left,
            y: top,
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Stack of the enabled series with the chart type's order and offset.
    #[must_use]
    pub fn stack(state: &ChartState, series: &SeriesSet) -> StackLayout {
        let config = state.config();
        let disabled = config.disabled_flags(series.series.len());
        stack_series(
            &series.series,
            &disabled,
            config.chart_type.stack_order(),
            config.chart_type.stack_offset(),
        )
    }

    pub fn build(input: &SceneInput<'_>) -> ChartResult<RenderFrame> {
        let rendered = input.state.rendered();
        let plot = Self::plot_rect(rendered.margins, rendered.legend_visible, input.viewport);
        let layout = Self::stack(input.state, input.series);

        let x_domain = layout.x_extent().unwrap_or_else(|| {
            let last = input.series.point_count().saturating_sub(1) as f64;
            (0.0, last)
        });
        let y_domain = match rendered.chart_type.stack_offset() {
            StackOffset::Expand => (0.0, 1.0),
            _ => layout.value_extent(),
        };
        let x_scale = LinearScale::new(x_domain, (plot.x, plot.right()))?;
        let y_scale = LinearScale::new(y_domain, (plot.bottom(), plot.y))?;

        let mut x_ticks = x_scale.ticks(X_TICK_COUNT);
        if input.x_formatter.is_positional() {
            x_ticks.retain(|tick| tick.fract() == 0.0);
        }
        let y_ticks = y_scale.ticks(Y_TICK_COUNT);

        let mut frame = RenderFrame::new(input.viewport).with_rect(RectPrimitive::new(
            0.0,
            0.0,
            f64::from(input.viewport.width),
            f64::from(input.viewport.height),
            BACKGROUND,
        ));

        if rendered.grid_visible {
            push_grid(&mut frame, plot, x_scale, y_scale, &x_ticks, &y_ticks);
        }
        push_areas(&mut frame, &layout, input, x_scale, y_scale);
        push_axes(&mut frame, plot, input, x_scale, y_scale, &x_ticks, &y_ticks);
        if rendered.legend_visible {
            push_legend(&mut frame, input, plot.x, rendered.margins.legend_top);
        }
        push_titles(&mut frame, input.state);

        trace!(
            areas = frame.areas.len(),
            texts = frame.texts.len(),
            "built streamgraph scene"
        );
        Ok(frame)
    }
}

fn push_grid(
    frame: &mut RenderFrame,
    plot: PlotRect,
    x_scale: LinearScale,
    y_scale: LinearScale,
    x_ticks: &[f64],
    y_ticks: &[f64],
) {
    for &tick in x_ticks {
        let x = x_scale.map(tick);
        frame.grid_lines.push(
            LinePrimitive::new(x, plot.y, x, plot.bottom(), 1.0, GRID_COLOR)
                .with_stroke_style(LineStrokeStyle::Dashed),
        );
    }
    for &tick in y_ticks {
        let y = y_scale.map(tick);
        frame.grid_lines.push(
            LinePrimitive::new(plot.x, y, plot.right(), y, 1.0, GRID_COLOR)
                .with_stroke_style(LineStrokeStyle::Dashed),
        );
    }
}

fn push_areas(
    frame: &mut RenderFrame,
    layout: &StackLayout,
    input: &SceneInput<'_>,
    x_scale: LinearScale,
    y_scale: LinearScale,
) {
    let interpolation = input.state.rendered().interpolation;
    for band in &layout.bands {
        let finite = band.points.iter().filter(|point| point.x.is_finite());
        let upper: Vec<(f64, f64)> = finite
            .clone()
            .map(|point| (x_scale.map(point.x), y_scale.map(point.y1)))
            .collect();
        let lower: Vec<(f64, f64)> = finite
            .map(|point| (x_scale.map(point.x), y_scale.map(point.y0)))
            .collect();
        if upper.is_empty() {
            continue;
        }

        let mut outline = interpolate(&upper, interpolation);
        let mut bottom = interpolate(&lower, interpolation);
        bottom.reverse();
        outline.extend(bottom);

        let fill = input
            .colors
            .get(band.series_index)
            .copied()
            .unwrap_or(crate::core::FALLBACK_SERIES_COLOR);
        frame.areas.push(AreaPrimitive::new(
            band.key.clone(),
            band.series_index,
            outline,
            fill,
        ));
    }
}

fn push_axes(
    frame: &mut RenderFrame,
    plot: PlotRect,
    input: &SceneInput<'_>,
    x_scale: LinearScale,
    y_scale: LinearScale,
    x_ticks: &[f64],
    y_ticks: &[f64],
) {
    let rendered = input.state.rendered();

    frame.lines.push(LinePrimitive::new(
        plot.x,
        plot.bottom(),
        plot.right(),
        plot.bottom(),
        1.0,
        AXIS_COLOR,
    ));
    frame.lines.push(LinePrimitive::new(
        plot.x,
        plot.y,
        plot.x,
        plot.bottom(),
        1.0,
        AXIS_COLOR,
    ));

    for &tick in x_ticks {
        let x = x_scale.map(tick);
        frame.lines.push(LinePrimitive::new(
            x,
            plot.bottom(),
            x,
            plot.bottom() + TICK_LENGTH_PX,
            1.0,
            AXIS_COLOR,
        ));
        push_label(
            frame,
            input.x_formatter.format(tick),
            x,
            plot.bottom() + TICK_LENGTH_PX + TICK_FONT_PX + 2.0,
            TextHAlign::Center,
        );
    }
    for &tick in y_ticks {
        let y = y_scale.map(tick);
        frame.lines.push(LinePrimitive::new(
            plot.x - TICK_LENGTH_PX,
            y,
            plot.x,
            y,
            1.0,
            AXIS_COLOR,
        ));
        push_label(
            frame,
            input.y_formatter.format(tick),
            plot.x - TICK_LENGTH_PX - 3.0,
            y + TICK_FONT_PX / 3.0,
            TextHAlign::Right,
        );
    }

    if !rendered.x_axis_label.is_empty() {
        frame.texts.push(TextPrimitive::new(
            rendered.x_axis_label.clone(),
            plot.x + plot.width / 2.0,
            plot.bottom() + 40.0,
            AXIS_FONT_PX,
            FOREGROUND,
            TextHAlign::Center,
        ));
    }
    if !rendered.y_axis_label.is_empty() {
        frame.texts.push(
            TextPrimitive::new(
                rendered.y_axis_label.clone(),
                15.0,
                plot.y + plot.height / 2.0,
                AXIS_FONT_PX,
                FOREGROUND,
                TextHAlign::Center,
            )
            .with_rotation(-90.0),
        );
    }
}

fn push_label(frame: &mut RenderFrame, text: String, x: f64, y: f64, align: TextHAlign) {
    if text.is_empty() {
        return;
    }
    frame
        .texts
        .push(TextPrimitive::new(text, x, y, TICK_FONT_PX, FOREGROUND, align));
}

/// Disabled series keep their entry with a hollow swatch.
fn push_legend(frame: &mut RenderFrame, input: &SceneInput<'_>, left: f64, top: f64) {
    let config = input.state.config();
    let baseline = top + LEGEND_ROW_PX / 2.0;
    let mut x = left;
    for (index, series) in input.series.series.iter().enumerate() {
        let color = input
            .colors
            .get(index)
            .copied()
            .unwrap_or(crate::core::FALLBACK_SERIES_COLOR);
        let fill = if config.is_series_disabled(index) {
            BACKGROUND
        } else {
            color
        };
        frame.rects.push(
            RectPrimitive::new(
                x,
                baseline - LEGEND_SWATCH_PX,
                LEGEND_SWATCH_PX,
                LEGEND_SWATCH_PX,
                fill,
            )
            .with_stroke(color),
        );
        let label_x = x + LEGEND_SWATCH_PX + 4.0;
        push_label(frame, series.key.clone(), label_x, baseline, TextHAlign::Left);
        x = label_x + series.key.chars().count() as f64 * LEGEND_CHAR_PX + LEGEND_GAP_PX;
    }
}

fn push_titles(frame: &mut RenderFrame, state: &ChartState) {
    let rendered = state.rendered();
    if let Some(title) = &rendered.title {
        frame.texts.push(
            TextPrimitive::new(
                title.text.clone(),
                title.x,
                title.y,
                TITLE_FONT_PX,
                FOREGROUND,
                TextHAlign::Left,
            )
            .with_id(TITLE_ELEMENT_ID),
        );
    }
    if let Some(subtitle) = &rendered.subtitle {
        frame.texts.push(
            TextPrimitive::new(
                subtitle.text.clone(),
                subtitle.x,
                subtitle.y,
                SUBTITLE_FONT_PX,
                FOREGROUND,
                TextHAlign::Left,
            )
            .with_id(SUBTITLE_ELEMENT_ID),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{LEGEND_ROW_PX, SceneBuilder};
    use crate::api::chart_config::ChartConfig;
    use crate::api::margins::ChartMargins;
    use crate::core::Viewport;

    #[test]
    fn hiding_the_legend_keeps_the_plot_top() {
        let shown = ChartConfig::default();
        let mut hidden = ChartConfig::default();
        hidden.legend = false;

        let viewport = Viewport::new(800, 600);
        let with_legend = SceneBuilder::plot_rect(ChartMargins::from_config(&shown), true, viewport);
        let without = SceneBuilder::plot_rect(ChartMargins::from_config(&hidden), false, viewport);
        assert!((with_legend.y - without.y).abs() <= 1e-9);
        assert!((with_legend.y - (10.0 + LEGEND_ROW_PX)).abs() <= 1e-9);
    }
}
