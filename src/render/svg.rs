use std::fmt::{self, Write as _};

use tracing::debug;

use crate::core::Color;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    AreaPrimitive, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame, Renderer,
    TextHAlign, TextPrimitive,
};

const FONT_FAMILY: &str = "sans-serif";

/// Renders frames into standalone SVG documents.
///
/// Every presentation attribute is written inline so the document renders
/// without a stylesheet. Rect sizes are always explicit, zero included.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    last_document: Option<String>,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Document produced by the last successful `render` call.
    #[must_use]
    pub fn last_document(&self) -> Option<&str> {
        self.last_document.as_deref()
    }

    pub fn take_document(&mut self) -> Option<String> {
        self.last_document.take()
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        self.last_document = Some(render_svg(frame)?);
        Ok(())
    }
}

/// Serializes a validated frame to SVG markup.
pub fn render_svg(frame: &RenderFrame) -> ChartResult<String> {
    frame.validate()?;
    let mut svg = String::new();
    write_document(&mut svg, frame)
        .map_err(|_| ChartError::InvalidData("failed to serialize svg".to_owned()))?;
    debug!(bytes = svg.len(), areas = frame.areas.len(), "serialized svg document");
    Ok(svg)
}

fn write_document(svg: &mut String, frame: &RenderFrame) -> fmt::Result {
    let (width, height) = (frame.viewport.width, frame.viewport.height);
    writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    )?;

    for rect in &frame.rects {
        write_rect(svg, rect)?;
    }
    if !frame.grid_lines.is_empty() {
        writeln!(svg, "  <g class=\"grid\">")?;
        for line in &frame.grid_lines {
            write_line(svg, line)?;
        }
        writeln!(svg, "  </g>")?;
    }
    for area in &frame.areas {
        write_area(svg, area)?;
    }
    for line in &frame.lines {
        write_line(svg, line)?;
    }
    for text in &frame.texts {
        write_text(svg, text)?;
    }

    writeln!(svg, "</svg>")
}

fn write_rect(svg: &mut String, rect: &RectPrimitive) -> fmt::Result {
    write!(
        svg,
        "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" style=\"fill: {};{}",
        num(rect.x),
        num(rect.y),
        num(rect.width),
        num(rect.height),
        rect.fill.to_hex(),
        opacity("fill-opacity", rect.fill),
    )?;
    if let Some(stroke) = rect.stroke {
        write!(svg, " stroke: {};{}", stroke.to_hex(), opacity("stroke-opacity", stroke))?;
    }
    writeln!(svg, "\"/>")
}

fn write_line(svg: &mut String, line: &LinePrimitive) -> fmt::Result {
    let dash = match line.stroke_style {
        LineStrokeStyle::Solid => "",
        LineStrokeStyle::Dashed => " stroke-dasharray: 4 3;",
    };
    writeln!(
        svg,
        "    <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" style=\"stroke: {}; stroke-width: {};{}{}\"/>",
        num(line.x1),
        num(line.y1),
        num(line.x2),
        num(line.y2),
        line.color.to_hex(),
        num(line.stroke_width),
        opacity("stroke-opacity", line.color),
        dash,
    )
}

fn write_area(svg: &mut String, area: &AreaPrimitive) -> fmt::Result {
    let mut data = String::new();
    for (index, (x, y)) in area.outline.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        write!(data, "{command}{},{}", num(*x), num(*y))?;
    }
    if !data.is_empty() {
        data.push('Z');
    }

    writeln!(
        svg,
        "  <path class=\"stream-area\" data-series=\"{}\" d=\"{}\" style=\"fill: {}; fill-opacity: {}; stroke: none;\"/>",
        escape(&area.key),
        data,
        area.fill.to_hex(),
        num(area.fill_opacity * area.fill.alpha),
    )
}

fn write_text(svg: &mut String, text: &TextPrimitive) -> fmt::Result {
    let anchor = match text.h_align {
        TextHAlign::Left => "start",
        TextHAlign::Center => "middle",
        TextHAlign::Right => "end",
    };
    write!(svg, "  <text")?;
    if let Some(id) = &text.id {
        write!(svg, " id=\"{}\"", escape(id))?;
    }
    write!(svg, " x=\"{}\" y=\"{}\"", num(text.x), num(text.y))?;
    if text.rotation_deg != 0.0 {
        write!(
            svg,
            " transform=\"rotate({} {} {})\"",
            num(text.rotation_deg),
            num(text.x),
            num(text.y)
        )?;
    }
    writeln!(
        svg,
        " style=\"font-family: {FONT_FAMILY}; font-size: {}px; fill: {};{} text-anchor: {anchor};\">{}</text>",
        num(text.font_size_px),
        text.color.to_hex(),
        opacity("fill-opacity", text.color),
        escape(&text.text),
    )
}

fn opacity(property: &str, color: Color) -> String {
    if color.alpha < 1.0 {
        format!(" {property}: {};", num(color.alpha))
    } else {
        String::new()
    }
}

/// Shortest decimal with at most three fractional digits.
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape, num, render_svg};
    use crate::core::{Color, Viewport};
    use crate::render::{RectPrimitive, RenderFrame};

    #[test]
    fn numbers_are_trimmed_to_three_decimals() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(2.34567), "2.346");
        assert_eq!(num(-0.0001), "0");
    }

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn zero_sized_rects_keep_explicit_dimensions() {
        let frame = RenderFrame::new(Viewport::new(10, 10)).with_rect(RectPrimitive::new(
            1.0,
            1.0,
            0.0,
            0.0,
            Color::rgb(1.0, 1.0, 1.0),
        ));
        let svg = render_svg(&frame).expect("svg");
        assert!(svg.contains("width=\"0\" height=\"0\""));
    }
}
