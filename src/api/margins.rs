use serde::{Deserialize, Serialize};

use super::chart_config::ChartConfig;

pub const MARGIN_RIGHT_PX: f64 = 50.0;
pub const TITLE_X_PX: f64 = 20.0;
pub const TITLE_Y_PX: f64 = 30.0;
pub const SUBTITLE_Y_WITH_TITLE_PX: f64 = 46.0;
pub const SUBTITLE_Y_ALONE_PX: f64 = 20.0;
pub const MIN_CANVAS_WIDTH: u32 = 100;
pub const MIN_CANVAS_HEIGHT: u32 = 100;

/// Chart and legend margins in pixels.
///
/// A pure function of the title/subtitle presence, legend visibility and
/// axis label presence, so a replayed configuration reproduces them exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub legend_top: f64,
    pub legend_bottom: f64,
}

impl ChartMargins {
    #[must_use]
    pub fn from_config(config: &ChartConfig) -> Self {
        let mut top = 10.0;
        if config.has_title() {
            top += 10.0;
        }
        if !config.legend {
            top += 30.0;
        }
        if config.has_subtitle() {
            top += 8.0;
        }

        let mut bottom = 25.0;
        if !config.has_title() && !config.has_subtitle() {
            bottom += 5.0;
        }
        if !config.x_axis_label.is_empty() {
            bottom += 20.0;
        }

        let mut left = 60.0;
        if !config.y_axis_label.is_empty() {
            left += 15.0;
        }

        Self {
            top,
            right: MARGIN_RIGHT_PX,
            bottom,
            left,
            legend_top: top,
            legend_bottom: top,
        }
    }
}

/// Y position of the subtitle baseline.
#[must_use]
pub fn subtitle_y(has_title: bool) -> f64 {
    if has_title {
        SUBTITLE_Y_WITH_TITLE_PX
    } else {
        SUBTITLE_Y_ALONE_PX
    }
}

/// CSS-like length of the view container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanvasLength {
    Pixels(u32),
    Percent(u32),
    /// `calc(100% - N px)`.
    FullMinusPixels(u32),
}

impl CanvasLength {
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Pixels(px) => format!("{px}px"),
            Self::Percent(pct) => format!("{pct}%"),
            Self::FullMinusPixels(px) => format!("calc(100% - {px}px)"),
        }
    }
}

/// Resolved container size and header mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSizing {
    pub width: CanvasLength,
    pub height: CanvasLength,
    pub floating_header: bool,
}

impl CanvasSizing {
    /// Fullscreen containers give the header its own row unless a title is
    /// shown or there are no controls to put in it.
    #[must_use]
    pub fn resolve(
        config: &ChartConfig,
        fixed_size: (u32, u32),
        fullscreen: bool,
        view_controls: bool,
        header_height_px: u32,
    ) -> Self {
        if !fullscreen {
            return Self {
                width: CanvasLength::Pixels(fixed_size.0),
                height: CanvasLength::Pixels(fixed_size.1),
                floating_header: false,
            };
        }

        let titled = config.has_title() || config.has_subtitle();
        if titled || !view_controls {
            Self {
                width: CanvasLength::Percent(100),
                height: CanvasLength::Percent(100),
                floating_header: true,
            }
        } else {
            Self {
                width: CanvasLength::Percent(100),
                height: CanvasLength::FullMinusPixels(header_height_px),
                floating_header: false,
            }
        }
    }
}
