use serde::Serialize;

use crate::model::bands::BandKind;
use crate::model::series::{Channel, RunKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.hex()
    }
}

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const RED: Rgb = Rgb(0xFF, 0, 0);
pub const BLUE: Rgb = Rgb(0, 0, 0xFF);
pub const DARK_RED: Rgb = Rgb(0x8B, 0, 0);
pub const GRID: Rgb = Rgb(0xE5, 0xE5, 0xE5);

/// Shaded horizontal region spanning the whole time extent of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandShape {
    pub kind: BandKind,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub fill: Rgb,
    pub opacity: f64,
    pub outline: Option<Rgb>,
}

/// Boxed text label. `x_frac` is a fraction of the plot width, `y` is in PSI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x_frac: f64,
    pub y: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceRole {
    Raw,
    Smoothed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    Solid,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub channel: Channel,
    pub role: TraceRole,
    pub points: Vec<(f64, f64)>,
    pub color: Rgb,
    pub width: u32,
    pub dash: LineDash,
    pub hover: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremumKind {
    Max,
    Min,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub trace: String,
    pub kind: ExtremumKind,
    pub index: usize,
    pub time: f64,
    pub value: f64,
    pub label: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverMode {
    X,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub y_tick_suffix: &'static str,
    pub show_grid: bool,
    pub grid_color: Rgb,
    pub axis_color: Rgb,
    pub hover_mode: HoverMode,
    pub spike_cursor: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            x_title: "Time (s)",
            y_title: "Pressure (PSI)",
            y_tick_suffix: " PSI",
            show_grid: true,
            grid_color: GRID,
            axis_color: BLACK,
            hover_mode: HoverMode::X,
            spike_cursor: true,
        }
    }
}

/// Renderer-independent description of one chart. Layers draw in field
/// order: bands, traces, labels, markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub run: RunKind,
    pub title: String,
    pub x_range: (f64, f64),
    pub bands: Vec<BandShape>,
    pub traces: Vec<Trace>,
    pub labels: Vec<Annotation>,
    pub markers: Vec<Marker>,
    pub style: ChartStyle,
}

impl ChartSpec {
    /// Vertical extent covering every trace and band, padded for labels.
    pub fn y_range(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for trace in &self.traces {
            for &(_, y) in &trace.points {
                lo = lo.min(y);
                hi = hi.max(y);
            }
        }
        for band in &self.bands {
            lo = lo.min(band.y0);
            hi = hi.max(band.y1);
        }
        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        let span = hi - lo;
        let pad = if span < 1e-6 { 0.5 } else { span * 0.08 };
        (lo - pad, hi + pad)
    }
}
