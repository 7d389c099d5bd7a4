use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::drawing::IntoDrawingArea;
use plotters::element::{Circle, EmptyElement, PathElement, Rectangle, Text};
use plotters::series::{DashedLineSeries, LineSeries};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color, FontStyle, IntoFont, RGBColor};
use printpdf::image_crate::codecs::jpeg::JpegEncoder;
use printpdf::image_crate::codecs::png::PngEncoder;
use printpdf::image_crate::{ColorType, ImageEncoder};

use crate::model::chart::{ChartSpec, LineDash, Rgb};

pub const LOGICAL_WIDTH: u32 = 1200;
pub const LOGICAL_HEIGHT: u32 = 700;
pub const RASTER_SCALE: u32 = 2;

/// Markers past this fraction of the time axis carry their label on the left.
pub const MARKER_FLIP_FRAC: f64 = 0.6;

const FONT: &str = "sans-serif";
const WHITE: RGBColor = RGBColor(255, 255, 255);
const BLACK: RGBColor = RGBColor(0, 0, 0);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("chart '{title}' could not be rendered: {message}")]
    Backend { title: String, message: String },
    #[error("image encoding failed: {0}")]
    Encode(String),
}

/// Packed 8-bit RGB pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl RasterImage {
    fn check_len(&self) -> Result<(), RenderError> {
        let expected = self.width as usize * self.height as usize * 3;
        if self.rgb.len() == expected {
            Ok(())
        } else {
            Err(RenderError::Encode(format!(
                "{}x{} RGB buffer needs {} bytes, got {}",
                self.width,
                self.height,
                expected,
                self.rgb.len()
            )))
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        self.check_len()?;
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&self.rgb, self.width, self.height, ColorType::Rgb8)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(out)
    }

    /// Baseline JPEG, used for the PDF image streams.
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>, RenderError> {
        self.check_len()?;
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality)
            .encode(&self.rgb, self.width, self.height, ColorType::Rgb8)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(out)
    }
}

pub trait ChartRasterizer {
    fn rasterize(&self, chart: &ChartSpec) -> Result<RasterImage, RenderError>;
}

#[derive(Debug, Clone, Copy)]
pub struct PlottersRasterizer {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
}

impl Default for PlottersRasterizer {
    fn default() -> Self {
        Self {
            width: LOGICAL_WIDTH,
            height: LOGICAL_HEIGHT,
            scale: RASTER_SCALE,
        }
    }
}

impl ChartRasterizer for PlottersRasterizer {
    fn rasterize(&self, chart: &ChartSpec) -> Result<RasterImage, RenderError> {
        let width = self.width * self.scale;
        let height = self.height * self.scale;
        let mut rgb = vec![0u8; width as usize * height as usize * 3];
        draw_chart(&mut rgb, (width, height), self.scale, chart).map_err(|message| {
            RenderError::Backend {
                title: chart.title.clone(),
                message,
            }
        })?;
        tracing::debug!("rasterized '{}' at {}x{}", chart.title, width, height);
        Ok(RasterImage { width, height, rgb })
    }
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn padded_x(range: (f64, f64)) -> (f64, f64) {
    if range.1 - range.0 < 1e-9 {
        (range.0 - 0.5, range.1 + 0.5)
    } else {
        range
    }
}

/// True when a marker at `time` should carry its label on the left.
fn label_on_left(time: f64, x: (f64, f64)) -> bool {
    let span = x.1 - x.0;
    span > 0.0 && (time - x.0) / span > MARKER_FLIP_FRAC
}

// Horizontal offsets for overstruck bold text. Font lookup falls back to the
// regular face when no bold variant is installed.
fn bold_offsets(scale: u32) -> std::ops::RangeInclusive<i32> {
    0..=(scale / 2).max(1) as i32
}

fn draw_chart(
    buf: &mut [u8],
    size: (u32, u32),
    scale: u32,
    chart: &ChartSpec,
) -> Result<(), String> {
    let s = scale as f64;
    let px = |v: i32| v * scale as i32;

    let root = BitMapBackend::with_buffer(buf, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let title_style = (FONT, 22.0 * s)
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for dx in bold_offsets(scale) {
        root.draw(&Text::new(
            chart.title.as_str(),
            ((size.0 / 2) as i32 + dx, px(14)),
            title_style.clone(),
        ))
        .map_err(|e| e.to_string())?;
    }

    let (x0, x1) = padded_x(chart.x_range);
    let (y0, y1) = chart.y_range();

    let mut ctx = ChartBuilder::on(&root)
        .margin(px(35))
        .margin_top(px(60))
        .x_label_area_size(px(50))
        .y_label_area_size(px(90))
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| e.to_string())?;

    let style = &chart.style;
    let grid = rgb(style.grid_color);
    let axis = rgb(style.axis_color);
    let x_fmt = |v: &f64| format!("{v:.1}");
    let y_fmt = |v: &f64| format!("{v:.1}{}", style.y_tick_suffix);

    let mut mesh = ctx.configure_mesh();
    mesh.x_desc(style.x_title)
        .y_desc(style.y_title)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .axis_style(axis.stroke_width(scale * 2))
        .axis_desc_style(
            (FONT, 14.0 * s)
                .into_font()
                .style(FontStyle::Bold)
                .color(&BLACK),
        )
        .label_style((FONT, 12.0 * s).into_font().color(&BLACK));
    if style.show_grid {
        mesh.light_line_style(&grid).bold_line_style(&grid);
    } else {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(|e| e.to_string())?;

    for band in &chart.bands {
        let corners = [(band.x0, band.y0), (band.x1, band.y1)];
        ctx.draw_series(std::iter::once(Rectangle::new(
            corners,
            rgb(band.fill).mix(band.opacity).filled(),
        )))
        .map_err(|e| e.to_string())?;
        if let Some(outline) = band.outline {
            ctx.draw_series(std::iter::once(Rectangle::new(
                corners,
                rgb(outline).stroke_width(scale),
            )))
            .map_err(|e| e.to_string())?;
        }
    }

    for trace in &chart.traces {
        let color = rgb(trace.color);
        let width = trace.width * scale;
        let line = color.stroke_width(width);
        let points = trace.points.iter().copied();
        let anno = match trace.dash {
            LineDash::Solid => ctx.draw_series(LineSeries::new(points, line)),
            LineDash::Dotted => {
                ctx.draw_series(DashedLineSeries::new(points, 4 * scale, 4 * scale, line))
            }
        }
        .map_err(|e| e.to_string())?;
        let legend_len = px(20);
        anno.label(trace.name.clone()).legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + legend_len, y)], color.stroke_width(width))
        });
    }

    let pad = px(6);
    for label in &chart.labels {
        let x = x0 + label.x_frac * (x1 - x0);
        let color = rgb(label.color);
        let text_style = (FONT, 11.0 * s)
            .into_font()
            .style(FontStyle::Bold)
            .color(&color)
            .pos(Pos::new(HPos::Left, VPos::Center));
        let (w, h) = root
            .estimate_text_size(&label.text, &text_style)
            .map_err(|e| e.to_string())?;
        let text_w = w as i32 + scale as i32 + 2 * pad;
        let half_h = h as i32 / 2 + pad;
        ctx.draw_series(std::iter::once(
            EmptyElement::at((x, label.y))
                + Rectangle::new([(0, -half_h), (text_w, half_h)], WHITE.filled()),
        ))
        .map_err(|e| e.to_string())?;
        for dx in bold_offsets(scale) {
            ctx.draw_series(std::iter::once(
                EmptyElement::at((x, label.y))
                    + Text::new(label.text.clone(), (pad + dx, 0), text_style.clone()),
            ))
            .map_err(|e| e.to_string())?;
        }
        ctx.draw_series(std::iter::once(
            EmptyElement::at((x, label.y))
                + Rectangle::new(
                    [(0, -half_h), (text_w, half_h)],
                    color.stroke_width(scale * 2),
                ),
        ))
        .map_err(|e| e.to_string())?;
    }

    for marker in &chart.markers {
        let color = rgb(marker.color);
        let (anchor, dx) = if label_on_left(marker.time, (x0, x1)) {
            (HPos::Right, -px(8))
        } else {
            (HPos::Left, px(8))
        };
        let text_style = (FONT, 11.0 * s)
            .into_font()
            .color(&color)
            .pos(Pos::new(anchor, VPos::Bottom));
        ctx.draw_series(std::iter::once(
            EmptyElement::at((marker.time, marker.value))
                + Circle::new((0, 0), px(5), color.filled())
                + Text::new(marker.label.clone(), (dx, -px(6)), text_style),
        ))
        .map_err(|e| e.to_string())?;
    }

    if !chart.traces.is_empty() {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .legend_area_size(px(30))
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font((FONT, 12.0 * s).into_font().color(&BLACK))
            .margin(px(10))
            .draw()
            .map_err(|e| e.to_string())?;
    }

    root.present().map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_raster.rs"]
mod tests;
