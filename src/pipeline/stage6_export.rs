use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{BuiltinFont, Image, ImageFilter, ImageTransform, Mm, PdfDocument};

use crate::model::chart::ChartSpec;
use crate::pipeline::stage5_raster::{ChartRasterizer, RasterImage, RenderError};
use crate::report::ReportContext;

pub const PDF_MIME: &str = "application/pdf";

// A4 landscape, millimetres.
const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const MARGIN_MM: f32 = 10.0;
const TITLE_BASELINE_MM: f32 = PAGE_HEIGHT_MM - 17.0;
const SUBTITLE_BASELINE_MM: f32 = PAGE_HEIGHT_MM - 27.0;
const IMAGE_TOP_MM: f32 = 35.0;
const IMAGE_WIDTH_MM: f32 = 275.0;
const MM_PER_INCH: f32 = 25.4;

/// Quality of the DCT-compressed chart images.
pub const JPEG_QUALITY: u8 = 90;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("rasterization failed: {0}")]
    Render(#[from] RenderError),
    #[error("PDF assembly failed: {0}")]
    Pdf(String),
    #[error("raster buffer does not match {width}x{height}")]
    BadRaster { width: u32, height: u32 },
}

/// Header text placed above the chart on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPage {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone)]
pub struct PdfReport {
    pub file_name: String,
    pub mime: &'static str,
    pub pages: Vec<ReportPage>,
    pub bytes: Vec<u8>,
}

/// `<registration>_Report.pdf`, with path separators replaced.
pub fn report_file_name(registration: &str) -> String {
    let safe: String = registration
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    format!("{safe}_Report.pdf")
}

pub fn plan_pages(charts: &[&ChartSpec], ctx: &ReportContext) -> Vec<ReportPage> {
    charts
        .iter()
        .map(|chart| ReportPage {
            title: format!("{} | {}", chart.run.page_title(), ctx.registration),
            subtitle: format!(
                "Condition: {} | Generated: {}",
                ctx.correction_label, ctx.generated_at
            ),
        })
        .collect()
}

/// Rasterizes every chart first, then assembles the document. Any failure
/// returns an error and no bytes.
pub fn run_stage6(
    charts: &[&ChartSpec],
    ctx: &ReportContext,
    rasterizer: &dyn ChartRasterizer,
) -> Result<PdfReport, ExportError> {
    let mut images = Vec::with_capacity(charts.len());
    for chart in charts {
        images.push(rasterizer.rasterize(chart)?);
    }
    let pages = plan_pages(charts, ctx);
    let file_name = report_file_name(&ctx.registration);
    let bytes = assemble_pdf(&file_name, &pages, images)?;
    tracing::info!(
        "assembled PDF report: file={}, pages={}, bytes={}",
        file_name,
        pages.len(),
        bytes.len()
    );
    Ok(PdfReport {
        file_name,
        mime: PDF_MIME,
        pages,
        bytes,
    })
}

fn assemble_pdf(
    doc_title: &str,
    pages: &[ReportPage],
    images: Vec<RasterImage>,
) -> Result<Vec<u8>, ExportError> {
    let pdf_err = |e: printpdf::Error| ExportError::Pdf(e.to_string());

    let (doc, first_page, first_layer) = PdfDocument::new(
        doc_title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Chart",
    );
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_err)?;

    for (idx, (page, raster)) in pages.iter().zip(images).enumerate() {
        let (page_idx, layer_idx) = if idx == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Chart")
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);

        layer.use_text(
            page.title.as_str(),
            16.0,
            Mm(MARGIN_MM),
            Mm(TITLE_BASELINE_MM),
            &bold,
        );
        layer.use_text(
            page.subtitle.as_str(),
            10.0,
            Mm(MARGIN_MM),
            Mm(SUBTITLE_BASELINE_MM),
            &regular,
        );

        let (width, height) = (raster.width, raster.height);
        if raster.rgb.len() != width as usize * height as usize * 3 {
            return Err(ExportError::BadRaster { width, height });
        }
        let jpeg = raster.to_jpeg(JPEG_QUALITY)?;
        let buffer = RgbImage::from_raw(width, height, raster.rgb)
            .ok_or(ExportError::BadRaster { width, height })?;
        let dpi = width as f32 * MM_PER_INCH / IMAGE_WIDTH_MM;
        let image_height_mm = height as f32 * MM_PER_INCH / dpi;

        // Keep the decoded geometry from the pixel buffer, ship the DCT stream.
        let mut image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(buffer));
        image.image.image_data = jpeg;
        image.image.image_filter = Some(ImageFilter::DCT);
        image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM)),
                translate_y: Some(Mm(PAGE_HEIGHT_MM - IMAGE_TOP_MM - image_height_mm)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    doc.save_to_bytes().map_err(pdf_err)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_export.rs"]
mod tests;
