use serde::Serialize;

use crate::model::chart::ChartSpec;
use crate::report::SummaryData;

#[derive(Serialize)]
struct ChartsDocument<'a> {
    charts: &'a [&'a ChartSpec],
}

pub fn render_summary_json(data: &SummaryData) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Both chart specs, in page order, for display outside the PDF.
pub fn render_charts_json(charts: &[&ChartSpec]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ChartsDocument { charts })
}
