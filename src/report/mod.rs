pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::chart::{ExtremumKind, TraceRole};
use crate::model::correction::CorrectionFactor;
use crate::model::series::{Channel, RunKind};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Annotation-only metadata carried onto the exported report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub registration: String,
    pub correction_label: String,
    pub generated_at: String,
}

impl ReportContext {
    pub fn new(registration: &str, correction: &CorrectionFactor) -> Self {
        Self::with_timestamp(
            registration,
            correction,
            chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        )
    }

    pub fn with_timestamp(
        registration: &str,
        correction: &CorrectionFactor,
        generated_at: String,
    ) -> Self {
        Self {
            registration: registration.to_string(),
            correction_label: correction.label.to_string(),
            generated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrectionSummary {
    pub label: String,
    pub multiplier: f64,
    pub metered_low: String,
    pub metered_high: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtremumSummary {
    pub channel: Channel,
    pub trace: TraceRole,
    pub kind: ExtremumKind,
    pub index: usize,
    pub time_s: String,
    pub value_psi: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub kind: RunKind,
    pub source: String,
    pub n_samples: usize,
    pub time_start_s: String,
    pub time_end_s: String,
    pub bands_drawn: usize,
    pub extrema: Vec<ExtremumSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: String,
    pub version: String,
    pub registration: String,
    pub generated_at: String,
    pub correction: CorrectionSummary,
    pub bands_enabled: Vec<String>,
    pub runs: Vec<RunSummary>,
    pub report_file: Option<String>,
}

pub fn format_f64_2(v: f64) -> String {
    format!("{:.2}", v)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
