use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::model::options::DisplayOptions;
use crate::model::series::RunDataset;
use crate::pipeline::stage3_extrema::Extremum;
use crate::pipeline::stage6_export::PdfReport;
use crate::pipeline::{PipelineError, PipelineOutput, RunOutput};
use crate::report::json::{render_charts_json, render_summary_json};
use crate::report::text::render_report_text;
use crate::report::{
    CorrectionSummary, ExtremumSummary, ReportContext, RunSummary, SummaryData, format_f64_2,
};
use crate::session::SessionContext;

#[derive(Debug, Clone)]
pub struct Stage7Input<'a> {
    pub max: &'a RunDataset,
    pub idle: &'a RunDataset,
    pub output: &'a PipelineOutput,
    pub session: &'a SessionContext,
    pub context: &'a ReportContext,
    pub pdf: Option<&'a PdfReport>,
    pub pngs: &'a [(String, Vec<u8>)],
}

/// Writes every artifact of a run into `out_dir` and returns the paths written.
///
/// Everything is rendered in memory and staged under `.partial` names, then
/// renamed into place with the PDF last.
pub fn write_reports(input: &Stage7Input<'_>, out_dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let summary = build_summary(input);
    let mut artifacts: Vec<(String, Vec<u8>)> = vec![
        (
            "charts.json".to_string(),
            render_charts_json(&input.output.charts())?.into_bytes(),
        ),
        (
            "summary.json".to_string(),
            render_summary_json(&summary)?.into_bytes(),
        ),
        (
            "report.txt".to_string(),
            render_report_text(&summary).into_bytes(),
        ),
    ];
    artifacts.extend(input.pngs.iter().cloned());
    if let Some(pdf) = input.pdf {
        tracing::debug!("{} is {} ({} bytes)", pdf.file_name, pdf.mime, pdf.bytes.len());
        artifacts.push((pdf.file_name.clone(), pdf.bytes.clone()));
    }

    fs::create_dir_all(out_dir)?;
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(artifacts.len());
    for (name, bytes) in &artifacts {
        let partial = out_dir.join(format!(".{name}.partial"));
        let result = write_bytes(&partial, bytes);
        staged.push((partial, out_dir.join(name)));
        if let Err(err) = result {
            discard_staged(&staged);
            return Err(err.into());
        }
    }

    let mut written = Vec::with_capacity(staged.len());
    for (i, (partial, target)) in staged.iter().enumerate() {
        if let Err(err) = fs::rename(partial, target) {
            discard_staged(&staged[i..]);
            return Err(err.into());
        }
        tracing::info!("wrote {}", target.display());
        written.push(target.clone());
    }
    Ok(written)
}

fn discard_staged(staged: &[(PathBuf, PathBuf)]) {
    for (partial, _) in staged {
        let _ = fs::remove_file(partial);
    }
}

pub fn build_summary(input: &Stage7Input<'_>) -> SummaryData {
    let correction = input.session.correction;
    let (low, high) = correction.metered_bounds();
    SummaryData {
        tool: "fuelqc".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        registration: input.context.registration.clone(),
        generated_at: input.context.generated_at.clone(),
        correction: CorrectionSummary {
            label: correction.label.to_string(),
            multiplier: correction.multiplier,
            metered_low: format_f64_2(low),
            metered_high: format_f64_2(high),
        },
        bands_enabled: band_names(&input.session.options),
        runs: vec![
            run_summary(input.max, &input.output.max),
            run_summary(input.idle, &input.output.idle),
        ],
        report_file: input.pdf.map(|p| p.file_name.clone()),
    }
}

fn run_summary(run: &RunDataset, output: &RunOutput) -> RunSummary {
    let (start, end) = run.time_extent().unwrap_or((0.0, 0.0));
    RunSummary {
        kind: run.kind,
        source: run.source.clone(),
        n_samples: run.n_samples(),
        time_start_s: format_f64_2(start),
        time_end_s: format_f64_2(end),
        bands_drawn: output.chart.bands.len(),
        extrema: output.extrema.iter().map(extremum_summary).collect(),
    }
}

fn extremum_summary(e: &Extremum) -> ExtremumSummary {
    ExtremumSummary {
        channel: e.channel,
        trace: e.role,
        kind: e.kind,
        index: e.index,
        time_s: format_f64_2(e.time),
        value_psi: format_f64_2(e.value),
    }
}

fn band_names(options: &DisplayOptions) -> Vec<String> {
    options
        .enabled()
        .into_iter()
        .map(|t| t.name().to_string())
        .collect()
}

fn write_bytes(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents)?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage7_report.rs"]
mod tests;
