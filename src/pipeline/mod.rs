pub mod stage2_smooth;
pub mod stage3_extrema;
pub mod stage4_compose;
pub mod stage5_raster;
pub mod stage6_export;
pub mod stage7_report;

use crate::config::ConfigError;
use crate::input::InputError;
use crate::model::chart::ChartSpec;
use crate::model::series::{RunDataset, RunKind};
use crate::session::{AccessError, SessionContext};
use stage2_smooth::{
    SMOOTHING_ORDER, SMOOTHING_WINDOW, SavitzkyGolay, SmoothedRun, SmoothingError, smooth_run,
};
use stage3_extrema::{Extremum, run_stage3};
use stage4_compose::{Stage4Inputs, run_stage4};
use stage5_raster::RenderError;
use stage6_export::ExportError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Smoothing(#[from] SmoothingError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{file}: expected a {expected} run, got {actual}")]
    WrongRun {
        file: String,
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub smoothed: SmoothedRun,
    pub extrema: Vec<Extremum>,
    pub chart: ChartSpec,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub max: RunOutput,
    pub idle: RunOutput,
}

impl PipelineOutput {
    /// Charts in report page order.
    pub fn charts(&self) -> [&ChartSpec; 2] {
        [&self.max.chart, &self.idle.chart]
    }
}

/// Smooths, extracts extrema and composes both charts for an authorized
/// session. Nothing is rasterized here.
pub fn run_pipeline(
    session: &SessionContext,
    max: &RunDataset,
    idle: &RunDataset,
) -> Result<PipelineOutput, PipelineError> {
    session.require_access()?;
    expect_kind(max, RunKind::MaxRpm)?;
    expect_kind(idle, RunKind::IdleRpm)?;

    let filter = SavitzkyGolay::new(SMOOTHING_WINDOW, SMOOTHING_ORDER)?;
    let max_out = process_run(session, &filter, max)?;
    let idle_out = process_run(session, &filter, idle)?;
    tracing::info!(
        "composed charts: max_bands={}, idle_bands={}",
        max_out.chart.bands.len(),
        idle_out.chart.bands.len()
    );

    Ok(PipelineOutput {
        max: max_out,
        idle: idle_out,
    })
}

fn process_run(
    session: &SessionContext,
    filter: &SavitzkyGolay,
    run: &RunDataset,
) -> Result<RunOutput, PipelineError> {
    let smoothed = smooth_run(filter, run)?;
    let extrema = run_stage3(run, &smoothed);
    let chart = run_stage4(&Stage4Inputs {
        run,
        smoothed: &smoothed,
        extrema: &extrema,
        options: &session.options,
        correction: session.correction,
        registration: &session.registration,
    });
    Ok(RunOutput {
        smoothed,
        extrema,
        chart,
    })
}

fn expect_kind(run: &RunDataset, expected: RunKind) -> Result<(), PipelineError> {
    if run.kind == expected {
        Ok(())
    } else {
        Err(PipelineError::WrongRun {
            file: run.source.clone(),
            expected: expected.label(),
            actual: run.kind.label(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
