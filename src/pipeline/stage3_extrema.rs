use serde::Serialize;

use crate::model::chart::{ExtremumKind, TraceRole};
use crate::model::series::{Channel, RunDataset, RunKind};
use crate::pipeline::stage2_smooth::SmoothedRun;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub channel: Channel,
    pub role: TraceRole,
    pub kind: ExtremumKind,
    pub index: usize,
    pub time: f64,
    pub value: f64,
}

/// Index of the largest value. Ties keep the first occurrence.
pub fn argmax_first(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some(b) if v <= values[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Index of the smallest value. Ties keep the first occurrence.
pub fn argmin_first(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some(b) if v >= values[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Peaks are reported for max RPM runs, troughs for idle.
pub fn extremum_kind(run: RunKind) -> ExtremumKind {
    match run {
        RunKind::MaxRpm => ExtremumKind::Max,
        RunKind::IdleRpm => ExtremumKind::Min,
    }
}

pub fn locate(
    time: &[f64],
    values: &[f64],
    channel: Channel,
    role: TraceRole,
    kind: ExtremumKind,
) -> Option<Extremum> {
    let index = match kind {
        ExtremumKind::Max => argmax_first(values)?,
        ExtremumKind::Min => argmin_first(values)?,
    };
    Some(Extremum {
        channel,
        role,
        kind,
        index,
        time: *time.get(index)?,
        value: values[index],
    })
}

/// Raw then smoothed extremum for every channel on the run.
pub fn run_stage3(run: &RunDataset, smoothed: &SmoothedRun) -> Vec<Extremum> {
    let kind = extremum_kind(run.kind);
    let mut out = Vec::new();
    for channel in run.channels() {
        if let Some(series) = run.series(channel) {
            out.extend(locate(&run.time, &series.values, channel, TraceRole::Raw, kind));
        }
        if let Some(values) = smoothed.series(channel) {
            out.extend(locate(&run.time, values, channel, TraceRole::Smoothed, kind));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_extrema.rs"]
mod tests;
