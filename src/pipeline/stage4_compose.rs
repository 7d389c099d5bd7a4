use crate::model::bands::{
    BAND_OPACITY, BandDef, BandKind, DEEP_SKY_BLUE, NAVY, TURBO_IDLE_RANGE, fixed_band,
};
use crate::model::chart::{
    Annotation, BLUE, BandShape, ChartSpec, ChartStyle, DARK_RED, ExtremumKind, LineDash, Marker,
    RED, Rgb, Trace, TraceRole,
};
use crate::model::correction::CorrectionFactor;
use crate::model::options::DisplayOptions;
use crate::model::series::{Channel, RunDataset, RunKind};
use crate::pipeline::stage2_smooth::SmoothedRun;
use crate::pipeline::stage3_extrema::Extremum;
use crate::report::format_f64_2;

/// Horizontal placement of band labels and correction callouts.
pub const BAND_LABEL_X: f64 = 0.01;
pub const CALLOUT_X: f64 = 0.88;

#[derive(Debug, Clone, Copy)]
pub struct BandInputs<'a> {
    pub options: &'a DisplayOptions,
    pub correction: &'a CorrectionFactor,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandLayer {
    pub shapes: Vec<BandShape>,
    pub labels: Vec<Annotation>,
}

impl BandLayer {
    fn push_fixed(&mut self, def: &BandDef, x: (f64, f64)) {
        self.shapes.push(BandShape {
            kind: def.kind,
            x0: x.0,
            x1: x.1,
            y0: def.low,
            y1: def.high,
            fill: def.fill,
            opacity: BAND_OPACITY,
            outline: None,
        });
        self.labels.push(Annotation {
            text: def.label.to_string(),
            x_frac: BAND_LABEL_X,
            y: (def.low + def.high) / 2.0,
            color: def.label_color,
        });
    }
}

/// Bands for one chart. Data never flows in here beyond the time extent.
pub fn render_bands(run: RunKind, x: (f64, f64), inputs: BandInputs<'_>) -> BandLayer {
    let mut layer = BandLayer::default();
    let opts = inputs.options;
    match run {
        RunKind::MaxRpm => {
            if opts.turbo_unmetered {
                if let Some(def) = fixed_band(BandKind::TurboUnmetered) {
                    layer.push_fixed(def, x);
                }
            }
            if opts.non_turbo_unmetered {
                if let Some(def) = fixed_band(BandKind::NonTurboUnmetered) {
                    layer.push_fixed(def, x);
                }
            }
            if opts.metered {
                push_metered(&mut layer, x, inputs.correction);
            }
        }
        RunKind::IdleRpm => {
            if opts.non_turbo_idle {
                if let Some(def) = fixed_band(BandKind::NonTurboIdle) {
                    layer.push_fixed(def, x);
                }
            }
            if opts.turbo_idle {
                tracing::warn!(
                    "turbo idle band ({}-{} PSI) is selectable but not drawn",
                    TURBO_IDLE_RANGE.0,
                    TURBO_IDLE_RANGE.1
                );
            }
        }
    }
    layer
}

fn push_metered(layer: &mut BandLayer, x: (f64, f64), correction: &CorrectionFactor) {
    let (low, high) = correction.metered_bounds();
    layer.shapes.push(BandShape {
        kind: BandKind::Metered,
        x0: x.0,
        x1: x.1,
        y0: low,
        y1: high,
        fill: DEEP_SKY_BLUE,
        opacity: BAND_OPACITY,
        outline: Some(NAVY),
    });
    layer.labels.push(Annotation {
        text: format!("METERED ({})", correction.label),
        x_frac: BAND_LABEL_X,
        y: (low + high) / 2.0,
        color: NAVY,
    });
    if !correction.is_rated() {
        layer.labels.push(Annotation {
            text: format!("Max: {}", format_f64_2(high)),
            x_frac: CALLOUT_X,
            y: high,
            color: NAVY,
        });
        layer.labels.push(Annotation {
            text: format!("Min: {}", format_f64_2(low)),
            x_frac: CALLOUT_X,
            y: low,
            color: NAVY,
        });
    }
}

pub fn chart_title(run: RunKind, registration: &str) -> String {
    match run {
        RunKind::MaxRpm => format!("Max RPM Fuel Pressure - {registration}"),
        RunKind::IdleRpm => format!("Idle RPM Unmetered Pressure - {registration}"),
    }
}

pub fn trace_name(channel: Channel, role: TraceRole) -> String {
    let prefix = match role {
        TraceRole::Raw => "Raw",
        TraceRole::Smoothed => "Smooth",
    };
    format!("{prefix} {}", channel.short())
}

fn trace_color(channel: Channel, role: TraceRole) -> Rgb {
    match (channel, role) {
        (Channel::Unmetered, TraceRole::Raw) => RED,
        (Channel::Metered, TraceRole::Raw) => BLUE,
        (Channel::Unmetered, TraceRole::Smoothed) => DARK_RED,
        (Channel::Metered, TraceRole::Smoothed) => NAVY,
    }
}

fn build_trace(time: &[f64], values: &[f64], channel: Channel, role: TraceRole) -> Trace {
    let (width, dash, hover) = match role {
        TraceRole::Raw => (2, LineDash::Dotted, false),
        TraceRole::Smoothed => (3, LineDash::Solid, true),
    };
    Trace {
        name: trace_name(channel, role),
        channel,
        role,
        points: time.iter().copied().zip(values.iter().copied()).collect(),
        color: trace_color(channel, role),
        width,
        dash,
        hover,
    }
}

pub fn marker_label(trace: &str, extremum: &Extremum) -> String {
    let word = match extremum.kind {
        ExtremumKind::Max => "max",
        ExtremumKind::Min => "min",
    };
    format!(
        "{trace} {word}: {} PSI @ {} s",
        format_f64_2(extremum.value),
        format_f64_2(extremum.time)
    )
}

#[derive(Debug, Clone, Copy)]
pub struct Stage4Inputs<'a> {
    pub run: &'a RunDataset,
    pub smoothed: &'a SmoothedRun,
    pub extrema: &'a [Extremum],
    pub options: &'a DisplayOptions,
    pub correction: &'a CorrectionFactor,
    pub registration: &'a str,
}

pub fn run_stage4(inputs: &Stage4Inputs<'_>) -> ChartSpec {
    let run = inputs.run;
    let x_range = run.time_extent().unwrap_or((0.0, 0.0));

    let bands = render_bands(
        run.kind,
        x_range,
        BandInputs {
            options: inputs.options,
            correction: inputs.correction,
        },
    );

    let channels = run.channels();
    let mut traces = Vec::new();
    for &channel in &channels {
        if let Some(series) = run.series(channel) {
            traces.push(build_trace(
                &run.time,
                &series.values,
                series.channel,
                TraceRole::Raw,
            ));
        }
    }
    for &channel in &channels {
        if let Some(values) = inputs.smoothed.series(channel) {
            traces.push(build_trace(&run.time, values, channel, TraceRole::Smoothed));
        }
    }

    let markers = inputs
        .extrema
        .iter()
        .map(|e| {
            let trace = trace_name(e.channel, e.role);
            Marker {
                label: marker_label(&trace, e),
                trace,
                kind: e.kind,
                index: e.index,
                time: e.time,
                value: e.value,
                color: trace_color(e.channel, e.role),
            }
        })
        .collect();

    ChartSpec {
        run: run.kind,
        title: chart_title(run.kind, inputs.registration),
        x_range,
        bands: bands.shapes,
        traces,
        labels: bands.labels,
        markers,
        style: ChartStyle::default(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_compose.rs"]
mod tests;
