use crate::model::chart::{ExtremumKind, TraceRole};
use crate::report::{RunSummary, SummaryData};

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Fuel Pressure Diagnostic Summary\n");
    out.push_str("================================\n\n");

    out.push_str(&format!("Registration: {}\n", data.registration));
    out.push_str(&format!("Generated: {}\n", data.generated_at));
    out.push_str(&format!(
        "Condition: {} (metered band {}-{} PSI)\n",
        data.correction.label, data.correction.metered_low, data.correction.metered_high
    ));
    if data.bands_enabled.is_empty() {
        out.push_str("Reference bands: none\n");
    } else {
        out.push_str(&format!(
            "Reference bands: {}\n",
            data.bands_enabled.join(", ")
        ));
    }
    if let Some(file) = &data.report_file {
        out.push_str(&format!("PDF report: {}\n", file));
    }
    out.push('\n');

    for (i, run) in data.runs.iter().enumerate() {
        push_run(&mut out, i + 1, run);
    }

    out
}

fn push_run(out: &mut String, number: usize, run: &RunSummary) {
    out.push_str(&format!("{}. {} run\n", number, run_heading(run)));
    out.push_str(&format!("Source: {}\n", run.source));
    out.push_str(&format!(
        "Samples: {} ({} s to {} s)\n",
        run.n_samples, run.time_start_s, run.time_end_s
    ));
    for e in &run.extrema {
        let role = match e.trace {
            TraceRole::Raw => "raw",
            TraceRole::Smoothed => "smoothed",
        };
        let word = match e.kind {
            ExtremumKind::Max => "peak",
            ExtremumKind::Min => "trough",
        };
        out.push_str(&format!(
            "{} {} {}: {} PSI at {} s (sample {})\n",
            e.channel.column(),
            role,
            word,
            e.value_psi,
            e.time_s,
            e.index
        ));
    }
    out.push('\n');
}

fn run_heading(run: &RunSummary) -> &'static str {
    run.kind.page_title()
}
