mod config;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod session;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{FileConfig, Overrides, load_config, resolve_settings};
use crate::input::load_run;
use crate::model::bands::BandToggle;
use crate::model::correction::CORRECTIONS;
use crate::model::series::RunKind;
use crate::pipeline::stage5_raster::{ChartRasterizer, PlottersRasterizer};
use crate::pipeline::stage6_export::run_stage6;
use crate::pipeline::stage7_report::{Stage7Input, write_reports};
use crate::pipeline::{PipelineError, run_pipeline};
use crate::report::{ReportContext, format_f64_2};
use crate::session::{AccessGate, SessionContext};

#[derive(Debug, Parser)]
#[command(
    name = "fuelqc",
    version,
    about = "Fuel-pressure run charts and PDF reports from max/idle RPM sensor CSVs"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build both charts, summaries and the PDF report.
    Run(RunArgs),
    /// List the RPM drop corrections.
    Corrections,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Max RPM CSV (Time (s), UNMETERED [PSI], METERED [PSI]).
    #[arg(long = "max", value_name = "CSV")]
    max_csv: PathBuf,

    /// Idle RPM CSV (Time (s), UNMETERED [PSI]).
    #[arg(long = "idle", value_name = "CSV")]
    idle_csv: PathBuf,

    #[arg(long)]
    registration: Option<String>,

    /// Correction label or RPM drop, e.g. "-40 RPM (.982)" or 40.
    #[arg(long, allow_hyphen_values = true)]
    correction: Option<String>,

    /// Reference band to draw; repeat to select several. Replaces the defaults.
    #[arg(long = "band", value_enum, value_name = "BAND")]
    bands: Vec<BandToggle>,

    /// Draw no reference bands.
    #[arg(long, conflicts_with = "bands")]
    no_bands: bool,

    /// Output directory.
    #[arg(long = "out", value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// TOML file with run defaults.
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    #[arg(long, env = "FUELQC_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,

    #[arg(long, env = "FUELQC_ACCESS_SECRET", hide = true, hide_env_values = true)]
    access_secret: Option<String>,

    /// Also write each chart as PNG.
    #[arg(long)]
    png: bool,

    /// Skip PDF generation.
    #[arg(long)]
    skip_pdf: bool,

    /// Fixed "Generated" timestamp instead of the local clock.
    #[arg(long)]
    timestamp: Option<String>,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            registration: self.registration.clone(),
            correction: self.correction.clone(),
            bands: self.bands.clone(),
            no_bands: self.no_bands,
            out_dir: self.out_dir.clone(),
            access_secret: self.access_secret.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    match cli.command {
        Command::Corrections => {
            print!("{}", render_corrections());
            Ok(())
        }
        Command::Run(args) => run_report(&args, &PlottersRasterizer::default()),
    }
}

fn render_corrections() -> String {
    let mut out = String::from("label\trpm_drop\tmultiplier\tmetered_low\tmetered_high\n");
    for c in CORRECTIONS {
        let (low, high) = c.metered_bounds();
        out.push_str(&format!(
            "{}\t{}\t{:.3}\t{}\t{}\n",
            c.label,
            c.rpm_drop,
            c.multiplier,
            format_f64_2(low),
            format_f64_2(high)
        ));
    }
    out
}

fn run_report(args: &RunArgs, rasterizer: &dyn ChartRasterizer) -> Result<(), PipelineError> {
    let file_config = match &args.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };
    let settings = resolve_settings(&file_config, &args.overrides())?;

    let gate = AccessGate::new(settings.access_secret.clone());
    let mut session = SessionContext::start(
        &gate,
        settings.registration.clone(),
        settings.correction,
        settings.options,
    );
    if !gate.is_open() {
        gate.attempt(&mut session, args.access_key.as_deref().unwrap_or(""))?;
    }

    let max = load_run(&args.max_csv, RunKind::MaxRpm)?;
    let idle = load_run(&args.idle_csv, RunKind::IdleRpm)?;
    let output = run_pipeline(&session, &max, &idle)?;

    let context = match &args.timestamp {
        Some(ts) => ReportContext::with_timestamp(
            &session.registration,
            session.correction,
            ts.clone(),
        ),
        None => ReportContext::new(&session.registration, session.correction),
    };

    let mut pngs = Vec::new();
    if args.png {
        for chart in output.charts() {
            let name = match chart.run {
                RunKind::MaxRpm => "max_rpm.png",
                RunKind::IdleRpm => "idle_rpm.png",
            };
            pngs.push((name.to_string(), rasterizer.rasterize(chart)?.to_png()?));
        }
    }

    let pdf = if args.skip_pdf {
        None
    } else {
        Some(run_stage6(&output.charts(), &context, rasterizer)?)
    };

    write_reports(
        &Stage7Input {
            max: &max,
            idle: &idle,
            output: &output,
            session: &session,
            context: &context,
            pdf: pdf.as_ref(),
            pngs: &pngs,
        },
        &settings.out_dir,
    )?;

    session.end();
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
