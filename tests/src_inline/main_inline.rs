use super::*;
use crate::model::chart::ChartSpec;
use crate::pipeline::stage5_raster::{RasterImage, RenderError};
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("fuelqc_main_test_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

struct GreyRasterizer;

impl ChartRasterizer for GreyRasterizer {
    fn rasterize(&self, _chart: &ChartSpec) -> Result<RasterImage, RenderError> {
        Ok(RasterImage {
            width: 40,
            height: 24,
            rgb: vec![128; 40 * 24 * 3],
        })
    }
}

fn write_inputs(dir: &std::path::Path) -> (PathBuf, PathBuf) {
    let mut max = String::from("Time (s),UNMETERED [PSI],METERED [PSI]\n");
    let mut idle = String::from("Time (s),UNMETERED [PSI]\n");
    for i in 0..20 {
        let t = i as f64 * 0.5;
        let unmetered = 28.0 + (i % 4) as f64 * 0.25;
        let metered = 20.0 + (i % 3) as f64 * 0.1;
        max.push_str(&format!("{t},{unmetered},{metered}\n"));
        idle.push_str(&format!("{t},{}\n", 9.0 - (i % 5) as f64 * 0.1));
    }
    let max_path = dir.join("max.csv");
    let idle_path = dir.join("idle.csv");
    std::fs::write(&max_path, max).unwrap();
    std::fs::write(&idle_path, idle).unwrap();
    (max_path, idle_path)
}

fn run_args(cli: Cli) -> RunArgs {
    match cli.command {
        Command::Run(args) => args,
        Command::Corrections => panic!("expected run"),
    }
}

#[test]
fn test_parse_run_defaults() {
    let cli = Cli::try_parse_from(["fuelqc", "run", "--max", "m.csv", "--idle", "i.csv"]).unwrap();
    assert_eq!(cli.verbose, 0);
    let args = run_args(cli);
    assert_eq!(args.max_csv, PathBuf::from("m.csv"));
    assert_eq!(args.idle_csv, PathBuf::from("i.csv"));
    assert!(args.bands.is_empty());
    assert!(!args.no_bands);
    assert!(!args.png);
    assert!(!args.skip_pdf);
}

#[test]
fn test_parse_repeated_bands() {
    let cli = Cli::try_parse_from([
        "fuelqc",
        "-vv",
        "run",
        "--max",
        "m.csv",
        "--idle",
        "i.csv",
        "--band",
        "turbo-unmetered",
        "--band",
        "turbo-idle",
        "--correction",
        "-40",
    ])
    .unwrap();
    assert_eq!(cli.verbose, 2);
    let args = run_args(cli);
    assert_eq!(
        args.bands,
        vec![BandToggle::TurboUnmetered, BandToggle::TurboIdle]
    );
    assert_eq!(args.overrides().correction.as_deref(), Some("-40"));
}

#[test]
fn test_no_bands_conflicts_with_band() {
    let res = Cli::try_parse_from([
        "fuelqc", "run", "--max", "m.csv", "--idle", "i.csv", "--band", "metered", "--no-bands",
    ]);
    assert!(res.is_err());
}

#[test]
fn test_run_requires_both_inputs() {
    assert!(Cli::try_parse_from(["fuelqc", "run", "--max", "m.csv"]).is_err());
}

#[test]
fn test_corrections_table() {
    let table = render_corrections();
    let lines: Vec<_> = table.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "label\trpm_drop\tmultiplier\tmetered_low\tmetered_high");
    assert_eq!(lines[1], "Rated RPM (1.000)\t0\t1.000\t19.00\t21.30");
    assert_eq!(lines[7], "-120 RPM (.946)\t120\t0.946\t17.97\t20.15");
}

#[test]
fn test_run_report_end_to_end() {
    let dir = make_temp_dir();
    let (max, idle) = write_inputs(&dir);
    let out = dir.join("out");
    let cli = Cli::try_parse_from([
        "fuelqc",
        "run",
        "--max",
        max.to_str().unwrap(),
        "--idle",
        idle.to_str().unwrap(),
        "--registration",
        "N123AB",
        "--out",
        out.to_str().unwrap(),
        "--png",
        "--timestamp",
        "2026-02-03 04:05",
    ])
    .unwrap();
    let mut args = run_args(cli);
    args.access_key = None;
    args.access_secret = None;

    run_report(&args, &GreyRasterizer).unwrap();

    let pdf = std::fs::read(out.join("N123AB_Report.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert!(out.join("max_rpm.png").exists());
    assert!(out.join("idle_rpm.png").exists());
    assert!(out.join("charts.json").exists());
    let text = std::fs::read_to_string(out.join("report.txt")).unwrap();
    assert!(text.contains("Generated: 2026-02-03 04:05\n"));
}

#[test]
fn test_run_report_access_gate() {
    let dir = make_temp_dir();
    let (max, idle) = write_inputs(&dir);
    let out = dir.join("out");
    let cli = Cli::try_parse_from([
        "fuelqc",
        "run",
        "--max",
        max.to_str().unwrap(),
        "--idle",
        idle.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--skip-pdf",
    ])
    .unwrap();
    let mut args = run_args(cli);
    args.access_secret = Some("s3cret".to_string());
    args.access_key = Some("nope".to_string());

    let err = run_report(&args, &GreyRasterizer).unwrap_err();
    assert!(matches!(err, PipelineError::Access(_)));
    assert!(!out.exists());

    args.access_key = Some("s3cret".to_string());
    run_report(&args, &GreyRasterizer).unwrap();
    assert!(out.join("summary.json").exists());
    assert!(!out.join("_Report.pdf").exists());
}

#[test]
fn test_missing_metered_column_writes_nothing() {
    let dir = make_temp_dir();
    let (_, idle) = write_inputs(&dir);
    let max = dir.join("bad_max.csv");
    std::fs::write(&max, "Time (s),UNMETERED [PSI]\n0,28\n0.5,28.1\n").unwrap();
    let out = dir.join("out");
    let cli = Cli::try_parse_from([
        "fuelqc",
        "run",
        "--max",
        max.to_str().unwrap(),
        "--idle",
        idle.to_str().unwrap(),
        "--registration",
        "N1",
        "--out",
        out.to_str().unwrap(),
    ])
    .unwrap();
    let mut args = run_args(cli);
    args.access_key = None;
    args.access_secret = None;

    let err = run_report(&args, &GreyRasterizer).unwrap_err();
    assert!(err.to_string().contains("METERED [PSI]"));
    assert!(!out.exists());
}

#[test]
fn test_parse_hyphenated_correction_values() {
    for value in ["-40 RPM (.982)", "-120", "Rated RPM (1.000)"] {
        let cli = Cli::try_parse_from([
            "fuelqc",
            "run",
            "--max",
            "m.csv",
            "--idle",
            "i.csv",
            "--correction",
            value,
        ])
        .unwrap();
        let args = run_args(cli);
        assert_eq!(args.correction.as_deref(), Some(value));
    }
}
