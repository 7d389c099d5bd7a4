use super::*;
use crate::model::chart::{ChartStyle, Trace, TraceRole};
use crate::model::correction::CorrectionFactor;
use crate::model::options::DisplayOptions;
use crate::model::series::{Channel, RunDataset, RunKind, SampleSeries};
use crate::pipeline::run_pipeline;
use crate::session::{AccessGate, SessionContext};

fn small_chart() -> ChartSpec {
    ChartSpec {
        run: RunKind::IdleRpm,
        title: "Idle RPM Unmetered Pressure - T1".to_string(),
        x_range: (0.0, 3.0),
        bands: Vec::new(),
        traces: vec![Trace {
            name: "Smooth UNM".to_string(),
            channel: Channel::Unmetered,
            role: TraceRole::Smoothed,
            points: vec![(0.0, 9.0), (1.0, 8.5), (2.0, 8.7), (3.0, 9.1)],
            color: Rgb(0x8B, 0, 0),
            width: 3,
            dash: LineDash::Solid,
            hover: true,
        }],
        labels: Vec::new(),
        markers: Vec::new(),
        style: ChartStyle::default(),
    }
}

#[test]
fn test_default_raster_size() {
    let r = PlottersRasterizer::default();
    assert_eq!(r.width * r.scale, 2400);
    assert_eq!(r.height * r.scale, 1400);
}

#[test]
fn test_rasterize_fills_buffer() {
    let r = PlottersRasterizer {
        width: 300,
        height: 200,
        scale: 1,
    };
    let img = r.rasterize(&small_chart()).unwrap();
    assert_eq!((img.width, img.height), (300, 200));
    assert_eq!(img.rgb.len(), 300 * 200 * 3);
    assert!(img.rgb.iter().any(|&b| b == 255));
    assert!(img.rgb.chunks_exact(3).any(|p| p[0] > 100 && p[1] < 60));
}

#[test]
fn test_png_encoding() {
    let img = RasterImage {
        width: 2,
        height: 2,
        rgb: vec![255; 12],
    };
    let png = img.to_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_png_rejects_short_buffer() {
    let img = RasterImage {
        width: 4,
        height: 4,
        rgb: vec![0; 5],
    };
    assert!(matches!(img.to_png(), Err(RenderError::Encode(_))));
    assert!(matches!(img.to_jpeg(90), Err(RenderError::Encode(_))));
}

#[test]
fn test_jpeg_encoding() {
    let img = RasterImage {
        width: 16,
        height: 8,
        rgb: vec![180; 16 * 8 * 3],
    };
    let jpeg = img.to_jpeg(90).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_marker_labels_flip_near_right_edge() {
    assert!(!label_on_left(0.0, (0.0, 10.0)));
    assert!(!label_on_left(5.0, (0.0, 10.0)));
    assert!(label_on_left(9.5, (0.0, 10.0)));
    assert!(label_on_left(10.0, (0.0, 10.0)));
    assert!(!label_on_left(3.0, (3.0, 3.0)));
}

#[test]
fn test_bold_text_is_overstruck() {
    assert_eq!(bold_offsets(1), 0..=1);
    assert_eq!(bold_offsets(2), 0..=1);
    assert_eq!(bold_offsets(4), 0..=2);
    assert!(bold_offsets(RASTER_SCALE).count() > 1);
}

#[test]
fn test_flat_time_range_is_widened() {
    assert_eq!(padded_x((2.0, 2.0)), (1.5, 2.5));
    assert_eq!(padded_x((0.0, 4.0)), (0.0, 4.0));
}

#[test]
fn test_render_composed_max_chart() {
    let n = 20;
    let max = RunDataset {
        kind: RunKind::MaxRpm,
        source: "max.csv".to_string(),
        time: (0..n).map(|i| i as f64 * 0.5).collect(),
        unmetered: SampleSeries::new(
            Channel::Unmetered,
            (0..n).map(|i| 27.5 + i as f64 * 0.1).collect(),
        ),
        metered: Some(SampleSeries::new(
            Channel::Metered,
            (0..n).map(|i| 20.0 + (i % 3) as f64 * 0.1).collect(),
        )),
    };
    let idle = RunDataset {
        kind: RunKind::IdleRpm,
        source: "idle.csv".to_string(),
        time: (0..n).map(|i| i as f64 * 0.5).collect(),
        unmetered: SampleSeries::new(Channel::Unmetered, vec![9.0; n]),
        metered: None,
    };
    let session = SessionContext::start(
        &AccessGate::default(),
        "N123".to_string(),
        CorrectionFactor::lookup("-40").unwrap(),
        DisplayOptions::default(),
    );
    let out = run_pipeline(&session, &max, &idle).unwrap();
    let chart = &out.max.chart;
    assert!(!chart.bands.is_empty());
    assert!(!chart.labels.is_empty());
    assert!(!chart.markers.is_empty());

    let img = PlottersRasterizer::default().rasterize(chart).unwrap();
    assert_eq!((img.width, img.height), (2400, 1400));
    assert_eq!(img.rgb.len(), 2400 * 1400 * 3);
    // Non-turbo unmetered fill (lime green at 30%) blended over white.
    let tinted = img
        .rgb
        .chunks_exact(3)
        .filter(|p| p[1] > p[0] && p[1] > p[2])
        .count();
    assert!(tinted > 1000, "{tinted}");
    assert!(img.to_png().unwrap().len() < img.rgb.len());
}
