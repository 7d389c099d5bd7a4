use super::*;
use crate::model::series::SampleSeries;

fn max_run(unmetered: Vec<f64>, metered: Vec<f64>) -> RunDataset {
    RunDataset {
        kind: RunKind::MaxRpm,
        source: "max.csv".to_string(),
        time: (0..unmetered.len()).map(|i| i as f64 * 0.5).collect(),
        unmetered: SampleSeries::new(Channel::Unmetered, unmetered),
        metered: Some(SampleSeries::new(Channel::Metered, metered)),
    }
}

#[test]
fn test_argmax_argmin_first_occurrence() {
    assert_eq!(argmax_first(&[1.0, 3.0, 2.0, 3.0]), Some(1));
    assert_eq!(argmin_first(&[4.0, 2.0, 2.0, 5.0]), Some(1));
    assert_eq!(argmax_first(&[7.0; 4]), Some(0));
    assert_eq!(argmax_first(&[]), None);
    assert_eq!(argmin_first(&[]), None);
}

#[test]
fn test_spike_is_raw_peak() {
    let mut unmetered = vec![10.0; 12];
    unmetered[3] = 50.0;
    let metered = vec![20.0; 12];
    let run = max_run(unmetered.clone(), metered.clone());
    let smoothed = SmoothedRun {
        unmetered: vec![11.0; 12],
        metered: Some(vec![20.0; 12]),
    };

    let extrema = run_stage3(&run, &smoothed);
    assert_eq!(extrema.len(), 4);

    let raw = extrema[0];
    assert_eq!(raw.channel, Channel::Unmetered);
    assert_eq!(raw.role, TraceRole::Raw);
    assert_eq!(raw.kind, ExtremumKind::Max);
    assert_eq!(raw.index, 3);
    assert_eq!(raw.time, 1.5);
    assert_eq!(raw.value, 50.0);

    assert_eq!(extrema[1].role, TraceRole::Smoothed);
    assert_eq!(extrema[1].index, 0);
    assert_eq!(extrema[2].channel, Channel::Metered);
    assert_eq!(extrema[3].channel, Channel::Metered);
}

#[test]
fn test_idle_run_reports_troughs() {
    let run = RunDataset {
        kind: RunKind::IdleRpm,
        source: "idle.csv".to_string(),
        time: vec![0.0, 1.0, 2.0, 3.0],
        unmetered: SampleSeries::new(Channel::Unmetered, vec![9.0, 8.0, 8.0, 9.5]),
        metered: None,
    };
    let smoothed = SmoothedRun {
        unmetered: vec![9.0, 8.6, 8.4, 9.1],
        metered: None,
    };
    let extrema = run_stage3(&run, &smoothed);
    assert_eq!(extrema.len(), 2);
    assert!(extrema.iter().all(|e| e.kind == ExtremumKind::Min));
    assert_eq!(extrema[0].index, 1);
    assert_eq!(extrema[0].time, 1.0);
    assert_eq!(extrema[1].index, 2);
    assert_eq!(extrema[1].value, 8.4);
}

#[test]
fn test_extremum_kind_per_run() {
    assert_eq!(extremum_kind(RunKind::MaxRpm), ExtremumKind::Max);
    assert_eq!(extremum_kind(RunKind::IdleRpm), ExtremumKind::Min);
}
